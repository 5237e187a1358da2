//! Forward-only reading of the catalog file, one decoded line at a time.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;

use crate::errors::RegimentError;

/// Iterator over the non-blank lines of a catalog file, with surrounding whitespace removed.
///
/// The file is closed when the iterator is dropped, so callers can stop early.
#[derive(Debug)]
pub struct CatalogLines {
    path: PathBuf,
    reader: BufReader<File>,
    encoding: &'static Encoding,
    buf: Vec<u8>,
    line: usize,
    failed: bool,
}

impl CatalogLines {
    pub fn open(path: &Path, encoding: &'static Encoding) -> Result<Self, RegimentError> {
        let file = File::open(path)
            .map_err(|source| RegimentError::Read { path: path.to_path_buf(), source })?;
        Ok(CatalogLines {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            encoding,
            buf: Vec::new(),
            line: 0,
            failed: false,
        })
    }

    /// The 1-based number of the line most recently returned.
    pub fn line_number(&self) -> usize {
        self.line
    }
}

impl Iterator for CatalogLines {
    type Item = Result<String, RegimentError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    let (decoded, malformed) = self.encoding.decode_without_bom_handling(&self.buf);
                    if malformed {
                        tracing::warn!(
                            path = %self.path.display(),
                            line = self.line,
                            encoding = self.encoding.name(),
                            "Malformed bytes in catalog line"
                        );
                    }
                    let trimmed = decoded.trim();
                    if !trimmed.is_empty() {
                        return Some(Ok(trimmed.to_owned()));
                    }
                }
                Err(source) => {
                    self.failed = true;
                    return Some(Err(RegimentError::Read { path: self.path.clone(), source }));
                }
            }
        }
    }
}
