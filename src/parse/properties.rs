//! Single-key lookups in per-language `.properties` files.
//!
//! Each line of such a file is `key<whitespace>value`. The files are small, so a lookup just
//! scans the file from the top and stops at the first line that starts with the key.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;

use crate::config::{ValueEncoding, LANGUAGE_PLACEHOLDER};
use crate::parse::escape::unescape;

/// Python-style ASCII whitespace, which includes vertical tab.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c')
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| !is_space(b)).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Split a line at its first run of whitespace. Returns `None` if the line has no value part.
fn split_key_value(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let line = trim_start(line);
    let end = line.iter().position(|&b| is_space(b))?;
    let (key, rest) = line.split_at(end);
    let value = trim_start(rest);
    if value.is_empty() {
        None
    } else {
        Some((key, value))
    }
}

#[derive(Clone, Debug)]
pub struct PropertiesLookup {
    data_dir: PathBuf,
    file_name_format: String,
    encoding: &'static Encoding,
    value_encoding: ValueEncoding,
}

impl PropertiesLookup {
    pub fn new(
        data_dir: &Path,
        file_name_format: &str,
        encoding: &'static Encoding,
        value_encoding: ValueEncoding,
    ) -> Self {
        PropertiesLookup {
            data_dir: data_dir.to_path_buf(),
            file_name_format: file_name_format.to_owned(),
            encoding,
            value_encoding,
        }
    }

    /// The path of the file for `language`. The language code is lowercased first.
    /// Without a language, the placeholder is replaced by nothing.
    pub fn file_path(&self, language: Option<&str>) -> PathBuf {
        let language = language.map(str::to_lowercase).unwrap_or_default();
        self.data_dir.join(self.file_name_format.replace(LANGUAGE_PLACEHOLDER, &language))
    }

    /// Return the value of the first line that starts with `key`, or `None` if there is no such
    /// line or no such file.
    ///
    /// This is a prefix match: looking up `2GvIAP` will also match a line for `2GvIAP_old` if
    /// that line comes first.
    pub fn lookup(&self, key: &str, language: Option<&str>) -> Option<String> {
        let path = self.file_path(language);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Properties file does not exist");
            return None;
        }

        let (key_bytes, _, unmappable) = self.encoding.encode(key);
        if unmappable {
            tracing::debug!(key, encoding = self.encoding.name(), "Key cannot be encoded");
            return None;
        }

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) => {
                let path = path.display();
                tracing::warn!(%path, error = %err, "Could not open properties file");
                return None;
            }
        };
        tracing::debug!(key, path = %path.display(), "Scanning properties file");

        for line in BufReader::new(file).split(b'\n') {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    let path = path.display();
                    tracing::warn!(%path, error = %err, "Could not read properties file");
                    return None;
                }
            };
            if line.starts_with(&key_bytes) {
                return self.parse_value(&line, &path);
            }
        }

        tracing::debug!(key, path = %path.display(), "Key not found in properties file");
        None
    }

    fn parse_value(&self, line: &[u8], path: &Path) -> Option<String> {
        let (_, value) = split_key_value(line)?;
        let text = match self.value_encoding {
            ValueEncoding::UnicodeEscape => match unescape(value) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "Could not decode value");
                    return None;
                }
            },
            ValueEncoding::Plain => self.encoding.decode_without_bom_handling(value).0.into_owned(),
        };
        Some(text.trim().to_owned())
    }
}
