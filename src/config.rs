//! Locations, encodings, and file name formats of the regiment data files.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::errors::RegimentError;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_CATALOG_FILE_NAME: &str = "regiments.ini";
pub const DEFAULT_FILE_ENCODING: &str = "cp1251";
pub const DEFAULT_NAMES_FILE_NAME_FORMAT: &str = "regShort_{language}.properties";
pub const DEFAULT_DESCRIPTIONS_FILE_NAME_FORMAT: &str = "regInfo_{language}.properties";

/// The placeholder in file name formats that gets replaced by the language code.
pub const LANGUAGE_PLACEHOLDER: &str = "{language}";

/// How the value part of a properties line is turned into text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ValueEncoding {
    /// Each byte is a Latin-1 character, with backslash escapes such as `\u0410` expanded.
    #[default]
    UnicodeEscape,
    /// The value is decoded with the file encoding, as is.
    Plain,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_dir: PathBuf,
    pub catalog_file_name: String,
    /// An encoding label as understood by `encoding_rs`, such as `cp1251` or `utf-8`.
    pub file_encoding: String,
    pub value_encoding: ValueEncoding,
    /// What to return for text that has no translation. `None` unless overridden.
    pub missing_value: Option<String>,
    pub names_file_name_format: String,
    pub descriptions_file_name_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_file_name: DEFAULT_CATALOG_FILE_NAME.to_owned(),
            file_encoding: DEFAULT_FILE_ENCODING.to_owned(),
            value_encoding: ValueEncoding::default(),
            missing_value: None,
            names_file_name_format: DEFAULT_NAMES_FILE_NAME_FORMAT.to_owned(),
            descriptions_file_name_format: DEFAULT_DESCRIPTIONS_FILE_NAME_FORMAT.to_owned(),
        }
    }
}

impl Config {
    /// Default settings for data files in `data_dir`.
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Config { data_dir: data_dir.into(), ..Config::default() }
    }

    /// Read settings from a JSON file. Fields that are not present keep their defaults.
    pub fn load(path: &Path) -> Result<Self, RegimentError> {
        let content = read_to_string(path).map_err(|source| RegimentError::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content)
            .map_err(|source| RegimentError::Config { path: path.to_path_buf(), source })
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file_name)
    }

    /// Look up the configured file encoding.
    pub fn encoding(&self) -> Result<&'static Encoding, RegimentError> {
        Encoding::for_label(self.file_encoding.trim().as_bytes())
            .ok_or_else(|| RegimentError::UnknownEncoding { label: self.file_encoding.clone() })
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("/srv/il2");
        assert_eq!(config.catalog_path(), Path::new("/srv/il2").join("regiments.ini"));
        assert_eq!(config.value_encoding, ValueEncoding::UnicodeEscape);
        assert!(config.missing_value.is_none());
        assert_eq!(config.encoding().unwrap(), encoding_rs::WINDOWS_1251);
    }

    #[test]
    fn test_unknown_encoding() {
        let config = Config { file_encoding: "klingon".to_owned(), ..Config::default() };
        let err = config.encoding().unwrap_err();
        assert!(matches!(err, RegimentError::UnknownEncoding { label } if label == "klingon"));
    }

    #[test]
    fn test_load_partial() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("regiments.json");
        write(&path, r#"{ "data_dir": "assets", "value_encoding": "plain", "missing_value": "" }"#)
            .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("assets"));
        assert_eq!(config.value_encoding, ValueEncoding::Plain);
        assert_eq!(config.missing_value.as_deref(), Some(""));
        assert_eq!(config.catalog_file_name, DEFAULT_CATALOG_FILE_NAME);
    }

    #[test]
    fn test_load_rejects_unknown_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("regiments.json");
        write(&path, r#"{ "data_directory": "assets" }"#).unwrap();
        assert!(matches!(Config::load(&path), Err(RegimentError::Config { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(Config::load(&path), Err(RegimentError::ConfigUnreadable { .. })));
    }
}
