//! Loading of localized regiment names and descriptions.

use crate::config::Config;
use crate::errors::RegimentError;
use crate::language::TextAttribute;
use crate::parse::properties::PropertiesLookup;

/// Reads regiment names and descriptions from the per-language properties files.
///
/// Nothing is cached here; every call scans a file. Caching is done per regiment.
#[derive(Clone, Debug)]
pub struct RegimentLocalizer {
    names: PropertiesLookup,
    descriptions: PropertiesLookup,
    missing_value: Option<String>,
}

impl RegimentLocalizer {
    pub fn new(config: &Config) -> Result<Self, RegimentError> {
        let encoding = config.encoding()?;
        Ok(RegimentLocalizer {
            names: PropertiesLookup::new(
                &config.data_dir,
                &config.names_file_name_format,
                encoding,
                config.value_encoding,
            ),
            descriptions: PropertiesLookup::new(
                &config.data_dir,
                &config.descriptions_file_name_format,
                encoding,
                config.value_encoding,
            ),
            missing_value: config.missing_value.clone(),
        })
    }

    /// What the resolve functions return when there is no text.
    pub fn missing_value(&self) -> Option<&str> {
        self.missing_value.as_deref()
    }

    pub fn resolve_name(&self, id: &str, language: &str) -> Option<String> {
        self.resolve(TextAttribute::VerboseName, id, language)
    }

    pub fn resolve_description(&self, id: &str, language: &str) -> Option<String> {
        self.resolve(TextAttribute::HelpText, id, language)
    }

    /// Look up the text for `attribute` of regiment `id` in the file for `language`.
    /// The language code is case-insensitive.
    pub fn resolve(&self, attribute: TextAttribute, id: &str, language: &str) -> Option<String> {
        let lookup = match attribute {
            TextAttribute::VerboseName => &self.names,
            TextAttribute::HelpText => &self.descriptions,
        };
        lookup.lookup(id, Some(language)).or_else(|| self.missing_value.clone())
    }
}
