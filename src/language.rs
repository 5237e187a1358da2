//! Supported display languages and the localized text attributes of a regiment.

use std::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// A language that the regiment data is translated into.
///
/// The `Display` form is the lowercase code used in localization file names.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    /// Pick the language to display text in, given the caller's active language.
    ///
    /// An unset or unsupported active language resolves to the default language.
    pub fn resolve(active: Option<&str>) -> Self {
        active.and_then(|s| Language::from_str(s.trim()).ok()).unwrap_or_default()
    }

    pub fn is_default(self) -> bool {
        self == Language::default()
    }

    pub fn code(self) -> &'static str {
        self.into()
    }
}

/// The lazily loaded text attributes of a [`Regiment`](crate::Regiment).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TextAttribute {
    /// Short display name, from the names file.
    VerboseName,
    /// Longer description, from the descriptions file.
    HelpText,
}
