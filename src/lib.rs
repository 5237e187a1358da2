//! Read-only access to the regiments of the IL-2 Forgotten Battles flight simulator.
//!
//! Regiments are looked up by code name in the `regiments.ini` catalog through a
//! [`CatalogIndex`]. Their display names and descriptions come from per-language properties
//! files and are loaded only when asked for.

#![warn(missing_debug_implementations)]

mod airforce;
mod catalog;
mod config;
mod errors;
mod language;
mod localizer;
pub mod parse;
mod regiment;

pub use crate::airforce::{AirForce, AirForceRecord, AirForceRegistry, AirForceTable};
pub use crate::catalog::CatalogIndex;
pub use crate::config::{
    Config, ValueEncoding, DEFAULT_CATALOG_FILE_NAME, DEFAULT_DATA_DIR,
    DEFAULT_DESCRIPTIONS_FILE_NAME_FORMAT, DEFAULT_FILE_ENCODING, DEFAULT_NAMES_FILE_NAME_FORMAT,
    LANGUAGE_PLACEHOLDER,
};
pub use crate::errors::RegimentError;
pub use crate::language::{Language, TextAttribute};
pub use crate::localizer::RegimentLocalizer;
pub use crate::parse::properties::PropertiesLookup;
pub use crate::regiment::Regiment;
