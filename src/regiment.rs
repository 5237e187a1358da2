use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::str::FromStr;

use ahash::AHashMap;
use serde_json::{json, Value};

use crate::airforce::AirForce;
use crate::errors::RegimentError;
use crate::language::{Language, TextAttribute};
use crate::localizer::RegimentLocalizer;

/// Empty strings count as missing, the same as `None`.
fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.is_empty())
}

/// A regiment: its code name, its air force, and its localized texts.
///
/// The texts are loaded on first use and remembered separately for each language.
#[derive(Debug)]
pub struct Regiment {
    id: String,
    air_force: Rc<dyn AirForce>,
    localizer: Rc<RegimentLocalizer>,
    texts: RefCell<AHashMap<(TextAttribute, Language), Option<String>>>,
}

impl Regiment {
    pub fn new(air_force: Rc<dyn AirForce>, id: &str, localizer: Rc<RegimentLocalizer>) -> Self {
        Regiment { id: id.to_owned(), air_force, localizer, texts: RefCell::default() }
    }

    /// The regiment's code name, as used in the catalog and in mission files.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn air_force(&self) -> &Rc<dyn AirForce> {
        &self.air_force
    }

    pub fn verbose_name(&self, active_language: Option<&str>) -> Option<String> {
        self.get_text(TextAttribute::VerboseName, active_language)
    }

    pub fn help_text(&self, active_language: Option<&str>) -> Option<String> {
        self.get_text(TextAttribute::HelpText, active_language)
    }

    /// Like [`Regiment::get_text`], with the attribute given by its name.
    pub fn get_text_by_name(
        &self,
        name: &str,
        active_language: Option<&str>,
    ) -> Result<Option<String>, RegimentError> {
        let attribute = TextAttribute::from_str(name)
            .map_err(|_| RegimentError::UnknownAttribute { name: name.to_owned() })?;
        Ok(self.get_text(attribute, active_language))
    }

    /// Return the text for `attribute` in the active language.
    ///
    /// Unsupported or absent active languages mean the default language. If the text has no
    /// translation in the chosen language, the default language's text is used.
    ///
    /// Only found texts are remembered. When the result is the missing value, the next call
    /// reads the files again.
    pub fn get_text(
        &self,
        attribute: TextAttribute,
        active_language: Option<&str>,
    ) -> Option<String> {
        let language = Language::resolve(active_language);
        if let Some(value) = self.texts.borrow().get(&(attribute, language)) {
            if is_present(value.as_deref()) {
                tracing::trace!(id = %self.id, %attribute, %language, "Text cache hit");
                return value.clone();
            }
        }

        let value = self.load_text(attribute, language);
        self.texts.borrow_mut().insert((attribute, language), value.clone());
        value
    }

    fn load_text(&self, attribute: TextAttribute, language: Language) -> Option<String> {
        let value = self.localizer.resolve(attribute, &self.id, language.code());
        if !is_present(value.as_deref()) && !language.is_default() {
            return self.localizer.resolve(attribute, &self.id, Language::default().code());
        }
        value
    }

    /// A plain representation of the regiment, with its texts in the active language.
    pub fn to_primitive(&self, context: Option<&Value>, active_language: Option<&str>) -> Value {
        json!({
            "air_force": self.air_force.to_primitive(context),
            "code_name": self.id,
            "verbose_name": self.verbose_name(active_language),
            "help_text": self.help_text(active_language),
        })
    }
}

impl Display for Regiment {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "<Regiment '{}'>", self.id)
    }
}
