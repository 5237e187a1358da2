//! The air forces that regiments belong to.
//!
//! Air-force reference data is owned by the caller. This crate only needs to know which catalog
//! lines are air-force markers ("flight prefixes") and which air force a marker stands for.
//! [`AirForceTable`] is a ready-made registry built from plain records.

use std::fmt::Debug;
use std::fs::read_to_string;
use std::path::Path;
use std::rc::Rc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::RegimentError;

/// An air force as seen by the regiment catalog.
pub trait AirForce: Debug {
    /// Unique name of the air force, for example `vvs_rkka`.
    fn name(&self) -> &str;
    /// The marker under which this air force's regiments are listed in the catalog.
    fn default_flight_prefix(&self) -> &str;
    fn to_primitive(&self, context: Option<&Value>) -> Value;
}

/// Resolves catalog markers to air forces.
pub trait AirForceRegistry: Debug {
    /// Is `token` a marker line in the catalog?
    fn is_flight_prefix(&self, token: &str) -> bool;
    fn get_by_flight_prefix(&self, prefix: &str) -> Option<Rc<dyn AirForce>>;
}

/// Plain air-force data, as found in a JSON reference file.
///
/// Fields other than the ones named here (such as `country`) are kept as they are and included
/// in [`AirForce::to_primitive`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirForceRecord {
    pub name: String,
    pub value: String,
    pub default_flight_prefix: String,
    /// Markers other than the default one that also introduce this air force in the catalog.
    #[serde(default, skip_serializing)]
    pub flight_prefixes: Vec<String>,
    pub verbose_name: String,
    #[serde(default)]
    pub help_text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AirForce for AirForceRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_flight_prefix(&self) -> &str {
        &self.default_flight_prefix
    }

    fn to_primitive(&self, _context: Option<&Value>) -> Value {
        // Serializing a struct of strings and JSON values cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn share(record: &Rc<AirForceRecord>) -> Rc<dyn AirForce> {
    let air_force: Rc<dyn AirForce> = Rc::<AirForceRecord>::clone(record);
    air_force
}

#[derive(Debug, Default)]
pub struct AirForceTable {
    air_forces: Vec<Rc<AirForceRecord>>,
    /// flight prefix -> index into `air_forces`
    prefixes: AHashMap<String, usize>,
}

impl AirForceTable {
    /// Build a table from `records`. If two records claim the same flight prefix, the first one
    /// keeps it.
    pub fn new(records: Vec<AirForceRecord>) -> Self {
        let mut table = AirForceTable::default();
        for record in records {
            let idx = table.air_forces.len();
            let prefixes =
                std::iter::once(&record.default_flight_prefix).chain(&record.flight_prefixes);
            for prefix in prefixes {
                if table.prefixes.contains_key(prefix) {
                    tracing::warn!(%prefix, air_force = %record.name, "Duplicate flight prefix");
                } else {
                    table.prefixes.insert(prefix.clone(), idx);
                }
            }
            table.air_forces.push(Rc::new(record));
        }
        table
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(AirForceTable::new)
    }

    pub fn load(path: &Path) -> Result<Self, RegimentError> {
        let content = read_to_string(path).map_err(|source| RegimentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        AirForceTable::from_json(&content)
            .map_err(|source| RegimentError::Config { path: path.to_path_buf(), source })
    }

    pub fn get_by_name(&self, name: &str) -> Option<Rc<dyn AirForce>> {
        self.air_forces.iter().find(|af| af.name == name).map(share)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AirForceRecord> {
        self.air_forces.iter().map(|af| &**af)
    }

    pub fn len(&self) -> usize {
        self.air_forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.air_forces.is_empty()
    }
}

impl AirForceRegistry for AirForceTable {
    fn is_flight_prefix(&self, token: &str) -> bool {
        self.prefixes.contains_key(token)
    }

    fn get_by_flight_prefix(&self, prefix: &str) -> Option<Rc<dyn AirForce>> {
        let idx = *self.prefixes.get(prefix)?;
        self.air_forces.get(idx).map(share)
    }
}
