//! Lookup of regiments in the `regiments.ini` catalog.
//!
//! The catalog lists regiment code names under air-force marker lines:
//!
//! ```text
//! r01
//! 1GvIAP
//! 1st_AE_1AR
//!
//! UN_NN
//! USN_VT_9B
//! [next_section]
//! ```
//!
//! A regiment belongs to the air force of the nearest marker above it. The catalog is not held
//! in memory; every lookup that is not already cached scans the file from the start.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ahash::AHashMap;
use encoding_rs::Encoding;

use crate::airforce::{AirForce, AirForceRegistry};
use crate::config::Config;
use crate::errors::RegimentError;
use crate::localizer::RegimentLocalizer;
use crate::parse::lines::CatalogLines;
use crate::regiment::Regiment;

fn is_section_header(line: &str) -> bool {
    line.starts_with('[') && line.ends_with(']')
}

/// Cached access to the regiments in a catalog file.
///
/// Each regiment is created once. Later lookups of the same code name, through either
/// [`CatalogIndex::get_by_id`] or [`CatalogIndex::filter_by_air_force`], return the same `Rc`.
#[derive(Debug)]
pub struct CatalogIndex {
    catalog_path: PathBuf,
    encoding: &'static Encoding,
    registry: Rc<dyn AirForceRegistry>,
    localizer: Rc<RegimentLocalizer>,
    cache: RefCell<AHashMap<String, Rc<Regiment>>>,
}

impl CatalogIndex {
    /// Open the catalog described by `config`, with a localizer built from the same config.
    pub fn new(
        config: &Config,
        registry: Rc<dyn AirForceRegistry>,
    ) -> Result<Self, RegimentError> {
        let localizer = Rc::new(RegimentLocalizer::new(config)?);
        CatalogIndex::with_localizer(config, registry, localizer)
    }

    /// Open the catalog described by `config`, using `localizer` for regiment texts.
    ///
    /// Fails if the catalog file does not exist.
    pub fn with_localizer(
        config: &Config,
        registry: Rc<dyn AirForceRegistry>,
        localizer: Rc<RegimentLocalizer>,
    ) -> Result<Self, RegimentError> {
        let catalog_path = config.catalog_path();
        if !catalog_path.exists() {
            return Err(RegimentError::DataSourceNotFound { path: catalog_path });
        }
        Ok(CatalogIndex {
            catalog_path,
            encoding: config.encoding()?,
            registry,
            localizer,
            cache: RefCell::default(),
        })
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    pub fn localizer(&self) -> &Rc<RegimentLocalizer> {
        &self.localizer
    }

    /// Return the regiment with code name `id`.
    pub fn get_by_id(&self, id: &str) -> Result<Rc<Regiment>, RegimentError> {
        if let Some(regiment) = self.cache.borrow().get(id) {
            tracing::trace!(id, "Regiment cache hit");
            return Ok(Rc::clone(regiment));
        }

        let not_found = || RegimentError::NotFound { id: id.to_owned() };
        let prefix = self.find_flight_prefix(id)?.ok_or_else(not_found)?;
        let air_force = self.registry.get_by_flight_prefix(&prefix).ok_or_else(not_found)?;

        let regiment = Rc::new(Regiment::new(air_force, id, Rc::clone(&self.localizer)));
        self.cache.borrow_mut().insert(id.to_owned(), Rc::clone(&regiment));
        Ok(regiment)
    }

    /// Find the marker of the section that lists `id`. Returns `None` if `id` is not listed,
    /// or is listed before any marker.
    fn find_flight_prefix(&self, id: &str) -> Result<Option<String>, RegimentError> {
        tracing::debug!(id, path = %self.catalog_path.display(), "Scanning catalog for regiment");
        let mut flight_prefix = None;
        for line in CatalogLines::open(&self.catalog_path, self.encoding)? {
            let line = line?;
            if self.registry.is_flight_prefix(&line) {
                flight_prefix = Some(line);
            } else if line == id {
                return Ok(flight_prefix);
            }
        }
        tracing::debug!(id, "Regiment not in catalog");
        Ok(None)
    }

    /// Return the regiments listed under the default marker of `air_force`, in file order.
    ///
    /// The listing ends at the next marker, at a `[section]` line, or at the end of the file.
    /// An air force whose marker is not in the catalog has no regiments.
    pub fn filter_by_air_force(
        &self,
        air_force: &Rc<dyn AirForce>,
    ) -> Result<Vec<Rc<Regiment>>, RegimentError> {
        let marker = air_force.default_flight_prefix();
        tracing::debug!(
            marker,
            path = %self.catalog_path.display(),
            "Scanning catalog for air force"
        );

        let mut result = Vec::new();
        let mut found = false;
        for line in CatalogLines::open(&self.catalog_path, self.encoding)? {
            let line = line?;
            if line == marker {
                found = true;
            } else if found {
                if self.registry.is_flight_prefix(&line) || is_section_header(&line) {
                    break;
                }
                result.push(self.get_or_insert(air_force, line));
            }
        }
        Ok(result)
    }

    fn get_or_insert(&self, air_force: &Rc<dyn AirForce>, id: String) -> Rc<Regiment> {
        let mut cache = self.cache.borrow_mut();
        let regiment = cache.entry(id).or_insert_with_key(|id| {
            Rc::new(Regiment::new(Rc::clone(air_force), id, Rc::clone(&self.localizer)))
        });
        Rc::clone(regiment)
    }

    /// The number of regiments created so far.
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::TempDir;

    use super::*;
    use crate::airforce::AirForceTable;

    const AIR_FORCES: &str = r#"[
        { "name": "vvs_rkka", "value": "r", "default_flight_prefix": "r01",
          "verbose_name": "VVS RKKA" },
        { "name": "raf", "value": "gb", "default_flight_prefix": "RAF",
          "verbose_name": "RAF" },
        { "name": "usn", "value": "un", "default_flight_prefix": "UN_NN",
          "verbose_name": "USN" }
    ]"#;

    fn setup(catalog: &str) -> (TempDir, Rc<AirForceTable>, CatalogIndex) {
        let dir = TempDir::new().unwrap();
        write(dir.path().join("regiments.ini"), catalog).unwrap();
        let table = Rc::new(AirForceTable::from_json(AIR_FORCES).unwrap());
        let registry: Rc<dyn AirForceRegistry> = Rc::<AirForceTable>::clone(&table);
        let index = CatalogIndex::new(&Config::new(dir.path()), registry).unwrap();
        (dir, table, index)
    }

    #[test]
    fn test_missing_catalog() {
        let dir = TempDir::new().unwrap();
        let registry = Rc::new(AirForceTable::default());
        let err = CatalogIndex::new(&Config::new(dir.path()), registry).unwrap_err();
        assert!(matches!(err, RegimentError::DataSourceNotFound { .. }));
        assert!(err.is_lookup_error());
    }

    #[test]
    fn test_raf_scenario() {
        let (_dir, table, index) = setup("RAF\nNN\n[next]\n");
        let raf = table.get_by_name("raf").unwrap();

        let regiments = index.filter_by_air_force(&raf).unwrap();
        assert_eq!(regiments.len(), 1);
        assert_eq!(regiments[0].id(), "NN");

        let nn = index.get_by_id("NN").unwrap();
        assert!(Rc::ptr_eq(&regiments[0], &nn));

        let err = index.get_by_id("missing_id").unwrap_err();
        assert!(matches!(err, RegimentError::NotFound { ref id } if id == "missing_id"));
    }

    #[test]
    fn test_get_by_id_resolves_section() {
        let (_dir, _table, index) =
            setup("[regiments]\nr01\n1GvIAP\n\n  1st_AE_1AR  \nUN_NN\nUSN_VT_9B\n");
        assert_eq!(index.get_by_id("1GvIAP").unwrap().air_force().name(), "vvs_rkka");
        assert_eq!(index.get_by_id("1st_AE_1AR").unwrap().air_force().name(), "vvs_rkka");
        assert_eq!(index.get_by_id("USN_VT_9B").unwrap().air_force().name(), "usn");
    }

    #[test]
    fn test_get_by_id_cached() {
        let (dir, _table, index) = setup("r01\n1GvIAP\n");
        let first = index.get_by_id("1GvIAP").unwrap();

        // The cache answers without looking at the file again.
        write(dir.path().join("regiments.ini"), "").unwrap();
        let second = index.get_by_id("1GvIAP").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(index.cached_len(), 1);
    }

    #[test]
    fn test_id_before_any_marker() {
        let (_dir, _table, index) = setup("orphan\nr01\n1GvIAP\n");
        assert!(matches!(index.get_by_id("orphan"), Err(RegimentError::NotFound { .. })));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let (_dir, _table, index) = setup("UN_NN\nDUP\nr01\nDUP\n");
        assert_eq!(index.get_by_id("DUP").unwrap().air_force().name(), "usn");
    }

    #[test]
    fn test_filter_bounded_by_next_marker() {
        let (_dir, table, index) = setup("r01\n1GvIAP\n2GvIAP\n\nUN_NN\nUSN_VT_9B\n");
        let vvs = table.get_by_name("vvs_rkka").unwrap();
        let ids: Vec<String> = index
            .filter_by_air_force(&vvs)
            .unwrap()
            .iter()
            .map(|r| r.id().to_owned())
            .collect();
        assert_eq!(ids, vec!["1GvIAP", "2GvIAP"]);

        let usn = table.get_by_name("usn").unwrap();
        let ids: Vec<String> = index
            .filter_by_air_force(&usn)
            .unwrap()
            .iter()
            .map(|r| r.id().to_owned())
            .collect();
        assert_eq!(ids, vec!["USN_VT_9B"]);
    }

    #[test]
    fn test_filter_unknown_marker() {
        let (_dir, table, index) = setup("r01\n1GvIAP\n");
        let raf = table.get_by_name("raf").unwrap();
        assert!(index.filter_by_air_force(&raf).unwrap().is_empty());
    }

    #[test]
    fn test_filter_cached() {
        let (_dir, table, index) = setup("r01\n1GvIAP\n2GvIAP\n");
        let vvs = table.get_by_name("vvs_rkka").unwrap();
        let first = index.filter_by_air_force(&vvs).unwrap();
        let second = index.filter_by_air_force(&vvs).unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert!(Rc::ptr_eq(a, b));
        }
        assert_eq!(index.cached_len(), 2);
    }
}
