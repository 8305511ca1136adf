#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region name translation tables.
//!
//! A [`RegionNameTable`] maps the local-language region names used in the
//! case dataset to the stable identifiers used by the map's boundary file
//! (and back). Tables are plain configuration: built once at startup and
//! passed by reference to whatever needs them. The Hong Kong district table
//! is embedded at compile time.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Embedded TOML definition of the Hong Kong district table.
const HONG_KONG_TOML: &str = include_str!("../regions/hong_kong.toml");

/// Errors that can occur while building a [`RegionNameTable`].
#[derive(Debug, Error)]
pub enum RegionTableError {
    /// The table file could not be read.
    #[error("Failed to read region table: {0}")]
    Io(#[from] std::io::Error),

    /// The table file is not valid TOML for a region table.
    #[error("Failed to parse region table: {0}")]
    Parse(#[from] toml::de::Error),

    /// Two entries share an identifier or a local name, so the mapping
    /// would not be one-to-one.
    #[error("Duplicate {kind} '{value}' in region table '{table}'")]
    Duplicate {
        /// Table identifier.
        table: String,
        /// Which side of the mapping collided (`"id"` or `"local_name"`).
        kind: &'static str,
        /// The repeated value.
        value: String,
    },
}

/// One region entry in a translation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionName {
    /// Stable external identifier (e.g. the `GeoJSON` feature name).
    pub id: String,
    /// Name as it appears in the case dataset.
    pub local_name: String,
}

/// On-disk shape of a region table.
#[derive(Debug, Clone, Deserialize)]
struct RegionTableDef {
    id: String,
    name: String,
    #[serde(default)]
    regions: Vec<RegionName>,
}

/// A one-to-one mapping between local region names and external ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionNameTable {
    id: String,
    name: String,
    regions: Vec<RegionName>,
    by_local: BTreeMap<String, usize>,
    by_id: BTreeMap<String, usize>,
}

impl RegionNameTable {
    /// Builds a table from its entries.
    ///
    /// # Errors
    ///
    /// Returns [`RegionTableError::Duplicate`] if any id or local name
    /// appears twice.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        regions: Vec<RegionName>,
    ) -> Result<Self, RegionTableError> {
        let id = id.into();
        let mut by_local = BTreeMap::new();
        let mut by_id = BTreeMap::new();

        for (idx, region) in regions.iter().enumerate() {
            if by_id.insert(region.id.clone(), idx).is_some() {
                return Err(RegionTableError::Duplicate {
                    table: id,
                    kind: "id",
                    value: region.id.clone(),
                });
            }
            if by_local.insert(region.local_name.clone(), idx).is_some() {
                return Err(RegionTableError::Duplicate {
                    table: id,
                    kind: "local_name",
                    value: region.local_name.clone(),
                });
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            regions,
            by_local,
            by_id,
        })
    }

    /// Parses a table from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`RegionTableError`] if the TOML is malformed or the mapping
    /// is not one-to-one.
    pub fn from_toml_str(s: &str) -> Result<Self, RegionTableError> {
        let def: RegionTableDef = toml::from_str(s)?;
        Self::new(def.id, def.name, def.regions)
    }

    /// Reads and parses a TOML table file.
    ///
    /// # Errors
    ///
    /// Returns [`RegionTableError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, RegionTableError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The built-in table of Hong Kong's 18 districts.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. It is a compile-time
    /// constant, so a failure is a development error caught by tests.
    #[must_use]
    pub fn hong_kong() -> Self {
        Self::from_toml_str(HONG_KONG_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded Hong Kong region table: {e}"))
    }

    /// Table identifier (e.g. `"hong_kong"`).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// External identifier for a local region name, if known.
    #[must_use]
    pub fn external_id(&self, local_name: &str) -> Option<&str> {
        self.by_local
            .get(local_name)
            .map(|&idx| self.regions[idx].id.as_str())
    }

    /// Local region name for an external identifier, if known.
    #[must_use]
    pub fn local_name(&self, id: &str) -> Option<&str> {
        self.by_id
            .get(id)
            .map(|&idx| self.regions[idx].local_name.as_str())
    }

    /// All entries in definition order.
    #[must_use]
    pub fn regions(&self) -> &[RegionName] {
        &self.regions
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn hong_kong_has_eighteen_districts() {
        let table = RegionNameTable::hong_kong();
        assert_eq!(table.id(), "hong_kong");
        assert_eq!(table.len(), 18);
    }

    #[test]
    fn hong_kong_roundtrip() {
        let table = RegionNameTable::hong_kong();
        for region in table.regions() {
            assert_eq!(table.external_id(&region.local_name), Some(region.id.as_str()));
            assert_eq!(table.local_name(&region.id), Some(region.local_name.as_str()));
        }
    }

    #[test]
    fn hong_kong_ids_are_unique() {
        let table = RegionNameTable::hong_kong();
        let ids: BTreeSet<&str> = table.regions().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), table.len());
    }

    #[test]
    fn known_lookups() {
        let table = RegionNameTable::hong_kong();
        assert_eq!(table.external_id("湾仔区"), Some("Wan Chai"));
        assert_eq!(table.local_name("Islands"), Some("离岛区"));
    }

    #[test]
    fn unknown_lookups() {
        let table = RegionNameTable::hong_kong();
        assert_eq!(table.external_id("Atlantis"), None);
        assert_eq!(table.local_name("Atlantis"), None);
    }

    #[test]
    fn parses_custom_table() {
        let table = RegionNameTable::from_toml_str(
            r#"
            id = "test"
            name = "Test"

            [[regions]]
            id = "A-ext"
            local_name = "A"
            "#,
        )
        .unwrap();
        assert_eq!(table.name(), "Test");
        assert_eq!(table.external_id("A"), Some("A-ext"));
    }

    #[test]
    fn empty_table_is_allowed() {
        let table = RegionNameTable::from_toml_str("id = \"none\"\nname = \"None\"\n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn rejects_duplicate_local_name() {
        let regions = vec![
            RegionName {
                id: "X".to_string(),
                local_name: "A".to_string(),
            },
            RegionName {
                id: "Y".to_string(),
                local_name: "A".to_string(),
            },
        ];
        match RegionNameTable::new("dup", "Dup", regions) {
            Err(RegionTableError::Duplicate { kind, value, .. }) => {
                assert_eq!(kind, "local_name");
                assert_eq!(value, "A");
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            RegionNameTable::from_toml_str("id = "),
            Err(RegionTableError::Parse(_))
        ));
    }
}
