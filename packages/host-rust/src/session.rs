//! A pair of unbound host adapters over one set of fixtures.

use std::sync::Arc;

use lookup_core::{DirectoryResolver, MappingResolver};
use tracing::info;

use crate::config::HostConfig;
use crate::fixtures::{FixtureError, Fixtures, InMemoryDirectory, InMemoryValueMapping};
use crate::host_map::HostAdapter;

/// Entry points handed to host scripts: one directory map and one
/// value-mapping map, both unbound.
#[derive(Debug, Clone)]
pub struct Session {
    pub directory: HostAdapter<DirectoryResolver>,
    pub mapping: HostAdapter<MappingResolver>,
}

impl Session {
    /// Build both services from `fixtures`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidBinary`] if a binary parameter cannot
    /// be decoded.
    pub fn from_fixtures(fixtures: &Fixtures) -> Result<Self, FixtureError> {
        let directory = Arc::new(InMemoryDirectory::from_fixtures(fixtures)?);
        let mapping = Arc::new(InMemoryValueMapping::from_fixtures(fixtures));
        info!(
            partners = fixtures.partners.len(),
            value_mappings = fixtures.value_mappings.len(),
            "lookup session ready"
        );
        Ok(Self {
            directory: HostAdapter::new(DirectoryResolver::new(directory)),
            mapping: HostAdapter::new(MappingResolver::new(mapping)),
        })
    }

    /// Load the fixture file named by `config`, or start empty when none is
    /// configured.
    ///
    /// # Errors
    ///
    /// Propagates any [`FixtureError`] from reading or indexing the file.
    pub fn from_config(config: &HostConfig) -> Result<Self, FixtureError> {
        let fixtures = match &config.fixtures {
            Some(path) => Fixtures::load(path)?,
            None => Fixtures::default(),
        };
        Self::from_fixtures(&fixtures)
    }
}
