//! Location lookup.

use std::collections::HashMap;
use std::path::Path;

use briefing_models::Location;
use briefing_persistence::atomic::read_json;

use crate::error::Result;

/// Resolves a location slug to the location a run is scoped to.
pub trait LocationDirectory: Send + Sync {
    fn find_by_slug(&self, slug: &str) -> Option<Location>;
}

/// In-memory location directory.
#[derive(Debug, Clone, Default)]
pub struct StaticLocations {
    by_slug: HashMap<String, Location>,
}

impl StaticLocations {
    pub fn new(locations: impl IntoIterator<Item = Location>) -> Self {
        Self {
            by_slug: locations
                .into_iter()
                .map(|l| (l.slug.clone(), l))
                .collect(),
        }
    }

    /// Loads a JSON array of locations.
    pub fn load(path: &Path) -> Result<Self> {
        let locations: Vec<Location> = read_json(path)?;
        Ok(Self::new(locations))
    }

    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }

    /// Locations sorted by slug.
    pub fn locations(&self) -> Vec<&Location> {
        let mut all: Vec<&Location> = self.by_slug.values().collect();
        all.sort_by(|a, b| a.slug.cmp(&b.slug));
        all
    }
}

impl LocationDirectory for StaticLocations {
    fn find_by_slug(&self, slug: &str) -> Option<Location> {
        self.by_slug.get(slug).cloned()
    }
}
