use crate::{
    error::RepositoryError,
    model::{NewRegion, Region},
};
use async_trait::async_trait;
use std::{cmp::Ordering, fmt::Debug};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRegionRepository;
pub use sqlite::SqliteRegionRepository;

/// Persistent store of regions.
///
/// Implementations must reject a second region whose name matches an existing
/// one case-insensitively with [`RepositoryError::Conflict`].
#[async_trait]
pub trait RegionRepository: Send + Sync + Debug {
    /// All stored regions, ordered by name.
    async fn get_all(&self) -> Result<Vec<Region>, RepositoryError>;

    /// Persist a new region and return it with its assigned id.
    async fn add(&self, region: NewRegion) -> Result<Region, RepositoryError>;

    async fn delete(&self, region: &Region) -> Result<(), RepositoryError>;
}

/// Lowercased name with accents removed, so "Île" sorts with "I".
pub fn sort_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Alphabetical order used for region lists: accent- and case-insensitive
/// first, exact name as the tie-breaker.
pub fn compare_names(a: &Region, b: &Region) -> Ordering {
    sort_key(&a.name)
        .cmp(&sort_key(&b.name))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

pub fn sort_regions(regions: &mut [Region]) {
    regions.sort_by(compare_names);
}
