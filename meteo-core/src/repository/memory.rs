use async_trait::async_trait;
use std::sync::Mutex;

use crate::{
    error::RepositoryError,
    model::{NewRegion, Region, SEED_REGION_ID},
    validation::name_taken,
};

use super::{RegionRepository, sort_regions};

/// Region store that lives only as long as the process.
///
/// Like the SQLite store it starts with the seed region, and id 1 is never
/// handed out to an added region.
#[derive(Debug)]
pub struct InMemoryRegionRepository {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    next_id: i64,
    regions: Vec<Region>,
}

impl Default for InMemoryRegionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRegionRepository {
    pub fn new() -> Self {
        Self::with_regions(vec![Region::seed()])
    }

    /// Start from existing rows. Ids keep counting after the highest one.
    pub fn with_regions(regions: Vec<Region>) -> Self {
        let next_id = regions
            .iter()
            .map(|r| r.id)
            .max()
            .unwrap_or(0)
            .max(SEED_REGION_ID);
        Self {
            inner: Mutex::new(Inner { next_id, regions }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Backend("region store lock poisoned".to_string()))
    }
}

#[async_trait]
impl RegionRepository for InMemoryRegionRepository {
    async fn get_all(&self) -> Result<Vec<Region>, RepositoryError> {
        let mut regions = self.lock()?.regions.clone();
        sort_regions(&mut regions);
        Ok(regions)
    }

    async fn add(&self, region: NewRegion) -> Result<Region, RepositoryError> {
        let mut inner = self.lock()?;

        if name_taken(&inner.regions, &region.name) {
            return Err(RepositoryError::Conflict(format!(
                "UNIQUE constraint failed: regions.name ({})",
                region.name
            )));
        }

        inner.next_id += 1;
        let stored = region.with_id(inner.next_id);
        inner.regions.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, region: &Region) -> Result<(), RepositoryError> {
        let mut inner = self.lock()?;
        let before = inner.regions.len();
        inner.regions.retain(|r| r.id != region.id);

        if inner.regions.len() == before {
            return Err(RepositoryError::NotFound(region.id));
        }
        Ok(())
    }
}
