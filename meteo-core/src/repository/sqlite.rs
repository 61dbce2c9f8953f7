use async_trait::async_trait;
use rusqlite::{Connection, params};
use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::{debug, info};

use crate::{
    error::RepositoryError,
    model::{NewRegion, Region},
};

use super::{RegionRepository, sort_regions};

/// SQLite-backed region store.
///
/// Uniqueness is enforced on `name_key`, the lowercased name, so the database
/// itself rejects names that differ only by case (including non-ASCII letters).
#[derive(Debug, Clone)]
pub struct SqliteRegionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRegionRepository {
    /// Open (or create) the database file and make sure the schema and seed
    /// region exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                RepositoryError::Backend(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        debug!(path = %path.display(), "opening region database");
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS regions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                name_key TEXT NOT NULL UNIQUE,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL
            )",
            [],
        )?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM regions", [], |row| row.get(0))?;
        if count == 0 {
            let seed = Region::seed();
            conn.execute(
                "INSERT INTO regions (id, name, name_key, latitude, longitude)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    seed.id,
                    seed.name,
                    seed.name.to_lowercase(),
                    seed.latitude,
                    seed.longitude
                ],
            )?;
            info!(name = %seed.name, "seeded default region");
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Backend("database connection lock poisoned".to_string()))
    }
}

#[async_trait]
impl RegionRepository for SqliteRegionRepository {
    async fn get_all(&self) -> Result<Vec<Region>, RepositoryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, latitude, longitude FROM regions")?;

        let mut regions = stmt
            .query_map([], |row| {
                Ok(Region {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    latitude: row.get(2)?,
                    longitude: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        sort_regions(&mut regions);

        debug!(count = regions.len(), "loaded regions");
        Ok(regions)
    }

    async fn add(&self, region: NewRegion) -> Result<Region, RepositoryError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO regions (name, name_key, latitude, longitude) VALUES (?1, ?2, ?3, ?4)",
            params![
                region.name,
                region.name.to_lowercase(),
                region.latitude,
                region.longitude
            ],
        )?;

        Ok(region.with_id(conn.last_insert_rowid()))
    }

    async fn delete(&self, region: &Region) -> Result<(), RepositoryError> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM regions WHERE id = ?1", params![region.id])?;

        if affected == 0 {
            return Err(RepositoryError::NotFound(region.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SEED_REGION_ID;

    fn new_region(name: &str) -> NewRegion {
        NewRegion { name: name.into(), latitude: 45.4, longitude: -71.9 }
    }

    #[tokio::test]
    async fn fresh_database_contains_seed_region() {
        let repo = SqliteRegionRepository::open_in_memory().unwrap();
        let regions = repo.get_all().await.unwrap();

        assert_eq!(regions.len(), 1);
        assert!(regions[0].is_seed());
        assert_eq!(regions[0], Region::seed());
    }

    #[tokio::test]
    async fn added_regions_get_new_ids_and_come_back_sorted() {
        let repo = SqliteRegionRepository::open_in_memory().unwrap();
        let sherbrooke = repo.add(new_region("Sherbrooke")).await.unwrap();
        repo.add(new_region("alma")).await.unwrap();

        assert!(sherbrooke.id > SEED_REGION_ID);

        let names: Vec<_> = repo.get_all().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["alma", "Québec", "Sherbrooke"]);
    }

    #[tokio::test]
    async fn unique_constraint_is_case_insensitive() {
        let repo = SqliteRegionRepository::open_in_memory().unwrap();

        let err = repo.add(new_region("QUÉBEC")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)), "{err:?}");
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_row_and_reports_missing_ids() {
        let repo = SqliteRegionRepository::open_in_memory().unwrap();
        let laval = repo.add(new_region("Laval")).await.unwrap();

        repo.delete(&laval).await.unwrap();
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
        assert_eq!(repo.delete(&laval).await, Err(RepositoryError::NotFound(laval.id)));
    }

    #[tokio::test]
    async fn accented_names_sort_with_their_base_letter() {
        let repo = SqliteRegionRepository::open_in_memory().unwrap();
        for name in ["Zurich", "Île-d'Orléans", "Joliette", "Évain", "Fermont"] {
            repo.add(new_region(name)).await.unwrap();
        }

        let names: Vec<_> = repo.get_all().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["Évain", "Fermont", "Île-d'Orléans", "Joliette", "Québec", "Zurich"]);
    }

    #[tokio::test]
    async fn data_survives_reopening_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("regions.db");

        {
            let repo = SqliteRegionRepository::open(&path).unwrap();
            repo.add(new_region("Rimouski")).await.unwrap();
        }

        let repo = SqliteRegionRepository::open(&path).unwrap();
        let names: Vec<_> = repo.get_all().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["Québec", "Rimouski"]);
    }
}
