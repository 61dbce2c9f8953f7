use thiserror::Error;

/// Rejected form input. Nothing is written when one of these is raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Latitude and longitude must be decimal numbers (e.g. 46.81 or 46,81).")]
    InvalidCoordinates,

    #[error("Latitude must be between -90 and 90 and longitude between -180 and 180.")]
    CoordinatesOutOfRange,

    #[error("Region name cannot be empty.")]
    EmptyName,

    #[error("A region named '{0}' already exists.")]
    DuplicateName(String),
}

/// Failures reported by a [`crate::RegionRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Unique constraint violation in the backing store.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("no region with id {0}")]
    NotFound(i64),

    #[error("{0}")]
    Backend(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                RepositoryError::Conflict(err.to_string())
            }
            _ => RepositoryError::Backend(err.to_string()),
        }
    }
}

/// Everything a view-model command can fail with.
///
/// Each variant ends the current operation only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeteoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("This region name is already used.")]
    NameAlreadyUsed,

    #[error("The default region cannot be deleted.")]
    SeedRegionProtected,

    #[error("No Weatherbit API token is configured. Run `meteo configure` first.")]
    MissingToken,

    #[error("{0}")]
    Persistence(String),

    #[error("{0}")]
    Forecast(String),
}

impl From<RepositoryError> for MeteoError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(_) => MeteoError::NameAlreadyUsed,
            other => MeteoError::Persistence(other.to_string()),
        }
    }
}
