//! Core library for the `meteo` regional weather tracker.
//!
//! This crate defines:
//! - Region storage behind the [`RegionRepository`] trait (SQLite and in-memory)
//! - The Weatherbit forecast client behind [`ForecastProvider`]
//! - The view-models driving the region screen and the settings dialog
//! - Configuration & credentials handling
//!
//! It is used by `meteo-cli`, but any front end that implements [`MeteoView`]
//! can drive it.

pub mod config;
pub mod configuration;
pub mod error;
pub mod model;
pub mod provider;
pub mod repository;
pub mod validation;
pub mod view;
pub mod view_model;

pub use config::Config;
pub use configuration::{ConfigurationViewModel, DialogOutcome};
pub use error::{MeteoError, RepositoryError, ValidationError};
pub use model::{ApiLanguage, FORECAST_DAYS, NewRegion, Region, SEED_REGION_ID, WeatherDay};
pub use provider::{ForecastProvider, WeatherbitProvider};
pub use repository::{InMemoryRegionRepository, RegionRepository, SqliteRegionRepository};
pub use view::{Alert, MeteoView, Property, Severity};
pub use view_model::{DeleteOutcome, ForecastSettings, MeteoViewModel};
