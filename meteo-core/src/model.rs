use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Id of the default region created with the store. It can never be deleted.
pub const SEED_REGION_ID: i64 = 1;

const SEED_NAME: &str = "Québec";
const SEED_LATITUDE: f64 = 46.8139;
const SEED_LONGITUDE: f64 = -71.2080;

/// Number of daily forecasts requested for a region.
pub const FORECAST_DAYS: usize = 7;

/// A named geographic point used as a forecast query key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Region {
    /// The default region every new store starts with.
    pub fn seed() -> Self {
        Region {
            id: SEED_REGION_ID,
            name: SEED_NAME.to_string(),
            latitude: SEED_LATITUDE,
            longitude: SEED_LONGITUDE,
        }
    }

    pub fn is_seed(&self) -> bool {
        self.id == SEED_REGION_ID
    }
}

/// A validated region that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRegion {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl NewRegion {
    pub fn with_id(self, id: i64) -> Region {
        Region {
            id,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// One day of forecast data. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    pub temperature_c: f64,
    pub max_temperature_c: f64,
    pub min_temperature_c: f64,
    pub precipitation_probability_pct: u8,
    pub precipitation_mm: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub wind_direction: String,
    pub description: String,
    pub icon: String,
}

/// Language sent to the weather API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiLanguage {
    #[default]
    French,
    English,
}

impl ApiLanguage {
    /// Map a user preference such as "fr-CA" or "en-US" to an API language.
    /// Anything that is not English falls back to French.
    pub fn from_preference(preference: &str) -> Self {
        let prefix: String = preference.trim().chars().take(2).collect();
        if prefix.eq_ignore_ascii_case("en") {
            ApiLanguage::English
        } else {
            ApiLanguage::French
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiLanguage::French => "fr",
            ApiLanguage::English => "en",
        }
    }
}

impl std::fmt::Display for ApiLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
