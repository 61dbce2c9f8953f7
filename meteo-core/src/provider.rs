use crate::model::{ApiLanguage, Region, WeatherDay};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherbit;

pub use weatherbit::WeatherbitProvider;

/// Source of daily forecasts for a region.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn get_forecast(
        &self,
        region: &Region,
        token: &str,
        language: ApiLanguage,
    ) -> anyhow::Result<Vec<WeatherDay>>;
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
