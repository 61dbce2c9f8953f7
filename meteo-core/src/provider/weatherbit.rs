use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::model::{ApiLanguage, FORECAST_DAYS, Region, WeatherDay};

use super::{ForecastProvider, truncate_body};

const DEFAULT_BASE_URL: &str = "https://api.weatherbit.io/v2.0";

/// Client for the Weatherbit daily forecast API.
#[derive(Debug, Clone)]
pub struct WeatherbitProvider {
    base_url: String,
    http: Client,
}

impl Default for WeatherbitProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherbitProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WbWeather {
    #[serde(default)]
    icon: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct WbDay {
    valid_date: String,
    temp: f64,
    max_temp: Option<f64>,
    min_temp: Option<f64>,
    #[serde(default)]
    pop: u8,
    #[serde(default)]
    precip: f64,
    #[serde(default)]
    rh: u8,
    #[serde(default)]
    wind_spd: f64,
    #[serde(default)]
    wind_cdir: String,
    weather: WbWeather,
}

#[derive(Debug, Deserialize)]
struct WbForecastResponse {
    data: Vec<WbDay>,
}

impl TryFrom<WbDay> for WeatherDay {
    type Error = anyhow::Error;

    fn try_from(day: WbDay) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&day.valid_date, "%Y-%m-%d")
            .with_context(|| format!("Invalid forecast date '{}'", day.valid_date))?;

        Ok(WeatherDay {
            date,
            temperature_c: day.temp,
            max_temperature_c: day.max_temp.unwrap_or(day.temp),
            min_temperature_c: day.min_temp.unwrap_or(day.temp),
            precipitation_probability_pct: day.pop,
            precipitation_mm: day.precip,
            humidity_pct: day.rh,
            wind_speed_mps: day.wind_spd,
            wind_direction: day.wind_cdir,
            description: day.weather.description,
            icon: day.weather.icon,
        })
    }
}

#[async_trait]
impl ForecastProvider for WeatherbitProvider {
    async fn get_forecast(
        &self,
        region: &Region,
        token: &str,
        language: ApiLanguage,
    ) -> Result<Vec<WeatherDay>> {
        let url = format!("{}/forecast/daily", self.base_url);
        debug!(region = %region.name, lang = %language, "requesting Weatherbit forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", region.latitude.to_string()),
                ("lon", region.longitude.to_string()),
                ("key", token.to_string()),
                ("lang", language.code().to_string()),
                ("days", FORECAST_DAYS.to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to Weatherbit (daily forecast)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Weatherbit forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Weatherbit forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: WbForecastResponse =
            serde_json::from_str(&body).context("Failed to parse Weatherbit forecast JSON")?;

        parsed
            .data
            .into_iter()
            .take(FORECAST_DAYS)
            .map(WeatherDay::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn region() -> Region {
        Region { id: 3, name: "Trois-Rivières".into(), latitude: 46.35, longitude: -72.55 }
    }

    fn day(date: &str, temp: f64) -> serde_json::Value {
        json!({
            "valid_date": date,
            "temp": temp,
            "max_temp": temp + 4.0,
            "min_temp": temp - 3.0,
            "pop": 40,
            "precip": 1.5,
            "rh": 71,
            "wind_spd": 3.2,
            "wind_cdir": "NO",
            "weather": { "icon": "r01d", "code": 500, "description": "Pluie légère" }
        })
    }

    #[tokio::test]
    async fn sends_coordinates_token_and_language() {
        let server = MockServer::start().await;
        let days: Vec<_> = (1..=7).map(|d| day(&format!("2026-10-{:02}", d + 19), d as f64)).collect();

        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .and(query_param("lat", "46.35"))
            .and(query_param("lon", "-72.55"))
            .and(query_param("key", "secret"))
            .and(query_param("lang", "fr"))
            .and(query_param("days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "city_name": "Trois-Rivières", "data": days })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = WeatherbitProvider::with_base_url(server.uri());
        let forecast = provider.get_forecast(&region(), "secret", ApiLanguage::French).await.unwrap();

        assert_eq!(forecast.len(), FORECAST_DAYS);
        let first = &forecast[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        assert_eq!(first.max_temperature_c, 5.0);
        assert_eq!(first.min_temperature_c, -2.0);
        assert_eq!(first.precipitation_probability_pct, 40);
        assert_eq!(first.description, "Pluie légère");
        assert_eq!(first.icon, "r01d");
    }

    #[tokio::test]
    async fn extra_days_are_dropped() {
        let server = MockServer::start().await;
        let days: Vec<_> = (1..=10).map(|d| day(&format!("2026-11-{d:02}"), 0.0)).collect();

        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": days })))
            .mount(&server)
            .await;

        let provider = WeatherbitProvider::with_base_url(format!("{}/", server.uri()));
        let forecast = provider.get_forecast(&region(), "k", ApiLanguage::English).await.unwrap();

        assert_eq!(forecast.len(), FORECAST_DAYS);
    }

    #[tokio::test]
    async fn http_errors_carry_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .respond_with(ResponseTemplate::new(403).set_body_string("{\"error\":\"API key not valid\"}"))
            .mount(&server)
            .await;

        let provider = WeatherbitProvider::with_base_url(server.uri());
        let err = provider.get_forecast(&region(), "bad", ApiLanguage::French).await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("403"), "{msg}");
        assert!(msg.contains("API key not valid"), "{msg}");
    }

    #[tokio::test]
    async fn malformed_json_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = WeatherbitProvider::with_base_url(server.uri());
        let err = provider.get_forecast(&region(), "k", ApiLanguage::French).await.unwrap_err();

        assert!(err.to_string().contains("Failed to parse Weatherbit forecast JSON"));
    }

    #[tokio::test]
    async fn missing_min_max_fall_back_to_average() {
        let server = MockServer::start().await;
        let body = json!({
            "data": [{
                "valid_date": "2026-10-19",
                "temp": 8.5,
                "max_temp": null,
                "weather": { "icon": "c01d", "description": "Clear sky" }
            }]
        });

        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let provider = WeatherbitProvider::with_base_url(server.uri());
        let forecast = provider.get_forecast(&region(), "k", ApiLanguage::English).await.unwrap();

        assert_eq!(forecast[0].max_temperature_c, 8.5);
        assert_eq!(forecast[0].min_temperature_c, 8.5);
        assert_eq!(forecast[0].wind_direction, "");
    }
}
