//! State and commands behind the region/forecast screen.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{MeteoError, ValidationError},
    model::{ApiLanguage, Region, WeatherDay},
    provider::ForecastProvider,
    repository::{RegionRepository, sort_regions},
    validation::{name_taken, validate_region},
    view::{Alert, MeteoView, Property},
};

/// Token and language used for forecast requests.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSettings {
    pub token: Option<String>,
    pub language: ApiLanguage,
    /// Fetch the forecast whenever the selection changes.
    pub fetch_on_select: bool,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            token: None,
            language: ApiLanguage::default(),
            fetch_on_select: true,
        }
    }
}

impl From<&Config> for ForecastSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            token: cfg.token().map(str::to_string),
            language: cfg.api_language(),
            ..Self::default()
        }
    }
}

impl ForecastSettings {
    fn usable_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(Region),
    /// The user answered "no" to the confirmation.
    Declined,
    NothingSelected,
}

pub struct MeteoViewModel {
    repository: Arc<dyn RegionRepository>,
    provider: Arc<dyn ForecastProvider>,
    view: Arc<dyn MeteoView>,
    settings: ForecastSettings,

    regions: Vec<Region>,
    selected: Option<Region>,
    add_mode: bool,
    name: String,
    latitude: String,
    longitude: String,
    forecasts: Vec<WeatherDay>,
}

impl MeteoViewModel {
    /// Read the stored regions and start in add mode with nothing selected.
    pub async fn load(
        repository: Arc<dyn RegionRepository>,
        provider: Arc<dyn ForecastProvider>,
        view: Arc<dyn MeteoView>,
        settings: ForecastSettings,
    ) -> Result<Self, MeteoError> {
        let regions = repository.get_all().await?;
        debug!(count = regions.len(), "view-model loaded");

        Ok(Self {
            repository,
            provider,
            view,
            settings,
            regions,
            selected: None,
            add_mode: true,
            name: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            forecasts: Vec::new(),
        })
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn selected(&self) -> Option<&Region> {
        self.selected.as_ref()
    }

    pub fn add_mode(&self) -> bool {
        self.add_mode
    }

    pub fn forecasts(&self) -> &[WeatherDay] {
        &self.forecasts
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
        self.view.property_changed(Property::Name);
    }

    pub fn set_latitude(&mut self, value: impl Into<String>) {
        self.latitude = value.into();
        self.view.property_changed(Property::Latitude);
    }

    pub fn set_longitude(&mut self, value: impl Into<String>) {
        self.longitude = value.into();
        self.view.property_changed(Property::Longitude);
    }

    fn set_add_mode(&mut self, value: bool) {
        self.add_mode = value;
        self.view.property_changed(Property::AddMode);
    }

    fn clear_form(&mut self) {
        self.set_name("");
        self.set_latitude("");
        self.set_longitude("");
    }

    /// Show the error to the user and hand it back to the caller.
    fn report(&self, err: MeteoError) -> MeteoError {
        warn!(error = %err, "operation failed");
        self.view.alert(&Alert::from(&err));
        err
    }

    /// Start entering a new region.
    pub async fn new_region(&mut self) {
        // Clearing the selection never fetches a forecast.
        let _ = self.select(None).await;
        self.clear_form();
        self.set_add_mode(true);
    }

    /// Change the selected region and load its forecast.
    ///
    /// Forecast failures are already shown through the view when this returns
    /// an error.
    pub async fn select(&mut self, region: Option<Region>) -> Result<(), MeteoError> {
        self.selected = region;
        self.view.property_changed(Property::SelectedRegion);
        self.set_add_mode(self.selected.is_none());

        if !self.settings.fetch_on_select {
            return Ok(());
        }
        self.load_forecast().await
    }

    /// Fetch the forecast for the selected region, replacing the current list.
    pub async fn load_forecast(&mut self) -> Result<(), MeteoError> {
        let Some(region) = self.selected.as_ref() else {
            return Ok(());
        };

        let Some(token) = self.settings.usable_token() else {
            return Err(self.report(MeteoError::MissingToken));
        };

        match self
            .provider
            .get_forecast(region, token, self.settings.language)
            .await
        {
            Ok(days) => {
                debug!(region = %region.name, days = days.len(), "forecast loaded");
                self.forecasts = days;
                self.view.property_changed(Property::Forecasts);
                Ok(())
            }
            Err(e) => Err(self.report(MeteoError::Forecast(format!("{e:#}")))),
        }
    }

    /// Validate the form and store a new region.
    pub async fn add(&mut self) -> Result<Region, MeteoError> {
        let new_region = match validate_region(&self.name, &self.latitude, &self.longitude) {
            Ok(region) => region,
            Err(e) => return Err(self.report(e.into())),
        };

        if name_taken(&self.regions, &new_region.name) {
            let err = ValidationError::DuplicateName(new_region.name);
            return Err(self.report(err.into()));
        }

        let region = match self.repository.add(new_region).await {
            Ok(region) => region,
            Err(e) => return Err(self.report(e.into())),
        };
        info!(id = region.id, name = %region.name, "region added");

        self.regions.push(region.clone());
        sort_regions(&mut self.regions);
        self.view.property_changed(Property::Regions);

        self.clear_form();
        self.view.alert(&Alert::info(
            "Information",
            format!("Region '{}' added.", region.name),
        ));

        Ok(region)
    }

    /// Delete the selected region after asking the user.
    pub async fn delete(&mut self) -> Result<DeleteOutcome, MeteoError> {
        let Some(target) = self.selected.clone() else {
            return Ok(DeleteOutcome::NothingSelected);
        };

        if target.is_seed() {
            return Err(self.report(MeteoError::SeedRegionProtected));
        }

        let question = format!("Delete region '{}'?", target.name);
        if !self.view.confirm(&question) {
            debug!(name = %target.name, "deletion declined");
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(e) = self.repository.delete(&target).await {
            return Err(self.report(e.into()));
        }
        info!(id = target.id, name = %target.name, "region deleted");

        self.regions.retain(|r| r.id != target.id);
        self.view.property_changed(Property::Regions);

        // A forecast failure for the next region has been shown already and
        // does not undo the deletion.
        let next = self.regions.first().cloned();
        let _ = self.select(next).await;

        self.view.alert(&Alert::info(
            "Information",
            format!("Region '{}' deleted.", target.name),
        ));

        Ok(DeleteOutcome::Deleted(target))
    }
}
