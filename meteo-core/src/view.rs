//! Port between the view-models and whatever renders them.

use crate::error::{MeteoError, ValidationError};

/// Observable view-model state. Sent to [`MeteoView::property_changed`]
/// whenever the matching value is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Regions,
    SelectedRegion,
    AddMode,
    Name,
    Latitude,
    Longitude,
    Forecasts,
    Token,
    Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A blocking message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { severity: Severity::Info, title: title.into(), message: message.into() }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, title: title.into(), message: message.into() }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, title: title.into(), message: message.into() }
    }
}

impl From<&MeteoError> for Alert {
    fn from(err: &MeteoError) -> Self {
        let message = err.to_string();
        match err {
            MeteoError::Validation(ValidationError::InvalidCoordinates) => {
                Alert::warning("Invalid values", message)
            }
            MeteoError::Validation(ValidationError::CoordinatesOutOfRange) => {
                Alert::warning("Values out of range", message)
            }
            MeteoError::Validation(_) => Alert::warning("Information", message),
            MeteoError::NameAlreadyUsed => Alert::warning("Name already used", message),
            MeteoError::SeedRegionProtected => Alert::warning("Action refused", message),
            MeteoError::MissingToken => Alert::warning("Error", message),
            MeteoError::Persistence(_) => Alert::error("Database error", message),
            MeteoError::Forecast(_) => Alert::error("Error", message),
        }
    }
}

/// Rendering side of the application: dialogs plus change notifications.
pub trait MeteoView: Send + Sync {
    fn alert(&self, alert: &Alert);

    /// Ask a yes/no question. `true` means the user agreed.
    fn confirm(&self, question: &str) -> bool;

    fn property_changed(&self, _property: Property) {}
}
