//! View-model for the settings dialog.
//!
//! It only captures values. Saving and cancelling both close the dialog; the
//! caller decides what to do with the captured token and language.

use std::sync::Arc;

use crate::{
    config::Config,
    view::{MeteoView, Property},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Saved,
    Cancelled,
}

pub struct ConfigurationViewModel {
    token: String,
    language: Option<String>,
    request_close: Box<dyn FnMut(DialogOutcome) + Send>,
    view: Option<Arc<dyn MeteoView>>,
}

impl ConfigurationViewModel {
    pub fn new(request_close: impl FnMut(DialogOutcome) + Send + 'static) -> Self {
        Self {
            token: String::new(),
            language: None,
            request_close: Box::new(request_close),
            view: None,
        }
    }

    /// Pre-fill the dialog from the current settings.
    pub fn with_config(mut self, cfg: &Config) -> Self {
        self.token = cfg.token.clone().unwrap_or_default();
        self.language = Some(cfg.language.clone());
        self
    }

    pub fn with_view(mut self, view: Arc<dyn MeteoView>) -> Self {
        self.view = Some(view);
        self
    }

    fn notify(&self, property: Property) {
        if let Some(view) = &self.view {
            view.property_changed(property);
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = token.into();
        self.notify(Property::Token);
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn set_language(&mut self, language: Option<String>) {
        self.language = language;
        self.notify(Property::Language);
    }

    pub fn save(&mut self) -> DialogOutcome {
        (self.request_close)(DialogOutcome::Saved);
        DialogOutcome::Saved
    }

    pub fn cancel(&mut self) -> DialogOutcome {
        (self.request_close)(DialogOutcome::Cancelled);
        DialogOutcome::Cancelled
    }
}
