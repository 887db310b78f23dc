mod settings;

use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use charter_catalog::Catalog;
use charter_core::{
    prepare_dispatch, BookingDraft, BookingSummary, BookingWizard, CharterConfig, Dispatch,
    SelectionError, Step, SubmitError, ValidationErrors,
};
use charter_observability::DeskMetrics;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub use settings::{DeskSettings, DEFAULT_ASSETS_ROOT};

/// Hands the finished deep link to whatever the platform uses to open it.
pub trait LinkOpener {
    fn open(&self, link: &str) -> io::Result<()>;
}

#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("failed opening booking link: {0}")]
    Open(#[source] io::Error),
}

#[derive(Clone)]
pub struct BookingDesk {
    catalog: Arc<Catalog>,
    config: Arc<CharterConfig>,
    metrics: Arc<DeskMetrics>,
}

impl BookingDesk {
    pub fn new(catalog: Arc<Catalog>, config: Arc<CharterConfig>, metrics: Arc<DeskMetrics>) -> Self {
        Self {
            catalog,
            config,
            metrics,
        }
    }

    #[instrument(skip(settings, metrics))]
    pub fn from_settings(settings: &DeskSettings, metrics: Arc<DeskMetrics>) -> Result<Self> {
        let config = settings.load_config()?;
        let catalog = settings.load_catalog(&config)?;

        let stats = catalog.stats();
        info!(
            source = ?stats.source,
            vessels = stats.vessels,
            helicopters = stats.helicopters,
            images = stats.images,
            "booking desk ready"
        );

        Ok(Self::new(Arc::new(catalog), Arc::new(config), metrics))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &CharterConfig {
        &self.config
    }

    pub fn metrics(&self) -> &DeskMetrics {
        &self.metrics
    }

    #[instrument(skip(self))]
    pub fn start_session(&self, preselected: Option<&str>) -> BookingSession {
        self.metrics.inc_session();

        let catalog: Arc<Catalog> = self.catalog.clone();
        let wizard = BookingWizard::with_preselected(self.config.clone(), catalog, preselected);
        let session = BookingSession {
            id: Uuid::new_v4(),
            started: Instant::now(),
            wizard,
            metrics: self.metrics.clone(),
        };

        if preselected.is_some() && session.wizard.draft().vessel.is_none() {
            warn!(session_id = %session.id, "preselected vessel not in catalog; ignored");
        }
        info!(session_id = %session.id, "booking session started");
        session
    }

    /// One-shot path for a draft assembled elsewhere, e.g. loaded from a file.
    #[instrument(skip(self, draft, opener))]
    pub fn dispatch_draft(
        &self,
        draft: &BookingDraft,
        opener: &dyn LinkOpener,
    ) -> Result<Dispatch, DeskError> {
        let dispatch = prepare_dispatch(draft, &self.config).map_err(|errors| {
            self.metrics.add_validation_failures(errors.len());
            warn!(fields = ?errors.fields(), "draft rejected");
            SubmitError::from(errors)
        })?;

        opener.open(&dispatch.link).map_err(DeskError::Open)?;
        self.metrics.inc_dispatch();
        info!(vessel = ?draft.vessel.as_ref().map(|vessel| &vessel.id), "draft dispatched");
        Ok(dispatch)
    }
}

/// A wizard run tagged with a session id for logs and counted in the desk metrics.
pub struct BookingSession {
    id: Uuid,
    started: Instant,
    wizard: BookingWizard,
    metrics: Arc<DeskMetrics>,
}

impl BookingSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> Step {
        self.wizard.step()
    }

    pub fn wizard(&self) -> &BookingWizard {
        &self.wizard
    }

    /// Free-text and checkbox edits go straight to the wizard.
    pub fn wizard_mut(&mut self) -> &mut BookingWizard {
        &mut self.wizard
    }

    pub fn summary(&self) -> BookingSummary {
        self.wizard.summary()
    }

    pub fn select_vessel(&mut self, id: &str) -> Result<(), SelectionError> {
        let result = self.wizard.select_vessel(id);
        self.record_selection("vessel", &result);
        result
    }

    pub fn select_tier(&mut self, tier: &str) -> Result<(), SelectionError> {
        let result = self.wizard.select_tier(tier);
        self.record_selection("tier", &result);
        result
    }

    pub fn select_charter(&mut self, location: &str, duration: &str) -> Result<String, SelectionError> {
        let result = self.wizard.select_charter(location, duration);
        self.record_selection("charter", &result);
        result
    }

    pub fn select_helicopter_service(
        &mut self,
        location: &str,
        service: &str,
    ) -> Result<String, SelectionError> {
        let result = self.wizard.select_helicopter_service(location, service);
        self.record_selection("helicopter_service", &result);
        result
    }

    pub fn next(&mut self) -> Result<Step, ValidationErrors> {
        let from = self.wizard.step();
        match self.wizard.next() {
            Ok(to) => {
                if to != from {
                    self.metrics.inc_transition();
                }
                info!(session_id = %self.id, from = %from, to = %to, "step advanced");
                Ok(to)
            }
            Err(errors) => {
                self.metrics.add_validation_failures(errors.len());
                info!(
                    session_id = %self.id,
                    step = %from,
                    fields = ?errors.fields(),
                    "step blocked by validation"
                );
                Err(errors)
            }
        }
    }

    pub fn back(&mut self) -> Step {
        let from = self.wizard.step();
        let to = self.wizard.back();
        if to != from {
            self.metrics.inc_transition();
        }
        info!(session_id = %self.id, from = %from, to = %to, "step back");
        to
    }

    #[instrument(skip(self, opener), fields(session_id = %self.id))]
    pub fn submit(&self, opener: &dyn LinkOpener) -> Result<Dispatch, DeskError> {
        let dispatch = self.wizard.submit().map_err(|error| {
            if let SubmitError::Invalid(errors) = &error {
                self.metrics.add_validation_failures(errors.len());
            }
            warn!(%error, "submit rejected");
            error
        })?;

        opener.open(&dispatch.link).map_err(DeskError::Open)?;
        self.metrics.inc_dispatch();
        self.metrics.observe_booking_time(self.started.elapsed());
        info!(
            vessel = ?self.wizard.draft().vessel.as_ref().map(|vessel| &vessel.id),
            charter = %self.wizard.draft().charter,
            "booking dispatched"
        );
        Ok(dispatch)
    }

    fn record_selection<T>(&self, what: &'static str, result: &Result<T, SelectionError>) {
        if let Err(error) = result {
            self.metrics.inc_selection_error();
            info!(session_id = %self.id, selection = what, %error, "selection rejected");
        }
    }
}
