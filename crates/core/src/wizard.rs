use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CharterConfig;
use crate::message::{prepare_dispatch, Dispatch};
use crate::models::{set_membership, BookingDraft, SelectedVessel, Vessel, VesselDirectory, VesselKind};
use crate::pricing::{CharterKey, TierPrices};
use crate::summary::BookingSummary;
use crate::validation::{validate_catalog_config, validate_guest_details, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductLine {
    Yacht,
    Helicopter,
}

impl From<VesselKind> for ProductLine {
    fn from(kind: VesselKind) -> Self {
        match kind {
            VesselKind::Catamaran => Self::Yacht,
            VesselKind::Helicopter => Self::Helicopter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogStage {
    /// No vessel chosen yet; the catalog list is shown.
    Browsing,
    Configuring(ProductLine),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    GuestDetails,
    CatalogConfig { stage: CatalogStage },
    PersonalRequest,
    Summary { product: ProductLine },
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Self::GuestDetails => 1,
            Self::CatalogConfig { .. } => 2,
            Self::PersonalRequest => 3,
            Self::Summary { .. } => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::GuestDetails => "Guest Details",
            Self::CatalogConfig { .. } => "Yacht Catalog",
            Self::PersonalRequest => "Personal Request",
            Self::Summary { .. } => "Order Summary",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/4 {}", self.number(), self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no vessel with id `{0}` in the catalog")]
    UnknownVessel(String),
    #[error("choose a vessel first")]
    NoVessel,
    #[error("`{0}` is not a charter tier")]
    UnknownTier(String),
    #[error("choose a charter tier first")]
    NoTier,
    #[error("{location} offers no `{duration}` for the {tier}")]
    UnknownPackage {
        location: String,
        tier: String,
        duration: String,
    },
    #[error("{location} offers no helicopter service `{service}`")]
    UnknownService { location: String, service: String },
    #[error("cannot {operation} for a {product:?} booking")]
    WrongProduct {
        operation: &'static str,
        product: ProductLine,
    },
    #[error("cannot {operation} on step {step}")]
    WrongStep { operation: &'static str, step: Step },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("the booking can only be sent from the summary step (currently {0})")]
    NotOnSummary(Step),
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

/// Four-step booking flow over one in-memory draft.
///
/// Guest details → catalog & configuration → personal request → summary.
/// Helicopter bookings go straight from the catalog step to the summary.
pub struct BookingWizard {
    config: Arc<CharterConfig>,
    directory: Arc<dyn VesselDirectory>,
    step: Step,
    draft: BookingDraft,
}

impl BookingWizard {
    pub fn new(config: Arc<CharterConfig>, directory: Arc<dyn VesselDirectory>) -> Self {
        Self {
            config,
            directory,
            step: Step::GuestDetails,
            draft: BookingDraft::new(),
        }
    }

    /// Arriving from a vessel's detail page pre-seeds that vessel. Unknown ids are ignored.
    pub fn with_preselected(
        config: Arc<CharterConfig>,
        directory: Arc<dyn VesselDirectory>,
        vessel_id: Option<&str>,
    ) -> Self {
        let mut wizard = Self::new(config, directory);
        if let Some(vessel) = vessel_id.and_then(|id| wizard.directory.find_vessel(id)) {
            wizard.draft.vessel = Some(SelectedVessel::from(vessel));
        }
        wizard
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn config(&self) -> &CharterConfig {
        &self.config
    }

    pub fn vessels(&self) -> &[Vessel] {
        self.directory.vessels()
    }

    pub fn selected_vessel(&self) -> Option<&Vessel> {
        let selected = self.draft.vessel.as_ref()?;
        self.directory.find_vessel(&selected.id)
    }

    pub fn product_line(&self) -> Option<ProductLine> {
        self.draft
            .vessel
            .as_ref()
            .map(|vessel| ProductLine::from(vessel.kind))
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.draft.name = value.into();
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.draft.phone = value.into();
    }

    pub fn set_date(&mut self, value: impl Into<String>) {
        self.draft.date = value.into();
    }

    pub fn set_passengers(&mut self, value: impl Into<String>) {
        self.draft.passengers = value.into();
    }

    pub fn select_vessel(&mut self, id: &str) -> Result<(), SelectionError> {
        self.require_catalog_step("select a vessel")?;
        let vessel = self
            .directory
            .find_vessel(id)
            .map(SelectedVessel::from)
            .ok_or_else(|| SelectionError::UnknownVessel(id.to_string()))?;

        let unchanged = self
            .draft
            .vessel
            .as_ref()
            .is_some_and(|current| current.id == vessel.id);
        if !unchanged {
            self.clear_vessel();
            self.draft.vessel = Some(vessel);
        }
        self.step = self.catalog_step();
        Ok(())
    }

    /// Picking a tier resets any previously chosen package.
    pub fn select_tier(&mut self, tier: &str) -> Result<(), SelectionError> {
        self.require_catalog_step("choose a charter tier")?;
        self.require_product(ProductLine::Yacht, "choose a charter tier")?;
        if !self.config.charters.has_tier(tier) {
            return Err(SelectionError::UnknownTier(tier.to_string()));
        }

        self.draft.tier = Some(tier.to_string());
        self.draft.charter.clear();
        Ok(())
    }

    /// Price tables per location for the selected tier.
    pub fn tier_prices(&self) -> Vec<TierPrices<'_>> {
        match &self.draft.tier {
            Some(tier) => self.config.charters.prices_for_tier(tier),
            None => Vec::new(),
        }
    }

    /// Writes `location|tier|duration` into the draft and returns the price.
    pub fn select_charter(&mut self, location: &str, duration: &str) -> Result<String, SelectionError> {
        self.require_catalog_step("choose a charter package")?;
        self.require_product(ProductLine::Yacht, "choose a charter package")?;
        let tier = self.draft.tier.clone().ok_or(SelectionError::NoTier)?;

        let price = self
            .config
            .charters
            .lookup(location, &tier, duration)
            .map(str::to_string)
            .ok_or_else(|| SelectionError::UnknownPackage {
                location: location.to_string(),
                tier: tier.clone(),
                duration: duration.to_string(),
            })?;

        self.draft.charter = CharterKey::Yacht {
            location: location.to_string(),
            tier,
            duration: duration.to_string(),
        }
        .encode();
        Ok(price)
    }

    /// Writes `location|service` and takes the service's pickup point as destination.
    pub fn select_helicopter_service(
        &mut self,
        location: &str,
        service: &str,
    ) -> Result<String, SelectionError> {
        self.require_catalog_step("choose a helicopter service")?;
        self.require_product(ProductLine::Helicopter, "choose a helicopter service")?;

        let entry = self
            .config
            .helicopter
            .lookup(location, service)
            .cloned()
            .ok_or_else(|| SelectionError::UnknownService {
                location: location.to_string(),
                service: service.to_string(),
            })?;

        self.draft.charter = CharterKey::Helicopter {
            location: location.to_string(),
            service: service.to_string(),
        }
        .encode();
        self.draft.destination = entry.pickup;
        Ok(entry.price)
    }

    pub fn select_destination(&mut self, value: impl Into<String>) -> Result<(), SelectionError> {
        if self.draft.is_helicopter() {
            return Err(SelectionError::WrongProduct {
                operation: "choose a destination",
                product: ProductLine::Helicopter,
            });
        }
        self.draft.destination = value.into();
        Ok(())
    }

    pub fn toggle_food(&mut self, item: &str, checked: bool) {
        set_membership(&mut self.draft.food, item, checked);
    }

    pub fn toggle_drink(&mut self, item: &str, checked: bool) {
        set_membership(&mut self.draft.drinks, item, checked);
    }

    pub fn toggle_activity(&mut self, item: &str, checked: bool) {
        set_membership(&mut self.draft.activities, item, checked);
    }

    pub fn set_dj(&mut self, enabled: bool) {
        self.draft.dj = enabled;
    }

    pub fn set_allergies(&mut self, value: impl Into<String>) {
        self.draft.allergies = value.into();
    }

    pub fn set_special_occasion(&mut self, value: impl Into<String>) {
        self.draft.special_occasion = value.into();
    }

    pub fn set_other_activity(&mut self, value: impl Into<String>) {
        self.draft.other_activity = value.into();
    }

    /// Advances when the current step's gate passes; otherwise stays put.
    pub fn next(&mut self) -> Result<Step, ValidationErrors> {
        let next = match self.step {
            Step::GuestDetails => {
                validate_guest_details(&self.draft).into_result()?;
                self.catalog_step()
            }
            Step::CatalogConfig { .. } => {
                validate_catalog_config(&self.draft, &self.config).into_result()?;
                if self.draft.is_helicopter() {
                    Step::Summary {
                        product: ProductLine::Helicopter,
                    }
                } else {
                    Step::PersonalRequest
                }
            }
            Step::PersonalRequest => Step::Summary {
                product: ProductLine::Yacht,
            },
            Step::Summary { .. } => self.step,
        };

        self.step = next;
        Ok(next)
    }

    /// Leaving a configured vessel always drops it, along with its package.
    pub fn back(&mut self) -> Step {
        let current = self.step;
        self.step = match current {
            Step::GuestDetails => Step::GuestDetails,
            Step::CatalogConfig { .. } if self.draft.vessel.is_none() => Step::GuestDetails,
            Step::CatalogConfig { .. } | Step::PersonalRequest | Step::Summary { .. } => {
                self.clear_vessel();
                self.catalog_step()
            }
        };
        self.step
    }

    pub fn summary(&self) -> BookingSummary {
        BookingSummary::from_draft(&self.draft, &self.config)
    }

    /// Re-validates the full draft and builds the outbound request. The step does not change.
    pub fn submit(&self) -> Result<Dispatch, SubmitError> {
        if !matches!(self.step, Step::Summary { .. }) {
            return Err(SubmitError::NotOnSummary(self.step));
        }
        Ok(prepare_dispatch(&self.draft, &self.config)?)
    }

    fn catalog_step(&self) -> Step {
        let stage = match &self.draft.vessel {
            Some(vessel) => CatalogStage::Configuring(vessel.kind.into()),
            None => CatalogStage::Browsing,
        };
        Step::CatalogConfig { stage }
    }

    fn clear_vessel(&mut self) {
        if self.draft.is_helicopter() {
            self.draft.destination.clear();
        }
        self.draft.vessel = None;
        self.draft.tier = None;
        self.draft.charter.clear();
    }

    fn require_catalog_step(&self, operation: &'static str) -> Result<(), SelectionError> {
        match self.step {
            Step::CatalogConfig { .. } => Ok(()),
            step => Err(SelectionError::WrongStep { operation, step }),
        }
    }

    fn require_product(
        &self,
        expected: ProductLine,
        operation: &'static str,
    ) -> Result<(), SelectionError> {
        match self.product_line() {
            None => Err(SelectionError::NoVessel),
            Some(product) if product != expected => {
                Err(SelectionError::WrongProduct { operation, product })
            }
            Some(_) => Ok(()),
        }
    }
}
