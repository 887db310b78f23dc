use serde::Serialize;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::CharterConfig;
use crate::models::BookingDraft;
use crate::pricing::CharterKey;

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_PHONE_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Phone,
    Date,
    Passengers,
    Vessel,
    Destination,
    Charter,
    Food,
    Drinks,
}

impl Field {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Date => "date",
            Self::Passengers => "passengers",
            Self::Vessel => "vessel",
            Self::Destination => "destination",
            Self::Charter => "charter",
            Self::Food => "food",
            Self::Drinks => "drinks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldErrorKind {
    MissingRequired,
    TooShort { min: usize },
    UnknownOption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{}: {message}", .field.as_code())]
pub struct FieldError {
    pub field: Field,
    pub kind: FieldErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("{} field(s) need attention", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    pub fn fields(&self) -> Vec<Field> {
        self.errors.iter().map(|error| error.field).collect()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    fn push(&mut self, field: Field, kind: FieldErrorKind, message: &str) {
        self.errors.push(FieldError {
            field,
            kind,
            message: message.to_string(),
        });
    }

    fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }
}

/// Gate for leaving the guest details step.
pub fn validate_guest_details(draft: &BookingDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    check_min_chars(
        &mut errors,
        Field::Name,
        &draft.name,
        MIN_NAME_CHARS,
        "Name must be at least 2 characters",
    );
    check_min_chars(
        &mut errors,
        Field::Phone,
        &draft.phone,
        MIN_PHONE_CHARS,
        "Please enter a valid phone number",
    );
    check_present(&mut errors, Field::Date, &draft.date, "Please select a date");
    check_present(
        &mut errors,
        Field::Passengers,
        &draft.passengers,
        "Please enter number of passengers",
    );

    errors
}

/// Gate for leaving the catalog step. Helicopters skip destination, food and drinks.
pub fn validate_catalog_config(draft: &BookingDraft, config: &CharterConfig) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if draft.vessel.is_none() {
        errors.push(
            Field::Vessel,
            FieldErrorKind::MissingRequired,
            "Please choose a vessel",
        );
    }

    if draft.is_helicopter() {
        check_helicopter_service(&mut errors, draft, config);
        return errors;
    }

    check_present(
        &mut errors,
        Field::Destination,
        &draft.destination,
        "Please select a destination",
    );
    check_charter_package(&mut errors, draft, config);

    if draft.food.is_empty() {
        errors.push(
            Field::Food,
            FieldErrorKind::MissingRequired,
            "Please select at least one food option",
        );
    }
    if draft.drinks.is_empty() {
        errors.push(
            Field::Drinks,
            FieldErrorKind::MissingRequired,
            "Please select at least one drink option",
        );
    }

    errors
}

/// Every rule the wizard enforces, applied to the whole draft at once.
pub fn validate_draft(draft: &BookingDraft, config: &CharterConfig) -> ValidationErrors {
    let mut errors = validate_guest_details(draft);
    errors.extend(validate_catalog_config(draft, config));
    errors
}

pub fn char_count(value: &str) -> usize {
    value.graphemes(true).count()
}

fn check_min_chars(
    errors: &mut ValidationErrors,
    field: Field,
    value: &str,
    min: usize,
    message: &str,
) {
    if value.is_empty() {
        errors.push(field, FieldErrorKind::MissingRequired, message);
    } else if char_count(value) < min {
        errors.push(field, FieldErrorKind::TooShort { min }, message);
    }
}

fn check_present(errors: &mut ValidationErrors, field: Field, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(field, FieldErrorKind::MissingRequired, message);
    }
}

fn check_charter_package(errors: &mut ValidationErrors, draft: &BookingDraft, config: &CharterConfig) {
    if draft.charter.is_empty() {
        errors.push(
            Field::Charter,
            FieldErrorKind::MissingRequired,
            "Please select a charter package",
        );
        return;
    }

    let resolves = match CharterKey::parse(&draft.charter) {
        Some(CharterKey::Yacht {
            location,
            tier,
            duration,
        }) => config.charters.lookup(&location, &tier, &duration).is_some(),
        _ => false,
    };
    if !resolves {
        errors.push(
            Field::Charter,
            FieldErrorKind::UnknownOption,
            "Selected charter package is not available",
        );
    }
}

fn check_helicopter_service(
    errors: &mut ValidationErrors,
    draft: &BookingDraft,
    config: &CharterConfig,
) {
    if draft.charter.is_empty() {
        errors.push(
            Field::Charter,
            FieldErrorKind::MissingRequired,
            "Please select a helicopter service",
        );
        return;
    }

    let resolves = match CharterKey::parse(&draft.charter) {
        Some(CharterKey::Helicopter { location, service }) => {
            config.helicopter.lookup(&location, &service).is_some()
        }
        _ => false,
    };
    if !resolves {
        errors.push(
            Field::Charter,
            FieldErrorKind::UnknownOption,
            "Selected helicopter service is not available",
        );
    }
}
