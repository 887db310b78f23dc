pub mod config;
pub mod message;
pub mod models;
pub mod pricing;
pub mod summary;
pub mod validation;
pub mod wizard;

pub use config::{CharterConfig, ConfigError, DEFAULT_DEEP_LINK_BASE};
pub use message::{build_deep_link, prepare_dispatch, render_booking_message, Dispatch};
pub use models::*;
pub use pricing::{
    CharterKey, CharterPriceTable, HelicopterServiceTable, PackageListing, TierPrices,
};
pub use summary::BookingSummary;
pub use validation::{Field, FieldError, FieldErrorKind, ValidationErrors};
pub use wizard::{BookingWizard, CatalogStage, ProductLine, SelectionError, Step, SubmitError};
