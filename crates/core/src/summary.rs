use std::fmt;

use serde::Serialize;

use crate::config::CharterConfig;
use crate::message::{meaningful, resolve_price};
use crate::models::BookingDraft;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestSummary {
    pub name: String,
    pub phone: String,
    pub date: String,
    pub passengers: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoyageSummary {
    pub vessel: String,
    pub destination: String,
    pub charter: String,
    pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicesSummary {
    pub food: String,
    pub drinks: String,
    pub dj: bool,
    pub activities: Option<String>,
    pub other_activity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonalRequests {
    pub allergies: Option<String>,
    pub special_occasion: Option<String>,
}

/// Review panel shown on the last step, before the request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub guest: GuestSummary,
    pub voyage: VoyageSummary,
    /// Absent for helicopter bookings.
    pub services: Option<ServicesSummary>,
    pub personal_requests: Option<PersonalRequests>,
}

impl BookingSummary {
    pub fn from_draft(draft: &BookingDraft, config: &CharterConfig) -> Self {
        let guest = GuestSummary {
            name: or_placeholder(&draft.name, "Name not provided"),
            phone: or_placeholder(&draft.phone, "Phone not provided"),
            date: or_placeholder(&draft.date, "Not selected"),
            passengers: or_placeholder(&draft.passengers, "Not set"),
        };

        let destination = if draft.destination.trim().is_empty() {
            "Not selected".to_string()
        } else {
            config.destination_label(draft.destination.trim()).to_string()
        };
        let voyage = VoyageSummary {
            vessel: draft
                .vessel
                .as_ref()
                .map(|vessel| vessel.name.clone())
                .unwrap_or_else(|| "Not selected".to_string()),
            destination,
            charter: if draft.charter.is_empty() {
                "Not selected".to_string()
            } else {
                draft.charter.replace('|', " - ")
            },
            price: resolve_price(draft, config).map(str::to_string),
        };

        let services = (!draft.is_helicopter()).then(|| ServicesSummary {
            food: join_or(&draft.food, "No food selected"),
            drinks: join_or(&draft.drinks, "No drinks selected"),
            dj: draft.dj,
            activities: (!draft.activities.is_empty()).then(|| draft.activities.join(", ")),
            other_activity: meaningful(&draft.other_activity).map(str::to_string),
        });

        let allergies = meaningful(&draft.allergies).map(str::to_string);
        let special_occasion = meaningful(&draft.special_occasion).map(str::to_string);
        let personal_requests = (allergies.is_some() || special_occasion.is_some()).then_some(
            PersonalRequests {
                allergies,
                special_occasion,
            },
        );

        Self {
            guest,
            voyage,
            services,
            personal_requests,
        }
    }
}

impl fmt::Display for BookingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Guest details")?;
        writeln!(f, "  {}", self.guest.name)?;
        writeln!(f, "  {}", self.guest.phone)?;
        writeln!(f, "  Date: {}", self.guest.date)?;
        writeln!(f, "  Passengers: {}", self.guest.passengers)?;

        writeln!(f, "Vessel & destination")?;
        writeln!(f, "  Vessel: {}", self.voyage.vessel)?;
        writeln!(f, "  Destination: {}", self.voyage.destination)?;
        match &self.voyage.price {
            Some(price) => writeln!(f, "  Charter: {} ({})", self.voyage.charter, price)?,
            None => writeln!(f, "  Charter: {}", self.voyage.charter)?,
        }

        if let Some(services) = &self.services {
            writeln!(f, "Services")?;
            writeln!(f, "  Food: {}", services.food)?;
            writeln!(f, "  Drinks: {}", services.drinks)?;
            writeln!(f, "  DJ service: {}", if services.dj { "Yes" } else { "No" })?;
            if let Some(activities) = &services.activities {
                writeln!(f, "  Preferred activities: {}", activities)?;
            }
            if let Some(other) = &services.other_activity {
                writeln!(f, "  Other activity preferences: {}", other)?;
            }
        }

        if let Some(requests) = &self.personal_requests {
            writeln!(f, "Personal requests")?;
            if let Some(allergies) = &requests.allergies {
                writeln!(f, "  Allergies: {}", allergies)?;
            }
            if let Some(occasion) = &requests.special_occasion {
                writeln!(f, "  Special occasion: {}", occasion)?;
            }
        }

        Ok(())
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

fn join_or(values: &[String], placeholder: &str) -> String {
    if values.is_empty() {
        placeholder.to_string()
    } else {
        values.join(", ")
    }
}
