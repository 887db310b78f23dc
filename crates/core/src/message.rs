use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::CharterConfig;
use crate::models::BookingDraft;
use crate::pricing::CharterKey;
use crate::validation::{validate_draft, ValidationErrors};

const PLACEHOLDERS: &[&str] = &["-", "--", "n/a", "na", "none", "nil", "no", "nothing"];

/// Outbound booking request, ready to hand to the platform's link opener.
#[derive(Debug, Clone, Serialize)]
pub struct Dispatch {
    pub message: String,
    pub link: String,
    pub prepared_at: DateTime<Utc>,
}

/// Validates the whole draft, then renders the message and deep link.
pub fn prepare_dispatch(
    draft: &BookingDraft,
    config: &CharterConfig,
) -> Result<Dispatch, ValidationErrors> {
    validate_draft(draft, config).into_result()?;

    let message = render_booking_message(draft, config);
    let link = build_deep_link(&config.deep_link_base, &message);

    Ok(Dispatch {
        message,
        link,
        prepared_at: Utc::now(),
    })
}

pub fn render_booking_message(draft: &BookingDraft, config: &CharterConfig) -> String {
    let helicopter = draft.is_helicopter();
    let mut sections = Vec::new();

    sections.push(if helicopter {
        "🚁 *NEW HELICOPTER BOOKING REQUEST*".to_string()
    } else {
        "🛥️ *NEW YACHT BOOKING REQUEST*".to_string()
    });

    sections.push(format!(
        "👤 *Customer Details:*\nName: {}\nPhone: {}",
        draft.name.trim(),
        draft.phone.trim()
    ));

    let place_heading = if helicopter {
        "📍 *Pickup Point:*"
    } else {
        "📍 *Destination:*"
    };
    sections.push(format!(
        "{}\n{}",
        place_heading,
        config.destination_label(draft.destination.trim())
    ));

    sections.push(format!(
        "📅 *Date:* {}\n👥 *Passengers:* {}",
        draft.date.trim(),
        draft.passengers.trim()
    ));

    if let Some(vessel) = &draft.vessel {
        let heading = if helicopter {
            "🚁 *Selected Aircraft:*"
        } else {
            "🚤 *Selected Catamaran:*"
        };
        sections.push(format!("{}\n{}", heading, vessel.name));
    }

    if let Some(section) = charter_section(draft, config) {
        sections.push(section);
    }

    if !helicopter {
        sections.push(format!("🍽️ *Food Selection:*\n{}", draft.food.join(", ")));
        sections.push(format!("🍹 *Drinks Selection:*\n{}", draft.drinks.join(", ")));
        sections.push(format!(
            "🎵 DJ Service: {}",
            if draft.dj { "Yes ✓" } else { "No" }
        ));
    }

    if let Some(allergies) = meaningful(&draft.allergies) {
        sections.push(format!("⚠️ *Allergies:*\n{}", allergies));
    }
    if let Some(occasion) = meaningful(&draft.special_occasion) {
        sections.push(format!("🎉 *Special Occasion:*\n{}", occasion));
    }

    if !helicopter {
        let activities = draft
            .activities
            .iter()
            .filter_map(|activity| meaningful(activity))
            .collect::<Vec<_>>();
        if !activities.is_empty() {
            sections.push(format!(
                "🎯 *Preferred Activities:*\n{}",
                activities.join(", ")
            ));
        }
        if let Some(other) = meaningful(&draft.other_activity) {
            sections.push(format!("📝 *Other Activity Preferences:*\n{}", other));
        }
    }

    sections.push("Please contact the customer to provide a quote.".to_string());
    sections.join("\n\n")
}

/// `<base>?text=<percent-encoded message>`.
pub fn build_deep_link(base: &str, message: &str) -> String {
    format!("{}?text={}", base.trim().trim_end_matches('?'), pct_encode(message))
}

pub fn pct_encode(input: &str) -> String {
    let mut output = String::with_capacity(input.len() * 2);
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            output.push(byte as char);
        } else {
            output.push('%');
            output.push_str(&format!("{:02X}", byte));
        }
    }
    output
}

/// Trimmed text, or `None` when blank or a stand-in like "n/a".
pub fn meaningful(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if PLACEHOLDERS.contains(&lower.as_str()) {
        None
    } else {
        Some(trimmed)
    }
}

/// Price for the draft's charter key, if it resolves.
pub fn resolve_price<'a>(draft: &BookingDraft, config: &'a CharterConfig) -> Option<&'a str> {
    match CharterKey::parse(&draft.charter)? {
        CharterKey::Yacht {
            location,
            tier,
            duration,
        } => config.charters.lookup(&location, &tier, &duration),
        CharterKey::Helicopter { location, service } => config
            .helicopter
            .lookup(&location, &service)
            .map(|entry| entry.price.as_str()),
    }
}

fn charter_section(draft: &BookingDraft, config: &CharterConfig) -> Option<String> {
    let key = CharterKey::parse(&draft.charter)?;
    let price = resolve_price(draft, config).unwrap_or_default();

    let section = match key {
        CharterKey::Yacht {
            location,
            tier,
            duration,
        } => format!(
            "⛵ *Selected Charter:*\n{} - {}\n{} {}",
            location, tier, duration, price
        ),
        CharterKey::Helicopter { location, service } => format!(
            "✈️ *Selected Service:*\n{}\n{} {}",
            location, service, price
        ),
    };
    Some(section.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SelectedVessel, VesselKind};

    fn jane_doe() -> BookingDraft {
        BookingDraft {
            name: "Jane Doe".to_string(),
            phone: "255711111111".to_string(),
            date: "2025-06-01".to_string(),
            passengers: "4".to_string(),
            vessel: Some(SelectedVessel {
                id: "sunday-kinga".to_string(),
                name: "Sunday Kinga".to_string(),
                kind: VesselKind::Catamaran,
            }),
            destination: "Stone Town".to_string(),
            tier: Some("22 Max Catamaran".to_string()),
            charter: "Zanzibar Charter|22 Max Catamaran|Full Day Cruise".to_string(),
            food: vec!["Fresh Lobster".to_string()],
            drinks: vec!["Cocktails".to_string()],
            dj: true,
            ..BookingDraft::default()
        }
    }

    #[test]
    fn message_carries_resolved_price_and_dj_flag() {
        let message = render_booking_message(&jane_doe(), &CharterConfig::default());
        assert!(message.contains("$2,400"));
        assert!(message.contains("DJ Service: Yes"));
        assert!(message.contains("Stone Town"));
        assert!(message.contains("Sunday Kinga"));
    }

    #[test]
    fn blank_optional_fields_are_left_out() {
        let mut draft = jane_doe();
        draft.allergies = String::new();
        draft.special_occasion = "  n/a ".to_string();
        let message = render_booking_message(&draft, &CharterConfig::default());
        assert!(!message.contains("Allergies:"));
        assert!(!message.contains("Special Occasion:"));
        assert!(!message.contains("Preferred Activities:"));
    }

    #[test]
    fn filled_optional_fields_are_trimmed_and_included() {
        let mut draft = jane_doe();
        draft.allergies = "  shellfish \n".to_string();
        draft.activities = vec!["Private beach excursions".to_string()];
        let message = render_booking_message(&draft, &CharterConfig::default());
        assert!(message.contains("⚠️ *Allergies:*\nshellfish\n"));
        assert!(message.contains("Private beach excursions"));
    }

    #[test]
    fn helicopter_message_skips_catering_and_dj() {
        let mut draft = jane_doe();
        draft.vessel = Some(SelectedVessel {
            id: "black-bird-heli".to_string(),
            name: "BLACK BIRD HELI".to_string(),
            kind: VesselKind::Helicopter,
        });
        draft.tier = None;
        draft.charter = "Zanzibar Heli Charter|Island Scenic Flight (30 Minutes)".to_string();
        draft.destination = "Zanzibar - Abeid Amani Karume Airport".to_string();
        draft.activities = vec!["Private beach excursions".to_string()];

        let message = render_booking_message(&draft, &CharterConfig::default());
        assert!(message.contains("$950"));
        assert!(message.contains("Pickup Point:"));
        assert!(!message.contains("Food Selection"));
        assert!(!message.contains("Drinks Selection"));
        assert!(!message.contains("DJ Service"));
        assert!(!message.contains("Preferred Activities"));
    }

    #[test]
    fn deep_link_percent_encodes_the_message() {
        let link = build_deep_link("https://wa.me/255711942057", "Hi there & 100%\n🛥️");
        assert!(link.starts_with("https://wa.me/255711942057?text=Hi%20there%20%26%20100%25%0A"));
        assert!(link.ends_with("%F0%9F%9B%A5%EF%B8%8F"));
    }

    #[test]
    fn dispatch_rejects_an_incomplete_draft() {
        let mut draft = jane_doe();
        draft.drinks.clear();
        let error = prepare_dispatch(&draft, &CharterConfig::default()).unwrap_err();
        assert_eq!(error.len(), 1);

        let dispatch = prepare_dispatch(&jane_doe(), &CharterConfig::default()).unwrap();
        assert!(dispatch.link.contains("%242%2C400"));
    }
}
