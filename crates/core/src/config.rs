use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::models::{Destination, VesselProfile};
use crate::pricing::{CharterPriceTable, HelicopterServiceTable};

pub const DEFAULT_DEEP_LINK_BASE: &str = "https://wa.me/255711942057";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed reading charter config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid charter config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("deep link base `{0}` is not an http(s) URL")]
    InvalidDeepLink(String),
}

/// Immutable reference data handed to every booking wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharterConfig {
    pub charters: CharterPriceTable,
    pub helicopter: HelicopterServiceTable,
    pub destinations: Vec<Destination>,
    pub food_options: Vec<String>,
    pub drink_options: Vec<String>,
    pub activity_options: Vec<String>,
    pub deep_link_base: String,
    /// Exact asset folder name → display name.
    pub display_names: BTreeMap<String, String>,
    /// Vessel id → capacity and blurb.
    pub profiles: BTreeMap<String, VesselProfile>,
}

impl CharterConfig {
    /// Missing keys in the file fall back to the built-in tables.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_deep_link_base(mut self, base: impl Into<String>) -> Result<Self, ConfigError> {
        self.deep_link_base = base.into();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(self.deep_link_base.trim())
            .map_err(|_| ConfigError::InvalidDeepLink(self.deep_link_base.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.query().is_some() {
            return Err(ConfigError::InvalidDeepLink(self.deep_link_base.clone()));
        }
        Ok(())
    }

    pub fn destination_label<'a>(&'a self, value: &'a str) -> &'a str {
        self.destinations
            .iter()
            .find(|destination| destination.value == value)
            .map(|destination| destination.label.as_str())
            .unwrap_or(value)
    }

    pub fn profile_for(&self, vessel_id: &str) -> VesselProfile {
        self.profiles.get(vessel_id).cloned().unwrap_or_default()
    }
}

impl Default for CharterConfig {
    fn default() -> Self {
        Self {
            charters: CharterPriceTable::default(),
            helicopter: HelicopterServiceTable::default(),
            destinations: default_destinations(),
            food_options: strings(&[
                "Grilled Seafood Platter",
                "Fresh Lobster",
                "BBQ Selection",
                "Tropical Fruit Platter",
                "Gourmet Sandwiches",
                "Vegetarian Options",
            ]),
            drink_options: strings(&[
                "Premium Champagne",
                "Cocktails",
                "Fresh Juices",
                "Soft Drinks",
                "Wine Selection",
                "Beer & Spirits",
            ]),
            activity_options: strings(&[
                "Sunbathing and relaxation",
                "Water sports (e.g., snorkeling, diving, paddleboarding)",
                "Dining at exclusive restaurants",
                "Private beach excursions",
                "Cultural experiences (e.g., visits to local villages, markets)",
                "Wine tasting and luxury dining onboard",
                "Family-friendly activities (e.g., kids' clubs, educational tours)",
                "Romantic getaways (e.g., private dinners, sunset cruises)",
                "Other",
            ]),
            deep_link_base: DEFAULT_DEEP_LINK_BASE.to_string(),
            display_names: default_display_names(),
            profiles: default_profiles(),
        }
    }
}

fn default_destinations() -> Vec<Destination> {
    [
        ("dar-slipway", "Dar es Salaam - Slipway Marina"),
        ("zanzibar-stonetown", "Zanzibar - Stone Town"),
        ("nungwi", "Nungwi Beach"),
        ("bongoyo", "Bongoyo Island"),
        ("mbudya", "Mbudya Island"),
    ]
    .into_iter()
    .map(|(value, label)| Destination {
        value: value.to_string(),
        label: label.to_string(),
    })
    .collect()
}

pub fn default_display_names() -> BTreeMap<String, String> {
    [
        ("Misbehaviour catamaran", "MISBEHAVIOUR CATAMARAN"),
        ("Sunday Kinga", "SUNDAY KINGA CATAMARAN"),
        ("Umoja", "UMOJA CATAMARAN"),
        ("Black Bird Heli", "BLACK BIRD HELI"),
        ("Queen of Zanzibar", "QUEEN OF ZANZIBAR"),
        ("Amani Luxury", "AMANI LUXURY CATAMARAN"),
        ("Helia 44 Catamaran", "HELIA 44 CATAMARAN"),
        ("Butterfly Catamaran", "BUTTERFLY CATAMARAN"),
        ("Seamanta catamaran", "SEAMANTA CATAMARAN"),
        ("Knlyps catamaran", "KNLYPS CATAMARAN"),
        ("Vaatea catamaran", "VAATEA CATAMARAN"),
        ("Albion catamaran", "ALBION CATAMARAN"),
    ]
    .into_iter()
    .map(|(folder, name)| (folder.to_string(), name.to_string()))
    .collect()
}

fn default_profiles() -> BTreeMap<String, VesselProfile> {
    [
        ("misbehaviour", "20 passengers", "20 passengers max, perfect for private cruises."),
        ("sunday-kinga", "22 passengers", "22-passengers, ideal for group celebrations."),
        ("umoja", "22 passengers", "22-passengers, comfortable for full-day trips."),
        ("albion", "20 passengers", "Premium catamaran with excellent facilities."),
        ("amani-luxury", "25 passengers", "Luxury catamaran with premium amenities."),
        ("black-bird-heli", "4 passengers", "Helicopter service for aerial tours and transfers."),
        ("butterfly", "22 passengers", "Elegant catamaran perfect for special occasions."),
        ("helia-44", "24 passengers", "Spacious 44-foot catamaran for comfortable cruising."),
        ("knlyps", "20 passengers", "Modern catamaran with excellent facilities."),
        ("queen-of-zanzibar", "25 passengers", "Royal catamaran experience in Zanzibar waters."),
        ("seamanta", "22 passengers", "Comfortable catamaran for day trips."),
        ("vaatea", "24 passengers", "Luxury catamaran with premium features."),
    ]
    .into_iter()
    .map(|(id, capacity, description)| {
        (
            id.to_string(),
            VesselProfile {
                capacity: capacity.to_string(),
                description: description.to_string(),
            },
        )
    })
    .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(CharterConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_http_deep_links() {
        let result = CharterConfig::default().with_deep_link_base("whatsapp://send");
        assert!(matches!(result, Err(ConfigError::InvalidDeepLink(_))));

        let result = CharterConfig::default().with_deep_link_base("https://wa.me/1?text=hi");
        assert!(matches!(result, Err(ConfigError::InvalidDeepLink(_))));
    }

    #[test]
    fn partial_json_keeps_builtin_tables() {
        let config: CharterConfig =
            serde_json::from_str(r#"{ "deep_link_base": "https://wa.me/15550001111" }"#).unwrap();
        assert_eq!(config.deep_link_base, "https://wa.me/15550001111");
        assert_eq!(config.food_options.len(), 6);
        assert_eq!(config.destination_label("nungwi"), "Nungwi Beach");
        assert_eq!(config.destination_label("Stone Town"), "Stone Town");
    }

    #[test]
    fn unknown_profile_falls_back_to_default() {
        let config = CharterConfig::default();
        assert_eq!(config.profile_for("black-bird-heli").capacity, "4 passengers");
        assert_eq!(config.profile_for("ghost-ship"), VesselProfile::default());
    }
}
