use std::fmt;

use serde::{Deserialize, Serialize};

pub const KEY_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOption {
    #[serde(rename = "type")]
    pub duration: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPackage {
    pub tier: String,
    pub options: Vec<PriceOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPackages {
    pub location: String,
    pub packages: Vec<TierPackage>,
}

/// location → vessel tier → duration type → price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharterPriceTable {
    pub locations: Vec<LocationPackages>,
}

/// Price options one location offers for a single tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierPrices<'a> {
    pub location: &'a str,
    pub options: &'a [PriceOption],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageListing {
    pub value: String,
    pub label: String,
    pub price: String,
}

impl CharterPriceTable {
    /// Tiers in first-seen order across all locations.
    pub fn tiers(&self) -> Vec<&str> {
        let mut tiers: Vec<&str> = Vec::new();
        for location in &self.locations {
            for package in &location.packages {
                if !tiers.contains(&package.tier.as_str()) {
                    tiers.push(package.tier.as_str());
                }
            }
        }
        tiers
    }

    pub fn has_tier(&self, tier: &str) -> bool {
        self.locations
            .iter()
            .flat_map(|location| location.packages.iter())
            .any(|package| package.tier == tier)
    }

    /// One entry per location; a location without the tier yields no options.
    pub fn prices_for_tier(&self, tier: &str) -> Vec<TierPrices<'_>> {
        self.locations
            .iter()
            .map(|location| TierPrices {
                location: location.location.as_str(),
                options: location
                    .packages
                    .iter()
                    .find(|package| package.tier == tier)
                    .map(|package| package.options.as_slice())
                    .unwrap_or(&[]),
            })
            .collect()
    }

    pub fn lookup(&self, location: &str, tier: &str, duration: &str) -> Option<&str> {
        self.locations
            .iter()
            .find(|candidate| candidate.location == location)?
            .packages
            .iter()
            .find(|package| package.tier == tier)?
            .options
            .iter()
            .find(|option| option.duration == duration)
            .map(|option| option.price.as_str())
    }

    pub fn listings(&self) -> Vec<PackageListing> {
        let mut listings = Vec::new();
        for location in &self.locations {
            for package in &location.packages {
                for option in &package.options {
                    let key = CharterKey::Yacht {
                        location: location.location.clone(),
                        tier: package.tier.clone(),
                        duration: option.duration.clone(),
                    };
                    listings.push(PackageListing {
                        value: key.encode(),
                        label: format!(
                            "{} - {} - {} ({})",
                            location.location, package.tier, option.duration, option.price
                        ),
                        price: option.price.clone(),
                    });
                }
            }
        }
        listings
    }
}

impl Default for CharterPriceTable {
    fn default() -> Self {
        Self {
            locations: vec![
                location(
                    "Dar Yacht Charter",
                    vec![
                        tier(
                            "20 Max Catamaran",
                            &[
                                ("Half Day Charter", "$1,100"),
                                ("Full Day Charter", "$1,500"),
                                ("Live Onboard (24 Hours)", "$2,000"),
                            ],
                        ),
                        tier(
                            "22 Max Catamaran",
                            &[
                                ("Half Day Cruise", "$1,500"),
                                ("Full Day Cruise", "$2,000"),
                                ("Live Onboard (24 Hours)", "$2,600"),
                            ],
                        ),
                    ],
                ),
                location(
                    "Zanzibar Charter",
                    vec![
                        tier(
                            "20 Max Catamaran",
                            &[
                                ("Half Day Cruise", "$1,400"),
                                ("Full Day Cruise", "$1,800"),
                                ("Live Onboard (24 Hours)", "$2,200"),
                            ],
                        ),
                        tier(
                            "22 Max Catamaran",
                            &[
                                ("Half Day Cruise", "$1,800"),
                                ("Full Day Cruise", "$2,400"),
                                ("Live Onboard (24 Hours)", "$2,800"),
                            ],
                        ),
                    ],
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelicopterService {
    pub service: String,
    pub price: String,
    pub pickup: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelicopterLocation {
    pub location: String,
    pub services: Vec<HelicopterService>,
}

/// Flat per-service pricing; helicopters have no tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelicopterServiceTable {
    pub locations: Vec<HelicopterLocation>,
}

impl HelicopterServiceTable {
    pub fn lookup(&self, location: &str, service: &str) -> Option<&HelicopterService> {
        self.locations
            .iter()
            .find(|candidate| candidate.location == location)?
            .services
            .iter()
            .find(|candidate| candidate.service == service)
    }

    pub fn listings(&self) -> Vec<PackageListing> {
        self.locations
            .iter()
            .flat_map(|location| {
                location.services.iter().map(move |service| {
                    let key = CharterKey::Helicopter {
                        location: location.location.clone(),
                        service: service.service.clone(),
                    };
                    PackageListing {
                        value: key.encode(),
                        label: format!(
                            "{} - {} ({}, pickup: {})",
                            location.location, service.service, service.price, service.pickup
                        ),
                        price: service.price.clone(),
                    }
                })
            })
            .collect()
    }
}

impl Default for HelicopterServiceTable {
    fn default() -> Self {
        let dar_pickup = "Dar es Salaam - Julius Nyerere Airport";
        let zanzibar_pickup = "Zanzibar - Abeid Amani Karume Airport";
        Self {
            locations: vec![
                HelicopterLocation {
                    location: "Dar Heli Charter".to_string(),
                    services: vec![
                        heli("Scenic City Flight (20 Minutes)", "$650", dar_pickup),
                        heli("Dar to Zanzibar Transfer", "$1,900", dar_pickup),
                    ],
                },
                HelicopterLocation {
                    location: "Zanzibar Heli Charter".to_string(),
                    services: vec![
                        heli("Island Scenic Flight (30 Minutes)", "$950", zanzibar_pickup),
                        heli("Mnemba Atoll Fly & Snorkel", "$2,600", zanzibar_pickup),
                    ],
                },
            ],
        }
    }
}

/// Composite charter value stored in the draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CharterKey {
    Yacht {
        location: String,
        tier: String,
        duration: String,
    },
    Helicopter {
        location: String,
        service: String,
    },
}

impl CharterKey {
    pub fn parse(value: &str) -> Option<Self> {
        let segments = value.split(KEY_SEPARATOR).collect::<Vec<_>>();
        if segments.iter().any(|segment| segment.is_empty()) {
            return None;
        }

        match segments.as_slice() {
            [location, tier, duration] => Some(Self::Yacht {
                location: location.to_string(),
                tier: tier.to_string(),
                duration: duration.to_string(),
            }),
            [location, service] => Some(Self::Helicopter {
                location: location.to_string(),
                service: service.to_string(),
            }),
            _ => None,
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn location(&self) -> &str {
        match self {
            Self::Yacht { location, .. } | Self::Helicopter { location, .. } => location,
        }
    }
}

impl fmt::Display for CharterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yacht {
                location,
                tier,
                duration,
            } => write!(f, "{location}{KEY_SEPARATOR}{tier}{KEY_SEPARATOR}{duration}"),
            Self::Helicopter { location, service } => {
                write!(f, "{location}{KEY_SEPARATOR}{service}")
            }
        }
    }
}

fn location(name: &str, packages: Vec<TierPackage>) -> LocationPackages {
    LocationPackages {
        location: name.to_string(),
        packages,
    }
}

fn tier(name: &str, options: &[(&str, &str)]) -> TierPackage {
    TierPackage {
        tier: name.to_string(),
        options: options
            .iter()
            .map(|(duration, price)| PriceOption {
                duration: duration.to_string(),
                price: price.to_string(),
            })
            .collect(),
    }
}

fn heli(service: &str, price: &str, pickup: &str) -> HelicopterService {
    HelicopterService {
        service: service.to_string(),
        price: price.to_string(),
        pickup: pickup.to_string(),
    }
}
