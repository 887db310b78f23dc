use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VesselKind {
    Catamaran,
    Helicopter,
}

impl VesselKind {
    /// "Black Bird Heli" is a helicopter, "Helia 44 Catamaran" is not.
    pub fn from_folder(folder: &str) -> Self {
        let is_helicopter = folder
            .split_whitespace()
            .map(|token| token.to_lowercase())
            .any(|token| token == "heli" || token == "helicopter");

        if is_helicopter {
            Self::Helicopter
        } else {
            Self::Catamaran
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "catamaran" | "yacht" | "boat" => Some(Self::Catamaran),
            "helicopter" | "heli" => Some(Self::Helicopter),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Catamaran => "catamaran",
            Self::Helicopter => "helicopter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselProfile {
    pub capacity: String,
    pub description: String,
}

impl Default for VesselProfile {
    fn default() -> Self {
        Self {
            capacity: "20 passengers".to_string(),
            description: "Premium catamaran for your charter experience.".to_string(),
        }
    }
}

/// One charterable product in the fleet catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vessel {
    pub id: String,
    pub name: String,
    pub kind: VesselKind,
    pub thumbnail: String,
    pub exterior: Vec<String>,
    pub interior: Vec<String>,
}

impl Vessel {
    pub fn is_helicopter(&self) -> bool {
        self.kind == VesselKind::Helicopter
    }

    pub fn image_count(&self) -> usize {
        self.exterior.len() + self.interior.len()
    }

    /// Exterior shots first, then interiors, as the gallery shows them.
    pub fn gallery(&self) -> impl Iterator<Item = &str> {
        self.exterior
            .iter()
            .chain(self.interior.iter())
            .map(String::as_str)
    }
}

/// Read-only source of vessels the booking wizard offers.
pub trait VesselDirectory: Send + Sync {
    fn vessels(&self) -> &[Vessel];

    fn find_vessel(&self, id: &str) -> Option<&Vessel> {
        self.vessels().iter().find(|vessel| vessel.id == id)
    }
}

impl VesselDirectory for Vec<Vessel> {
    fn vessels(&self) -> &[Vessel] {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedVessel {
    pub id: String,
    pub name: String,
    pub kind: VesselKind,
}

impl From<&Vessel> for SelectedVessel {
    fn from(vessel: &Vessel) -> Self {
        Self {
            id: vessel.id.clone(),
            name: vessel.name.clone(),
            kind: vessel.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub value: String,
    pub label: String,
}

/// In-progress booking form state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingDraft {
    pub name: String,
    pub phone: String,
    pub date: String,
    pub passengers: String,
    pub vessel: Option<SelectedVessel>,
    /// Departure point for yachts, derived pickup point for helicopters.
    pub destination: String,
    pub tier: Option<String>,
    /// `location|tier|duration` for yachts, `location|service` for helicopters.
    pub charter: String,
    pub food: Vec<String>,
    pub drinks: Vec<String>,
    pub dj: bool,
    pub allergies: String,
    pub special_occasion: String,
    pub other_activity: String,
    pub activities: Vec<String>,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            date: String::new(),
            passengers: "2".to_string(),
            vessel: None,
            destination: String::new(),
            tier: None,
            charter: String::new(),
            food: Vec::new(),
            drinks: Vec::new(),
            dj: false,
            allergies: String::new(),
            special_occasion: String::new(),
            other_activity: String::new(),
            activities: Vec::new(),
        }
    }
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_helicopter(&self) -> bool {
        self.vessel
            .as_ref()
            .is_some_and(|vessel| vessel.kind == VesselKind::Helicopter)
    }
}

/// Adds or removes `item`, keeping first-selection order and no repeats.
pub fn set_membership(list: &mut Vec<String>, item: &str, checked: bool) {
    if checked {
        if !list.iter().any(|existing| existing == item) {
            list.push(item.to_string());
        }
    } else {
        list.retain(|existing| existing != item);
    }
}
