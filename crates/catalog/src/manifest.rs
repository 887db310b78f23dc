use std::collections::{BTreeMap, HashSet};

use charter_core::{Vessel, VesselKind};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::naming::{display_name, is_valid_id};
use crate::CatalogError;

/// Hand-authored catalog: images are tagged up front instead of guessed from file names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselManifest {
    pub vessels: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Asset folder, used for the display-name table and kind detection.
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    /// `catamaran`, `yacht`, `helicopter`, `heli`; falls back to the folder name.
    pub kind: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub exterior: Vec<String>,
    #[serde(default)]
    pub interior: Vec<String>,
}

impl VesselManifest {
    pub fn into_vessels(
        self,
        display_names: &BTreeMap<String, String>,
    ) -> Result<Vec<Vessel>, CatalogError> {
        let mut seen = HashSet::new();
        let mut vessels = Vec::with_capacity(self.vessels.len());

        for entry in self.vessels {
            if !is_valid_id(&entry.id) {
                return Err(CatalogError::InvalidId(entry.id));
            }
            if !seen.insert(entry.id.clone()) {
                return Err(CatalogError::DuplicateId(entry.id));
            }
            if let Some(vessel) = entry.into_vessel(display_names)? {
                vessels.push(vessel);
            }
        }

        vessels.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(vessels)
    }
}

impl ManifestEntry {
    fn into_vessel(
        self,
        display_names: &BTreeMap<String, String>,
    ) -> Result<Option<Vessel>, CatalogError> {
        let name = match (&self.name, &self.folder) {
            (Some(name), _) if !name.trim().is_empty() => name.trim().to_string(),
            (_, Some(folder)) if !folder.trim().is_empty() => display_name(folder.trim(), display_names),
            _ => return Err(CatalogError::UnnamedEntry(self.id)),
        };
        let kind = match self.kind.as_deref() {
            Some(code) => VesselKind::parse(code).ok_or_else(|| CatalogError::UnknownKind {
                id: self.id.clone(),
                kind: code.to_string(),
            })?,
            None => self
                .folder
                .as_deref()
                .map(VesselKind::from_folder)
                .unwrap_or(VesselKind::Catamaran),
        };

        let exterior = dedupe(self.exterior);
        let interior = dedupe(self.interior);

        let thumbnail = match self.thumbnail {
            Some(thumbnail) => {
                if !exterior.contains(&thumbnail) && !interior.contains(&thumbnail) {
                    return Err(CatalogError::ThumbnailNotListed {
                        id: self.id,
                        thumbnail,
                    });
                }
                if !exterior.is_empty() && !exterior.contains(&thumbnail) {
                    return Err(CatalogError::ThumbnailNotExterior {
                        id: self.id,
                        thumbnail,
                    });
                }
                thumbnail
            }
            None => match exterior.first().or_else(|| interior.first()) {
                Some(first) => first.clone(),
                None => {
                    warn!(vessel_id = %self.id, "manifest entry has no images; skipped");
                    return Ok(None);
                }
            },
        };

        Ok(Some(Vessel {
            id: self.id,
            name,
            kind,
            thumbnail,
            exterior,
            interior,
        }))
    }
}

fn dedupe(images: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    images
        .into_iter()
        .filter(|image| seen.insert(image.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use charter_core::config::default_display_names;

    fn parse(raw: &str) -> VesselManifest {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn manifest_keeps_authored_image_order() {
        let manifest = parse(
            r#"{ "vessels": [
                { "id": "umoja", "folder": "Umoja",
                  "exterior": ["/u/boat3.png", "/u/boat1.png", "/u/boat3.png"],
                  "interior": ["/u/interior1.jpg"] },
                { "id": "black-bird-heli", "name": "Black Bird", "kind": "helicopter",
                  "thumbnail": "/h/heli2.jpg", "exterior": ["/h/heli1.jpg", "/h/heli2.jpg"] }
            ] }"#,
        );
        let vessels = manifest.into_vessels(&default_display_names()).unwrap();
        assert_eq!(vessels[0].id, "black-bird-heli");
        assert_eq!(vessels[0].thumbnail, "/h/heli2.jpg");
        assert_eq!(vessels[0].kind, VesselKind::Helicopter);

        assert_eq!(vessels[1].name, "UMOJA CATAMARAN");
        assert_eq!(vessels[1].exterior, vec!["/u/boat3.png", "/u/boat1.png"]);
        assert_eq!(vessels[1].thumbnail, "/u/boat3.png");
    }

    #[test]
    fn rejects_thumbnails_outside_the_lists() {
        let manifest = parse(
            r#"{ "vessels": [ { "id": "umoja", "name": "Umoja",
                 "thumbnail": "/u/cover.png", "exterior": ["/u/boat1.png"] } ] }"#,
        );
        assert!(matches!(
            manifest.into_vessels(&BTreeMap::new()),
            Err(CatalogError::ThumbnailNotListed { .. })
        ));
    }

    #[test]
    fn thumbnail_must_be_exterior_when_exteriors_exist() {
        let manifest = parse(
            r#"{ "vessels": [ { "id": "umoja", "name": "Umoja",
                 "thumbnail": "/u/interior1.jpg",
                 "exterior": ["/u/boat1.png"], "interior": ["/u/interior1.jpg"] } ] }"#,
        );
        assert!(matches!(
            manifest.into_vessels(&BTreeMap::new()),
            Err(CatalogError::ThumbnailNotExterior { thumbnail, .. }) if thumbnail == "/u/interior1.jpg"
        ));

        let interior_only = parse(
            r#"{ "vessels": [ { "id": "umoja", "name": "Umoja",
                 "thumbnail": "/u/interior2.jpg",
                 "interior": ["/u/interior1.jpg", "/u/interior2.jpg"] } ] }"#,
        );
        let vessels = interior_only.into_vessels(&BTreeMap::new()).unwrap();
        assert_eq!(vessels[0].thumbnail, "/u/interior2.jpg");
    }

    #[test]
    fn kind_accepts_short_codes_and_rejects_unknown_ones() {
        let heli = parse(
            r#"{ "vessels": [ { "id": "black-bird", "name": "Black Bird", "kind": "Heli",
                 "exterior": ["/h/heli1.jpg"] } ] }"#,
        );
        let vessels = heli.into_vessels(&BTreeMap::new()).unwrap();
        assert_eq!(vessels[0].kind, VesselKind::Helicopter);

        let unknown = parse(
            r#"{ "vessels": [ { "id": "nautilus", "name": "Nautilus", "kind": "submarine",
                 "exterior": ["/n/boat1.png"] } ] }"#,
        );
        assert!(matches!(
            unknown.into_vessels(&BTreeMap::new()),
            Err(CatalogError::UnknownKind { kind, .. }) if kind == "submarine"
        ));
    }

    #[test]
    fn rejects_bad_and_repeated_ids() {
        let bad = parse(r#"{ "vessels": [ { "id": "Sunday Kinga", "name": "x", "exterior": ["/a.png"] } ] }"#);
        assert!(matches!(
            bad.into_vessels(&BTreeMap::new()),
            Err(CatalogError::InvalidId(_))
        ));

        let repeated = parse(
            r#"{ "vessels": [
                { "id": "umoja", "name": "Umoja", "exterior": ["/a.png"] },
                { "id": "umoja", "name": "Umoja II", "exterior": ["/b.png"] }
            ] }"#,
        );
        assert!(matches!(
            repeated.into_vessels(&BTreeMap::new()),
            Err(CatalogError::DuplicateId(id)) if id == "umoja"
        ));
    }

    #[test]
    fn entries_without_images_are_omitted() {
        let manifest = parse(r#"{ "vessels": [ { "id": "ghost", "name": "Ghost" } ] }"#);
        assert!(manifest.into_vessels(&BTreeMap::new()).unwrap().is_empty());

        let unnamed = parse(r#"{ "vessels": [ { "id": "ghost", "exterior": ["/a.png"] } ] }"#);
        assert!(matches!(
            unnamed.into_vessels(&BTreeMap::new()),
            Err(CatalogError::UnnamedEntry(_))
        ));
    }
}
