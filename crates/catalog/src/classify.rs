use std::collections::{BTreeMap, HashMap};

use charter_core::{Vessel, VesselKind};
use tracing::debug;

use crate::naming::{display_name, vessel_id};
use crate::ordering::{sort_images, GalleryImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageClass {
    Exterior,
    Interior,
}

/// `m-interior2.jpg` is interior; `boat3.png` and `heli1.jpg` are exterior; anything else is skipped.
pub fn classify_file_name(file_name: &str) -> Option<ImageClass> {
    let lower = file_name.to_lowercase();
    if lower.contains("interior") {
        Some(ImageClass::Interior)
    } else if lower.contains("boat") || lower.contains("heli") {
        Some(ImageClass::Exterior)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ThumbnailRank {
    Interior,
    Exterior,
    Boat,
    PrimaryBoat,
}

fn thumbnail_rank(file_name: &str, class: ImageClass) -> ThumbnailRank {
    let lower = file_name.to_lowercase();
    match class {
        ImageClass::Interior => ThumbnailRank::Interior,
        ImageClass::Exterior if lower.contains("boat1") => ThumbnailRank::PrimaryBoat,
        ImageClass::Exterior if lower.contains("boat") => ThumbnailRank::Boat,
        ImageClass::Exterior => ThumbnailRank::Exterior,
    }
}

struct VesselBuilder {
    folder: String,
    exterior: Vec<GalleryImage>,
    interior: Vec<GalleryImage>,
    thumbnail: Option<(ThumbnailRank, String)>,
}

impl VesselBuilder {
    fn new(folder: &str) -> Self {
        Self {
            folder: folder.to_string(),
            exterior: Vec::new(),
            interior: Vec::new(),
            thumbnail: None,
        }
    }

    fn add(&mut self, file_name: &str, reference: String, class: ImageClass) {
        let list = match class {
            ImageClass::Exterior => &mut self.exterior,
            ImageClass::Interior => &mut self.interior,
        };
        if list.iter().any(|image| image.reference == reference) {
            return;
        }

        let rank = thumbnail_rank(file_name, class);
        let replaces = self
            .thumbnail
            .as_ref()
            .map_or(true, |(current, _)| rank > *current);
        if replaces {
            self.thumbnail = Some((rank, reference.clone()));
        }

        list.push(GalleryImage {
            file_name: file_name.to_string(),
            reference,
        });
    }

    fn build(mut self, id: String, display_names: &BTreeMap<String, String>) -> Option<Vessel> {
        let (_, thumbnail) = self.thumbnail?;
        sort_images(&mut self.exterior);
        sort_images(&mut self.interior);

        Some(Vessel {
            id,
            name: display_name(&self.folder, display_names),
            kind: VesselKind::from_folder(&self.folder),
            thumbnail,
            exterior: self.exterior.into_iter().map(|image| image.reference).collect(),
            interior: self.interior.into_iter().map(|image| image.reference).collect(),
        })
    }
}

/// Groups `folder/file` paths into vessels, sorted by display name.
///
/// The folder is the second-to-last path segment. Paths without one and files
/// that classify as neither exterior nor interior are dropped.
pub fn classify_assets<I, P, R>(entries: I, display_names: &BTreeMap<String, String>) -> Vec<Vessel>
where
    I: IntoIterator<Item = (P, R)>,
    P: AsRef<str>,
    R: Into<String>,
{
    let mut order = Vec::new();
    let mut builders: HashMap<String, VesselBuilder> = HashMap::new();

    for (path, reference) in entries {
        let path = path.as_ref();
        let segments = path
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        let [.., folder, file_name] = segments.as_slice() else {
            debug!(path, "asset without a folder segment skipped");
            continue;
        };

        let Some(class) = classify_file_name(file_name) else {
            debug!(path, "unclassified asset skipped");
            continue;
        };

        let id = vessel_id(folder);
        if id.is_empty() {
            debug!(folder = *folder, "folder yields no usable identifier");
            continue;
        }

        let builder = builders.entry(id.clone()).or_insert_with(|| {
            order.push(id.clone());
            VesselBuilder::new(folder)
        });
        builder.add(file_name, reference.into(), class);
    }

    let mut vessels = order
        .into_iter()
        .filter_map(|id| {
            let builder = builders.remove(&id)?;
            builder.build(id, display_names)
        })
        .collect::<Vec<_>>();
    vessels.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    vessels
}
