mod classify;
mod manifest;
mod naming;
mod ordering;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use charter_core::{Vessel, VesselDirectory, VesselKind};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use walkdir::WalkDir;

pub use classify::{classify_assets, classify_file_name, ImageClass};
pub use manifest::{ManifestEntry, VesselManifest};
pub use naming::{display_name, vessel_id};
pub use ordering::{compare_file_names, numeric_token};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("asset root {0} is not a directory")]
    MissingRoot(PathBuf),
    #[error("failed reading vessel manifest {path}: {source}")]
    ReadManifest {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid vessel manifest {path}: {source}")]
    ParseManifest {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("vessel id `{0}` is not lowercase, dash-separated and URL-safe")]
    InvalidId(String),
    #[error("vessel id `{0}` appears more than once")]
    DuplicateId(String),
    #[error("vessel `{0}` has neither a name nor a folder")]
    UnnamedEntry(String),
    #[error("thumbnail `{thumbnail}` of vessel `{id}` is not one of its images")]
    ThumbnailNotListed { id: String, thumbnail: String },
    #[error("thumbnail `{thumbnail}` of vessel `{id}` must be an exterior image")]
    ThumbnailNotExterior { id: String, thumbnail: String },
    #[error("vessel `{id}` has unknown kind `{kind}`")]
    UnknownKind { id: String, kind: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    Entries,
    AssetDir,
    Manifest,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub source: CatalogSource,
    pub vessels: usize,
    pub catamarans: usize,
    pub helicopters: usize,
    pub images: usize,
}

/// Immutable list of charterable vessels, sorted by display name.
#[derive(Debug, Clone)]
pub struct Catalog {
    vessels: Vec<Vessel>,
    source: CatalogSource,
}

impl Catalog {
    pub fn from_entries<I, P, R>(entries: I, display_names: &BTreeMap<String, String>) -> Self
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: Into<String>,
    {
        Self {
            vessels: classify_assets(entries, display_names),
            source: CatalogSource::Entries,
        }
    }

    /// Walks `root` for images. References are root-relative with `/` separators.
    pub fn from_asset_dir(
        root: impl AsRef<Path>,
        display_names: &BTreeMap<String, String>,
    ) -> Result<Self, CatalogError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(CatalogError::MissingRoot(root.to_path_buf()));
        }

        let entries = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            })
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(root).ok()?;
                let joined = relative
                    .components()
                    .map(|part| part.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                Some((joined.clone(), joined))
            })
            .collect::<Vec<_>>();

        let catalog = Self {
            vessels: classify_assets(entries, display_names),
            source: CatalogSource::AssetDir,
        };
        info!(
            root = %root.display(),
            vessels = catalog.vessels.len(),
            "catalog loaded from asset directory"
        );
        Ok(catalog)
    }

    pub fn from_manifest(
        manifest: VesselManifest,
        display_names: &BTreeMap<String, String>,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            vessels: manifest.into_vessels(display_names)?,
            source: CatalogSource::Manifest,
        })
    }

    pub fn from_manifest_file(
        path: impl AsRef<Path>,
        display_names: &BTreeMap<String, String>,
    ) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::ReadManifest {
            path: path.display().to_string(),
            source,
        })?;
        let manifest: VesselManifest =
            serde_json::from_str(&raw).map_err(|source| CatalogError::ParseManifest {
                path: path.display().to_string(),
                source,
            })?;

        let catalog = Self::from_manifest(manifest, display_names)?;
        info!(
            manifest = %path.display(),
            vessels = catalog.vessels.len(),
            "catalog loaded from manifest"
        );
        Ok(catalog)
    }

    pub fn find(&self, id: &str) -> Option<&Vessel> {
        self.vessels.iter().find(|vessel| vessel.id == id)
    }

    pub fn vessels(&self) -> &[Vessel] {
        &self.vessels
    }

    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        let helicopters = self
            .vessels
            .iter()
            .filter(|vessel| vessel.kind == VesselKind::Helicopter)
            .count();
        CatalogStats {
            source: self.source,
            vessels: self.vessels.len(),
            catamarans: self.vessels.len() - helicopters,
            helicopters,
            images: self.vessels.iter().map(Vessel::image_count).sum(),
        }
    }
}

impl VesselDirectory for Catalog {
    fn vessels(&self) -> &[Vessel] {
        &self.vessels
    }

    fn find_vessel(&self, id: &str) -> Option<&Vessel> {
        self.find(id)
    }
}
