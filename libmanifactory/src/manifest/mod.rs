//! Image manifest data structures.
//!
//! Only the Docker image manifest v2 (schema 2) shape is modelled. Manifest
//! lists are recognised by media type and skipped, never resolved.

use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// Media type requested when fetching manifests.
pub const MANIFEST_V2_MEDIA_TYPE: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// Media type of a multi-architecture manifest list.
pub const MANIFEST_LIST_MEDIA_TYPE: &str =
    "application/vnd.docker.distribution.manifest.list.v2+json";

/// Returns true if `media_type` names a manifest list.
pub fn is_manifest_list(media_type: &str) -> bool {
    media_type.contains("list")
}

/// A content-addressed blob reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Media type of the referenced content
    #[serde(default)]
    pub media_type: String,
    /// Size of the content in bytes
    #[serde(default)]
    pub size: u64,
    /// Algorithm-prefixed digest, e.g. `sha256:...`
    #[serde(default)]
    pub digest: String,
}

/// An image manifest: config descriptor plus ordered layers.
///
/// Missing fields decode to their zero value, and `Manifest::default()` is the
/// empty result returned when a manifest list is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub config: Descriptor,
    #[serde(default)]
    pub layers: Vec<Descriptor>,
}

/// Outcome of a manifest fetch.
///
/// The registry may answer a manifest request with a manifest list. Those are
/// not resolved to a platform; the fetch succeeds with [`ManifestOrList::SkippedList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestOrList {
    /// An ordinary image manifest
    Manifest(Manifest),
    /// A manifest list was returned and skipped
    SkippedList {
        /// Media type reported by the registry
        media_type: String,
    },
}

impl ManifestOrList {
    /// Classifies a decoded manifest by its media type.
    pub fn from_manifest(manifest: Manifest) -> Self {
        if is_manifest_list(&manifest.media_type) {
            Self::SkippedList {
                media_type: manifest.media_type,
            }
        } else {
            Self::Manifest(manifest)
        }
    }

    /// Returns true if a manifest list was skipped.
    pub fn is_skipped_list(&self) -> bool {
        matches!(self, Self::SkippedList { .. })
    }

    /// Returns the manifest, if this is an ordinary manifest.
    pub fn as_manifest(&self) -> Option<&Manifest> {
        match self {
            Self::Manifest(manifest) => Some(manifest),
            Self::SkippedList { .. } => None,
        }
    }

    /// Consumes self, yielding the zero-value manifest for a skipped list.
    pub fn into_manifest(self) -> Manifest {
        match self {
            Self::Manifest(manifest) => manifest,
            Self::SkippedList { .. } => Manifest::default(),
        }
    }
}
