//! Data types and closed vocabularies for the editor client
//!
//! All identifiers are opaque digit strings assigned by the remote service;
//! this crate never invents them. The vocabularies below are part of this
//! client's contract and are checked before any network call.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Nested option groups, flattened on the wire to `group[field]` keys
pub type OptionGroups = BTreeMap<String, BTreeMap<String, String>>;

/// Accepted media types for [`media_add`](crate::RcClient::media_add)
pub const MEDIA_TYPES: &[&str] = &["image", "audio"];

/// Accepted licenses for media files
pub const LICENSES: &[&str] = &[
    "all-rights-reserved",
    "cc-by",
    "cc-by-sa",
    "cc-by-nc",
    "cc-by-nc-sa",
    "cc-by-nc-nd",
    "public-domain",
];

/// Accepted media-set genres, grouped as the editor presents them
pub const MEDIASET_GENRES: &[&str] = &[
    // publication
    "publication",
    "paper",
    "catalogue",
    "article",
    "book",
    "broadcast",
    "cd",
    "dvd",
    // event
    "event",
    "exhibition",
    "screening",
    "concert",
    "performance",
    "festival",
    "seminar",
    "conference",
    "presentation",
    "workshop",
    // art object
    "art object",
    "installation",
    "scenery",
    "piece",
    "design",
    "screenplay",
    "sound",
    "photograph",
    "painting",
    "scale model",
    "digital artwork",
    "visualisation",
    "illustration",
    "ceramic",
    "print",
    "construction",
    "drawing",
    "video",
    "composition",
    "movie",
];

/// Check a media type against [`MEDIA_TYPES`]
pub fn validate_media_type(value: &str) -> Result<()> {
    validate(MEDIA_TYPES, "media type", value)
}

/// Check a license against [`LICENSES`]
pub fn validate_license(value: &str) -> Result<()> {
    validate(LICENSES, "license", value)
}

/// Check a media-set genre against [`MEDIASET_GENRES`]
pub fn validate_mediaset_genre(value: &str) -> Result<()> {
    validate(MEDIASET_GENRES, "media-set genre", value)
}

fn validate(vocabulary: &[&str], kind: &'static str, value: &str) -> Result<()> {
    if vocabulary.contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidVocabulary {
            kind,
            value: value.to_string(),
        })
    }
}

/// Content type and media category derived from an upload file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadKind {
    /// MIME type sent with the file part
    pub mime: &'static str,
    /// Media category the editor files the upload under (`image` or `audio`)
    pub media_type: &'static str,
}

/// Extension → (MIME, category) table for uploads
const UPLOAD_KINDS: &[(&str, UploadKind)] = &[
    ("png", UploadKind { mime: "image/png", media_type: "image" }),
    ("gif", UploadKind { mime: "image/gif", media_type: "image" }),
    ("svg", UploadKind { mime: "image/svg+xml", media_type: "image" }),
    ("tif", UploadKind { mime: "image/tiff", media_type: "image" }),
    ("tiff", UploadKind { mime: "image/tiff", media_type: "image" }),
    ("jpg", UploadKind { mime: "image/jpeg", media_type: "image" }),
    ("jpeg", UploadKind { mime: "image/jpeg", media_type: "image" }),
    ("mp3", UploadKind { mime: "audio/mpeg", media_type: "audio" }),
];

/// Derive the upload content type from a file name extension.
///
/// Purely local: an unrecognized extension fails with
/// [`Error::UnknownFileType`] before any network call.
pub fn upload_kind_for(path: &Path) -> Result<UploadKind> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    UPLOAD_KINDS
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| Error::UnknownFileType(path.display().to_string()))
}

/// One entry of the simple-media listing: the file's tool and title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub tool: String,
    pub title: String,
}

/// One entry of a page's item listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub tool: String,
    pub title: String,
}

/// Result of the item-detail extractor: the tool name from the edit form's
/// title (if it matched) and the form's current values as nested groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub tool: Option<String>,
    pub fields: OptionGroups,
}

/// Rectangular placement of an item on a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub rotate: i32,
}

impl Rect {
    /// Placement without rotation
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            rotate: 0,
        }
    }

    /// Same placement, rotated by `degrees`
    pub fn rotated(mut self, degrees: i32) -> Self {
        self.rotate = degrees;
        self
    }
}

/// JSON shape of the `/editor/work-children` response
#[derive(Debug, Deserialize)]
pub(crate) struct WorkChildren {
    pub files: Vec<WorkFile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkFile {
    pub id: serde_json::Value,
    pub tool: String,
    pub title: String,
}

impl WorkFile {
    /// The service serializes file ids sometimes as numbers, sometimes as
    /// strings; normalize to the digit-string form used everywhere else
    pub fn id_string(&self) -> String {
        match &self.id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
