//! Object definitions

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a user-created object
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A user-curated object with its recorded win/lose relationships
///
/// Relationships are plain ids resolved against a graph snapshot at read time.
/// Neither set has to agree with the other object's view of the pairing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameObject {
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub image_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Objects this one defeats
    #[serde(default, alias = "wins")]
    pub beats: BTreeSet<ObjectId>,
    /// Objects that defeat this one
    #[serde(default, alias = "loses")]
    pub loses_to: BTreeSet<ObjectId>,
    /// Informational only, never consulted when resolving
    #[serde(default)]
    pub win_count: u32,
    /// Informational only, never consulted when resolving
    #[serde(default)]
    pub times_used: u32,
}

impl GameObject {
    /// Create an object with no relationships and zeroed counters
    pub fn new(id: impl Into<ObjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_path: String::new(),
            download_url: None,
            beats: BTreeSet::new(),
            loses_to: BTreeSet::new(),
            win_count: 0,
            times_used: 0,
        }
    }

    /// Builder helper: record that this object beats `other`
    pub fn beating(mut self, other: impl Into<ObjectId>) -> Self {
        self.beats.insert(other.into());
        self
    }

    /// Builder helper: record that this object loses to `other`
    pub fn losing_to(mut self, other: impl Into<ObjectId>) -> Self {
        self.loses_to.insert(other.into());
        self
    }

    pub fn with_image(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = image_path.into();
        self
    }

    /// True if this object's own record claims victory over `other`
    pub fn claims_win_over(&self, other: &ObjectId) -> bool {
        self.beats.contains(other)
    }

    /// True if this object's own record concedes defeat to `other`
    pub fn concedes_to(&self, other: &ObjectId) -> bool {
        self.loses_to.contains(other)
    }

    /// Replace everything except the identity with `newer`'s fields
    pub fn update(&mut self, newer: GameObject) {
        let GameObject {
            name,
            image_path,
            download_url,
            beats,
            loses_to,
            win_count,
            times_used,
            ..
        } = newer;
        self.name = name;
        self.image_path = image_path;
        self.download_url = download_url;
        self.beats = beats;
        self.loses_to = loses_to;
        self.win_count = win_count;
        self.times_used = times_used;
    }
}
