use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One entry in the ordered navigation tree.
///
/// The wire shape matches the hand-edited manifest: a leaf is a single-key
/// mapping `{name: target}`, a branch is `{name: [entries...]}`, and a bare
/// string is a document reference without a display name. The same shape is
/// used in YAML (the manifest file) and JSON (the navigation API).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEntry {
    /// Bare document reference, e.g. `"index.md"`.
    Doc(String),
    /// Named reference to a single document.
    Leaf { name: String, target: String },
    /// Named group of nested entries, in authored order.
    Branch { name: String, children: Vec<NavEntry> },
}

impl NavEntry {
    /// Display name of the entry. Bare references have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            NavEntry::Doc(_) => None,
            NavEntry::Leaf { name, .. } | NavEntry::Branch { name, .. } => Some(name),
        }
    }
}

impl Serialize for NavEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NavEntry::Doc(target) => serializer.serialize_str(target),
            NavEntry::Leaf { name, target } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(name, target)?;
                map.end()
            }
            NavEntry::Branch { name, children } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(name, children)?;
                map.end()
            }
        }
    }
}

/// The value side of a named entry: either a document path or nested entries.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNavValue {
    Target(String),
    Children(Vec<NavEntry>),
}

impl<'de> Deserialize<'de> for NavEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = NavEntry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a document path or a single-key mapping")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<NavEntry, E> {
                Ok(NavEntry::Doc(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<NavEntry, E> {
                Ok(NavEntry::Doc(v))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<NavEntry, A::Error> {
                let Some((name, value)) = map.next_entry::<String, RawNavValue>()? else {
                    return Err(de::Error::invalid_length(0, &"a single-key mapping"));
                };
                if map.next_key::<String>()?.is_some() {
                    return Err(de::Error::custom(
                        "navigation entries must have exactly one key",
                    ));
                }
                Ok(match value {
                    RawNavValue::Target(target) => NavEntry::Leaf { name, target },
                    RawNavValue::Children(children) => NavEntry::Branch { name, children },
                })
            }
        }

        deserializer.deserialize_any(EntryVisitor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResponse {
    pub navigation: Vec<NavEntry>,
    pub manifest_path: String,
}

/// Input for the bulk-edit escape hatch: replaces the whole entry list.
/// The caller is responsible for its internal validity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceNavigationInput {
    pub navigation: Vec<NavEntry>,
    pub commit_message: Option<String>,
    #[serde(default = "super::default_push")]
    pub push: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavUpdateResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_error: Option<bool>,
}

/// Result of walking the manifest against the document tree.
///
/// `orphaned` lists manifest targets missing on disk. The inverse case,
/// files on disk that no manifest entry references, is not detected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub orphaned: Vec<String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            orphaned: Vec::new(),
        }
    }
}
