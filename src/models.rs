//! Data structures produced and consumed while compiling a directive document.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chunks::ChunkRecord;
use crate::classify::ResourceType;

/// Link relation of an emitted entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rel {
  /// Fetch for the current navigation.
  #[default]
  Preload,
  /// Fetch at idle priority for a likely future navigation.
  Prefetch,
  /// Open a connection ahead of time.
  Preconnect,
  /// Resolve a host name ahead of time.
  DnsPrefetch,
  /// Render a likely next page in the background.
  Prerender,
}

impl Rel {
  /// Attribute value as rendered in the directive.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Preload => "preload",
      Self::Prefetch => "prefetch",
      Self::Preconnect => "preconnect",
      Self::DnsPrefetch => "dns-prefetch",
      Self::Prerender => "prerender",
    }
  }
}

impl fmt::Display for Rel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A user-declared resource, added to the directive or overriding an inferred entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ManagedAsset {
  /// Path rendered verbatim in the Link entry.
  pub path: String,
  /// Optional `as` destination.
  #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
  pub as_: Option<ResourceType>,
  /// Optional MIME `type` attribute.
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub mime: Option<String>,
  /// Link relation, `preload` unless stated.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rel: Option<Rel>,
  /// Mark the entry `nopush` and keep it out of the push statement.
  pub nopush: bool,
  /// Fetch the resource anonymously.
  pub crossorigin: bool,
}

impl ManagedAsset {
  /// Managed asset with only a path.
  pub fn new(path: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      ..Self::default()
    }
  }

  /// Set the `as` destination.
  pub fn with_as(mut self, as_: ResourceType) -> Self {
    self.as_ = Some(as_);
    self
  }

  /// Set the link relation.
  pub fn with_rel(mut self, rel: Rel) -> Self {
    self.rel = Some(rel);
    self
  }
}

/// A build output path together with the chunk metadata it was emitted for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestAsset {
  /// Output path relative to the build output root.
  pub path: String,
  /// Whether the owning chunk is only ever loaded as part of the initial page.
  pub is_initial: bool,
  /// Whether the owning chunk may be part of the initial page.
  pub can_be_initial: bool,
  /// Whether the owning chunk carries the bundler runtime.
  pub has_runtime_entry: bool,
  /// Name of the owning chunk, when it has one.
  pub chunk_name: Option<String>,
}

/// Fully resolved decision for one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
  /// Path exactly as rendered between `<` and `>`.
  pub path: String,
  /// Link relation.
  pub rel: Rel,
  /// `as` destination; always absent for inferred prefetch entries.
  pub as_: Option<ResourceType>,
  /// MIME `type` attribute.
  pub mime: Option<String>,
  /// Whether `nopush` is rendered.
  pub nopush: bool,
  /// Whether `crossorigin=anonymous` is rendered.
  pub crossorigin: bool,
}

impl LinkEntry {
  /// Entry for `path` with no optional attributes.
  pub fn new(path: impl Into<String>, rel: Rel) -> Self {
    Self {
      path: path.into(),
      rel,
      as_: None,
      mime: None,
      nopush: false,
      crossorigin: false,
    }
  }
}

/// Intermediate representation of the synthesized directive artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveDocument {
  /// Literal route of the header block, with any push marker removed.
  pub header_path: String,
  /// Entries with `rel=preload`.
  pub preload_group: Vec<LinkEntry>,
  /// Every other entry.
  pub hint_group: Vec<LinkEntry>,
  /// Targets of the push statement, present only in push mode.
  pub push_paths: Option<Vec<String>>,
  /// Route answered with 404 so the directive file itself is never served.
  pub self_fallback_path: String,
}

impl DirectiveDocument {
  /// Iterate over both groups, preload entries first.
  pub fn entries(&self) -> impl Iterator<Item = &LinkEntry> {
    self.preload_group.iter().chain(self.hint_group.iter())
  }
}

/// Cross-origin loading policy of the bundler's own script and style tags.
///
/// Serialized the way bundlers spell it: `false`, `"anonymous"` or `"use-credentials"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RawCrossOriginLoading", into = "RawCrossOriginLoading")]
pub enum CrossOriginLoading {
  /// Assets are loaded without a `crossorigin` attribute.
  #[default]
  Disabled,
  /// Assets are loaded with `crossorigin="anonymous"`.
  Anonymous,
  /// Assets are loaded with `crossorigin="use-credentials"`.
  UseCredentials,
}

impl CrossOriginLoading {
  /// `true` when assets are fetched in anonymous mode.
  pub fn is_anonymous(self) -> bool {
    self == Self::Anonymous
  }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
enum RawCrossOriginLoading {
  Flag(bool),
  Mode(String),
}

impl TryFrom<RawCrossOriginLoading> for CrossOriginLoading {
  type Error = String;

  fn try_from(raw: RawCrossOriginLoading) -> Result<Self, Self::Error> {
    match raw {
      RawCrossOriginLoading::Flag(false) => Ok(Self::Disabled),
      RawCrossOriginLoading::Flag(true) => Ok(Self::Anonymous),
      RawCrossOriginLoading::Mode(mode) => match mode.as_str() {
        "anonymous" => Ok(Self::Anonymous),
        "use-credentials" => Ok(Self::UseCredentials),
        other => Err(format!(
          "unknown crossOriginLoading value '{other}', expected false, \"anonymous\" or \"use-credentials\""
        )),
      },
    }
  }
}

impl From<CrossOriginLoading> for RawCrossOriginLoading {
  fn from(policy: CrossOriginLoading) -> Self {
    match policy {
      CrossOriginLoading::Disabled => Self::Flag(false),
      CrossOriginLoading::Anonymous => Self::Mode("anonymous".into()),
      CrossOriginLoading::UseCredentials => Self::Mode("use-credentials".into()),
    }
  }
}

/// Serializable snapshot of a finished build, as written by a bundler integration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildSnapshot {
  /// Output asset paths relative to the output root.
  pub assets: Vec<String>,
  /// Chunk metadata keyed by chunk identifier.
  pub chunks: BTreeMap<String, ChunkRecord>,
  /// The bundler's cross-origin loading policy.
  pub cross_origin_loading: CrossOriginLoading,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn managed_assets_deserialize_with_defaults() {
    let asset: ManagedAsset =
      serde_json::from_str(r#"{"path": "/font.woff2", "as": "font"}"#).unwrap();
    assert_eq!(asset.path, "/font.woff2");
    assert_eq!(asset.as_, Some(ResourceType::Font));
    assert_eq!(asset.rel, None);
    assert!(!asset.nopush);
    assert!(!asset.crossorigin);
  }

  #[test]
  fn managed_assets_accept_every_attribute() {
    let asset: ManagedAsset = serde_json::from_str(
      r#"{"path": "https://cdn.example", "rel": "dns-prefetch", "type": "text/plain", "nopush": true, "crossorigin": true}"#,
    )
    .unwrap();
    assert_eq!(asset.rel, Some(Rel::DnsPrefetch));
    assert_eq!(asset.mime.as_deref(), Some("text/plain"));
    assert!(asset.nopush);
    assert!(asset.crossorigin);
  }

  #[test]
  fn missing_managed_path_deserializes_empty() {
    let asset: ManagedAsset = serde_json::from_str(r#"{"as": "script"}"#).unwrap();
    assert!(asset.path.is_empty());
  }

  #[test]
  fn build_snapshot_reads_camel_case_fields() {
    let snapshot: BuildSnapshot = serde_json::from_str(
      r#"{
        "assets": ["app.js", "lazy.css"],
        "chunks": {
          "0": {"name": "main", "files": ["app.js"], "initial": true, "canBeInitial": true, "runtime": true}
        },
        "crossOriginLoading": "anonymous"
      }"#,
    )
    .unwrap();
    assert_eq!(snapshot.assets.len(), 2);
    assert!(snapshot.chunks["0"].initial);
    assert_eq!(snapshot.cross_origin_loading, CrossOriginLoading::Anonymous);
  }

  #[test]
  fn cross_origin_loading_accepts_bundler_spellings() {
    let parse = |value: &str| {
      serde_json::from_str::<CrossOriginLoading>(value).map_err(|err| err.to_string())
    };
    assert_eq!(parse("false"), Ok(CrossOriginLoading::Disabled));
    assert_eq!(parse(r#""anonymous""#), Ok(CrossOriginLoading::Anonymous));
    assert_eq!(parse(r#""use-credentials""#), Ok(CrossOriginLoading::UseCredentials));
    assert!(parse(r#""sometimes""#).is_err());

    let snapshot: BuildSnapshot = serde_json::from_str(r#"{"assets": ["app.js"]}"#).unwrap();
    assert_eq!(snapshot.cross_origin_loading, CrossOriginLoading::Disabled);
  }

  #[test]
  fn cross_origin_loading_serializes_like_bundlers() {
    assert_eq!(serde_json::to_string(&CrossOriginLoading::Disabled).unwrap(), "false");
    assert_eq!(
      serde_json::to_string(&CrossOriginLoading::UseCredentials).unwrap(),
      r#""use-credentials""#
    );
  }
}
