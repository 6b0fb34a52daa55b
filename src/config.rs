//! Directive configuration and the loader for configuration files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::ManagedAsset;
use crate::patterns::PatternRule;

/// File names searched by [`DirectiveConfig::discover`], in order.
pub const DEFAULT_CONFIG_FILES: [&str; 3] = [
  "caddy-push.config.json",
  "caddy-push.config.yaml",
  "caddy-push.config.yml",
];

/// Route suffix that switches the header path into server-push mode.
pub const PUSH_MARKER: &str = "?push";

/// Options controlling what the directive compiler emits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DirectiveConfig {
  /// Name of the synthesized artifact and of its 404 fallback route.
  pub self_output_file_name: String,
  /// Route the directive applies to; may end with [`PUSH_MARKER`].
  pub header_path: String,
  /// Assets are candidates when they match at least one of these rules.
  pub include_patterns: Vec<PatternRule>,
  /// Candidates matching any of these rules are dropped.
  pub ignore_patterns: Vec<PatternRule>,
  /// Candidates matching any of these rules are hinted with `rel=prefetch`.
  pub prefetch_patterns: Vec<PatternRule>,
  /// Manually declared entries, overriding inferred entries with the same path.
  pub managed_assets: Vec<ManagedAsset>,
  /// Mark every emitted entry `crossorigin=anonymous`.
  pub global_anonymous: bool,
  /// Log every pattern decision at `info` level.
  pub trace_matches: bool,
}

impl Default for DirectiveConfig {
  fn default() -> Self {
    Self {
      self_output_file_name: "push.caddy".into(),
      header_path: "/".into(),
      include_patterns: vec![PatternRule::regex(r"\.(html|css|js)(\?.*)?$")],
      ignore_patterns: Vec::new(),
      prefetch_patterns: Vec::new(),
      managed_assets: Vec::new(),
      global_anonymous: false,
      trace_matches: false,
    }
  }
}

impl DirectiveConfig {
  /// Look for a configuration file in `dir`, falling back to defaults when none exists.
  ///
  /// A file that exists but cannot be read or parsed is reported as an error rather than
  /// silently replaced by defaults.
  pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
    for name in DEFAULT_CONFIG_FILES {
      let candidate = dir.join(name);
      if candidate.is_file() {
        return Self::from_path(&candidate);
      }
    }
    Ok(Self::default())
  }

  /// Read configuration from a JSON or YAML file, chosen by extension.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let is_yaml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
      serde_yaml::from_str(&content).map_err(|source| ConfigError::ParseYaml {
        path: path.to_path_buf(),
        source,
      })
    } else {
      serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
      })
    }
  }

  /// Check the invariants every build pass relies on.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !self.header_path.starts_with('/') {
      return Err(ConfigError::HeaderPath(self.header_path.clone()));
    }

    if self.self_output_file_name.trim().is_empty() {
      return Err(ConfigError::SelfOutputPath);
    }

    if let Some(index) = self
      .managed_assets
      .iter()
      .position(|asset| asset.path.trim().is_empty())
    {
      return Err(ConfigError::ManagedAssetPath { index });
    }

    Ok(())
  }

  /// Header route with any push marker removed, and whether the marker was present.
  pub fn header_route(&self) -> (&str, bool) {
    match self.header_path.strip_suffix(PUSH_MARKER) {
      Some(route) if !route.is_empty() => (route, true),
      _ => (self.header_path.as_str(), false),
    }
  }

  /// Route answered with 404 for the directive artifact itself.
  pub fn self_fallback_path(&self) -> String {
    format!("/{}", self.self_output_file_name.trim_start_matches('/'))
  }

  /// Path of the artifact inside an output directory.
  pub fn output_file(&self, output_dir: &Path) -> PathBuf {
    output_dir.join(self.self_output_file_name.trim_start_matches('/'))
  }
}
