//! Error and warning types surfaced by the directive compiler.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems detected once, before any build pass runs.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The header route does not begin with `/`.
  #[error("header path '{0}' must begin with '/'")]
  HeaderPath(String),

  /// The synthesized artifact name is empty or blank.
  #[error("self output file name must be a non-empty string")]
  SelfOutputPath,

  /// A managed asset entry is missing its `path`.
  #[error("managed asset #{index} requires a non-empty 'path'")]
  ManagedAssetPath {
    /// Position of the offending entry in the managed asset list.
    index: usize,
  },

  /// A regex rule failed to compile.
  #[error("invalid regex pattern '{pattern}': {source}")]
  InvalidRegex {
    /// Pattern text as configured.
    pattern: String,
    /// Underlying compilation error.
    source: regex::Error,
  },

  /// A glob rule failed to compile.
  #[error("invalid glob pattern '{pattern}': {source}")]
  InvalidGlob {
    /// Pattern text as configured.
    pattern: String,
    /// Underlying compilation error.
    source: glob::PatternError,
  },

  /// The configuration file could not be read.
  #[error("failed to read {}: {source}", .path.display())]
  Read {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },

  /// A JSON configuration file could not be parsed.
  #[error("failed to parse {}: {source}", .path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },

  /// A YAML configuration file could not be parsed.
  #[error("failed to parse {}: {source}", .path.display())]
  ParseYaml {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_yaml::Error,
  },
}

/// Non-fatal, per-asset problems. The offending asset is dropped and the pass continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetWarning {
  /// No resource type could be inferred from the asset's extension.
  #[error("no suitable 'as' attribute match for {path}")]
  Unclassified {
    /// Output path of the dropped asset.
    path: String,
  },
}

impl AssetWarning {
  /// Output path of the asset the warning refers to.
  pub fn path(&self) -> &str {
    match self {
      Self::Unclassified { path } => path,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn config_errors_name_the_offending_value() {
    let err = ConfigError::HeaderPath("shop".into());
    assert_eq!(err.to_string(), "header path 'shop' must begin with '/'");

    let err = ConfigError::ManagedAssetPath { index: 2 };
    assert!(err.to_string().contains("#2"));
  }

  #[test]
  fn warnings_expose_their_asset_path() {
    let warning = AssetWarning::Unclassified {
      path: "data.xyz".into(),
    };
    assert_eq!(warning.path(), "data.xyz");
    assert_eq!(
      warning.to_string(),
      "no suitable 'as' attribute match for data.xyz"
    );
  }
}
