use std::fmt;

use glob::Pattern as GlobPattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::paths::basename;
use crate::error::ConfigError;

/// A user-declared rule, written either as a regular expression or a glob.
///
/// In configuration files rules are spelled `{"regex": "\\.js$"}` or `{"glob": "*.css"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternRule {
  /// Regular expression searched anywhere within the basename.
  Regex(String),
  /// Shell-style glob matched against the whole basename.
  Glob(String),
}

impl PatternRule {
  /// Convenience constructor for a regex rule.
  pub fn regex(pattern: impl Into<String>) -> Self {
    Self::Regex(pattern.into())
  }

  /// Convenience constructor for a glob rule.
  pub fn glob(pattern: impl Into<String>) -> Self {
    Self::Glob(pattern.into())
  }
}

impl fmt::Display for PatternRule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Regex(pattern) => write!(f, "/{pattern}/"),
      Self::Glob(pattern) => write!(f, "glob({pattern})"),
    }
  }
}

#[derive(Debug, Clone)]
enum Matcher {
  Regex(Regex),
  Glob(GlobPattern),
}

/// A compiled [`PatternRule`], usable as a pure predicate over asset paths.
#[derive(Debug, Clone)]
pub struct MatchRule {
  source: PatternRule,
  matcher: Matcher,
}

impl MatchRule {
  /// Compile a rule. Invalid patterns are configuration errors.
  pub fn compile(rule: &PatternRule) -> Result<Self, ConfigError> {
    let matcher = match rule {
      PatternRule::Regex(pattern) => {
        Matcher::Regex(Regex::new(pattern).map_err(|source| ConfigError::InvalidRegex {
          pattern: pattern.clone(),
          source,
        })?)
      }
      PatternRule::Glob(pattern) => {
        Matcher::Glob(GlobPattern::new(pattern).map_err(|source| ConfigError::InvalidGlob {
          pattern: pattern.clone(),
          source,
        })?)
      }
    };

    Ok(Self {
      source: rule.clone(),
      matcher,
    })
  }

  /// Compile every rule in order, stopping at the first invalid one.
  pub fn compile_all(rules: &[PatternRule]) -> Result<Vec<Self>, ConfigError> {
    rules.iter().map(Self::compile).collect()
  }

  /// Test the basename of `path` against the rule.
  pub fn matches(&self, path: &str) -> bool {
    let name = basename(path);
    match &self.matcher {
      Matcher::Regex(regex) => regex.is_match(name),
      Matcher::Glob(pattern) => pattern.matches(name),
    }
  }

  /// The rule this predicate was compiled from.
  pub fn source(&self) -> &PatternRule {
    &self.source
  }
}
