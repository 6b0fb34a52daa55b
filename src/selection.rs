//! Selection policy deciding which output assets become directive candidates.

use tracing::{info, trace};

use crate::error::ConfigError;
use crate::patterns::{MatchRule, PatternRule};

/// Trait describing selection filters for build output assets.
pub trait AssetInclusion {
  /// Returns `true` when the asset should be considered for the directive.
  fn is_included(&self, path: &str) -> bool;

  /// Returns `true` when the asset should be hinted with `rel=prefetch`.
  fn is_prefetch(&self, path: &str) -> bool;
}

/// Compiled include, ignore and prefetch rules.
#[derive(Debug, Clone, Default)]
pub struct AssetSelection {
  include: Vec<MatchRule>,
  ignore: Vec<MatchRule>,
  prefetch: Vec<MatchRule>,
  trace_matches: bool,
}

impl AssetSelection {
  /// Compile the three rule lists.
  pub fn compile(
    include: &[PatternRule],
    ignore: &[PatternRule],
    prefetch: &[PatternRule],
  ) -> Result<Self, ConfigError> {
    Ok(Self {
      include: MatchRule::compile_all(include)?,
      ignore: MatchRule::compile_all(ignore)?,
      prefetch: MatchRule::compile_all(prefetch)?,
      trace_matches: false,
    })
  }

  /// Log every rule decision at `info` instead of `trace`.
  pub fn with_match_tracing(mut self, enabled: bool) -> Self {
    self.trace_matches = enabled;
    self
  }

  /// An asset is included when some include rule matches and no ignore rule does.
  pub fn is_included(&self, path: &str) -> bool {
    let Some(rule) = self.first_match(&self.include, path) else {
      self.report(path, "include", None);
      return false;
    };
    self.report(path, "include", Some(rule));

    if let Some(rule) = self.first_match(&self.ignore, path) {
      self.report(path, "ignore", Some(rule));
      return false;
    }

    true
  }

  /// An asset is prefetch-eligible when any prefetch rule matches.
  pub fn is_prefetch(&self, path: &str) -> bool {
    let rule = self.first_match(&self.prefetch, path);
    if !self.prefetch.is_empty() {
      self.report(path, "prefetch", rule);
    }
    rule.is_some()
  }

  fn first_match<'a>(&self, rules: &'a [MatchRule], path: &str) -> Option<&'a MatchRule> {
    rules.iter().find(|rule| rule.matches(path))
  }

  fn report(&self, path: &str, stage: &str, rule: Option<&MatchRule>) {
    let matched = rule.map(|rule| rule.source().to_string());
    if self.trace_matches {
      info!(path, stage, rule = ?matched, "pattern decision");
    } else {
      trace!(path, stage, rule = ?matched, "pattern decision");
    }
  }
}

impl AssetInclusion for AssetSelection {
  fn is_included(&self, path: &str) -> bool {
    AssetSelection::is_included(self, path)
  }

  fn is_prefetch(&self, path: &str) -> bool {
    AssetSelection::is_prefetch(self, path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn selection(include: &[&str], ignore: &[&str], prefetch: &[&str]) -> AssetSelection {
    let globs = |values: &[&str]| -> Vec<PatternRule> {
      values.iter().map(|value| PatternRule::glob(*value)).collect()
    };
    AssetSelection::compile(&globs(include), &globs(ignore), &globs(prefetch))
      .expect("rules should compile")
  }

  #[test]
  fn includes_nothing_without_include_rules() {
    let selection = selection(&[], &[], &[]);
    assert!(!selection.is_included("app.js"));
  }

  #[test]
  fn ignore_rules_apply_after_inclusion() {
    let selection = selection(&["*.js"], &["*.hot-update.js"], &[]);
    assert!(selection.is_included("app.js"));
    assert!(!selection.is_included("main.hot-update.js"));
    assert!(!selection.is_included("app.css"));
  }

  #[test]
  fn any_include_rule_is_enough() {
    let selection = selection(&["*.js", "*.css"], &[], &[]);
    assert!(selection.is_included("app.js"));
    assert!(selection.is_included("nested/app.css"));
  }

  #[test]
  fn prefetch_rules_are_independent_of_inclusion() {
    let selection = selection(&["*.js"], &[], &["lazy-*"]);
    assert!(selection.is_prefetch("lazy-route.js"));
    assert!(selection.is_prefetch("lazy-image.png"));
    assert!(!selection.is_prefetch("app.js"));
  }

  #[test]
  fn match_tracing_does_not_change_decisions() {
    let plain = selection(&["*.js"], &["vendor*"], &["lazy*"]);
    let traced = plain.clone().with_match_tracing(true);
    for path in ["app.js", "vendor.js", "lazy.js", "logo.png"] {
      assert_eq!(plain.is_included(path), traced.is_included(path));
      assert_eq!(plain.is_prefetch(path), traced.is_prefetch(path));
    }
  }

  #[test]
  fn filters_through_the_inclusion_trait() {
    fn hinted<'a, S: AssetInclusion>(selection: &S, paths: &[&'a str]) -> Vec<&'a str> {
      paths
        .iter()
        .copied()
        .filter(|path| selection.is_included(path) && !selection.is_prefetch(path))
        .collect()
    }

    let selection = selection(&["*.js", "*.css"], &["*.min.css"], &["lazy*"]);
    assert_eq!(
      hinted(&selection, &["app.js", "lazy.js", "site.min.css", "site.css"]),
      vec!["app.js", "site.css"]
    );
  }

  #[test]
  fn surfaces_invalid_rules() {
    let result = AssetSelection::compile(&[PatternRule::regex("(")], &[], &[]);
    assert!(result.is_err());
  }
}
