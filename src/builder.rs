//! Directive compiler turning build output into a [`DirectiveDocument`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::chunks::ChunkIndex;
use crate::classify::{ResourceType, classify};
use crate::config::DirectiveConfig;
use crate::error::{AssetWarning, ConfigError};
use crate::models::{BuildSnapshot, DirectiveDocument, LinkEntry, ManagedAsset, Rel};
use crate::patterns::{extension, is_same_asset, public_path};
use crate::render::render_document;
use crate::selection::AssetSelection;

const ICON_MIME: &str = "image/x-icon";

/// Result of a single build pass.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
  /// The compiled document.
  pub document: DirectiveDocument,
  /// Assets dropped during the pass.
  pub warnings: Vec<AssetWarning>,
}

impl BuildOutcome {
  /// Serialize the document into directive text.
  pub fn render(&self) -> String {
    render_document(&self.document)
  }
}

/// High-level helper compiling directive documents for one configured route.
///
/// All validation happens in [`DirectiveBuilder::new`]; a constructed builder can run any
/// number of passes and every pass completes.
#[derive(Debug, Clone)]
pub struct DirectiveBuilder {
  config: DirectiveConfig,
  selection: AssetSelection,
}

impl DirectiveBuilder {
  /// Validate the configuration and compile its rules.
  pub fn new(config: DirectiveConfig) -> Result<Self, ConfigError> {
    config.validate()?;
    let selection = AssetSelection::compile(
      &config.include_patterns,
      &config.ignore_patterns,
      &config.prefetch_patterns,
    )?
    .with_match_tracing(config.trace_matches);

    Ok(Self { config, selection })
  }

  /// Configuration the builder was created with.
  pub fn config(&self) -> &DirectiveConfig {
    &self.config
  }

  /// Compile the directive for one pass over the build output.
  ///
  /// `assets` lists every output path; selection rules decide which of them are hinted.
  /// `cross_origin_anonymous` reflects the bundler's own cross-origin loading policy.
  pub fn build<I>(&self, assets: I, chunks: &ChunkIndex, cross_origin_anonymous: bool) -> BuildOutcome
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
  {
    let self_path = self.config.self_output_file_name.as_str();
    let mut seen = BTreeSet::new();
    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    for managed in &self.config.managed_assets {
      if is_same_asset(&managed.path, self_path) || !seen.insert(public_path(&managed.path)) {
        continue;
      }
      entries.push(self.managed_entry(managed));
    }

    for asset in assets {
      let path = asset.as_ref();
      if is_same_asset(path, self_path) || !self.selection.is_included(path) {
        continue;
      }
      if !seen.insert(public_path(path)) {
        debug!(path, "skipping asset already declared or listed");
        continue;
      }

      match self.inferred_entry(path, chunks, cross_origin_anonymous) {
        Ok(entry) => entries.push(entry),
        Err(warning) => {
          warn!("{warning}");
          warnings.push(warning);
        }
      }
    }

    let document = self.assemble(entries);
    debug!(
      preload = document.preload_group.len(),
      hints = document.hint_group.len(),
      warnings = warnings.len(),
      "compiled directive document"
    );

    BuildOutcome { document, warnings }
  }

  /// Compile the directive for a serialized build snapshot.
  pub fn build_snapshot(&self, snapshot: &BuildSnapshot) -> BuildOutcome {
    let chunks = ChunkIndex::from_chunks(snapshot.chunks.values());
    self.build(
      &snapshot.assets,
      &chunks,
      snapshot.cross_origin_loading.is_anonymous(),
    )
  }

  /// Run a pass over the keys of `assets` and insert the rendered artifact back into it.
  pub fn emit<V>(
    &self,
    assets: &mut BTreeMap<String, V>,
    chunks: &ChunkIndex,
    cross_origin_anonymous: bool,
  ) -> BuildOutcome
  where
    V: From<String>,
  {
    let outcome = self.build(assets.keys(), chunks, cross_origin_anonymous);
    assets.insert(
      self.config.self_output_file_name.clone(),
      V::from(outcome.render()),
    );
    outcome
  }

  fn managed_entry(&self, managed: &ManagedAsset) -> LinkEntry {
    let crossorigin = managed.as_ == Some(ResourceType::Font)
      || managed.crossorigin
      || self.config.global_anonymous;

    LinkEntry {
      path: managed.path.clone(),
      rel: managed.rel.unwrap_or_default(),
      as_: managed.as_,
      mime: managed.mime.clone(),
      nopush: managed.nopush,
      crossorigin,
    }
  }

  fn inferred_entry(
    &self,
    path: &str,
    chunks: &ChunkIndex,
    cross_origin_anonymous: bool,
  ) -> Result<LinkEntry, AssetWarning> {
    let prefetch = chunks.prefers_prefetch(path, self.selection.is_prefetch(path));
    let resource = classify(path);

    let (rel, as_) = if prefetch {
      (Rel::Prefetch, None)
    } else {
      let resource = resource.ok_or_else(|| AssetWarning::Unclassified {
        path: path.to_string(),
      })?;
      (Rel::Preload, Some(resource))
    };

    let crossorigin = as_ == Some(ResourceType::Font)
      || self.config.global_anonymous
      || (cross_origin_anonymous && resource != Some(ResourceType::Style));

    let mime = (!crossorigin && extension(path).as_deref() == Some("ico"))
      .then(|| ICON_MIME.to_string());

    Ok(LinkEntry {
      path: public_path(path),
      rel,
      as_,
      mime,
      nopush: false,
      crossorigin,
    })
  }

  fn assemble(&self, entries: Vec<LinkEntry>) -> DirectiveDocument {
    let (route, push_mode) = self.config.header_route();

    let push_paths = push_mode.then(|| {
      entries
        .iter()
        .filter(|entry| entry.rel == Rel::Preload && !entry.nopush)
        .map(|entry| entry.path.clone())
        .collect::<Vec<_>>()
    });

    let (preload_group, hint_group): (Vec<_>, Vec<_>) = entries
      .into_iter()
      .partition(|entry| entry.rel == Rel::Preload);

    DirectiveDocument {
      header_path: route.to_string(),
      preload_group,
      hint_group,
      push_paths,
      self_fallback_path: self.config.self_fallback_path(),
    }
  }
}
