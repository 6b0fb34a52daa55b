//! Chunk metadata supplied by the bundler and the preload-versus-prefetch decision built on it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classify::{ResourceType, classify};
use crate::models::ManifestAsset;
use crate::patterns::normalise;

/// Minimal view of a bundler chunk that an integration layer must provide.
pub trait ChunkInfo {
  /// Human readable chunk name, if the bundler assigned one.
  fn name(&self) -> Option<&str>;
  /// Output files emitted for the chunk.
  fn files(&self) -> &[String];
  /// `true` when the chunk is only ever loaded as part of the initial page.
  fn is_initial_only(&self) -> bool;
  /// `true` when the chunk may be part of the initial page.
  fn can_be_initial(&self) -> bool;
  /// `true` when the chunk carries the bundler runtime.
  fn has_runtime(&self) -> bool;
}

/// Plain, serializable chunk description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChunkRecord {
  /// Chunk name.
  pub name: Option<String>,
  /// Output files belonging to the chunk.
  pub files: Vec<String>,
  /// Only loaded as part of the initial page.
  pub initial: bool,
  /// May be loaded as part of the initial page.
  pub can_be_initial: bool,
  /// Carries the bundler runtime.
  pub runtime: bool,
}

impl ChunkInfo for ChunkRecord {
  fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  fn files(&self) -> &[String] {
    &self.files
  }

  fn is_initial_only(&self) -> bool {
    self.initial
  }

  fn can_be_initial(&self) -> bool {
    self.can_be_initial
  }

  fn has_runtime(&self) -> bool {
    self.runtime
  }
}

/// Per-file view of the chunk graph for a single build pass.
#[derive(Debug, Clone, Default)]
pub struct ChunkIndex {
  assets: BTreeMap<String, ManifestAsset>,
}

impl ChunkIndex {
  /// Fold chunk metadata into one [`ManifestAsset`] per output file.
  ///
  /// A file shared by several chunks is initial if any owning chunk is, and keeps the name
  /// of the first named chunk it was seen in.
  pub fn from_chunks<'a, C, I>(chunks: I) -> Self
  where
    C: ChunkInfo + 'a,
    I: IntoIterator<Item = &'a C>,
  {
    let mut assets: BTreeMap<String, ManifestAsset> = BTreeMap::new();

    for chunk in chunks {
      for file in chunk.files() {
        let asset = assets
          .entry(normalise(file))
          .or_insert_with(|| ManifestAsset {
            path: file.clone(),
            ..ManifestAsset::default()
          });
        asset.is_initial |= chunk.is_initial_only();
        asset.can_be_initial |= chunk.can_be_initial();
        asset.has_runtime_entry |= chunk.has_runtime();
        if asset.chunk_name.is_none() {
          asset.chunk_name = chunk.name().map(str::to_string);
        }
      }
    }

    Self { assets }
  }

  /// Chunk metadata for an output path, if it belongs to a chunk.
  pub fn get(&self, path: &str) -> Option<&ManifestAsset> {
    self.assets.get(&normalise(path))
  }

  /// Number of files with chunk metadata.
  pub fn len(&self) -> usize {
    self.assets.len()
  }

  /// `true` when no chunk metadata was supplied.
  pub fn is_empty(&self) -> bool {
    self.assets.is_empty()
  }

  /// Decide whether `path` is hinted with `rel=prefetch`.
  ///
  /// A prefetch rule match always wins. Otherwise a stylesheet owned by a chunk that is not
  /// initial is demoted to prefetch; every other asset, scripts included, stays preload.
  pub fn prefers_prefetch(&self, path: &str, matches_prefetch_rule: bool) -> bool {
    if matches_prefetch_rule {
      return true;
    }

    if classify(path) != Some(ResourceType::Style) {
      return false;
    }

    self.get(path).is_some_and(|asset| !asset.is_initial)
  }
}

/// Resolve chunk metadata for every file listed by `chunks`.
pub fn resolve_manifest_assets<'a, C, I>(chunks: I) -> Vec<ManifestAsset>
where
  C: ChunkInfo + 'a,
  I: IntoIterator<Item = &'a C>,
{
  ChunkIndex::from_chunks(chunks).assets.into_values().collect()
}
