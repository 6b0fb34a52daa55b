#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod builder;
pub mod chunks;
pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod patterns;
pub mod render;
pub mod selection;

pub use builder::{BuildOutcome, DirectiveBuilder};
pub use chunks::{ChunkIndex, ChunkInfo, ChunkRecord};
pub use classify::{ResourceType, classify};
pub use config::DirectiveConfig;
pub use error::{AssetWarning, ConfigError};
pub use models::{
  BuildSnapshot, CrossOriginLoading, DirectiveDocument, LinkEntry, ManagedAsset, ManifestAsset, Rel,
};
pub use patterns::{MatchRule, PatternRule};
pub use selection::{AssetInclusion, AssetSelection};
