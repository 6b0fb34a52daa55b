//! Match rules evaluated against asset file names.
//!
//! Rules are compiled once when a [`crate::DirectiveBuilder`] is constructed and are then
//! reused unchanged for every build pass. Path helpers live alongside them so the basename
//! and extension handling stays consistent between matching and classification.

mod paths;
mod rule;

pub use paths::{basename, extension, is_same_asset, normalise, public_path, strip_query};
pub use rule::{MatchRule, PatternRule};
