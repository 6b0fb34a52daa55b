//! Extension-based lookup of the `as` destination for an output asset.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::patterns::{basename, extension, strip_query};

/// Request destination written into the `as` attribute of a Link entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
  /// JavaScript.
  Script,
  /// Stylesheets.
  Style,
  /// Web fonts; always fetched anonymously.
  Font,
  /// HTML documents.
  Document,
  /// Raster and vector images.
  Image,
  /// Payloads loaded through `fetch`, such as JSON.
  Fetch,
  /// Web-app manifests.
  Manifest,
  /// Favicons.
  Icon,
  /// Audio media.
  Audio,
  /// Video media.
  Video,
  /// Text tracks.
  Track,
  /// Web or shared workers.
  Worker,
  /// `<embed>` content.
  Embed,
  /// `<object>` content.
  Object,
}

impl ResourceType {
  /// Attribute value as rendered in the directive.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Script => "script",
      Self::Style => "style",
      Self::Font => "font",
      Self::Document => "document",
      Self::Image => "image",
      Self::Fetch => "fetch",
      Self::Manifest => "manifest",
      Self::Icon => "icon",
      Self::Audio => "audio",
      Self::Video => "video",
      Self::Track => "track",
      Self::Worker => "worker",
      Self::Embed => "embed",
      Self::Object => "object",
    }
  }
}

impl fmt::Display for ResourceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Classify an output path by its lowercase extension.
///
/// Any basename containing `manifest.json` is a web-app manifest regardless of extension.
/// Unknown extensions yield `None`; callers drop the asset with a warning.
pub fn classify(path: &str) -> Option<ResourceType> {
  if basename(strip_query(path)).contains("manifest.json") {
    return Some(ResourceType::Manifest);
  }

  let resource = match extension(path)?.as_str() {
    "js" | "mjs" => ResourceType::Script,
    "css" => ResourceType::Style,
    "woff" | "woff2" | "ttf" | "eot" | "otf" => ResourceType::Font,
    "html" => ResourceType::Document,
    "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "avif" => ResourceType::Image,
    "json" => ResourceType::Fetch,
    "ico" => ResourceType::Icon,
    _ => return None,
  };
  Some(resource)
}
