//! Serializer for the Caddy directive grammar.
//!
//! ```text
//! header /route {
//!   +Link "</app.js>; rel=preload; as=script"
//!   +Link "</lazy.js>; rel=prefetch"
//! }
//! push /route /app.js
//! status 404 /push.caddy
//! ```

use crate::models::{DirectiveDocument, LinkEntry};

/// Render a single Link entry.
pub fn render_entry(entry: &LinkEntry) -> String {
  let mut link = format!("<{}>; rel={}", entry.path, entry.rel);
  if let Some(as_) = entry.as_ {
    link.push_str(&format!("; as={as_}"));
  }
  if let Some(mime) = &entry.mime {
    link.push_str(&format!("; type={mime}"));
  }
  if entry.nopush {
    link.push_str("; nopush");
  }
  if entry.crossorigin {
    link.push_str("; crossorigin=anonymous");
  }
  link
}

/// Render the `+Link` line for one group. An empty group renders `+Link ""`.
fn render_group(group: &[LinkEntry]) -> String {
  let value = group.iter().map(render_entry).collect::<Vec<_>>().join(", ");
  format!("  +Link \"{value}\"\n")
}

/// Render a whole document: preload line, hint line, optional push, 404 fallback.
pub fn render_document(document: &DirectiveDocument) -> String {
  let mut out = format!("header {} {{\n", document.header_path);
  out.push_str(&render_group(&document.preload_group));
  out.push_str(&render_group(&document.hint_group));
  out.push_str("}\n");

  if let Some(paths) = document.push_paths.as_ref().filter(|paths| !paths.is_empty()) {
    out.push_str(&format!("push {} {}\n", document.header_path, paths.join(" ")));
  }

  out.push_str(&format!("status 404 {}\n", document.self_fallback_path));
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::classify::ResourceType;
  use crate::models::Rel;

  fn entry(path: &str, rel: Rel, as_: Option<ResourceType>) -> LinkEntry {
    LinkEntry {
      as_,
      ..LinkEntry::new(path, rel)
    }
  }

  fn document(preload: Vec<LinkEntry>, hints: Vec<LinkEntry>) -> DirectiveDocument {
    DirectiveDocument {
      header_path: "/".into(),
      preload_group: preload,
      hint_group: hints,
      push_paths: None,
      self_fallback_path: "/push.caddy".into(),
    }
  }

  #[test]
  fn renders_attributes_in_order() {
    let full = LinkEntry {
      path: "/favicon.ico".into(),
      rel: Rel::Preload,
      as_: Some(ResourceType::Icon),
      mime: Some("image/x-icon".into()),
      nopush: true,
      crossorigin: true,
    };
    assert_eq!(
      render_entry(&full),
      "</favicon.ico>; rel=preload; as=icon; type=image/x-icon; nopush; crossorigin=anonymous"
    );
    assert_eq!(
      render_entry(&LinkEntry::new("/lazy.js", Rel::Prefetch)),
      "</lazy.js>; rel=prefetch"
    );
  }

  #[test]
  fn renders_font_entries() {
    let font = LinkEntry {
      crossorigin: true,
      ..entry("/font.woff2", Rel::Preload, Some(ResourceType::Font))
    };
    assert_eq!(
      render_entry(&font),
      "</font.woff2>; rel=preload; as=font; crossorigin=anonymous"
    );
  }

  #[test]
  fn renders_one_line_per_group() {
    let doc = document(
      vec![
        entry("/app.js", Rel::Preload, Some(ResourceType::Script)),
        entry("/app.css", Rel::Preload, Some(ResourceType::Style)),
      ],
      vec![
        entry("/logo.png", Rel::Prefetch, None),
        entry("https://cdn.example.com", Rel::Preconnect, None),
      ],
    );

    assert_eq!(
      render_document(&doc),
      concat!(
        "header / {\n",
        "  +Link \"</app.js>; rel=preload; as=script, </app.css>; rel=preload; as=style\"\n",
        "  +Link \"</logo.png>; rel=prefetch, <https://cdn.example.com>; rel=preconnect\"\n",
        "}\n",
        "status 404 /push.caddy\n",
      )
    );
  }

  #[test]
  fn always_renders_both_group_lines() {
    let doc = document(Vec::new(), Vec::new());
    assert_eq!(
      render_document(&doc),
      "header / {\n  +Link \"\"\n  +Link \"\"\n}\nstatus 404 /push.caddy\n"
    );

    let doc = document(
      vec![entry("/app.js", Rel::Preload, Some(ResourceType::Script))],
      Vec::new(),
    );
    let rendered = render_document(&doc);
    assert_eq!(rendered.matches("+Link").count(), 2);
    assert!(rendered.contains("  +Link \"</app.js>; rel=preload; as=script\"\n  +Link \"\"\n}"));
  }

  #[test]
  fn renders_push_statement_after_header_block() {
    let mut doc = document(
      vec![entry("/bundle.js", Rel::Preload, Some(ResourceType::Script))],
      Vec::new(),
    );
    doc.header_path = "/shop".into();
    doc.push_paths = Some(vec!["/bundle.js".into()]);

    assert_eq!(
      render_document(&doc),
      concat!(
        "header /shop {\n",
        "  +Link \"</bundle.js>; rel=preload; as=script\"\n",
        "  +Link \"\"\n",
        "}\n",
        "push /shop /bundle.js\n",
        "status 404 /push.caddy\n",
      )
    );
  }

  #[test]
  fn skips_empty_push_lists() {
    let mut doc = document(Vec::new(), vec![entry("/lazy.js", Rel::Prefetch, None)]);
    doc.push_paths = Some(Vec::new());
    assert!(!render_document(&doc).contains("push "));
  }
}
