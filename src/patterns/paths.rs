/// Final path segment of an output asset, accepting either separator.
pub fn basename(path: &str) -> &str {
  path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Drop any `?query` or `#fragment` suffix.
pub fn strip_query(path: &str) -> &str {
  match path.find(['?', '#']) {
    Some(index) => &path[..index],
    None => path,
  }
}

/// Lowercase extension of the asset's basename, ignoring query strings.
pub fn extension(path: &str) -> Option<String> {
  let name = basename(strip_query(path));
  let (stem, ext) = name.rsplit_once('.')?;
  if stem.is_empty() || ext.is_empty() {
    return None;
  }
  Some(ext.to_ascii_lowercase())
}

/// Produce the server-relative path used in directives.
///
/// Output paths reported by bundlers are relative to the output root and may carry native
/// separators, so the result always uses forward slashes with a single leading `/`.
pub fn public_path(path: &str) -> String {
  format!("/{}", path.replace('\\', "/").trim_start_matches('/'))
}

/// Compare two asset paths by their full segments, ignoring a leading `/`.
pub fn is_same_asset(left: &str, right: &str) -> bool {
  normalise(left) == normalise(right)
}

/// Forward-slash form of `path` without a leading `/`, used as a lookup key.
pub fn normalise(path: &str) -> String {
  path.replace('\\', "/").trim_start_matches('/').to_string()
}
