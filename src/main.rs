use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use caddy_push::{BuildSnapshot, DirectiveBuilder, DirectiveConfig, logging};
use clap::Parser;
use tracing::info;

/// Compile Caddy preload, prefetch and push directives for a finished web build.
#[derive(Debug, Parser)]
#[command(name = "caddy-push", version, about)]
struct Cli {
  /// Build output directory; scanned for assets unless a snapshot lists them.
  #[arg(long, default_value = "dist")]
  dist: PathBuf,

  /// JSON build snapshot with assets, chunk metadata and cross-origin policy.
  #[arg(long)]
  stats: Option<PathBuf>,

  /// Configuration file (JSON or YAML). Defaults to discovery in the working directory.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Write the directive here instead of into the build output directory.
  #[arg(long, conflicts_with = "stdout")]
  output: Option<PathBuf>,

  /// Print the directive instead of writing it.
  #[arg(long)]
  stdout: bool,

  /// Log every pattern decision.
  #[arg(long)]
  trace_matches: bool,

  /// Enable debug logging.
  #[arg(short, long)]
  verbose: bool,
}

fn main() {
  let cli = Cli::parse();

  if let Err(err) = logging::init_logging(cli.verbose) {
    eprintln!("caddy-push: {err:#}");
  }

  if let Err(err) = run(cli) {
    eprintln!("caddy-push error: {err:#}");
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  let mut config = match &cli.config {
    Some(path) => DirectiveConfig::from_path(path)?,
    None => DirectiveConfig::discover(&std::env::current_dir()?)?,
  };
  config.trace_matches |= cli.trace_matches;

  let builder = DirectiveBuilder::new(config).context("invalid directive configuration")?;

  let mut snapshot = match &cli.stats {
    Some(path) => load_snapshot(path)?,
    None => BuildSnapshot::default(),
  };
  if snapshot.assets.is_empty() {
    snapshot.assets = collect_output_assets(&cli.dist)?;
  }

  let outcome = builder.build_snapshot(&snapshot);
  let directive = outcome.render();

  if cli.stdout {
    std::io::stdout()
      .write_all(directive.as_bytes())
      .context("failed to write directive to stdout")?;
    return Ok(());
  }

  let target = cli
    .output
    .unwrap_or_else(|| builder.config().output_file(&cli.dist));
  if let Some(parent) = target.parent().filter(|parent| !parent.as_os_str().is_empty()) {
    fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  fs::write(&target, directive).with_context(|| format!("failed to write {}", target.display()))?;

  info!(
    path = %target.display(),
    entries = outcome.document.entries().count(),
    dropped = outcome.warnings.len(),
    "wrote directive"
  );
  Ok(())
}

fn load_snapshot(path: &Path) -> Result<BuildSnapshot> {
  let content =
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// List every file below `root` as a forward-slash path relative to it, sorted.
fn collect_output_assets(root: &Path) -> Result<Vec<String>> {
  let mut assets = Vec::new();
  collect_recursively(root, Path::new(""), &mut assets)
    .with_context(|| format!("failed to scan build output at {}", root.display()))?;
  assets.sort();
  Ok(assets)
}

fn collect_recursively(root: &Path, relative: &Path, assets: &mut Vec<String>) -> std::io::Result<()> {
  for entry in fs::read_dir(root.join(relative))? {
    let entry = entry?;
    let child = relative.join(entry.file_name());
    if entry.file_type()?.is_dir() {
      collect_recursively(root, &child, assets)?;
    } else {
      assets.push(child.to_string_lossy().replace('\\', "/"));
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn collects_nested_output_files() -> std::io::Result<()> {
    let temp = tempdir()?;
    let root = temp.path();
    fs::create_dir_all(root.join("static/js"))?;
    fs::write(root.join("index.html"), b"<html>")?;
    fs::write(root.join("static/js/app.js"), b"1")?;

    let assets = collect_output_assets(root).expect("scan should succeed");
    assert_eq!(assets, vec!["index.html".to_string(), "static/js/app.js".to_string()]);
    Ok(())
  }

  #[test]
  fn writes_directive_into_the_output_directory() -> std::io::Result<()> {
    let temp = tempdir()?;
    let dist = temp.path().join("dist");
    fs::create_dir_all(&dist)?;
    fs::write(dist.join("app.js"), b"1")?;
    let config_path = temp.path().join("push.json");
    fs::write(&config_path, br#"{"headerPath": "/?push"}"#)?;

    let cli = Cli::parse_from([
      "caddy-push",
      "--dist",
      dist.to_str().expect("utf-8 temp path"),
      "--config",
      config_path.to_str().expect("utf-8 temp path"),
    ]);
    run(cli).expect("run should succeed");

    let written = fs::read_to_string(dist.join("push.caddy"))?;
    assert!(written.starts_with("header / {\n"));
    assert!(written.contains("push / /app.js\n"));
    assert!(written.ends_with("status 404 /push.caddy\n"));
    Ok(())
  }
}
