//! Terminal output helpers shared by the udfpack commands.
//!
//! Status lines go to stdout (errors to stderr) and are colored only when the
//! stream supports it, so piped JSON stays clean.

use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

/// One report row per artifact: its kind (`jar`/`zip`), path and size.
pub fn print_artifact(path: &Path) {
  let kind = path.extension().and_then(|e| e.to_str()).unwrap_or("file");
  let size = fs::metadata(path).ok().map(|m| m.len());
  println!(
    "  {} {}",
    format!("{kind:<4}").if_supports_color(Stream::Stdout, |s| s.cyan()),
    artifact_detail(path, size)
  );
}

fn artifact_detail(path: &Path, size: Option<u64>) -> String {
  match size {
    Some(bytes) if bytes < 1024 => format!("{} ({} B)", path.display(), bytes),
    Some(bytes) => format!("{} ({:.1} KiB)", path.display(), bytes as f64 / 1024.0),
    None => path.display().to_string(),
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
