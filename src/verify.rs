//! Read-only output-tree inspection for the `verify` command.
//!
//! Locates the first prerendered route page in an existing output tree and
//! prints ready-to-run curl smoke tests against it: one as a human, one as
//! a bot, one checking the worker's debug headers. Nothing is written; a
//! missing output tree is guidance, not an error.
//!
//! The report is built as lines (`verify_report`) so tests never have to
//! capture stdout.

use crate::config::{self, BuildConfig, ConfigError};
use crate::route::join_url;
use crate::worker::to_index_html;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the config and print the verification report for `cwd`.
pub fn verify(cwd: &Path) -> Result<(), VerifyError> {
    let config = config::load_config(cwd)?;
    for line in verify_report(&config, cwd)? {
        println!("{line}");
    }
    Ok(())
}

/// Build the report lines for an output tree.
pub fn verify_report(config: &BuildConfig, cwd: &Path) -> Result<Vec<String>, VerifyError> {
    let out_dir = cwd.join(&config.output.out_dir);
    let mut lines = vec!["botshield verify".to_string(), String::new()];

    if !out_dir.is_dir() {
        lines.push(format!(
            "No prerender output directory found: {}/",
            config.output.out_dir
        ));
        lines.push(String::new());
        lines.push("Run: botshield build".to_string());
        return Ok(lines);
    }

    let Some(index_file) = find_first_index_html(&out_dir) else {
        lines.push(format!(
            "No prerendered pages found inside: {}/",
            config.output.out_dir
        ));
        lines.push(String::new());
        lines.push("Run: botshield build".to_string());
        return Ok(lines);
    };

    let route_path = index_file_to_route(&out_dir, &index_file);
    let url = join_url(&config.site.canonical_base, &route_path);

    lines.push("Using:".to_string());
    lines.push(format!("  canonicalBase: {}", config.site.canonical_base));
    lines.push(format!("  routePath:     {route_path}"));
    lines.push(format!("  output file:   {}", index_file.display()));
    lines.push(String::new());
    lines.push("Smoke tests:".to_string());
    lines.push(String::new());
    lines.push("1) Human (usually the SPA shell):".to_string());
    lines.push(format!("  curl -s {url} | grep -i \"<title>\""));
    lines.push(String::new());
    lines.push("2) Bot (should see the prerendered, route-specific title):".to_string());
    lines.push(format!(
        "  curl -s -H \"User-Agent: Googlebot\" {url} | grep -i \"<title>\""
    ));
    lines.push(String::new());
    lines.push("3) Debug headers (worker must be deployed with debugHeaders on):".to_string());
    lines.push(format!("  curl -I -H \"User-Agent: GPTBot\" {url}"));
    lines.push(String::new());
    lines.push("Expected headers when debugHeaders is enabled:".to_string());
    lines.push("  X-Bot-Detected: true".to_string());
    lines.push("  X-Prerender: true".to_string());
    lines.push(format!("  X-Final-Path: {}", to_index_html(&route_path)));

    Ok(lines)
}

/// First route-level `index.html` in the tree, if any.
///
/// Explicit work-list traversal over an iterative stack; entries are
/// visited in sorted name order. The root `index.html` (depth < 2) is
/// skipped — only route pages like `blog/slug/index.html` qualify.
fn find_first_index_html(out_dir: &Path) -> Option<PathBuf> {
    let mut stack = vec![out_dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        let Ok(entries) = fs::read_dir(&current) else {
            continue;
        };
        let mut entries: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        entries.sort();

        for entry in entries {
            if entry.is_dir() {
                stack.push(entry);
            } else if entry
                .file_name()
                .is_some_and(|n| n.eq_ignore_ascii_case("index.html"))
            {
                let depth = entry
                    .strip_prefix(out_dir)
                    .map(|rel| rel.components().count())
                    .unwrap_or(0);
                if depth >= 2 {
                    return Some(entry);
                }
            }
        }
    }

    None
}

/// Map `dist/blog/hello/index.html` back to `/blog/hello`.
fn index_file_to_route(out_dir: &Path, index_file: &Path) -> String {
    let rel = index_file
        .parent()
        .and_then(|p| p.strip_prefix(out_dir).ok())
        .unwrap_or(Path::new(""));
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}
