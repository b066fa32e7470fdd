//! Build orchestration.
//!
//! Sequences one full build: clean the output directory, load the document
//! set, then render → validate → write each page in sorted route order, and
//! finally emit the enabled auxiliary artifacts (sitemap, robots, worker).
//!
//! Pages are processed strictly sequentially so a failure on document N
//! never leaves output for documents after N. Pages written before the
//! failure stay on disk — there is no rollback; the next build's clean step
//! removes them. The output directory is fully replaced every run, so
//! builds are idempotent in content but not incremental.

use crate::artifacts;
use crate::config::{self, BuildConfig, ConfigError};
use crate::content::{self, ContentError, MarkdownRenderer};
use crate::render;
use crate::route;
use crate::validate::{self, ValidateError};
use crate::worker;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Validate(#[from] ValidateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No markdown documents found. Check content paths/patterns.")]
    NoDocuments,
}

/// What one successful build produced, for the summary line.
#[derive(Debug)]
pub struct BuildSummary {
    pub pages: usize,
    pub sitemap: bool,
    pub robots: bool,
    pub worker: bool,
}

/// Load the config from `cwd` and run a full build.
pub fn build(cwd: &Path) -> Result<BuildSummary, BuildError> {
    let config = config::load_config(cwd)?;
    build_with_config(&config, cwd)
}

/// Run a full build with an already-validated config.
pub fn build_with_config(config: &BuildConfig, cwd: &Path) -> Result<BuildSummary, BuildError> {
    let out_dir = cwd.join(&config.output.out_dir);

    // Clean slate: the previous tree is replaced wholesale.
    if out_dir.exists() {
        fs::remove_dir_all(&out_dir)?;
    }
    fs::create_dir_all(&out_dir)?;

    let renderer = MarkdownRenderer::new();
    let docs = content::load_documents(config, cwd, &renderer)?;
    if docs.is_empty() {
        return Err(BuildError::NoDocuments);
    }

    // Validate each page before writing it, so a bad page never lands on
    // disk. Earlier pages are already written by then; see module docs.
    for doc in &docs {
        let out_file = route::route_to_out_file(&out_dir, &doc.route_path);
        let html = render::render_page(config, doc);
        validate::validate_page(&html, &doc.route_path, &out_file)?;

        if let Some(parent) = out_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_file, &html)?;
        println!("Generated {}/index.html", doc.route_path.trim_start_matches('/'));
    }

    if config.sitemap.enabled {
        let xml = artifacts::generate_sitemap_xml(config, &docs);
        fs::write(artifact_path(&out_dir, &config.sitemap.path), xml)?;
        println!("Generated {}", config.sitemap.path.trim_start_matches('/'));
    }

    if config.robots.enabled {
        let robots = artifacts::generate_robots_txt(config);
        fs::write(artifact_path(&out_dir, &config.robots.path), robots)?;
        println!("Generated {}", config.robots.path.trim_start_matches('/'));
    }

    if config.worker.enabled {
        let js = worker::generate_worker_js(&config.worker);
        fs::write(out_dir.join("worker.js"), js)?;
        println!("Generated worker.js");
    }

    Ok(BuildSummary {
        pages: docs.len(),
        sitemap: config.sitemap.enabled,
        robots: config.robots.enabled,
        worker: config.worker.enabled,
    })
}

fn artifact_path(out_dir: &Path, site_path: &str) -> std::path::PathBuf {
    out_dir.join(site_path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_config, write_post, write_tiny_post};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn end_to_end_example_build() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "blog/hello.md", "Hello", "hello");

        let config = sample_config("https://example.com", "dist");
        let summary = build_with_config(&config, tmp.path()).unwrap();
        assert_eq!(summary.pages, 1);

        let page =
            std::fs::read_to_string(tmp.path().join("dist/blog/hello/index.html")).unwrap();
        assert!(page.contains("<title>Hello - Example Site</title>"));
        assert!(page.contains(r#"href="https://example.com/blog/hello""#));
    }

    #[test]
    fn artifacts_written_when_enabled() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "blog/hello.md", "Hello", "hello");

        let config = sample_config("https://example.com", "dist");
        build_with_config(&config, tmp.path()).unwrap();

        let dist = tmp.path().join("dist");
        assert!(dist.join("sitemap.xml").exists());
        assert!(dist.join("robots.txt").exists());
        assert!(dist.join("worker.js").exists());
    }

    #[test]
    fn disabled_artifacts_skipped() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "blog/hello.md", "Hello", "hello");

        let mut config = sample_config("https://example.com", "dist");
        config.sitemap.enabled = false;
        config.robots.enabled = false;
        config.worker.enabled = false;
        build_with_config(&config, tmp.path()).unwrap();

        let dist = tmp.path().join("dist");
        assert!(!dist.join("sitemap.xml").exists());
        assert!(!dist.join("robots.txt").exists());
        assert!(!dist.join("worker.js").exists());
    }

    #[test]
    fn zero_documents_fail_the_build() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("content")).unwrap();

        let config = sample_config("https://example.com", "dist");
        let err = build_with_config(&config, tmp.path()).unwrap_err();
        assert!(matches!(err, BuildError::NoDocuments));
    }

    #[test]
    fn stale_output_is_removed() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "blog/hello.md", "Hello", "hello");

        let stale = tmp.path().join("dist/blog/old-route/index.html");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, "stale").unwrap();

        let config = sample_config("https://example.com", "dist");
        build_with_config(&config, tmp.path()).unwrap();
        assert!(!stale.exists());
    }

    #[test]
    fn validation_failure_aborts_but_keeps_earlier_pages() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "blog/aaa.md", "First", "aaa");
        write_tiny_post(tmp.path(), "blog/zzz.md", "Thin", "zzz");

        let config = sample_config("https://example.com", "dist");
        let err = build_with_config(&config, tmp.path()).unwrap_err();
        assert!(matches!(err, BuildError::Validate(_)));
        assert!(err.to_string().contains("/blog/zzz"));

        // aaa sorts first, so it was written before zzz failed the gate.
        assert!(tmp.path().join("dist/blog/aaa/index.html").exists());
        assert!(!tmp.path().join("dist/blog/zzz/index.html").exists());
    }

    #[test]
    fn builds_are_deterministic() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "blog/alpha.md", "Alpha", "alpha");
        write_post(tmp.path(), "blog/beta.md", "Beta", "beta");

        let config = sample_config("https://example.com", "dist");
        build_with_config(&config, tmp.path()).unwrap();
        let first = snapshot_tree(&tmp.path().join("dist"));
        build_with_config(&config, tmp.path()).unwrap();
        let second = snapshot_tree(&tmp.path().join("dist"));
        assert_eq!(first, second);
    }

    #[test]
    fn sitemap_follows_route_sort_order() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "blog/zulu.md", "Zulu", "zulu");
        write_post(tmp.path(), "blog/alpha.md", "Alpha", "alpha");

        let config = sample_config("https://example.com", "dist");
        build_with_config(&config, tmp.path()).unwrap();

        let xml = std::fs::read_to_string(tmp.path().join("dist/sitemap.xml")).unwrap();
        let alpha = xml.find("/blog/alpha").unwrap();
        let zulu = xml.find("/blog/zulu").unwrap();
        assert!(alpha < zulu);
    }

    /// Map of relative path → bytes for a whole output tree.
    fn snapshot_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
        let mut files = BTreeMap::new();
        for entry in walkdir::WalkDir::new(root) {
            let entry = entry.unwrap();
            if entry.file_type().is_file() {
                let rel = entry
                    .path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .to_string();
                files.insert(rel, std::fs::read(entry.path()).unwrap());
            }
        }
        files
    }
}
