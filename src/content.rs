//! Content ingestion: markdown files → document records.
//!
//! Walks each configured collection's base directory, matches files against
//! the collection glob, splits frontmatter from body, renders the body to a
//! trusted HTML fragment, and returns the merged document set sorted by
//! route path. The sort is the sole determinism guarantee downstream — the
//! sitemap, build log, and write order all follow it.
//!
//! ## Frontmatter
//!
//! A document starts with a `---` delimited block of flat `key: value`
//! lines. Five fields are required and must be non-empty after trimming:
//!
//! ```text
//! ---
//! title: "Hello World"
//! excerpt: "A first post"
//! datePublished: 2024-01-01
//! coverImage: /images/hello.png
//! slug: hello-world
//! ---
//! Body markdown…
//! ```
//!
//! `datePublished` is either a literal `YYYY-MM-DD` or an ISO datetime,
//! which is normalized by taking its leading date component.
//!
//! ## Body rendering
//!
//! The body is rendered with comrak configured so that raw HTML is escaped
//! rather than passed through, bare URLs are autolinked, and typographic
//! substitutions (smart quotes, dashes) are applied. The resulting fragment
//! is trusted downstream as generator output.
//!
//! Ingestion is fail-fast: the first file with a missing field or a bad
//! date aborts the whole build, naming the file.

use crate::config::BuildConfig;
use crate::route;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const REQUIRED_FIELDS: &str = "title, excerpt, datePublished, coverImage, slug";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(
        "Missing required frontmatter field \"{field}\" in {file}. Required fields: {REQUIRED_FIELDS}"
    )]
    MissingField { field: &'static str, file: String },
    #[error("Invalid datePublished {value:?} in {file}. Use format YYYY-MM-DD.")]
    InvalidDate { value: String, file: String },
}

/// One source file, parsed and rendered. Immutable after construction.
#[derive(Debug, Clone)]
pub struct MarkdownDoc {
    /// Absolute source path. Build-internal identity, never emitted.
    pub source_path: PathBuf,
    pub collection: String,
    /// Canonical site-relative path, e.g. `/blog/hello-world`.
    pub route_path: String,
    pub title: String,
    pub excerpt: String,
    /// `YYYY-MM-DD`.
    pub date_published: String,
    pub cover_image: String,
    pub slug: String,
    /// Pre-rendered HTML body fragment, trusted downstream.
    pub html_content: String,
}

/// Markdown-to-HTML renderer with the body-fragment policy baked in.
///
/// Constructed once per build and passed into loading — no process-wide
/// renderer state.
pub struct MarkdownRenderer {
    options: comrak::Options<'static>,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = comrak::Options::default();
        // Untrusted body content cannot inject tags: escape, don't omit.
        options.render.escape = true;
        options.extension.autolink = true;
        options.parse.smart = true;
        Self { options }
    }

    pub fn render(&self, markdown: &str) -> String {
        comrak::markdown_to_html(markdown, &self.options)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Load every collection's documents, merged and sorted by route path.
pub fn load_documents(
    config: &BuildConfig,
    cwd: &Path,
    renderer: &MarkdownRenderer,
) -> Result<Vec<MarkdownDoc>, ContentError> {
    let base_dir = cwd.join(&config.content.markdown.base_dir);

    let mut docs = Vec::new();
    for col in &config.content.markdown.collections {
        for rel in matching_files(&base_dir, &col.pattern)? {
            let abs = base_dir.join(&rel);
            docs.push(parse_document(&abs, &col.name, &col.route_base, renderer)?);
        }
    }

    // Sole determinism guarantee for sitemap and write order.
    docs.sort_by(|a, b| a.route_path.cmp(&b.route_path));
    Ok(docs)
}

/// Files under `base_dir` whose relative path matches `pattern`, sorted.
fn matching_files(base_dir: &Path, pattern: &str) -> Result<Vec<String>, ContentError> {
    if !base_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    for entry in WalkDir::new(base_dir) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(base_dir)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        if glob_match(pattern, &rel) {
            matches.push(rel);
        }
    }
    matches.sort();
    Ok(matches)
}

fn parse_document(
    path: &Path,
    collection: &str,
    route_base: &str,
    renderer: &MarkdownRenderer,
) -> Result<MarkdownDoc, ContentError> {
    let raw = fs::read_to_string(path)?;
    let file = path.display().to_string();

    let (frontmatter, body) = split_frontmatter(&raw).unwrap_or(("", raw.as_str()));
    let fields = parse_frontmatter(frontmatter);

    let title = require_field(&fields, "title", &file)?;
    let excerpt = require_field(&fields, "excerpt", &file)?;
    let date_raw = require_field(&fields, "datePublished", &file)?;
    let date_published = normalize_date(&date_raw, &file)?;
    let cover_image = require_field(&fields, "coverImage", &file)?;
    let slug = require_field(&fields, "slug", &file)?;

    let route_path = route::route_for_slug(route_base, &slug);
    let html_content = renderer.render(body);

    Ok(MarkdownDoc {
        source_path: path.to_path_buf(),
        collection: collection.to_string(),
        route_path,
        title,
        excerpt,
        date_published,
        cover_image,
        slug,
        html_content,
    })
}

// ============================================================================
// Frontmatter
// ============================================================================

/// Split a leading `---` frontmatter block from the body.
///
/// Returns `None` when the document has no block; required-field checks
/// then fail on the empty field map.
fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.trim_start().strip_prefix("---")?;
    let end = rest.find("\n---")?;
    let frontmatter = rest[..end].trim();
    let body = rest[end + 4..].trim_start_matches('\n');
    Some((frontmatter, body))
}

/// Parse flat `key: value` lines. Quoted values have their quotes stripped.
fn parse_frontmatter(block: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim().to_string(), unquote(value.trim()).to_string());
        }
    }
    fields
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn require_field(
    fields: &BTreeMap<String, String>,
    field: &'static str,
    file: &str,
) -> Result<String, ContentError> {
    match fields.get(field).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ContentError::MissingField {
            field,
            file: file.to_string(),
        }),
    }
}

/// Accept `YYYY-MM-DD` verbatim; truncate an ISO datetime to its date part.
fn normalize_date(value: &str, file: &str) -> Result<String, ContentError> {
    let b = value.as_bytes();
    if is_iso_date(value) {
        return Ok(value.to_string());
    }
    // Byte checks first: a valid date prefix is pure ASCII, so the slice
    // below always lands on a char boundary.
    if b.len() > 10 && matches!(b[10], b'T' | b' ') && is_iso_date_bytes(&b[..10]) {
        return Ok(value[..10].to_string());
    }
    Err(ContentError::InvalidDate {
        value: value.to_string(),
        file: file.to_string(),
    })
}

fn is_iso_date(s: &str) -> bool {
    is_iso_date_bytes(s.as_bytes())
}

fn is_iso_date_bytes(b: &[u8]) -> bool {
    b.len() == 10
        && b.iter()
            .enumerate()
            .all(|(i, &c)| match i {
                4 | 7 => c == b'-',
                _ => c.is_ascii_digit(),
            })
}

// ============================================================================
// Glob matching
// ============================================================================

/// Match a `/`-separated relative path against a glob pattern.
///
/// `**` matches zero or more whole segments; `*` within a segment matches
/// any run of characters; everything else is literal.
pub fn glob_match(pattern: &str, path: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match_segments(&pattern, &path)
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"**", rest)) => (0..=path.len()).any(|skip| match_segments(rest, &path[skip..])),
        Some((seg, rest)) => match path.split_first() {
            Some((name, path_rest)) => segment_match(seg, name) && match_segments(rest, path_rest),
            None => false,
        },
    }
}

/// Match one path segment against one pattern segment.
///
/// The pattern splits on `*` into literal pieces that must appear in order:
/// first anchored at the start, last anchored at the end.
fn segment_match(pattern: &str, name: &str) -> bool {
    let pieces: Vec<&str> = pattern.split('*').collect();
    if pieces.len() == 1 {
        return pattern == name;
    }

    let first = pieces[0];
    let last = pieces[pieces.len() - 1];
    if !name.starts_with(first) || !name.ends_with(last) {
        return false;
    }

    let mut pos = first.len();
    let end = name.len() - last.len();
    if pos > end {
        return false;
    }
    for piece in &pieces[1..pieces.len() - 1] {
        if piece.is_empty() {
            continue;
        }
        match name[pos..end].find(piece) {
            Some(found) => pos += found + piece.len(),
            None => return false,
        }
    }
    pos <= end
}
