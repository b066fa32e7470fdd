//! Post-render SEO validation gate.
//!
//! Inspects a rendered page for every mandatory SEO element before it is
//! written to disk. Unlike ingestion, which fails fast per file, validation
//! accumulates every problem on a page so one failure report is enough to
//! fix the page. Any failing page aborts the entire build.
//!
//! The checks scan the HTML string with regexes rather than a full parser:
//! the input is this build's own renderer output, not arbitrary web HTML,
//! and the contract is "element present with non-empty content".

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
#[error(
    "SEO validation failed for prerendered page:\n- routePath: {route_path}\n- outFile: {out_file}\nMissing/invalid requirements:\n{}\n\nFix the source content or renderer so bots receive complete HTML.",
    .problems.iter().map(|p| format!("- {p}")).collect::<Vec<_>>().join("\n")
)]
pub struct ValidateError {
    pub route_path: String,
    pub out_file: String,
    pub problems: Vec<String>,
}

static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title>(.*?)</title>").unwrap());
static RE_DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<meta\s[^>]*name=["']description["'][^>]*>"#).unwrap());
static RE_CANONICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<link\s[^>]*rel=["']canonical["'][^>]*>"#).unwrap());
static RE_OG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<meta\s[^>]*property=["'](og:[a-z_]+)["'][^>]*>"#).unwrap());
static RE_CONTENT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)content=["']([^"']+)["']"#).unwrap());
static RE_HREF_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)href=["']([^"']+)["']"#).unwrap());
static RE_JSON_LD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script\s[^>]*type=["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .unwrap()
});
static RE_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<article\b[^>]*>(.*?)</article>").unwrap());
static RE_SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?</script>").unwrap());
static RE_STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style.*?</style>").unwrap());
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[^>]+>").unwrap());

/// Validate one rendered page. Collects every missing element before failing.
pub fn validate_page(html: &str, route_path: &str, out_file: &Path) -> Result<(), ValidateError> {
    let mut problems = Vec::new();

    if !has_non_empty_title(html) {
        problems.push("Missing or empty <title>".to_string());
    }

    if tag_attr(html, &RE_DESCRIPTION, &RE_CONTENT_ATTR).is_none() {
        problems.push(r#"Missing <meta name="description" content="...">"#.to_string());
    }

    if tag_attr(html, &RE_CANONICAL, &RE_HREF_ATTR).is_none() {
        problems.push(r#"Missing <link rel="canonical" href="...">"#.to_string());
    }

    for prop in ["og:title", "og:description", "og:image", "og:url"] {
        if og_content(html, prop).is_none() {
            problems.push(format!("Missing Open Graph tag: {prop}"));
        }
    }

    match json_ld(html) {
        None => problems.push(
            r#"Missing JSON-LD: <script type="application/ld+json">...</script>"#.to_string(),
        ),
        Some(body) if body.chars().count() <= 20 => {
            problems.push("JSON-LD script present but too short/empty".to_string());
        }
        Some(_) => {}
    }

    match article_inner(html) {
        None => problems.push("Missing <article>...</article>".to_string()),
        Some(inner) => {
            let text = strip_tags(&inner);
            let words = text.split_whitespace().count();
            let chars = text.chars().count();
            if words < 20 && chars < 80 {
                problems.push(format!(
                    "Article content too short (got {words} words, {chars} chars). \
                     Require >= 20 words or >= 80 chars."
                ));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ValidateError {
            route_path: route_path.to_string(),
            out_file: out_file.display().to_string(),
            problems,
        })
    }
}

fn has_non_empty_title(html: &str) -> bool {
    RE_TITLE
        .captures(html)
        .map(|c| !c[1].trim().is_empty())
        .unwrap_or(false)
}

/// Find the first tag matched by `tag_re` and pull a non-empty attribute
/// value out of it with `attr_re`.
fn tag_attr(html: &str, tag_re: &Regex, attr_re: &Regex) -> Option<String> {
    let tag = tag_re.find(html)?.as_str();
    let value = attr_re.captures(tag)?.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn og_content(html: &str, property: &str) -> Option<String> {
    for caps in RE_OG_TAG.captures_iter(html) {
        if &caps[1] == property {
            let tag = caps.get(0)?.as_str();
            let value = RE_CONTENT_ATTR.captures(tag)?.get(1)?.as_str().trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn json_ld(html: &str) -> Option<String> {
    RE_JSON_LD
        .captures(html)
        .map(|c| c[1].trim().to_string())
}

fn article_inner(html: &str) -> Option<String> {
    RE_ARTICLE.captures(html).map(|c| c[1].trim().to_string())
}

/// Reduce markup to readable text: drop script/style blocks, then all tags,
/// then collapse whitespace.
fn strip_tags(html: &str) -> String {
    let no_scripts = RE_SCRIPT_BLOCK.replace_all(html, " ");
    let no_styles = RE_STYLE_BLOCK.replace_all(&no_scripts, " ");
    let no_tags = RE_TAG.replace_all(&no_styles, " ");
    no_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}
