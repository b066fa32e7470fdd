//! Build configuration module.
//!
//! Loads and validates `botshield.config.json` from the working directory.
//! The file is plain JSON with camelCase keys:
//!
//! ```json
//! {
//!   "version": 1,
//!   "site": {
//!     "canonicalBase": "https://example.com",
//!     "siteName": "Example",
//!     "defaultOgImage": "/og.png",
//!     "authorName": "Jane Doe"
//!   },
//!   "content": {
//!     "markdown": {
//!       "baseDir": "content",
//!       "collections": [
//!         { "name": "blog", "pattern": "blog/**/*.md",
//!           "routeBase": "/blog", "schemaType": "Article" }
//!       ]
//!     }
//!   },
//!   "output": { "outDir": "dist-prerender", "prettyHtml": false },
//!   "sitemap": { "enabled": true, "path": "/sitemap.xml" },
//!   "robots": { "enabled": true, "path": "/robots.txt" },
//!   "worker": {
//!     "enabled": true,
//!     "appOrigin": "https://app.example.com",
//!     "rewriteRouteBases": ["/blog/"],
//!     "botUserAgentPatterns": ["googlebot", "bingbot", "gptbot"],
//!     "debugHeaders": false
//!   }
//! }
//! ```
//!
//! The `sitemap`, `robots`, and `worker` blocks are optional. An absent
//! block coerces to `{ "enabled": true }` with default paths; a block that
//! is present with a non-boolean `enabled` is a type error, not a silent
//! fallback. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "botshield.config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{CONFIG_FILE} is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing {CONFIG_FILE} in {0}. Run: botshield gen-config > {CONFIG_FILE}")]
    Missing(String),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level build configuration.
///
/// Required blocks (`site`, `content`, `output`) have no defaults — a config
/// missing them fails to deserialize. Feature blocks default to enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Config schema version; only `1` is accepted.
    pub version: u32,
    pub site: SiteConfig,
    pub content: ContentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub sitemap: SitemapConfig,
    #[serde(default)]
    pub robots: RobotsConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
}

/// Site identity used for canonical URLs and structured data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute base URL, e.g. `https://example.com`. Trailing slash tolerated.
    pub canonical_base: String,
    pub site_name: String,
    /// Fallback social image when a document has none of its own.
    pub default_og_image: String,
    pub author_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    pub markdown: MarkdownSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MarkdownSource {
    /// Directory that collection patterns are resolved against.
    pub base_dir: String,
    pub collections: Vec<Collection>,
}

/// One content collection: a glob of markdown files mapped under a route base.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Collection {
    pub name: String,
    /// Glob relative to `baseDir`, e.g. `blog/**/*.md`.
    pub pattern: String,
    /// Route prefix, e.g. `/blog`. Trailing slash tolerated.
    pub route_base: String,
    /// JSON-LD schema type. Only `Article` is supported.
    pub schema_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OutputConfig {
    pub out_dir: String,
    /// When false, runs of whitespace in page HTML collapse to single spaces.
    pub pretty_html: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    pub enabled: bool,
    /// Output path relative to the site root, e.g. `/sitemap.xml`.
    pub path: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/sitemap.xml".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/robots.txt".to_string(),
        }
    }
}

/// Edge worker generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkerConfig {
    pub enabled: bool,
    /// Origin the worker fetches from, for both prerendered and fallback
    /// responses, e.g. `https://app.example.com`.
    pub app_origin: String,
    /// Route prefixes eligible for rewriting, e.g. `["/blog/"]`.
    pub rewrite_route_bases: Vec<String>,
    /// Case-insensitive User-Agent substrings that classify a request as a bot.
    pub bot_user_agent_patterns: Vec<String>,
    /// Add X-Bot-Detected / X-Prerender diagnostic headers to responses.
    pub debug_headers: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_origin: String::new(),
            rewrite_route_bases: Vec::new(),
            bot_user_agent_patterns: Vec::new(),
            debug_headers: false,
        }
    }
}

impl BuildConfig {
    /// Validate values that deserialization alone cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Validation(format!(
                "version must be 1, got {}",
                self.version
            )));
        }
        for (field, value) in [
            ("site.canonicalBase", &self.site.canonical_base),
            ("site.siteName", &self.site.site_name),
            ("site.defaultOgImage", &self.site.default_og_image),
            ("site.authorName", &self.site.author_name),
            ("content.markdown.baseDir", &self.content.markdown.base_dir),
            ("output.outDir", &self.output.out_dir),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{field} is required")));
            }
        }
        if self.content.markdown.collections.is_empty() {
            return Err(ConfigError::Validation(
                "content.markdown.collections must be a non-empty array".into(),
            ));
        }
        for col in &self.content.markdown.collections {
            if col.name.trim().is_empty() || col.pattern.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "collection entries need a name and a pattern (collection {:?})",
                    col.name
                )));
            }
            if col.schema_type != "Article" {
                return Err(ConfigError::Validation(format!(
                    "collection {:?}: schemaType must be \"Article\", got {:?}",
                    col.name, col.schema_type
                )));
            }
        }
        Ok(())
    }
}

/// Load and validate the config file from `cwd`.
pub fn load_config(cwd: &Path) -> Result<BuildConfig, ConfigError> {
    let path = cwd.join(CONFIG_FILE);
    if !path.exists() {
        return Err(ConfigError::Missing(cwd.display().to_string()));
    }
    let raw = fs::read_to_string(&path)?;
    let config: BuildConfig = serde_json::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

/// A documented starting-point config, printed by `botshield gen-config`.
pub fn stock_config() -> BuildConfig {
    BuildConfig {
        version: 1,
        site: SiteConfig {
            canonical_base: "https://example.com".to_string(),
            site_name: "Example Site".to_string(),
            default_og_image: "/images/og-default.png".to_string(),
            author_name: "Site Author".to_string(),
        },
        content: ContentConfig {
            markdown: MarkdownSource {
                base_dir: "content".to_string(),
                collections: vec![Collection {
                    name: "blog".to_string(),
                    pattern: "blog/**/*.md".to_string(),
                    route_base: "/blog".to_string(),
                    schema_type: "Article".to_string(),
                }],
            },
        },
        output: OutputConfig {
            out_dir: "dist-prerender".to_string(),
            pretty_html: false,
        },
        sitemap: SitemapConfig::default(),
        robots: RobotsConfig::default(),
        worker: WorkerConfig {
            enabled: true,
            app_origin: "https://YOUR-APP.example.app".to_string(),
            rewrite_route_bases: vec!["/blog/".to_string()],
            bot_user_agent_patterns: vec![
                "googlebot".to_string(),
                "bingbot".to_string(),
                "duckduckbot".to_string(),
                "twitterbot".to_string(),
                "facebookexternalhit".to_string(),
                "linkedinbot".to_string(),
                "gptbot".to_string(),
                "perplexitybot".to_string(),
            ],
            debug_headers: false,
        },
    }
}
