//! # Botshield
//!
//! A bot-aware prerendering pipeline for single-page applications.
//! Markdown files become fully formed, SEO-complete HTML pages, and a
//! generated edge worker serves those pages to crawlers while humans keep
//! getting the SPA shell.
//!
//! # Architecture: One Gated Pipeline
//!
//! A build runs as a single sequential pass; every page must clear the SEO
//! validator or the build fails:
//!
//! ```text
//! 1. Load      botshield.config.json         (strict JSON, typo-rejecting)
//! 2. Collect   content/**.md  →  documents   (frontmatter + markdown body)
//! 3. Render    document  →  HTML page        (head tags, JSON-LD, article)
//! 4. Validate  HTML page                     (title, description, OG, JSON-LD)
//! 5. Emit      dist/ + sitemap.xml + robots.txt + worker.js
//! ```
//!
//! The gate is all-or-nothing on purpose: a page that would ship without a
//! canonical URL or Open Graph tags is a silent SEO regression, so the build
//! turns it into a loud error instead.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `botshield.config.json` loading, strict parsing, validation |
//! | [`content`] | Markdown collection: glob matching, frontmatter, comrak rendering |
//! | [`route`] | Route path and output file derivation, URL joining |
//! | [`render`] | Maud page templates: head metadata, JSON-LD, article body |
//! | [`validate`] | The SEO gate — regex checks every page must pass |
//! | [`artifacts`] | `sitemap.xml` and `robots.txt` generation |
//! | [`worker`] | Edge routing rules and `worker.js` code generation |
//! | [`build`] | Orchestrates the pipeline end to end |
//! | [`verify`] | Post-deploy smoke-test helper for an existing output tree |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! Pages are generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system. Malformed markup is a build error, interpolation is
//! auto-escaped, and there is no template directory to ship or drift.
//!
//! ## The Worker Logic Lives Twice
//!
//! The generated `worker.js` cannot be executed from Rust tests, so the bot
//! detection and rewrite rules are implemented once as plain Rust
//! ([`worker::RouteRules`]) and once as generated JavaScript fed from the
//! same config values. The Rust side is the tested reference; the codegen
//! tests assert the JavaScript embeds identical rule tables.

pub mod artifacts;
pub mod build;
pub mod config;
pub mod content;
pub mod render;
pub mod route;
pub mod validate;
pub mod verify;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_helpers;
