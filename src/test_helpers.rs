//! Shared fixtures for the unit tests: a known-good config, a document
//! that passes the SEO gate, and on-disk posts for loader and build tests.

use crate::config::BuildConfig;
use crate::content::MarkdownDoc;
use std::path::Path;

/// A complete config file body with every block present.
pub(crate) fn sample_config_json(canonical_base: &str, out_dir: &str) -> String {
    format!(
        r#"{{
  "version": 1,
  "site": {{
    "canonicalBase": "{canonical_base}",
    "siteName": "Example Site",
    "defaultOgImage": "/og-default.png",
    "authorName": "Jane Doe"
  }},
  "content": {{
    "markdown": {{
      "baseDir": "content",
      "collections": [
        {{
          "name": "blog",
          "pattern": "blog/**/*.md",
          "routeBase": "/blog",
          "schemaType": "Article"
        }}
      ]
    }}
  }},
  "output": {{ "outDir": "{out_dir}", "prettyHtml": false }},
  "sitemap": {{ "enabled": true, "path": "/sitemap.xml" }},
  "robots": {{ "enabled": true, "path": "/robots.txt" }},
  "worker": {{
    "enabled": true,
    "appOrigin": "https://app.example.com",
    "rewriteRouteBases": ["/blog/"],
    "botUserAgentPatterns": ["googlebot", "bingbot", "gptbot"],
    "debugHeaders": false
  }}
}}
"#
    )
}

/// The parsed counterpart of [`sample_config_json`].
pub(crate) fn sample_config(canonical_base: &str, out_dir: &str) -> BuildConfig {
    let config: BuildConfig =
        serde_json::from_str(&sample_config_json(canonical_base, out_dir)).unwrap();
    config.validate().unwrap();
    config
}

/// A blog document whose rendered page passes every validator check.
pub(crate) fn sample_doc(title: &str, slug: &str) -> MarkdownDoc {
    MarkdownDoc {
        source_path: format!("content/blog/{slug}.md").into(),
        collection: "blog".to_string(),
        route_path: format!("/blog/{slug}"),
        title: title.to_string(),
        excerpt: "A short summary of the post for previews.".to_string(),
        date_published: "2024-01-01".to_string(),
        cover_image: "/img.png".to_string(),
        slug: slug.to_string(),
        html_content: "<p>Sample body text that is comfortably long enough to clear the \
                      article length checks, with more than twenty plain words spread \
                      across one ordinary paragraph of prose.</p>"
            .to_string(),
    }
}

/// Write a valid post under `<root>/content/<rel>` with a body long
/// enough to pass validation.
pub(crate) fn write_post(root: &Path, rel: &str, title: &str, slug: &str) {
    let body = "This body paragraph carries more than twenty ordinary words so the \
                generated article clears both length thresholds without any extra \
                markup or padding tricks.";
    write_post_with_body(root, rel, title, slug, body);
}

/// Like [`write_post`] but with a body that fails the article length check.
pub(crate) fn write_tiny_post(root: &Path, rel: &str, title: &str, slug: &str) {
    write_post_with_body(root, rel, title, slug, "Tiny.");
}

fn write_post_with_body(root: &Path, rel: &str, title: &str, slug: &str, body: &str) {
    let path = root.join("content").join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let doc = format!(
        "---\n\
         title: {title}\n\
         excerpt: A short summary of the post for previews.\n\
         datePublished: 2024-01-01\n\
         coverImage: /img.png\n\
         slug: {slug}\n\
         ---\n\
         {body}\n"
    );
    std::fs::write(path, doc).unwrap();
}
