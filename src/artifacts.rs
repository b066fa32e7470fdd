//! Auxiliary text artifacts: sitemap.xml and robots.txt.
//!
//! Both are derived views of the document set and configuration with no
//! state of their own. Entries follow the document set's route-path order,
//! so sitemap output is deterministic by construction.

use crate::config::BuildConfig;
use crate::content::MarkdownDoc;
use crate::route::join_url;
use std::fmt::Write;

/// Sitemap per the sitemaps.org schema: one `<url>` per document.
pub fn generate_sitemap_xml(config: &BuildConfig, docs: &[MarkdownDoc]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for doc in docs {
        let loc = join_url(&config.site.canonical_base, &doc.route_path);
        // Infallible for String.
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </url>\n",
            escape_xml(&loc),
            escape_xml(&doc.date_published),
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

/// robots.txt: allow everything, and point crawlers at the sitemap when one
/// is being generated.
pub fn generate_robots_txt(config: &BuildConfig) -> String {
    let mut lines = vec!["User-agent: *".to_string(), "Allow: /".to_string()];
    if config.sitemap.enabled {
        lines.push(format!(
            "Sitemap: {}",
            join_url(&config.site.canonical_base, &config.sitemap.path)
        ));
    }
    lines.join("\n") + "\n"
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_config, sample_doc};

    #[test]
    fn sitemap_entry_per_document_in_order() {
        let config = sample_config("https://example.com", "dist");
        let docs = vec![sample_doc("A", "alpha"), sample_doc("Z", "zulu")];
        let xml = generate_sitemap_xml(&config, &docs);

        let alpha = xml.find("https://example.com/blog/alpha").unwrap();
        let zulu = xml.find("https://example.com/blog/zulu").unwrap();
        assert!(alpha < zulu);
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.contains("<lastmod>2024-01-01</lastmod>"));
    }

    #[test]
    fn sitemap_escapes_xml_significant_characters() {
        let config = sample_config("https://example.com?a=1&b=2", "dist");
        let docs = vec![sample_doc("A", "alpha")];
        let xml = generate_sitemap_xml(&config, &docs);
        assert!(xml.contains("&amp;b=2"));
        assert!(!xml.contains("?a=1&b=2<"));
    }

    #[test]
    fn sitemap_declares_schema() {
        let config = sample_config("https://example.com", "dist");
        let xml = generate_sitemap_xml(&config, &[]);
        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert!(xml.contains("http://www.sitemaps.org/schemas/sitemap/0.9"));
    }

    #[test]
    fn robots_points_at_sitemap_when_enabled() {
        let config = sample_config("https://example.com/", "dist");
        let robots = generate_robots_txt(&config);
        assert_eq!(
            robots,
            "User-agent: *\nAllow: /\nSitemap: https://example.com/sitemap.xml\n"
        );
    }

    #[test]
    fn robots_omits_sitemap_line_when_disabled() {
        let mut config = sample_config("https://example.com", "dist");
        config.sitemap.enabled = false;
        let robots = generate_robots_txt(&config);
        assert_eq!(robots, "User-agent: *\nAllow: /\n");
    }
}
