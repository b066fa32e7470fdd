//! Page HTML synthesis.
//!
//! Assembles one complete, SEO-complete HTML document per markdown document:
//! title, meta description, canonical link, Open Graph and Twitter Card
//! tags, a JSON-LD `Article` block, and the article body.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Maud's built-in escaper covers `&<>"` but leaves `'` raw, and the
//! downstream attribute scans treat both quote characters as delimiters,
//! so every user-sourced value goes through the five-character [`esc`]
//! helper instead (including the JSON-LD script body). The markdown
//! fragment is the single unescaped interpolation because it is already
//! well-formed HTML from the trusted renderer.

use crate::config::BuildConfig;
use crate::content::MarkdownDoc;
use crate::route::join_url;
use maud::{DOCTYPE, PreEscaped, html};
use serde::Serialize;

/// JSON-LD `Article` structured data. Field order is emission order.
#[derive(Serialize)]
struct ArticleJsonLd<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    schema_type: &'static str,
    headline: &'a str,
    author: PersonJsonLd<'a>,
    #[serde(rename = "datePublished")]
    date_published: &'a str,
    image: &'a str,
    #[serde(rename = "mainEntityOfPage")]
    main_entity_of_page: &'a str,
}

#[derive(Serialize)]
struct PersonJsonLd<'a> {
    #[serde(rename = "@type")]
    schema_type: &'static str,
    name: &'a str,
}

/// Render the complete HTML document for one markdown document.
pub fn render_page(config: &BuildConfig, doc: &MarkdownDoc) -> String {
    let canonical_url = join_url(&config.site.canonical_base, &doc.route_path);
    let og_image_url = if doc.cover_image.starts_with("http") {
        doc.cover_image.clone()
    } else {
        join_url(&config.site.canonical_base, &doc.cover_image)
    };
    let page_title = format!("{} - {}", doc.title, config.site.site_name);

    let json_ld = serde_json::to_string(&ArticleJsonLd {
        context: "https://schema.org",
        schema_type: "Article",
        headline: &doc.title,
        author: PersonJsonLd {
            schema_type: "Person",
            name: &config.site.author_name,
        },
        date_published: &doc.date_published,
        image: &og_image_url,
        main_entity_of_page: &canonical_url,
    })
    .unwrap_or_default();

    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (esc(&page_title)) }
                meta name="description" content=(esc(&doc.excerpt));
                link rel="canonical" href=(esc(&canonical_url));
                meta property="og:type" content="article";
                meta property="og:title" content=(esc(&doc.title));
                meta property="og:description" content=(esc(&doc.excerpt));
                meta property="og:image" content=(esc(&og_image_url));
                meta property="og:url" content=(esc(&canonical_url));
                meta name="twitter:card" content="summary_large_image";
                meta name="twitter:title" content=(esc(&doc.title));
                meta name="twitter:description" content=(esc(&doc.excerpt));
                meta name="twitter:image" content=(esc(&og_image_url));
                script type="application/ld+json" { (esc(&json_ld)) }
            }
            body {
                main {
                    article {
                        header {
                            h1 { (esc(&doc.title)) }
                            p {
                                time datetime=(esc(&doc.date_published)) {
                                    (esc(&doc.date_published))
                                }
                            }
                        }
                        (PreEscaped(doc.html_content.as_str()))
                    }
                }
            }
        }
    };

    let page = markup.into_string();
    if config.output.pretty_html {
        page
    } else {
        collapse_whitespace(&page)
    }
}

/// Escape all five HTML-significant characters, `'` included.
///
/// Maud's own escaper stops at `&<>"`; a raw apostrophe at the start of an
/// attribute value reads as a single-quoted delimiter to the SEO scans, so
/// user-sourced values are escaped here and embedded pre-escaped.
fn esc(value: &str) -> PreEscaped<String> {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    PreEscaped(out)
}

/// Collapse every run of whitespace to a single space.
///
/// Cosmetic only: tag structure and text content are unchanged.
fn collapse_whitespace(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_run = false;
    for c in html.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_config, sample_doc};

    #[test]
    fn page_title_combines_doc_and_site_name() {
        let config = sample_config("https://example.com", "dist");
        let doc = sample_doc("Hello", "hello");
        let html = render_page(&config, &doc);
        assert!(html.contains("<title>Hello - Example Site</title>"));
    }

    #[test]
    fn canonical_link_joins_base_and_route() {
        let config = sample_config("https://example.com/", "dist");
        let doc = sample_doc("Hello", "hello");
        let html = render_page(&config, &doc);
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/blog/hello">"#));
    }

    #[test]
    fn all_og_tags_present() {
        let config = sample_config("https://example.com", "dist");
        let doc = sample_doc("Hello", "hello");
        let html = render_page(&config, &doc);
        for prop in ["og:title", "og:description", "og:image", "og:url"] {
            assert!(html.contains(&format!(r#"property="{prop}""#)), "{prop}");
        }
        assert!(html.contains(r#"name="twitter:card" content="summary_large_image""#));
    }

    #[test]
    fn relative_cover_image_joined_onto_base() {
        let config = sample_config("https://example.com", "dist");
        let doc = sample_doc("Hello", "hello");
        let html = render_page(&config, &doc);
        assert!(html.contains(r#"content="https://example.com/img.png""#));
    }

    #[test]
    fn absolute_cover_image_used_verbatim() {
        let config = sample_config("https://example.com", "dist");
        let mut doc = sample_doc("Hello", "hello");
        doc.cover_image = "https://cdn.example.net/pic.jpg".to_string();
        let html = render_page(&config, &doc);
        assert!(html.contains(r#"content="https://cdn.example.net/pic.jpg""#));
    }

    #[test]
    fn json_ld_script_present_and_escaped() {
        let config = sample_config("https://example.com", "dist");
        let doc = sample_doc("Hello", "hello");
        let html = render_page(&config, &doc);
        assert!(html.contains(r#"<script type="application/ld+json">"#));
        assert!(html.contains("schema.org"));
        // Maud escapes the serialized JSON, so no raw quotes inside the script.
        let script = html
            .split(r#"<script type="application/ld+json">"#)
            .nth(1)
            .and_then(|rest| rest.split("</script>").next())
            .unwrap();
        assert!(!script.contains('"'));
        assert!(script.contains("&quot;"));
    }

    #[test]
    fn title_special_characters_escaped() {
        let config = sample_config("https://example.com", "dist");
        let mut doc = sample_doc("Tom & \"Jerry\" <3", "tom");
        doc.html_content = "<p>Body text for the page.</p>".to_string();
        let html = render_page(&config, &doc);
        assert!(html.contains("Tom &amp; &quot;Jerry&quot; &lt;3"));
        assert!(!html.contains(r#"<3"#));
    }

    #[test]
    fn apostrophes_escaped_in_attribute_values() {
        let config = sample_config("https://example.com", "dist");
        let mut doc = sample_doc("Rust's Edge", "edge");
        doc.excerpt = "'Tis the season for prerendered pages.".to_string();
        let html = render_page(&config, &doc);
        assert!(html.contains(r#"content="&#039;Tis the season for prerendered pages.""#));
        assert!(html.contains("Rust&#039;s Edge"));
        assert!(!html.contains(r#"content="'"#));
    }

    #[test]
    fn article_wraps_h1_time_and_body() {
        let config = sample_config("https://example.com", "dist");
        let doc = sample_doc("Hello", "hello");
        let html = render_page(&config, &doc);
        assert!(html.contains("<article>"));
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains(r#"<time datetime="2024-01-01">2024-01-01</time>"#));
        assert!(html.contains("<p>Sample body"));
    }

    #[test]
    fn compact_output_has_no_whitespace_runs() {
        let mut config = sample_config("https://example.com", "dist");
        config.output.pretty_html = false;
        let mut doc = sample_doc("Hello", "hello");
        doc.html_content = "<p>First paragraph.</p>\n<p>Second paragraph.</p>\n".to_string();
        let html = render_page(&config, &doc);
        assert!(!html.contains('\n'));
        assert!(!html.contains("  "));
    }

    #[test]
    fn pretty_output_preserves_body_newlines() {
        let mut config = sample_config("https://example.com", "dist");
        config.output.pretty_html = true;
        let mut doc = sample_doc("Hello", "hello");
        doc.html_content = "<p>First paragraph.</p>\n<p>Second paragraph.</p>\n".to_string();
        let html = render_page(&config, &doc);
        assert!(html.contains('\n'));
    }

    #[test]
    fn collapse_preserves_text_content() {
        assert_eq!(
            collapse_whitespace("<p>a  b\n\t c</p>"),
            "<p>a b c</p>".to_string()
        );
    }
}
