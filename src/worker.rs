//! Edge worker: routing rules and generated artifact.
//!
//! The per-request decision procedure lives here twice, deliberately:
//!
//! 1. [`RouteRules`] implements it in Rust so classification, eligibility,
//!    and target-path computation are unit-testable.
//! 2. [`generate_worker_js`] emits a standalone JavaScript handler with the
//!    same rule tables baked in, for deployment at the edge.
//!
//! The decision is three-state and stateless: pass the request through
//! untouched, serve the prerendered `index.html` from the app origin, or —
//! when the prerendered fetch fails — fall back to fetching the original
//! path. Any runtime error in the generated handler becomes a plain-text
//! 500 response rather than a transport failure.

use crate::config::WorkerConfig;

/// Immutable per-request rule tables: bot substrings are stored lowercased,
/// rewrite prefixes verbatim.
#[derive(Debug, Clone)]
pub struct RouteRules {
    bot_patterns: Vec<String>,
    rewrite_bases: Vec<String>,
}

/// Outcome of evaluating one inbound request against the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Not eligible; the request goes to the default destination unmodified.
    PassThrough,
    /// Serve the prerendered page at `target_path` from the app origin.
    Rewrite { target_path: String },
}

impl RouteRules {
    pub fn from_config(worker: &WorkerConfig) -> Self {
        Self {
            bot_patterns: worker
                .bot_user_agent_patterns
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            rewrite_bases: worker.rewrite_route_bases.clone(),
        }
    }

    /// Case-insensitive substring classification. A missing or empty
    /// User-Agent is never a bot.
    pub fn is_bot(&self, user_agent: Option<&str>) -> bool {
        let ua = match user_agent {
            Some(ua) if !ua.is_empty() => ua.to_lowercase(),
            _ => return false,
        };
        self.bot_patterns.iter().any(|p| ua.contains(p))
    }

    pub fn matches_rewrite_base(&self, path: &str) -> bool {
        self.rewrite_bases.iter().any(|base| path.starts_with(base))
    }

    /// Eligibility needs all three: GET/HEAD method, bot User-Agent, and a
    /// path under one of the rewrite bases.
    pub fn decide(&self, method: &str, user_agent: Option<&str>, path: &str) -> RouteDecision {
        let get_like = method == "GET" || method == "HEAD";
        if get_like && self.is_bot(user_agent) && self.matches_rewrite_base(path) {
            RouteDecision::Rewrite {
                target_path: to_index_html(path),
            }
        } else {
            RouteDecision::PassThrough
        }
    }
}

/// Static target for a route path: ensure a trailing slash, append
/// `index.html`.
pub fn to_index_html(path: &str) -> String {
    if path.ends_with('/') {
        format!("{path}index.html")
    } else {
        format!("{path}/index.html")
    }
}

/// Emit the worker source with the rule tables, origin, and optional debug
/// headers baked in.
pub fn generate_worker_js(worker: &WorkerConfig) -> String {
    let rules = RouteRules::from_config(worker);
    let bot_substrings = js_string_array(&rules.bot_patterns);
    let rewrite_bases = js_string_array(&rules.rewrite_bases);
    let origin = js_string(&worker.app_origin);

    let fallback_debug = if worker.debug_headers {
        "\n        out.headers.set(\"X-Bot-Detected\", \"true\");\
         \n        out.headers.set(\"X-Prerender-Fallback\", \"true\");\
         \n        out.headers.set(\"X-Requested-Path\", url.pathname);"
    } else {
        ""
    };
    let success_debug = if worker.debug_headers {
        "\n      out.headers.set(\"X-Bot-Detected\", \"true\");\
         \n      out.headers.set(\"X-Prerender\", \"true\");\
         \n      out.headers.set(\"X-Final-Path\", finalPath);"
    } else {
        ""
    };

    format!(
        r#"/**
 * botshield worker (generated)
 * Serves prerendered /index.html to automated crawlers on selected routes.
 */

const BOT_SUBSTRINGS = {bot_substrings};
const REWRITE_BASES = {rewrite_bases};
const ORIGIN = {origin};

function isBot(ua) {{
  const s = (ua || "").toLowerCase();
  return BOT_SUBSTRINGS.some((sub) => s.includes(sub));
}}

function shouldRewrite(pathname) {{
  return REWRITE_BASES.some((base) => pathname.startsWith(base));
}}

function toIndexHtml(pathname) {{
  let p = pathname;
  if (!p.endsWith("/")) p += "/";
  return p + "index.html";
}}

export default {{
  async fetch(request) {{
    const url = new URL(request.url);
    const ua = request.headers.get("User-Agent") || "";
    const isGetLike = request.method === "GET" || request.method === "HEAD";
    const rewrite = isGetLike && isBot(ua) && shouldRewrite(url.pathname);

    try {{
      if (!rewrite) return fetch(request);

      const finalPath = toIndexHtml(url.pathname);
      const headers = new Headers();
      headers.set("Accept", "text/html");
      headers.set("User-Agent", ua);

      const resp = await fetch(ORIGIN + finalPath + url.search, {{ method: "GET", headers }});

      if (!resp.ok) {{
        const fb = await fetch(ORIGIN + url.pathname + url.search, {{ method: "GET", headers }});
        const out = new Response(fb.body, fb);{fallback_debug}
        return out;
      }}

      const out = new Response(resp.body, resp);{success_debug}
      return out;
    }} catch (err) {{
      return new Response("Worker error: " + (err && err.message ? err.message : String(err)), {{
        status: 500,
        headers: {{ "Content-Type": "text/plain; charset=utf-8" }},
      }});
    }}
  }},
}};
"#
    )
}

fn js_string_array(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}
