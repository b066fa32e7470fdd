//! Route-path helpers shared across the pipeline.
//!
//! A route path is the canonical site-relative identity of a page
//! (`/blog/hello`). These helpers map routes to output files and join them
//! onto the canonical base URL. All pure functions, no filesystem access.

use std::path::{Path, PathBuf};

/// Derive a route path from a collection route base and a document slug.
///
/// The route base's trailing slash is stripped so `/blog` and `/blog/`
/// produce the same `/blog/<slug>` route.
pub fn route_for_slug(route_base: &str, slug: &str) -> String {
    let base = route_base.strip_suffix('/').unwrap_or(route_base);
    format!("{base}/{slug}")
}

/// Map a route path to its output file, relative to the output directory.
///
/// `/blog/hello` becomes `blog/hello/index.html`. Equal route paths map to
/// the same file and silently overwrite each other; collision detection is
/// deliberately not part of the contract.
pub fn route_to_out_file(out_dir: &Path, route_path: &str) -> PathBuf {
    let clean = route_path.strip_prefix('/').unwrap_or(route_path);
    out_dir.join(clean).join("index.html")
}

/// Join a site-relative path onto a base URL.
///
/// Normalizes exactly one slash at the seam regardless of how the inputs
/// are written.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
