//! Path, URL and slug helpers shared by the composer and the builders.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Normalize a site-relative path: leading `/`, no repeated slashes, and no
/// trailing slash except for the root path itself.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        return "/".to_string();
    }
    format!("/{}", segments.join("/"))
}

/// Canonical URL of a site-relative path: origin followed by the normalized
/// path. The origin never carries a trailing slash, so the result contains
/// no `//` past the scheme separator.
pub fn canonical_url(origin: &str, path: &str) -> String {
    format!("{origin}{}", normalize_path(path))
}

/// Resolve an asset reference (image, logo) against the origin. Absolute
/// http(s) URLs pass through; site-relative paths are joined to the origin.
/// Blank values and bare `#` placeholders resolve to nothing.
pub fn resolve_asset(origin: &str, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if is_placeholder(raw) {
        return None;
    }
    if raw.contains("://") {
        return external_link(raw);
    }
    Some(canonical_url(origin, raw))
}

/// Accept an outbound link only if it is an absolute http(s) URL with a host.
/// Placeholders (`""`, `"#"`) and relative paths are filtered out so no
/// broken link ever reaches the graph.
pub fn external_link(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if is_placeholder(raw) {
        return None;
    }
    let parsed = Url::parse(raw).ok()?;
    let web = matches!(parsed.scheme(), "http" | "https");
    (web && parsed.host_str().is_some()).then(|| raw.to_string())
}

fn is_placeholder(raw: &str) -> bool {
    raw.is_empty() || raw.starts_with('#')
}

/// Whether `slug` is URL-safe: lowercase alphanumerics separated by single hyphens.
pub fn is_url_safe_slug(slug: &str) -> bool {
    static SLUG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));
    SLUG_RE.is_match(slug)
}

/// Generate a URL-safe slug from a display name.
pub fn slugify(name: &str) -> String {
    let lowered: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();

    lowered
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://beelodev.com";

    #[test]
    fn normalize_collapses_and_trims() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path("/projects/foo/"), "/projects/foo");
        assert_eq!(normalize_path("//projects///foo"), "/projects/foo");
        assert_eq!(normalize_path("about"), "/about");
    }

    #[test]
    fn canonical_never_has_double_slash_after_scheme() {
        let paths = ["/", "//", "/a//b/", "/projects/foo", "///x///y///", "/a/b/c/"];
        for path in paths {
            let url = canonical_url(ORIGIN, path);
            let rest = url.strip_prefix("https://").expect("scheme");
            assert!(!rest.contains("//"), "{url} contains a double slash");
        }
        assert_eq!(canonical_url(ORIGIN, "/"), "https://beelodev.com/");
        assert_eq!(
            canonical_url(ORIGIN, "/projects/foo"),
            "https://beelodev.com/projects/foo"
        );
    }

    #[test]
    fn assets_resolve_against_origin() {
        assert_eq!(
            resolve_asset(ORIGIN, "/og-image.jpg").as_deref(),
            Some("https://beelodev.com/og-image.jpg")
        );
        assert_eq!(
            resolve_asset(ORIGIN, "logo.svg").as_deref(),
            Some("https://beelodev.com/logo.svg")
        );
        assert_eq!(
            resolve_asset(ORIGIN, "https://cdn.example.com/a.png").as_deref(),
            Some("https://cdn.example.com/a.png")
        );
        assert_eq!(resolve_asset(ORIGIN, "  "), None);
        assert_eq!(resolve_asset(ORIGIN, "#"), None);
    }

    #[test]
    fn external_links_filter_placeholders() {
        assert!(external_link("https://www.fiverr.com/s/VYAjE8z").is_some());
        assert!(external_link("#").is_none());
        assert!(external_link("").is_none());
        assert!(external_link("/about").is_none());
        assert!(external_link("mailto:support@beelodev.com").is_none());
        assert!(external_link("ftp://files.example.com").is_none());
    }

    #[test]
    fn slug_rules() {
        assert!(is_url_safe_slug("foreclosure-data-hub"));
        assert!(is_url_safe_slug("docu2"));
        assert!(!is_url_safe_slug(""));
        assert!(!is_url_safe_slug("Has Spaces"));
        assert!(!is_url_safe_slug("double--hyphen"));
        assert!(!is_url_safe_slug("-leading"));
    }

    #[test]
    fn slugify_names() {
        assert_eq!(slugify("AI Automation"), "ai-automation");
        assert_eq!(slugify("Full Stack Development"), "full-stack-development");
        assert_eq!(slugify("  React / Next.js  "), "react-next-js");
        assert_eq!(slugify("***"), "");
    }
}
