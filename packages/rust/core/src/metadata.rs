//! Page metadata composer.
//!
//! Merges a page's [`PageMetadataRequest`] with the site-wide defaults from the
//! business profile into the head metadata of one page: resolved title,
//! description, canonical URL, keywords, indexing directives and social
//! preview descriptors.
//!
//! Composition is total. Missing optional fields resolve to site defaults and
//! an unknown path still composes; the composer does not check that a page
//! exists.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

use sitegraph_shared::{BusinessProfile, ContentType, PageMetadataRequest};

use crate::links::{canonical_url, resolve_asset};

/// Social preview width. No image inspection is performed; every preview
/// advertises the same dimensions.
pub const PREVIEW_WIDTH: u32 = 1200;

/// Social preview height.
pub const PREVIEW_HEIGHT: u32 = 630;

const TWITTER_CARD: &str = "summary_large_image";

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Composed head metadata for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetadata {
    /// Resolved title (brand appended unless already present).
    pub title: String,
    /// Template for child titles, `%s | {brand}`.
    pub title_template: String,
    pub description: String,
    pub canonical_url: String,
    /// Site-wide keywords followed by page keywords, deduplicated.
    pub keywords: Vec<String>,
    pub authors: Vec<String>,
    pub creator: String,
    pub publisher: String,
    pub category: String,
    pub robots: Robots,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
}

/// Indexing directives.
///
/// Fields are private: the only constructor takes a single `no_index` flag,
/// so index and follow can never disagree, at page level or for the crawler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Robots {
    index: bool,
    follow: bool,
    google_bot: GoogleBot,
}

/// Crawler-specific directives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GoogleBot {
    index: bool,
    follow: bool,
    max_video_preview: i32,
    max_image_preview: &'static str,
    max_snippet: i32,
}

impl Robots {
    pub fn new(no_index: bool) -> Self {
        let allow = !no_index;
        Self {
            index: allow,
            follow: allow,
            google_bot: GoogleBot {
                index: allow,
                follow: allow,
                max_video_preview: -1,
                max_image_preview: "large",
                max_snippet: -1,
            },
        }
    }

    pub fn index(&self) -> bool {
        self.index
    }

    pub fn follow(&self) -> bool {
        self.follow
    }

    /// `content` of the `robots` meta tag.
    pub fn content(&self) -> String {
        directive_pair(self.index, self.follow)
    }

    /// `content` of the `googlebot` meta tag.
    pub fn google_bot_content(&self) -> String {
        let bot = &self.google_bot;
        format!(
            "{}, max-video-preview:{}, max-image-preview:{}, max-snippet:{}",
            directive_pair(bot.index, bot.follow),
            bot.max_video_preview,
            bot.max_image_preview,
            bot.max_snippet
        )
    }
}

fn directive_pair(index: bool, follow: bool) -> String {
    format!(
        "{}, {}",
        if index { "index" } else { "noindex" },
        if follow { "follow" } else { "nofollow" }
    )
}

/// OpenGraph descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub locale: String,
    pub url: String,
    pub site_name: String,
    pub title: String,
    pub description: String,
    pub images: Vec<PreviewImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,
}

/// A social preview image with fixed advertised dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

/// Twitter card descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub creator: String,
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

/// Compose the full head metadata for one page.
#[instrument(skip_all, fields(path = %request.path))]
pub fn compose(profile: &BusinessProfile, request: &PageMetadataRequest) -> PageMetadata {
    let origin = profile.origin();
    let brand = profile.brand.name.trim();

    let title = resolve_title(
        non_blank(request.title.as_deref()).unwrap_or_else(|| profile.default_title()),
        brand,
    );
    let description = non_blank(request.description.as_deref())
        .unwrap_or(&profile.brand.tagline)
        .to_string();
    let canonical = canonical_url(&origin, &request.path);
    let keywords = merge_keywords(&profile.seo.keywords, &request.extra_keywords);
    let image = preview_image_url(profile, &origin, request.preview_image.as_deref());

    debug!(
        title = %title,
        canonical = %canonical,
        keywords = keywords.len(),
        no_index = request.no_index,
        "composed page metadata"
    );

    PageMetadata {
        title_template: format!("%s | {brand}"),
        description: description.clone(),
        canonical_url: canonical.clone(),
        keywords,
        authors: vec![profile.founder.name.clone()],
        creator: profile.founder.name.clone(),
        publisher: brand.to_string(),
        category: profile.seo.category.clone(),
        robots: Robots::new(request.no_index),
        open_graph: OpenGraph {
            content_type: request.content_type,
            locale: profile.seo.locale.clone(),
            url: canonical,
            site_name: brand.to_string(),
            title: title.clone(),
            description: description.clone(),
            images: vec![PreviewImage {
                url: image.clone(),
                width: PREVIEW_WIDTH,
                height: PREVIEW_HEIGHT,
                alt: title.clone(),
            }],
            published_time: request.published_at,
            modified_time: request.modified_at,
        },
        twitter: TwitterCard {
            card: TWITTER_CARD,
            title: title.clone(),
            description,
            images: vec![image],
            creator: format!("@{}", brand.to_lowercase()),
        },
        title,
    }
}

/// Append ` | {brand}` unless the title already names the brand.
/// Applying this to its own output returns the output unchanged.
pub fn resolve_title(title: &str, brand: &str) -> String {
    let title = title.trim();
    let brand = brand.trim();
    if title.contains(brand) {
        title.to_string()
    } else {
        format!("{title} | {brand}")
    }
}

/// Site-wide keywords followed by page keywords, blank entries dropped and
/// duplicates removed case-sensitively, keeping the first occurrence.
pub fn merge_keywords(site: &[String], page: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    site.iter()
        .chain(page)
        .map(|k| k.trim())
        .filter(|k| !k.is_empty() && seen.insert(*k))
        .map(str::to_string)
        .collect()
}

fn preview_image_url(profile: &BusinessProfile, origin: &str, requested: Option<&str>) -> String {
    requested
        .and_then(|image| resolve_asset(origin, image))
        .or_else(|| resolve_asset(origin, &profile.seo.default_image))
        .unwrap_or_else(|| format!("{origin}/og-image.jpg"))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn project_path_without_title_uses_defaults() {
        let profile = fixtures::profile();
        let meta = compose(&profile, &PageMetadataRequest::new("/projects/foo"));

        assert_eq!(meta.canonical_url, "https://beelodev.com/projects/foo");
        assert_eq!(meta.title, profile.default_title());
        assert_eq!(meta.description, profile.brand.tagline);
    }

    #[test]
    fn title_resolution_is_idempotent() {
        let profile = fixtures::profile();
        let first = compose(&profile, &PageMetadataRequest::new("/about").with_title("About"));
        assert_eq!(first.title, "About | Beelodev");

        let second = compose(
            &profile,
            &PageMetadataRequest::new("/about").with_title(first.title.clone()),
        );
        assert_eq!(second.title, first.title);
        assert_eq!(resolve_title(&second.title, "Beelodev"), first.title);
    }

    #[test]
    fn padded_brand_name_keeps_titles_idempotent() {
        let mut profile = fixtures::profile();
        profile.brand.name = "Beelodev ".into();

        let first = compose(&profile, &PageMetadataRequest::new("/about").with_title("About"));
        assert_eq!(first.title, "About | Beelodev");
        assert_eq!(first.title_template, "%s | Beelodev");
        assert_eq!(first.publisher, "Beelodev");
        assert_eq!(first.twitter.creator, "@beelodev");

        let second = compose(
            &profile,
            &PageMetadataRequest::new("/about").with_title(first.title.clone()),
        );
        assert_eq!(second.title, first.title);
        assert_eq!(resolve_title(&second.title, " Beelodev "), first.title);
    }

    #[test]
    fn blank_overrides_fall_back() {
        let profile = fixtures::profile();
        let meta = compose(
            &profile,
            &PageMetadataRequest::new("/process")
                .with_title("   ")
                .with_description(""),
        );
        assert_eq!(meta.title, profile.default_title());
        assert_eq!(meta.description, profile.brand.tagline);
    }

    #[test]
    fn keywords_merge_site_first_without_duplicates() {
        let site = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let page = vec![
            "c".to_string(),
            "d".to_string(),
            "A".to_string(),
            "d".to_string(),
            " ".to_string(),
            "b".to_string(),
        ];
        assert_eq!(merge_keywords(&site, &page), vec!["a", "b", "c", "d", "A"]);
    }

    #[test]
    fn composed_keywords_start_with_site_defaults() {
        let profile = fixtures::profile();
        let req = PageMetadataRequest::new("/systems/docu-brain")
            .with_keywords(["AI automation", "PDF data extraction workflow"]);
        let meta = compose(&profile, &req);

        assert_eq!(meta.keywords[..profile.seo.keywords.len()], profile.seo.keywords[..]);
        assert_eq!(
            meta.keywords.last().map(String::as_str),
            Some("PDF data extraction workflow")
        );
        let unique: HashSet<&String> = meta.keywords.iter().collect();
        assert_eq!(unique.len(), meta.keywords.len());
    }

    #[test]
    fn no_index_disables_every_directive_together() {
        let profile = fixtures::profile();
        let hidden = compose(&profile, &PageMetadataRequest::new("/x").no_index());
        assert!(!hidden.robots.index());
        assert!(!hidden.robots.follow());
        assert_eq!(hidden.robots.content(), "noindex, nofollow");
        assert!(hidden.robots.google_bot_content().starts_with("noindex, nofollow"));

        let visible = compose(&profile, &PageMetadataRequest::new("/x"));
        assert_eq!(visible.robots.content(), "index, follow");
        assert_eq!(
            visible.robots.google_bot_content(),
            "index, follow, max-video-preview:-1, max-image-preview:large, max-snippet:-1"
        );
    }

    #[test]
    fn social_preview_defaults_and_fixed_dimensions() {
        let profile = fixtures::profile();
        let meta = compose(&profile, &PageMetadataRequest::new("/"));
        let image = &meta.open_graph.images[0];
        assert_eq!(image.url, "https://beelodev.com/og-image.jpg");
        assert_eq!((image.width, image.height), (1200, 630));
        assert_eq!(image.alt, meta.title);
        assert_eq!(meta.twitter.images, vec![image.url.clone()]);
        assert_eq!(meta.twitter.creator, "@beelodev");
        assert_eq!(meta.twitter.card, "summary_large_image");

        let custom = compose(
            &profile,
            &PageMetadataRequest::new("/projects/foreclosure-data-hub")
                .with_preview_image("/projects/foreclosuredatahub/foreclosuredatahub_1.png"),
        );
        assert_eq!(
            custom.open_graph.images[0].url,
            "https://beelodev.com/projects/foreclosuredatahub/foreclosuredatahub_1.png"
        );
        assert_eq!(custom.open_graph.images[0].width, PREVIEW_WIDTH);
    }

    #[test]
    fn open_graph_carries_request_fields() {
        let profile = fixtures::profile();
        let published = "2025-03-01T09:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let mut req = PageMetadataRequest::new("/systems/auto-invoicing")
            .with_content_type(ContentType::Article);
        req.published_at = Some(published);

        let meta = compose(&profile, &req);
        assert_eq!(meta.open_graph.content_type, ContentType::Article);
        assert_eq!(meta.open_graph.published_time, Some(published));
        assert_eq!(meta.open_graph.modified_time, None);
        assert_eq!(meta.open_graph.locale, "en_US");
        assert_eq!(meta.open_graph.url, meta.canonical_url);

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["open_graph"]["type"], "article");
        assert!(json["open_graph"].get("modified_time").is_none());
        assert_eq!(json["robots"]["google_bot"]["max-image-preview"], "large");
    }

    #[test]
    fn attribution_fields() {
        let profile = fixtures::profile();
        let meta = compose(&profile, &PageMetadataRequest::new("/"));
        assert_eq!(meta.authors, vec!["Nabeel Sharafat"]);
        assert_eq!(meta.publisher, "Beelodev");
        assert_eq!(meta.category, "technology");
        assert_eq!(meta.title_template, "%s | Beelodev");
    }
}
