//! Render surface: JSON-LD serialization, head tags and cache fingerprints.

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use sitegraph_shared::{ContentType, Result, SiteGraphError};

use crate::entities::Entity;
use crate::metadata::PageMetadata;

const SCHEMA_CONTEXT: &str = "https://schema.org";

/// One entity wrapped with its `@context` so it can be embedded on its own.
#[derive(Serialize)]
struct JsonLd<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(flatten)]
    entity: &'a Entity,
}

/// Serialize one entity as a standalone JSON-LD document.
///
/// The output is safe inside `<script>`: `<`, `>` and `&` are written as
/// `\u003c`, `\u003e` and `\u0026`, and the JavaScript line terminators
/// U+2028/U+2029 are escaped too. These only ever occur inside JSON strings,
/// so the result is still equivalent JSON.
pub fn to_json_ld(entity: &Entity) -> Result<String> {
    let json = serde_json::to_string(&JsonLd {
        context: SCHEMA_CONTEXT,
        entity,
    })
    .map_err(|e| SiteGraphError::Serialization(e.to_string()))?;
    Ok(script_safe(&json))
}

/// The JSON-LD document of one entity as a `serde_json::Value`.
pub fn to_json_value(entity: &Entity) -> Result<serde_json::Value> {
    serde_json::to_value(JsonLd {
        context: SCHEMA_CONTEXT,
        entity,
    })
    .map_err(|e| SiteGraphError::Serialization(e.to_string()))
}

fn script_safe(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the `<head>` fragment of a page: title, meta and link tags, then
/// one JSON-LD script per entity in order.
#[instrument(skip_all, fields(canonical = %metadata.canonical_url, entities = entities.len()))]
pub fn render_head(metadata: &PageMetadata, entities: &[Entity]) -> Result<String> {
    let mut head = String::new();
    push_line(&mut head, &format!("<title>{}</title>", encode_text(&metadata.title)));

    meta_name(&mut head, "description", &metadata.description);
    if !metadata.keywords.is_empty() {
        meta_name(&mut head, "keywords", &metadata.keywords.join(", "));
    }
    for author in &metadata.authors {
        meta_name(&mut head, "author", author);
    }
    meta_name(&mut head, "creator", &metadata.creator);
    meta_name(&mut head, "publisher", &metadata.publisher);
    meta_name(&mut head, "category", &metadata.category);
    meta_name(&mut head, "robots", &metadata.robots.content());
    meta_name(&mut head, "googlebot", &metadata.robots.google_bot_content());
    push_line(
        &mut head,
        &format!(
            r#"<link rel="canonical" href="{}">"#,
            encode_double_quoted_attribute(&metadata.canonical_url)
        ),
    );

    let og = &metadata.open_graph;
    meta_property(&mut head, "og:type", og.content_type.as_str());
    meta_property(&mut head, "og:locale", &og.locale);
    meta_property(&mut head, "og:url", &og.url);
    meta_property(&mut head, "og:site_name", &og.site_name);
    meta_property(&mut head, "og:title", &og.title);
    meta_property(&mut head, "og:description", &og.description);
    for image in &og.images {
        meta_property(&mut head, "og:image", &image.url);
        meta_property(&mut head, "og:image:width", &image.width.to_string());
        meta_property(&mut head, "og:image:height", &image.height.to_string());
        meta_property(&mut head, "og:image:alt", &image.alt);
    }
    if og.content_type == ContentType::Article {
        if let Some(published) = og.published_time {
            meta_property(&mut head, "article:published_time", &published.to_rfc3339());
        }
        if let Some(modified) = og.modified_time {
            meta_property(&mut head, "article:modified_time", &modified.to_rfc3339());
        }
    }

    let twitter = &metadata.twitter;
    meta_name(&mut head, "twitter:card", twitter.card);
    meta_name(&mut head, "twitter:title", &twitter.title);
    meta_name(&mut head, "twitter:description", &twitter.description);
    for image in &twitter.images {
        meta_name(&mut head, "twitter:image", image);
    }
    meta_name(&mut head, "twitter:creator", &twitter.creator);

    for entity in entities {
        push_line(
            &mut head,
            &format!(
                r#"<script type="application/ld+json">{}</script>"#,
                to_json_ld(entity)?
            ),
        );
    }

    debug!(bytes = head.len(), "rendered head");
    Ok(head)
}

fn meta_name(head: &mut String, name: &str, content: &str) {
    push_line(
        head,
        &format!(
            r#"<meta name="{name}" content="{}">"#,
            encode_double_quoted_attribute(content)
        ),
    );
}

fn meta_property(head: &mut String, property: &str, content: &str) {
    push_line(
        head,
        &format!(
            r#"<meta property="{property}" content="{}">"#,
            encode_double_quoted_attribute(content)
        ),
    );
}

fn push_line(head: &mut String, line: &str) {
    head.push_str(line);
    head.push('\n');
}

/// SHA-256 hex digest of a rendered head, usable as an ETag.
pub fn fingerprint(html: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(html.as_bytes());
    format!("{:x}", hasher.finalize())
}
