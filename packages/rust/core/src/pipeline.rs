//! End-to-end page rendering: route → page type → metadata + graph → head.

use std::collections::HashSet;

use chrono::NaiveTime;
use serde::Serialize;
use tracing::{info, instrument, warn};

use sitegraph_shared::{
    BusinessProfile, ContentType, PageMetadataRequest, Result, SiteGraphError, StaticPage,
};

use crate::entities::Entity;
use crate::graph::{PageContext, PageType, assemble};
use crate::links::is_url_safe_slug;
use crate::metadata::{PageMetadata, compose};
use crate::render::{fingerprint, render_head};

/// Everything the site needs to serve the head of one page.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    /// Page-type key, e.g. `system:docu-brain`.
    #[serde(serialize_with = "serialize_display")]
    pub page: PageType,
    pub metadata: PageMetadata,
    pub entities: Vec<Entity>,
    /// Rendered `<head>` fragment.
    pub head: String,
    /// SHA-256 of `head`.
    pub etag: String,
}

fn serialize_display<S>(page: &PageType, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(page)
}

/// Map a route path to a page that exists in the profile.
///
/// Unlike [`PageType::from_path`], offering and project routes must name a
/// record the profile actually has.
pub fn resolve_route(profile: &BusinessProfile, path: &str) -> Result<PageType> {
    let page = PageType::from_path(profile, path)?;
    let exists = match &page {
        PageType::System { slug } => profile.find_offering(slug).is_some(),
        PageType::Project { slug } => profile.find_project(slug).is_some(),
        _ => true,
    };
    if exists {
        Ok(page)
    } else {
        Err(SiteGraphError::unknown_page(page.path()))
    }
}

/// The metadata request a page makes by default. Detail pages whose record
/// is missing get a "not found" request that is excluded from indexing.
pub fn page_request(profile: &BusinessProfile, page: &PageType) -> PageMetadataRequest {
    let path = page.path();
    match page {
        PageType::Home => PageMetadataRequest::new(path),
        PageType::About => static_request(path, &profile.pages.about),
        PageType::Process => static_request(path, &profile.pages.process),
        PageType::Systems => static_request(path, &profile.pages.systems),
        PageType::System { slug } => match profile.find_offering(slug) {
            Some(offering) => PageMetadataRequest::new(path)
                .with_title(offering.name.clone())
                .with_description(offering.short_headline.clone())
                .with_keywords(offering.keywords.iter().cloned())
                .with_content_type(ContentType::Article),
            None => not_found(path, "System Not Found", "This system does not exist."),
        },
        PageType::Project { slug } => match profile.find_project(slug) {
            Some(project) => {
                let mut request = PageMetadataRequest::new(path)
                    .with_title(project.title.clone())
                    .with_description(project.short_description.clone())
                    .with_keywords(project.category.iter().cloned())
                    .with_content_type(ContentType::Article);
                if let Some(image) = project.images.iter().find(|i| !i.trim().is_empty()) {
                    request = request.with_preview_image(image.clone());
                }
                request.modified_at = project
                    .updated_at
                    .map(|date| date.and_time(NaiveTime::MIN).and_utc());
                request
            }
            None => not_found(path, "Project Not Found", "This project does not exist."),
        },
        PageType::Tool { slug } => match profile.find_tool(slug) {
            Some(tool) => PageMetadataRequest::new(path)
                .with_title(tool.name.clone())
                .with_description(tool.description.clone())
                .with_keywords(tool.keywords.iter().cloned()),
            None => not_found(path, "Page Not Found", "This page does not exist."),
        },
    }
}

fn static_request(path: String, copy: &StaticPage) -> PageMetadataRequest {
    let mut request = PageMetadataRequest::new(path)
        .with_title(copy.title.clone())
        .with_keywords(copy.keywords.iter().cloned());
    request.description = copy.description.clone();
    request
}

fn not_found(path: String, title: &str, description: &str) -> PageMetadataRequest {
    PageMetadataRequest::new(path)
        .with_title(title)
        .with_description(description)
        .no_index()
}

/// Compose, assemble and render one page.
#[instrument(skip_all, fields(page = %page))]
pub fn render_page(profile: &BusinessProfile, page: &PageType) -> Result<RenderedPage> {
    let request = page_request(profile, page);
    let metadata = compose(profile, &request);
    let ctx = PageContext::from_request(profile, &request);
    let entities = assemble(page, profile, &ctx);
    let head = render_head(&metadata, &entities)?;
    let etag = fingerprint(&head);

    info!(
        entities = entities.len(),
        no_index = request.no_index,
        etag = %etag,
        "rendered page"
    );

    Ok(RenderedPage {
        page: page.clone(),
        metadata,
        entities,
        head,
        etag,
    })
}

/// Resolve a route path and render it.
pub fn render_route(profile: &BusinessProfile, path: &str) -> Result<RenderedPage> {
    let page = resolve_route(profile, path)?;
    render_page(profile, &page)
}

/// Every page the profile defines, in sitemap order. A page whose path is
/// already taken by an earlier one is skipped.
pub fn known_pages(profile: &BusinessProfile) -> Vec<PageType> {
    let mut pages = vec![
        PageType::Home,
        PageType::About,
        PageType::Process,
        PageType::Systems,
    ];
    pages.extend(
        profile
            .offerings
            .iter()
            .filter(|o| is_url_safe_slug(&o.slug))
            .map(|o| PageType::System {
                slug: o.slug.clone(),
            }),
    );
    pages.extend(
        profile
            .tools
            .iter()
            .filter(|t| is_url_safe_slug(&t.slug))
            .map(|t| PageType::Tool {
                slug: t.slug.clone(),
            }),
    );
    pages.extend(
        profile
            .projects
            .iter()
            .filter(|p| is_url_safe_slug(&p.slug))
            .map(|p| PageType::Project {
                slug: p.slug.clone(),
            }),
    );

    let mut seen = HashSet::new();
    pages.retain(|page| {
        let first = seen.insert(page.path());
        if !first {
            warn!(page = %page, "skipping page with a duplicate path");
        }
        first
    });
    pages
}

/// Render every known page.
#[instrument(skip_all)]
pub fn render_site(profile: &BusinessProfile) -> Result<Vec<RenderedPage>> {
    let pages = known_pages(profile)
        .iter()
        .map(|page| render_page(profile, page))
        .collect::<Result<Vec<_>>>()?;
    info!(pages = pages.len(), "rendered site");
    Ok(pages)
}
