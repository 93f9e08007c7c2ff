//! Page metadata and structured-data synthesis for SiteGraph.
//!
//! Given a [`BusinessProfile`](sitegraph_shared::BusinessProfile) and a page,
//! this crate composes the page's head metadata, assembles its schema.org
//! knowledge graph and renders both into a `<head>` fragment. Everything here
//! is synchronous and free of I/O.

pub mod builders;
pub mod coerce;
pub mod entities;
pub mod graph;
pub mod links;
pub mod manifest;
pub mod metadata;
pub mod pipeline;
pub mod render;
pub mod sitemap;

#[cfg(test)]
mod fixtures;

pub use entities::{Entity, EntityKind};
pub use graph::{PageContext, PageType, assemble};
pub use manifest::{WebManifest, web_manifest};
pub use metadata::{PageMetadata, compose};
pub use pipeline::{
    RenderedPage, known_pages, page_request, render_page, render_route, render_site,
    resolve_route,
};
pub use render::{fingerprint, render_head, to_json_ld, to_json_value};
pub use sitemap::{SitemapEntry, robots_txt, sitemap_entries, sitemap_xml};
