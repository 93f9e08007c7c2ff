//! Schema graph assembler.
//!
//! Maps a page type to the ordered set of records emitted on that page and
//! enforces the graph-level invariants: every reference resolves, records
//! sharing an identifier agree on their shared fields, and output order is
//! stable across calls.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, instrument, warn};

use sitegraph_shared::{
    BreadcrumbItem, BusinessProfile, Offering, PageMetadataRequest, Result, SiteGraphError,
};

use crate::builders;
use crate::entities::{Entity, well_known_ids};
use crate::links::{is_url_safe_slug, normalize_path};

// ---------------------------------------------------------------------------
// PageType
// ---------------------------------------------------------------------------

/// The closed set of page kinds the site serves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageType {
    Home,
    About,
    Process,
    Systems,
    /// Offering detail page, `/systems/{slug}`.
    System { slug: String },
    /// Portfolio case study, `/projects/{slug}`.
    Project { slug: String },
    /// Standalone tool page such as a cost calculator, `/{slug}`.
    Tool { slug: String },
}

impl PageType {
    /// Site-relative path of the page.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::About => "/about".into(),
            Self::Process => "/process".into(),
            Self::Systems => "/systems".into(),
            Self::System { slug } => format!("/systems/{slug}"),
            Self::Project { slug } => format!("/projects/{slug}"),
            Self::Tool { slug } => format!("/{slug}"),
        }
    }

    /// Map a route path to a page type.
    ///
    /// Offering and project slugs are checked for shape only, so a missing
    /// record still maps to its page type (and renders as "not found").
    /// A single-segment path maps to a tool only when the profile knows it.
    pub fn from_path(profile: &BusinessProfile, path: &str) -> Result<Self> {
        let normalized = normalize_path(path);
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

        let page = match segments.as_slice() {
            [] => Self::Home,
            ["about"] => Self::About,
            ["process"] => Self::Process,
            ["systems"] => Self::Systems,
            ["systems", slug] if is_url_safe_slug(slug) => Self::System {
                slug: (*slug).to_string(),
            },
            ["projects", slug] if is_url_safe_slug(slug) => Self::Project {
                slug: (*slug).to_string(),
            },
            [slug] if profile.find_tool(slug).is_some() => Self::Tool {
                slug: (*slug).to_string(),
            },
            _ => return Err(SiteGraphError::unknown_page(normalized)),
        };
        Ok(page)
    }

    /// Declarative builder set for this page type, in emission order.
    pub fn builders(&self) -> &'static [BuilderSlot] {
        match self {
            Self::Home => HOME_BUILDERS,
            Self::About | Self::Process | Self::Systems | Self::Tool { .. } => CONTENT_BUILDERS,
            Self::System { .. } => SYSTEM_BUILDERS,
            Self::Project { .. } => PROJECT_BUILDERS,
        }
    }

    /// Breadcrumb trail ending at this page. The home page has none.
    pub fn breadcrumb_trail(&self, profile: &BusinessProfile) -> Vec<BreadcrumbItem> {
        let home = BreadcrumbItem::new("Home", "/");
        match self {
            Self::Home => Vec::new(),
            Self::About => vec![home, BreadcrumbItem::new("About", self.path())],
            Self::Process => vec![home, BreadcrumbItem::new("Process", self.path())],
            Self::Systems => vec![home, BreadcrumbItem::new("Systems", self.path())],
            Self::System { slug } => {
                let label = profile
                    .find_offering(slug)
                    .map_or(slug.as_str(), |o| o.name.as_str());
                vec![
                    home,
                    BreadcrumbItem::new("Systems", Self::Systems.path()),
                    BreadcrumbItem::new(label, self.path()),
                ]
            }
            Self::Project { slug } => {
                let label = profile
                    .find_project(slug)
                    .map_or(slug.as_str(), |p| p.title.as_str());
                vec![home, BreadcrumbItem::new(label, self.path())]
            }
            Self::Tool { slug } => {
                let label = profile
                    .find_tool(slug)
                    .map_or(slug.as_str(), |t| t.name.as_str());
                vec![home, BreadcrumbItem::new(label, self.path())]
            }
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::About => f.write_str("about"),
            Self::Process => f.write_str("process"),
            Self::Systems => f.write_str("systems"),
            Self::System { slug } => write!(f, "system:{slug}"),
            Self::Project { slug } => write!(f, "project:{slug}"),
            Self::Tool { slug } => write!(f, "tool:{slug}"),
        }
    }
}

/// Parse a page-type key: `home`, `about`, `process`, `systems`,
/// `system:{slug}`, `project:{slug}` or `tool:{slug}`.
impl FromStr for PageType {
    type Err = SiteGraphError;

    fn from_str(key: &str) -> Result<Self> {
        let key = key.trim();
        let page = match key.split_once(':') {
            None => match key {
                "home" => Self::Home,
                "about" => Self::About,
                "process" => Self::Process,
                "systems" => Self::Systems,
                _ => return Err(SiteGraphError::config(format!("unknown page type '{key}'"))),
            },
            Some((kind, slug)) => {
                if !is_url_safe_slug(slug) {
                    return Err(SiteGraphError::config(format!(
                        "page type '{key}' has an invalid slug"
                    )));
                }
                let slug = slug.to_string();
                match kind {
                    "system" => Self::System { slug },
                    "project" => Self::Project { slug },
                    "tool" => Self::Tool { slug },
                    _ => {
                        return Err(SiteGraphError::config(format!(
                            "unknown page type '{key}'"
                        )));
                    }
                }
            }
        };
        Ok(page)
    }
}

// ---------------------------------------------------------------------------
// Builder table
// ---------------------------------------------------------------------------

/// One entry of a page's builder set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderSlot {
    WebSite,
    Organization,
    Person,
    LocalBusiness,
    /// Every catalog service.
    Services,
    /// Every testimonial.
    Reviews,
    /// Site-wide FAQ.
    SiteFaq,
    Breadcrumb,
    WebPage,
    /// Service record of the page's offering.
    OfferingService,
    /// FAQ of the page's offering.
    OfferingFaq,
    Project,
}

const HOME_BUILDERS: &[BuilderSlot] = &[
    BuilderSlot::WebSite,
    BuilderSlot::Organization,
    BuilderSlot::Person,
    BuilderSlot::LocalBusiness,
    BuilderSlot::Services,
    BuilderSlot::Reviews,
    BuilderSlot::SiteFaq,
];

const CONTENT_BUILDERS: &[BuilderSlot] = &[BuilderSlot::Breadcrumb, BuilderSlot::WebPage];

const SYSTEM_BUILDERS: &[BuilderSlot] = &[
    BuilderSlot::Breadcrumb,
    BuilderSlot::OfferingService,
    BuilderSlot::OfferingFaq,
];

const PROJECT_BUILDERS: &[BuilderSlot] = &[BuilderSlot::Breadcrumb, BuilderSlot::Project];

// ---------------------------------------------------------------------------
// PageContext
// ---------------------------------------------------------------------------

/// Page-level facts the builders need beyond the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// Display name of the page, without the brand suffix.
    pub name: String,
    pub description: Option<String>,
}

impl PageContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Derive the context from a metadata request, falling back to the site
    /// defaults for a missing title.
    pub fn from_request(profile: &BusinessProfile, request: &PageMetadataRequest) -> Self {
        let name = request
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| profile.default_title());
        Self {
            name: name.trim().to_string(),
            description: request
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map(str::to_string),
        }
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Assemble the ordered records for one page.
#[instrument(skip_all, fields(page = %page))]
pub fn assemble(page: &PageType, profile: &BusinessProfile, ctx: &PageContext) -> Vec<Entity> {
    let candidates: Vec<Entity> = page
        .builders()
        .iter()
        .flat_map(|slot| run_slot(*slot, page, profile, ctx))
        .collect();
    let built = candidates.len();

    let merged = merge_shared_ids(candidates);
    let entities = drop_dangling(merged, &profile.origin());

    info!(built, emitted = entities.len(), "assembled page graph");
    entities
}

fn run_slot(
    slot: BuilderSlot,
    page: &PageType,
    profile: &BusinessProfile,
    ctx: &PageContext,
) -> Vec<Entity> {
    let path = page.path();
    match slot {
        BuilderSlot::WebSite => vec![builders::build_website(profile)],
        BuilderSlot::Organization => vec![builders::build_organization(profile)],
        BuilderSlot::Person => vec![builders::build_person(profile)],
        BuilderSlot::LocalBusiness => vec![builders::build_local_business(profile)],
        BuilderSlot::Services => builders::build_services(profile),
        BuilderSlot::Reviews => builders::build_reviews(profile),
        BuilderSlot::SiteFaq => vec![builders::build_faq_page(profile, &path, &profile.faqs)],
        BuilderSlot::Breadcrumb => {
            let trail = page.breadcrumb_trail(profile);
            builders::build_breadcrumbs(profile, &trail, &path)
                .into_iter()
                .collect()
        }
        BuilderSlot::WebPage => {
            if let PageType::Tool { slug } = page {
                if profile.find_tool(slug).is_none() {
                    warn!(slug = %slug, "unknown tool, skipping web page record");
                    return Vec::new();
                }
            }
            vec![builders::build_web_page(
                profile,
                &path,
                &ctx.name,
                ctx.description.as_deref(),
            )]
        }
        BuilderSlot::OfferingService => match offering_for(page, profile) {
            Some(offering) => builders::build_offering_service(profile, offering)
                .into_iter()
                .collect(),
            None => Vec::new(),
        },
        BuilderSlot::OfferingFaq => match offering_for(page, profile) {
            Some(offering) => vec![builders::build_faq_page(profile, &path, &offering.faqs)],
            None => Vec::new(),
        },
        BuilderSlot::Project => {
            let PageType::Project { slug } = page else {
                return Vec::new();
            };
            match profile.find_project(slug) {
                Some(project) => builders::build_project(profile, project).into_iter().collect(),
                None => {
                    warn!(slug = %slug, "unknown project, skipping project record");
                    Vec::new()
                }
            }
        }
    }
}

fn offering_for<'a>(
    page: &PageType,
    profile: &'a BusinessProfile,
) -> Option<&'a Offering> {
    let PageType::System { slug } = page else {
        return None;
    };
    let offering = profile.find_offering(slug);
    if offering.is_none() {
        warn!(slug = %slug, "unknown offering, skipping offering records");
    }
    offering
}

/// Collapse exact duplicates and drop a later record that shares an
/// identifier with an earlier one but disagrees on a shared field.
fn merge_shared_ids(candidates: Vec<Entity>) -> Vec<Entity> {
    let mut kept: Vec<(Entity, Option<serde_json::Value>)> = Vec::with_capacity(candidates.len());

    'next: for entity in candidates {
        let value = serde_json::to_value(&entity).ok();
        if let Some(id) = entity.id() {
            for (existing, existing_value) in &kept {
                if existing.id() != Some(id) {
                    continue;
                }
                if *existing == entity {
                    debug!(id, "collapsing duplicate record");
                    continue 'next;
                }
                if let Some(field) = conflicting_field(existing_value.as_ref(), value.as_ref()) {
                    warn!(
                        id,
                        kind = entity.kind().schema_type(),
                        field = %field,
                        "dropping record that conflicts with an earlier one"
                    );
                    continue 'next;
                }
            }
        }
        kept.push((entity, value));
    }

    kept.into_iter().map(|(entity, _)| entity).collect()
}

/// First shared field (other than `@type`) whose values differ. A record
/// that failed to serialize counts as conflicting.
fn conflicting_field(
    a: Option<&serde_json::Value>,
    b: Option<&serde_json::Value>,
) -> Option<String> {
    let (Some(a), Some(b)) = (a.and_then(|v| v.as_object()), b.and_then(|v| v.as_object()))
    else {
        return Some("<unserializable>".into());
    };
    a.iter()
        .filter(|(key, _)| key.as_str() != "@type")
        .find(|(key, value)| b.get(key.as_str()).is_some_and(|other| other != *value))
        .map(|(key, _)| key.clone())
}

/// Remove records whose references do not resolve, repeating until stable
/// since a removal can orphan another record.
fn drop_dangling(mut entities: Vec<Entity>, origin: &str) -> Vec<Entity> {
    let well_known = well_known_ids(origin);
    loop {
        let known: HashSet<String> = entities
            .iter()
            .filter_map(|e| e.id().map(str::to_string))
            .chain(well_known.iter().cloned())
            .collect();

        let before = entities.len();
        entities.retain(|entity| {
            let dangling = entity
                .references()
                .into_iter()
                .find(|r| !known.contains(*r));
            if let Some(reference) = dangling {
                warn!(
                    kind = entity.kind().schema_type(),
                    reference,
                    "dropping record with unresolved reference"
                );
            }
            dangling.is_none()
        });

        if entities.len() == before {
            return entities;
        }
    }
}
