//! The business profile: the single read-only source of truth for brand
//! identity, contact channels, services, offerings, testimonials, projects,
//! FAQ and SEO defaults.
//!
//! A profile is loaded once from TOML and then passed by reference into every
//! composer and builder call. Nothing in SiteGraph mutates it.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SiteGraphError};

// ---------------------------------------------------------------------------
// Loose values
// ---------------------------------------------------------------------------

/// A number as it appears in hand-edited business data: either a real
/// number (`4.9`) or display text (`"4.9"`, `"100+"`, `"$1,099"`).
///
/// Conversion into a strict number happens in one place, the core crate's
/// coercion helpers; nothing else should read the raw value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
}

impl From<&str> for LooseNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for LooseNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

// ---------------------------------------------------------------------------
// Profile sections
// ---------------------------------------------------------------------------

/// Postal address fragments. Both parts are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
}

/// `[brand]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    /// Brand name, appended to page titles.
    pub name: String,
    /// Bare domain (`example.com`); the site origin is `https://{domain}`.
    pub domain: String,
    /// One-line tagline, used as the default description.
    #[serde(default)]
    pub tagline: String,
    /// Site default title. Falls back to the brand name.
    #[serde(default)]
    pub default_title: Option<String>,
    /// Short name for the web-app manifest.
    #[serde(default)]
    pub short_name: Option<String>,
    /// Logo path or URL.
    #[serde(default = "default_logo")]
    pub logo: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Address,
    /// Free-text area served, e.g. `Worldwide`.
    #[serde(default = "default_area_served")]
    pub area_served: String,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
}

fn default_logo() -> String {
    "/logo.svg".into()
}
fn default_area_served() -> String {
    "Worldwide".into()
}
fn default_theme_color() -> String {
    "#0ea5e9".into()
}
fn default_background_color() -> String {
    "#04040a".into()
}

/// `[founder]` section: the person behind the brand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Founder {
    pub name: String,
    #[serde(default)]
    pub job_title: Option<String>,
    /// Personal profile links; filtered like every other link.
    #[serde(default)]
    pub same_as: Vec<String>,
}

/// `[seo]` section: site-wide metadata defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoDefaults {
    /// Keywords emitted on every page, ahead of page-specific ones.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Social preview image used when a page supplies none.
    #[serde(default = "default_preview_image")]
    pub default_image: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_category")]
    pub category: String,
}

impl Default for SeoDefaults {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            default_image: default_preview_image(),
            locale: default_locale(),
            category: default_category(),
        }
    }
}

fn default_preview_image() -> String {
    "/og-image.jpg".into()
}
fn default_locale() -> String {
    "en_US".into()
}
fn default_category() -> String {
    "technology".into()
}

/// A labelled outbound link (`[[contact]]`), e.g. a marketplace profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactChannel {
    pub label: String,
    #[serde(default)]
    pub url: String,
}

/// An entry of the service catalog (`[[services]]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOffering {
    /// Stable slug; derived from the name when absent.
    #[serde(default)]
    pub slug: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// One question/answer pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqPair {
    pub question: String,
    pub answer: String,
}

/// A productized offering with its own detail page (`[[offerings]]`,
/// routed under `/systems/{slug}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offering {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub short_headline: String,
    #[serde(default)]
    pub long_description: String,
    /// Display price such as `"$1099 one-time setup"`.
    #[serde(default)]
    pub price_label: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub faqs: Vec<FaqPair>,
}

/// A single client testimonial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    pub author: String,
    #[serde(default)]
    pub role: Option<String>,
    pub text: String,
    /// Star rating on a 1–5 scale, possibly as display text.
    #[serde(default)]
    pub rating: Option<LooseNumber>,
}

/// `[testimonials]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Testimonials {
    /// Aggregate rating across all platforms, e.g. `"4.9"`.
    #[serde(default)]
    pub aggregate_rating: Option<LooseNumber>,
    /// Total review count, e.g. `"100+"`.
    #[serde(default)]
    pub review_count: Option<LooseNumber>,
    #[serde(default)]
    pub items: Vec<Testimonial>,
}

/// A portfolio case study (`[[projects]]`, routed under `/projects/{slug}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub full_description: String,
    /// Ordered image paths or URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Link to the live product, if public.
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    /// Last content change, as `YYYY-MM-DD`.
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// A standalone tool page such as a cost calculator (`[[tools]]`, routed
/// under `/{slug}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolPage {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Head copy of one fixed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticPage {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl StaticPage {
    fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            keywords: Vec::new(),
        }
    }
}

/// `[pages]` section: copy for the fixed content pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticPages {
    #[serde(default = "default_about_page")]
    pub about: StaticPage,
    #[serde(default = "default_process_page")]
    pub process: StaticPage,
    #[serde(default = "default_systems_page")]
    pub systems: StaticPage,
}

impl Default for StaticPages {
    fn default() -> Self {
        Self {
            about: default_about_page(),
            process: default_process_page(),
            systems: default_systems_page(),
        }
    }
}

fn default_about_page() -> StaticPage {
    StaticPage::titled("About")
}
fn default_process_page() -> StaticPage {
    StaticPage::titled("Process")
}
fn default_systems_page() -> StaticPage {
    StaticPage::titled("Automation Systems")
}

// ---------------------------------------------------------------------------
// BusinessProfile
// ---------------------------------------------------------------------------

/// The complete, immutable business profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub brand: Brand,
    pub founder: Founder,
    #[serde(default)]
    pub seo: SeoDefaults,
    #[serde(default)]
    pub contact: Vec<ContactChannel>,
    #[serde(default)]
    pub services: Vec<ServiceOffering>,
    #[serde(default)]
    pub offerings: Vec<Offering>,
    #[serde(default)]
    pub testimonials: Testimonials,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub faqs: Vec<FaqPair>,
    #[serde(default)]
    pub tools: Vec<ToolPage>,
    #[serde(default)]
    pub pages: StaticPages,
}

impl BusinessProfile {
    /// Parse and validate a profile from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let profile: Self = toml::from_str(content)
            .map_err(|e| SiteGraphError::profile(format!("invalid profile: {e}")))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Site origin without a trailing slash, e.g. `https://example.com`.
    pub fn origin(&self) -> String {
        format!("https://{}", bare_domain(&self.brand.domain))
    }

    /// The site default title, falling back to the brand name.
    pub fn default_title(&self) -> &str {
        match self.brand.default_title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.brand.name,
        }
    }

    pub fn find_project(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }

    pub fn find_offering(&self, slug: &str) -> Option<&Offering> {
        self.offerings.iter().find(|o| o.slug == slug)
    }

    pub fn find_tool(&self, slug: &str) -> Option<&ToolPage> {
        self.tools.iter().find(|t| t.slug == slug)
    }

    /// Check the fields every page depends on. Per-entity problems (a bad
    /// project slug, a non-numeric rating) are not errors here; builders drop
    /// or omit those at render time.
    pub fn validate(&self) -> Result<()> {
        if self.brand.name.trim().is_empty() {
            return Err(SiteGraphError::profile("brand.name must not be empty"));
        }

        let domain = bare_domain(&self.brand.domain);
        if domain.is_empty() {
            return Err(SiteGraphError::profile("brand.domain must not be empty"));
        }

        let origin = Url::parse(&format!("https://{domain}")).map_err(|e| {
            SiteGraphError::profile(format!("brand.domain '{domain}' is not a valid host: {e}"))
        })?;
        if origin.path() != "/" || origin.query().is_some() || origin.fragment().is_some() {
            return Err(SiteGraphError::profile(format!(
                "brand.domain '{domain}' must be a bare host without path, query or fragment"
            )));
        }

        if self.founder.name.trim().is_empty() {
            return Err(SiteGraphError::profile("founder.name must not be empty"));
        }

        let collections = [
            ("project", first_duplicate(self.projects.iter().map(|p| p.slug.as_str()))),
            ("offering", first_duplicate(self.offerings.iter().map(|o| o.slug.as_str()))),
            ("tool", first_duplicate(self.tools.iter().map(|t| t.slug.as_str()))),
        ];
        for (kind, duplicate) in collections {
            if let Some(slug) = duplicate {
                return Err(SiteGraphError::profile(format!("duplicate {kind} slug '{slug}'")));
            }
        }

        Ok(())
    }
}

/// First slug that appears more than once, compared after trimming.
fn first_duplicate<'a>(slugs: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    slugs.map(str::trim).find(|slug| !seen.insert(*slug))
}

/// Strip an accidental scheme and trailing slashes from a configured domain.
fn bare_domain(domain: &str) -> &str {
    let domain = domain.trim();
    let domain = domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain);
    domain.trim_end_matches('/')
}

/// Load and validate a business profile from a TOML file.
pub fn load_profile(path: &Path) -> Result<BusinessProfile> {
    let content = std::fs::read_to_string(path).map_err(|e| SiteGraphError::io(path, e))?;
    let profile = BusinessProfile::from_toml_str(&content).map_err(|e| match e {
        SiteGraphError::Profile { message } => {
            SiteGraphError::profile(format!("{}: {message}", path.display()))
        }
        other => other,
    })?;

    tracing::debug!(
        path = %path.display(),
        brand = %profile.brand.name,
        services = profile.services.len(),
        projects = profile.projects.len(),
        testimonials = profile.testimonials.items.len(),
        "loaded business profile"
    );

    Ok(profile)
}
