//! Shared types, error model, configuration and business profile for SiteGraph.
//!
//! This crate is the foundation depended on by all other SiteGraph crates.
//! It provides:
//! - [`SiteGraphError`], the unified error type
//! - The business profile ([`BusinessProfile`]) and its loader
//! - Per-page request types ([`PageMetadataRequest`], [`BreadcrumbItem`])
//! - Configuration ([`AppConfig`], [`SitemapConfig`], config loading)

pub mod config;
pub mod error;
pub mod profile;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ChangeFrequency, DefaultsConfig, SitemapConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{Result, SiteGraphError};
pub use profile::{
    Address, Brand, BusinessProfile, ContactChannel, FaqPair, Founder, LooseNumber, Offering,
    Project, SeoDefaults, ServiceOffering, StaticPage, StaticPages, Testimonial, Testimonials,
    ToolPage, load_profile,
};
pub use types::{BreadcrumbItem, ContentType, PageMetadataRequest};
