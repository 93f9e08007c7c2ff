//! Web-app manifest (`manifest.webmanifest`).

use serde::Serialize;

use sitegraph_shared::BusinessProfile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: String,
    pub display: String,
    pub background_color: String,
    pub theme_color: String,
    pub icons: Vec<ManifestIcon>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

pub fn web_manifest(profile: &BusinessProfile) -> WebManifest {
    let brand = &profile.brand;
    let short_name = brand
        .short_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(brand.name.trim());

    WebManifest {
        name: brand.name.trim().to_string(),
        short_name: short_name.to_string(),
        description: brand.tagline.trim().to_string(),
        start_url: "/".into(),
        display: "standalone".into(),
        background_color: brand.background_color.clone(),
        theme_color: brand.theme_color.clone(),
        icons: vec![ManifestIcon {
            src: "/favicon.ico".into(),
            sizes: "any".into(),
            mime_type: "image/x-icon".into(),
        }],
    }
}
