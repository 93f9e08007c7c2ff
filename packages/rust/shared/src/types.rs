//! Per-page request types passed from page assembly into the composer and
//! assembler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ContentType
// ---------------------------------------------------------------------------

/// OpenGraph content type of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Website,
    Article,
    Profile,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Article => "article",
            Self::Profile => "profile",
        }
    }
}

// ---------------------------------------------------------------------------
// PageMetadataRequest
// ---------------------------------------------------------------------------

/// Page-specific metadata overrides. Everything except `path` is optional and
/// falls back to a site-wide default during composition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMetadataRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Site-relative path; always begins with `/`.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    #[serde(default)]
    pub no_index: bool,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    /// Page-specific keywords, appended after the site-wide ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_keywords: Vec<String>,
}

impl PageMetadataRequest {
    /// Create a request for `path`, adding the leading `/` if it is missing.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self {
            path,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_preview_image(mut self, image: impl Into<String>) -> Self {
        self.preview_image = Some(image.into());
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn no_index(mut self) -> Self {
        self.no_index = true;
        self
    }
}

// ---------------------------------------------------------------------------
// BreadcrumbItem
// ---------------------------------------------------------------------------

/// One step of a breadcrumb trail, as supplied by page assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbItem {
    pub name: String,
    /// Site-relative path of the step.
    pub path: String,
}

impl BreadcrumbItem {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_path_gets_leading_slash() {
        assert_eq!(PageMetadataRequest::new("about").path, "/about");
        assert_eq!(PageMetadataRequest::new("/about").path, "/about");
        assert_eq!(PageMetadataRequest::new("").path, "/");
    }

    #[test]
    fn request_builder_sets_fields() {
        let req = PageMetadataRequest::new("/systems/docu-brain")
            .with_title("Docu-Brain")
            .with_content_type(ContentType::Article)
            .with_keywords(["document intelligence", "pdf extraction"])
            .no_index();

        assert_eq!(req.title.as_deref(), Some("Docu-Brain"));
        assert_eq!(req.content_type, ContentType::Article);
        assert_eq!(req.extra_keywords.len(), 2);
        assert!(req.no_index);
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let req: PageMetadataRequest =
            serde_json::from_str(r#"{"path": "/process"}"#).expect("deserialize");
        assert_eq!(req.content_type, ContentType::Website);
        assert!(!req.no_index);
        assert!(req.extra_keywords.is_empty());
    }
}
