//! Knowledge-graph records (schema.org vocabulary).
//!
//! Every record is a plain, serializable value with no cycles: records refer
//! to each other through [`NodeRef`] identifiers rather than by embedding.
//! Serialization emits the schema.org `@type` as the tag of [`Entity`], so
//! the Rust variant names are free to follow the domain (`LocalBusiness`
//! serializes as `ProfessionalService`, `Project` as `CreativeWork`, ...).

use serde::Serialize;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// `{origin}#organization`, shared by the Organization and LocalBusiness records.
pub fn organization_id(origin: &str) -> String {
    format!("{origin}#organization")
}

pub fn website_id(origin: &str) -> String {
    format!("{origin}#website")
}

pub fn person_id(origin: &str) -> String {
    format!("{origin}#person")
}

pub fn service_id(origin: &str, slug: &str) -> String {
    format!("{origin}#service-{slug}")
}

/// Productized offerings live in their own namespace so a catalog service
/// and an offering may share a slug without sharing a node.
pub fn system_id(origin: &str, slug: &str) -> String {
    format!("{origin}#system-{slug}")
}

pub fn project_id(origin: &str, slug: &str) -> String {
    format!("{origin}/projects/{slug}#project")
}

/// Identifiers every page may reference: they are emitted on the site root.
pub fn well_known_ids(origin: &str) -> [String; 3] {
    [
        organization_id(origin),
        website_id(origin),
        person_id(origin),
    ]
}

/// A reference to another record by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    #[serde(rename = "@id")]
    pub id: String,
}

impl NodeRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

// ---------------------------------------------------------------------------
// Nested value types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_locality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub struct AggregateRating {
    pub rating_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
    pub best_rating: f64,
    pub worst_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub struct Rating {
    pub rating_value: f64,
    pub best_rating: f64,
    pub worst_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@type")]
pub struct Country {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub struct Offer {
    pub price: f64,
    pub price_currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Inline author of a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@type", rename = "Person")]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@type")]
pub struct Answer {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub struct Question {
    pub name: String,
    pub accepted_answer: Answer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@type")]
pub struct ListItem {
    pub position: u32,
    pub name: String,
    pub item: String,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub url: String,
    pub logo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<PostalAddress>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
    pub founder: NodeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_rating: Option<AggregateRating>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub url: String,
    pub works_for: NodeRef,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
}

/// The business as a local/professional service. Shares its identifier with
/// [`Organization`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalBusiness {
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub url: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<PostalAddress>,
    pub area_served: Country,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub service_type: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_rating: Option<AggregateRating>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub provider: NodeRef,
    pub area_served: Country,
    pub service_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offers: Option<Offer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author: Author,
    pub review_body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_rating: Option<Rating>,
    pub item_reviewed: NodeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPage {
    #[serde(rename = "@id")]
    pub id: String,
    pub main_entity: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
    #[serde(rename = "@id")]
    pub id: String,
    pub item_list_element: Vec<ListItem>,
}

/// A portfolio case study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeWork {
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub image: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub creator: NodeRef,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSite {
    #[serde(rename = "@id")]
    pub id: String,
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub publisher: NodeRef,
    pub in_language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPage {
    #[serde(rename = "@id")]
    pub id: String,
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_part_of: NodeRef,
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Discriminator of an [`Entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Organization,
    Person,
    LocalBusiness,
    Service,
    Review,
    FaqPage,
    Breadcrumb,
    Project,
    WebSite,
    WebPage,
}

impl EntityKind {
    /// The schema.org type name emitted as `@type`.
    pub fn schema_type(self) -> &'static str {
        match self {
            Self::Organization => "Organization",
            Self::Person => "Person",
            Self::LocalBusiness => "ProfessionalService",
            Self::Service => "Service",
            Self::Review => "Review",
            Self::FaqPage => "FAQPage",
            Self::Breadcrumb => "BreadcrumbList",
            Self::Project => "CreativeWork",
            Self::WebSite => "WebSite",
            Self::WebPage => "WebPage",
        }
    }
}

/// Any knowledge-graph record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@type")]
pub enum Entity {
    Organization(Organization),
    Person(Person),
    #[serde(rename = "ProfessionalService")]
    LocalBusiness(LocalBusiness),
    Service(Service),
    Review(Review),
    #[serde(rename = "FAQPage")]
    FaqPage(FaqPage),
    #[serde(rename = "BreadcrumbList")]
    Breadcrumb(BreadcrumbList),
    #[serde(rename = "CreativeWork")]
    Project(CreativeWork),
    WebSite(WebSite),
    WebPage(WebPage),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Organization(_) => EntityKind::Organization,
            Self::Person(_) => EntityKind::Person,
            Self::LocalBusiness(_) => EntityKind::LocalBusiness,
            Self::Service(_) => EntityKind::Service,
            Self::Review(_) => EntityKind::Review,
            Self::FaqPage(_) => EntityKind::FaqPage,
            Self::Breadcrumb(_) => EntityKind::Breadcrumb,
            Self::Project(_) => EntityKind::Project,
            Self::WebSite(_) => EntityKind::WebSite,
            Self::WebPage(_) => EntityKind::WebPage,
        }
    }

    /// The record's own identifier, if it has one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Organization(e) => Some(&e.id),
            Self::Person(e) => Some(&e.id),
            Self::LocalBusiness(e) => Some(&e.id),
            Self::Service(e) => Some(&e.id),
            Self::Review(_) => None,
            Self::FaqPage(e) => Some(&e.id),
            Self::Breadcrumb(e) => Some(&e.id),
            Self::Project(e) => Some(&e.id),
            Self::WebSite(e) => Some(&e.id),
            Self::WebPage(e) => Some(&e.id),
        }
    }

    /// Identifiers of other records this one points at.
    pub fn references(&self) -> Vec<&str> {
        match self {
            Self::Organization(e) => vec![e.founder.id.as_str()],
            Self::Person(e) => vec![e.works_for.id.as_str()],
            Self::Service(e) => vec![e.provider.id.as_str()],
            Self::Review(e) => vec![e.item_reviewed.id.as_str()],
            Self::Project(e) => vec![e.creator.id.as_str()],
            Self::WebSite(e) => vec![e.publisher.id.as_str()],
            Self::WebPage(e) => vec![e.is_part_of.id.as_str()],
            Self::LocalBusiness(_) | Self::FaqPage(_) | Self::Breadcrumb(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_scoped_to_origin() {
        let origin = "https://beelodev.com";
        assert_eq!(organization_id(origin), "https://beelodev.com#organization");
        assert_eq!(service_id(origin, "ai-automation"), "https://beelodev.com#service-ai-automation");
        assert_eq!(system_id(origin, "docu-brain"), "https://beelodev.com#system-docu-brain");
        assert_ne!(service_id(origin, "docu-brain"), system_id(origin, "docu-brain"));
        assert_eq!(
            project_id(origin, "foo"),
            "https://beelodev.com/projects/foo#project"
        );
        assert!(well_known_ids(origin).contains(&website_id(origin)));
    }

    #[test]
    fn entity_serializes_schema_type_tag() {
        let entity = Entity::Breadcrumb(BreadcrumbList {
            id: "https://x.test/about#breadcrumb".into(),
            item_list_element: vec![ListItem {
                position: 1,
                name: "Home".into(),
                item: "https://x.test/".into(),
            }],
        });
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["@type"], "BreadcrumbList");
        assert_eq!(json["@id"], "https://x.test/about#breadcrumb");
        assert_eq!(json["itemListElement"][0]["@type"], "ListItem");
        assert_eq!(json["itemListElement"][0]["position"], 1);
        assert_eq!(entity.kind().schema_type(), "BreadcrumbList");
    }

    #[test]
    fn nested_types_carry_their_tag() {
        let review = Entity::Review(Review {
            author: Author { name: "Ada".into() },
            review_body: "Great".into(),
            review_rating: Some(Rating {
                rating_value: 5.0,
                best_rating: 5.0,
                worst_rating: 1.0,
            }),
            item_reviewed: NodeRef::new("https://x.test#organization"),
        });
        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["@type"], "Review");
        assert_eq!(json["author"]["@type"], "Person");
        assert_eq!(json["reviewRating"]["@type"], "Rating");
        assert_eq!(json["reviewRating"]["ratingValue"], 5.0);
        assert_eq!(json["itemReviewed"]["@id"], "https://x.test#organization");
        assert_eq!(review.id(), None);
        assert_eq!(review.references(), vec!["https://x.test#organization"]);
    }

    #[test]
    fn local_business_serializes_as_professional_service() {
        let entity = Entity::LocalBusiness(LocalBusiness {
            id: "https://x.test#organization".into(),
            name: "X".into(),
            url: "https://x.test".into(),
            image: "https://x.test/logo.svg".into(),
            email: None,
            telephone: None,
            address: None,
            area_served: Country {
                name: "Worldwide".into(),
            },
            service_type: Vec::new(),
            price_range: None,
            aggregate_rating: None,
        });
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["@type"], "ProfessionalService");
        assert_eq!(json["areaServed"]["@type"], "Country");
        assert!(json.get("serviceType").is_none());
        assert!(json.get("email").is_none());
    }
}
