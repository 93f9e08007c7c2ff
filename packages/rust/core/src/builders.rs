//! Entity schema builders.
//!
//! One pure function per record type. Builders read the business profile and
//! never fail: a record whose required fields are malformed is dropped with a
//! warning, and an optional field that cannot be coerced is omitted.
//!
//! Organization and LocalBusiness share the `#organization` identifier, so
//! every field they have in common is produced by the helpers in the
//! "shared business fields" section below and cannot diverge.

use std::collections::HashSet;

use tracing::{debug, warn};

use sitegraph_shared::{
    BreadcrumbItem, BusinessProfile, FaqPair, Offering, Project, SeoDefaults,
};

use crate::coerce::{RATING_BEST, RATING_WORST, coerce_count, coerce_price, coerce_rating};
use crate::entities::{
    AggregateRating, Answer, Author, BreadcrumbList, Country, CreativeWork, Entity, FaqPage,
    ListItem, LocalBusiness, NodeRef, Offer, Organization, Person, PostalAddress, Question,
    Rating, Review, Service, WebPage, WebSite, organization_id, person_id, project_id,
    service_id, system_id, website_id,
};
use crate::links::{canonical_url, external_link, is_url_safe_slug, resolve_asset, slugify};

const PRICE_CURRENCY: &str = "USD";

// ---------------------------------------------------------------------------
// Shared business fields
// ---------------------------------------------------------------------------

fn home_url(origin: &str) -> String {
    canonical_url(origin, "/")
}

fn postal_address(profile: &BusinessProfile) -> Option<PostalAddress> {
    let address = &profile.brand.address;
    let country = non_blank(address.country.as_deref());
    let locality = non_blank(address.locality.as_deref());
    if country.is_none() && locality.is_none() {
        return None;
    }
    Some(PostalAddress {
        address_country: country,
        address_locality: locality,
    })
}

fn aggregate_rating(profile: &BusinessProfile) -> Option<AggregateRating> {
    let testimonials = &profile.testimonials;
    let Some(rating_value) = coerce_rating(testimonials.aggregate_rating.as_ref()) else {
        if testimonials.aggregate_rating.is_some() {
            warn!("aggregate rating is not a number on the 1-5 scale, omitting it");
        }
        return None;
    };
    Some(AggregateRating {
        rating_value,
        review_count: coerce_count(testimonials.review_count.as_ref()),
        best_rating: RATING_BEST,
        worst_rating: RATING_WORST,
    })
}

fn area_served(profile: &BusinessProfile) -> Country {
    Country {
        name: profile.brand.area_served.trim().to_string(),
    }
}

fn logo_url(profile: &BusinessProfile, origin: &str) -> String {
    resolve_asset(origin, &profile.brand.logo).unwrap_or_else(|| format!("{origin}/logo.svg"))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Keep only valid outbound http(s) links, in order, without repeats.
fn filter_links<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(external_link)
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Site-level records
// ---------------------------------------------------------------------------

pub fn build_organization(profile: &BusinessProfile) -> Entity {
    let origin = profile.origin();
    Entity::Organization(Organization {
        id: organization_id(&origin),
        name: profile.brand.name.trim().to_string(),
        url: home_url(&origin),
        logo: logo_url(profile, &origin),
        description: non_blank(Some(&profile.brand.tagline)),
        email: non_blank(profile.brand.email.as_deref()),
        telephone: non_blank(profile.brand.phone.as_deref()),
        address: postal_address(profile),
        same_as: filter_links(profile.contact.iter().map(|c| c.url.as_str())),
        founder: NodeRef::new(person_id(&origin)),
        aggregate_rating: aggregate_rating(profile),
    })
}

pub fn build_person(profile: &BusinessProfile) -> Entity {
    let origin = profile.origin();
    let founder = &profile.founder;
    Entity::Person(Person {
        id: person_id(&origin),
        name: founder.name.trim().to_string(),
        job_title: non_blank(founder.job_title.as_deref()),
        url: home_url(&origin),
        works_for: NodeRef::new(organization_id(&origin)),
        same_as: filter_links(founder.same_as.iter().map(String::as_str)),
    })
}

pub fn build_local_business(profile: &BusinessProfile) -> Entity {
    let origin = profile.origin();
    let service_type = profile
        .services
        .iter()
        .filter_map(|s| non_blank(Some(&s.name)))
        .collect();

    Entity::LocalBusiness(LocalBusiness {
        id: organization_id(&origin),
        name: profile.brand.name.trim().to_string(),
        url: home_url(&origin),
        image: logo_url(profile, &origin),
        email: non_blank(profile.brand.email.as_deref()),
        telephone: non_blank(profile.brand.phone.as_deref()),
        address: postal_address(profile),
        area_served: area_served(profile),
        service_type,
        price_range: non_blank(profile.brand.price_range.as_deref()),
        aggregate_rating: aggregate_rating(profile),
    })
}

pub fn build_website(profile: &BusinessProfile) -> Entity {
    let origin = profile.origin();
    Entity::WebSite(WebSite {
        id: website_id(&origin),
        url: home_url(&origin),
        name: profile.brand.name.trim().to_string(),
        description: non_blank(Some(&profile.brand.tagline)),
        publisher: NodeRef::new(organization_id(&origin)),
        in_language: language_tag(&profile.seo),
    })
}

/// `en_US` → `en-US`.
fn language_tag(seo: &SeoDefaults) -> String {
    seo.locale.trim().replace('_', "-")
}

// ---------------------------------------------------------------------------
// Services and offerings
// ---------------------------------------------------------------------------

/// One Service per catalog entry. Entries without a name, or whose name
/// yields no usable slug, are dropped.
pub fn build_services(profile: &BusinessProfile) -> Vec<Entity> {
    let origin = profile.origin();
    let mut seen = HashSet::new();
    let mut services = Vec::with_capacity(profile.services.len());

    for service in &profile.services {
        let Some(name) = non_blank(Some(&service.name)) else {
            warn!("dropping service without a name");
            continue;
        };
        let slug = non_blank(service.slug.as_deref()).unwrap_or_else(|| slugify(&name));
        if !is_url_safe_slug(&slug) {
            warn!(service = %name, slug = %slug, "dropping service with unusable slug");
            continue;
        }
        if !seen.insert(slug.clone()) {
            warn!(service = %name, slug = %slug, "dropping service with duplicate slug");
            continue;
        }

        services.push(Entity::Service(Service {
            id: service_id(&origin, &slug),
            service_type: name.clone(),
            name,
            description: non_blank(Some(&service.description)),
            provider: NodeRef::new(organization_id(&origin)),
            area_served: area_served(profile),
            offers: None,
        }));
    }

    debug!(count = services.len(), "built catalog services");
    services
}

/// Service record for one productized offering, with a numeric price when
/// the price label contains one.
pub fn build_offering_service(profile: &BusinessProfile, offering: &Offering) -> Option<Entity> {
    if !is_url_safe_slug(&offering.slug) {
        warn!(slug = %offering.slug, "dropping offering with invalid slug");
        return None;
    }
    let Some(name) = non_blank(Some(&offering.name)) else {
        warn!(slug = %offering.slug, "dropping offering without a name");
        return None;
    };

    let origin = profile.origin();
    let offers = coerce_price(offering.price_label.as_deref()).map(|price| Offer {
        price,
        price_currency: PRICE_CURRENCY.to_string(),
        description: non_blank(offering.price_label.as_deref()),
    });
    if offers.is_none() && offering.price_label.is_some() {
        debug!(slug = %offering.slug, "price label has no amount, omitting offer");
    }

    Some(Entity::Service(Service {
        id: system_id(&origin, &offering.slug),
        service_type: name.clone(),
        name,
        description: non_blank(Some(&offering.long_description))
            .or_else(|| non_blank(Some(&offering.short_headline))),
        provider: NodeRef::new(organization_id(&origin)),
        area_served: area_served(profile),
        offers,
    }))
}

// ---------------------------------------------------------------------------
// Reviews and FAQ
// ---------------------------------------------------------------------------

/// One Review per testimonial. Testimonials missing an author or body are
/// dropped; a rating that does not coerce is omitted.
pub fn build_reviews(profile: &BusinessProfile) -> Vec<Entity> {
    let org = organization_id(&profile.origin());
    profile
        .testimonials
        .items
        .iter()
        .filter_map(|item| {
            let (Some(author), Some(body)) = (non_blank(Some(&item.author)), non_blank(Some(&item.text)))
            else {
                warn!(author = %item.author, "dropping testimonial without author or text");
                return None;
            };
            let review_rating = coerce_rating(item.rating.as_ref()).map(|rating_value| Rating {
                rating_value,
                best_rating: RATING_BEST,
                worst_rating: RATING_WORST,
            });
            if review_rating.is_none() {
                debug!(author = %author, "testimonial has no usable rating");
            }
            Some(Entity::Review(Review {
                author: Author { name: author },
                review_body: body,
                review_rating,
                item_reviewed: NodeRef::new(org.clone()),
            }))
        })
        .collect()
}

/// FAQPage for the page at `path`. Blank pairs are skipped and a repeated
/// question keeps its first answer. An empty list still yields a page.
pub fn build_faq_page(profile: &BusinessProfile, path: &str, pairs: &[FaqPair]) -> Entity {
    let canonical = canonical_url(&profile.origin(), path);
    let mut seen = HashSet::new();
    let main_entity = pairs
        .iter()
        .filter_map(|pair| {
            let question = non_blank(Some(&pair.question))?;
            let answer = non_blank(Some(&pair.answer))?;
            seen.insert(question.clone()).then(|| Question {
                name: question,
                accepted_answer: Answer { text: answer },
            })
        })
        .collect();

    Entity::FaqPage(FaqPage {
        id: format!("{canonical}#faq"),
        main_entity,
    })
}

// ---------------------------------------------------------------------------
// Page-scoped records
// ---------------------------------------------------------------------------

/// BreadcrumbList for `trail`. The final step must point at the current
/// page; otherwise, or when the trail is empty, nothing is emitted.
pub fn build_breadcrumbs(
    profile: &BusinessProfile,
    trail: &[BreadcrumbItem],
    current_path: &str,
) -> Option<Entity> {
    let last = trail.last()?;
    let origin = profile.origin();
    let canonical = canonical_url(&origin, current_path);

    if canonical_url(&origin, &last.path) != canonical {
        warn!(
            last = %last.path,
            current = %current_path,
            "breadcrumb trail does not end at the current page, dropping it"
        );
        return None;
    }
    if trail.iter().any(|step| step.name.trim().is_empty()) {
        warn!(current = %current_path, "breadcrumb trail has an unnamed step, dropping it");
        return None;
    }

    let item_list_element = trail
        .iter()
        .zip(1..)
        .map(|(step, position)| ListItem {
            position,
            name: step.name.trim().to_string(),
            item: canonical_url(&origin, &step.path),
        })
        .collect();

    Some(Entity::Breadcrumb(BreadcrumbList {
        id: format!("{canonical}#breadcrumb"),
        item_list_element,
    }))
}

/// CreativeWork for a portfolio project. Projects with an invalid slug or no
/// title are dropped.
pub fn build_project(profile: &BusinessProfile, project: &Project) -> Option<Entity> {
    if !is_url_safe_slug(&project.slug) {
        warn!(slug = %project.slug, "dropping project with invalid slug");
        return None;
    }
    let Some(name) = non_blank(Some(&project.title)) else {
        warn!(slug = %project.slug, "dropping project without a title");
        return None;
    };

    let origin = profile.origin();
    let image = project
        .images
        .iter()
        .filter_map(|raw| resolve_asset(&origin, raw))
        .collect();

    Some(Entity::Project(CreativeWork {
        id: project_id(&origin, &project.slug),
        name,
        description: non_blank(Some(&project.short_description))
            .or_else(|| non_blank(Some(&project.full_description))),
        url: canonical_url(&origin, &format!("/projects/{}", project.slug)),
        image,
        genre: non_blank(project.category.as_deref()),
        creator: NodeRef::new(person_id(&origin)),
        same_as: filter_links(project.live_url.as_deref()),
    }))
}

pub fn build_web_page(
    profile: &BusinessProfile,
    path: &str,
    name: &str,
    description: Option<&str>,
) -> Entity {
    let origin = profile.origin();
    let canonical = canonical_url(&origin, path);
    Entity::WebPage(WebPage {
        id: format!("{canonical}#webpage"),
        url: canonical,
        name: name.trim().to_string(),
        description: non_blank(description),
        is_part_of: NodeRef::new(website_id(&origin)),
    })
}
