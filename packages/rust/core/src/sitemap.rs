//! Crawler-facing site files: sitemap entries, the XML sitemap and robots.txt.

use std::collections::HashSet;

use chrono::{DateTime, NaiveTime, Utc};
use html_escape::encode_text;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use sitegraph_shared::{BusinessProfile, ChangeFrequency, SitemapConfig};

use crate::links::{canonical_url, is_url_safe_slug};

/// One URL of the sitemap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub path: String,
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Build the sitemap: site root, static pages and tools, offerings, then
/// projects. Records with an invalid slug are left out, as is every repeat of
/// a path already listed. `generated_at` is
/// the modification time of every entry without its own date.
#[instrument(skip_all, fields(generated_at = %generated_at))]
pub fn sitemap_entries(
    profile: &BusinessProfile,
    generated_at: DateTime<Utc>,
    config: &SitemapConfig,
) -> Vec<SitemapEntry> {
    let origin = profile.origin();
    let entry = |path: String, priority: f32, change_frequency: ChangeFrequency| SitemapEntry {
        url: canonical_url(&origin, &path),
        path,
        last_modified: generated_at,
        change_frequency,
        priority,
    };

    let mut entries = vec![entry(
        "/".into(),
        config.home_priority,
        config.home_change_frequency,
    )];

    for path in ["/about", "/process", "/systems"] {
        entries.push(entry(
            path.into(),
            config.page_priority,
            config.page_change_frequency,
        ));
    }

    for offering in &profile.offerings {
        if !is_url_safe_slug(&offering.slug) {
            warn!(slug = %offering.slug, "leaving offering with invalid slug out of the sitemap");
            continue;
        }
        entries.push(entry(
            format!("/systems/{}", offering.slug),
            config.offering_priority,
            config.page_change_frequency,
        ));
    }

    for tool in &profile.tools {
        if !is_url_safe_slug(&tool.slug) {
            warn!(slug = %tool.slug, "leaving tool with invalid slug out of the sitemap");
            continue;
        }
        entries.push(entry(
            format!("/{}", tool.slug),
            config.page_priority,
            config.page_change_frequency,
        ));
    }

    for project in &profile.projects {
        if !is_url_safe_slug(&project.slug) {
            warn!(slug = %project.slug, "leaving project with invalid slug out of the sitemap");
            continue;
        }
        let priority = if project.featured {
            config.featured_project_priority
        } else {
            config.project_priority
        };
        let mut project_entry = entry(
            format!("/projects/{}", project.slug),
            priority,
            config.page_change_frequency,
        );
        if let Some(date) = project.updated_at {
            project_entry.last_modified = date.and_time(NaiveTime::MIN).and_utc();
        }
        entries.push(project_entry);
    }

    let mut seen = HashSet::new();
    entries.retain(|entry| {
        let first = seen.insert(entry.path.clone());
        if !first {
            warn!(path = %entry.path, "leaving duplicate path out of the sitemap");
        }
        first
    });

    debug!(count = entries.len(), "built sitemap entries");
    entries
}

/// Render entries as a `sitemap.xml` document.
pub fn sitemap_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    \
             <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            encode_text(&entry.url),
            entry.last_modified.format("%Y-%m-%dT%H:%M:%SZ"),
            entry.change_frequency.as_str(),
            entry.priority,
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

/// `robots.txt`: everything crawlable except API routes and build assets.
pub fn robots_txt(profile: &BusinessProfile) -> String {
    let origin = profile.origin();
    format!(
        "User-agent: *\n\
         Allow: /\n\
         Allow: /_next/image\n\
         Disallow: /api/\n\
         Disallow: /_next/static/\n\
         Disallow: /_next/data/\n\
         \n\
         Sitemap: {origin}/sitemap.xml\n\
         Host: {origin}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn generated_at() -> DateTime<Utc> {
        "2026-01-15T08:30:00Z".parse().unwrap()
    }

    #[test]
    fn root_comes_first_with_top_priority() {
        let profile = fixtures::profile();
        let entries = sitemap_entries(&profile, generated_at(), &SitemapConfig::default());
        let root = &entries[0];
        assert_eq!(root.url, "https://beelodev.com/");
        assert_eq!(root.priority, 1.0);
        assert_eq!(root.change_frequency, ChangeFrequency::Weekly);
        assert_eq!(root.last_modified, generated_at());
    }

    #[test]
    fn every_section_is_listed_in_order() {
        let profile = fixtures::profile();
        let entries = sitemap_entries(&profile, generated_at(), &SitemapConfig::default());
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();

        assert_eq!(paths.len(), 1 + 3 + 3 + 3 + 5);
        assert_eq!(paths[1..4], ["/about", "/process", "/systems"]);
        assert_eq!(paths[4], "/systems/ai-support-agent");
        assert_eq!(paths[7], "/support-cost-calculator");
        assert_eq!(paths[10], "/projects/foreclosure-data-hub");
    }

    #[test]
    fn project_priority_follows_featured_flag() {
        let profile = fixtures::profile();
        let entries = sitemap_entries(&profile, generated_at(), &SitemapConfig::default());
        let find = |path: &str| entries.iter().find(|e| e.path == path).unwrap();

        let featured = find("/projects/foreclosure-data-hub");
        assert_eq!(featured.priority, 0.9);
        assert_eq!(featured.change_frequency, ChangeFrequency::Monthly);
        assert_eq!(
            featured.last_modified,
            "2025-11-02T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );

        let regular = find("/projects/employee-reports-evaluation-bot");
        assert_eq!(regular.priority, 0.7);
        assert_eq!(regular.last_modified, generated_at());
    }

    #[test]
    fn invalid_project_slugs_are_excluded() {
        let mut profile = fixtures::profile();
        profile.projects[1].slug = "Not Valid".into();
        let entries = sitemap_entries(&profile, generated_at(), &SitemapConfig::default());
        assert!(entries.iter().all(|e| !e.url.contains("Not Valid")));
        assert_eq!(entries.iter().filter(|e| e.path.starts_with("/projects/")).count(), 4);
    }

    #[test]
    fn duplicate_paths_are_listed_once() {
        let mut profile = fixtures::profile();
        let repeat = profile.projects[0].clone();
        profile.projects.push(repeat);
        profile.tools[0].slug = "about".into();

        let entries = sitemap_entries(&profile, generated_at(), &SitemapConfig::default());
        let count = |path: &str| entries.iter().filter(|e| e.path == path).count();
        assert_eq!(count("/projects/foreclosure-data-hub"), 1);
        assert_eq!(count("/about"), 1);
        assert_eq!(entries.len(), 14);
    }

    #[test]
    fn configured_priorities_apply() {
        let profile = fixtures::profile();
        let config = SitemapConfig {
            offering_priority: 0.5,
            ..SitemapConfig::default()
        };
        let entries = sitemap_entries(&profile, generated_at(), &config);
        assert!(
            entries
                .iter()
                .filter(|e| e.path.starts_with("/systems/"))
                .all(|e| e.priority == 0.5)
        );
    }

    #[test]
    fn xml_document_shape() {
        let profile = fixtures::profile();
        let entries = sitemap_entries(&profile, generated_at(), &SitemapConfig::default());
        let xml = sitemap_xml(&entries);
        assert!(xml.starts_with("<?xml"));
        assert_eq!(xml.matches("<url>").count(), entries.len());
        assert!(xml.contains(
            "  <url>\n    <loc>https://beelodev.com/</loc>\n    \
             <lastmod>2026-01-15T08:30:00Z</lastmod>\n    \
             <changefreq>weekly</changefreq>\n    <priority>1.0</priority>\n  </url>\n"
        ));
        assert!(xml.contains("<lastmod>2025-11-02T00:00:00Z</lastmod>"));
        assert!(xml.contains("<priority>0.9</priority>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn robots_rules() {
        let profile = fixtures::profile();
        let robots = robots_txt(&profile);
        let lines: Vec<&str> = robots.lines().collect();
        assert_eq!(lines[0], "User-agent: *");
        assert!(lines.contains(&"Allow: /_next/image"));
        assert!(lines.contains(&"Disallow: /api/"));
        assert!(lines.contains(&"Sitemap: https://beelodev.com/sitemap.xml"));
        assert!(lines.contains(&"Host: https://beelodev.com"));
    }
}
