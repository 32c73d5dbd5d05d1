//! Catalog scraping.
//!
//! Sources publish either a JSON course index or a plain HTML listing; the
//! body is sniffed by content type with an HTML fallback. A malformed entry is
//! skipped and counted, never fatal.

use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::{is_multidisciplinary, CatalogCourse};
use crate::Result;

/// Pause between consecutive source fetches.
const REQUEST_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    KhanAcademy,
    MitOcw,
}

impl CatalogSource {
    pub const ALL: [CatalogSource; 2] = [CatalogSource::KhanAcademy, CatalogSource::MitOcw];

    pub fn name(self) -> &'static str {
        match self {
            CatalogSource::KhanAcademy => "khan-academy",
            CatalogSource::MitOcw => "mit-ocw",
        }
    }

    pub fn index_url(self) -> &'static str {
        match self {
            CatalogSource::KhanAcademy => "https://www.khanacademy.org/api/v1/topictree",
            CatalogSource::MitOcw => "https://ocw.mit.edu/courses/",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// Per-fetch bookkeeping for CLI output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScrapeReport {
    pub fetched: usize,
    pub skipped: usize,
    pub multidisciplinary: usize,
}

#[derive(Debug, Deserialize)]
struct RawCourse {
    #[serde(alias = "id", alias = "courseNumber")]
    course_id: Option<String>,
    title: Option<String>,
    url: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    prerequisites: Vec<String>,
    #[serde(default)]
    corequisites: Vec<String>,
}

impl RawCourse {
    /// Missing id, title, or url disqualifies the entry.
    fn into_course(self) -> Option<CatalogCourse> {
        let mut course = CatalogCourse::new(self.course_id?, self.title?, self.url?);
        course.department = self.department;
        course.level = self.level;
        course.description = self.description;
        course.prerequisites = self.prerequisites;
        course.corequisites = self.corequisites;
        Some(course)
    }
}

/// Parses a JSON course index. Entries missing required fields are skipped.
pub fn parse_json_catalog(body: &str, report: &mut ScrapeReport) -> Result<Vec<CatalogCourse>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(body)?;
    let mut courses = Vec::with_capacity(raw.len());
    for value in raw {
        let parsed = serde_json::from_value::<RawCourse>(value.clone())
            .ok()
            .and_then(RawCourse::into_course);
        match parsed {
            Some(course) => courses.push(course),
            None => {
                warn!(%value, "skipping malformed catalog entry");
                report.skipped += 1;
            }
        }
    }
    Ok(courses)
}

/// Scheme plus host, with any path stripped. Anchors are absolute paths, so
/// joining against anything longer than the origin would double segments.
fn origin_of(url: &str) -> &str {
    let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[after_scheme..].find('/') {
        Some(i) => &url[..after_scheme + i],
        None => url,
    }
}

/// Fallback for HTML listings: one course per `/courses/<id>/` anchor, the
/// anchor text as the title. `base_url` may carry a path (index URLs usually
/// do); only its origin is used when joining.
pub fn parse_html_catalog(body: &str, base_url: &str) -> Vec<CatalogCourse> {
    let anchor = Regex::new(r#"<a[^>]+href="(/courses/([^/"]+)/?)"[^>]*>([^<]+)</a>"#)
        .expect("static regex");
    let origin = origin_of(base_url);
    let mut courses = Vec::new();
    for caps in anchor.captures_iter(body) {
        let path = &caps[1];
        let id = &caps[2];
        let title = caps[3].trim();
        if title.is_empty() {
            continue;
        }
        let url = format!("{origin}{path}");
        courses.push(CatalogCourse::new(id, title, url));
    }
    courses
}

pub struct Scraper {
    client: reqwest::Client,
}

impl Scraper {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetches one source's catalog and flags multidisciplinary courses.
    pub async fn fetch_catalog(
        &self,
        source: CatalogSource,
    ) -> Result<(Vec<CatalogCourse>, ScrapeReport)> {
        let mut report = ScrapeReport::default();
        let response = self
            .client
            .get(source.index_url())
            .send()
            .await?
            .error_for_status()?;
        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("json"))
            .unwrap_or(false);
        let body = response.text().await?;

        let mut courses = if is_json || body.trim_start().starts_with('[') {
            parse_json_catalog(&body, &mut report)?
        } else {
            parse_html_catalog(&body, source.index_url())
        };
        for course in &mut courses {
            course.multidisciplinary = is_multidisciplinary(course);
            if course.multidisciplinary {
                report.multidisciplinary += 1;
            }
        }
        report.fetched = courses.len();
        info!(
            source = source.name(),
            fetched = report.fetched,
            skipped = report.skipped,
            multidisciplinary = report.multidisciplinary,
            "catalog fetched"
        );
        Ok((courses, report))
    }

    /// Fetches several sources back to back with a polite delay in between.
    pub async fn fetch_many(
        &self,
        sources: &[CatalogSource],
    ) -> Vec<(CatalogSource, Result<(Vec<CatalogCourse>, ScrapeReport)>)> {
        let mut results = Vec::with_capacity(sources.len());
        for (i, &source) in sources.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(REQUEST_DELAY).await;
            }
            results.push((source, self.fetch_catalog(source).await));
        }
        results
    }
}

impl Default for Scraper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_catalog_skips_entries_missing_required_fields() {
        let body = r#"[
            {"course_id": "18.01", "title": "Calculus I", "url": "https://x/18.01"},
            {"title": "No Id", "url": "https://x/none"},
            {"courseNumber": "6.0001", "title": "Intro CS", "url": "https://x/6.0001",
             "prerequisites": ["None"]}
        ]"#;
        let mut report = ScrapeReport::default();
        let courses = parse_json_catalog(body, &mut report).unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(courses[1].course_id, "6.0001");
        assert_eq!(courses[1].prerequisites, vec!["None"]);
    }

    #[test]
    fn html_catalog_extracts_course_anchors() {
        let body = r#"
            <ul>
              <li><a href="/courses/18-01-calculus/" class="c">Calculus I</a></li>
              <li><a href="/about/">About</a></li>
              <li><a href="/courses/8-01-physics/">Physics I</a></li>
            </ul>"#;
        let courses = parse_html_catalog(body, "https://ocw.mit.edu");
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].course_id, "18-01-calculus");
        assert_eq!(courses[0].title, "Calculus I");
        assert_eq!(courses[0].url, "https://ocw.mit.edu/courses/18-01-calculus/");
    }

    #[test]
    fn index_url_path_is_not_doubled_into_course_urls() {
        // The MIT OCW index URL already ends in /courses/; joining must not
        // produce /courses/courses/.
        let body = r#"<a href="/courses/18-01-calculus/">Calculus I</a>"#;
        let courses = parse_html_catalog(body, CatalogSource::MitOcw.index_url());
        assert_eq!(courses[0].url, "https://ocw.mit.edu/courses/18-01-calculus/");
    }

    #[test]
    fn source_names_round_trip() {
        for source in CatalogSource::ALL {
            assert_eq!(CatalogSource::from_name(source.name()), Some(source));
        }
        assert!(CatalogSource::from_name("unknown").is_none());
    }
}
