//! Scraped catalog-course records.

use serde::{Deserialize, Serialize};

const MULTIDISCIPLINARY_KEYWORDS: &[&str] = &[
    "joint",
    "cross",
    "interdisciplinary",
    "multidisciplinary",
    "collaborative",
    "combined",
    "integrated",
    "hybrid",
    "cross-listed",
];

/// One course scraped from an external catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCourse {
    /// Catalog-native identifier, e.g. `18.01`.
    pub course_id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub department: Option<String>,
    /// Free-text level, e.g. `Undergraduate`.
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Course ids, when the catalog states them explicitly.
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub corequisites: Vec<String>,
    #[serde(default)]
    pub multidisciplinary: bool,
}

impl CatalogCourse {
    pub fn new(course_id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            title: title.into(),
            url: url.into(),
            department: None,
            level: None,
            description: None,
            prerequisites: Vec::new(),
            corequisites: Vec::new(),
            multidisciplinary: false,
        }
    }
}

/// Joint-notation ids (J/SC/W suffixes) or interdisciplinarity keywords in the
/// title/description mark a course as multidisciplinary.
pub fn is_multidisciplinary(course: &CatalogCourse) -> bool {
    let id = course.course_id.trim();
    if id.ends_with('J') || id.ends_with("SC") || id.ends_with('W') {
        return true;
    }

    let title = course.title.to_lowercase();
    let description = course
        .description
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    MULTIDISCIPLINARY_KEYWORDS
        .iter()
        .any(|kw| title.contains(kw) || description.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_notation_ids_are_flagged() {
        assert!(is_multidisciplinary(&CatalogCourse::new("6.4212J", "Robotics", "u")));
        assert!(is_multidisciplinary(&CatalogCourse::new("20.051SC", "Bio", "u")));
        assert!(!is_multidisciplinary(&CatalogCourse::new("18.01", "Calculus", "u")));
    }

    #[test]
    fn keyword_in_title_or_description_is_flagged() {
        let mut c = CatalogCourse::new("18.02", "Interdisciplinary Methods", "u");
        assert!(is_multidisciplinary(&c));
        c.title = "Plain Title".to_string();
        c.description = Some("A cross-listed seminar.".to_string());
        assert!(is_multidisciplinary(&c));
    }
}
