//! Prerequisite suggestion for scraped courses.
//!
//! Explicit catalog prerequisites are always trusted first. When a course has
//! none, an optional language-model endpoint can be consulted, and a
//! trailing-number rule covers sequenced titles ("Algebra 2" implies
//! "Algebra 1") as the final fallback.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::catalog::CatalogCourse;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// Stated by the catalog itself.
    Explicit,
    /// Proposed by a language model.
    Model,
    /// Derived from the sequenced-title rule.
    Rule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrereqSuggestion {
    pub course_id: String,
    pub prerequisite: String,
    pub source: SuggestionSource,
}

/// Anything that can propose prerequisite titles for a course.
pub trait PrereqModel {
    fn prerequisites(
        &self,
        course: &CatalogCourse,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiCompatibleModel {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatibleModel {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn prompt(course: &CatalogCourse) -> String {
        let description = course.description.as_deref().unwrap_or("(no description)");
        format!(
            "List the prerequisite course titles for the course below as a JSON \
             array of strings. Reply with only the array.\n\n\
             Title: {}\nDescription: {}",
            course.title, description
        )
    }
}

impl PrereqModel for OpenAiCompatibleModel {
    async fn prerequisites(&self, course: &CatalogCourse) -> Result<Vec<String>> {
        if self.api_key.is_empty() {
            return Err(Error::ModelUnconfigured);
        }
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": Self::prompt(course)}
            ],
            "temperature": 0.0,
        });
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let reply: serde_json::Value = response.json().await?;
        let content = reply["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(Error::EmptyReply)?;
        Ok(parse_model_reply(content))
    }
}

/// Extracts prerequisite titles from a model reply. Prefers the first JSON
/// array in the text; otherwise falls back to one title per non-empty line.
pub fn parse_model_reply(reply: &str) -> Vec<String> {
    let array = Regex::new(r"\[[^\]]*\]").expect("static regex");
    if let Some(m) = array.find(reply) {
        if let Ok(titles) = serde_json::from_str::<Vec<String>>(m.as_str()) {
            return titles
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
    }
    reply
        .lines()
        .map(|l| l.trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '*').to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Sequenced-title rule: a title ending in a number above one implies the same
/// title with that number decremented.
pub fn rule_prereqs(title: &str) -> Vec<String> {
    let trailing = Regex::new(r"^(.*?)(\d+)\s*$").expect("static regex");
    let Some(caps) = trailing.captures(title.trim()) else {
        return Vec::new();
    };
    let stem = &caps[1];
    let Ok(n) = caps[2].parse::<u32>() else {
        return Vec::new();
    };
    if n <= 1 {
        return Vec::new();
    }
    vec![format!("{stem}{}", n - 1)]
}

/// Suggests prerequisites for one course: explicit catalog data first, then
/// the model (when given), then the sequenced-title rule. Model failures are
/// logged and fall through to the rule.
pub async fn suggest_prereqs<M: PrereqModel>(
    course: &CatalogCourse,
    model: Option<&M>,
) -> Vec<PrereqSuggestion> {
    if !course.prerequisites.is_empty() {
        return course
            .prerequisites
            .iter()
            .map(|p| PrereqSuggestion {
                course_id: course.course_id.clone(),
                prerequisite: p.clone(),
                source: SuggestionSource::Explicit,
            })
            .collect();
    }

    if let Some(model) = model {
        match model.prerequisites(course).await {
            Ok(titles) if !titles.is_empty() => {
                debug!(course = %course.course_id, n = titles.len(), "model suggestions");
                return titles
                    .into_iter()
                    .map(|prerequisite| PrereqSuggestion {
                        course_id: course.course_id.clone(),
                        prerequisite,
                        source: SuggestionSource::Model,
                    })
                    .collect();
            }
            Ok(_) => {}
            Err(err) => {
                warn!(course = %course.course_id, %err, "model lookup failed");
            }
        }
    }

    rule_prereqs(&course.title)
        .into_iter()
        .map(|prerequisite| PrereqSuggestion {
            course_id: course.course_id.clone(),
            prerequisite,
            source: SuggestionSource::Rule,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingModel;

    impl PrereqModel for FailingModel {
        async fn prerequisites(&self, _course: &CatalogCourse) -> Result<Vec<String>> {
            Err(Error::ModelUnconfigured)
        }
    }

    struct FixedModel(Vec<String>);

    impl PrereqModel for FixedModel {
        async fn prerequisites(&self, _course: &CatalogCourse) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn json_array_reply_is_parsed() {
        let titles = parse_model_reply("Sure: [\"Algebra 1\", \"Geometry\"] done");
        assert_eq!(titles, vec!["Algebra 1", "Geometry"]);
    }

    #[test]
    fn freeform_reply_falls_back_to_lines() {
        let titles = parse_model_reply("- Algebra 1\n- Geometry\n");
        assert_eq!(titles, vec!["Algebra 1", "Geometry"]);
    }

    #[test]
    fn sequenced_titles_imply_their_predecessor() {
        assert_eq!(rule_prereqs("Algebra 2"), vec!["Algebra 1"]);
        assert_eq!(rule_prereqs("Spanish 4"), vec!["Spanish 3"]);
        assert!(rule_prereqs("Algebra 1").is_empty());
        assert!(rule_prereqs("World History").is_empty());
    }

    #[tokio::test]
    async fn explicit_prerequisites_shadow_everything_else() {
        let mut course = CatalogCourse::new("m2", "Algebra 2", "u");
        course.prerequisites.push("Pre-Algebra".to_string());
        let suggestions = suggest_prereqs(&course, Some(&FixedModel(vec!["Wrong".to_string()]))).await;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].prerequisite, "Pre-Algebra");
        assert_eq!(suggestions[0].source, SuggestionSource::Explicit);
    }

    #[tokio::test]
    async fn model_failure_falls_through_to_the_rule() {
        let course = CatalogCourse::new("m2", "Algebra 2", "u");
        let suggestions = suggest_prereqs(&course, Some(&FailingModel)).await;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].prerequisite, "Algebra 1");
        assert_eq!(suggestions[0].source, SuggestionSource::Rule);
    }

    #[tokio::test]
    async fn model_suggestions_are_used_when_present() {
        let course = CatalogCourse::new("x", "Topology", "u");
        let model = FixedModel(vec!["Real Analysis".to_string()]);
        let suggestions = suggest_prereqs(&course, Some(&model)).await;
        assert_eq!(suggestions[0].source, SuggestionSource::Model);
        assert_eq!(suggestions[0].prerequisite, "Real Analysis");
    }
}
