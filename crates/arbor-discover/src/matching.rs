//! Matching scraped catalog courses to existing credentials.
//!
//! A ladder of rules runs from strictest to loosest; the first rule that fires
//! wins and stamps the outcome with its confidence. Title paraphrases that
//! share fewer than two significant words fall through every rule, which is a
//! known blind spot of the word-overlap heuristic.

use arbor_core::{Credential, LevelBand};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::catalog::CatalogCourse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    ExactTitle,
    WordOverlap,
    CategoryLevel,
}

impl MatchRule {
    pub fn confidence(self) -> f64 {
        match self {
            MatchRule::ExactTitle => 1.0,
            MatchRule::WordOverlap => 0.6,
            MatchRule::CategoryLevel => 0.3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub credential_id: String,
    pub confidence: f64,
    pub rule: MatchRule,
}

/// One rung of the matching ladder.
pub trait MatchStrategy {
    fn matches(&self, course: &CatalogCourse, credentials: &[Credential]) -> Option<MatchOutcome>;
}

fn normalize(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Words longer than three characters, lowercased. Short connectives carry no
/// matching signal.
pub fn significant_words(title: &str) -> FxHashSet<String> {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 3)
        .map(str::to_string)
        .collect()
}

fn level_from_text(text: &str) -> Option<LevelBand> {
    let t = text.to_lowercase();
    if t.contains("graduate") && !t.contains("undergraduate") {
        Some(LevelBand::Graduate)
    } else if t.contains("undergraduate") {
        Some(LevelBand::Undergraduate)
    } else if t.contains("high") {
        Some(LevelBand::High)
    } else if t.contains("middle") {
        Some(LevelBand::Middle)
    } else {
        None
    }
}

pub struct ExactTitle;

impl MatchStrategy for ExactTitle {
    fn matches(&self, course: &CatalogCourse, credentials: &[Credential]) -> Option<MatchOutcome> {
        let title = normalize(&course.title);
        credentials
            .iter()
            .find(|c| normalize(&c.title) == title)
            .map(|c| MatchOutcome {
                credential_id: c.id.clone(),
                confidence: MatchRule::ExactTitle.confidence(),
                rule: MatchRule::ExactTitle,
            })
    }
}

pub struct WordOverlap;

impl MatchStrategy for WordOverlap {
    fn matches(&self, course: &CatalogCourse, credentials: &[Credential]) -> Option<MatchOutcome> {
        let words = significant_words(&course.title);
        if words.is_empty() {
            return None;
        }
        let mut best: Option<(usize, &Credential)> = None;
        for credential in credentials {
            let shared = significant_words(&credential.title)
                .intersection(&words)
                .count();
            if shared >= 2 && best.map(|(n, _)| shared > n).unwrap_or(true) {
                best = Some((shared, credential));
            }
        }
        best.map(|(_, c)| MatchOutcome {
            credential_id: c.id.clone(),
            confidence: MatchRule::WordOverlap.confidence(),
            rule: MatchRule::WordOverlap,
        })
    }
}

pub struct CategoryLevel;

impl MatchStrategy for CategoryLevel {
    fn matches(&self, course: &CatalogCourse, credentials: &[Credential]) -> Option<MatchOutcome> {
        let department = course.department.as_deref()?.to_lowercase();
        let level = level_from_text(course.level.as_deref()?)?;
        credentials
            .iter()
            .find(|c| c.level == level && department.contains(&c.category.to_lowercase()))
            .map(|c| MatchOutcome {
                credential_id: c.id.clone(),
                confidence: MatchRule::CategoryLevel.confidence(),
                rule: MatchRule::CategoryLevel,
            })
    }
}

/// The default ladder: exact title, then word overlap, then category+level.
pub struct LadderStrategy;

impl MatchStrategy for LadderStrategy {
    fn matches(&self, course: &CatalogCourse, credentials: &[Credential]) -> Option<MatchOutcome> {
        let rungs: [&dyn MatchStrategy; 3] = [&ExactTitle, &WordOverlap, &CategoryLevel];
        for rung in rungs {
            if let Some(outcome) = rung.matches(course, credentials) {
                debug!(
                    course = %course.course_id,
                    credential = %outcome.credential_id,
                    rule = ?outcome.rule,
                    "matched"
                );
                return Some(outcome);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::Cadence;

    fn credential(id: &str, title: &str, category: &str, level: LevelBand) -> Credential {
        Credential {
            id: id.to_string(),
            title: title.to_string(),
            cadence: Cadence::Seasonal,
            category: category.to_string(),
            level,
            duration_weeks: 10,
            parent_seasonal: None,
        }
    }

    fn course(id: &str, title: &str) -> CatalogCourse {
        CatalogCourse::new(id, title, "https://example.test")
    }

    #[test]
    fn exact_title_wins_with_full_confidence() {
        let creds = vec![credential("m1", "Linear Algebra", "MATH", LevelBand::Undergraduate)];
        let outcome = LadderStrategy
            .matches(&course("18.06", "linear algebra"), &creds)
            .unwrap();
        assert_eq!(outcome.credential_id, "m1");
        assert_eq!(outcome.rule, MatchRule::ExactTitle);
        assert_eq!(outcome.confidence, 1.0);
    }

    #[test]
    fn shared_significant_words_match_at_medium_confidence() {
        let creds = vec![
            credential("m1", "Multivariable Calculus Fundamentals", "MATH", LevelBand::Undergraduate),
            credential("h1", "World History", "HISTORY", LevelBand::High),
        ];
        let outcome = LadderStrategy
            .matches(&course("18.02", "Calculus of Multivariable Functions"), &creds)
            .unwrap();
        assert_eq!(outcome.credential_id, "m1");
        assert_eq!(outcome.rule, MatchRule::WordOverlap);
    }

    #[test]
    fn category_and_level_is_the_last_resort() {
        let creds = vec![credential("m1", "Quantitative Reasoning", "MATH", LevelBand::Undergraduate)];
        let mut c = course("18.099", "Special Topics");
        c.department = Some("Mathematics".to_string());
        c.level = Some("Undergraduate".to_string());
        let outcome = LadderStrategy.matches(&c, &creds).unwrap();
        assert_eq!(outcome.rule, MatchRule::CategoryLevel);
        assert_eq!(outcome.confidence, 0.3);
    }

    #[test]
    fn paraphrased_titles_fall_through_the_ladder() {
        // One shared significant word is below the overlap threshold, and
        // without department/level data the last rung cannot fire.
        let creds = vec![credential(
            "m1",
            "Calculus: The Mathematics of Change",
            "MATH",
            LevelBand::High,
        )];
        assert!(LadderStrategy
            .matches(&course("18.01", "Intro to Calculus I"), &creds)
            .is_none());
    }
}
