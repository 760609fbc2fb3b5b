//! Review question catalog. Built once at startup, read-only afterwards.

use repurview_common::{QuestionId, ReviewQuestion};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<ReviewQuestion>,
}

impl QuestionCatalog {
    /// Build a catalog. Later entries reusing an id are dropped.
    pub fn new(questions: impl IntoIterator<Item = ReviewQuestion>) -> Self {
        let mut kept: Vec<ReviewQuestion> = Vec::new();
        for question in questions {
            if kept.iter().any(|q| q.id == question.id) {
                warn!(question = %question.id, "Duplicate review question id ignored");
                continue;
            }
            kept.push(question);
        }
        Self { questions: kept }
    }

    /// The four standard contextual-review questions.
    pub fn standard() -> Self {
        Self::new([
            ReviewQuestion::new(
                "q1",
                "Have you observed similar therapeutic outcomes with this drug in clinical practice?",
            ),
            ReviewQuestion::new(
                "q2",
                "Is the proposed mechanism of action consistent with known pharmacology?",
            ),
            ReviewQuestion::new(
                "q3",
                "Are there known drug interactions that would limit feasibility?",
            ),
            ReviewQuestion::new(
                "q4",
                "Would you recommend this hypothesis for further preclinical investigation?",
            ),
        ])
    }

    /// Use `questions` if non-empty, else the standard set.
    pub fn from_config(questions: &[ReviewQuestion]) -> Self {
        if questions.is_empty() {
            Self::standard()
        } else {
            Self::new(questions.iter().cloned())
        }
    }

    pub fn list(&self) -> &[ReviewQuestion] {
        &self.questions
    }

    pub fn get(&self, id: &QuestionId) -> Option<&ReviewQuestion> {
        self.questions.iter().find(|q| &q.id == id)
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
