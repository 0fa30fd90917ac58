//! Relevance ranking of the paragraph corpus.

use crate::error::{Error, Result};
use crate::model::{JobToBeDone, Paragraph, Persona};

use super::embedder::{cosine_similarity, Embedder};

/// A paragraph with its relevance score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredParagraph<'a> {
    /// The scored paragraph, borrowed from the corpus
    pub paragraph: &'a Paragraph,
    /// Cosine similarity to the query, in [-1, 1]
    pub score: f32,
}

/// Build the query text for a persona and job.
///
/// Missing fields become empty strings; the template is kept intact even
/// when that leaves doubled spaces.
pub fn build_query(persona: &Persona, job: &JobToBeDone) -> String {
    format!(
        "As a {} with expertise in {}, I need to {}",
        persona.role(),
        persona.expertise(),
        job.task()
    )
}

/// Ranks paragraphs by similarity to a persona-and-job query.
pub struct RelevanceRanker<E> {
    embedder: E,
}

impl<E: Embedder> RelevanceRanker<E> {
    /// Create a ranker over an embedder.
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }

    /// The underlying embedder.
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Score every paragraph and sort by score, highest first.
    ///
    /// The sort is stable: equal scores keep corpus order. An empty corpus
    /// yields an empty ranking without calling the embedder.
    pub fn rank<'a>(
        &mut self,
        paragraphs: &'a [Paragraph],
        persona: &Persona,
        job: &JobToBeDone,
    ) -> Result<Vec<ScoredParagraph<'a>>> {
        if paragraphs.is_empty() {
            log::warn!("No paragraphs to rank");
            return Ok(Vec::new());
        }

        let query = build_query(persona, job);
        log::debug!("Ranking query: {:?}", query);

        let query_vector = self.embedder.embed(&query)?;
        let texts: Vec<&str> = paragraphs.iter().map(|p| p.text.as_str()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;

        if vectors.len() != paragraphs.len() {
            return Err(Error::Embedding(format!(
                "embedder returned {} vectors for {} paragraphs",
                vectors.len(),
                paragraphs.len()
            )));
        }

        let mut scored: Vec<ScoredParagraph<'a>> = paragraphs
            .iter()
            .zip(&vectors)
            .map(|(paragraph, vector)| ScoredParagraph {
                paragraph,
                score: cosine_similarity(&query_vector, vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        log::info!(
            "Ranked {} paragraphs with the {} embedder",
            scored.len(),
            self.embedder.name()
        );
        Ok(scored)
    }
}
