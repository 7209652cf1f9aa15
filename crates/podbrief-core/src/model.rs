//! Local-model collaborators: text embeddings and the pairwise topic judge.
//!
//! Both are served by an Ollama daemon. The client is constructed once at
//! process start and passed by reference wherever segmentation or chunking
//! needs it.

use async_trait::async_trait;

use crate::error::{PodbriefError, Result};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_JUDGE_MODEL: &str = "tinyllama";

/// `embed(text) -> vector` collaborator.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Binary same-topic classifier over a pair of text snippets.
#[async_trait]
pub trait TopicJudge: Send + Sync {
    async fn same_topic(&self, first: &str, second: &str) -> Result<bool>;
}

/// Cosine similarity between two embedding vectors. Zero-magnitude vectors
/// compare as dissimilar.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    embed_model: String,
    judge_model: String,
}

impl OllamaClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_OLLAMA_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            judge_model: DEFAULT_JUDGE_MODEL.to_string(),
        }
    }

    pub fn with_models(mut self, embed_model: &str, judge_model: &str) -> Self {
        self.embed_model = embed_model.to_string();
        self.judge_model = judge_model.to_string();
        self
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .http
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&serde_json::json!({
                "model": self.embed_model,
                "prompt": text,
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let embedding = response["embedding"].as_array().ok_or_else(|| {
            PodbriefError::EmbeddingFailed {
                reason: format!("Invalid embeddings response: {:?}", response),
            }
        })?;

        Ok(embedding
            .iter()
            .filter_map(|v| v.as_f64())
            .map(|v| v as f32)
            .collect())
    }
}

#[async_trait]
impl TopicJudge for OllamaClient {
    async fn same_topic(&self, first: &str, second: &str) -> Result<bool> {
        let prompt = format!(
            "Are the following two sentences about the same topic?\n\n\
             Sentence 1: \"{first}\"\n\
             Sentence 2: \"{second}\"\n\n\
             Answer with only \"Yes\" or \"No\"."
        );

        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&serde_json::json!({
                "model": self.judge_model,
                "prompt": prompt,
                "stream": false,
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let answer = response["response"].as_str().ok_or_else(|| {
            PodbriefError::SegmentationFailed {
                reason: format!("Invalid generate response: {:?}", response),
            }
        })?;

        Ok(answer.trim().to_lowercase().contains("yes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = [1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_of_opposite_vectors_is_negative_one() {
        let sim = cosine_similarity(&[1.0, 1.0], &[-1.0, -1.0]);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_compares_dissimilar() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
