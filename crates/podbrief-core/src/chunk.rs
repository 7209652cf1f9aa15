//! Semantic chunking for transcripts too long to summarize in one request.
//!
//! The rendered transcript is split at points of maximal embedding-distance
//! change rather than at fixed lengths: each line is smoothed together with
//! its neighbors, the smoothed groups are embedded, and a split is proposed
//! wherever the distance between consecutive groups exceeds a percentile of
//! the whole document's distance distribution.

use crate::{
    error::Result,
    model::{Embedder, cosine_similarity},
};

pub const DEFAULT_BREAKPOINT_PERCENTILE: f64 = 95.0;
pub const DEFAULT_BUFFER_SIZE: usize = 3;

pub struct SemanticChunker<'a> {
    embedder: &'a dyn Embedder,
    breakpoint_percentile: f64,
    buffer_size: usize,
}

impl<'a> SemanticChunker<'a> {
    pub fn new(embedder: &'a dyn Embedder) -> Self {
        Self::with_params(embedder, DEFAULT_BREAKPOINT_PERCENTILE, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_params(
        embedder: &'a dyn Embedder,
        breakpoint_percentile: f64,
        buffer_size: usize,
    ) -> Self {
        Self {
            embedder,
            breakpoint_percentile,
            buffer_size,
        }
    }

    /// Split a rendered transcript into chunks along semantic breakpoints.
    /// Texts too short to window come back as a single chunk without
    /// touching the embedder.
    pub async fn split(&self, text: &str) -> Result<Vec<String>> {
        let sentences: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();

        if sentences.len() < self.buffer_size * 2 {
            return Ok(vec![text.to_string()]);
        }

        // Smooth the signal: each sentence is embedded together with its
        // neighbors inside the buffer window.
        let mut embeddings = Vec::with_capacity(sentences.len());
        for i in 0..sentences.len() {
            let lo = i.saturating_sub(self.buffer_size);
            let hi = (i + self.buffer_size + 1).min(sentences.len());
            let buffered = sentences[lo..hi].join(" ");
            embeddings.push(self.embedder.embed(&buffered).await?);
        }

        let distances: Vec<f64> = embeddings
            .windows(2)
            .map(|pair| 1.0 - cosine_similarity(&pair[0], &pair[1]) as f64)
            .collect();
        let threshold = percentile(&distances, self.breakpoint_percentile);

        let mut chunks = Vec::new();
        let mut chunk_start = 0;
        for (i, distance) in distances.iter().enumerate() {
            if *distance > threshold {
                chunks.push(sentences[chunk_start..=i].join("\n"));
                chunk_start = i + 1;
            }
        }
        chunks.push(sentences[chunk_start..].join("\n"));

        Ok(chunks)
    }
}

/// Percentile over a sample, linear interpolation between closest ranks.
fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (pct / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
    }
}
