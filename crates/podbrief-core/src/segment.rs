//! Topic segmentation: reduce a fine-grained segment sequence to coherent
//! topic spans before summarization.
//!
//! Two interchangeable strategies share one contract so the caller can pick
//! either by configuration: a pairwise judge that asks a small model whether
//! each segment continues the previous one's topic, and a sliding-window
//! strategy that compares embeddings of adjacent windows.

use async_trait::async_trait;

use crate::{
    error::{PodbriefError, Result},
    format::clean_segment_text,
    model::{Embedder, TopicJudge, cosine_similarity},
    types::{Segment, TopicSpan},
};

pub const DEFAULT_WINDOW_SIZE: usize = 3;
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.7;

#[async_trait]
pub trait SegmentStrategy: Send + Sync {
    /// Partition the segment sequence into contiguous, non-overlapping,
    /// order-preserving topic spans covering the full transcript range.
    async fn segment(&self, segments: &[Segment]) -> Result<Vec<TopicSpan>>;
}

fn empty_input() -> PodbriefError {
    PodbriefError::SegmentationFailed {
        reason: "segment list is empty".to_string(),
    }
}

/// Walks the sequence once, asking the judge whether each segment continues
/// the topic of the immediately preceding segment. The comparison is always
/// against that single previous segment, never the accumulated cluster.
pub struct PairwiseStrategy<'a> {
    judge: &'a dyn TopicJudge,
}

impl<'a> PairwiseStrategy<'a> {
    pub fn new(judge: &'a dyn TopicJudge) -> Self {
        Self { judge }
    }
}

#[async_trait]
impl SegmentStrategy for PairwiseStrategy<'_> {
    async fn segment(&self, segments: &[Segment]) -> Result<Vec<TopicSpan>> {
        let first = segments.first().ok_or_else(empty_input)?;

        let mut spans = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut prev_text = clean_segment_text(&first.text);
        let mut cur_start = first.start;
        let mut cur_end = first.end;

        for seg in segments {
            let text = clean_segment_text(&seg.text);

            if self.judge.same_topic(&prev_text, &text).await? {
                current.push(text.clone());
            } else {
                spans.push(TopicSpan {
                    start: cur_start,
                    end: cur_end,
                    text: current.join(" "),
                });
                cur_start = seg.start;
                current = vec![text.clone()];
            }

            prev_text = text;
            cur_end = seg.end;
        }

        spans.push(TopicSpan {
            start: cur_start,
            end: cur_end,
            text: current.join(" "),
        });
        Ok(spans)
    }
}

/// Slides a boundary index through the sequence, embedding the windows on
/// each side of it and splitting where their cosine similarity drops below
/// the threshold. Each window's embedding is the embedding of its
/// concatenated text, not a mean of per-segment vectors.
pub struct WindowStrategy<'a> {
    embedder: &'a dyn Embedder,
    window_size: usize,
    threshold: f32,
}

impl<'a> WindowStrategy<'a> {
    pub fn new(embedder: &'a dyn Embedder) -> Self {
        Self::with_params(embedder, DEFAULT_WINDOW_SIZE, DEFAULT_SIMILARITY_THRESHOLD)
    }

    pub fn with_params(embedder: &'a dyn Embedder, window_size: usize, threshold: f32) -> Self {
        Self {
            embedder,
            window_size,
            threshold,
        }
    }

    fn window_text(&self, segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|seg| clean_segment_text(&seg.text))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl SegmentStrategy for WindowStrategy<'_> {
    async fn segment(&self, segments: &[Segment]) -> Result<Vec<TopicSpan>> {
        let first = segments.first().ok_or_else(empty_input)?;
        let last = segments.last().ok_or_else(empty_input)?;

        // Too short to window: the whole transcript is one span.
        if segments.len() < self.window_size * 2 {
            return Ok(vec![TopicSpan {
                start: first.start,
                end: last.end,
                text: self.window_text(segments),
            }]);
        }

        let mut spans = Vec::new();
        let mut current: Vec<&Segment> = vec![first];
        let mut cur_start = first.start;
        let mut cur_end = first.end;

        for i in 1..segments.len() - self.window_size {
            let prev_window = self.window_text(&segments[i.saturating_sub(self.window_size)..i]);
            let next_window = self.window_text(&segments[i..i + self.window_size]);

            let prev_embedding = self.embedder.embed(&prev_window).await?;
            let next_embedding = self.embedder.embed(&next_window).await?;

            if cosine_similarity(&prev_embedding, &next_embedding) < self.threshold {
                spans.push(TopicSpan {
                    start: cur_start,
                    end: cur_end,
                    text: current
                        .iter()
                        .map(|seg| clean_segment_text(&seg.text))
                        .collect::<Vec<_>>()
                        .join(" "),
                });
                cur_start = segments[i].start;
                current = Vec::new();
            }

            current.push(&segments[i]);
            cur_end = segments[i].end;
        }

        // The boundary region is never evaluated for further splits; it
        // joins the last open cluster as-is.
        current.extend(&segments[segments.len() - self.window_size..]);
        spans.push(TopicSpan {
            start: cur_start,
            end: last.end,
            text: current
                .iter()
                .map(|seg| clean_segment_text(&seg.text))
                .collect::<Vec<_>>()
                .join(" "),
        });
        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, text: &str) -> Segment {
        Segment {
            start,
            end,
            text: text.to_string(),
        }
    }

    /// Judge that groups segments by their first word.
    struct PrefixJudge;

    #[async_trait]
    impl TopicJudge for PrefixJudge {
        async fn same_topic(&self, first: &str, second: &str) -> Result<bool> {
            Ok(first.split_whitespace().next() == second.split_whitespace().next())
        }
    }

    /// Embedder mapping topic-A text to one axis and topic-B text to an
    /// orthogonal one, so mixed windows land in between.
    struct AxisEmbedder;

    #[async_trait]
    impl Embedder for AxisEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let a = text.matches("apple").count() as f32;
            let b = text.matches("boat").count() as f32;
            Ok(vec![a, b])
        }
    }

    fn assert_partition(spans: &[TopicSpan], segments: &[Segment]) {
        assert_eq!(spans[0].start, segments[0].start);
        assert_eq!(spans[spans.len() - 1].end, segments[segments.len() - 1].end);

        let joined: Vec<&str> = spans
            .iter()
            .flat_map(|span| span.text.split_whitespace())
            .collect();
        let original: Vec<&str> = segments
            .iter()
            .flat_map(|seg| seg.text.split_whitespace())
            .collect();
        assert_eq!(joined, original);
    }

    #[tokio::test]
    async fn pairwise_splits_on_topic_change() {
        let segments = vec![
            seg(0.0, 1.0, "apple one"),
            seg(1.0, 2.0, "apple two"),
            seg(2.0, 3.0, "boat one"),
            seg(3.0, 4.0, "boat two"),
        ];
        let spans = PairwiseStrategy::new(&PrefixJudge)
            .segment(&segments)
            .await
            .unwrap();

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "apple one apple two");
        assert_eq!(spans[0].start, 0.0);
        assert_eq!(spans[0].end, 2.0);
        assert_eq!(spans[1].text, "boat one boat two");
        assert_eq!(spans[1].start, 2.0);
        assert_eq!(spans[1].end, 4.0);
        assert_partition(&spans, &segments);
    }

    #[tokio::test]
    async fn pairwise_single_topic_yields_one_span() {
        let segments = vec![
            seg(0.0, 1.5, "apple a"),
            seg(1.5, 3.0, "apple b"),
            seg(3.0, 4.0, "apple c"),
        ];
        let spans = PairwiseStrategy::new(&PrefixJudge)
            .segment(&segments)
            .await
            .unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 0.0);
        assert_eq!(spans[0].end, 4.0);
        assert_partition(&spans, &segments);
    }

    #[tokio::test]
    async fn pairwise_empty_input_fails() {
        let result = PairwiseStrategy::new(&PrefixJudge).segment(&[]).await;
        assert!(matches!(
            result,
            Err(PodbriefError::SegmentationFailed { .. })
        ));
    }

    #[tokio::test]
    async fn window_short_input_is_one_span() {
        // Five segments with window size three: below the 2x window minimum.
        let segments = vec![
            seg(0.0, 1.0, "apple a"),
            seg(1.0, 2.0, "boat b"),
            seg(2.0, 3.0, "apple c"),
            seg(3.0, 4.0, "boat d"),
            seg(4.0, 5.0, "apple e"),
        ];
        let spans = WindowStrategy::new(&AxisEmbedder)
            .segment(&segments)
            .await
            .unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 0.0);
        assert_eq!(spans[0].end, 5.0);
        assert_eq!(
            spans[0].text,
            "apple a boat b apple c boat d apple e"
        );
    }

    #[tokio::test]
    async fn window_splits_where_similarity_drops() {
        let segments = vec![
            seg(0.0, 1.0, "apple"),
            seg(1.0, 2.0, "apple"),
            seg(2.0, 3.0, "apple"),
            seg(3.0, 4.0, "apple"),
            seg(4.0, 5.0, "boat"),
            seg(5.0, 6.0, "boat"),
            seg(6.0, 7.0, "boat"),
            seg(7.0, 8.0, "boat"),
        ];
        // Window of one makes the boundary exact: adjacent same-topic
        // windows embed identically, the apple/boat transition embeds
        // orthogonally.
        let strategy = WindowStrategy::with_params(&AxisEmbedder, 1, 0.5);
        let spans = strategy.segment(&segments).await.unwrap();

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "apple apple apple apple");
        assert_eq!(spans[0].start, 0.0);
        assert_eq!(spans[0].end, 4.0);
        assert_eq!(spans[1].text, "boat boat boat boat");
        assert_eq!(spans[1].start, 4.0);
        assert_eq!(spans[1].end, 8.0);
        assert_partition(&spans, &segments);
    }

    #[tokio::test]
    async fn window_uniform_input_is_one_span() {
        let segments: Vec<Segment> = (0..8)
            .map(|i| seg(i as f64, (i + 1) as f64, "apple"))
            .collect();
        let spans = WindowStrategy::with_params(&AxisEmbedder, 2, 0.7)
            .segment(&segments)
            .await
            .unwrap();

        assert_eq!(spans.len(), 1);
        assert_partition(&spans, &segments);
    }

    #[tokio::test]
    async fn window_empty_input_fails() {
        let result = WindowStrategy::new(&AxisEmbedder).segment(&[]).await;
        assert!(matches!(
            result,
            Err(PodbriefError::SegmentationFailed { .. })
        ));
    }
}
