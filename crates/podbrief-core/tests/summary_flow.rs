//! End-to-end flow over the in-process stages: segment a transcript into
//! topic spans, render them, chunk, summarize against a scripted backend,
//! and parse the response back into typed sections.

use std::sync::Mutex;

use async_trait::async_trait;

use podbrief_core::{
    Completion, Embedder, PairwiseStrategy, Result, Segment, SegmentStrategy, SemanticChunker,
    TimestampStyle, TopicJudge, generate_summary, parse_summary, render_spans,
};

/// Groups segments by their first word.
struct PrefixJudge;

#[async_trait]
impl TopicJudge for PrefixJudge {
    async fn same_topic(&self, first: &str, second: &str) -> Result<bool> {
        Ok(first.split_whitespace().next() == second.split_whitespace().next())
    }
}

struct TopicCountEmbedder;

#[async_trait]
impl Embedder for TopicCountEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let a = text.matches("cooking").count() as f32;
        let b = text.matches("travel").count() as f32;
        Ok(vec![a, b])
    }
}

/// Returns a fixed well-formed summary and records how often it was asked.
struct ScriptedBackend {
    calls: Mutex<usize>,
    response: &'static str,
}

#[async_trait]
impl Completion for ScriptedBackend {
    async fn complete(&self, _system: &str, _user: &str, _temperature: f32) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.response.to_string())
    }
}

fn transcript() -> Vec<Segment> {
    vec![
        Segment {
            start: 0.0,
            end: 8.0,
            text: "cooking tips for pasta".to_string(),
        },
        Segment {
            start: 8.0,
            end: 15.5,
            text: "cooking the perfect sauce".to_string(),
        },
        Segment {
            start: 15.5,
            end: 24.0,
            text: "travel plans for the summer".to_string(),
        },
        Segment {
            start: 24.0,
            end: 30.0,
            text: "travel on a budget".to_string(),
        },
    ]
}

#[tokio::test]
async fn segments_flow_through_to_parsed_sections() {
    let segments = transcript();

    // Segment into topic spans.
    let spans = PairwiseStrategy::new(&PrefixJudge)
        .segment(&segments)
        .await
        .unwrap();
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].start, 0.0);
    assert_eq!(spans[1].end, 30.0);

    // Render for the prompt; a short rendering stays one chunk.
    let rendered = render_spans(&spans, TimestampStyle::Raw);
    let chunks = SemanticChunker::new(&TopicCountEmbedder)
        .split(&rendered)
        .await
        .unwrap();
    assert_eq!(chunks.len(), 1);

    // One chunk means exactly one summarization request.
    let backend = ScriptedBackend {
        calls: Mutex::new(0),
        response: "Heading 1 - Pasta Night - 0.0 - 15.5\nPasta and sauce technique.\nHeading 2 - Summer Trips - 15.5 - 30.0\nPlanning affordable travel.\nOverall\nCooking advice followed by travel planning.",
    };
    let raw = generate_summary(&backend, &chunks, "English").await.unwrap();
    assert_eq!(*backend.calls.lock().unwrap(), 1);

    // Parse the structured response back into typed sections.
    let parsed = parse_summary(&raw);
    assert_eq!(parsed.sections.len(), 2);
    assert_eq!(parsed.sections[0].title, "Pasta Night");
    assert_eq!(parsed.sections[0].start, 0.0);
    assert_eq!(parsed.sections[0].end, 15.5);
    assert_eq!(parsed.sections[1].title, "Summer Trips");
    assert_eq!(parsed.sections[1].content, "Planning affordable travel.");
    assert_eq!(
        parsed.overall,
        "Cooking advice followed by travel planning."
    );
}
