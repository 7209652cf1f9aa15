use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub segments: Vec<Segment>,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// A contiguous run of segments that share one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSpan {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// One titled, timestamped unit of the structured summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingSection {
    pub header: String,
    pub title: String,
    pub start: f64,
    pub end: f64,
    pub content: String,
}

/// Terminal artifact of the summarization pipeline. `overall` is empty when
/// the model produced no episode-level synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSummary {
    pub sections: Vec<HeadingSection>,
    pub overall: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    YouTube,
    Rss,
}

/// Result of downloading one episode's audio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSource {
    pub audio_path: PathBuf,
    pub title: String,
    pub thumbnail_url: String,
    pub kind: SourceKind,
}

/// Persisted summary of one episode, keyed by user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub source_url: String,
    pub language: String,
    pub sections: Vec<HeadingSection>,
    pub overall: String,
}
