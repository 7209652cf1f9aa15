//! Podbrief Core Library
//!
//! Core functionality for downloading podcast audio from YouTube or RSS
//! feeds, transcribing with Whisper, segmenting transcripts into topics,
//! and generating structured AI summaries.

pub mod cache;
pub mod chunk;
pub mod error;
pub mod format;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod provider;
pub mod segment;
pub mod store;
pub mod summarize;
pub mod types;

// Re-export commonly used items at crate root
pub use cache::{
    find_audio_in_cache, get_cache_dir, get_source_path, get_summary_path, get_transcript_path,
};
pub use chunk::SemanticChunker;
pub use error::{PodbriefError, Result};
pub use format::{
    TimestampStyle, format_summary_readable, format_timestamp, render_spans, render_transcript,
};
pub use model::{Embedder, OllamaClient, TopicJudge, cosine_similarity};
pub use parse::parse_summary;
pub use pipeline::{
    download_audio, load_source, load_summary, load_transcript, save_source, save_summary,
    transcribe_audio,
};
pub use provider::{ChatClient, Provider, ProviderConfig};
pub use segment::{PairwiseStrategy, SegmentStrategy, WindowStrategy};
pub use store::EpisodeStore;
pub use summarize::{Completion, generate_summary};
pub use types::{
    EpisodeRecord, HeadingSection, MediaSource, ParsedSummary, Segment, SourceKind, TopicSpan,
    Transcript,
};
