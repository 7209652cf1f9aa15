use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use uuid::Uuid;

use podbrief_core::{
    ChatClient, EpisodeRecord, EpisodeStore, OllamaClient, PairwiseStrategy, ParsedSummary,
    Provider, SegmentStrategy, SemanticChunker, TimestampStyle, WindowStrategy, download_audio,
    find_audio_in_cache, format_summary_readable, generate_summary, get_cache_dir,
    get_source_path, get_summary_path, get_transcript_path, load_source, load_summary,
    load_transcript, parse_summary, render_spans, save_source, save_summary, transcribe_audio,
};

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Grok,
    Openai,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

/// Topic segmentation strategy
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliStrategy {
    /// Ask a local model whether each segment continues the previous topic
    Pairwise,
    /// Compare embeddings of sliding windows around each boundary
    #[default]
    Window,
}

impl CliStrategy {
    fn name(self) -> &'static str {
        match self {
            CliStrategy::Pairwise => "pairwise",
            CliStrategy::Window => "window",
        }
    }
}

#[derive(Parser)]
#[command(name = "podbrief")]
#[command(
    about = "Download podcast audio from YouTube or RSS, transcribe with Whisper, and generate structured AI summaries"
)]
struct Cli {
    /// YouTube video URL or RSS feed URL
    url: String,

    /// Summary language (e.g., "English", "Vietnamese"). Defaults to the episode's detected language.
    #[arg(short, long)]
    lang: Option<String>,

    /// AI provider for summary generation
    #[arg(short, long, default_value = "grok")]
    provider: CliProvider,

    /// Topic segmentation strategy
    #[arg(short, long, default_value = "window")]
    strategy: CliStrategy,

    /// Sliding-window size for the window strategy
    #[arg(long, default_value_t = 3)]
    window_size: usize,

    /// Cosine similarity threshold for the window strategy
    #[arg(long, default_value_t = 0.7)]
    threshold: f32,

    /// Base URL of the local Ollama daemon serving embeddings and the topic judge
    #[arg(long, default_value = "http://localhost:11434")]
    ollama_url: String,

    /// User the stored summary is filed under
    #[arg(short, long, default_value = "local")]
    user: String,

    /// Force re-processing even if cached files exist
    #[arg(short, long)]
    force: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let provider: Provider = cli.provider.into();

    // Validate API key early
    let chat = match ChatClient::new(provider.clone()) {
        Ok(chat) => chat,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let url = cli.url;

    // Setup cache directory
    let cache_dir = get_cache_dir(&url);
    fs::create_dir_all(&cache_dir).await?;

    println!(
        "\n{}  {}\n",
        style("podbrief").cyan().bold(),
        style("Podcast Summarizer").dim()
    );

    // Step 1: Download audio (check cache)
    let source_path = get_source_path(&cache_dir);
    let source = if !cli.force
        && find_audio_in_cache(&cache_dir).is_some()
        && source_path.exists()
    {
        let source = load_source(&source_path).await?;
        println!(
            "{} Downloaded: {} {}",
            style("✓").green().bold(),
            style(&source.title).dim(),
            style("(cached)").dim()
        );
        source
    } else {
        let spinner = create_spinner("Downloading audio...");
        let source = download_audio(&url, &cache_dir).await?;
        save_source(&source, &source_path).await?;
        spinner.finish_with_message(format!(
            "{} Downloaded: {}",
            style("✓").green().bold(),
            style(&source.title).dim()
        ));
        source
    };

    // Step 2: Transcribe (check cache)
    let transcript_path = get_transcript_path(&cache_dir);
    let transcript = if !cli.force && transcript_path.exists() {
        let transcript = load_transcript(&transcript_path).await?;
        let duration_mins = transcript
            .segments
            .last()
            .map(|s| s.end / 60.0)
            .unwrap_or(0.0);
        println!(
            "{} Transcribed: {:.1} min, {} {}",
            style("✓").green().bold(),
            duration_mins,
            style(&transcript.language).yellow(),
            style("(cached)").dim()
        );
        transcript
    } else {
        let spinner = create_spinner("Transcribing with Whisper...");
        let started = Instant::now();
        let transcript = transcribe_audio(&source.audio_path, &transcript_path).await?;
        spinner.finish_with_message(format!(
            "{} Transcribed: {} segments, {} detected, {:.0}s",
            style("✓").green().bold(),
            transcript.segments.len(),
            style(&transcript.language).yellow(),
            started.elapsed().as_secs_f64()
        ));
        transcript
    };

    // Step 3: Segment, chunk, summarize, parse (check cache on the parsed result)
    let summary_lang = cli.lang.unwrap_or_else(|| transcript.language.clone());
    let summary_path = get_summary_path(&cache_dir, &provider, cli.strategy.name(), &summary_lang);

    let summary: ParsedSummary = if !cli.force && summary_path.exists() {
        let summary = load_summary(&summary_path).await?;
        println!(
            "{} Summary generated ({}) {}",
            style("✓").green().bold(),
            provider.name(),
            style("(cached)").dim()
        );
        summary
    } else {
        let ollama = OllamaClient::with_base_url(&cli.ollama_url);

        let spinner = create_spinner("Segmenting topics...");
        let strategy: Box<dyn SegmentStrategy + '_> = match cli.strategy {
            CliStrategy::Pairwise => Box::new(PairwiseStrategy::new(&ollama)),
            CliStrategy::Window => Box::new(WindowStrategy::with_params(
                &ollama,
                cli.window_size,
                cli.threshold,
            )),
        };
        let spans = strategy.segment(&transcript.segments).await?;
        spinner.finish_with_message(format!(
            "{} Segmented: {} topic spans",
            style("✓").green().bold(),
            spans.len()
        ));

        let rendered = render_spans(&spans, TimestampStyle::Raw);
        let chunks = SemanticChunker::new(&ollama).split(&rendered).await?;

        let spinner = create_spinner(&format!(
            "Generating {} summary with {}...",
            summary_lang,
            provider.name()
        ));
        let raw = generate_summary(&chat, &chunks, &summary_lang).await?;
        let summary = parse_summary(&raw);
        save_summary(&summary, &summary_path).await?;
        spinner.finish_with_message(format!(
            "{} Summary generated ({}, {} chunk{})",
            style("✓").green().bold(),
            provider.name(),
            chunks.len(),
            if chunks.len() == 1 { "" } else { "s" }
        ));
        summary
    };

    // Step 4: Store the episode record for the user
    let record = EpisodeRecord {
        id: Uuid::new_v4(),
        user_id: cli.user.clone(),
        title: source.title.clone(),
        thumbnail_url: source.thumbnail_url.clone(),
        source_url: url.clone(),
        language: summary_lang.clone(),
        sections: summary.sections.clone(),
        overall: summary.overall.clone(),
    };
    let stored_path = EpisodeStore::new().save(&record).await?;

    println!(
        "\n{} {}\n",
        style("Saved:").dim(),
        style(stored_path.display()).cyan()
    );
    println!("{}", style("─".repeat(60)).dim());

    // Human-readable output
    let readable = format_summary_readable(&source.title, &summary);
    println!("{}", readable);

    Ok(())
}
