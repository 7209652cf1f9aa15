use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tokio::{fs, io::AsyncWriteExt, process::Command};

use crate::{
    error::{PodbriefError, Result},
    types::{MediaSource, ParsedSummary, SourceKind, Transcript},
};

/// Download an episode's audio from a YouTube link or an RSS podcast feed.
pub async fn download_audio(url: &str, cache_dir: &Path) -> Result<MediaSource> {
    if url.contains("youtube.com") || url.contains("youtu.be") {
        download_youtube_audio(url, cache_dir).await
    } else {
        download_rss_audio(url, cache_dir).await
    }
}

/// Download audio from a YouTube URL using yt-dlp
async fn download_youtube_audio(url: &str, cache_dir: &Path) -> Result<MediaSource> {
    let output_template = cache_dir.join("audio.%(ext)s");
    let output = Command::new("yt-dlp")
        .arg(url)
        .arg("-x")
        .arg("--audio-format")
        .arg("mp3")
        .arg("--print")
        .arg("title")
        .arg("--print")
        .arg("after_move:filepath")
        .arg("--no-warnings")
        .arg("--extractor-args")
        .arg("youtube:player_client=android,web")
        .arg("-o")
        .arg(&output_template)
        .output()
        .await?;

    if !output.status.success() {
        return Err(PodbriefError::DownloadFailed {
            url: url.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    // yt-dlp prints the title before downloading and the final filepath
    // after the audio postprocessor moves it into place.
    let stdout_str = String::from_utf8_lossy(output.stdout.as_slice());
    let lines: Vec<&str> = stdout_str.lines().map(str::trim).collect();
    let [title, .., filepath] = lines.as_slice() else {
        return Err(PodbriefError::DownloadFailed {
            url: url.to_string(),
            reason: format!("unexpected yt-dlp output: {stdout_str}"),
        });
    };

    Ok(MediaSource {
        audio_path: PathBuf::from(*filepath),
        title: title.to_string(),
        thumbnail_url: youtube_thumbnail_url(url)?,
        kind: SourceKind::YouTube,
    })
}

/// Thumbnail URL derived from the video id in a YouTube link.
fn youtube_thumbnail_url(url: &str) -> Result<String> {
    let parsed = reqwest::Url::parse(url).map_err(|e| PodbriefError::DownloadFailed {
        url: url.to_string(),
        reason: format!("invalid URL: {e}"),
    })?;

    let video_id = match parsed.host_str() {
        Some("youtu.be") => parsed.path().trim_start_matches('/').to_string(),
        _ => parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.to_string())
            .unwrap_or_default(),
    };

    if video_id.is_empty() {
        return Err(PodbriefError::DownloadFailed {
            url: url.to_string(),
            reason: "cannot extract video id".to_string(),
        });
    }
    Ok(format!("https://img.youtube.com/vi/{video_id}/hqdefault.jpg"))
}

static FEED_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<title>\s*(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?\s*</title>")
        .expect("valid feed title pattern")
});
static FEED_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<itunes:image[^>]*href="([^"]+)"|<image>\s*<url>\s*([^<]+?)\s*</url>"#)
        .expect("valid feed image pattern")
});
static FEED_ENCLOSURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<enclosure[^>]*url="([^"]+)""#).expect("valid enclosure pattern")
});

/// Download the latest episode's audio from an RSS podcast feed.
async fn download_rss_audio(url: &str, cache_dir: &Path) -> Result<MediaSource> {
    let feed_xml = reqwest::get(url).await?.error_for_status()?.text().await?;

    // The first <item> is the latest episode; its enclosure carries the
    // audio URL. The episode title comes from the item, the artwork from
    // the channel.
    let episode_xml = feed_xml
        .find("<item")
        .map(|at| &feed_xml[at..])
        .unwrap_or(feed_xml.as_str());

    let audio_url = FEED_ENCLOSURE_RE
        .captures(episode_xml)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| PodbriefError::DownloadFailed {
            url: url.to_string(),
            reason: "no audio enclosure found in feed".to_string(),
        })?;

    let title = FEED_TITLE_RE
        .captures(episode_xml)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| "Untitled episode".to_string());

    let thumbnail_url = FEED_IMAGE_RE
        .captures(&feed_xml)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let audio_path = cache_dir.join("audio.mp3");
    let mut response = reqwest::get(&audio_url).await?.error_for_status()?;
    let mut file = fs::File::create(&audio_path).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(MediaSource {
        audio_path,
        title,
        thumbnail_url,
        kind: SourceKind::Rss,
    })
}

/// Transcribe audio using Whisper
pub async fn transcribe_audio(audio_path: &Path, transcript_path: &Path) -> Result<Transcript> {
    let output_dir = transcript_path.parent().unwrap_or(Path::new("."));

    let output = Command::new("whisper")
        .arg(audio_path)
        .arg("--model")
        .arg("base")
        .arg("--output_format")
        .arg("json")
        .arg("--output_dir")
        .arg(output_dir)
        .output()
        .await?;

    if !output.status.success() {
        return Err(PodbriefError::TranscriptFailed {
            audio_path: audio_path.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    // Whisper names its output after the input file stem
    let stem = audio_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "audio".to_string());
    let whisper_output = output_dir.join(format!("{stem}.json"));

    if whisper_output != transcript_path {
        fs::rename(&whisper_output, transcript_path).await?;
    }

    let json_content = fs::read_to_string(transcript_path).await?;
    let transcript: Transcript = serde_json::from_str(&json_content)?;

    Ok(transcript)
}

/// Load a transcript from a cached file
pub async fn load_transcript(path: &Path) -> Result<Transcript> {
    let json_content = fs::read_to_string(path).await?;
    let transcript: Transcript = serde_json::from_str(&json_content)?;
    Ok(transcript)
}

/// Load a media source descriptor from a cached file
pub async fn load_source(path: &Path) -> Result<MediaSource> {
    let json_content = fs::read_to_string(path).await?;
    let source: MediaSource = serde_json::from_str(&json_content)?;
    Ok(source)
}

/// Save a media source descriptor alongside the cached audio
pub async fn save_source(source: &MediaSource, path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(source)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

/// Load a parsed summary from a cached file
pub async fn load_summary(path: &Path) -> Result<ParsedSummary> {
    let json_content = fs::read_to_string(path).await?;
    let summary: ParsedSummary = serde_json::from_str(&json_content)?;
    Ok(summary)
}

/// Save a parsed summary to a file
pub async fn save_summary(summary: &ParsedSummary, path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(summary)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_from_watch_url() {
        let url = "https://www.youtube.com/watch?v=abc123XYZ";
        assert_eq!(
            youtube_thumbnail_url(url).unwrap(),
            "https://img.youtube.com/vi/abc123XYZ/hqdefault.jpg"
        );
    }

    #[test]
    fn thumbnail_from_short_url() {
        let url = "https://youtu.be/abc123XYZ";
        assert_eq!(
            youtube_thumbnail_url(url).unwrap(),
            "https://img.youtube.com/vi/abc123XYZ/hqdefault.jpg"
        );
    }

    #[test]
    fn thumbnail_requires_video_id() {
        assert!(youtube_thumbnail_url("https://www.youtube.com/feed/library").is_err());
    }

    #[test]
    fn feed_patterns_extract_episode_fields() {
        let feed = r#"<?xml version="1.0"?>
<rss><channel>
<title>The Channel</title>
<itunes:image href="https://cdn.example.com/art.jpg"/>
<item>
<title><![CDATA[Episode 42]]></title>
<enclosure url="https://cdn.example.com/ep42.mp3" type="audio/mpeg" length="1"/>
</item>
</channel></rss>"#;

        let episode = &feed[feed.find("<item").unwrap()..];
        let title = FEED_TITLE_RE.captures(episode).unwrap()[1].trim().to_string();
        let audio = FEED_ENCLOSURE_RE.captures(episode).unwrap()[1].to_string();
        let image = FEED_IMAGE_RE.captures(feed).unwrap()[1].to_string();

        assert_eq!(title, "Episode 42");
        assert_eq!(audio, "https://cdn.example.com/ep42.mp3");
        assert_eq!(image, "https://cdn.example.com/art.jpg");
    }
}
