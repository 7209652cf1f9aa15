use crate::types::{ParsedSummary, Segment, TopicSpan};

/// Format seconds as a clock timestamp: `H:MM:SS` when hours are present,
/// `M:SS` when only minutes are, bare seconds otherwise. Seconds are
/// truncated, not rounded. Negative input is a precondition violation.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}:{:02}", minutes, secs)
    } else {
        format!("{}", secs)
    }
}

/// How timestamps are rendered in transcript lines: raw numeric seconds for
/// prompt input whose times get parsed back downstream, clock strings for
/// display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampStyle {
    #[default]
    Raw,
    Clock,
}

/// Trim segment text and collapse inner newlines to spaces.
pub fn clean_segment_text(text: &str) -> String {
    text.trim().replace('\n', " ")
}

fn render_line(start: f64, end: f64, text: &str, style: TimestampStyle) -> String {
    let text = clean_segment_text(text);
    match style {
        TimestampStyle::Raw => format!("[{} - {}]: {}", start, end, text),
        TimestampStyle::Clock => format!(
            "[{} - {}]: {}",
            format_timestamp(start),
            format_timestamp(end),
            text
        ),
    }
}

/// Render transcript segments one per line as `[start - end]: text`.
pub fn render_transcript(segments: &[Segment], style: TimestampStyle) -> String {
    segments
        .iter()
        .map(|seg| render_line(seg.start, seg.end, &seg.text, style))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render topic spans one per line as `[start - end]: text`.
pub fn render_spans(spans: &[TopicSpan], style: TimestampStyle) -> String {
    spans
        .iter()
        .map(|span| render_line(span.start, span.end, &span.text, style))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a parsed summary as human-readable markdown.
pub fn format_summary_readable(title: &str, summary: &ParsedSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", title));

    for section in &summary.sections {
        let start = format_timestamp(section.start);
        let end = format_timestamp(section.end);
        output.push_str(&format!("## [{}–{}] {}\n\n", start, end, section.title));
        output.push_str(&format!("{}\n\n", section.content));
    }

    if !summary.overall.is_empty() {
        output.push_str("## Overall\n\n");
        output.push_str(&summary.overall);
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_bare_seconds() {
        assert_eq!(format_timestamp(0.0), "0");
        assert_eq!(format_timestamp(9.0), "9");
    }

    #[test]
    fn timestamp_minutes() {
        assert_eq!(format_timestamp(65.0), "1:05");
        assert_eq!(format_timestamp(599.0), "9:59");
    }

    #[test]
    fn timestamp_hours() {
        assert_eq!(format_timestamp(3661.0), "1:01:01");
        assert_eq!(format_timestamp(7325.0), "2:02:05");
    }

    #[test]
    fn timestamp_truncates() {
        assert_eq!(format_timestamp(59.9), "59");
        assert_eq!(format_timestamp(60.999), "1:00");
    }

    #[test]
    fn renders_raw_lines() {
        let segments = vec![
            Segment {
                start: 0.0,
                end: 4.5,
                text: " hello\nworld ".to_string(),
            },
            Segment {
                start: 4.5,
                end: 9.0,
                text: "second".to_string(),
            },
        ];
        let rendered = render_transcript(&segments, TimestampStyle::Raw);
        assert_eq!(rendered, "[0 - 4.5]: hello world\n[4.5 - 9]: second");
    }

    #[test]
    fn renders_clock_lines() {
        let segments = vec![Segment {
            start: 61.0,
            end: 3661.0,
            text: "tick".to_string(),
        }];
        let rendered = render_transcript(&segments, TimestampStyle::Clock);
        assert_eq!(rendered, "[1:01 - 1:01:01]: tick");
    }

    #[test]
    fn empty_transcript_renders_empty() {
        assert_eq!(render_transcript(&[], TimestampStyle::Raw), "");
    }
}
