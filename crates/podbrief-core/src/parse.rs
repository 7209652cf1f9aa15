//! Parser for the structured summary text the model is prompted to produce.
//!
//! The grammar is line-oriented:
//!
//! ```text
//! Heading <n> - <title> - <start> - <end>
//! <section body until next heading, the `Overall` line, or end of text>
//! Overall
//! <episode-level summary until end of text>
//! ```
//!
//! The upstream generator is a best-effort language model, so parsing is
//! lenient: malformed header lines are skipped and a missing `Overall`
//! marker yields an empty overall summary. This function never fails.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{HeadingSection, ParsedSummary};

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Heading\s+(\d+)\s*-\s*(.*?)\s*-\s*(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)\s*$")
        .expect("valid heading pattern")
});

static OVERALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Overall$").expect("valid overall pattern"));

/// Parse a raw model response into heading sections plus the overall
/// summary. Both extractions are independent passes over the same text.
pub fn parse_summary(text: &str) -> ParsedSummary {
    ParsedSummary {
        sections: parse_heading_sections(text),
        overall: parse_overall_summary(text),
    }
}

fn parse_heading_sections(text: &str) -> Vec<HeadingSection> {
    let overall_at = OVERALL_RE.find(text).map(|m| m.start());

    let headers: Vec<_> = HEADER_RE.captures_iter(text).collect();
    let mut sections = Vec::with_capacity(headers.len());

    for (i, caps) in headers.iter().enumerate() {
        let whole = caps.get(0).expect("match always has group 0");
        let body_start = whole.end();
        let mut body_end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());
        if let Some(at) = overall_at
            && at >= body_start
            && at < body_end
        {
            body_end = at;
        }

        let (Ok(start), Ok(end)) = (caps[3].parse::<f64>(), caps[4].parse::<f64>()) else {
            continue;
        };

        sections.push(HeadingSection {
            header: format!("Heading {}", &caps[1]),
            title: caps[2].trim().to_string(),
            start,
            end,
            content: text[body_start..body_end].trim().to_string(),
        });
    }

    sections
}

fn parse_overall_summary(text: &str) -> String {
    match OVERALL_RE.find(text) {
        Some(m) => text[m.end()..].trim().to_string(),
        None => String::new(),
    }
}
