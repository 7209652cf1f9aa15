//! Summary orchestration: one combined request for transcripts that fit a
//! single prompt, map-reduce over chunks for those that don't.

use async_trait::async_trait;

use crate::error::{PodbriefError, Result};

/// Remote completion backend: `complete(system, user, temperature) -> text`.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String>;
}

const SUMMARY_TEMPERATURE: f32 = 0.3;

static HEADING_SUMMARY_PROMPT: &str = r#"
You are an assistant summarizing a podcast transcript. The transcript is broken into segments, each with a start time, end time, and spoken text.

Your task is to:
- Group segments that talk about the same topic.
- Break into logical sections based on topic transitions.
- For each section, write a heading and a summary.
- Each section must include the start time of the first segment and the end time of the last segment.

Format output exactly like this (repeat for each heading):

Heading {{n}} - {{Heading title}} - {{start_time}} - {{end_time}}
{{summary for that section}}

After you have listed all sections, write an overall summary of the full episode.
Start the overall summary with the word `Overall` on its own line, so it can be parsed separately.
Do not include any extra explanation or formatting outside this structure.

Only return the summary in that format. Do not explain. Start from Heading 1.
"#;

static MAP_PROMPT: &str = r#"
You are summarizing one chunk of a longer podcast transcript. Each line has the form [start_time - end_time]: spoken text.

Write a condensed summary of this chunk only. Begin your answer with the start time of the chunk's first line and the end time of its last line, in the form:

{{start_time}} - {{end_time}}
{{condensed summary of the chunk}}

Do not produce headings. Do not summarize anything outside this chunk. Do not include any extra explanation.
"#;

static COMBINE_PROMPT: &str = r#"
The following are consecutive summaries of chunks of one podcast episode, in order. Each carries its start and end time.

Your task is to:
- Group consecutive chunks that talk about the same topic.
- For each group, write a heading and a summary covering the group's full time range.

Format output exactly like this (repeat for each heading):

Heading {{n}} - {{Heading title}} - {{start_time}} - {{end_time}}
{{summary for that section}}

After you have listed all sections, write an overall summary of the full episode.
Start the overall summary with the word `Overall` on its own line, so it can be parsed separately.
Do not include any extra explanation or formatting outside this structure.

Only return the summary in that format. Do not explain. Start from Heading 1.
"#;

fn system_prompt(target_language: &str) -> String {
    format!(
        "You are a helpful assistant that summarizes podcasts into structured sections. \
         Write every response in {target_language}. \
         Never use English unless the target language is English."
    )
}

/// Produce the raw structured summary text for a chunked transcript. One
/// chunk goes through a single combined request; more than one goes through
/// one map request per chunk followed by one reduce request over the map
/// outputs, in original chunk order.
pub async fn generate_summary(
    backend: &dyn Completion,
    chunks: &[String],
    target_language: &str,
) -> Result<String> {
    match chunks {
        [] => Err(PodbriefError::SummaryFailed {
            reason: "no transcript chunks to summarize".to_string(),
        }),
        [transcript] => summarize_single(backend, transcript, target_language).await,
        many => summarize_map_reduce(backend, many, target_language).await,
    }
}

async fn summarize_single(
    backend: &dyn Completion,
    transcript: &str,
    target_language: &str,
) -> Result<String> {
    let user_prompt = format!(
        "{}\n\nLanguage: {}\n\nHere is the transcript:\n{}",
        HEADING_SUMMARY_PROMPT.trim(),
        target_language,
        transcript
    );
    backend
        .complete(
            &system_prompt(target_language),
            &user_prompt,
            SUMMARY_TEMPERATURE,
        )
        .await
}

async fn summarize_map_reduce(
    backend: &dyn Completion,
    chunks: &[String],
    target_language: &str,
) -> Result<String> {
    let mut partials = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let user_prompt = format!(
            "{}\n\nLanguage: {}\n\nHere is the transcript chunk:\n{}",
            MAP_PROMPT.trim(),
            target_language,
            chunk
        );
        let partial = backend
            .complete(
                &system_prompt(target_language),
                &user_prompt,
                SUMMARY_TEMPERATURE,
            )
            .await?;
        partials.push(partial);
    }

    let user_prompt = format!(
        "{}\n\nLanguage: {}\n\nHere are the chunk summaries:\n{}",
        COMBINE_PROMPT.trim(),
        target_language,
        partials.join("\n\n")
    );
    backend
        .complete(
            &system_prompt(target_language),
            &user_prompt,
            SUMMARY_TEMPERATURE,
        )
        .await
}
