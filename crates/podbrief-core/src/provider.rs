use std::time::Duration;

use async_trait::async_trait;

use crate::{
    error::{PodbriefError, Result},
    summarize::Completion,
};

#[derive(Clone, Debug, Default)]
pub enum Provider {
    #[default]
    Grok,
    Openai,
    Gemini,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
            },
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-5.1",
                env_var: "OPENAI_API_KEY",
            },
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
                model: "gemini-3-pro",
                env_var: "GEMINI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Grok => "Grok",
            Provider::Openai => "OpenAI",
            Provider::Gemini => "Gemini",
        }
    }

    /// Validate that the API key is set for this provider
    pub fn validate_api_key(&self) -> Result<String> {
        let config = self.config();
        std::env::var(config.env_var).map_err(|_| PodbriefError::MissingApiKey {
            env_var: config.env_var.to_string(),
        })
    }
}

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE: Duration = Duration::from_millis(250);

/// Chat-completions client for a remote provider. Transport failures retry
/// with bounded exponential backoff; a response that arrives but doesn't
/// parse never retries.
pub struct ChatClient {
    http: reqwest::Client,
    provider: Provider,
    api_key: String,
}

impl ChatClient {
    pub fn new(provider: Provider) -> Result<Self> {
        let api_key = provider.validate_api_key()?;
        Ok(Self {
            http: reqwest::Client::new(),
            provider,
            api_key,
        })
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }
}

#[async_trait]
impl Completion for ChatClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String> {
        let config = self.provider.config();
        let body = serde_json::json!({
            "model": config.model,
            "messages": [
                {
                    "role": "system",
                    "content": system_prompt,
                },
                {
                    "role": "user",
                    "content": user_prompt,
                },
            ],
            "temperature": temperature,
        });

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            let sent = self
                .http
                .post(config.api_url)
                .header("Content-Type", "application/json")
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&body)
                .send()
                .await;

            match sent {
                Ok(response) => break response.json::<serde_json::Value>().await?,
                Err(_) if attempt < MAX_ATTEMPTS => {
                    tokio::time::sleep(BACKOFF_BASE * 2u32.pow(attempt - 1)).await;
                }
                Err(e) => return Err(e.into()),
            }
        };

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| PodbriefError::SummaryFailed {
                reason: format!("Invalid API response: {:?}", response),
            })?;

        Ok(content.trim().to_string())
    }
}
