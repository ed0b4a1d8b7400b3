use crate::config::Settings;
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::{CompletionClient, CompletionRequest, Provider};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Client for an OpenAI-compatible `/v1/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompletionClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompletionClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_openai_api_key()?.to_string();
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_secs = std::env::var("OPENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model,
        })
    }

    async fn create_completion(
        &self,
        req: CreateCompletionRequest,
    ) -> anyhow::Result<CreateCompletionResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );

        let url = format!("{}/v1/completions", self.base_url.trim_end_matches('/'));
        let res = self
            .http
            .post(url)
            .headers(headers)
            .json(&req)
            .send()
            .await
            .context("completion request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read completion response body")?;
        if !status.is_success() {
            let raw_response_json = serde_json::from_str::<serde_json::Value>(&text).ok();
            return Err(LlmDiagnosticsError {
                provider: Provider::OpenAi,
                stage: "http",
                detail: format!("status={status}"),
                raw_output: Some(text),
                raw_response_json,
            }
            .into());
        }

        serde_json::from_str::<CreateCompletionResponse>(&text)
            .with_context(|| format!("failed to decode completion response JSON: {text}"))
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenAiCompletionClient {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String> {
        let res = self
            .create_completion(CreateCompletionRequest {
                model: self.model.clone(),
                prompt: req.prompt,
                max_tokens: req.max_tokens,
            })
            .await?;
        first_choice_text(res)
    }
}

fn first_choice_text(res: CreateCompletionResponse) -> anyhow::Result<String> {
    let Some(choice) = res.choices.into_iter().next() else {
        return Err(LlmDiagnosticsError {
            provider: Provider::OpenAi,
            stage: "decode",
            detail: "completion response contained no choices".to_string(),
            raw_output: None,
            raw_response_json: None,
        }
        .into());
    };
    Ok(choice.text.trim().to_string())
}

#[derive(Debug, Clone, Serialize)]
struct CreateCompletionRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct CreateCompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn takes_first_choice_and_trims() {
        let v = json!({
            "id": "cmpl-1",
            "choices": [
                { "text": "\n  Hold cash and short-duration bonds.  \n", "index": 0 },
                { "text": "ignored", "index": 1 }
            ]
        });
        let res: CreateCompletionResponse = serde_json::from_value(v).unwrap();
        assert_eq!(
            first_choice_text(res).unwrap(),
            "Hold cash and short-duration bonds."
        );
    }

    #[test]
    fn empty_choices_is_a_decode_error() {
        let res: CreateCompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();
        let err = first_choice_text(res).unwrap_err();
        let diag = err.downcast_ref::<LlmDiagnosticsError>().unwrap();
        assert_eq!(diag.stage, "decode");
    }

    #[test]
    fn request_serializes_model_prompt_and_budget() {
        let req = CreateCompletionRequest {
            model: "llama-3.1-8b-instant".to_string(),
            prompt: "What now?".to_string(),
            max_tokens: 150,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["model"], "llama-3.1-8b-instant");
        assert_eq!(v["prompt"], "What now?");
        assert_eq!(v["max_tokens"], 150);
    }
}
