use std::error::Error as _;
use std::time::Instant;

use scholariq_core::domain::ModelTier;
use scholariq_core::error::AppError;
use serde::{Deserialize, Serialize};

use super::{GenerationParams, Llm};
use crate::gemini::GeminiClient;

#[derive(Debug, Clone)]
pub struct GeminiLlm {
    client: GeminiClient,
}

impl GeminiLlm {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Clone, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    let io_timeout = transport
        .source()
        .and_then(|s| s.downcast_ref::<std::io::Error>())
        .is_some_and(|e| {
            matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            )
        });
    io_timeout || transport.to_string().contains("timed out")
}

fn decode(resp: ureq::Response) -> Result<String, AppError> {
    let v: GenerateContentResponse = resp.into_json().map_err(|e| {
        AppError::generation_unavailable("Failed to decode generation response")
            .with_details(e.to_string())
    })?;

    if let Some(reason) = v
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(
            AppError::generation_unavailable("Generation was blocked by the provider")
                .with_details(format!("block_reason={reason}")),
        );
    }

    let text = v.text();
    if text.trim().is_empty() {
        let finish = v
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .unwrap_or("none");
        return Err(
            AppError::generation_unavailable("Generation response was empty")
                .with_details(format!("finish_reason={finish}")),
        );
    }
    Ok(text)
}

impl Llm for GeminiLlm {
    fn generate(
        &self,
        prompt: &str,
        model: ModelTier,
        params: &GenerationParams,
    ) -> Result<String, AppError> {
        let url = self.client.generate_url(model);
        let req = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_tokens,
            },
        };
        let body = serde_json::to_value(req).map_err(|e| {
            AppError::generation_unavailable("Failed to encode generation request")
                .with_details(e.to_string())
        })?;

        let model_name = self.client.model_name(model);
        tracing::debug!(
            model = model_name,
            prompt_chars = prompt.len(),
            max_tokens = params.max_tokens,
            "calling generateContent"
        );
        let started = Instant::now();

        let resp = ureq::post(&url)
            .timeout(params.timeout)
            .set("x-goog-api-key", self.client.api_key())
            .send_json(body);

        let result = match resp {
            Ok(r) if r.status() == 200 => decode(r),
            Ok(r) => Err(AppError::generation_unavailable("Generation request failed")
                .with_details(format!("status={}", r.status()))),
            Err(ureq::Error::Status(status, _)) => {
                Err(AppError::generation_unavailable("Generation request failed")
                    .with_details(format!("status={status}"))
                    .with_retryable(status == 429 || status >= 500))
            }
            Err(ureq::Error::Transport(t)) if is_timeout(&t) => {
                Err(AppError::generation_timeout(params.timeout))
            }
            Err(ureq::Error::Transport(t)) => Err(AppError::generation_unavailable(
                "Failed to call generation endpoint",
            )
            .with_details(t.to_string())
            .with_retryable(true)),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(text) => tracing::debug!(
                model = model_name,
                elapsed_ms,
                output_chars = text.len(),
                "generation finished"
            ),
            Err(e) => tracing::warn!(
                model = model_name,
                elapsed_ms,
                code = %e.code,
                retryable = e.retryable,
                "generation failed"
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let v: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]},"finishReason":"STOP"},{"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .expect("parse");
        assert_eq!(v.text(), "Hello world");
    }

    #[test]
    fn request_body_uses_api_field_names() {
        let req = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.5,
                max_output_tokens: 4096,
            },
        };
        let v = serde_json::to_value(req).expect("encode");
        assert_eq!(v["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(v["generationConfig"]["maxOutputTokens"], 4096);
        assert_eq!(v["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn missing_candidates_decode_to_empty_text() {
        let v: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).expect("parse");
        assert_eq!(v.text(), "");
        assert_eq!(
            v.prompt_feedback.and_then(|f| f.block_reason).as_deref(),
            Some("SAFETY")
        );
    }
}
