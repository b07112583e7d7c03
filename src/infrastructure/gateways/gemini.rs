#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ApiKey;
use crate::domain::models::GatewayError;
use crate::domain::models::ModelGateway;
use crate::domain::models::Turn;
use crate::domain::models::FALLBACK_RESPONSE;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Model {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    models: Vec<Model>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

impl CompletionRequest {
    fn new(turns: &[Turn], system_prompt: &str) -> Option<CompletionRequest> {
        let (current, history) = turns.split_last()?;

        let mut contents = history.iter().map(to_content).collect::<Vec<Content>>();
        contents.push(to_content(current));

        let mut system_instruction = None;
        if !system_prompt.is_empty() {
            system_instruction = Some(SystemInstruction {
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            });
        }

        return Some(CompletionRequest {
            contents,
            system_instruction,
        });
    }
}

impl CompletionResponse {
    fn text(&self) -> String {
        let text = self
            .candidates
            .first()
            .and_then(|candidate| return candidate.content.as_ref())
            .map(|content| {
                return content
                    .parts
                    .iter()
                    .filter_map(|part| return part.text.as_deref())
                    .collect::<String>();
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return FALLBACK_RESPONSE.to_string();
        }

        return text;
    }
}

fn to_content(turn: &Turn) -> Content {
    return Content {
        role: turn.role().to_string(),
        parts: vec![Part {
            text: turn.content().to_string(),
        }],
    };
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    tracing::error!(error = ?err, "Gemini is not reachable");
    return GatewayError::from_remote_message(&err.to_string());
}

async fn status_error(res: reqwest::Response) -> GatewayError {
    let status = res.status();
    tracing::error!(status = status.as_u16(), "Gemini request failed");

    if status == StatusCode::TOO_MANY_REQUESTS {
        return GatewayError::RateLimited;
    }

    let body = res.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err_res) if !err_res.error.message.is_empty() => {
            if err_res.error.status.is_empty() {
                err_res.error.message
            } else {
                format!("{}: {}", err_res.error.status, err_res.error.message)
            }
        }
        _ => format!(
            "Failed to make completion request to Gemini, {}",
            status.as_u16()
        ),
    };

    return GatewayError::from_remote_message(&message);
}

pub struct Gemini {
    client: reqwest::Client,
    url: String,
    api_key: Option<ApiKey>,
}

impl Default for Gemini {
    fn default() -> Gemini {
        let mut url = Config::get(ConfigKey::GeminiURL);
        if url.is_empty() {
            url = Config::default(ConfigKey::GeminiURL);
        }

        return Gemini::new(&url);
    }
}

impl Gemini {
    pub fn new(url: &str) -> Gemini {
        return Gemini {
            client: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
            api_key: None,
        };
    }

    fn key(&self) -> Result<&str, GatewayError> {
        return self
            .api_key
            .as_ref()
            .map(|key| return key.as_str())
            .ok_or(GatewayError::Unconfigured);
    }
}

#[async_trait]
impl ModelGateway for Gemini {
    fn configure(&mut self, api_key: &ApiKey) {
        self.api_key = Some(api_key.clone());
    }

    fn unconfigure(&mut self) {
        self.api_key = None;
    }

    fn is_configured(&self) -> bool {
        return self.api_key.is_some();
    }

    #[allow(clippy::implicit_return)]
    async fn generate(
        &self,
        model: &str,
        turns: &[Turn],
        system_prompt: &str,
    ) -> Result<String, GatewayError> {
        let key = self.key()?;
        let req = CompletionRequest::new(turns, system_prompt).ok_or_else(|| {
            return GatewayError::RemoteFailure("There is no message to send".to_string());
        })?;

        tracing::debug!(
            model = model,
            history = req.contents.len() - 1,
            "Sending completion request to Gemini"
        );

        let res = self
            .client
            .post(format!(
                "{url}/v1beta/models/{model}:generateContent",
                url = self.url,
            ))
            .header("x-goog-api-key", key)
            .json(&req)
            .send()
            .await
            .map_err(transport_error)?;

        if !res.status().is_success() {
            return Err(status_error(res).await);
        }

        let completion = res.json::<CompletionResponse>().await.map_err(|err| {
            return GatewayError::RemoteFailure(format!("Failed to parse Gemini response: {err}"));
        })?;

        return Ok(completion.text());
    }

    #[allow(clippy::implicit_return)]
    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let key = self.key()?;
        let res = self
            .client
            .get(format!("{url}/v1beta/models", url = self.url))
            .header("x-goog-api-key", key)
            .send()
            .await
            .map_err(transport_error)?;

        if !res.status().is_success() {
            return Err(status_error(res).await);
        }

        let list = res.json::<ModelListResponse>().await.map_err(|err| {
            return GatewayError::RemoteFailure(format!("Failed to parse Gemini model list: {err}"));
        })?;

        let mut models: Vec<String> = list
            .models
            .iter()
            .filter(|model| {
                return model
                    .supported_generation_methods
                    .contains(&"generateContent".to_string());
            })
            .map(|model| {
                return model.name.trim_start_matches("models/").to_string();
            })
            .collect();

        models.sort();

        return Ok(models);
    }
}
