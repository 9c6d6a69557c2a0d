//! OllamaGenerator - text generation against a locally hosted Ollama server.
//!
//! Loading a multi-gigabyte model takes seconds, so the warm-up is guarded
//! by a `OnceCell`: only the first successful `load` talks to the server,
//! every later call is a no-op, and a failed load is retried on the next
//! call. All sessions in one process share the same loaded model through a
//! shared generator handle.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tabula_core::config::ModelConfig;
use tabula_core::error::{Result, TabulaError};
use tabula_core::generate::{GenerateOptions, TextGenerator};
use tokio::sync::OnceCell;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OptionsBody,
}

/// Ollama's names for the sampling options.
#[derive(Serialize)]
struct OptionsBody {
    temperature: f32,
    num_predict: u32,
    top_p: f32,
    num_ctx: u32,
    num_batch: u32,
}

impl From<&GenerateOptions> for OptionsBody {
    fn from(options: &GenerateOptions) -> Self {
        Self {
            temperature: options.temperature,
            num_predict: options.max_tokens,
            top_p: options.top_p,
            num_ctx: options.context_window,
            num_batch: options.batch_size,
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

/// A text generator backed by a local Ollama-protocol server.
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
    loaded: OnceCell<()>,
}

impl OllamaGenerator {
    /// Creates a generator for `model` served at `base_url`.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            loaded: OnceCell::new(),
        }
    }

    /// Creates a generator from the model section of the configuration.
    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.base_url.clone(), config.model_name.clone())
    }

    /// Verifies the server is reachable and the model exists, then warms it
    /// into memory with an empty-prompt generate call.
    async fn warm_up(&self) -> Result<()> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            TabulaError::model_load(format!(
                "inference server unreachable at {}: {e}",
                self.base_url
            ))
        })?;
        if !response.status().is_success() {
            return Err(TabulaError::model_load(format!(
                "inference server returned status {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| TabulaError::model_load(format!("malformed model list: {e}")))?;
        let known = tags
            .models
            .iter()
            .any(|m| m.name == self.model || m.name.starts_with(&format!("{}:", self.model)));
        if !known {
            return Err(TabulaError::model_load(format!(
                "model '{}' is not available on the server",
                self.model
            )));
        }

        // An empty prompt makes the server load the model without
        // generating anything.
        let request = GenerateRequest {
            model: &self.model,
            prompt: "",
            stream: false,
            options: OptionsBody::from(&GenerateOptions::default()),
        };
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| TabulaError::model_load(format!("model warm-up failed: {e}")))?;
        if !response.status().is_success() {
            return Err(TabulaError::model_load(format!(
                "model warm-up returned status {}",
                response.status()
            )));
        }

        tracing::info!(model = %self.model, base_url = %self.base_url, "model loaded");
        Ok(())
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn load(&self) -> Result<()> {
        // Only a successful warm-up is cached; a failure leaves the cell
        // empty so the next call retries.
        self.loaded
            .get_or_try_init(|| self.warm_up())
            .await
            .map(|_| ())
    }

    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OptionsBody::from(options),
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| TabulaError::inference(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(TabulaError::inference(format!(
                "server returned status {status}: {body}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| TabulaError::inference(format!("malformed response: {e}")))?;
        Ok(parsed.response)
    }
}
