use super::models::*;
use super::{TransformError, Transformer};
use crate::config::Settings;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub system_instruction: String,
}

impl OpenAiClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        let api_key = Some(settings.api_key.clone()).filter(|key| !key.is_empty());

        Ok(Self {
            client,
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            system_instruction: settings.system_instruction.clone(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn prepare_request(&self, request_builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        // Without a key the request still goes out and the remote rejects it.
        match &self.api_key {
            Some(key) => request_builder.bearer_auth(key),
            None => request_builder,
        }
    }

    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<String, TransformError> {
        let req = self.prepare_request(self.client.post(self.completions_url()).json(request));
        let res = req.send().await?;

        let status = res.status();
        let body = res.text().await?;
        parse_completion(status, &body)
    }
}

impl Transformer for OpenAiClient {
    async fn transform(&self, chunk: &str, instruction: &str) -> Result<String, TransformError> {
        let request = ChatCompletionRequest::for_chunk(
            &self.model,
            &self.system_instruction,
            instruction,
            chunk,
        );
        self.complete(&request).await
    }
}

/// Only a plain 200 counts as success; anything else is reported with its body.
fn parse_completion(status: StatusCode, body: &str) -> Result<String, TransformError> {
    if status != StatusCode::OK {
        return Err(TransformError::Status {
            status,
            body: body.to_string(),
        });
    }

    let response: ChatCompletionResponse = serde_json::from_str(body)?;
    if let Some(usage) = &response.usage {
        debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "completion usage"
        );
    }
    response.into_text().ok_or(TransformError::EmptyResponse)
}
