//! Azure OpenAI chat completions client

use super::NarrativeEnricher;
use crate::config::{LlmConfig, SecretString};
use crate::domain::EnrichmentError;
use crate::locale::Locale;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Narrative enricher backed by an Azure OpenAI deployment
///
/// # Example
///
/// ```no_run
/// use ipsgen::adapters::enrichment::{AzureOpenAiEnricher, NarrativeEnricher};
/// use ipsgen::config::{secret_string, LlmConfig};
/// use ipsgen::locale::Locale;
///
/// # async fn example() -> Result<(), ipsgen::domain::EnrichmentError> {
/// let config = LlmConfig {
///     enabled: true,
///     endpoint: Some("https://my-resource.openai.azure.com".to_string()),
///     api_key: Some(secret_string("key".to_string())),
///     deployment: Some("gpt-4o-mini".to_string()),
///     ..Default::default()
/// };
/// let enricher = AzureOpenAiEnricher::new(&config, Locale::ireland())?;
/// let note = enricher.request("Generate a brief note for an Irish patient with Asthma.").await?;
/// # Ok(())
/// # }
/// ```
pub struct AzureOpenAiEnricher {
    client: Client,
    url: String,
    deployment: String,
    api_key: SecretString,
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
}

impl AzureOpenAiEnricher {
    /// Creates a client for the configured deployment
    ///
    /// # Errors
    ///
    /// [`EnrichmentError::NotConfigured`] when the endpoint, key or
    /// deployment is missing or the endpoint is not a URL;
    /// [`EnrichmentError::ConnectionFailed`] when the HTTP client cannot be
    /// built.
    pub fn new(config: &LlmConfig, locale: &Locale) -> Result<Self, EnrichmentError> {
        let endpoint = required(config.endpoint.as_deref(), "endpoint")?;
        let deployment = required(config.deployment.as_deref(), "deployment")?;
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.expose_secret().is_empty())
            .ok_or_else(|| EnrichmentError::NotConfigured("api_key is missing".to_string()))?;

        let mut url = url::Url::parse(endpoint)
            .map_err(|e| EnrichmentError::NotConfigured(format!("invalid endpoint '{endpoint}': {e}")))?;
        url.set_path(&format!(
            "{}/openai/deployments/{deployment}/chat/completions",
            url.path().trim_end_matches('/')
        ));
        url.query_pairs_mut()
            .clear()
            .append_pair("api-version", &config.api_version);

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(10)))
            .build()
            .map_err(|e| EnrichmentError::ConnectionFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
            deployment: deployment.to_string(),
            api_key,
            system_prompt: format!(
                "You are a medical data expert specializing in {}. Provide concise, realistic responses.",
                locale.clinical_specialty
            ),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Chat completions URL requests are posted to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Deployment (model) name
    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// System message sent with every request
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, EnrichmentError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| EnrichmentError::NotConfigured(format!("{name} is missing")))
}

fn map_status(status: StatusCode, body: String) -> EnrichmentError {
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("").to_string()
    } else {
        body
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            EnrichmentError::AuthenticationFailed(message)
        }
        s if s.is_server_error() => EnrichmentError::ServerError {
            status: s.as_u16(),
            message,
        },
        s => EnrichmentError::ClientError {
            status: s.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl NarrativeEnricher for AzureOpenAiEnricher {
    fn name(&self) -> &'static str {
        "azure-openai"
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn request(&self, prompt: &str) -> Result<String, EnrichmentError> {
        let body = ChatRequest {
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(deployment = %self.deployment, "Requesting narrative");

        let response = self
            .client
            .post(&self.url)
            .header("api-key", self.api_key.expose_secret().as_ref())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnrichmentError::Timeout(e.to_string())
                } else {
                    EnrichmentError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| EnrichmentError::InvalidResponse("response has no completion text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use mockito::Matcher;
    use serde_json::json;

    fn config(endpoint: &str) -> LlmConfig {
        LlmConfig {
            enabled: true,
            endpoint: Some(endpoint.to_string()),
            api_key: Some(secret_string("test-key".to_string())),
            deployment: Some("notes".to_string()),
            timeout_seconds: 5,
            ..Default::default()
        }
    }

    fn completion(content: &str) -> String {
        json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    #[test]
    fn test_url_layout() {
        let enricher =
            AzureOpenAiEnricher::new(&config("https://example.openai.azure.com/"), Locale::base())
                .unwrap();
        assert_eq!(
            enricher.url(),
            "https://example.openai.azure.com/openai/deployments/notes/chat/completions?api-version=2024-02-01"
        );
    }

    #[test]
    fn test_system_prompt_follows_locale() {
        let enricher =
            AzureOpenAiEnricher::new(&config("https://example.com"), Locale::ireland()).unwrap();
        assert!(enricher.system_prompt().contains("Irish healthcare"));
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let mut cfg = config("https://example.com");
        cfg.api_key = None;
        let err = AzureOpenAiEnricher::new(&cfg, Locale::base()).err().unwrap();
        assert!(matches!(err, EnrichmentError::NotConfigured(_)));
    }

    #[test]
    fn test_map_status() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, String::new()),
            EnrichmentError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_GATEWAY, "upstream".to_string()),
            EnrichmentError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            EnrichmentError::ClientError { status: 429, .. }
        ));
    }

    #[tokio::test]
    async fn test_request_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/openai/deployments/notes/chat/completions")
            .match_query(Matcher::UrlEncoded(
                "api-version".to_string(),
                "2024-02-01".to_string(),
            ))
            .match_header("api-key", "test-key")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({"max_tokens": 150})),
                Matcher::Regex(r#""role":"user","content":"Describe asthma""#.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion(" Mild intermittent asthma, well controlled. "))
            .create_async()
            .await;

        let enricher = AzureOpenAiEnricher::new(&config(&server.url()), Locale::base()).unwrap();
        let text = enricher.request("Describe asthma").await.unwrap();

        assert_eq!(text, "Mild intermittent asthma, well controlled.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_becomes_none() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .expect(1)
            .create_async()
            .await;

        let enricher = AzureOpenAiEnricher::new(&config(&server.url()), Locale::base()).unwrap();
        let err = enricher.request("prompt").await.unwrap_err();
        assert!(matches!(err, EnrichmentError::ServerError { status: 500, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_enrich_sends_exactly_one_request_on_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .with_status(401)
            .expect(1)
            .create_async()
            .await;

        let enricher = AzureOpenAiEnricher::new(&config(&server.url()), Locale::base()).unwrap();
        assert_eq!(enricher.enrich("prompt").await, None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body("{\"choices\": []}")
            .create_async()
            .await;

        let enricher = AzureOpenAiEnricher::new(&config(&server.url()), Locale::base()).unwrap();
        let err = enricher.request("prompt").await.unwrap_err();
        assert!(matches!(err, EnrichmentError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connection_failure() {
        let enricher =
            AzureOpenAiEnricher::new(&config("http://127.0.0.1:9"), Locale::base()).unwrap();
        let err = enricher.request("prompt").await.unwrap_err();
        assert!(matches!(
            err,
            EnrichmentError::ConnectionFailed(_) | EnrichmentError::Timeout(_)
        ));
    }
}
