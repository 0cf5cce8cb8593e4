use futures::future::{AbortRegistration, Abortable};
use hn_core::{Error, GenerationClient, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use url::Url;

use crate::InferenceConfig;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for a locally hosted Ollama `/api/generate` endpoint.
pub struct OllamaClient {
    client: Client,
    endpoint: Url,
    model_name: String,
}

impl fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaClient")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint.as_str())
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OllamaClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let mut base = Url::parse(&config.model_url)
            .map_err(|e| Error::Config(format!("Invalid model URL {}: {}", config.model_url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join("api/generate")
            .map_err(|e| Error::Config(format!("Invalid model URL {}: {}", config.model_url, e)))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
            model_name: config.model_name.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model_name,
            prompt,
            stream: false,
        };
        debug!("Sending {} byte prompt to {}", prompt.len(), self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                Error::Network(e.to_string())
            } else {
                Error::Protocol(e.to_string())
            }
        })?;

        // An error field wins even on a 2xx status.
        if let Some(message) = body.error.filter(|e| !e.trim().is_empty()) {
            return Err(Error::Generation {
                status: status.as_u16(),
                message,
            });
        }

        let text = body
            .response
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .ok_or_else(|| Error::Protocol("No response text from generation service".to_string()))?;
        debug!("Received {} bytes of generated text", text.len());
        Ok(text)
    }
}

#[async_trait::async_trait]
impl GenerationClient for OllamaClient {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn generate(&self, prompt: &str, abort: Option<AbortRegistration>) -> Result<String> {
        match abort {
            Some(registration) => Abortable::new(self.send(prompt), registration)
                .await
                .map_err(|_| Error::Cancelled)?,
            None => self.send(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
    use futures::future::AbortHandle;
    use serde_json::{json, Value};
    use std::time::Duration;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(url: &str) -> OllamaClient {
        OllamaClient::new(&InferenceConfig {
            model_url: url.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    async fn echo(Json(body): Json<Value>) -> impl IntoResponse {
        if body["prompt"] == "slow" {
            tokio::time::sleep(Duration::from_secs(10)).await;
        }
        let echoed = format!("  {}|{}|{}\n", body["model"], body["stream"], body["prompt"]);
        Json(json!({ "model": body["model"], "response": echoed, "done": true }))
    }

    #[test]
    fn test_endpoint_joins_base_path() {
        assert_eq!(
            client_for("http://localhost:11434").endpoint().as_str(),
            "http://localhost:11434/api/generate"
        );
        assert_eq!(
            client_for("http://gpu-box:8080/ollama").endpoint().as_str(),
            "http://gpu-box:8080/ollama/api/generate"
        );
        let invalid = OllamaClient::new(&InferenceConfig {
            model_url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(invalid, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_generate_sends_model_prompt_and_no_stream() {
        let url = serve(Router::new().route("/api/generate", post(echo))).await;
        let text = client_for(&url).generate("hello", None).await.unwrap();
        assert_eq!(text, r#""llama3.2"|false|"hello""#);
    }

    #[tokio::test]
    async fn test_non_success_status_is_generation_error() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
        );
        let url = serve(router).await;
        match client_for(&url).generate("hello", None).await {
            Err(Error::Generation { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "model crashed");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_field_is_generation_error() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async { Json(json!({ "response": "ignored", "error": "model 'llama3.2' not found" })) }),
        );
        let url = serve(router).await;
        match client_for(&url).generate("hello", None).await {
            Err(Error::Generation { status, message }) => {
                assert_eq!(status, 200);
                assert_eq!(message, "model 'llama3.2' not found");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_text_is_protocol_error() {
        let router = Router::new()
            .route("/api/generate", post(|| async { Json(json!({ "done": true })) }));
        let url = serve(router).await;
        let err = client_for(&url).generate("hello", None).await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));

        let router = Router::new()
            .route("/api/generate", post(|| async { Json(json!({ "response": "   " })) }));
        let url = serve(router).await;
        let err = client_for(&url).generate("hello", None).await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));

        let router = Router::new().route("/api/generate", post(|| async { "not json" }));
        let url = serve(router).await;
        let err = client_for(&url).generate("hello", None).await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[tokio::test]
    async fn test_timeout_while_reading_body_is_network_error() {
        use axum::body::Body;
        use futures::stream;

        let router = Router::new().route(
            "/api/generate",
            post(|| async {
                let chunks = stream::unfold(0u8, |step| async move {
                    match step {
                        0 => Some((Ok::<_, std::io::Error>("{\"response\": \"par"), 1)),
                        _ => {
                            tokio::time::sleep(Duration::from_secs(10)).await;
                            None
                        }
                    }
                });
                (
                    [(axum::http::header::CONTENT_TYPE, "application/json")],
                    Body::from_stream(Box::pin(chunks)),
                )
            }),
        );
        let url = serve(router).await;
        let client = OllamaClient::new(&InferenceConfig {
            model_url: url,
            timeout: Some(Duration::from_millis(300)),
            ..Default::default()
        })
        .unwrap();

        let err = client.generate("hello", None).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)), "unexpected error: {:?}", err);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{}", addr))
            .generate("hello", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_abort_cancels_only_its_request() {
        let url = serve(Router::new().route("/api/generate", post(echo))).await;
        let client = std::sync::Arc::new(client_for(&url));

        let (handle, registration) = AbortHandle::new_pair();
        let slow = {
            let client = client.clone();
            tokio::spawn(async move { client.generate("slow", Some(registration)).await })
        };
        let (_sibling_handle, sibling_registration) = AbortHandle::new_pair();
        let fast = {
            let client = client.clone();
            tokio::spawn(async move { client.generate("fast", Some(sibling_registration)).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        let slow = tokio::time::timeout(Duration::from_secs(5), slow).await.unwrap().unwrap();
        assert!(matches!(slow, Err(Error::Cancelled)));
        let fast = fast.await.unwrap().unwrap();
        assert!(fast.ends_with(r#""fast""#));
    }
}
