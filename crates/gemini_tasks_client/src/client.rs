//! HTTP client for the Gemini API and Vertex AI.

use crate::dto::ApiErrorEnvelope;
use crate::video::RawOperation;
use crate::{
    Backend, ClientSettings, GeminiApi, GenerateContentRequest, GenerateContentResponse,
    GenerateVideosConfig, GenerateVideosSource, Video, VideoOperation,
};
use async_trait::async_trait;
use gemini_tasks_error::{GeminiError, GeminiErrorKind};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, error, instrument};
use url::Url;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const GEMINI_API_VERSION: &str = "v1beta";
const VERTEX_API_VERSION: &str = "v1";

/// Body of a `predictLongRunning` call.
#[derive(Serialize)]
struct PredictLongRunningRequest<'a> {
    instances: [&'a GenerateVideosSource; 1],
    parameters: &'a GenerateVideosConfig,
}

/// Body of a Vertex AI `fetchPredictOperation` call.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchOperationRequest<'a> {
    operation_name: &'a str,
}

/// Client for one backend, built from [`ClientSettings`].
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    settings: ClientSettings,
    base_url: String,
}

impl GeminiClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is malformed or the HTTP client
    /// cannot be built.
    #[instrument(skip(settings), fields(vertex_ai = settings.is_vertex_ai()))]
    pub fn new(settings: ClientSettings) -> Result<Self, GeminiError> {
        let base_url = match (settings.base_url(), settings.backend()) {
            (Some(url), _) => url.clone(),
            (None, Backend::GeminiApi { .. }) => GEMINI_BASE_URL.to_string(),
            (None, Backend::VertexAi { location, .. }) => {
                format!("https://{}-aiplatform.googleapis.com", location)
            }
        };

        Url::parse(&base_url).map_err(|e| {
            GeminiError::new(GeminiErrorKind::ClientCreation(format!(
                "Invalid base URL '{}': {}",
                base_url, e
            )))
        })?;

        let client = Client::builder().build().map_err(|e| {
            GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string()))
        })?;

        debug!(base_url = %base_url, "Created Gemini client");

        Ok(Self {
            client,
            settings,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Settings this client was built from.
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        let model = model.trim_start_matches("models/");
        match self.settings.backend() {
            Backend::GeminiApi { .. } => format!(
                "{}/{}/models/{}:{}",
                self.base_url, GEMINI_API_VERSION, model, method
            ),
            Backend::VertexAi {
                project, location, ..
            } => format!(
                "{}/{}/projects/{}/locations/{}/publishers/google/models/{}:{}",
                self.base_url, VERTEX_API_VERSION, project, location, model, method
            ),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.settings.backend() {
            Backend::GeminiApi { api_key } => request.header("x-goog-api-key", api_key),
            Backend::VertexAi {
                access_token: Some(token),
                ..
            } => request.bearer_auth(token),
            Backend::VertexAi {
                access_token: None,
                ..
            } => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GeminiError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            error!(error = ?e, "HTTP request failed");
            GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string()))
        })?;
        check_status(response).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GeminiError> {
        let response = self.send(request).await?;
        let body = response.text().await.map_err(|e| {
            GeminiError::new(GeminiErrorKind::ApiRequest(format!(
                "Failed to read response body: {}",
                e
            )))
        })?;
        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse response");
            GeminiError::new(GeminiErrorKind::ResponseParsing(e.to_string()))
        })
    }
}

/// Turns a non-success response into an error carrying the API message.
async fn check_status(response: Response) -> Result<Response, GeminiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) => format!("{} ({})", envelope.error.message, code),
            None => envelope.error.message,
        },
        Err(_) => body,
    };
    error!(status = %status, error = %message, "API error");

    Err(GeminiError::new(GeminiErrorKind::HttpError {
        status_code: status.as_u16(),
        message,
    }))
}

#[async_trait]
impl GeminiApi for GeminiClient {
    fn is_vertex_ai(&self) -> bool {
        self.settings.is_vertex_ai()
    }

    #[instrument(skip(self, request), fields(model = %model, turns = request.contents.len()))]
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = self.model_url(model, "generateContent");
        debug!(url = %url, "Sending generateContent request");

        let response: GenerateContentResponse =
            self.send_json(self.client.post(&url).json(request)).await?;

        debug!(
            candidates = response.candidate_list().len(),
            "Received generateContent response"
        );
        Ok(response)
    }

    #[instrument(skip(self, source, config), fields(model = %model))]
    async fn generate_videos(
        &self,
        model: &str,
        source: &GenerateVideosSource,
        config: &GenerateVideosConfig,
    ) -> Result<VideoOperation, GeminiError> {
        let url = self.model_url(model, "predictLongRunning");
        let body = PredictLongRunningRequest {
            instances: [source],
            parameters: config,
        };
        debug!(url = %url, "Starting video generation");

        let raw: RawOperation = self.send_json(self.client.post(&url).json(&body)).await?;
        let operation = raw.into_operation(model);

        debug!(operation = %operation.name, "Video generation started");
        Ok(operation)
    }

    #[instrument(skip(self, operation), fields(operation = %operation.name))]
    async fn get_videos_operation(
        &self,
        operation: &VideoOperation,
    ) -> Result<VideoOperation, GeminiError> {
        let request = match self.settings.backend() {
            Backend::GeminiApi { .. } => self.client.get(format!(
                "{}/{}/{}",
                self.base_url, GEMINI_API_VERSION, operation.name
            )),
            Backend::VertexAi { .. } => self
                .client
                .post(self.model_url(&operation.model, "fetchPredictOperation"))
                .json(&FetchOperationRequest {
                    operation_name: &operation.name,
                }),
        };

        let raw: RawOperation = self.send_json(request).await?;
        Ok(raw.into_operation(&operation.model))
    }

    #[instrument(skip(self, video), fields(path = %path.display()))]
    async fn download_video(&self, video: &Video, path: &Path) -> Result<(), GeminiError> {
        if self.is_vertex_ai() {
            return Err(GeminiError::new(GeminiErrorKind::Download(
                "Vertex AI videos are written to Cloud Storage and cannot be downloaded here"
                    .to_string(),
            )));
        }

        let uri = video.uri.as_deref().filter(|uri| !uri.is_empty()).ok_or_else(|| {
            GeminiError::new(GeminiErrorKind::Download("Video has no URI".to_string()))
        })?;

        let response = self.send(self.client.get(uri)).await?;
        let bytes = response.bytes().await.map_err(|e| {
            GeminiError::new(GeminiErrorKind::Download(format!(
                "Failed to read video body: {}",
                e
            )))
        })?;

        tokio::fs::write(path, &bytes).await.map_err(|e| {
            GeminiError::new(GeminiErrorKind::Download(format!(
                "Failed to write {}: {}",
                path.display(),
                e
            )))
        })?;

        debug!(bytes = bytes.len(), "Video downloaded");
        Ok(())
    }
}
