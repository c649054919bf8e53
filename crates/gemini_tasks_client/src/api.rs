//! Gemini access trait and client construction.

use crate::{
    GenerateContentRequest, GenerateContentResponse, GenerateVideosConfig, GenerateVideosSource,
    GeminiClient, Video, VideoOperation,
};
use async_trait::async_trait;
use gemini_tasks_error::GeminiError;
use std::path::Path;

/// Operations the tasks need from the Gemini service.
#[async_trait]
pub trait GeminiApi: Send + Sync {
    /// True when requests are routed through Vertex AI.
    fn is_vertex_ai(&self) -> bool;

    /// Generate content for the given turns.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError>;

    /// Start a video generation job.
    async fn generate_videos(
        &self,
        model: &str,
        source: &GenerateVideosSource,
        config: &GenerateVideosConfig,
    ) -> Result<VideoOperation, GeminiError>;

    /// Fetch the current state of a video generation job.
    async fn get_videos_operation(
        &self,
        operation: &VideoOperation,
    ) -> Result<VideoOperation, GeminiError>;

    /// Download a generated video to a local file.
    async fn download_video(&self, video: &Video, path: &Path) -> Result<(), GeminiError>;
}

/// Which service the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Gemini Developer API, authenticated by API key
    GeminiApi {
        /// API key
        api_key: String,
    },
    /// Vertex AI, scoped to a project and region
    VertexAi {
        /// Google Cloud project id
        project: String,
        /// Region, e.g. `us-central1`
        location: String,
        /// OAuth access token sent as a bearer token, when the caller has one
        access_token: Option<String>,
    },
}

/// Settings for building a client.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ClientSettings {
    /// Target service
    backend: Backend,
    /// Overrides the service root URL
    base_url: Option<String>,
}

impl ClientSettings {
    /// Settings for the Gemini API.
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self {
            backend: Backend::GeminiApi {
                api_key: api_key.into(),
            },
            base_url: None,
        }
    }

    /// Settings for Vertex AI.
    pub fn vertex_ai(
        project: impl Into<String>,
        location: impl Into<String>,
        access_token: Option<String>,
    ) -> Self {
        Self {
            backend: Backend::VertexAi {
                project: project.into(),
                location: location.into(),
                access_token,
            },
            base_url: None,
        }
    }

    /// Replaces the service root URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// True for Vertex AI settings.
    pub fn is_vertex_ai(&self) -> bool {
        matches!(self.backend, Backend::VertexAi { .. })
    }
}

/// Creates clients from rendered task settings.
pub trait ClientFactory: Send + Sync {
    /// Client type produced.
    type Client: GeminiApi;

    /// Build a client.
    fn create(&self, settings: ClientSettings) -> Result<Self::Client, GeminiError>;
}

/// Factory producing HTTP clients.
#[derive(Debug, Clone, Default)]
pub struct HttpClientFactory {
    base_url: Option<String>,
}

impl HttpClientFactory {
    /// Factory using the public service URLs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory pointing every client at another root URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
        }
    }
}

impl ClientFactory for HttpClientFactory {
    type Client = GeminiClient;

    fn create(&self, settings: ClientSettings) -> Result<GeminiClient, GeminiError> {
        let settings = match (&self.base_url, settings.base_url.is_some()) {
            (Some(base_url), false) => settings.with_base_url(base_url.clone()),
            _ => settings,
        };
        GeminiClient::new(settings)
    }
}
