//! Text-to-video generation with Veo models.

use crate::{RunnableTask, TaskBase};
use async_trait::async_trait;
use derive_getters::Getters;
use gemini_tasks_client::{
    ClientFactory, ClientSettings, GeminiApi, GenerateVideosConfig, GenerateVideosSource,
    VideoOperation,
};
use gemini_tasks_error::{
    GeminiTasksResult, ValidationError, ValidationErrorKind, VideoGenerationError,
    VideoGenerationErrorKind,
};
use gemini_tasks_interface::{HumanDuration, Property, RunContext};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};

/// Shortest accepted video, in seconds.
pub const MIN_DURATION_SECONDS: i64 = 1;
/// Longest accepted video, in seconds.
pub const MAX_DURATION_SECONDS: i64 = 60;
/// Video length when none is configured.
pub const DEFAULT_DURATION_SECONDS: i64 = 10;
/// How long to wait for the operation when no timeout is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);
/// Delay between two operation polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Generates a video from a prompt.
///
/// On the Gemini API the video is downloaded to a local file. On Vertex AI it
/// is written by the service to a Cloud Storage prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct VideoGeneration {
    /// API key and model
    #[serde(flatten)]
    base: TaskBase,
    /// What the video should show
    prompt: Property<String>,
    /// What the video should not show
    #[serde(default)]
    #[builder(default)]
    negative_prompt: Property<String>,
    /// Length in seconds, between 1 and 60
    #[serde(default)]
    #[builder(default)]
    duration_in_seconds: Property<i64>,
    /// Generate an audio track (Vertex AI)
    #[serde(default)]
    #[builder(default)]
    include_audio: Property<bool>,
    /// Upper bound on the wait for the operation, e.g. `5m`
    #[serde(default)]
    #[builder(default)]
    timeout: Property<HumanDuration>,
    /// Seed for deterministic output
    #[serde(default)]
    #[builder(default)]
    seed: Property<i64>,
    /// Number of videos to request
    #[serde(default)]
    #[builder(default)]
    number_of_videos: Property<i32>,
    /// Route the request through Vertex AI
    #[serde(default, rename = "vertexAI")]
    #[builder(default)]
    vertex_ai: Property<bool>,
    /// Cloud Storage prefix for the output (Vertex AI)
    #[serde(default)]
    #[builder(default)]
    output_gcs_uri: Property<String>,
    /// Google Cloud project (Vertex AI)
    #[serde(default)]
    #[builder(default)]
    project: Property<String>,
    /// Google Cloud region (Vertex AI)
    #[serde(default)]
    #[builder(default)]
    location: Property<String>,
    /// Local destination of the video (Gemini API)
    #[serde(default)]
    #[builder(default)]
    download_file_path: Property<String>,
}

/// Output of [`VideoGeneration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct VideoGenerationOutput {
    /// URI of the generated video
    video_uri: Option<String>,
    /// MIME type of the generated video
    mime_type: Option<String>,
    /// Metadata of the started operation
    metadata: Option<Map<String, Value>>,
}

/// Inputs after rendering and validation.
#[derive(Debug, Clone)]
struct VideoRequest {
    model: String,
    prompt: String,
    duration_seconds: i64,
    include_audio: bool,
    timeout: Duration,
    number_of_videos: i32,
    seed: Option<i64>,
    negative_prompt: Option<String>,
    destination: Destination,
}

#[derive(Clone)]
enum Destination {
    Vertex {
        output_gcs_uri: String,
        project: Option<String>,
        location: Option<String>,
        access_token: Option<String>,
    },
    Local {
        api_key: String,
        path: PathBuf,
    },
}

impl std::fmt::Debug for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Vertex {
                output_gcs_uri,
                project,
                location,
                ..
            } => f
                .debug_struct("Vertex")
                .field("output_gcs_uri", output_gcs_uri)
                .field("project", project)
                .field("location", location)
                .finish(),
            Destination::Local { path, .. } => {
                f.debug_struct("Local").field("path", path).finish()
            }
        }
    }
}

/// `genai_video_{epoch millis}.mp4` in the working directory.
fn default_download_path() -> String {
    format!("genai_video_{}.mp4", chrono::Utc::now().timestamp_millis())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl VideoGeneration {
    /// Starts a builder.
    pub fn builder() -> VideoGenerationBuilder {
        VideoGenerationBuilder::default()
    }

    fn render_request(&self, ctx: &dyn RunContext) -> GeminiTasksResult<VideoRequest> {
        let base = self.base.render(ctx)?;
        let prompt = self.prompt.render_required("prompt", ctx)?;

        let duration_seconds = self
            .duration_in_seconds
            .render("durationInSeconds", ctx)?
            .unwrap_or(DEFAULT_DURATION_SECONDS);
        if !(MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&duration_seconds) {
            return Err(ValidationError::new(ValidationErrorKind::DurationOutOfRange {
                min: MIN_DURATION_SECONDS,
                max: MAX_DURATION_SECONDS,
                actual: duration_seconds,
            })
            .into());
        }

        let vertex_ai = self.vertex_ai.render("vertexAI", ctx)?.unwrap_or(false);
        let output_gcs_uri = non_blank(self.output_gcs_uri.render("outputGcsUri", ctx)?);
        let download_file_path = match self.download_file_path.render("downloadFilePath", ctx)? {
            Some(path) => path,
            None => default_download_path(),
        };

        let destination = if vertex_ai {
            let output_gcs_uri = output_gcs_uri.ok_or_else(|| {
                ValidationError::new(ValidationErrorKind::MissingOutputGcsUri)
            })?;
            Destination::Vertex {
                output_gcs_uri,
                project: non_blank(self.project.render("project", ctx)?),
                location: non_blank(self.location.render("location", ctx)?),
                access_token: non_blank(Some(base.api_key.clone())),
            }
        } else {
            if download_file_path.trim().is_empty() {
                return Err(
                    ValidationError::new(ValidationErrorKind::MissingDownloadFilePath).into(),
                );
            }
            Destination::Local {
                api_key: base.api_key.clone(),
                path: PathBuf::from(download_file_path),
            }
        };

        Ok(VideoRequest {
            model: base.model,
            prompt,
            duration_seconds,
            include_audio: self.include_audio.render("includeAudio", ctx)?.unwrap_or(false),
            timeout: self
                .timeout
                .render("timeout", ctx)?
                .map(|timeout| timeout.0)
                .unwrap_or(DEFAULT_TIMEOUT),
            number_of_videos: self
                .number_of_videos
                .render("numberOfVideos", ctx)?
                .unwrap_or(1),
            seed: self.seed.render("seed", ctx)?,
            negative_prompt: non_blank(self.negative_prompt.render("negativePrompt", ctx)?),
            destination,
        })
    }
}

impl VideoRequest {
    fn client_settings(&self) -> GeminiTasksResult<ClientSettings> {
        match &self.destination {
            Destination::Vertex {
                project,
                location,
                access_token,
                ..
            } => {
                let project = project.clone().ok_or_else(|| {
                    ValidationError::new(ValidationErrorKind::MissingVertexSetting(
                        "project".to_string(),
                    ))
                })?;
                let location = location.clone().ok_or_else(|| {
                    ValidationError::new(ValidationErrorKind::MissingVertexSetting(
                        "location".to_string(),
                    ))
                })?;
                Ok(ClientSettings::vertex_ai(
                    project,
                    location,
                    access_token.clone(),
                ))
            }
            Destination::Local { api_key, .. } => Ok(ClientSettings::gemini(api_key.clone())),
        }
    }

    fn config(&self) -> GenerateVideosConfig {
        let mut config = GenerateVideosConfig::default().with_number_of_videos(self.number_of_videos);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(negative_prompt) = &self.negative_prompt {
            config = config.with_negative_prompt(negative_prompt.clone());
        }
        if let Destination::Vertex { output_gcs_uri, .. } = &self.destination {
            // Range checked during rendering.
            config = config
                .with_duration_seconds(self.duration_seconds as i32)
                .with_generate_audio(self.include_audio)
                .with_output_gcs_uri(output_gcs_uri.clone());
        }
        config
    }
}

/// Polls until the operation is done or the timeout elapses.
///
/// The elapsed time is checked before every poll.
async fn wait_for_completion<A: GeminiApi + ?Sized>(
    client: &A,
    mut operation: VideoOperation,
    timeout: Duration,
) -> GeminiTasksResult<VideoOperation> {
    let started = Instant::now();
    while !operation.is_done() {
        if started.elapsed() > timeout {
            return Err(VideoGenerationError::new(VideoGenerationErrorKind::Timeout {
                minutes: timeout.as_secs() / 60,
            })
            .into());
        }
        tokio::time::sleep(POLL_INTERVAL).await;
        info!("Waiting for operation to complete...");
        operation = client.get_videos_operation(&operation).await?;
    }
    Ok(operation)
}

/// URI and MIME type of the first generated video.
fn first_video(operation: VideoOperation) -> GeminiTasksResult<(String, Option<String>)> {
    let response = operation.response.ok_or_else(|| {
        let error = operation
            .error
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_else(|| "none".to_string());
        VideoGenerationError::new(VideoGenerationErrorKind::NoResponse(error))
    })?;

    let video = response
        .generated_videos
        .into_iter()
        .next()
        .and_then(|generated| generated.video)
        .ok_or_else(|| VideoGenerationError::new(VideoGenerationErrorKind::NoVideo))?;

    let uri = video
        .uri
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| VideoGenerationError::new(VideoGenerationErrorKind::EmptyUri))?;

    Ok((uri, video.mime_type))
}

#[async_trait]
impl RunnableTask for VideoGeneration {
    type Output = VideoGenerationOutput;

    fn validate(&self, ctx: &dyn RunContext) -> GeminiTasksResult<()> {
        let request = self.render_request(ctx)?;
        request.client_settings()?;
        Ok(())
    }

    #[instrument(skip_all, fields(task_id = %ctx.task_id()))]
    async fn run<F>(&self, ctx: &dyn RunContext, clients: &F) -> GeminiTasksResult<Self::Output>
    where
        F: ClientFactory,
    {
        let request = self.render_request(ctx)?;
        let client = clients.create(request.client_settings()?)?;

        info!(
            model = %request.model,
            duration_seconds = request.duration_seconds,
            vertex_ai = client.is_vertex_ai(),
            "Starting video generation"
        );
        let source = GenerateVideosSource::prompt(request.prompt.clone());
        let config = request.config();
        debug!(config = ?config, "Video generation config");

        let operation = client
            .generate_videos(&request.model, &source, &config)
            .await?;
        let metadata = operation.metadata.clone();

        let operation = wait_for_completion(&client, operation, request.timeout).await?;
        let (uri, mime_type) = first_video(operation)?;

        if let Destination::Local { path, .. } = &request.destination {
            let video = gemini_tasks_client::Video {
                uri: Some(uri.clone()),
                mime_type: mime_type.clone(),
            };
            match client.download_video(&video, path).await {
                Ok(()) => info!(path = %path.display(), "Video downloaded"),
                Err(e) => error!(error = %e, path = %path.display(), "Failed to download video"),
            }
        }

        info!(video_uri = %uri, "Video generation finished");
        Ok(VideoGenerationOutput {
            video_uri: Some(uri),
            mime_type,
            metadata,
        })
    }
}
