//! Video generation request and long-running operation types.
//!
//! The Gemini API and Vertex AI shape the finished operation differently;
//! both are normalised into [`GenerateVideosResponse`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What to generate a video from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateVideosSource {
    /// Text prompt
    pub prompt: String,
}

impl GenerateVideosSource {
    /// Creates a text-to-video source.
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Video generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, derive_setters::Setters)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", strip_option, into)]
pub struct GenerateVideosConfig {
    /// Number of videos to generate
    #[serde(rename = "sampleCount", skip_serializing_if = "Option::is_none")]
    pub number_of_videos: Option<i32>,
    /// Seed for deterministic output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// What the video should not show
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Length of the video
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i32>,
    /// Generate an audio track
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_audio: Option<bool>,
    /// Cloud Storage destination (Vertex AI)
    #[serde(rename = "storageUri", skip_serializing_if = "Option::is_none")]
    pub output_gcs_uri: Option<String>,
}

/// A generated video file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Download URI or Cloud Storage URI
    #[serde(default)]
    pub uri: Option<String>,
    /// MIME type, e.g. `video/mp4`
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// One entry of the generated videos list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratedVideo {
    /// The video, absent when filtered
    #[serde(default)]
    pub video: Option<Video>,
}

/// Result of a finished video operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideosResponse {
    /// Generated videos in order
    #[serde(default)]
    pub generated_videos: Vec<GeneratedVideo>,
    /// Number of videos removed by responsible-AI filters
    #[serde(default)]
    pub rai_media_filtered_count: Option<i32>,
}

/// Handle of a long-running video generation job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoOperation {
    /// Operation resource name
    pub name: String,
    /// Whether the job finished
    #[serde(default)]
    pub done: Option<bool>,
    /// Backend-defined progress metadata
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
    /// Result, present once done and successful
    #[serde(default)]
    pub response: Option<GenerateVideosResponse>,
    /// Error details, present once done and failed
    #[serde(default)]
    pub error: Option<Value>,
    /// Model that started the job, needed to poll on Vertex AI
    #[serde(default)]
    pub model: String,
}

impl VideoOperation {
    /// True once the backend reports completion.
    pub fn is_done(&self) -> bool {
        self.done.unwrap_or(false)
    }
}

/// Operation as sent over the wire by either backend.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawOperation {
    #[serde(default)]
    name: String,
    #[serde(default)]
    done: Option<bool>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
    #[serde(default)]
    response: Option<RawVideosResponse>,
    #[serde(default)]
    error: Option<Value>,
}

impl RawOperation {
    pub(crate) fn into_operation(self, model: &str) -> VideoOperation {
        VideoOperation {
            name: self.name,
            done: self.done,
            metadata: self.metadata,
            response: self.response.map(RawVideosResponse::normalize),
            error: self.error,
            model: model.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVideosResponse {
    #[serde(default)]
    generate_video_response: Option<RawGeminiVideos>,
    #[serde(default)]
    videos: Option<Vec<RawVertexVideo>>,
    #[serde(default)]
    rai_media_filtered_count: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGeminiVideos {
    #[serde(default)]
    generated_samples: Vec<RawSample>,
    #[serde(default)]
    rai_media_filtered_count: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawSample {
    #[serde(default)]
    video: Option<RawGeminiVideo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGeminiVideo {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default, alias = "encoding")]
    mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVertexVideo {
    #[serde(default)]
    gcs_uri: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

impl RawVideosResponse {
    fn normalize(self) -> GenerateVideosResponse {
        if let Some(gemini) = self.generate_video_response {
            return GenerateVideosResponse {
                generated_videos: gemini
                    .generated_samples
                    .into_iter()
                    .map(|sample| GeneratedVideo {
                        video: sample.video.map(|video| Video {
                            uri: video.uri,
                            mime_type: video.mime_type,
                        }),
                    })
                    .collect(),
                rai_media_filtered_count: gemini.rai_media_filtered_count,
            };
        }

        GenerateVideosResponse {
            generated_videos: self
                .videos
                .unwrap_or_default()
                .into_iter()
                .map(|video| GeneratedVideo {
                    video: Some(Video {
                        uri: video.gcs_uri,
                        mime_type: video.mime_type,
                    }),
                })
                .collect(),
            rai_media_filtered_count: self.rai_media_filtered_count,
        }
    }
}
