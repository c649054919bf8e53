//! Task definitions loaded from files and dispatched by type.

use crate::{
    ChatCompletion, ChatCompletionOutput, MultimodalCompletion, MultimodalCompletionOutput,
    RunnableTask, StructuredOutputCompletion, StructuredOutputCompletionOutput, TextCompletion,
    TextCompletionOutput, VideoGeneration, VideoGenerationOutput,
};
use gemini_tasks_client::ClientFactory;
use gemini_tasks_core::TaskState;
use gemini_tasks_error::{ConfigError, ConfigErrorKind, GeminiTasksResult};
use gemini_tasks_interface::RunContext;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Serialization format of a task definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DefinitionFormat {
    /// TOML
    Toml,
    /// YAML
    #[strum(serialize = "yaml", serialize = "yml")]
    Yaml,
    /// JSON
    Json,
}

impl DefinitionFormat {
    /// Format implied by a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(|extension| extension.parse().ok())
    }
}

/// Any task, tagged by its `type` field.
///
/// ```
/// use gemini_tasks::{DefinitionFormat, TaskDefinition};
///
/// let yaml = r#"
/// type: TextCompletion
/// apiKey: "{{ env.GEMINI_API_KEY }}"
/// model: gemini-2.5-flash
/// prompt: Summarize the plot of Hamlet in one sentence.
/// "#;
/// let task = TaskDefinition::parse(yaml, DefinitionFormat::Yaml).unwrap();
/// assert_eq!(task.kind(), "TextCompletion");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "type")]
pub enum TaskDefinition {
    /// Single prompt completion
    TextCompletion(TextCompletion),
    /// Multi-turn chat
    ChatCompletion(ChatCompletion),
    /// JSON answer constrained by a schema
    StructuredOutputCompletion(StructuredOutputCompletion),
    /// Text and media inputs
    MultimodalCompletion(MultimodalCompletion),
    /// Veo video generation
    VideoGeneration(VideoGeneration),
}

/// Output of any task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskOutput {
    /// Output of [`TextCompletion`]
    TextCompletion(TextCompletionOutput),
    /// Output of [`ChatCompletion`]
    ChatCompletion(ChatCompletionOutput),
    /// Output of [`StructuredOutputCompletion`]
    StructuredOutputCompletion(StructuredOutputCompletionOutput),
    /// Output of [`MultimodalCompletion`]
    MultimodalCompletion(MultimodalCompletionOutput),
    /// Output of [`VideoGeneration`]
    VideoGeneration(VideoGenerationOutput),
}

impl TaskOutput {
    /// Final state hint for the orchestrator.
    pub fn final_state(&self) -> TaskState {
        match self {
            TaskOutput::MultimodalCompletion(output) => output.final_state(),
            _ => TaskState::Success,
        }
    }
}

impl TaskDefinition {
    /// Parses a definition from text.
    pub fn parse(content: &str, format: DefinitionFormat) -> GeminiTasksResult<Self> {
        let parsed = match format {
            DefinitionFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            DefinitionFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            DefinitionFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| {
            ConfigError::new(ConfigErrorKind::DefinitionParse {
                format: format.to_string(),
                message,
            })
            .into()
        })
    }

    /// Loads a definition, picking the format from the file extension.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> GeminiTasksResult<Self> {
        let path = path.as_ref();
        let format = DefinitionFormat::from_path(path).ok_or_else(|| {
            ConfigError::new(ConfigErrorKind::UnsupportedExtension(
                path.display().to_string(),
            ))
        })?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(ConfigErrorKind::DefinitionRead {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        let definition = Self::parse(&content, format)?;
        debug!(kind = definition.kind(), "Loaded task definition");
        Ok(definition)
    }

    /// Name of the task type.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Renders and checks the inputs without calling the API.
    pub fn validate(&self, ctx: &dyn RunContext) -> GeminiTasksResult<()> {
        match self {
            TaskDefinition::TextCompletion(task) => task.validate(ctx),
            TaskDefinition::ChatCompletion(task) => task.validate(ctx),
            TaskDefinition::StructuredOutputCompletion(task) => task.validate(ctx),
            TaskDefinition::MultimodalCompletion(task) => task.validate(ctx),
            TaskDefinition::VideoGeneration(task) => task.validate(ctx),
        }
    }

    /// Runs the task.
    pub async fn run<F: ClientFactory>(
        &self,
        ctx: &dyn RunContext,
        clients: &F,
    ) -> GeminiTasksResult<TaskOutput> {
        Ok(match self {
            TaskDefinition::TextCompletion(task) => {
                TaskOutput::TextCompletion(task.run(ctx, clients).await?)
            }
            TaskDefinition::ChatCompletion(task) => {
                TaskOutput::ChatCompletion(task.run(ctx, clients).await?)
            }
            TaskDefinition::StructuredOutputCompletion(task) => {
                TaskOutput::StructuredOutputCompletion(task.run(ctx, clients).await?)
            }
            TaskDefinition::MultimodalCompletion(task) => {
                TaskOutput::MultimodalCompletion(task.run(ctx, clients).await?)
            }
            TaskDefinition::VideoGeneration(task) => {
                TaskOutput::VideoGeneration(task.run(ctx, clients).await?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DefinitionFormat::from_path(Path::new("task.yml")),
            Some(DefinitionFormat::Yaml)
        );
        assert_eq!(
            DefinitionFormat::from_path(Path::new("task.TOML")),
            Some(DefinitionFormat::Toml)
        );
        assert_eq!(DefinitionFormat::from_path(Path::new("task.txt")), None);
    }

    #[test]
    fn test_video_definition_from_toml() {
        let toml = r#"
type = "VideoGeneration"
apiKey = "key"
model = "veo-3.0-generate-001"
prompt = "A paper boat drifting down a rainy street"
durationInSeconds = 8
vertexAI = true
outputGcsUri = "gs://bucket/videos/"
project = "my-project"
location = "us-central1"
timeout = "10m"
"#;
        let task = TaskDefinition::parse(toml, DefinitionFormat::Toml).unwrap();
        assert_eq!(task.kind(), "VideoGeneration");
        match task {
            TaskDefinition::VideoGeneration(video) => {
                assert_eq!(video.vertex_ai().raw(), &serde_json::json!(true));
                assert_eq!(video.timeout().raw(), &serde_json::json!("10m"));
            }
            other => panic!("unexpected task {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_a_config_error() {
        let err = TaskDefinition::parse(r#"{"type": "ImageEdit"}"#, DefinitionFormat::Json)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to parse json task definition"));
    }
}
