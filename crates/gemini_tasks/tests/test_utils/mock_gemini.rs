//! Scripted Gemini client for task tests.

use async_trait::async_trait;
use gemini_tasks_client::{
    ClientFactory, ClientSettings, GeminiApi, GenerateContentRequest, GenerateContentResponse,
    GenerateVideosConfig, GenerateVideosSource, Video, VideoOperation,
};
use gemini_tasks_error::{GeminiError, GeminiErrorKind};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared script and call log.
///
/// `generate_content` pops scripted responses in order. The first scripted
/// operation answers `generate_videos`; later ones answer polls. When the
/// poll script runs dry the operation stays pending.
#[derive(Default)]
pub struct MockGemini {
    responses: Mutex<VecDeque<GenerateContentResponse>>,
    requests: Mutex<Vec<(String, GenerateContentRequest)>>,
    operations: Mutex<VecDeque<VideoOperation>>,
    video_calls: Mutex<Vec<(String, GenerateVideosSource, GenerateVideosConfig)>>,
    polls: AtomicUsize,
    downloads: Mutex<Vec<PathBuf>>,
    fail_downloads: AtomicBool,
    settings: Mutex<Vec<ClientSettings>>,
}

impl MockGemini {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: GenerateContentResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn with_operation(self, operation: VideoOperation) -> Self {
        self.operations.lock().unwrap().push_back(operation);
        self
    }

    pub fn failing_downloads(self) -> Self {
        self.fail_downloads.store(true, Ordering::SeqCst);
        self
    }

    /// Model and request of every `generate_content` call.
    pub fn requests(&self) -> Vec<(String, GenerateContentRequest)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn video_calls(&self) -> Vec<(String, GenerateVideosSource, GenerateVideosConfig)> {
        self.video_calls.lock().unwrap().clone()
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn downloads(&self) -> Vec<PathBuf> {
        self.downloads.lock().unwrap().clone()
    }

    /// Settings of every client the factory created.
    pub fn settings(&self) -> Vec<ClientSettings> {
        self.settings.lock().unwrap().clone()
    }

    /// True when no scripted call reached the mock.
    pub fn untouched(&self) -> bool {
        self.requests().is_empty() && self.video_calls().is_empty() && self.polls() == 0
    }
}

/// Client handed to tasks.
#[derive(Clone)]
pub struct MockClient {
    state: Arc<MockGemini>,
    vertex_ai: bool,
}

#[async_trait]
impl GeminiApi for MockClient {
    fn is_vertex_ai(&self) -> bool {
        self.vertex_ai
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        self.state
            .requests
            .lock()
            .unwrap()
            .push((model.to_string(), request.clone()));
        self.state
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| {
                GeminiError::new(GeminiErrorKind::HttpError {
                    status_code: 500,
                    message: "no scripted response".to_string(),
                })
            })
    }

    async fn generate_videos(
        &self,
        model: &str,
        source: &GenerateVideosSource,
        config: &GenerateVideosConfig,
    ) -> Result<VideoOperation, GeminiError> {
        self.state.video_calls.lock().unwrap().push((
            model.to_string(),
            source.clone(),
            config.clone(),
        ));
        let mut operation = self
            .state
            .operations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| pending("operations/scripted"));
        operation.model = model.to_string();
        Ok(operation)
    }

    async fn get_videos_operation(
        &self,
        operation: &VideoOperation,
    ) -> Result<VideoOperation, GeminiError> {
        self.state.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.state.operations.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| VideoOperation {
            done: Some(false),
            ..operation.clone()
        }))
    }

    async fn download_video(&self, _video: &Video, path: &Path) -> Result<(), GeminiError> {
        self.state.downloads.lock().unwrap().push(path.to_path_buf());
        if self.state.fail_downloads.load(Ordering::SeqCst) {
            return Err(GeminiError::new(GeminiErrorKind::Download(
                "connection reset".to_string(),
            )));
        }
        Ok(())
    }
}

/// Factory producing clients that share one [`MockGemini`].
#[derive(Clone)]
pub struct MockFactory(pub Arc<MockGemini>);

impl MockFactory {
    pub fn new(mock: MockGemini) -> Self {
        Self(Arc::new(mock))
    }
}

impl ClientFactory for MockFactory {
    type Client = MockClient;

    fn create(&self, settings: ClientSettings) -> Result<MockClient, GeminiError> {
        let vertex_ai = settings.is_vertex_ai();
        self.0.settings.lock().unwrap().push(settings);
        Ok(MockClient {
            state: self.0.clone(),
            vertex_ai,
        })
    }
}

/// Operation that has not finished.
pub fn pending(name: &str) -> VideoOperation {
    VideoOperation {
        name: name.to_string(),
        done: Some(false),
        ..VideoOperation::default()
    }
}
