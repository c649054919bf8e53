//! Run context for executing tasks outside an orchestrator.

use gemini_tasks_core::Counter;
use gemini_tasks_error::{RenderError, RenderErrorKind};
use gemini_tasks_interface::{MetricSink, RunContext, Storage};
use handlebars::Handlebars;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Run context backed by in-process collaborators.
///
/// Templates are Handlebars in strict mode: variables are referenced with
/// `{{ name }}` or `{{ inputs.image }}` and environment variables with
/// `{{ env.GEMINI_API_KEY }}`. A missing variable is an error. Output is not
/// HTML-escaped.
///
/// ```
/// use gemini_tasks::{InMemoryMetricSink, LocalRunContext, MemoryStorage};
/// use gemini_tasks_interface::RunContext;
/// use std::sync::Arc;
///
/// let ctx = LocalRunContext::new(
///     "doc",
///     Arc::new(MemoryStorage::new()),
///     Arc::new(InMemoryMetricSink::new()),
/// )
/// .with_variable("city", "Lisbon");
/// assert_eq!(ctx.render_template("Weather in {{ city }}").unwrap(), "Weather in Lisbon");
/// ```
pub struct LocalRunContext {
    task_id: String,
    variables: Map<String, Value>,
    storage: Arc<dyn Storage>,
    metrics: Arc<dyn MetricSink>,
    handlebars: Handlebars<'static>,
}

impl LocalRunContext {
    /// Creates a context with no variables.
    pub fn new(
        task_id: impl Into<String>,
        storage: Arc<dyn Storage>,
        metrics: Arc<dyn MetricSink>,
    ) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);
        Self {
            task_id: task_id.into(),
            variables: Map::new(),
            storage,
            metrics,
            handlebars,
        }
    }

    /// Adds a template variable.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Variables plus an `env` object, as seen by templates.
    fn template_data(&self) -> Value {
        let mut data = self.variables.clone();
        let env: Map<String, Value> = std::env::vars()
            .map(|(name, value)| (name, Value::String(value)))
            .collect();
        data.insert("env".to_string(), Value::Object(env));
        Value::Object(data)
    }
}

impl std::fmt::Debug for LocalRunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalRunContext")
            .field("task_id", &self.task_id)
            .field("variables", &self.variables.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl RunContext for LocalRunContext {
    fn task_id(&self) -> &str {
        &self.task_id
    }

    fn render_template(&self, template: &str) -> Result<String, RenderError> {
        if !template.contains("{{") {
            return Ok(template.to_string());
        }
        self.handlebars
            .render_template(template, &self.template_data())
            .map_err(|e| {
                RenderError::new(RenderErrorKind::Template {
                    expression: template.to_string(),
                    message: e.to_string(),
                })
            })
    }

    fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    fn metric(&self, counter: Counter) {
        self.metrics.counter(&counter);
    }
}
