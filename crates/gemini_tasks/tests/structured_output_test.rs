//! Tests for the structured output completion task.

mod test_utils;

use gemini_tasks::{RunnableTask, StructuredOutputCompletion, TaskBase};
use gemini_tasks_client::Part;
use gemini_tasks_core::FinishReason;
use gemini_tasks_error::{GeminiTasksErrorKind, ValidationErrorKind};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_utils::{MockFactory, MockGemini, parts_response, test_context, usage};

const SCHEMA: &str = r#"{
    "type": "ARRAY",
    "items": {
        "type": "OBJECT",
        "properties": {"recipeName": {"type": "STRING"}},
        "required": ["recipeName"]
    }
}"#;

fn task(schema: impl Into<serde_json::Value>) -> StructuredOutputCompletion {
    StructuredOutputCompletion::builder()
        .base(TaskBase::new("test-key", "gemini-2.5-flash"))
        .prompt("List two cookie recipes.")
        .json_response_schema(schema.into())
        .build()
        .expect("valid task")
}

#[tokio::test]
async fn test_schema_is_sent_and_text_parts_returned() -> Result<(), Box<dyn std::error::Error>> {
    let t = test_context();
    let factory = MockFactory::new(MockGemini::new().with_response(parts_response(
        vec![
            Part::text(r#"[{"recipeName": "Snickerdoodle"},"#),
            Part::text(r#"{"recipeName": "Shortbread"}]"#),
        ],
        FinishReason::Stop,
        usage(12, 20, 32),
    )));

    let output = task(SCHEMA).run(&t.ctx, &factory).await?;

    assert_eq!(
        output.predictions(),
        &vec![
            r#"[{"recipeName": "Snickerdoodle"},"#.to_string(),
            r#"{"recipeName": "Shortbread"}]"#.to_string(),
        ]
    );

    let requests = factory.0.requests();
    let config = requests[0]
        .1
        .generation_config
        .clone()
        .expect("generation config");
    assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
    assert_eq!(
        config.response_schema,
        Some(serde_json::from_str::<serde_json::Value>(SCHEMA)?)
    );
    assert_eq!(t.metrics.total("candidate.token.count"), 20);
    Ok(())
}

#[tokio::test]
async fn test_inline_schema_object_is_accepted() -> Result<(), Box<dyn std::error::Error>> {
    let t = test_context();
    let factory = MockFactory::new(MockGemini::new().with_response(parts_response(
        vec![Part::text(r#"{"answer": 42}"#)],
        FinishReason::Stop,
        usage(3, 4, 7),
    )));
    let schema = json!({"type": "OBJECT", "properties": {"answer": {"type": "INTEGER"}}});

    let output = task(schema.clone()).run(&t.ctx, &factory).await?;

    assert_eq!(output.predictions().len(), 1);
    assert_eq!(
        factory.0.requests()[0]
            .1
            .generation_config
            .as_ref()
            .and_then(|config| config.response_schema.clone()),
        Some(schema)
    );
    Ok(())
}

#[tokio::test]
async fn test_malformed_schema_fails_before_any_call() {
    let t = test_context();
    let factory = MockFactory::new(MockGemini::new());

    let err = task("{ not json").run(&t.ctx, &factory).await.unwrap_err();

    match err.kind() {
        GeminiTasksErrorKind::Validation(e) => {
            assert!(matches!(e.kind, ValidationErrorKind::InvalidJsonSchema(_)))
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(err.to_string().contains("Failed to deserialize the JSON string."));
    assert!(factory.0.untouched());
}

#[tokio::test]
async fn test_missing_candidates_give_empty_predictions() -> Result<(), Box<dyn std::error::Error>> {
    let t = test_context();
    let factory = MockFactory::new(
        MockGemini::new().with_response(gemini_tasks_client::GenerateContentResponse::default()),
    );

    let output = task(SCHEMA).run(&t.ctx, &factory).await?;

    assert!(output.predictions().is_empty());
    Ok(())
}
