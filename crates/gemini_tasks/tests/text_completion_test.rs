//! Tests for the text completion task.

mod test_utils;

use gemini_tasks::{RunnableTask, TaskBase, TextCompletion};
use gemini_tasks_client::{Backend, Candidate, Content, GenerateContentResponse};
use gemini_tasks_core::{FinishReason, SafetyRating};
use gemini_tasks_error::GeminiTasksErrorKind;
use pretty_assertions::assert_eq;
use test_utils::{MockFactory, MockGemini, test_context, text_response, usage};

fn task(prompt: &str) -> TextCompletion {
    TextCompletion::builder()
        .base(TaskBase::new("test-key", "gemini-2.5-flash"))
        .prompt(prompt)
        .build()
        .expect("valid task")
}

#[tokio::test]
async fn test_text_completion_returns_prediction_and_metrics() -> Result<(), Box<dyn std::error::Error>> {
    let t = test_context();
    let factory = MockFactory::new(
        MockGemini::new().with_response(text_response("Paris", usage(8, 1, 9))),
    );

    let output = task("What is the capital of France?")
        .run(&t.ctx, &factory)
        .await?;

    assert_eq!(output.predictions().len(), 1);
    assert_eq!(output.predictions()[0].content(), "Paris");

    let requests = factory.0.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "gemini-2.5-flash");
    assert_eq!(
        requests[0].1.contents,
        vec![Content::user_text("What is the capital of France?")]
    );

    assert_eq!(t.metrics.total("candidate.token.count"), 1);
    assert_eq!(t.metrics.total("prompt.token.count"), 8);
    assert_eq!(t.metrics.total("total.token.count"), 9);

    match factory.0.settings()[0].backend() {
        Backend::GeminiApi { api_key } => assert_eq!(api_key, "test-key"),
        other => panic!("unexpected backend {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_every_candidate_becomes_a_prediction() -> Result<(), Box<dyn std::error::Error>> {
    let t = test_context();
    let rated = Candidate::new(Some(Content::model_text("Two")), Some(FinishReason::Stop))
        .with_safety_ratings(vec![SafetyRating::new(
            "HARM_CATEGORY_HARASSMENT",
            "NEGLIGIBLE",
            false,
        )]);
    let response = GenerateContentResponse::new(
        vec![
            Candidate::new(Some(Content::model_text("One")), Some(FinishReason::Stop)),
            rated,
            Candidate::new(None, Some(FinishReason::MaxTokens)),
        ],
        None,
    );
    let factory = MockFactory::new(MockGemini::new().with_response(response));

    let output = task("Count").run(&t.ctx, &factory).await?;

    let contents: Vec<&str> = output
        .predictions()
        .iter()
        .map(|prediction| prediction.content().as_str())
        .collect();
    assert_eq!(contents, vec!["One", "Two", ""]);
    assert!(output.predictions()[0].safety_ratings().is_none());
    assert_eq!(
        output.predictions()[1].safety_ratings().as_ref().map(Vec::len),
        Some(1)
    );

    // No usage metadata still emits the three counters, at zero.
    assert_eq!(t.metrics.counters().len(), 3);
    assert_eq!(t.metrics.total("total.token.count"), 0);
    Ok(())
}

#[tokio::test]
async fn test_response_without_candidates_yields_no_predictions() -> Result<(), Box<dyn std::error::Error>> {
    let t = test_context();
    let factory = MockFactory::new(MockGemini::new().with_response(GenerateContentResponse::default()));

    let output = task("Anything").run(&t.ctx, &factory).await?;

    assert!(output.predictions().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_prompt_is_rendered_from_variables() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = test_context();
    t.ctx = t.ctx.with_variable("animal", "axolotl");
    let factory = MockFactory::new(
        MockGemini::new().with_response(text_response("Mexico", usage(5, 1, 6))),
    );

    task("Where does the {{ animal }} live?")
        .run(&t.ctx, &factory)
        .await?;

    assert_eq!(
        factory.0.requests()[0].1.contents[0].text(),
        "Where does the axolotl live?"
    );
    Ok(())
}

#[tokio::test]
async fn test_render_failure_happens_before_any_call() {
    let t = test_context();
    let factory = MockFactory::new(MockGemini::new());

    let err = task("Hello {{ nobody }}")
        .run(&t.ctx, &factory)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), GeminiTasksErrorKind::Render(_)));
    assert!(factory.0.untouched());
    assert!(factory.0.settings().is_empty());
}

#[tokio::test]
async fn test_api_error_is_propagated() {
    let t = test_context();
    let factory = MockFactory::new(MockGemini::new());

    let err = task("Hello").run(&t.ctx, &factory).await.unwrap_err();

    match err.kind() {
        GeminiTasksErrorKind::Gemini(e) => assert_eq!(e.kind.status_code(), Some(500)),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(t.metrics.counters().is_empty());
}
