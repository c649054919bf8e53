//! Live Gemini API tests. Run with `--features api` and `GEMINI_API_KEY` set.

use gemini_tasks::{
    InMemoryMetricSink, LocalRunContext, MemoryStorage, RunnableTask, StructuredOutputCompletion,
    TaskBase, TextCompletion,
};
use gemini_tasks_client::HttpClientFactory;
use std::sync::Arc;

fn live_context() -> (LocalRunContext, Arc<InMemoryMetricSink>) {
    let _ = dotenvy::dotenv();
    let metrics = Arc::new(InMemoryMetricSink::new());
    let ctx = LocalRunContext::new("live", Arc::new(MemoryStorage::new()), metrics.clone());
    (ctx, metrics)
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_gemini_text_completion() {
    let (ctx, metrics) = live_context();
    let task = TextCompletion::builder()
        .base(TaskBase::new("{{ env.GEMINI_API_KEY }}", "gemini-2.5-flash"))
        .prompt("Say 'test' and nothing else.")
        .build()
        .expect("Valid task");

    let output = task
        .run(&ctx, &HttpClientFactory::new())
        .await
        .expect("API call succeeded");

    assert!(!output.predictions().is_empty());
    assert!(metrics.total("total.token.count") > 0);
    println!("Response: {:?}", output.predictions());
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_gemini_structured_output() {
    let (ctx, _) = live_context();
    let task = StructuredOutputCompletion::builder()
        .base(TaskBase::new("{{ env.GEMINI_API_KEY }}", "gemini-2.5-flash"))
        .prompt("Name one primary color.")
        .json_response_schema(serde_json::json!({
            "type": "OBJECT",
            "properties": {"color": {"type": "STRING"}},
            "required": ["color"]
        }))
        .build()
        .expect("Valid task");

    let output = task
        .run(&ctx, &HttpClientFactory::new())
        .await
        .expect("API call succeeded");

    let answer: serde_json::Value =
        serde_json::from_str(&output.predictions().concat()).expect("JSON answer");
    assert!(answer["color"].is_string());
}
