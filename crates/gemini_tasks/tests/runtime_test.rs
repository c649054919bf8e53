//! Tests for definitions, storage and the local run context working together.

mod test_utils;

use gemini_tasks::{
    FileStorage, InMemoryMetricSink, LocalRunContext, MemoryStorage, TaskDefinition, TaskOutput,
};
use gemini_tasks_client::Part;
use gemini_tasks_core::{FinishReason, TaskState};
use gemini_tasks_error::{ConfigErrorKind, GeminiTasksErrorKind, StorageErrorKind};
use gemini_tasks_interface::{RunContext, Storage};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use test_utils::{MockFactory, MockGemini, parts_response, text_response, usage};

#[tokio::test]
async fn test_file_storage_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path().join("blobs"));

    let uri = storage.put("frame.png", vec![1, 2, 3, 4]).await?;

    assert!(uri.starts_with("file://"));
    assert!(uri.ends_with("/blobs/frame.png"));
    assert_eq!(storage.get(&uri).await?, vec![1, 2, 3, 4]);

    assert_eq!(storage.get("frame.png").await?, vec![1, 2, 3, 4]);
    Ok(())
}

#[tokio::test]
async fn test_file_storage_keeps_names_inside_root() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path().join("root"));

    let err = storage
        .put("../../escape.txt", b"nope".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err.kind, StorageErrorKind::InvalidUri(_)));
    assert!(!dir.path().join("escape.txt").exists());

    let nested = storage.put("run/a/b.txt", b"ok".to_vec()).await?;
    assert!(nested.ends_with("/root/run/a/b.txt"));
    assert_eq!(storage.get("run/a/b.txt").await?, b"ok".to_vec());
    Ok(())
}

#[tokio::test]
async fn test_bare_paths_resolve_under_root() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let outside = dir.path().join("outside.bin");
    std::fs::write(&outside, [9, 9])?;
    let storage = FileStorage::new(dir.path().join("root"));

    let absolute = storage
        .get(&outside.display().to_string())
        .await
        .unwrap_err();
    assert!(matches!(absolute.kind, StorageErrorKind::InvalidUri(_)));

    let escaping = storage.get("../outside.bin").await.unwrap_err();
    assert!(matches!(escaping.kind, StorageErrorKind::InvalidUri(_)));

    // Relative to root, not to the working directory.
    let relative = storage.get("Cargo.toml").await.unwrap_err();
    assert!(matches!(relative.kind, StorageErrorKind::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn test_storage_errors() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());

    let missing = storage.get("absent.bin").await.unwrap_err();
    assert!(matches!(missing.kind, StorageErrorKind::NotFound(_)));

    let foreign = storage.get("s3://bucket/key").await.unwrap_err();
    assert!(matches!(foreign.kind, StorageErrorKind::InvalidUri(_)));

    let memory = MemoryStorage::new();
    let wrong_scheme = memory.get("file:///tmp/x").await.unwrap_err();
    assert!(matches!(wrong_scheme.kind, StorageErrorKind::InvalidUri(_)));
}

#[tokio::test]
async fn test_yaml_definition_runs_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("summary.yaml");
    std::fs::write(
        &path,
        r#"
type: TextCompletion
apiKey: "{{ apiKey }}"
model: gemini-2.5-flash
prompt: "Summarize {{ book.title }} in one sentence."
"#,
    )?;

    let metrics = Arc::new(InMemoryMetricSink::new());
    let ctx = LocalRunContext::new("yaml-run", Arc::new(MemoryStorage::new()), metrics.clone())
        .with_variable("apiKey", "from-vars")
        .with_variable("book", serde_json::json!({"title": "Moby-Dick"}));
    let factory = MockFactory::new(
        MockGemini::new().with_response(text_response("A whale hunt.", usage(10, 4, 14))),
    );

    let definition = TaskDefinition::from_file(&path)?;
    assert_eq!(definition.kind(), "TextCompletion");
    definition.validate(&ctx)?;
    let output = definition.run(&ctx, &factory).await?;

    match &output {
        TaskOutput::TextCompletion(text) => {
            assert_eq!(text.predictions()[0].content(), "A whale hunt.")
        }
        other => panic!("unexpected output {:?}", other),
    }
    assert_eq!(output.final_state(), TaskState::Success);
    assert_eq!(
        factory.0.requests()[0].1.contents[0].text(),
        "Summarize Moby-Dick in one sentence."
    );
    assert_eq!(metrics.total("total.token.count"), 14);

    let json = serde_json::to_value(&output)?;
    assert_eq!(json["predictions"][0]["content"], "A whale hunt.");
    Ok(())
}

#[tokio::test]
async fn test_toml_multimodal_definition_reads_file_storage() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let storage = Arc::new(FileStorage::new(dir.path()));
    let image_uri = storage.put("kitten.jpg", vec![0xff, 0xd8, 0xff]).await?;

    let path = dir.path().join("describe.toml");
    std::fs::write(
        &path,
        r#"
type = "MultimodalCompletion"
apiKey = "key"
model = "gemini-2.5-flash"

[[contents]]
content = "What is in this picture?"

[[contents]]
content = "{{ image }}"
mimeType = "image/jpeg"
"#,
    )?;

    let ctx = LocalRunContext::new("toml-run", storage.clone(), Arc::new(InMemoryMetricSink::new()))
        .with_variable("image", image_uri.as_str());
    let factory = MockFactory::new(MockGemini::new().with_response(parts_response(
        vec![],
        FinishReason::Safety,
        usage(260, 0, 260),
    )));

    let output = TaskDefinition::from_file(&path)?.run(&ctx, &factory).await?;

    assert_eq!(output.final_state(), TaskState::Warning);
    let requests = factory.0.requests();
    let blob = requests[0].1.contents[1].parts[0]
        .inline_data
        .as_ref()
        .expect("inline image");
    assert_eq!(blob.decode()?, vec![0xff, 0xd8, 0xff]);
    Ok(())
}

#[tokio::test]
async fn test_generated_images_land_in_file_storage() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let storage = Arc::new(FileStorage::new(dir.path()));
    let ctx = LocalRunContext::new("images", storage.clone(), Arc::new(InMemoryMetricSink::new()));
    let definition = TaskDefinition::parse(
        r#"{"type": "MultimodalCompletion", "apiKey": "key", "model": "gemini-2.5-flash-image",
            "contents": [{"content": "Draw a kite"}]}"#,
        gemini_tasks::DefinitionFormat::Json,
    )?;
    let factory = MockFactory::new(MockGemini::new().with_response(parts_response(
        vec![Part::from_bytes(&[7, 7, 7], "image/webp")],
        FinishReason::Stop,
        usage(4, 1290, 1294),
    )));

    let output = definition.run(&ctx, &factory).await?;

    let json = serde_json::to_value(&output)?;
    let uri = json["images"][0]["uri"].as_str().expect("image uri");
    assert!(uri.contains("/images/"));
    assert!(uri.ends_with("/generated-image-0.webp"));
    assert_eq!(storage.get(uri).await?, vec![7, 7, 7]);
    assert!(json.get("text").is_none());
    Ok(())
}

#[tokio::test]
async fn test_repeated_runs_do_not_overwrite_images() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let storage = Arc::new(FileStorage::new(dir.path()));
    let definition = TaskDefinition::parse(
        r#"{"type": "MultimodalCompletion", "apiKey": "key", "model": "gemini-2.5-flash-image",
            "contents": [{"content": "Draw a kite"}]}"#,
        gemini_tasks::DefinitionFormat::Json,
    )?;

    let mut uris = Vec::new();
    for (task_id, bytes) in [("run-1", [1u8, 1, 1]), ("run-2", [2u8, 2, 2])] {
        let ctx = LocalRunContext::new(task_id, storage.clone(), Arc::new(InMemoryMetricSink::new()));
        let factory = MockFactory::new(MockGemini::new().with_response(parts_response(
            vec![Part::from_bytes(&bytes, "image/png")],
            FinishReason::Stop,
            usage(4, 1290, 1294),
        )));
        let json = serde_json::to_value(definition.run(&ctx, &factory).await?)?;
        uris.push(json["images"][0]["uri"].as_str().expect("image uri").to_string());
    }

    assert_ne!(uris[0], uris[1]);
    assert!(uris[0].contains("/run-1/"));
    assert!(uris[1].contains("/run-2/"));
    assert_eq!(storage.get(&uris[0]).await?, vec![1, 1, 1]);
    assert_eq!(storage.get(&uris[1]).await?, vec![2, 2, 2]);
    Ok(())
}

#[test]
fn test_unknown_task_type_is_a_config_error() {
    let err = TaskDefinition::parse(
        r#"{"type": "ImageEditing", "apiKey": "key", "model": "m"}"#,
        gemini_tasks::DefinitionFormat::Json,
    )
    .unwrap_err();

    match err.kind() {
        GeminiTasksErrorKind::Config(e) => match &e.kind {
            ConfigErrorKind::DefinitionParse { format, message } => {
                assert_eq!(format, "json");
                assert!(message.contains("ImageEditing"), "{}", message);
            }
            other => panic!("unexpected config error {:?}", other),
        },
        other => panic!("unexpected error {:?}", other),
    }
    assert!(err.to_string().contains("Failed to parse json task definition"));
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let err = TaskDefinition::from_file("task.ini").unwrap_err();

    match err.kind() {
        GeminiTasksErrorKind::Config(e) => {
            assert_eq!(e.kind, ConfigErrorKind::UnsupportedExtension("task.ini".into()))
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(err.to_string().contains("Unsupported task definition extension"));
}

#[test]
fn test_missing_definition_file_is_a_read_error() {
    let err = TaskDefinition::from_file("/nonexistent/definition.yaml").unwrap_err();

    match err.kind() {
        GeminiTasksErrorKind::Config(e) => {
            assert!(matches!(&e.kind, ConfigErrorKind::DefinitionRead { path, .. } if path == "/nonexistent/definition.yaml"))
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_environment_variables_render() {
    // SAFETY: no other test in this binary reads or writes this variable.
    unsafe { std::env::set_var("GEMINI_TASKS_RUNTIME_TEST_KEY", "secret") };
    let ctx = LocalRunContext::new(
        "env",
        Arc::new(MemoryStorage::new()),
        Arc::new(InMemoryMetricSink::new()),
    );

    assert_eq!(
        ctx.render_template("{{ env.GEMINI_TASKS_RUNTIME_TEST_KEY }}").unwrap(),
        "secret"
    );
    assert!(ctx.render_template("{{ env.GEMINI_TASKS_RUNTIME_TEST_UNSET }}").is_err());
}
