// tests/common/mod.rs

#![allow(dead_code)]

use mcq_backend::{config::Config, routes, state::AppState};
use serde_json::json;
use tempfile::TempDir;

pub struct TestApp {
    /// Base URL, e.g. "http://127.0.0.1:12345".
    pub address: String,
    pub state: AppState,
    pub config: Config,
    // Keeps the data and package directories alive for the test.
    pub root: TempDir,
}

/// Two questions; the correct answers are A and C.
pub fn mcq101_package() -> serde_json::Value {
    json!([
        {
            "id": "1",
            "scenario": "A patient presents with a fever.",
            "question": "What is the first step?",
            "option_a": "Take a history",
            "option_b": "Order imaging",
            "option_c": "Prescribe antibiotics",
            "option_d": "Discharge",
            "option_e": "Refer",
            "correct_answer": "A",
            "image_url": "/images/fever.png",
            "subtopic_id": "10",
            "competence": "clinical-reasoning"
        },
        {
            "id": 2,
            "scenario": "",
            "question": "Which value is normal?",
            "option_a": "1",
            "option_b": "2",
            "option_c": "3",
            "option_d": "4",
            "option_e": "5",
            "correct_answer": "C",
            "subtopic_id": 11,
            "competence": "knowledge"
        }
    ])
}

/// A database-export style package whose questions sit in the table entry.
pub fn export_package() -> serde_json::Value {
    json!([
        { "type": "header", "version": "5.2.1", "comment": "Export to JSON plugin" },
        { "type": "database", "name": "mcq" },
        {
            "type": "table",
            "name": "questions",
            "database": "mcq",
            "data": [
                {
                    "id": "7",
                    "scenario": "Exported",
                    "question": "Pick B",
                    "option_a": "a",
                    "option_b": "b",
                    "option_c": "c",
                    "option_d": "d",
                    "option_e": "e",
                    "correct_answer": "B",
                    "image_url": null,
                    "subtopic_id": "3",
                    "competence": "recall"
                }
            ]
        }
    ])
}

/// Temp root with `question_packages/MCQ101.json` and `question_packages/Export7.json`.
pub fn seeded_config() -> (TempDir, Config) {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let config = Config::for_root(root.path());

    std::fs::create_dir_all(&config.question_packages_dir).unwrap();
    std::fs::write(
        config.question_packages_dir.join("MCQ101.json"),
        serde_json::to_vec_pretty(&mcq101_package()).unwrap(),
    )
    .unwrap();
    std::fs::write(
        config.question_packages_dir.join("Export7.json"),
        serde_json::to_vec_pretty(&export_package()).unwrap(),
    )
    .unwrap();

    (root, config)
}

/// Spawns the app on a random port over freshly seeded directories.
pub async fn spawn_app() -> TestApp {
    let (root, config) = seeded_config();
    spawn_app_with(root, config).await
}

/// Spawns the app with a caller-adjusted config; `root` is kept alive with it.
pub async fn spawn_app_with(root: TempDir, config: Config) -> TestApp {
    let state = AppState::new(config.clone());
    let app = routes::create_router(state.clone());

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        state,
        config,
        root,
    }
}
