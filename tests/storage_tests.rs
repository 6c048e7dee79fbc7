// tests/storage_tests.rs

mod common;

use std::sync::Arc;

use mcq_backend::{
    models::{
        answer::{AnswerRecord, Confidence, OptionLetter, SubmittedAnswer},
        result::SubmitTestRequest,
        user::CreateUserRequest,
    },
    storage::{
        JsonCollection, QuestionStore, StoreError, SubmissionStore, UserRegistry,
        submissions::score,
    },
};

fn answer(id: &str, answer: &str, confidence: &str, correct: &str) -> SubmittedAnswer {
    SubmittedAnswer {
        question_id: id.to_string(),
        answer: answer.to_string(),
        confidence: confidence.to_string(),
        correct_answer: correct.to_string(),
        subtopic_id: "1".to_string(),
        competence: "c".to_string(),
    }
}

fn request(user_id: &str, answers: Vec<SubmittedAnswer>) -> SubmitTestRequest {
    SubmitTestRequest {
        user_id: user_id.to_string(),
        test_code: "MCQ101".to_string(),
        answers,
        end_time: Some("2026-10-19T10:00:00Z".to_string()),
    }
}

fn record(answer: Option<OptionLetter>, confidence: Option<Confidence>, correct: &str) -> AnswerRecord {
    AnswerRecord {
        user_id: "u".to_string(),
        test_code: "T".to_string(),
        question_id: "q".to_string(),
        answer,
        confidence,
        correct_answer: correct.to_string(),
        subtopic_id: "s".to_string(),
        competence: "c".to_string(),
    }
}

#[test]
fn score_counts_matches_and_tallies_confidence() {
    let records = vec![
        record(Some(OptionLetter::A), Some(Confidence::VeryConfident), "A"),
        record(Some(OptionLetter::B), Some(Confidence::Unsure), "C"),
        record(Some(OptionLetter::C), Some(Confidence::Unsure), "C"),
        record(None, Some(Confidence::DontKnow), "D"),
        record(Some(OptionLetter::E), None, "E"),
        record(None, None, ""),
    ];

    let result = score("u", "T", &records, "now".to_string()).unwrap();

    assert_eq!(result.total_questions, 6);
    assert_eq!(result.correct_answers, 3);
    assert!((result.score - 50.0).abs() < 0.01);
    assert_eq!(result.confidence_counts.very_confident, 1);
    assert_eq!(result.confidence_counts.unsure, 2);
    assert_eq!(result.confidence_counts.dont_know, 1);
    assert_eq!(result.confidence_unset, 2);
    assert_eq!(
        result.confidence_counts.total() + result.confidence_unset,
        result.total_questions
    );
}

#[test]
fn score_two_decimal_display() {
    let records = vec![
        record(Some(OptionLetter::A), Some(Confidence::Unsure), "A"),
        record(Some(OptionLetter::A), Some(Confidence::Unsure), "A"),
        record(Some(OptionLetter::A), Some(Confidence::Unsure), "B"),
    ];

    let result = score("u", "T", &records, "now".to_string()).unwrap();

    assert_eq!(result.score_display(), "66.67%");
    // Every answer has a confidence, so the tally alone covers the attempt
    assert_eq!(result.confidence_counts.total(), result.total_questions);
}

#[test]
fn blank_answer_never_matches_blank_key() {
    assert!(!record(None, None, "").is_correct());
    assert!(record(Some(OptionLetter::B), None, " b ").is_correct());
}

#[test]
fn empty_submission_is_rejected() {
    let err = score("u", "T", &[], "now".to_string()).unwrap_err();
    assert!(matches!(err, StoreError::EmptySubmission));
}

#[tokio::test]
async fn append_then_fetch_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = SubmissionStore::new(dir.path());

    let stored = store
        .append_submission(request(
            "user-1",
            vec![
                answer("1", "A", "very-confident", "A"),
                answer("2", "", "", "C"),
            ],
        ))
        .await
        .unwrap();

    let fetched = store.fetch_result("user-1", "mcq101").await.unwrap();

    assert_eq!(fetched, stored);
    assert_eq!(fetched.correct_answers, 1);
    assert_eq!(fetched.confidence_counts.very_confident, 1);
    assert_eq!(fetched.confidence_counts.unsure, 0);
    assert_eq!(fetched.confidence_counts.dont_know, 0);
}

#[tokio::test]
async fn fetch_without_submission_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = SubmissionStore::new(dir.path());

    let err = store.fetch_result("nobody", "MCQ101").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn invalid_answers_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = SubmissionStore::new(dir.path());

    let err = store
        .append_submission(request("user-1", vec![answer("1", "A", "maybe", "A")]))
        .await
        .unwrap_err();

    match err {
        StoreError::InvalidAnswer { question_id, .. } => assert_eq!(question_id, "1"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dir.path().join("answers.json").exists());
    assert!(!dir.path().join("results.json").exists());
}

#[tokio::test]
async fn concurrent_submissions_are_not_lost() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SubmissionStore::new(dir.path()));

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .append_submission(request(
                    &format!("user-{i}"),
                    vec![answer("1", "A", "unsure", "A"), answer("2", "B", "unsure", "C")],
                ))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let results: JsonCollection<serde_json::Value> =
        JsonCollection::new(dir.path().join("results.json"));
    let answers: JsonCollection<serde_json::Value> =
        JsonCollection::new(dir.path().join("answers.json"));
    assert_eq!(results.load().await.unwrap().len(), 16);
    assert_eq!(answers.load().await.unwrap().len(), 32);

    for i in 0..16 {
        store.fetch_result(&format!("user-{i}"), "MCQ101").await.unwrap();
    }
}

#[tokio::test]
async fn corrupt_collection_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    std::fs::write(&path, "[{ not json").unwrap();
    let store = SubmissionStore::new(dir.path());

    let err = store
        .append_submission(request("user-1", vec![answer("1", "A", "unsure", "A")]))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Corrupt { .. }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[{ not json");
}

#[tokio::test]
async fn missing_or_blank_collection_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let missing: JsonCollection<serde_json::Value> = JsonCollection::new(dir.path().join("a.json"));
    assert!(missing.load().await.unwrap().is_empty());

    std::fs::write(dir.path().join("b.json"), "\n").unwrap();
    let blank: JsonCollection<serde_json::Value> = JsonCollection::new(dir.path().join("b.json"));
    assert!(blank.load().await.unwrap().is_empty());
    assert_eq!(blank.append(vec![serde_json::json!(1)]).await.unwrap(), 1);
}

#[tokio::test]
async fn registry_stores_plain_text_and_allows_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let registry = UserRegistry::new(dir.path());

    let mut request = CreateUserRequest::new("  Dewi  ", "MCQ101");
    request.email = Some("dewi@example.com".to_string());

    let first = registry.register(request.clone()).await.unwrap();
    let second = registry.register(request).await.unwrap();

    assert_eq!(first.name, "Dewi");
    assert_eq!(first.email.as_deref(), Some("dewi@example.com"));
    assert_ne!(first.user_id, second.user_id);

    let users: JsonCollection<serde_json::Value> = JsonCollection::new(dir.path().join("users.json"));
    assert_eq!(users.load().await.unwrap().len(), 2);
}

#[tokio::test]
async fn registry_keeps_names_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let registry = UserRegistry::new(dir.path());

    for name in ["Tom & Jerry", "A<B", "O'Brien"] {
        let user = registry
            .register(CreateUserRequest::new(name, "MCQ101"))
            .await
            .unwrap();
        assert_eq!(user.name, name);
    }

    let users: JsonCollection<serde_json::Value> = JsonCollection::new(dir.path().join("users.json"));
    let stored = users.load().await.unwrap();
    assert_eq!(stored[0]["name"], "Tom & Jerry");
    assert_eq!(stored[1]["name"], "A<B");
}

#[tokio::test]
async fn registry_rejects_names_without_visible_text() {
    let dir = tempfile::tempdir().unwrap();
    let registry = UserRegistry::new(dir.path());

    for name in ["<b></b>", "<script>x</script>"] {
        let err = registry
            .register(CreateUserRequest::new(name, "MCQ101"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)), "{name}");
    }

    assert!(!dir.path().join("users.json").exists());
}

#[tokio::test]
async fn registry_rejects_blank_name() {
    let dir = tempfile::tempdir().unwrap();
    let registry = UserRegistry::new(dir.path());

    let err = registry
        .register(CreateUserRequest::new("   ", "MCQ101"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn question_store_matches_case_insensitively() {
    let (_root, config) = common::seeded_config();
    let store = QuestionStore::new(&config.question_packages_dir);

    for code in ["MCQ101", "mcq101", " McQ101 "] {
        assert!(store.validate_test_code(code).await.unwrap(), "{code}");
        let questions = store.get_questions(code).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].option_text(OptionLetter::A), "Take a history");
        assert!(questions[0].has_image());
        assert!(!questions[1].has_image());
    }

    assert!(!store.validate_test_code("unknown").await.unwrap());
    assert!(matches!(
        store.get_questions("unknown").await.unwrap_err(),
        StoreError::NotFound(_)
    ));
}

#[tokio::test]
async fn question_store_reports_package_without_table() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("EMPTY.json"),
        r#"[{"type": "header", "version": "5"}]"#,
    )
    .unwrap();
    let store = QuestionStore::new(dir.path());

    assert!(store.validate_test_code("empty").await.unwrap());
    assert!(matches!(
        store.get_questions("empty").await.unwrap_err(),
        StoreError::InvalidPackage { .. }
    ));
}
