use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use parley::client::mock::MockChatApi;
use parley::client::{ChatApi, Notice, Page, PageState};
use parley::speech::mock::ScriptedSpeech;
use parley::speech::{RecognitionError, Utterance};

fn build(
    answers: Vec<Result<String, String>>,
    heard: Vec<Result<String, RecognitionError>>,
) -> (Page, Arc<MockChatApi>, Arc<ScriptedSpeech>) {
    let api = Arc::new(MockChatApi::new(answers));
    let speech = Arc::new(ScriptedSpeech::new(heard));
    let page = Page::new(Box::new(api.clone()), Box::new(speech.clone()));
    (page, api, speech)
}

#[tokio::test]
async fn submit_shows_and_speaks_answer() {
    let (mut page, api, speech) = build(vec![Ok("4".to_string())], vec![]);

    page.set_question("What is 2+2?");
    assert!(page.submit().await);

    assert_eq!(page.state().answer, "4");
    assert!(!page.state().loading);
    assert_eq!(api.questions(), vec!["What is 2+2?"]);
    assert_eq!(speech.spoken(), vec![Utterance::new("4")]);
}

#[tokio::test]
async fn spoken_answer_is_english_at_normal_rate() {
    let (mut page, _, speech) = build(vec![Ok("hello".to_string())], vec![]);

    page.set_question("greet me");
    page.submit().await;

    let spoken = speech.spoken();
    assert_eq!(spoken[0].locale, "en-US");
    assert_eq!(spoken[0].rate, 1.0);
}

#[tokio::test]
async fn blank_question_issues_no_request() {
    let (mut page, api, speech) = build(vec![Ok("never".to_string())], vec![]);

    for blank in ["", "   ", "\t\n"] {
        page.set_question(blank);
        let before = page.state().clone();

        assert!(!page.submit().await);
        assert_eq!(page.state(), &before);
    }

    assert!(api.questions().is_empty());
    assert!(speech.spoken().is_empty());
}

#[tokio::test]
async fn failed_request_shows_fixed_error() {
    let (mut page, _, speech) = build(vec![Err("connection refused".to_string())], vec![]);

    page.set_question("hi");
    assert!(page.submit().await);

    assert_eq!(
        page.state().answer,
        "Sorry, something went wrong. Please try again."
    );
    assert!(!page.state().loading);
    assert!(speech.spoken().is_empty());
}

#[tokio::test]
async fn question_is_sent_untrimmed() {
    let (mut page, api, _) = build(vec![Ok("ok".to_string())], vec![]);

    page.set_question("  spaced  ");
    page.submit().await;

    assert_eq!(api.questions(), vec!["  spaced  "]);
}

#[tokio::test]
async fn empty_answer_is_not_spoken() {
    let (mut page, _, speech) = build(vec![Ok(String::new())], vec![]);

    page.set_question("hi");
    page.submit().await;

    assert_eq!(page.state().answer, "");
    assert!(speech.spoken().is_empty());
}

#[tokio::test]
async fn unsupported_recognition_raises_notice_without_request() {
    let api = Arc::new(MockChatApi::new(vec![Ok("never".to_string())]));
    let speech = Arc::new(ScriptedSpeech::unsupported());
    let mut page = Page::new(Box::new(api.clone()), Box::new(speech.clone()));

    let notice = page.listen().await.unwrap_err();

    assert_eq!(notice, Notice::Unsupported);
    assert_eq!(
        notice.to_string(),
        "Speech recognition is not supported in this browser. Try Chrome!"
    );
    assert!(api.questions().is_empty());
    assert_eq!(page.state(), &PageState::default());
}

#[tokio::test]
async fn transcript_becomes_question_and_is_asked() {
    let (mut page, api, speech) = build(
        vec![Ok("Paris".to_string())],
        vec![Ok("What is the capital of France?".to_string())],
    );

    page.listen().await.unwrap();

    assert_eq!(page.state().question, "What is the capital of France?");
    assert_eq!(page.state().answer, "Paris");
    assert!(!page.state().listening);
    assert!(!page.state().loading);
    assert_eq!(api.questions(), vec!["What is the capital of France?"]);
    assert_eq!(speech.spoken(), vec![Utterance::new("Paris")]);
}

#[tokio::test]
async fn recognition_is_single_shot_english() {
    let (mut page, _, speech) = build(vec![Ok("ok".to_string())], vec![Ok("hi".to_string())]);

    page.listen().await.unwrap();

    let listens = speech.listens();
    assert_eq!(listens.len(), 1);
    assert_eq!(listens[0].locale, "en-US");
    assert!(!listens[0].continuous);
    assert!(!listens[0].interim_results);
    assert_eq!(listens[0].max_alternatives, 1);
}

#[tokio::test]
async fn recognition_errors_map_to_notices() {
    let (mut page, api, _) = build(
        vec![],
        vec![
            Err(RecognitionError::from_code("no-speech")),
            Err(RecognitionError::from_code("not-allowed")),
            Err(RecognitionError::from_code("network")),
        ],
    );

    let first = page.listen().await.unwrap_err();
    assert_eq!(first.to_string(), "No speech was detected. Please try again.");
    assert!(!page.state().listening);

    let second = page.listen().await.unwrap_err();
    assert_eq!(second.to_string(), "Microphone access was denied.");
    assert!(!page.state().listening);

    let third = page.listen().await.unwrap_err();
    assert_eq!(third.to_string(), "Speech recognition error: network");
    assert!(!page.state().listening);

    assert!(api.questions().is_empty());
}

#[tokio::test]
async fn blank_transcript_is_not_asked() {
    let (mut page, api, _) = build(vec![Ok("never".to_string())], vec![Ok("   ".to_string())]);

    page.listen().await.unwrap();

    assert!(api.questions().is_empty());
    assert!(page.state().answer.is_empty());
}

#[tokio::test]
async fn speak_again_repeats_answer() {
    let (mut page, _, speech) = build(vec![Ok("42".to_string())], vec![]);

    page.speak_again().await;
    assert!(speech.spoken().is_empty());

    page.set_question("meaning of life?");
    page.submit().await;
    page.speak_again().await;

    assert_eq!(speech.spoken(), vec![Utterance::new("42"), Utterance::new("42")]);
}

/// A relay that never answers.
struct Stalled;

#[async_trait]
impl ChatApi for Stalled {
    async fn ask(&self, _question: &str) -> anyhow::Result<String> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn abandoned_request_clears_loading() {
    let mut page = Page::new(Box::new(Stalled), Box::new(ScriptedSpeech::unsupported()));
    page.set_question("hi");

    let result = tokio::time::timeout(Duration::from_millis(50), page.submit()).await;

    assert!(result.is_err());
    assert!(!page.state().loading);
    assert!(!page.state().listening);
    assert!(page.state().answer.is_empty());
}
