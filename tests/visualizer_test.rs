//! Integration tests for the Visualizer app: navigation wiring, frame
//! composition and the event loop.

use std::sync::Arc;
use std::time::Duration;

use llm_inside::{
    AppConfig, ExplanationService, InsightPhase, Result, StageId, Visualizer,
};
use tokio::io::AsyncWriteExt;

struct EchoService;

impl ExplanationService for EchoService {
    async fn explain(&self, concept: &str) -> Result<String> {
        Ok(format!("about {concept}"))
    }
}

fn test_config() -> AppConfig {
    AppConfig::default().with_color(false).with_debounce_ms(500)
}

#[tokio::test(start_paused = true)]
async fn test_next_and_prev_drive_surface_and_insight() {
    let mut app = Visualizer::new(Arc::new(EchoService), &test_config());
    app.start();
    assert_eq!(app.insight().stage(), Some(StageId::Intro));

    for _ in 0..4 {
        assert!(app.next());
    }
    assert!(!app.next());
    assert_eq!(app.current().id, StageId::Prediction);
    assert_eq!(app.surface().stage(), StageId::Prediction);

    assert!(app.prev());
    assert_eq!(app.navigation().index(), 3);
    assert_eq!(app.surface().stage(), StageId::Transformer);
    assert_eq!(app.insight().stage(), Some(StageId::Transformer));

    app.insight_mut().settle().await;
    assert_eq!(
        app.insight().state().text.as_deref(),
        Some("about Transformer 模块")
    );
}

#[tokio::test(start_paused = true)]
async fn test_frame_reflects_insight_phases() {
    let mut app = Visualizer::new(Arc::new(EchoService), &test_config());
    app.start();

    let frame = app.frame();
    assert!(frame.contains("PIPELINE STAGE: INTRO"));
    assert!(frame.contains("LLM 全景概览"));
    assert!(frame.contains("ARCHITECTURE OVERVIEW"));
    assert!(!frame.contains("● ● ●"));
    assert!(!frame.contains("TECHNICAL SPECIFICATIONS"));

    app.insight_mut().settle().await;
    assert_eq!(app.insight().phase(), InsightPhase::Settled);
    assert!(app.frame().contains("about LLM 全景概览"));

    app.next();
    let frame = app.frame();
    assert!(frame.contains("PIPELINE STAGE: TOKENIZATION"));
    assert!(frame.contains("Vocab: ~50,257"));
    assert!(!frame.contains("about LLM 全景概览"));
}

#[tokio::test(start_paused = true)]
async fn test_frame_marks_navigation_ends() {
    let mut app = Visualizer::new(Arc::new(EchoService), &test_config());
    app.start();

    let first = app.frame();
    assert!(first.contains("[n ►]"));
    assert!(!first.contains("[◄ p]"));
    assert!(first.contains("1/5   20%"));

    while app.next() {}
    let last = app.frame();
    assert!(last.contains("[◄ p]"));
    assert!(!last.contains("[n ►]"));
    assert!(last.contains("5/5  100%"));
}

#[tokio::test(start_paused = true)]
async fn test_frame_clamps_narrow_width() {
    let mut config = test_config();
    config.display.width = 3;
    let app = Visualizer::new(Arc::new(EchoService), &config);

    let frame = app.frame();
    let header = frame.lines().next().unwrap();
    assert_eq!(header.chars().count(), 40);
}

#[tokio::test(start_paused = true)]
async fn test_run_handles_commands_until_quit() {
    let mut app = Visualizer::new(Arc::new(EchoService), &test_config());
    let input = tokio::io::BufReader::new(&b"n\nnext\nwhat\np\nq\nn\n"[..]);
    let mut output = Vec::new();

    app.run(input, &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("PIPELINE STAGE: EMBEDDING"));
    assert!(text.contains("unknown command: \"what\""));
    // The trailing "n" after "q" is never processed
    assert_eq!(app.current().id, StageId::Tokenization);
    // No ANSI output with colour disabled
    assert!(!text.contains('\x1B'));
}

#[tokio::test(start_paused = true)]
async fn test_run_redraws_when_insight_settles() {
    let mut app = Visualizer::new(Arc::new(EchoService), &test_config());
    let (mut keyboard, server) = tokio::io::duplex(64);
    let input = tokio::io::BufReader::new(server);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        keyboard.write_all(b"q\n").await.unwrap();
    });

    let mut output = Vec::new();
    app.run(input, &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("● ● ●"));
    assert!(text.contains("about LLM 全景概览"));
}

#[tokio::test(start_paused = true)]
async fn test_run_ends_on_eof() {
    let mut app = Visualizer::new(Arc::new(EchoService), &test_config());
    let input = tokio::io::BufReader::new(&b""[..]);
    let mut output = Vec::new();

    app.run(input, &mut output).await.unwrap();

    assert_eq!(app.current().id, StageId::Intro);
    assert!(!output.is_empty());
}
