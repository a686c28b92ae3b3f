use crate::e2e::helpers::{fixtures, RecordingTtsRepository, TestContext};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tts_audiobook::domain::audiobook::{
    split_into_segments, AudiobookError, AudiobookServiceApi, VoiceGender, DEFAULT_SILENCE_GAP,
};
use tts_audiobook::infrastructure::audio::decode_mp3_file;
use tts_audiobook::infrastructure::repositories::SynthesisError;

const MAX_LEN: usize = 40;
const CLIP_SECONDS: f64 = 0.3;

fn assert_close(actual: Duration, expected: Duration, tolerance: Duration) {
    let diff = if actual > expected {
        actual - expected
    } else {
        expected - actual
    };
    assert!(
        diff <= tolerance,
        "expected {:?} within {:?} of {:?}",
        actual,
        tolerance,
        expected
    );
}

#[tokio::test]
async fn test_full_run_produces_joined_audiobook() {
    let ctx = TestContext::new().unwrap();
    let text = fixtures::prose(40);
    ctx.write_text(&text).unwrap();

    let expected_segments = split_into_segments(&text, MAX_LEN);
    let fake = Arc::new(RecordingTtsRepository::new(MAX_LEN, CLIP_SECONDS));
    let service = ctx.service(fake.clone());

    let summary = service
        .run(&ctx.request(VoiceGender::Female, 0))
        .await
        .unwrap();

    let n = expected_segments.len();
    assert!(n > 3);
    assert_eq!(summary.segment_count, n);
    assert_eq!(summary.synthesis.synthesized, n);
    assert_eq!(summary.synthesis.skipped, 0);
    assert_eq!(summary.join.clip_count, n);
    assert!(summary.scratch_removed);

    let texts: Vec<String> = expected_segments.into_iter().map(|s| s.text).collect();
    assert_eq!(fake.texts(), texts);
    assert!(fake.genders().iter().all(|g| *g == VoiceGender::Female));

    let clip = fixtures::decoded_duration(fake.audio());
    let expected = clip * n as u32 + DEFAULT_SILENCE_GAP * (n as u32 - 1);
    assert_close(summary.join.duration, expected, Duration::from_millis(5));

    assert!(ctx.output().exists());
    assert!(!ctx.scratch_dir().exists());
    let metadata = std::fs::metadata(ctx.output()).unwrap();
    assert_eq!(metadata.len() as usize, summary.join.output_size);

    let decoded = decode_mp3_file(&ctx.output()).unwrap();
    assert_close(decoded.duration(), expected, Duration::from_millis(200));
}

#[tokio::test]
async fn test_rerun_only_synthesizes_missing_segments() {
    let ctx = TestContext::new().unwrap();
    let text = fixtures::prose(40);
    ctx.write_text(&text).unwrap();

    let segments = split_into_segments(&text, MAX_LEN);
    let fake = Arc::new(RecordingTtsRepository::new(MAX_LEN, CLIP_SECONDS));

    let cache = ctx.cache();
    cache.ensure().unwrap();
    cache.store(0, fake.audio()).unwrap();
    cache.store(1, fake.audio()).unwrap();

    let summary = ctx
        .service(fake.clone())
        .run(&ctx.request(VoiceGender::Neutral, 0))
        .await
        .unwrap();

    assert_eq!(summary.synthesis.skipped, 2);
    assert_eq!(summary.synthesis.synthesized, segments.len() - 2);
    assert_eq!(summary.join.clip_count, segments.len());

    let remaining: Vec<String> = segments.into_iter().skip(2).map(|s| s.text).collect();
    assert_eq!(fake.texts(), remaining);
    assert!(ctx.output().exists());
}

#[tokio::test]
async fn test_fully_cached_run_makes_no_requests() {
    let ctx = TestContext::new().unwrap();
    let text = fixtures::prose(25);
    ctx.write_text(&text).unwrap();

    let segments = split_into_segments(&text, MAX_LEN);
    let fake = Arc::new(RecordingTtsRepository::new(MAX_LEN, CLIP_SECONDS));

    let cache = ctx.cache();
    cache.ensure().unwrap();
    for segment in &segments {
        cache.store(segment.index, fake.audio()).unwrap();
    }

    let summary = ctx
        .service(fake.clone())
        .run(&ctx.request(VoiceGender::Neutral, 0))
        .await
        .unwrap();

    assert_eq!(fake.call_count(), 0);
    assert_eq!(summary.synthesis.skipped, segments.len());
    assert_eq!(summary.join.clip_count, segments.len());
    assert!(ctx.output().exists());
}

#[tokio::test]
async fn test_failure_keeps_cache_and_next_run_resumes() {
    let ctx = TestContext::new().unwrap();
    let text = fixtures::prose(40);
    ctx.write_text(&text).unwrap();

    let segments = split_into_segments(&text, MAX_LEN);
    let failing = Arc::new(RecordingTtsRepository::new(MAX_LEN, CLIP_SECONDS).failing_on_call(2));

    let err = ctx
        .service(failing.clone())
        .run(&ctx.request(VoiceGender::Male, 0))
        .await
        .unwrap_err();

    match err {
        AudiobookError::Synthesis { index, source } => {
            assert_eq!(index, 2);
            assert!(matches!(source, SynthesisError::QuotaExceeded(_)));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!ctx.output().exists());

    let cached: Vec<usize> = ctx.cache().entries().unwrap().iter().map(|a| a.index).collect();
    assert_eq!(cached, vec![0, 1]);

    let retry = Arc::new(RecordingTtsRepository::new(MAX_LEN, CLIP_SECONDS));
    let summary = ctx
        .service(retry.clone())
        .run(&ctx.request(VoiceGender::Male, 0))
        .await
        .unwrap();

    assert_eq!(retry.call_count(), segments.len() - 2);
    assert_eq!(summary.synthesis.skipped, 2);
    assert_eq!(summary.join.clip_count, segments.len());
    assert!(ctx.output().exists());
    assert!(!ctx.scratch_dir().exists());
}

#[tokio::test]
async fn test_whitespace_only_input_is_rejected_before_any_work() {
    let ctx = TestContext::new().unwrap();
    ctx.write_text("  \n\t  \n").unwrap();

    let fake = Arc::new(RecordingTtsRepository::new(MAX_LEN, CLIP_SECONDS));
    let err = ctx
        .service(fake.clone())
        .run(&ctx.request(VoiceGender::Neutral, 0))
        .await
        .unwrap_err();

    assert!(matches!(err, AudiobookError::EmptyInput));
    assert_eq!(fake.call_count(), 0);
    assert!(!ctx.scratch_dir().exists());
    assert!(!ctx.output().exists());
}

#[tokio::test]
async fn test_missing_text_file_is_io_error() {
    let ctx = TestContext::new().unwrap();
    let fake = Arc::new(RecordingTtsRepository::new(MAX_LEN, CLIP_SECONDS));

    let err = ctx
        .service(fake)
        .run(&ctx.request(VoiceGender::Neutral, 0))
        .await
        .unwrap_err();

    assert!(matches!(err, AudiobookError::Io(_)));
}

#[tokio::test]
async fn test_length_limits_converted_characters() {
    let ctx = TestContext::new().unwrap();
    ctx.write_text("alpha beta gamma delta epsilon").unwrap();

    let fake = Arc::new(RecordingTtsRepository::new(MAX_LEN, CLIP_SECONDS));
    let summary = ctx
        .service(fake.clone())
        .run(&ctx.request(VoiceGender::Neutral, 10))
        .await
        .unwrap();

    assert_eq!(summary.segment_count, 1);
    assert_eq!(fake.texts(), vec!["alpha beta".to_string()]);
}

#[tokio::test]
async fn test_foreign_files_keep_scratch_directory() {
    let ctx = TestContext::new().unwrap();
    ctx.write_text(&fixtures::prose(10)).unwrap();

    std::fs::create_dir_all(ctx.scratch_dir()).unwrap();
    let foreign = ctx.scratch_dir().join("notes.txt");
    std::fs::write(&foreign, "not audio").unwrap();

    let fake = Arc::new(RecordingTtsRepository::new(MAX_LEN, CLIP_SECONDS));
    let summary = ctx
        .service(fake)
        .run(&ctx.request(VoiceGender::Neutral, 0))
        .await
        .unwrap();

    assert!(!summary.scratch_removed);
    assert!(foreign.exists());
    assert!(ctx.output().exists());
    assert!(ctx.cache().entries().unwrap().is_empty());
}

#[tokio::test]
async fn test_segments_respect_provider_limit() {
    let ctx = TestContext::new().unwrap();
    let text = "abcd ".repeat(2400);
    assert_eq!(text.chars().count(), 12_000);
    ctx.write_text(&text).unwrap();

    let fake = Arc::new(RecordingTtsRepository::new(5000, 0.1));
    let summary = ctx
        .service(fake.clone())
        .run(&ctx.request(VoiceGender::Neutral, 0))
        .await
        .unwrap();

    assert_eq!(summary.segment_count, 3);
    assert_eq!(fake.call_count(), 3);
    assert!(fake.texts().iter().all(|t| t.len() <= 5000));
    assert_eq!(fake.texts().join(" "), text.trim_end());
}

#[tokio::test]
async fn test_unwritable_output_keeps_cached_segments() {
    let ctx = TestContext::new().unwrap();
    let text = fixtures::prose(40);
    ctx.write_text(&text).unwrap();

    let segments = split_into_segments(&text, MAX_LEN);
    let fake = Arc::new(RecordingTtsRepository::new(MAX_LEN, CLIP_SECONDS));

    // Every segment already synthesized by an earlier run
    let cache = ctx.cache();
    cache.ensure().unwrap();
    for segment in &segments {
        cache.store(segment.index, fake.audio()).unwrap();
    }

    let missing_dir = ctx.path().join("missing_dir");
    let mut request = ctx.request(VoiceGender::Neutral, 0);
    request.output = missing_dir.join("book.mp3");

    let err = ctx.service(fake.clone()).run(&request).await.unwrap_err();

    assert!(matches!(err, AudiobookError::Io(_)));
    assert_eq!(fake.call_count(), 0);
    assert_eq!(ctx.cache().entries().unwrap().len(), segments.len());

    std::fs::create_dir_all(&missing_dir).unwrap();
    let retry = Arc::new(RecordingTtsRepository::new(MAX_LEN, CLIP_SECONDS));
    let summary = ctx.service(retry.clone()).run(&request).await.unwrap();

    assert_eq!(retry.call_count(), 0);
    assert_eq!(summary.synthesis.skipped, segments.len());
    assert_eq!(summary.join.clip_count, segments.len());
    assert!(request.output.exists());
}

#[tokio::test]
async fn test_unwritable_output_fails_before_synthesis() {
    let ctx = TestContext::new().unwrap();
    ctx.write_text(&fixtures::prose(20)).unwrap();

    let fake = Arc::new(RecordingTtsRepository::new(MAX_LEN, CLIP_SECONDS));
    let mut request = ctx.request(VoiceGender::Neutral, 0);
    request.output = ctx.path().join("missing_dir").join("book.mp3");

    let err = ctx.service(fake.clone()).run(&request).await.unwrap_err();

    assert!(matches!(err, AudiobookError::Io(_)));
    assert_eq!(fake.call_count(), 0);
    assert!(!ctx.scratch_dir().exists());
}

#[tokio::test]
async fn test_existing_output_survives_failed_run() {
    let ctx = TestContext::new().unwrap();
    ctx.write_text(&fixtures::prose(20)).unwrap();
    std::fs::write(ctx.output(), b"previous audiobook").unwrap();

    let failing = Arc::new(RecordingTtsRepository::new(MAX_LEN, CLIP_SECONDS).failing_on_call(0));
    let err = ctx
        .service(failing)
        .run(&ctx.request(VoiceGender::Neutral, 0))
        .await
        .unwrap_err();

    assert!(matches!(err, AudiobookError::Synthesis { index: 0, .. }));
    assert_eq!(std::fs::read(ctx.output()).unwrap(), b"previous audiobook");
}
