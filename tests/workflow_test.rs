use assert_fs::TempDir;
use assert_fs::prelude::*;

use cuesync::config::{Config, SyncMethod, TranscriptFormat};
use cuesync::workflow::{BatchSummary, Workflow, check_file};
use cuesync::{CueSequence, CuesyncError};

const WHISPER_CPP_JSON: &str = r#"{
    "result": {"language": "en"},
    "transcription": [
        {"timestamps": {"from": "00:00:00,000", "to": "00:00:02,000"}, "offsets": {"from": 0, "to": 2000}, "text": " Good evening."},
        {"timestamps": {"from": "00:00:02,500", "to": "00:00:04,000"}, "offsets": {"from": 2500, "to": 4000}, "text": " Welcome back."}
    ]
}"#;

const OPENAI_JSON: &str = r#"{
    "text": "First. Second.",
    "language": "en",
    "segments": [
        {"id": 0, "start": 0.0, "end": 1.0, "text": "First."},
        {"id": 1, "start": 1.0, "end": 2.0, "text": "Second."}
    ]
}"#;

fn basic_config() -> Config {
    let mut config = Config::default();
    config.sync.method = SyncMethod::Basic;
    config
}

#[tokio::test]
async fn sync_file_from_whisper_cpp_transcript() {
    let temp = TempDir::new().unwrap();
    let transcript = temp.child("talk.json");
    transcript.write_str(WHISPER_CPP_JSON).unwrap();
    let text = temp.child("talk.es.txt");
    text.write_str("Buenas noches. Bienvenidos de nuevo").unwrap();
    let output = temp.child("talk.es.srt");

    let workflow = Workflow::new(basic_config()).unwrap();
    let outcome = workflow
        .sync_file(transcript.path(), text.path(), output.path())
        .await
        .unwrap();

    assert_eq!(outcome.cues.len(), 2);
    output.assert(
        "1\n00:00:00,000 --> 00:00:02,000\nBuenas noches.\n\n\
         2\n00:00:02,500 --> 00:00:04,000\nBienvenidos de nuevo.\n\n",
    );
}

#[tokio::test]
async fn sync_file_with_explicit_openai_format() {
    let temp = TempDir::new().unwrap();
    let transcript = temp.child("clip.json");
    transcript.write_str(OPENAI_JSON).unwrap();
    let text = temp.child("clip.de.txt");
    text.write_str("Erstens zweitens").unwrap();
    let output = temp.child("nested/dir/clip.de.srt");

    let mut config = Config::default();
    config.transcript.format = TranscriptFormat::OpenAI;
    config.sync.delay = 0.0;
    let workflow = Workflow::new(config).unwrap();
    let outcome = workflow
        .sync_file(transcript.path(), text.path(), output.path())
        .await
        .unwrap();

    // smart timing wants 3s of reading time but must stop half a second before the next segment
    assert_eq!(outcome.cues.len(), 1);
    assert_eq!(outcome.cues[0].start, 0.0);
    assert_eq!(outcome.cues[0].end, 0.5);
    output.assert(predicates::str::contains("00:00:00,000 --> 00:00:00,500"));
}

#[tokio::test]
async fn wrong_format_is_an_error() {
    let temp = TempDir::new().unwrap();
    let transcript = temp.child("clip.json");
    transcript.write_str(OPENAI_JSON).unwrap();
    let text = temp.child("clip.txt");
    text.write_str("hola").unwrap();

    let mut config = Config::default();
    config.transcript.format = TranscriptFormat::WhisperCpp;
    let workflow = Workflow::new(config).unwrap();
    let result = workflow
        .sync_file(transcript.path(), text.path(), temp.child("out.srt").path())
        .await;

    assert!(matches!(result, Err(CuesyncError::Json(_))));
    temp.child("out.srt").assert(predicates::path::missing());
}

#[tokio::test]
async fn invalid_segments_leave_no_output() {
    let temp = TempDir::new().unwrap();
    let transcript = temp.child("bad.json");
    transcript
        .write_str(r#"{"segments": [{"start": 2.0, "end": 1.0, "text": "x"}]}"#)
        .unwrap();
    let text = temp.child("bad.txt");
    text.write_str("texto").unwrap();

    let workflow = Workflow::new(Config::default()).unwrap();
    let result = workflow
        .sync_file(transcript.path(), text.path(), temp.child("bad.srt").path())
        .await;

    assert!(matches!(result, Err(CuesyncError::InvalidInput { index: 0, .. })));
    temp.child("bad.srt").assert(predicates::path::missing());
}

#[tokio::test]
async fn batch_processes_pairs_and_skips_the_rest() {
    let temp = TempDir::new().unwrap();
    temp.child("a.json").write_str(WHISPER_CPP_JSON).unwrap();
    temp.child("a.fr.txt").write_str("Bonsoir. Bon retour").unwrap();
    temp.child("b.json").write_str(OPENAI_JSON).unwrap();
    temp.child("b.de.txt").write_str("Nur Deutsch").unwrap();
    temp.child("sub/c.json").write_str(OPENAI_JSON).unwrap();
    temp.child("sub/c.fr.txt").write_str("Premier. Second").unwrap();
    temp.child("d.json").write_str("{ broken").unwrap();
    temp.child("d.fr.txt").write_str("rien").unwrap();

    let out = temp.child("out");
    let workflow = Workflow::new(basic_config()).unwrap();
    let summary = workflow
        .process_directory(temp.path(), "fr", Some(out.path()))
        .await
        .unwrap();

    assert_eq!(
        summary,
        BatchSummary {
            processed: 2,
            skipped: 1,
            failed: 1
        }
    );
    out.child("a.fr.srt").assert(predicates::str::contains("Bonsoir."));
    out.child("c.fr.srt").assert(predicates::str::contains("Second."));
    out.child("b.fr.srt").assert(predicates::path::missing());
}

#[test]
fn check_file_accepts_generated_output_and_rejects_overlaps() {
    let temp = TempDir::new().unwrap();
    let good = temp.child("good.srt");
    good.write_str("1\n00:00:01,000 --> 00:00:02,000\nhello\n\n2\n00:00:02,000 --> 00:00:03,500\nthere\nfriend\n\n")
        .unwrap();
    let bad = temp.child("bad.srt");
    bad.write_str("1\n00:00:01,000 --> 00:00:02,500\nhello\n\n2\n00:00:02,000 --> 00:00:03,000\nthere\n\n")
        .unwrap();

    let cues: CueSequence = tokio_test::block_on(check_file(good.path())).unwrap();
    assert_eq!(cues.len(), 2);
    assert_eq!(cues[1].lines, vec!["there", "friend"]);

    let err = tokio_test::block_on(check_file(bad.path())).unwrap_err();
    assert!(matches!(err, CuesyncError::InvalidInput { .. }));

    let err = tokio_test::block_on(check_file(temp.child("missing.srt").path())).unwrap_err();
    assert!(matches!(err, CuesyncError::FileNotFound(_)));
}
