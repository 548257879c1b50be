use chronogrid::commands::{create_registry, CommandContext, CommandResult};
use chronogrid::EditorSession;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

fn run_script(ctx: &mut CommandContext, script: &[&str]) -> Vec<CommandResult> {
    let registry = create_registry();
    script.iter().map(|line| registry.execute(line, ctx)).collect()
}

#[test]
fn test_edit_then_query() {
    let mut ctx = CommandContext::default();
    let results = run_script(
        &mut ctx,
        &[
            "addlayer 1000 0 Kick",
            "addlayer 101",
            "select 1",
            "setpitch 38",
            "setrotate 1",
            "get compositesteps",
            "get pitch",
            "get rotate 1",
            "get label 5",
        ],
    );
    assert!(results.iter().all(|r| !matches!(r, CommandResult::Error(_))));
    assert_eq!(results[5], CommandResult::Message("compositesteps 12".to_string()));
    assert_eq!(results[6], CommandResult::Message("pitch 38".to_string()));
    assert_eq!(results[7], CommandResult::Message("rotate 1".to_string()));
    assert_eq!(results[8], CommandResult::Message("label null".to_string()));
}

#[test]
fn test_document_and_midi_files() {
    let dir = tempdir().unwrap();
    let doc = dir.path().join("set.json");
    let mid = dir.path().join("set.mid");

    let mut ctx = CommandContext::default();
    let script = [
        "addlayer x--- 0 Kick".to_string(),
        "addlayer x-x".to_string(),
        "setcliplen 8".to_string(),
        "setplayhead -0.5 2".to_string(),
        format!("dump {}", doc.display()),
        format!("export midi {}", mid.display()),
    ];
    let lines: Vec<&str> = script.iter().map(String::as_str).collect();
    let results = run_script(&mut ctx, &lines);
    assert!(results.iter().all(|r| matches!(r, CommandResult::Message(_))));

    let mut reloaded = EditorSession::new();
    reloaded.load_file(&doc).unwrap();
    assert_eq!(reloaded.layers(), ctx.session.layers());
    assert_eq!(reloaded.playback(), ctx.session.playback());
    assert_eq!(reloaded.query("cycle_hz", None), "2");
    assert_eq!(reloaded.query("play_dir", None), "-1");

    let bytes = fs::read(&mid).unwrap();
    assert_eq!(&bytes[..4], b"MThd");
    assert_eq!(bytes, reloaded.midi_bytes("set").unwrap());
}

#[test]
fn test_malformed_load_is_reported() {
    let dir = tempdir().unwrap();
    let doc = dir.path().join("broken.json");
    fs::write(&doc, r#"{"layers": "nope"}"#).unwrap();

    let mut ctx = CommandContext::default();
    let line = format!("load {}", doc.display());
    let results = run_script(&mut ctx, &["addlayer 1", &line]);
    match &results[1] {
        CommandResult::Error(msg) => assert!(msg.contains("Malformed")),
        other => panic!("expected an error, got {:?}", other),
    }
    assert_eq!(ctx.session.layers().len(), 1);
}
