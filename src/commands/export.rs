//! Document and export commands

use crate::commands::{failed, lenient_f64, lenient_i64, CommandContext, CommandResult};
use anyhow::Context;
use chronogrid_core::types::export_config::clamp_gate;
use chronogrid_core::types::layer::{DEFAULT_BASE_PITCH, DEFAULT_VELOCITY};
use chronogrid_core::{RotationMode, TieBreak};
use colored::*;
use std::fs;
use std::path::Path;

/// Handle `dump [path]`: print the document, or save it
pub fn cmd_dump(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return match ctx.session.document_json() {
            Ok(json) => CommandResult::Message(json),
            Err(e) => failed(e),
        };
    }
    match ctx.session.save_file(Path::new(args)) {
        Ok(()) => CommandResult::Message(
            format!(
                "Saved {} layers to {}",
                ctx.session.layers().len(),
                args.bright_green()
            ),
        ),
        Err(e) => failed(e),
    }
}

/// Handle `load <path>`
pub fn cmd_load(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: load <path>".to_string());
    }
    match ctx.session.load_file(Path::new(args)) {
        Ok(()) => CommandResult::Message(format!(
            "Loaded {} layers from {}",
            ctx.session.layers().len(),
            args.bright_green()
        )),
        Err(e) => failed(e),
    }
}

/// Handle `export midi <path>`
pub fn cmd_export_midi(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: export midi <path>".to_string());
    }
    match ctx.session.write_midi_file(Path::new(args)) {
        Ok(count) => CommandResult::Message(
            format!("Wrote {} notes to {}", count, args.bright_green())
        ),
        Err(e) => failed(e),
    }
}

/// Handle `export composite <path> [pitch] [velocity]`
pub fn cmd_export_composite(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let mut parts = args.split_whitespace();
    let Some(path) = parts.next() else {
        return CommandResult::Error("Usage: export composite <path> [pitch] [velocity]".to_string());
    };
    let pitch = parts.next().map_or(DEFAULT_BASE_PITCH as i64, |p| lenient_i64(p, 0));
    let velocity = parts
        .next()
        .map_or(DEFAULT_VELOCITY as i64, |v| lenient_i64(v, DEFAULT_VELOCITY as i64));
    match ctx
        .session
        .write_composite_midi_file(Path::new(path), pitch, velocity)
    {
        Ok(count) => CommandResult::Message(format!(
            "Wrote {} composite notes to {}",
            count,
            path.bright_green()
        )),
        Err(e) => failed(e),
    }
}

fn write_json<T: serde::Serialize>(path: &str, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path))
}

/// Handle `export clip [path]`: flat tuples to the terminal, or a notes
/// dictionary file
pub fn cmd_export_clip(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return match ctx.session.clip_tuples() {
            Ok(flat) => CommandResult::Message(
                flat.iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Err(e) => failed(e),
        };
    }
    let result = ctx
        .session
        .clip_notes()
        .map_err(anyhow::Error::from)
        .and_then(|notes| write_json(args, &notes).map(|()| notes.notes.len()));
    match result {
        Ok(count) => CommandResult::Message(format!("Wrote {} clip notes to {}", count, args.bright_green())),
        Err(e) => failed(e),
    }
}

/// Handle `export notes [path]`
pub fn cmd_export_notes(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let notes = match ctx.session.export_notes() {
        Ok(notes) => notes,
        Err(e) => return failed(e),
    };
    if args.is_empty() {
        let lines: Vec<String> = notes
            .iter()
            .map(|n| {
                format!(
                    "pitch {:>3} start {:>8.4} dur {:.4} vel {}",
                    n.pitch, n.start_beat, n.duration_beats, n.velocity
                )
            })
            .collect();
        return CommandResult::Message(lines.join("\n"));
    }
    match write_json(args, &notes) {
        Ok(()) => CommandResult::Message(format!("Wrote {} notes to {}", notes.len(), args.bright_green())),
        Err(e) => failed(e),
    }
}

/// Handle `gate [fraction]`
pub fn cmd_gate(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if !args.is_empty() {
        let config = ctx.session.config_mut();
        config.gate = clamp_gate(lenient_f64(args, config.gate));
    }
    CommandResult::Message(format!("Gate: {}", ctx.session.config().gate))
}

/// Handle `tempo [bpm]`: tempo written into exported MIDI files
pub fn cmd_tempo(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Current tempo: {:.1} BPM", ctx.session.config().bpm));
    }

    match args.parse::<f64>() {
        Ok(bpm) if bpm > 0.0 && bpm <= 400.0 => {
            ctx.session.config_mut().bpm = bpm;
            CommandResult::Message(format!("Tempo set to {:.1} BPM", bpm).bright_green().to_string())
        }
        _ => CommandResult::Error("Invalid tempo. Use a value between 1-400 BPM".to_string()),
    }
}

/// Handle `rotation [continuous|rounded]`
pub fn cmd_rotation(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if !args.is_empty() {
        match RotationMode::from_str(args) {
            Some(mode) => ctx.session.config_mut().rotation = mode,
            None => {
                return CommandResult::Error(format!(
                    "Unknown rotation mode '{}' (continuous, rounded)",
                    args
                ))
            }
        }
    }
    CommandResult::Message(format!("Rotation: {}", ctx.session.config().rotation.name()))
}

/// Handle `tiebreak [on|off]`
pub fn cmd_tiebreak(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if !args.is_empty() {
        match TieBreak::from_str(args) {
            Some(order) => ctx.session.config_mut().tie_break = order,
            None => {
                return CommandResult::Error(format!("Unknown tie-break '{}' (on, off)", args))
            }
        }
    }
    CommandResult::Message(format!("Tie-break: {}", ctx.session.config().tie_break.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::layer::cmd_addlayer;
    use tempfile::tempdir;

    fn ctx() -> CommandContext {
        let mut ctx = CommandContext::default();
        cmd_addlayer("1010 0 Kick", &mut ctx);
        ctx
    }

    #[test]
    fn test_export_on_empty_session_is_an_error() {
        let mut ctx = CommandContext::default();
        assert!(matches!(cmd_export_notes("", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_export_clip("", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_export_clip_tuples() {
        let mut ctx = ctx();
        cmd_gate("1", &mut ctx);
        assert_eq!(
            cmd_export_clip("", &mut ctx),
            CommandResult::Message("36 0 1 100 0 36 2 1 100 0".to_string())
        );
    }

    #[test]
    fn test_dump_and_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layers.json");
        let path_arg = path.to_str().unwrap();

        let mut ctx = ctx();
        assert!(matches!(cmd_dump(path_arg, &mut ctx), CommandResult::Message(_)));

        let mut other = CommandContext::default();
        assert!(matches!(cmd_load(path_arg, &mut other), CommandResult::Message(_)));
        assert_eq!(other.session.layers(), ctx.session.layers());
    }

    #[test]
    fn test_load_missing_file() {
        let mut ctx = CommandContext::default();
        assert!(matches!(
            cmd_load("/definitely/not/here.json", &mut ctx),
            CommandResult::Error(_)
        ));
    }

    #[test]
    fn test_export_midi_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.mid");
        let mut ctx = ctx();
        let result = cmd_export_midi(path.to_str().unwrap(), &mut ctx);
        assert!(matches!(result, CommandResult::Message(_)));
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"MThd");
    }

    #[test]
    fn test_export_composite_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("composite.mid");
        let mut ctx = ctx();
        cmd_addlayer("101", &mut ctx);
        let arg = format!("{} 60 90", path.display());
        match cmd_export_composite(&arg, &mut ctx) {
            CommandResult::Message(text) => assert!(text.starts_with("Wrote 3 composite notes")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(&fs::read(&path).unwrap()[..4], b"MThd");
        assert!(matches!(cmd_export_composite("", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_export_notes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        let mut ctx = ctx();
        cmd_export_notes(path.to_str().unwrap(), &mut ctx);
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[1]["start_beat"], 2.0);
    }

    #[test]
    fn test_config_commands() {
        let mut ctx = ctx();
        cmd_gate("3", &mut ctx);
        assert_eq!(ctx.session.config().gate, 1.0);
        assert!(matches!(cmd_tempo("0", &mut ctx), CommandResult::Error(_)));
        cmd_tempo("96", &mut ctx);
        assert_eq!(ctx.session.config().bpm, 96.0);
        cmd_rotation("rounded", &mut ctx);
        assert_eq!(ctx.session.config().rotation, RotationMode::Rounded);
        assert!(matches!(cmd_rotation("sideways", &mut ctx), CommandResult::Error(_)));
        cmd_tiebreak("off", &mut ctx);
        assert_eq!(ctx.session.config().tie_break, TieBreak::NoteOffFirst);
    }
}
