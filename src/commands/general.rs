//! General REPL commands (help, quit, queries, playback metadata)

use crate::commands::{failed, lenient_f64, parse_index, CommandContext, CommandResult};
use crate::render::{render_composite, render_grid};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `watch <file>` command
pub fn cmd_watch(args: &str, _ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: watch <file>".to_string());
    }
    CommandResult::Watch(args.to_string())
}

/// Handle `setcliplen <beats>`; non-positive lengths are ignored
pub fn cmd_setcliplen(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let beats = lenient_f64(args, 0.0);
    if ctx.session.playback_mut().set_clip_len_beats(beats) {
        CommandResult::Message(format!("Clip length: {} beats", beats))
    } else {
        CommandResult::Message(format!(
            "Clip length unchanged: {} beats",
            ctx.session.playback().clip_len_beats()
        ))
    }
}

/// Handle `setplayhead <phase> [cycle_hz]`
pub fn cmd_setplayhead(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let mut parts = args.split_whitespace();
    let phase = parts.next().map_or(0.0, |p| lenient_f64(p, 0.0));
    let playback = ctx.session.playback_mut();
    playback.set_playhead(phase);
    if let Some(hz) = parts.next() {
        playback.set_cycle_hz(lenient_f64(hz, 0.0));
    }
    CommandResult::Message(format!(
        "Playhead {:.3} ({}) at {} Hz",
        playback.play_phase(),
        if playback.play_dir().as_sign() > 0 { "forward" } else { "backward" },
        playback.cycle_hz()
    ))
}

/// Handle `get <property> [idx]`
pub fn cmd_get(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let mut parts = args.split_whitespace();
    let Some(property) = parts.next() else {
        return CommandResult::Error("Usage: get <property> [idx]".to_string());
    };
    // An unparsable index falls back to the selected layer
    let index = parts.next().and_then(parse_index);
    let value = ctx.session.query(property, index);
    CommandResult::Message(format!("{} {}", property.to_lowercase(), value))
}

/// Handle `show`: the layer grid
pub fn cmd_show(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Message(render_grid(&ctx.session))
}

/// Handle `composite`: the merged timeline
pub fn cmd_composite(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match render_composite(&ctx.session) {
        Ok(view) => CommandResult::Message(view),
        Err(e) => failed(e),
    }
}

/// Print help information
fn print_help() {
    println!("{}", "chronogrid Help".bold());
    println!("{}", "===============".bold());
    println!();
    println!("{}", "Layers:".green());
    println!("  {}  - Append a layer", "addlayer <pattern> [rot] [label...]".cyan());
    println!(
        "  {}  - Edit a layer",
        "setlayer <idx> pattern|rotate|pitch|vel|label <value>".cyan()
    );
    println!("  {}         - Rename a layer", "setlabel <idx> <label...>".cyan());
    println!("  {}             - Select a layer", "select <idx>|none".cyan());
    println!(
        "  {}  - Edit the selected layer",
        "setpattern|setrotate|setpitch|setvel|setlabelsel".cyan()
    );
    println!(
        "  {}               - Reverse a layer (selected, or all)",
        "reverse [idx]".cyan()
    );
    println!("  {}                    - Reverse every layer", "reverseall".cyan());
    println!("  {}                         - Remove all layers", "clear".cyan());
    println!();
    println!("{}", "Patterns:".green());
    println!(
        "  {} {} {} are on-steps, {} {} are off-steps; anything else is ignored",
        "1".cyan(),
        "x".cyan(),
        "X".cyan(),
        "0".cyan(),
        "-".cyan()
    );
    println!();
    println!("{}", "View & Query:".green());
    println!("  {}                          - Show the layer grid", "show".cyan());
    println!("  {}                     - Show the LCM composite", "composite".cyan());
    println!(
        "  {}          - Query a property (steps, pattern, pitch, ...)",
        "get <prop> [idx]".cyan()
    );
    println!("  {}            - Target clip length", "setcliplen <beats>".cyan());
    println!("  {}   - Playhead phase/direction", "setplayhead <phase> [hz]".cyan());
    println!();
    println!("{}", "Documents & Export:".green());
    println!("  {}                   - Print or save the document", "dump [path]".cyan());
    println!("  {}                   - Load a document", "load <path>".cyan());
    println!("  {}                  - Reload a document on change", "watch <path>".cyan());
    println!("  {}            - Write a Standard MIDI File", "export midi <path>".cyan());
    println!("  {}            - Clip tuples or notes dictionary", "export clip [path]".cyan());
    println!("  {}           - Exported note list", "export notes [path]".cyan());
    println!(
        "  {}  - Composite as one MIDI track",
        "export composite <path> [pitch] [vel]".cyan()
    );
    println!("  {}                  - Gate fraction (0-1]", "gate [value]".cyan());
    println!("  {}                   - MIDI file tempo", "tempo [bpm]".cyan());
    println!("  {}  - Rotation rule for export", "rotation [continuous|rounded]".cyan());
    println!("  {}            - Ordering at equal ticks", "tiebreak [on|off]".cyan());
    println!();
    println!("{}", "Other Commands:".green());
    println!("  {}              - Show this help", "help".bright_green());
    println!("  {}              - Exit the REPL", "quit".bright_red());
}
