//! Layer editing commands

use crate::commands::{lenient_f64, lenient_i64, parse_index, CommandContext, CommandResult};
use chronogrid_core::types::layer::DEFAULT_VELOCITY;
use chronogrid_core::types::pattern_string::parse_pattern_tokens;
use chronogrid_core::PatternLayer;
use colored::*;
use tracing::info;

fn describe(index: usize, layer: &PatternLayer) -> String {
    format!("Layer {}: {}", index, layer)
}

fn updated(ctx: &CommandContext, index: usize) -> CommandResult {
    match ctx.session.layers().get(index) {
        Some(layer) => CommandResult::Message(describe(index, layer).bright_green().to_string()),
        None => CommandResult::Success,
    }
}

fn no_layer(index: usize) -> CommandResult {
    CommandResult::Error(format!("No layer at index {}", index))
}

fn no_selection() -> CommandResult {
    CommandResult::Error("No layer selected (use `select <idx>`)".to_string())
}

/// Handle `addlayer <pattern> [rotation] [label...]`
pub fn cmd_addlayer(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let mut parts = args.split_whitespace();
    let Some(pattern) = parts.next() else {
        return CommandResult::Error("Usage: addlayer <pattern> [rotation] [label...]".to_string());
    };
    let rotation = parts.next().map_or(0.0, |r| lenient_f64(r, 0.0));
    let label = parts.collect::<Vec<_>>().join(" ");

    let index = ctx.session.layers_mut().add_layer(pattern, rotation, &label);
    info!(index, "layer added");
    updated(ctx, index)
}

/// Apply `<prop> <value...>` to one layer
fn set_property(ctx: &mut CommandContext, index: usize, prop: &str, values: &[&str]) -> CommandResult {
    let Some(layer) = ctx.session.layers_mut().get_mut(index) else {
        return no_layer(index);
    };
    let first = values.first().copied();

    match (prop.to_lowercase().as_str(), first) {
        ("pattern", Some(_)) => layer.set_pattern(parse_pattern_tokens(values)),
        ("rotate" | "rotation", Some(v)) => layer.set_rotation(lenient_f64(v, 0.0)),
        ("pitch", Some(v)) => layer.set_pitch(lenient_i64(v, 0)),
        ("vel" | "velocity", Some(v)) => layer.set_velocity(lenient_i64(v, DEFAULT_VELOCITY as i64)),
        ("label", _) => layer.set_label(values.join(" ")),
        (other, Some(_)) => {
            return CommandResult::Error(format!(
                "Unknown layer property '{}' (pattern, rotate, pitch, vel, label)",
                other
            ))
        }
        (other, None) => return CommandResult::Error(format!("Missing value for '{}'", other)),
    }
    updated(ctx, index)
}

/// Handle `setlayer <idx> pattern|rotate|pitch|vel|label <value...>`
pub fn cmd_setlayer(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.as_slice() {
        [idx, prop, values @ ..] => match parse_index(idx) {
            Some(index) => set_property(ctx, index, prop, values),
            None => CommandResult::Error(format!("Invalid layer index: {}", idx)),
        },
        _ => CommandResult::Error(
            "Usage: setlayer <idx> pattern|rotate|pitch|vel|label <value...>".to_string(),
        ),
    }
}

/// Handle `setlabel <idx> <label...>`
pub fn cmd_setlabel(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.as_slice() {
        [idx, label @ ..] => match parse_index(idx) {
            Some(index) => set_property(ctx, index, "label", label),
            None => CommandResult::Error(format!("Invalid layer index: {}", idx)),
        },
        [] => CommandResult::Error("Usage: setlabel <idx> <label...>".to_string()),
    }
}

/// Handle `select <idx>`; `select none` (or `-1`) clears the selection
pub fn cmd_select(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if matches!(args, "none" | "-1") {
        ctx.session.layers_mut().deselect();
        return CommandResult::Message("No layer selected".to_string());
    }
    let Some(index) = parse_index(args) else {
        return CommandResult::Error("Usage: select <idx>|none".to_string());
    };
    if ctx.session.layers_mut().select(index) {
        CommandResult::Message(format!("Selected layer {}", index))
    } else {
        no_layer(index)
    }
}

/// Run `<prop> <args>` against the selected layer
fn set_selected(ctx: &mut CommandContext, prop: &str, args: &str) -> CommandResult {
    let Some(index) = ctx.session.layers().selected() else {
        return no_selection();
    };
    let values: Vec<&str> = args.split_whitespace().collect();
    set_property(ctx, index, prop, &values)
}

/// Handle `setpattern <pattern...>` on the selected layer
pub fn cmd_setpattern(args: &str, ctx: &mut CommandContext) -> CommandResult {
    set_selected(ctx, "pattern", args)
}

/// Handle `setrotate <steps>` on the selected layer
pub fn cmd_setrotate(args: &str, ctx: &mut CommandContext) -> CommandResult {
    set_selected(ctx, "rotate", args)
}

/// Handle `setpitch <note>` on the selected layer
pub fn cmd_setpitch(args: &str, ctx: &mut CommandContext) -> CommandResult {
    set_selected(ctx, "pitch", args)
}

/// Handle `setvel <velocity>` on the selected layer
pub fn cmd_setvel(args: &str, ctx: &mut CommandContext) -> CommandResult {
    set_selected(ctx, "vel", args)
}

/// Handle `setlabelsel <label...>` on the selected layer
pub fn cmd_setlabelsel(args: &str, ctx: &mut CommandContext) -> CommandResult {
    set_selected(ctx, "label", args)
}

/// Handle `reverse [idx]`: the given layer, else the selected one, else all
pub fn cmd_reverse(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if ctx.session.layers().is_empty() {
        return CommandResult::Success;
    }
    if args.is_empty() {
        ctx.session.layers_mut().reverse_selected_or_all();
        return CommandResult::Message("Reversed".to_string());
    }
    match parse_index(args) {
        Some(index) if ctx.session.layers_mut().reverse_layer(index) => updated(ctx, index),
        Some(index) => no_layer(index),
        None => CommandResult::Error(format!("Invalid layer index: {}", args)),
    }
}

/// Handle `reverseall`
pub fn cmd_reverseall(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.session.layers_mut().reverse_all();
    CommandResult::Message(format!("Reversed {} layers", ctx.session.layers().len()))
}

/// Handle `clear`
pub fn cmd_clear(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.session.layers_mut().clear();
    info!("layers cleared");
    CommandResult::Message("Cleared all layers".to_string())
}
