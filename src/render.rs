//! Terminal views of a session

use crate::session::EditorSession;
use chronogrid_core::types::pattern_string::{to_mark_string, BLANK, MARK};
use chronogrid_core::composite::resample_layer;
use chronogrid_core::PatternLayer;
use colored::*;

fn cells(steps: &[bool]) -> String {
    steps
        .iter()
        .map(|&on| {
            if on {
                MARK.to_string().bright_green().bold().to_string()
            } else {
                BLANK.to_string().dimmed().to_string()
            }
        })
        .collect()
}

/// A layer's native steps with its rotation applied, as the composite sees them
fn rotated_steps(layer: &PatternLayer) -> Vec<bool> {
    resample_layer(layer, layer.steps())
}

/// One row per layer followed by the composite row
pub fn render_grid(session: &EditorSession) -> String {
    let layers = session.layers();
    if layers.is_empty() {
        return "No layers (try: addlayer 1010 0 Kick)".to_string();
    }

    let label_width = layers
        .iter()
        .map(|layer| layer.label().chars().count())
        .max()
        .unwrap_or(0)
        .max(5);
    let selected = layers.selected();

    let mut out = String::new();
    for (index, layer) in layers.iter().enumerate() {
        let marker = if selected == Some(index) {
            ">".bright_yellow().bold().to_string()
        } else {
            " ".to_string()
        };
        out.push_str(&format!(
            "{}{:>2} {:<width$} {}  {} steps",
            marker,
            index,
            layer.label(),
            cells(&rotated_steps(layer)),
            layer.steps(),
            width = label_width
        ));
        if layer.rotation() != 0.0 {
            out.push_str(&format!(" rot {}", layer.rotation()));
        }
        out.push_str(&format!(" pitch {} vel {}\n", layer.pitch(), layer.velocity()));
    }

    let composite = match session.composite() {
        Ok(composite) => format!("{}  {} steps", cells(&composite), composite.len()),
        Err(err) => err.to_string().red().to_string(),
    };
    out.push_str(&format!(
        "   {:<width$} {}",
        "all".bright_cyan(),
        composite,
        width = label_width
    ));
    out
}

/// The composite as mark glyphs and as a 0/1 list
pub fn render_composite(session: &EditorSession) -> chronogrid_core::Result<String> {
    let composite = session.composite()?;
    Ok(format!(
        "Composite ({} steps): {}\n{}",
        composite.len(),
        to_mark_string(&composite),
        composite
            .iter()
            .map(|&on| if on { "1" } else { "0" })
            .collect::<Vec<_>>()
            .join(" ")
    ))
}
