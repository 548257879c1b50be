//! Command-line interface

use anyhow::{anyhow, Context, Result};
use chronogrid_core::{ExportConfig, RotationMode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Layered rhythm-pattern editor with LCM compositing and MIDI export
#[derive(Parser, Debug)]
#[command(name = "chronogrid")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Gate fraction of each step that sounds (0-1]
    #[arg(long, global = true)]
    pub gate: Option<f64>,

    /// MIDI resolution
    #[arg(long, global = true)]
    pub ticks_per_beat: Option<u16>,

    /// Tempo written into MIDI files
    #[arg(long, global = true)]
    pub bpm: Option<f64>,

    /// Rotation rule for export: continuous or rounded
    #[arg(long, global = true)]
    pub rotation: Option<String>,

    /// Layer-set document to open in the REPL
    #[arg(short, long)]
    pub load: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a layer-set document into a Standard MIDI File
    #[command(name = "export-midi")]
    ExportMidi {
        /// Layer-set document (JSON)
        document: PathBuf,
        /// Output .mid path
        output: PathBuf,
    },

    /// Print the composite of a layer-set document
    #[command(name = "composite")]
    Composite {
        /// Layer-set document (JSON)
        document: PathBuf,
    },
}

impl Cli {
    /// Export settings from the defaults plus any flags given
    pub fn export_config(&self) -> Result<ExportConfig> {
        let mut config = ExportConfig::default();
        if let Some(gate) = self.gate {
            config = config.with_gate(gate);
        }
        if let Some(ticks) = self.ticks_per_beat {
            config = ExportConfig::new(config.gate, ticks);
        }
        if let Some(bpm) = self.bpm {
            config = config.with_bpm(bpm);
        }
        if let Some(name) = &self.rotation {
            let mode = RotationMode::from_str(name)
                .ok_or_else(|| anyhow!("unknown rotation mode '{}'", name))
                .context("expected `continuous` or `rounded`")?;
            config = config.with_rotation(mode);
        }
        Ok(config)
    }
}
