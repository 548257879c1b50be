// chronogrid-core/src/types/mod.rs

pub mod export_config;
pub mod layer;
pub mod layer_set;
pub mod pattern_string;
pub mod playback;
pub mod time;

pub use export_config::{ExportConfig, RotationMode, TieBreak};
pub use layer::PatternLayer;
pub use layer_set::LayerSet;
pub use playback::{PlayDirection, PlaybackState};
pub use time::Ticks;
