//! Command registry for REPL commands
//!
//! Every line typed at the prompt is routed here by longest matching prefix.

pub mod export;
pub mod general;
pub mod layer;

use crate::session::EditorSession;
use chronogrid_core::ChronoError;
use tracing::warn;

/// Result of executing a command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// No registered command matches the input
    NotACommand,
    /// Error occurred
    Error(String),
    /// Watch a document file for changes
    Watch(String),
}

/// Context passed to command handlers
pub struct CommandContext {
    pub session: EditorSession,
}

impl CommandContext {
    pub fn new(session: EditorSession) -> Self {
        Self { session }
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new(EditorSession::new())
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = input[prefix.len()..].trim();
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Layer editing
    registry.register("addlayer", layer::cmd_addlayer);
    registry.register("setlayer", layer::cmd_setlayer);
    registry.register("setlabel", layer::cmd_setlabel);
    registry.register("select", layer::cmd_select);
    registry.register("setpattern", layer::cmd_setpattern);
    registry.register("setrotate", layer::cmd_setrotate);
    registry.register("setpitch", layer::cmd_setpitch);
    registry.register("setvel", layer::cmd_setvel);
    registry.register("setlabelsel", layer::cmd_setlabelsel);
    registry.register("reverse", layer::cmd_reverse);
    registry.register("reverseall", layer::cmd_reverseall);
    registry.register("clear", layer::cmd_clear);

    // Playback metadata and queries
    registry.register("setcliplen", general::cmd_setcliplen);
    registry.register("setplayhead", general::cmd_setplayhead);
    registry.register("get", general::cmd_get);
    registry.register("show", general::cmd_show);
    registry.register("composite", general::cmd_composite);

    // Documents and export
    registry.register("dump", export::cmd_dump);
    registry.register("load", export::cmd_load);
    registry.register("export midi", export::cmd_export_midi);
    registry.register("export clip", export::cmd_export_clip);
    registry.register("export notes", export::cmd_export_notes);
    registry.register("export composite", export::cmd_export_composite);
    registry.register("gate", export::cmd_gate);
    registry.register("tempo", export::cmd_tempo);
    registry.register("rotation", export::cmd_rotation);
    registry.register("tiebreak", export::cmd_tiebreak);

    // General commands
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);
    registry.register("watch", general::cmd_watch);

    registry
}

/// Turn a failure into an error result. Core errors carry their code.
pub(crate) fn failed(err: impl Into<anyhow::Error>) -> CommandResult {
    let err = err.into();
    match err.chain().find_map(|cause| cause.downcast_ref::<ChronoError>()) {
        Some(core) => CommandResult::Error(format!("{:#} [{}]", err, core.error_code())),
        None => CommandResult::Error(format!("{:#}", err)),
    }
}

/// Parse a layer index argument
pub(crate) fn parse_index(token: &str) -> Option<usize> {
    token.parse::<usize>().ok()
}

/// Lenient float: unparsable text falls back to `default`
pub(crate) fn lenient_f64(token: &str, default: f64) -> f64 {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            warn!(token, default, "not a number, using default");
            default
        }
    }
}

/// Lenient integer: fractional input truncates, unparsable text falls back
/// to `default`
pub(crate) fn lenient_i64(token: &str, default: i64) -> i64 {
    if let Ok(value) = token.parse::<i64>() {
        return value;
    }
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => value.trunc() as i64,
        _ => {
            warn!(token, default, "not an integer, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(registry: &CommandRegistry, ctx: &mut CommandContext, line: &str) -> CommandResult {
        registry.execute(line, ctx)
    }

    #[test]
    fn test_longest_prefix_wins() {
        let registry = create_registry();
        let mut ctx = CommandContext::default();
        run(&registry, &mut ctx, "addlayer 1000");
        run(&registry, &mut ctx, "addlayer 101");
        run(&registry, &mut ctx, "select 0");

        // "reverseall" must not be routed to "reverse"
        run(&registry, &mut ctx, "reverseall");
        assert_eq!(ctx.session.query("pattern", Some(0)), "0001");
        assert_eq!(ctx.session.query("pattern", Some(1)), "101");

        // "setlabelsel" must not be routed to "setlabel"
        run(&registry, &mut ctx, "setlabelsel Big Kick");
        assert_eq!(ctx.session.query("label", Some(0)), "Big Kick");
    }

    #[test]
    fn test_prefix_needs_word_boundary() {
        let registry = create_registry();
        let mut ctx = CommandContext::default();
        assert_eq!(run(&registry, &mut ctx, "getter"), CommandResult::NotACommand);
        assert_eq!(run(&registry, &mut ctx, "export"), CommandResult::NotACommand);
        assert_eq!(run(&registry, &mut ctx, "quit"), CommandResult::Exit);
    }

    #[test]
    fn test_watch_returns_path() {
        let registry = create_registry();
        let mut ctx = CommandContext::default();
        assert_eq!(
            run(&registry, &mut ctx, "watch layers.json"),
            CommandResult::Watch("layers.json".to_string())
        );
        assert!(matches!(run(&registry, &mut ctx, "watch"), CommandResult::Error(_)));
    }

    #[test]
    fn test_lenient_numbers() {
        assert_eq!(lenient_f64("1.5", 0.0), 1.5);
        assert_eq!(lenient_f64("abc", 0.0), 0.0);
        assert_eq!(lenient_f64("inf", 2.0), 2.0);
        assert_eq!(lenient_i64("40", 0), 40);
        assert_eq!(lenient_i64("40.9", 0), 40);
        assert_eq!(lenient_i64("", 100), 100);
    }

    #[test]
    fn test_failed_appends_core_error_code() {
        assert_eq!(
            failed(ChronoError::EmptyInput),
            CommandResult::Error("Nothing to export: the layer set is empty [EMPTY_INPUT]".to_string())
        );
        let wrapped = anyhow::Error::from(ChronoError::EmptyInput).context("Failed to load x.json");
        assert_eq!(
            failed(wrapped),
            CommandResult::Error(
                "Failed to load x.json: Nothing to export: the layer set is empty [EMPTY_INPUT]"
                    .to_string()
            )
        );
        assert_eq!(
            failed(anyhow::anyhow!("disk full")),
            CommandResult::Error("disk full".to_string())
        );
    }

    #[test]
    fn test_list_commands_sorted_longest_first() {
        let registry = create_registry();
        let commands = registry.list_commands();
        assert!(commands.windows(2).all(|w| w[0].len() >= w[1].len()));
        assert!(commands.contains(&"export midi"));
    }
}
