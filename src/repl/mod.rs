//! REPL (Read-Eval-Print Loop) for editing layer sets

use crate::commands::{create_registry, CommandContext, CommandRegistry, CommandResult};
use crate::repl::watcher::DocumentWatcher;
use crate::session::EditorSession;
use anyhow::{anyhow, Result};
use colored::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use notify::{Event, EventKind};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RustylineResult};
use std::path::Path;
use std::thread;
use tracing::{debug, warn};

pub mod watcher;

/// Types of events the REPL loop handles
enum ReplEvent {
    Input(Result<String, ReadlineError>),
}

/// What the loop should do after a line was handled
#[derive(Debug, PartialEq)]
pub enum LineOutcome {
    Continue,
    Exit,
    Watch(String),
}

/// Interactive REPL owning one editing session
pub struct Repl {
    editor: Option<DefaultEditor>,
    registry: CommandRegistry,
    ctx: CommandContext,

    // Event channels
    tx_input: Sender<ReplEvent>,
    rx_input: Receiver<ReplEvent>,
    tx_watcher: Sender<notify::Result<Event>>,
    rx_watcher: Receiver<notify::Result<Event>>,

    watcher: Option<DocumentWatcher>,
}

impl Repl {
    pub fn new(session: EditorSession) -> RustylineResult<Self> {
        let editor = DefaultEditor::new()?;
        let (tx_input, rx_input) = unbounded();
        let (tx_watcher, rx_watcher) = unbounded();

        Ok(Repl {
            editor: Some(editor),
            registry: create_registry(),
            ctx: CommandContext::new(session),
            tx_input,
            rx_input,
            tx_watcher,
            rx_watcher,
            watcher: None,
        })
    }

    pub fn session(&self) -> &EditorSession {
        &self.ctx.session
    }

    /// Route one line through the command registry and print the result
    pub fn handle_line(&mut self, line: &str) -> LineOutcome {
        if line.is_empty() {
            return LineOutcome::Continue;
        }
        match self.registry.execute(line, &mut self.ctx) {
            CommandResult::Success => {}
            CommandResult::Message(msg) => println!("{}", msg),
            CommandResult::Exit => return LineOutcome::Exit,
            CommandResult::Error(e) => println!("{} {}", "Error:".bright_red().bold(), e.red()),
            CommandResult::Watch(path) => return LineOutcome::Watch(path),
            CommandResult::NotACommand => println!(
                "{} Unknown command '{}'. Type '{}' for a list.",
                "Error:".bright_red().bold(),
                line.split_whitespace().next().unwrap_or(line),
                "help".bright_green()
            ),
        }
        LineOutcome::Continue
    }

    /// Reload a watched document into the session
    pub fn reload(&mut self, path: &Path) {
        println!("{} File changed: {}", "⚡".bright_yellow(), path.display());
        match self.ctx.session.load_file(path) {
            Ok(()) => println!(
                "{} Reloaded {} layers",
                "✓".bright_green(),
                self.ctx.session.layers().len()
            ),
            // The previous layer set stays in place
            Err(e) => println!("{} {:#}", "Error:".red(), e),
        }
    }

    fn start_watching(&mut self, path: &str) {
        if self.watcher.is_none() {
            match DocumentWatcher::new(self.tx_watcher.clone()) {
                Ok(w) => self.watcher = Some(w),
                Err(e) => println!("{} Failed to create watcher: {}", "Error:".red(), e),
            }
        }

        let Some(w) = &mut self.watcher else {
            return;
        };
        match w.watch(path) {
            Ok(true) => {
                println!("Watching {} for changes...", path.bright_green());
                // Pick up the current contents right away
                self.reload(Path::new(path));
            }
            Ok(false) => println!("Already watching {}", path.bright_green()),
            Err(e) => println!("{} Failed to watch {}: {}", "Error:".red(), path, e),
        }
    }

    fn handle_watch_event(&mut self, event: Event) {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) => {
                for path in event.paths {
                    self.reload(&path);
                }
            }
            other => debug!(?other, "ignored watch event"),
        }
    }

    /// Start the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!("{}", "chronogrid - layered rhythm editor".bright_cyan().bold());
        println!(
            "Try: {}, {}, {}",
            "addlayer 1000 0 Kick".cyan(),
            "addlayer 101 0 Snare".cyan(),
            "show".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        let mut editor = self
            .editor
            .take()
            .ok_or_else(|| anyhow!("REPL is already running"))?;
        let tx_input = self.tx_input.clone();

        // Line editing blocks, so it lives on its own thread
        thread::spawn(move || loop {
            let prompt = format!("{} ", "chronogrid>".bright_magenta().bold());
            match editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if !line.is_empty() {
                        let _ = editor.add_history_entry(&line);
                    }
                    if tx_input.send(ReplEvent::Input(Ok(line))).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx_input.send(ReplEvent::Input(Err(err)));
                    break;
                }
            }
        });

        loop {
            crossbeam_channel::select! {
                recv(self.rx_input) -> msg => match msg {
                    Ok(ReplEvent::Input(Ok(line))) => match self.handle_line(&line) {
                        LineOutcome::Continue => {}
                        LineOutcome::Exit => break,
                        LineOutcome::Watch(path) => self.start_watching(&path),
                    },
                    Ok(ReplEvent::Input(Err(ReadlineError::Interrupted)))
                    | Ok(ReplEvent::Input(Err(ReadlineError::Eof))) => break,
                    Ok(ReplEvent::Input(Err(err))) => {
                        println!(
                            "{} {}",
                            "Error reading input:".bright_red().bold(),
                            err.to_string().red()
                        );
                        break;
                    }
                    Err(_) => break, // Channel closed
                },

                recv(self.rx_watcher) -> msg => match msg {
                    Ok(Ok(event)) => self.handle_watch_event(event),
                    Ok(Err(e)) => warn!(error = %e, "watch error"),
                    Err(_) => break,
                }
            }
        }

        println!("{}", "Goodbye!".bright_cyan());
        Ok(())
    }
}

/// Convenience function to start the REPL
pub fn start(session: EditorSession) -> Result<()> {
    let mut repl = Repl::new(session).map_err(|e| anyhow!("Failed to initialize REPL: {}", e))?;
    repl.run()
}
