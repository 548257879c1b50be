use anyhow::Result;
use chronogrid::cli::{Cli, Commands};
use chronogrid::render::render_composite;
use chronogrid::session::EditorSession;
use chronogrid::{repl, trace};
use clap::Parser;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    trace::setup(cli.verbose);

    let config = cli.export_config()?;
    let mut session = EditorSession::with_config(config);
    info!(?config, "chronogrid v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Commands::ExportMidi { document, output }) => {
            session.load_file(&document)?;
            let count = session.write_midi_file(&output)?;
            println!("Wrote {} notes to {}", count, output.display());
            Ok(())
        }
        Some(Commands::Composite { document }) => {
            session.load_file(&document)?;
            println!("{}", render_composite(&session)?);
            Ok(())
        }
        None => {
            if let Some(path) = &cli.load {
                session.load_file(path)?;
            }
            repl::start(session)
        }
    }
}
