use std::{fs::File, io::stdout, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use pdfgrid::event_source::TerminalEventSource;
use pdfgrid::main_app::{App, run_app_with_event_source};
use pdfgrid::panic_handler;
use pdfgrid::settings::{self, ExtractorKind};
use pdfgrid::LoadOptions;

/// Read PDFs as text in the terminal, laid out the way they look on paper
#[derive(Parser, Debug)]
#[command(name = "pdfgrid", version, about)]
struct Args {
    /// PDF files (or extracted .json) to open
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Where to write the log
    #[arg(long, default_value = "pdfgrid.log")]
    log_file: PathBuf,

    /// Log verbosity: off, error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Override the configured extractor for this run
    #[arg(long, value_enum)]
    extractor: Option<ExtractorKind>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    WriteLogger::init(
        args.log_level,
        Config::default(),
        File::create(&args.log_file)
            .with_context(|| format!("cannot create log file {}", args.log_file.display()))?,
    )?;

    info!("Starting pdfgrid");

    settings::load_settings();
    if let Some(kind) = args.extractor {
        settings::override_extractor(kind);
    }

    // Extraction may take a while; do it before the screen is taken over
    let mut app = App::open_documents(&args.files, &LoadOptions::from_settings());
    if app.workspace().is_empty() {
        bail!(
            "none of the files could be opened, see {} for details",
            args.log_file.display()
        );
    }

    panic_handler::initialize_panic_handler();

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app_with_event_source(&mut terminal, &mut app, &mut TerminalEventSource);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("Application error: {err:?}");
    }

    info!("Shutting down pdfgrid");
    res
}
