//! guitar-quote - String Instrument Valuation
//!
//! Estimates the resale value of a string instrument from its category,
//! wood, string count, age and condition. Runs an interactive terminal
//! form by default, or prices a single instrument from the command line.

use std::{fs::File, io, path::{Path, PathBuf}, process::ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use guitar_quote::application::{App, AppMode, FormStateController, ResultPresenter};
use guitar_quote::domain::{Catalog, QuoteRequest};
use guitar_quote::presentation::{render_ui, InputHandler};

#[derive(Parser)]
#[command(name = "guitar-quote", about = "Estimate the resale value of a string instrument")]
struct Args {
    /// File that receives the application log
    #[arg(long, default_value = "guitar-quote.log")]
    log_file: PathBuf,

    /// Minimum severity written to the log file
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List instrument categories and wood types
    Catalog,
    /// Price a single instrument without opening the form
    Quote {
        /// Instrument category id (electric, acoustic, bass, ukulele)
        #[arg(long)]
        category: Option<String>,
        /// Wood type id
        #[arg(long)]
        wood: Option<String>,
        /// Number of strings
        #[arg(long)]
        strings: Option<u32>,
        /// Age in years
        #[arg(long, allow_negative_numbers = true)]
        age: Option<i32>,
        /// Condition score, 0 (pristine) to 50 (worst)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        condition: i32,
        /// Print the quote as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Entry point for the guitar-quote application.
///
/// Sets up file logging, builds the catalog once and dispatches to the
/// requested command.
///
/// # Errors
///
/// Returns an error if terminal setup fails or the quote cannot be
/// serialized.
fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    // The form keeps working without a log, so only warn on stderr.
    if let Err(err) = init_logging(&args.log_file, args.log_level.filter()) {
        eprintln!("{err}");
    }

    let catalog = Catalog::builtin();
    log::info!(
        "guitar-quote starting with {} categories and {} woods",
        catalog.categories().len(),
        catalog.woods().len()
    );

    match args.command {
        None => {
            run_terminal(&catalog)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Catalog) => {
            print_catalog(&catalog);
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Quote { category, wood, strings, age, condition, json }) => {
            let request = QuoteRequest {
                category_id: category,
                wood_id: wood,
                string_count: strings,
                age,
                condition,
            };
            run_quote(&catalog, &request, json)
        }
    }
}

fn init_logging(path: &Path, level: LevelFilter) -> Result<(), String> {
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    let log_file = File::create(path)
        .map_err(|e| format!("Could not create log file {}: {}", path.display(), e))?;
    WriteLogger::init(level, log_config, log_file)
        .map_err(|e| format!("Could not start logging to {}: {}", path.display(), e))
}

fn print_catalog(catalog: &Catalog) {
    println!("Instrument categories:");
    for category in catalog.categories() {
        let strings = category
            .string_counts
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let max_age = category
            .max_age
            .map(|age| format!("{age} years"))
            .unwrap_or_else(|| "unbounded".to_string());
        println!(
            "  {:<10} {:<10} base {:>9.2}  strings {:<8} max age {}",
            category.id, category.name, category.base_price, strings, max_age
        );
    }

    println!("Wood types:");
    for wood in catalog.woods() {
        println!("  {:<10} {:<10} x{:.2}", wood.id, wood.name, wood.multiplier);
    }
}

fn run_quote(catalog: &Catalog, request: &QuoteRequest, json: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut form = FormStateController::new(catalog);
    let outcome = form.submit_request(request);

    match (&outcome.quote, &outcome.result_rows) {
        (Some(quote), _) if json => println!("{}", serde_json::to_string_pretty(quote)?),
        (_, Some(rows)) => println!("{}", ResultPresenter::plain_text(rows)),
        _ => {
            eprintln!("{}", outcome.message);
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_terminal(catalog: &Catalog) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(catalog);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("Terminal loop failed: {err}");
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Redraws the form after every key press and exits when the user presses
/// 'q' in normal mode.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if matches!(app.mode, AppMode::Normal) => {
                        log::info!("guitar-quote shutting down");
                        return Ok(());
                    }
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("guitar-quote.log");

        let err = init_logging(&path, LevelFilter::Info).unwrap_err();
        assert!(err.starts_with("Could not create log file"));
        assert!(err.contains("guitar-quote.log"));
    }
}
