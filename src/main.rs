// sintax: tokenizer and error-recovering parser with a terminal viewer

mod args;

use std::fs;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::WrapErr;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::level_filters::LevelFilter;
use tracing::{debug, trace, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

use args::Args;
use sintax::analyzer::{Analysis, Analyzer};
use sintax::config::AnalyzerConfig;
use sintax::output::graph::GraphExport;
use sintax::output::printer::render_tree;
use sintax::output::report::{diagnostic_report, token_report};
use sintax::ui::App;

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.logging().log_level_filter())?;
    trace!("starting sintax with args: {args:?}");
    debug!("sintax version: {}", env!("CARGO_PKG_VERSION"));

    let config = args.analyzer_config();
    let source = fs::read_to_string(&args.file)
        .wrap_err_with(|| format!("could not read {}", args.file.display()))?;

    let mut analyzer = Analyzer::new(config);
    let analysis = analyzer.analyze(&source);

    if let Some(path) = &args.dot {
        match &analysis.ast {
            Some(ast) => fs::write(path, GraphExport::from_ast(ast).to_dot())
                .wrap_err_with(|| format!("could not write {}", path.display()))?,
            None => warn!("no syntax tree was built; {} not written", path.display()),
        }
    }

    if args.tui {
        let file_name = args.file.display().to_string();
        run_tui(analysis.clone(), source, file_name, &config)?;
    } else {
        print_reports(&args, &analysis);
    }

    Ok(ExitCode::from(analysis.exit_code()))
}

fn print_reports(args: &Args, analysis: &Analysis) {
    let all = args.wants_default_reports();

    if all || args.tokens {
        println!("{}", token_report(&analysis.tokens));
    }
    if all || args.diagnostics {
        println!("{}", diagnostic_report(&analysis.diagnostics));
    }
    if all || args.tree {
        match &analysis.ast {
            Some(ast) => print!("{}", render_tree(ast)),
            None => println!("No syntax tree: input ended before the program was closed."),
        }
    }
    if args.dot_stdout {
        if let Some(ast) = &analysis.ast {
            print!("{}", GraphExport::from_ast(ast).to_dot());
        }
    }
}

fn run_tui(
    analysis: Analysis,
    source: String,
    file_name: String,
    config: &AnalyzerConfig,
) -> eyre::Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(analysis, source, file_name, config);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.wrap_err("viewer failed")
}

/// Logs go to stderr; `RUST_LOG` overrides the `-v`/`-q` level
fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy();

    let registry = Registry::default().with(
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_filter(filter),
    );

    tracing::subscriber::set_global_default(registry)?;

    Ok(())
}
