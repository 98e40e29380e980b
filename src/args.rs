//! Command-line arguments for `sintax`

use clap::{value_parser, ArgAction, Args as ClapArgs};
use sintax::config::{AnalyzerConfig, KeywordCase};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Common way to set logging levels
#[derive(Debug, Clone, Copy, ClapArgs)]
pub struct LoggingArgs {
    #[clap(short = 'v', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    #[clap(short = 'q', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

impl LoggingArgs {
    /// Logging level from `-v[v]` or `-q[q]`; `WARN` when neither is given
    pub fn log_level_filter(&self) -> LevelFilter {
        match self.verbose as i8 - self.quiet as i8 {
            i8::MIN..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(
    author,
    version,
    about = "Tokenizes and parses programs, reporting every lexical and syntax error"
)]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    /// Source file to analyze
    #[clap(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Print the token table
    #[clap(long)]
    pub tokens: bool,

    /// Print the syntax tree
    #[clap(long)]
    pub tree: bool,

    /// Print the diagnostics table
    #[clap(long)]
    pub diagnostics: bool,

    /// Write the tree as a Graphviz DOT file
    #[clap(long, value_name = "PATH", conflicts_with = "dot_stdout")]
    pub dot: Option<PathBuf>,

    /// Print the tree as Graphviz DOT on stdout
    #[clap(long)]
    pub dot_stdout: bool,

    /// Open the interactive viewer
    #[clap(long, conflicts_with_all = ["tokens", "tree", "diagnostics", "dot_stdout"])]
    pub tui: bool,

    /// Only recognize reserved words written in lowercase
    #[clap(long)]
    pub case_sensitive_keywords: bool,

    /// Columns a tab expands to in the viewer
    #[clap(long, default_value_t = 4, env = "SINTAX_TAB_WIDTH")]
    pub tab_width: usize,
}

impl Args {
    pub fn logging(&self) -> &LoggingArgs {
        &self.logging
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        let keyword_case = if self.case_sensitive_keywords {
            KeywordCase::Sensitive
        } else {
            KeywordCase::Insensitive
        };
        AnalyzerConfig::default()
            .with_keyword_case(keyword_case)
            .with_tab_width(self.tab_width)
    }

    /// No report was selected, so print the default set
    pub fn wants_default_reports(&self) -> bool {
        !(self.tokens || self.tree || self.diagnostics || self.dot_stdout || self.tui)
    }
}
