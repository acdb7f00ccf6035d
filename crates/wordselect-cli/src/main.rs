//! wordselect CLI: grade select-the-words questions from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "wordselect", version, about = "Select-the-words question grader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a passage tokenizes and which positions are correct
    Tokenize {
        /// Passage text to tokenize
        #[arg(long, conflicts_with_all = ["question_set", "question"])]
        text: Option<String>,

        /// Delimiter pair used with --text (e.g. "[]")
        #[arg(long, default_value = "[]")]
        delimiters: String,

        /// Question set file holding the question
        #[arg(long, requires = "question")]
        question_set: Option<PathBuf>,

        /// Question ID within the question set
        #[arg(long, requires = "question_set")]
        question: Option<String>,
    },

    /// Grade learner submissions
    Grade {
        /// Path to .toml question set or directory
        #[arg(long)]
        question_set: PathBuf,

        /// Submissions JSON file
        #[arg(long)]
        submissions: PathBuf,

        /// Per-attempt penalty overriding every question's own
        #[arg(long)]
        penalty: Option<f64>,

        /// Output directory (defaults to the configured one)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Grade repeated identical attempts instead of collapsing them
        #[arg(long)]
        keep_repeats: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question set TOML files
    Validate {
        /// Path to question set file or directory
        #[arg(long)]
        question_set: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question set
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wordselect=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tokenize {
            text,
            delimiters,
            question_set,
            question,
        } => commands::tokenize::execute(text, delimiters, question_set, question),
        Commands::Grade {
            question_set,
            submissions,
            penalty,
            output,
            format,
            keep_repeats,
            config,
        } => commands::grade::execute(
            question_set,
            submissions,
            penalty,
            output,
            format,
            keep_repeats,
            config,
        ),
        Commands::Validate {
            question_set,
            config,
        } => commands::validate::execute(question_set, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
