//! Command-line argument parsing for pokequery
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pokequery - Ask questions about Pokémon Go stats
#[derive(Parser, Debug)]
#[command(name = "pokequery")]
#[command(author = "Jerome (Kubashen) Naidoo")]
#[command(version)]
#[command(about = "Answer Pokémon Go questions with hosted, local, or retrieval-augmented models", long_about = None)]
pub struct Args {
    /// Question to answer (same as `pokequery ask <QUESTION>`)
    #[arg(value_name = "QUESTION")]
    pub question: Option<String>,

    /// Answer strategy: openai, local, or rag
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Dataset file (CSV, TSV, Excel, or Parquet)
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Dataset format, overriding extension detection
    #[arg(long)]
    pub format: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Hugging Face access token
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    pub hf_token: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a single question
    Ask {
        /// The question
        question: String,
    },

    /// Start interactive REPL mode
    Start,

    /// Show every catalog entry whose name contains NAME
    Lookup {
        /// Name or part of a name
        name: String,
    },

    /// Show the entries with the highest total DPS
    Top {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 1)]
        limit: usize,
    },

    /// Print the retrieved context for a question without calling a model
    Context {
        /// The question
        question: String,
    },

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Check that a question and a subcommand are not both given
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_some() && self.question.is_some() {
            return Err("Cannot specify a question with a subcommand.".to_string());
        }

        Ok(())
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Log level implied by the flags, if they say anything
    pub fn log_level(&self) -> Option<&'static str> {
        match self {
            Verbosity::Quiet => Some("error"),
            Verbosity::Normal => None,
            Verbosity::Verbose => Some("info"),
            Verbosity::VeryVerbose => Some("debug"),
        }
    }

    /// Check if should show progress spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show retrieved context alongside answers
    pub fn show_context(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv.iter().copied()).unwrap()
    }

    #[test]
    fn test_verbosity_quiet() {
        let args = parse(&["pokequery", "-q", "config"]);
        assert_eq!(args.verbosity(), Verbosity::Quiet);
        assert_eq!(args.verbosity().log_level(), Some("error"));
    }

    #[test]
    fn test_verbosity_normal() {
        let args = parse(&["pokequery", "config"]);
        assert_eq!(args.verbosity(), Verbosity::Normal);
        assert!(args.verbosity().log_level().is_none());
    }

    #[test]
    fn test_verbosity_very_verbose() {
        let args = parse(&["pokequery", "-vv", "start"]);
        assert_eq!(args.verbosity(), Verbosity::VeryVerbose);
        assert!(args.verbosity().show_context());
    }

    #[test]
    fn test_ask_subcommand() {
        let args = parse(&["pokequery", "--strategy", "openai", "ask", "Who is best?"]);
        assert_eq!(args.strategy.as_deref(), Some("openai"));
        match args.command {
            Some(Commands::Ask { question }) => assert_eq!(question, "Who is best?"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_top_default_limit() {
        let args = parse(&["pokequery", "top"]);
        assert!(matches!(args.command, Some(Commands::Top { limit: 1 })));
    }

    #[test]
    fn test_positional_question() {
        let args = parse(&["pokequery", "highest dps?"]);
        assert_eq!(args.question.as_deref(), Some("highest dps?"));
        assert!(args.validate().is_ok());
    }
}
