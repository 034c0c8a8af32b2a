//! Command-line interface definition
//!
//! Defines the CLI surface using clap's derive API: the interactive chat
//! loop, history management subcommands, transcript export, and a one-shot
//! formatter.

use clap::{Parser, Subcommand};

/// Bubbly - chat client with formatted transcripts and capped history
#[derive(Parser, Debug)]
#[command(name = "bubbly", version, about, long_about = None)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the history database path
    #[arg(long, env = "BUBBLY_HISTORY_DB", global = true)]
    pub storage_path: Option<String>,

    /// Override the chat endpoint URL
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Resume a stored conversation by id
        #[arg(long)]
        resume: Option<String>,
    },

    /// Manage stored chat history
    History {
        /// History operation
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Render a stored conversation to an HTML transcript
    Export {
        /// Id of the stored chat
        id: String,

        /// Output file (defaults to <id>.html)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Format markdown-flavored text from a file (or stdin) to an HTML
    /// fragment
    Fmt {
        /// Input file; reads stdin when omitted
        file: Option<String>,
    },
}

/// History management operations
#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List stored chats, most recent first
    List,

    /// Show the messages of a stored chat
    Show {
        /// Id of the stored chat
        id: String,
    },

    /// Delete a stored chat
    Delete {
        /// Id of the stored chat
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments from the environment
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse from an explicit argument list (useful in tests)
    pub fn parse_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(args)
    }
}
