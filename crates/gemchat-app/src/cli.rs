use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Gemchat — talk to a Gemini model from the terminal or over HTTP.
#[derive(Parser, Debug)]
#[command(name = "gemchat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter override (e.g. debug, gemchat=trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive chat on stdin/stdout (the default).
    Chat,
    /// Send one message, print the reply and exit.
    Ask {
        /// Message text; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Serve the landing page and the POST /chat endpoint.
    Serve {
        /// Listen host (overrides config).
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides config).
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }
}

pub fn parse() -> Args {
    Args::parse()
}
