use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "neonnotes")]
#[command(about = "Capture, search, and manage your NeonNotes from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub globals: GlobalArgs,
}

/// Options accepted by every subcommand.
#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// CLI profile name (selects API settings and stored session)
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Override the API base URL for this invocation
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, register, or sign out
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// List notes, newest first
    #[command(alias = "ls")]
    List {
        /// Maximum number of notes to show (all when omitted)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search note titles and content
    Search {
        /// Search query (case-insensitive substring)
        query: String,
        /// Maximum number of notes to show (all when omitted)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note title
        #[arg(short, long)]
        title: String,
        /// Note content (read from stdin or $EDITOR when omitted)
        #[arg(short, long)]
        content: Option<String>,
        /// Cover image to upload
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },
    /// Replace an existing note
    Edit {
        /// Note ID
        id: String,
        /// New title (keeps the current title when omitted)
        #[arg(short, long)]
        title: Option<String>,
        /// New content (opens $EDITOR when neither --title nor --content is given)
        #[arg(short, long)]
        content: Option<String>,
        /// Cover image to upload
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },
    /// Delete a note
    #[command(alias = "rm")]
    Delete {
        /// Note ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in and store the session in the keychain
    Login {
        #[arg(short, long, value_name = "USERNAME")]
        username: String,
        #[arg(short, long, value_name = "PASSWORD")]
        password: String,
    },
    /// Create an account, then sign in with it
    Register {
        #[arg(short, long, value_name = "USERNAME")]
        username: String,
        #[arg(short, long, value_name = "PASSWORD")]
        password: String,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Show who the profile is signed in as
    Status,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile
    Init {
        /// Base URL of the NeonNotes API (e.g. <https://notes.example.com/api>)
        #[arg(long, value_name = "URL")]
        api_base_url: String,
        /// Authorization header scheme (defaults to `Token`)
        #[arg(long, value_name = "SCHEME")]
        auth_scheme: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Show the settings in effect for the selected profile
    Show,
}
