use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use jotter_core::models::{Gender, SortField};

#[derive(Parser)]
#[command(name = "jotter")]
#[command(about = "Manage your Jotter notes from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Override the API base URL for this invocation
    #[arg(long, global = true, value_name = "URL")]
    pub api_base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List notes
    #[command(alias = "ls")]
    List {
        /// Free-text search across title and content
        #[arg(short, long)]
        search: Option<String>,
        /// Only show notes with this tag (repeatable)
        #[arg(long = "tag", value_name = "NAME")]
        tags: Vec<String>,
        /// Sort key
        #[arg(long, value_parser = parse_sort_field, value_name = "FIELD")]
        order_by: Option<SortField>,
        /// Sort ascending instead of newest first
        #[arg(long)]
        asc: bool,
        /// Filter by archive state
        #[arg(long, value_name = "BOOL")]
        archived: Option<bool>,
        /// Filter by pin state
        #[arg(long, value_name = "BOOL")]
        pinned: Option<bool>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single note
    Show {
        /// Note slug
        slug: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Tag name (repeatable, or comma separated)
        #[arg(long = "tag", value_name = "NAME")]
        tags: Vec<String>,
        /// Hex color such as #FFD966
        #[arg(long)]
        color: Option<String>,
    },
    /// Edit an existing note
    Edit {
        /// Note slug
        slug: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Replace the note's tags (repeatable, or comma separated)
        #[arg(long = "tag", value_name = "NAME")]
        tags: Vec<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note slug
        slug: String,
    },
    /// Archive or unarchive a note
    Archive {
        /// Note slug
        slug: String,
    },
    /// Pin or unpin a note
    Pin {
        /// Note slug
        slug: String,
    },
    /// Show or update your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// List or create tags
    Tags {
        #[command(subcommand)]
        command: TagCommands,
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
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Sign in, register, or sign out
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    ///
    /// The profile comes from `--profile` and the backend from `--api-base-url`.
    Init {
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in and store tokens in the keychain
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Show whether the profile holds a session
    Status,
    /// Exchange the refresh token for a new access token
    Refresh,
    /// Clear stored tokens
    Logout,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show your profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update bio, gender, or profile picture
    Update {
        #[arg(long)]
        bio: Option<String>,
        /// M, F or O
        #[arg(long, value_parser = parse_gender)]
        gender: Option<Gender>,
        /// Image file to upload as the profile picture
        #[arg(long, value_name = "PATH")]
        picture: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum TagCommands {
    /// List your tags
    List,
    /// Create a tag
    Add {
        name: String,
    },
}

fn parse_sort_field(raw: &str) -> Result<SortField, String> {
    raw.parse().map_err(|error: jotter_core::ApiError| error.to_string())
}

fn parse_gender(raw: &str) -> Result<Gender, String> {
    raw.parse().map_err(|error: jotter_core::ApiError| error.to_string())
}
