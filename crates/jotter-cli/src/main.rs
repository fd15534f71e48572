//! Jotter CLI - manage notes on a Jotter backend from the terminal.

mod cli;
mod commands;
mod config_profiles;
mod context;
mod error;
mod keychain;


use clap::Parser;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::notes::{
    build_patch, run_add, run_archive, run_delete, run_edit, run_list, run_pin, run_show,
    ListArgs,
};
use crate::commands::profile::run_profile;
use crate::commands::tags::run_tags;
use crate::context::{report_notices, AppContext};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "jotter=info".parse::<Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Config { command } => run_config(command, profile, cli.api_base_url),
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
        Commands::Auth { command } => run_auth(command, profile, cli.api_base_url).await,
        command => {
            let mut context = AppContext::load(profile, cli.api_base_url)?;
            context.require_session()?;
            let result = run_protected(&context, command).await;
            let notices = context.drain_notices();
            report_notices(&context.profile_name, &notices);
            result
        }
    }
}

async fn run_protected(context: &AppContext, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::List {
            search,
            tags,
            order_by,
            asc,
            archived,
            pinned,
            json,
        } => {
            let args = ListArgs {
                search,
                tags,
                order_by,
                ascending: asc,
                archived,
                pinned,
            };
            run_list(context, &args, json).await
        }
        Commands::Show { slug, json } => run_show(context, &slug, json).await,
        Commands::Add {
            title,
            content,
            tags,
            color,
        } => run_add(context, &title, &content, &tags, color.as_deref()).await,
        Commands::Edit {
            slug,
            title,
            content,
            tags,
            color,
        } => run_edit(context, &slug, &build_patch(title, content, &tags, color)).await,
        Commands::Delete { slug } => run_delete(context, &slug).await,
        Commands::Archive { slug } => run_archive(context, &slug).await,
        Commands::Pin { slug } => run_pin(context, &slug).await,
        Commands::Profile { command } => run_profile(context, command).await,
        Commands::Tags { command } => run_tags(context, command).await,
        Commands::Config { .. } | Commands::Completions { .. } | Commands::Auth { .. } => {
            unreachable!("handled before the session check")
        }
    }
}
