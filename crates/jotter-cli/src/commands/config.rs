use std::env;

use jotter_core::util::normalize_base_url;

use crate::cli::ConfigCommands;
use crate::config_profiles::{normalize_text_option, CliProfilesConfig, API_BASE_URL_ENV};
use crate::error::CliError;

pub fn run_config(
    command: ConfigCommands,
    global_profile: Option<&str>,
    api_base_url: Option<String>,
) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init { no_activate } => {
            let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = init_profile(&mut config, global_profile, api_base_url, no_activate)?;
            let path = config.save().map_err(CliError::Config)?;
            println!(
                "Profile '{}' initialized at {}",
                profile_name,
                path.display()
            );

            if config
                .profile(&profile_name)
                .and_then(|profile| profile.api_base_url())
                .is_some()
            {
                println!(
                    "Run `jotter auth login --username <name> --password <password>` to sign in."
                );
            } else {
                println!("Profile '{profile_name}' is missing: api_base_url");
            }
            Ok(())
        }
    }
}

/// Merges the flag (or `JOTTER_API_BASE_URL`) into the named profile.
pub fn init_profile(
    config: &mut CliProfilesConfig,
    profile_name: Option<&str>,
    api_base_url: Option<String>,
    no_activate: bool,
) -> Result<String, CliError> {
    let profile_name = config.resolve_profile_name(profile_name);
    let api_base_url = normalize_text_option(api_base_url)
        .or_else(|| normalize_text_option(env::var(API_BASE_URL_ENV).ok()));

    let profile = config.profile_mut_or_default(&profile_name);
    if let Some(url) = api_base_url {
        let normalized = normalize_base_url(&url)
            .map_err(|reason| CliError::Config(reason.to_string()))?;
        profile.api_base_url = Some(normalized);
    }

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }
    Ok(profile_name)
}
