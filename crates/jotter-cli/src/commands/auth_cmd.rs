use crate::cli::AuthCommands;
use crate::context::{open_session, resolve_profile, AppContext};
use crate::error::CliError;

pub async fn run_auth(
    command: AuthCommands,
    global_profile: Option<&str>,
    api_base_url: Option<String>,
) -> Result<(), CliError> {
    match command {
        AuthCommands::Login { username, password } => {
            let context = AppContext::load(global_profile, api_base_url)?;
            context.client.auth().login(&username, &password).await?;
            println!(
                "Signed in profile '{}' as {}",
                context.profile_name,
                username.trim()
            );
            Ok(())
        }
        AuthCommands::Register { username, password } => {
            let context = AppContext::load(global_profile, api_base_url)?;
            context.client.auth().register(&username, &password).await?;
            println!(
                "Registered {}. Run `jotter auth login --profile {}` to sign in.",
                username.trim(),
                context.profile_name
            );
            Ok(())
        }
        AuthCommands::Status => {
            let profile_name = resolve_profile(global_profile)?;
            if open_session(&profile_name).is_authenticated() {
                println!("Profile '{profile_name}' is signed in.");
            } else {
                println!("Profile '{profile_name}' is not signed in.");
            }
            Ok(())
        }
        AuthCommands::Refresh => {
            let context = AppContext::load(global_profile, api_base_url)?;
            context.require_session()?;
            context.client.auth().refresh().await?;
            println!("Refreshed session for profile '{}'", context.profile_name);
            Ok(())
        }
        AuthCommands::Logout => {
            let profile_name = resolve_profile(global_profile)?;
            open_session(&profile_name).clear_session()?;
            println!("Signed out profile '{profile_name}'");
            Ok(())
        }
    }
}
