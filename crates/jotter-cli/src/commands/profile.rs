use std::path::Path;

use jotter_core::models::{Attachment, Gender, ProfilePatch};

use crate::cli::ProfileCommands;
use crate::commands::common::{format_profile, print_json};
use crate::context::AppContext;
use crate::error::CliError;

pub async fn run_profile(context: &AppContext, command: ProfileCommands) -> Result<(), CliError> {
    match command {
        ProfileCommands::Show { json } => run_profile_show(context, json).await,
        ProfileCommands::Update {
            bio,
            gender,
            picture,
        } => run_profile_update(context, bio, gender, picture.as_deref()).await,
    }
}

async fn run_profile_show(context: &AppContext, as_json: bool) -> Result<(), CliError> {
    let profile = context.client.profile().fetch_profile().await?;
    if as_json {
        print_json(&profile)
    } else {
        println!("{}", format_profile(&profile));
        Ok(())
    }
}

async fn run_profile_update(
    context: &AppContext,
    bio: Option<String>,
    gender: Option<Gender>,
    picture: Option<&Path>,
) -> Result<(), CliError> {
    let attachment = picture.map(read_attachment).transpose()?;
    let patch = ProfilePatch { bio, gender };

    let profiles = context.client.profile();
    profiles.update_profile(&patch, attachment).await?;
    // The update response carries no profile; read it back.
    let profile = profiles.fetch_profile().await?;
    println!("Profile updated.\n{}", format_profile(&profile));
    Ok(())
}

pub fn read_attachment(path: &Path) -> Result<Attachment, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Attachment {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(Attachment {
        file_name,
        content_type,
        bytes,
    })
}
