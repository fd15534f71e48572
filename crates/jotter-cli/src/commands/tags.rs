use crate::cli::TagCommands;
use crate::context::AppContext;
use crate::error::CliError;

pub async fn run_tags(context: &AppContext, command: TagCommands) -> Result<(), CliError> {
    let tags = context.client.tags();
    match command {
        TagCommands::List => {
            let mut listed = tags.list_tags().await?;
            if listed.is_empty() {
                println!("No tags yet.");
            }
            listed.sort_by_key(|tag| tag.name.to_lowercase());
            for tag in listed {
                println!("#{}", tag.name);
            }
        }
        TagCommands::Add { name } => {
            let tag = tags.create_tag(&name).await?;
            println!("Created tag #{}", tag.name);
        }
    }
    Ok(())
}
