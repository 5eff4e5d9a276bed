use crate::cli::{AuthCommands, GlobalArgs};
use crate::commands::common::CliContext;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, globals: &GlobalArgs) -> Result<(), CliError> {
    let mut context = CliContext::load(globals)?;
    for line in execute_auth(command, &mut context).await? {
        println!("{line}");
    }
    Ok(())
}

/// Run one auth command against `context`, returning the lines to print.
///
/// `login` and `register` fail before any request while the profile is
/// signed in.
pub async fn execute_auth(
    command: AuthCommands,
    context: &mut CliContext,
) -> Result<Vec<String>, CliError> {
    let profile_name = context.profile_name.clone();

    let lines = match command {
        AuthCommands::Login { username, password } => {
            context.require_signed_out()?;
            let session = context.client.login(&username, &password).await?;
            let username = session.user.username.clone();
            context.session.login(session)?;
            vec![format!("Signed in profile '{profile_name}' as {username}")]
        }
        AuthCommands::Register { username, password } => {
            context.require_signed_out()?;
            context.client.register(&username, &password).await?;
            tracing::info!("Registered {}", username);
            let session = context.client.login(&username, &password).await?;
            context.session.login(session)?;
            vec![
                format!("Registered {username}"),
                format!("Signed in profile '{profile_name}' as {username}"),
            ]
        }
        AuthCommands::Logout => {
            context.session.logout()?;
            vec![format!("Signed out profile '{profile_name}'")]
        }
        AuthCommands::Status => match context.session.user() {
            Some(user) => vec![format!(
                "Profile '{}' is signed in as {} (user id {}) at {}",
                profile_name,
                user.username,
                user.id,
                context.client.config().api_base_url
            )],
            None => vec![format!("Profile '{profile_name}' is not signed in.")],
        },
    };

    Ok(lines)
}
