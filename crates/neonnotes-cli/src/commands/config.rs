use std::path::Path;

use neonnotes_core::config::{ClientConfig, DEFAULT_AUTH_SCHEME};
use neonnotes_core::util::normalize_text_option;

use crate::cli::{ConfigCommands, GlobalArgs};
use crate::commands::common::resolve_client_config;
use crate::config_profiles::{default_config_path, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, globals: &GlobalArgs) -> Result<(), CliError> {
    let config_path = default_config_path().map_err(CliError::Config)?;
    match command {
        ConfigCommands::Init {
            api_base_url,
            auth_scheme,
            no_activate,
        } => {
            let profile_name = run_config_init(
                &config_path,
                globals.profile.as_deref(),
                &api_base_url,
                auth_scheme,
                no_activate,
            )?;
            println!(
                "Profile '{}' initialized at {}",
                profile_name,
                config_path.display()
            );
            println!(
                "Run `neonnotes --profile {profile_name} auth login --username <username> --password <password>`."
            );
            Ok(())
        }
        ConfigCommands::Show => {
            for line in render_config_summary(&config_path, globals)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

/// Create or update a profile, returning its resolved name.
pub fn run_config_init(
    config_path: &Path,
    profile_name: Option<&str>,
    api_base_url: &str,
    auth_scheme: Option<String>,
    no_activate: bool,
) -> Result<String, CliError> {
    let mut config = CliProfilesConfig::load_from_path(config_path).map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);

    let existing_scheme = config
        .profile(&profile_name)
        .and_then(|profile| profile.auth_scheme.clone());
    let auth_scheme = normalize_text_option(auth_scheme).or(existing_scheme);
    let validated = ClientConfig::new(
        api_base_url,
        auth_scheme.as_deref().unwrap_or(DEFAULT_AUTH_SCHEME),
    )?;

    let profile = config.profile_mut_or_default(&profile_name);
    profile.api_base_url = Some(validated.api_base_url);
    profile.auth_scheme = auth_scheme.map(|_| validated.auth_scheme);

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    config.save_to_path(config_path).map_err(CliError::Config)?;
    tracing::debug!("Saved profile '{}'", profile_name);
    Ok(profile_name)
}

pub fn render_config_summary(
    config_path: &Path,
    globals: &GlobalArgs,
) -> Result<Vec<String>, CliError> {
    let config = CliProfilesConfig::load_from_path(config_path).map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(globals.profile.as_deref());
    let profile = config.profile(&profile_name);
    let client_config = resolve_client_config(globals.api_url.clone(), profile)?;

    let active = config.active_profile.as_deref().unwrap_or("(none)");
    let mut lines = vec![
        format!("config:       {}", config_path.display()),
        format!("active:       {active}"),
        format!("profile:      {profile_name}"),
        format!("api_base_url: {}", client_config.api_base_url),
        format!("auth_scheme:  {}", client_config.auth_scheme),
    ];
    if profile.is_none() {
        lines.push(format!(
            "Profile '{profile_name}' is not configured; using environment and defaults."
        ));
    }
    Ok(lines)
}
