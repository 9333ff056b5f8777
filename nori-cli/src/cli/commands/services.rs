use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Password};
use log::info;
use nori_clients::{
    client::caps::ServiceFeatures,
    detect::detect_service,
    settings::{Settings, DEFAULT_SERVICES},
};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::{cli::extra::AppState, error::CliError, ApiTypeArg};

#[derive(Debug, Args)]
pub struct Services {
    #[clap(subcommand)]
    pub action: ServicesAction,
}

#[derive(Debug, Subcommand)]
pub enum ServicesAction {
    /// List the configured services
    List,
    /// List the built-in service presets and what they support
    Presets,
    /// Add a service
    Add {
        /// Name shown in the service list
        name: String,
        /// API the service speaks
        #[clap(value_enum)]
        api_type: ApiTypeArg,
        /// Base URL of the service
        endpoint: String,
        #[clap(long)]
        username: Option<String>,
        /// Prompt for a password or API key
        #[clap(long, action)]
        ask_password: bool,
    },
    /// Change a stored service
    Update {
        id: i64,
        #[clap(long)]
        name: Option<String>,
        #[clap(long = "type", value_enum)]
        api_type: Option<ApiTypeArg>,
        #[clap(long)]
        endpoint: Option<String>,
        #[clap(long)]
        username: Option<String>,
        /// Prompt for a new password or API key
        #[clap(long, action)]
        ask_password: bool,
    },
    /// Remove a service
    Remove { id: i64 },
    /// Guess which API a website speaks
    Detect {
        url: String,
        /// Timeout for each probe, in milliseconds. Defaults to the stored preference
        #[clap(long, value_name = "MS")]
        timeout: Option<u64>,
        /// Store the detected service under this name
        #[clap(long, value_name = "NAME")]
        add: Option<String>,
    },
    /// Make a service the default for searches
    Use { id: i64 },
}

fn ask_password() -> Result<String, CliError> {
    Ok(Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password or API key")
        .allow_empty_password(true)
        .interact()?)
}

fn print_presets() -> Result<(), CliError> {
    println!(
        "{}\n----------------",
        "Built-in services:".underline().bold().blue()
    );

    let mut presets: Vec<_> = DEFAULT_SERVICES.iter().collect();
    presets.sort_by(|a, b| a.0.cmp(b.0));

    for (key, settings) in presets {
        let supported = settings.create_client()?.features();
        let features: Vec<&str> = [
            (ServiceFeatures::TagSearch, "Tag Search"),
            (ServiceFeatures::TagTypes, "Tag Types"),
            (ServiceFeatures::Auth, "Auth"),
            (ServiceFeatures::Score, "Score"),
            (ServiceFeatures::Rating, "Rating"),
        ]
        .into_iter()
        .filter(|(flag, _)| supported.contains(*flag))
        .map(|(_, name)| name)
        .collect();

        println!(
            "{:<12} - {}:\n - {} {}\n - {} {}\n - {} {:?}\n",
            format!("[{key}]"),
            settings.name.bold().green(),
            "API Type:".bold().blue(),
            settings.api_type.pretty_name().bold().purple(),
            "Endpoint:".bold().blue(),
            settings.endpoint.bold().purple().underline(),
            "Features:".bold().blue(),
            features,
        );
    }
    Ok(())
}

impl Services {
    pub async fn run(&self, state: &mut AppState) -> Result<(), CliError> {
        match &self.action {
            ServicesAction::List => {
                for (id, settings) in state.db.get_all()? {
                    let marker = if state.prefs.active_service == Some(id) {
                        "*"
                    } else {
                        " "
                    };
                    println!(
                        "{} {:>3}  {}  {}  {}{}",
                        marker.green().bold(),
                        id,
                        settings.name.bold(),
                        settings.api_type.pretty_name().cyan(),
                        settings.endpoint.blue(),
                        settings
                            .username()
                            .map(|u| format!("  (as {u})"))
                            .unwrap_or_default()
                    );
                }
            }
            ServicesAction::Presets => print_presets()?,
            ServicesAction::Add {
                name,
                api_type,
                endpoint,
                username,
                ask_password: prompt,
            } => {
                let password = if *prompt { Some(ask_password()?) } else { None };
                let settings = Settings::new(
                    **api_type,
                    name,
                    endpoint,
                    username.as_deref(),
                    password.as_deref(),
                );
                settings.endpoint_url()?;

                let id = state.db.insert(&settings)?;
                println!("Added {} with id {}", settings.name.bold().green(), id);
            }
            ServicesAction::Update {
                id,
                name,
                api_type,
                endpoint,
                username,
                ask_password: prompt,
            } => {
                let current = state
                    .db
                    .get(*id)?
                    .ok_or(CliError::ServiceNotExists { id: *id })?;

                let password = if *prompt {
                    Some(ask_password()?)
                } else {
                    current.password.clone()
                };
                let settings = Settings::new(
                    api_type.map_or(current.api_type, |a| a.0),
                    name.as_deref().unwrap_or(&current.name),
                    endpoint.as_deref().unwrap_or(&current.endpoint),
                    username.as_deref().or(current.username()),
                    password.as_deref(),
                );
                settings.endpoint_url()?;

                state.db.update(*id, &settings)?;
                println!("Updated {}", settings.name.bold().green());
            }
            ServicesAction::Remove { id } => {
                if state.db.delete(*id)? == 0 {
                    return Err(CliError::ServiceNotExists { id: *id });
                }
                if state.prefs.active_service == Some(*id) {
                    state.prefs.active_service = None;
                    state.save_preferences().await?;
                }
                println!("Removed service {id}");
            }
            ServicesAction::Detect { url, timeout, add } => {
                let timeout = timeout.map_or(state.prefs.detection_timeout(), Duration::from_millis);
                info!("Detecting the API of {url}");

                let detected = detect_service(url, timeout).await?;
                println!(
                    "{} speaks {}",
                    detected.endpoint.blue(),
                    detected.api_type.pretty_name().bold().green()
                );

                if let Some(name) = add {
                    let settings =
                        Settings::new(detected.api_type, name, &detected.endpoint, None, None);
                    let id = state.db.insert(&settings)?;
                    println!("Added {} with id {}", settings.name.bold().green(), id);
                }
            }
            ServicesAction::Use { id } => {
                let settings = state
                    .db
                    .get(*id)?
                    .ok_or(CliError::ServiceNotExists { id: *id })?;
                state.prefs.active_service = Some(*id);
                state.save_preferences().await?;
                println!("Now searching {}", settings.name.bold().green());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Services, ServicesAction};
    use crate::{cli::extra::AppState, error::CliError, ApiTypeArg};
    use nori_common::ApiType;

    #[tokio::test]
    async fn add_update_use_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::open(dir.path()).await.unwrap();

        Services {
            action: ServicesAction::Add {
                name: "Safebooru".to_string(),
                api_type: ApiTypeArg(ApiType::Gelbooru),
                endpoint: "https://safebooru.org/".to_string(),
                username: None,
                ask_password: false,
            },
        }
        .run(&mut state)
        .await
        .unwrap();

        let (id, added) = state.db.get_all().unwrap().pop().unwrap();
        assert_eq!(added.endpoint, "https://safebooru.org");

        Services {
            action: ServicesAction::Update {
                id,
                name: Some("Safe".to_string()),
                api_type: None,
                endpoint: None,
                username: Some("me".to_string()),
                ask_password: false,
            },
        }
        .run(&mut state)
        .await
        .unwrap();
        let updated = state.db.get(id).unwrap().unwrap();
        assert_eq!(updated.name, "Safe");
        assert_eq!(updated.api_type, ApiType::Gelbooru);
        assert_eq!(updated.username(), Some("me"));

        Services {
            action: ServicesAction::Use { id },
        }
        .run(&mut state)
        .await
        .unwrap();
        assert_eq!(state.prefs.active_service, Some(id));

        Services {
            action: ServicesAction::Remove { id },
        }
        .run(&mut state)
        .await
        .unwrap();
        assert_eq!(state.prefs.active_service, None);

        let missing = Services {
            action: ServicesAction::Remove { id },
        }
        .run(&mut state)
        .await;
        assert!(matches!(missing, Err(CliError::ServiceNotExists { .. })));
    }

    #[tokio::test]
    async fn invalid_endpoint_is_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::open(dir.path()).await.unwrap();

        let result = Services {
            action: ServicesAction::Add {
                name: "Broken".to_string(),
                api_type: ApiTypeArg(ApiType::Danbooru),
                endpoint: "not a url".to_string(),
                username: None,
                ask_password: false,
            },
        }
        .run(&mut state)
        .await;

        assert!(matches!(result, Err(CliError::ClientError { .. })));
        assert_eq!(state.db.get_all().unwrap().len(), 1);
    }
}
