mod account;
mod catalog;
mod config_cmd;
mod schedule;
mod sessions;
mod settings;

use anyhow::{Context as _, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use classbook::api::AuthSession;
use classbook::config::Config;
use classbook::Store;

#[derive(Parser)]
#[command(name = "classbook")]
#[command(about = "Browse and book classes against the booking backend", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "CLASSBOOK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login,

    /// Sign out and forget the saved session
    Logout,

    /// Show the signed-in profile
    Whoami,

    /// Browse class types
    #[command(subcommand)]
    Classes(ClassesSubcommands),

    /// List, book and cancel sessions
    #[command(subcommand)]
    Sessions(SessionsSubcommands),

    /// Browse and buy credit packages
    #[command(subcommand)]
    Packages(PackagesSubcommands),

    /// Show your purchase history
    Purchases,

    /// Show an instructor's weekly availability and blockouts
    Availability {
        /// Instructor ID
        instructor_id: String,
    },

    /// Manage studio settings
    #[command(subcommand)]
    Settings(SettingsSubcommands),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ClassesSubcommands {
    /// List all class types
    List,
}

#[derive(Subcommand)]
enum SessionsSubcommands {
    /// List sessions
    List {
        /// Only sessions you are enrolled in
        #[arg(short, long)]
        mine: bool,
    },

    /// Book a session (uses one credit)
    Book {
        /// Session ID
        id: String,
    },

    /// Cancel a booking and get the credit back
    Cancel {
        /// Session ID
        id: String,
    },
}

#[derive(Subcommand)]
enum PackagesSubcommands {
    /// List packages on sale
    List,

    /// Buy a package
    Buy {
        /// Package ID
        id: String,
    },
}

#[derive(Subcommand)]
enum SettingsSubcommands {
    /// Show current settings
    Show,

    /// Turn maintenance mode on or off
    Maintenance {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// State shared by every command
pub struct Context {
    pub config_path: PathBuf,
    pub config: Config,
    pub json: bool,
}

impl Context {
    fn load(path: Option<PathBuf>, json: bool) -> Result<Self> {
        let config_path = match path {
            Some(path) => path,
            None => Config::config_file()?,
        };

        let mut config = Config::load_from(&config_path)?;
        config.apply_env();

        Ok(Self {
            config_path,
            config,
            json,
        })
    }

    /// Backend store without any session.
    pub fn connect(&self) -> Result<Store> {
        Store::connect(&self.config.backend).context("Failed to create backend client")
    }

    /// Backend store, resuming the saved session if there is one. A token
    /// close to expiry is refreshed first and the new tokens saved.
    pub async fn store(&mut self) -> Result<Store> {
        let store = self.connect()?;
        store.auth.restore_session(&self.config.auth.access_token);

        if self.config.needs_refresh(Utc::now()) {
            let refresh_token = self.config.auth.refresh_token.clone();
            match store.auth.refresh_session(&refresh_token).await {
                Ok(session) => {
                    self.remember_session(&session);
                    self.save_config()?;
                }
                Err(e) => {
                    tracing::warn!("Could not refresh saved session: {}", e);
                }
            }
        }

        Ok(store)
    }

    /// Keep the tokens of `session` in the config (not yet written).
    pub fn remember_session(&mut self, session: &AuthSession) {
        let expires_at = session
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .map(|secs| Utc::now() + Duration::seconds(secs));

        self.config.set_session(
            session.access_token.clone(),
            session.refresh_token.clone(),
            session.user.id.clone(),
            expires_at,
        );
    }

    /// ID of the signed-in user, from the saved session.
    pub fn user_id(&self) -> Result<&str> {
        if !self.config.is_authenticated() || self.config.auth.user_id.is_empty() {
            anyhow::bail!("Not logged in. Use 'classbook login' first.");
        }
        Ok(&self.config.auth.user_id)
    }

    pub fn save_config(&self) -> Result<()> {
        self.config.save_to(&self.config_path)
    }

    /// Print `value` as JSON when requested, otherwise run `human`.
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce()) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human();
        }
        Ok(())
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::info!("Verbose mode enabled");
        }

        if let Commands::Completions { shell } = self.command {
            generate_completions(shell);
            return Ok(());
        }

        let mut ctx = Context::load(self.config, self.json)?;

        match self.command {
            Commands::Login => account::login(&mut ctx).await,
            Commands::Logout => account::logout(&mut ctx).await,
            Commands::Whoami => account::whoami(&mut ctx).await,
            Commands::Classes(ClassesSubcommands::List) => catalog::list_classes(&mut ctx).await,
            Commands::Sessions(subcmd) => match subcmd {
                SessionsSubcommands::List { mine } => sessions::list_sessions(&mut ctx, mine).await,
                SessionsSubcommands::Book { id } => sessions::book_session(&mut ctx, &id).await,
                SessionsSubcommands::Cancel { id } => sessions::cancel_booking(&mut ctx, &id).await,
            },
            Commands::Packages(subcmd) => match subcmd {
                PackagesSubcommands::List => catalog::list_packages(&mut ctx).await,
                PackagesSubcommands::Buy { id } => catalog::buy_package(&mut ctx, &id).await,
            },
            Commands::Purchases => catalog::list_purchases(&mut ctx).await,
            Commands::Availability { instructor_id } => {
                schedule::show_schedule(&mut ctx, &instructor_id).await
            }
            Commands::Settings(subcmd) => match subcmd {
                SettingsSubcommands::Show => settings::show_settings(&mut ctx).await,
                SettingsSubcommands::Maintenance { enabled } => {
                    settings::set_maintenance(&mut ctx, enabled).await
                }
            },
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(&ctx),
                ConfigSubcommands::Init { force } => config_cmd::init_config(&ctx, force),
            },
            Commands::Completions { .. } => Ok(()),
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
