//! Command-line interface of taskdue.
//!
//! Every subcommand lives in its own module exposing `cmd`. The helpers here
//! open the configured backend and print controller notifications.

pub mod init;
pub mod login;
pub mod logout;
pub mod signup;
pub mod tasks;
pub mod ui;
pub mod whoami;

use crate::api::{connect, Auth, Backend};
use crate::libs::config::Config;
use crate::libs::controller::{Level, Notification};
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_success};
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Create an account and sign in")]
    Signup,
    #[command(about = "Sign in")]
    Login,
    #[command(about = "Sign out")]
    Logout,
    #[command(about = "Show the signed-in identity")]
    Whoami,
    #[command(about = "List your tasks by due date")]
    List,
    #[command(about = "Add a task", arg_required_else_help = true)]
    Add(tasks::AddArgs),
    #[command(about = "Toggle a task between done and open", arg_required_else_help = true)]
    Toggle(tasks::SelectArgs),
    #[command(about = "Delete a task", arg_required_else_help = true)]
    Delete(tasks::DeleteArgs),
    #[command(about = "Interactive task list")]
    Ui,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Signup => signup::cmd().await,
            Commands::Login => login::cmd().await,
            Commands::Logout => logout::cmd().await,
            Commands::Whoami => whoami::cmd().await,
            Commands::List => tasks::list().await,
            Commands::Add(args) => tasks::add(args).await,
            Commands::Toggle(args) => tasks::toggle(args).await,
            Commands::Delete(args) => tasks::delete(args).await,
            Commands::Ui => ui::cmd().await,
        }
    }
}

/// Reads the configuration and opens the backend it names.
pub(crate) fn open_backend() -> Result<(Auth, Backend)> {
    let config = Config::read()?;
    msg_debug!(Message::BackendInUse(config.backend.to_string()));
    connect(&config, &DataStorage::new())
}

pub(crate) fn render_notifications(notifications: Vec<Notification>) {
    for notification in notifications {
        match notification.level {
            Level::Success => msg_success!(notification.message),
            Level::Error => msg_error!(notification.message),
        }
    }
}
