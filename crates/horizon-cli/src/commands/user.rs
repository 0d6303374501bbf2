//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use horizon_api::AppState;
use horizon_auth::RegisterUser;
use horizon_core::error::AppError;
use horizon_core::traits::Repository;
use horizon_core::types::pagination::PageRequest;
use horizon_entity::user::User;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users, newest first
    List {
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Users per page
        #[arg(long, default_value_t = 100)]
        per_page: u64,
    },
    /// Create a user
    Create {
        /// Email
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
        /// First name
        #[arg(long)]
        fname: Option<String>,
        /// Last name
        #[arg(long)]
        lname: Option<String>,
        /// Grant admin privileges
        #[arg(long)]
        admin: bool,
    },
    /// Grant admin privileges to an existing user
    Promote {
        /// Email
        email: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    admin: bool,
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email.clone(),
            name: u.display_name().unwrap_or_default(),
            admin: u.is_admin,
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    state: &AppState,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        UserCommand::List { page, per_page } => {
            let users = state
                .stores
                .users
                .find_all(&PageRequest::new(*page, *per_page))
                .await?;
            let rows: Vec<UserRow> = users.items.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
        UserCommand::Create {
            email,
            password,
            fname,
            lname,
            admin,
        } => {
            let input = RegisterUser {
                email: email.clone(),
                password: password.clone(),
                fname: fname.clone(),
                lname: lname.clone(),
            };
            let user = state.session_manager.provision(input, *admin).await?;
            output::print_list(&[UserRow::from(&user)], format);
        }
        UserCommand::Promote { email } => {
            let user = state.user_service.set_admin_by_email(email, true).await?;
            output::print_success(&format!("{} is now an admin", user.email));
        }
    }

    Ok(())
}
