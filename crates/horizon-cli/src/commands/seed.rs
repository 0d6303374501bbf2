//! Seeds the database with an admin account and demo users.

use clap::Args;

use horizon_api::AppState;
use horizon_auth::RegisterUser;
use horizon_core::error::AppError;

use crate::output;

const DEMO_USERS: usize = 10;
const DEMO_PASSWORD: &str = "Password1234!";

/// Arguments for the seed command
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Admin email
    #[arg(long, default_value = "admin@your-mail.com")]
    pub admin_email: String,
    /// Admin password
    #[arg(long, default_value = DEMO_PASSWORD)]
    pub admin_password: String,
    /// Skip the demo users
    #[arg(long)]
    pub no_demo: bool,
}

/// Execute the seed command. Existing emails are left untouched.
pub async fn execute(args: &SeedArgs, state: &AppState) -> Result<(), AppError> {
    let mut created = 0;

    let admin = RegisterUser {
        email: args.admin_email.clone(),
        password: args.admin_password.clone(),
        fname: Some("Admin".to_string()),
        lname: None,
    };
    if provision(state, admin, true).await? {
        created += 1;
    }

    if !args.no_demo {
        for i in 0..DEMO_USERS {
            let demo = RegisterUser {
                email: format!("demo{i}@your-mail.com"),
                password: DEMO_PASSWORD.to_string(),
                fname: Some(format!("Demo{i}")),
                lname: None,
            };
            if provision(state, demo, false).await? {
                created += 1;
            }
        }
    }

    output::print_success(&format!("Seeded {created} user(s)"));
    Ok(())
}

async fn provision(state: &AppState, input: RegisterUser, is_admin: bool) -> Result<bool, AppError> {
    let email = input.email.clone();
    match state.session_manager.provision(input, is_admin).await {
        Ok(_) => Ok(true),
        Err(e) if e.kind == horizon_core::error::ErrorKind::Conflict => {
            output::print_warning(&format!("{email} already exists, skipping"));
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
