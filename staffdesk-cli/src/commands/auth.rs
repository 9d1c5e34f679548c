//! Auth commands - register, verify, login, logout, profile

use anyhow::Result;
use clap::Subcommand;
use staffdesk_core::services::Registration;
use staffdesk_core::Command;

use super::{execute, get_context, read_password};
use crate::output;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Change your display name
    Edit {
        /// New first name (default: keep current)
        #[arg(long)]
        first_name: Option<String>,
        /// New last name (default: keep current)
        #[arg(long)]
        last_name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn register(
    first_name: String,
    last_name: String,
    email: String,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let password = read_password(password, "Password", true)?;
    execute(
        Command::Register(Registration {
            first_name,
            last_name,
            email,
            password,
        }),
        json,
    )
}

pub fn verify(json: bool) -> Result<()> {
    execute(Command::VerifyEmail, json)
}

pub fn login(email: String, password: Option<String>, json: bool) -> Result<()> {
    let password = read_password(password, "Password", false)?;
    execute(Command::SignIn { email, password }, json)
}

pub fn logout(json: bool) -> Result<()> {
    execute(Command::SignOut, json)
}

pub fn profile(command: ProfileCommands) -> Result<()> {
    match command {
        ProfileCommands::Edit {
            first_name,
            last_name,
            json,
        } => {
            let mut ctx = get_context()?;
            // Unset fields keep their value; the gate itself lives in dispatch
            let (current_first, current_last) = ctx
                .current_account()
                .map(|a| (a.first_name.clone(), a.last_name.clone()))
                .unwrap_or_default();

            let outcome = ctx.dispatch(Command::UpdateProfile {
                first_name: first_name.unwrap_or(current_first),
                last_name: last_name.unwrap_or(current_last),
            })?;
            output::outcome(&outcome, json)
        }
    }
}
