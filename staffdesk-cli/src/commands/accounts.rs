//! Accounts commands - admin management of sign-in accounts

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Confirm;
use staffdesk_core::domain::{Account, Role};
use staffdesk_core::services::{AccountUpdate, NewAccount};
use staffdesk_core::{Command, StaffdeskContext};

use super::{get_context, read_password};
use crate::output;

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// Create an account
    Add {
        first_name: String,
        last_name: String,
        email: String,
        /// Admin or User
        #[arg(long, default_value = "User")]
        role: Role,
        /// Mark the account verified right away
        #[arg(long)]
        verified: bool,
        /// Password (prompted, or read from piped stdin, if omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an account; unset fields keep their value
    Edit {
        /// Account id or email
        account: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        verified: Option<bool>,
        /// New password
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a new password for an account
    ResetPassword {
        /// Account id or email
        account: String,
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an account
    Rm {
        /// Account id or email
        account: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Find an account by id, falling back to email
fn resolve(ctx: &StaffdeskContext, key: &str) -> Option<Account> {
    ctx.directory
        .account(key)
        .or_else(|| ctx.directory.account_by_email(key))
        .cloned()
}

/// Id to dispatch with. Unknown keys go through unchanged so the access
/// gate and the not-found check report them.
fn target_id(found: Option<&Account>, key: &str) -> String {
    found.map_or_else(|| key.to_string(), |a| a.id.clone())
}

pub fn run(command: AccountsCommands) -> Result<()> {
    let mut ctx = get_context()?;

    let (outcome, json) = match command {
        AccountsCommands::Add {
            first_name,
            last_name,
            email,
            role,
            verified,
            password,
            json,
        } => {
            let password = read_password(password, "Password", true)?;
            let outcome = ctx.dispatch(Command::CreateAccount(NewAccount {
                first_name,
                last_name,
                email,
                password,
                role,
                verified,
            }))?;
            (outcome, json)
        }
        AccountsCommands::Edit {
            account,
            first_name,
            last_name,
            email,
            role,
            verified,
            password,
            json,
        } => {
            let current = resolve(&ctx, &account);
            let id = target_id(current.as_ref(), &account);
            let keep = |f: fn(&Account) -> String| current.as_ref().map(f).unwrap_or_default();

            let update = AccountUpdate {
                first_name: first_name.unwrap_or_else(|| keep(|a| a.first_name.clone())),
                last_name: last_name.unwrap_or_else(|| keep(|a| a.last_name.clone())),
                email: email.unwrap_or_else(|| keep(|a| a.email.clone())),
                password,
                role: role
                    .or(current.as_ref().map(|a| a.role))
                    .unwrap_or_default(),
                verified: verified
                    .or(current.as_ref().map(|a| a.verified))
                    .unwrap_or_default(),
            };
            let outcome = ctx.dispatch(Command::UpdateAccount { id, update })?;
            (outcome, json)
        }
        AccountsCommands::ResetPassword {
            account,
            password,
            json,
        } => {
            let id = target_id(resolve(&ctx, &account).as_ref(), &account);
            let password = read_password(password, "New password", true)?;
            let outcome = ctx.dispatch(Command::ResetPassword { id, password })?;
            (outcome, json)
        }
        AccountsCommands::Rm {
            account,
            force,
            json,
        } => {
            let current = resolve(&ctx, &account);
            let id = target_id(current.as_ref(), &account);
            if let Some(current) = current.filter(|_| !force && !json && ctx.principal().is_admin()) {
                output::warning(&format!(
                    "This will delete {} <{}>.",
                    current.full_name(),
                    current.email
                ));
                if !Confirm::new()
                    .with_prompt("Are you sure?")
                    .default(false)
                    .interact()?
                {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            let outcome = ctx.dispatch(Command::DeleteAccount { id })?;
            (outcome, json)
        }
    };

    output::outcome(&outcome, json)
}
