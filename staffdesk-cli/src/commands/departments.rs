//! Departments commands

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Confirm;
use staffdesk_core::domain::Department;
use staffdesk_core::{Command, StaffdeskContext};

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum DepartmentsCommands {
    /// Add a department
    Add {
        name: String,
        #[arg(long, short)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a department; pass an empty description to clear it
    Edit {
        /// Department id or name
        department: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a department. Employees keep pointing at it and show N/A.
    Rm {
        /// Department id or name
        department: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Find a department by id, falling back to a case-insensitive name match
pub fn resolve<'a>(ctx: &'a StaffdeskContext, key: &str) -> Option<&'a Department> {
    ctx.directory.department(key).or_else(|| {
        ctx.directory
            .departments()
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(key.trim()))
    })
}

pub fn run(command: DepartmentsCommands) -> Result<()> {
    let mut ctx = get_context()?;

    let (outcome, json) = match command {
        DepartmentsCommands::Add {
            name,
            description,
            json,
        } => (
            ctx.dispatch(Command::CreateDepartment { name, description })?,
            json,
        ),
        DepartmentsCommands::Edit {
            department,
            name,
            description,
            json,
        } => {
            let current = resolve(&ctx, &department).cloned();
            let id = current
                .as_ref()
                .map_or_else(|| department.clone(), |d| d.id.clone());
            let name = name
                .or_else(|| current.as_ref().map(|d| d.name.clone()))
                .unwrap_or_default();
            let description = description.or_else(|| current.and_then(|d| d.description));
            (
                ctx.dispatch(Command::UpdateDepartment {
                    id,
                    name,
                    description,
                })?,
                json,
            )
        }
        DepartmentsCommands::Rm {
            department,
            force,
            json,
        } => {
            let current = resolve(&ctx, &department).cloned();
            let id = current
                .as_ref()
                .map_or_else(|| department.clone(), |d| d.id.clone());

            if let Some(current) = current.filter(|_| !force && !json && ctx.principal().is_admin()) {
                let assigned = ctx
                    .directory
                    .employees()
                    .iter()
                    .filter(|e| e.department_id == current.id)
                    .count();
                if assigned > 0 {
                    output::warning(&format!(
                        "{} employee(s) are assigned to {} and will show N/A.",
                        assigned, current.name
                    ));
                }
                if !Confirm::new()
                    .with_prompt(format!("Delete department '{}'?", current.name))
                    .default(false)
                    .interact()?
                {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            (ctx.dispatch(Command::DeleteDepartment { id })?, json)
        }
    };

    output::outcome(&outcome, json)
}
