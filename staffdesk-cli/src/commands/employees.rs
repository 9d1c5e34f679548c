//! Employees commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use dialoguer::Confirm;
use staffdesk_core::domain::{Employee, EmployeeFields};
use staffdesk_core::{Command, StaffdeskContext};

use super::{departments, get_context};
use crate::output;

#[derive(Subcommand)]
pub enum EmployeesCommands {
    /// Add an employee record for an existing account
    Add {
        /// Human-facing employee code, e.g. EMP-001
        employee_id: String,
        /// Email of an existing account
        email: String,
        #[arg(long, default_value = "")]
        position: String,
        /// Department id or name
        #[arg(long, short)]
        department: String,
        /// Hire date (YYYY-MM-DD)
        #[arg(long)]
        hire_date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an employee; unset fields keep their value
    Edit {
        /// Record id or employee code
        employee: String,
        #[arg(long)]
        employee_id: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        position: Option<String>,
        /// Department id or name
        #[arg(long, short)]
        department: Option<String>,
        /// Hire date (YYYY-MM-DD)
        #[arg(long)]
        hire_date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an employee record (the account stays)
    Rm {
        /// Record id or employee code
        employee: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn resolve(ctx: &StaffdeskContext, key: &str) -> Option<Employee> {
    ctx.directory
        .employee(key)
        .or_else(|| {
            ctx.directory
                .employees()
                .iter()
                .find(|e| e.employee_id.eq_ignore_ascii_case(key.trim()))
        })
        .cloned()
}

/// Department names resolve to ids; anything else is stored as given
fn department_id(ctx: &StaffdeskContext, key: &str) -> String {
    departments::resolve(ctx, key).map_or_else(|| key.to_string(), |d| d.id.clone())
}

pub fn run(command: EmployeesCommands) -> Result<()> {
    let mut ctx = get_context()?;

    let (outcome, json) = match command {
        EmployeesCommands::Add {
            employee_id,
            email,
            position,
            department,
            hire_date,
            json,
        } => {
            let fields = EmployeeFields {
                employee_id,
                email,
                position,
                department_id: department_id(&ctx, &department),
                hire_date,
            };
            (ctx.dispatch(Command::CreateEmployee(fields))?, json)
        }
        EmployeesCommands::Edit {
            employee,
            employee_id,
            email,
            position,
            department,
            hire_date,
            json,
        } => {
            let current = resolve(&ctx, &employee);
            let id = current
                .as_ref()
                .map_or_else(|| employee.clone(), |e| e.id.clone());
            let department_id = match department {
                Some(d) => department_id(&ctx, &d),
                None => current
                    .as_ref()
                    .map(|e| e.department_id.clone())
                    .unwrap_or_default(),
            };
            let fields = EmployeeFields {
                employee_id: employee_id
                    .or_else(|| current.as_ref().map(|e| e.employee_id.clone()))
                    .unwrap_or_default(),
                email: email
                    .or_else(|| current.as_ref().map(|e| e.email.clone()))
                    .unwrap_or_default(),
                position: position
                    .or_else(|| current.as_ref().map(|e| e.position.clone()))
                    .unwrap_or_default(),
                department_id,
                hire_date: hire_date.or_else(|| current.as_ref().and_then(|e| e.hire_date)),
            };
            (ctx.dispatch(Command::UpdateEmployee { id, fields })?, json)
        }
        EmployeesCommands::Rm {
            employee,
            force,
            json,
        } => {
            let current = resolve(&ctx, &employee);
            let id = current
                .as_ref()
                .map_or_else(|| employee.clone(), |e| e.id.clone());

            if let Some(current) = current.filter(|_| !force && !json && ctx.principal().is_admin()) {
                if !Confirm::new()
                    .with_prompt(format!("Delete employee {}?", current.employee_id))
                    .default(false)
                    .interact()?
                {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            (ctx.dispatch(Command::DeleteEmployee { id })?, json)
        }
    };

    output::outcome(&outcome, json)
}
