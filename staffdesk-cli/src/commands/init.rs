//! Init command - create the data directory and default settings

use anyhow::Result;
use colored::Colorize;
use staffdesk_core::config::Config;
use staffdesk_core::domain::SEED_ADMIN_EMAIL;
use staffdesk_core::services::LogEvent;

use super::{get_context, get_data_dir, get_logger, log_event};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let data_dir = get_data_dir()?;
    let settings_path = Config::settings_path(&data_dir);
    let created_settings = !settings_path.exists();

    // Opening the context seeds the snapshot on first use
    let ctx = get_context()?;
    if created_settings {
        ctx.config.save(&data_dir)?;
    }
    log_event(&get_logger(), LogEvent::new("data_dir_initialized"));

    if json {
        println!(
            "{}",
            serde_json::json!({
                "data_dir": data_dir.to_string_lossy(),
                "settings_created": created_settings,
                "accounts": ctx.directory.accounts().len(),
            })
        );
        return Ok(());
    }

    output::success(&format!("Data directory ready at {}", data_dir.display()));
    if created_settings {
        println!("  Wrote {}", settings_path.display());
    }
    if ctx.directory.account_by_email(SEED_ADMIN_EMAIL).is_some() {
        println!(
            "{}",
            format!("  Default admin: {} (change its password with `sd accounts reset-password`)", SEED_ADMIN_EMAIL)
                .dimmed()
        );
    }
    Ok(())
}
