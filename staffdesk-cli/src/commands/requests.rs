//! Requests commands - submit a request for yourself

use anyhow::Result;
use clap::Subcommand;
use staffdesk_core::domain::RequestItem;
use staffdesk_core::Command;

use super::execute;

#[derive(Subcommand)]
pub enum RequestsCommands {
    /// Submit a new request
    New {
        /// Request type, e.g. Equipment, Leave, Resources
        kind: String,
        /// Item as name or name:qty; repeat for more items. A name with a
        /// colon of its own takes an explicit quantity, e.g. "Monitor 16:9:1"
        #[arg(long = "item", short, required = true)]
        items: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Parse "Laptop" or "Laptop:2". A suffix that is not a number is part of
/// the name.
fn parse_item(raw: &str) -> RequestItem {
    raw.rsplit_once(':')
        .and_then(|(name, qty)| Some(RequestItem::new(name.trim(), qty.trim().parse().ok()?)))
        .unwrap_or_else(|| RequestItem::new(raw.trim(), 1))
}

pub fn run(command: RequestsCommands) -> Result<()> {
    match command {
        RequestsCommands::New { kind, items, json } => {
            let items = items.iter().map(|raw| parse_item(raw)).collect();
            execute(Command::SubmitRequest { kind, items }, json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        assert_eq!(parse_item("Laptop"), RequestItem::new("Laptop", 1));
        assert_eq!(parse_item("Mouse : 3"), RequestItem::new("Mouse", 3));
        assert_eq!(parse_item("Pens:0"), RequestItem::new("Pens", 0));
    }

    #[test]
    fn test_colon_in_name() {
        assert_eq!(parse_item("Cable: HDMI"), RequestItem::new("Cable: HDMI", 1));
        assert_eq!(parse_item("Monitor 16:9:2"), RequestItem::new("Monitor 16:9", 2));
        assert_eq!(parse_item("Pens:many"), RequestItem::new("Pens:many", 1));
    }
}
