//! Supply request domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;
use super::result::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestItem {
    pub name: String,
    pub qty: u32,
}

impl RequestItem {
    pub fn new(name: impl Into<String>, qty: u32) -> Self {
        Self {
            name: name.into(),
            qty,
        }
    }
}

/// A request raised by an employee for themselves.
///
/// Status starts at Pending and nothing moves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub items: Vec<RequestItem>,
    #[serde(default)]
    pub status: RequestStatus,
    pub date: DateTime<Utc>,
    pub employee_email: String,
}

impl Request {
    /// Validate and build a new pending request.
    ///
    /// Items with a blank name are dropped before the empty check.
    pub fn new(
        kind: &str,
        items: Vec<RequestItem>,
        employee_email: &str,
    ) -> Result<Self, ValidationError> {
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(ValidationError::MissingField("type"));
        }

        let items: Vec<RequestItem> = items
            .into_iter()
            .map(|item| RequestItem::new(item.name.trim(), item.qty))
            .filter(|item| !item.name.is_empty())
            .collect();

        if items.is_empty() {
            return Err(ValidationError::EmptyItemList);
        }
        if let Some(bad) = items.iter().find(|item| item.qty == 0) {
            return Err(ValidationError::InvalidQuantity {
                item: bad.name.clone(),
            });
        }

        Ok(Self {
            id: new_id(),
            kind: kind.to_string(),
            items,
            status: RequestStatus::Pending,
            date: Utc::now(),
            employee_email: employee_email.to_string(),
        })
    }

    /// "Laptop (1), Mouse (2)"
    pub fn items_summary(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{} ({})", item.name, item.qty))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_items_dropped() {
        let req = Request::new(
            "Equipment",
            vec![RequestItem::new("  ", 1), RequestItem::new("Laptop", 1)],
            "a@x.com",
        )
        .unwrap();
        assert_eq!(req.items.len(), 1);
        assert_eq!(req.status, RequestStatus::Pending);
    }

    #[test]
    fn test_empty_items_rejected() {
        let err = Request::new("Equipment", vec![RequestItem::new("", 3)], "a@x.com").unwrap_err();
        assert_eq!(err, ValidationError::EmptyItemList);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = Request::new("Equipment", vec![RequestItem::new("Pen", 0)], "a@x.com").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidQuantity { .. }));
    }

    #[test]
    fn test_reads_stored_shape() {
        let req: Request = serde_json::from_str(
            r#"{"id":"r1","type":"Equipment","items":[{"name":"Laptop","qty":1}],
                "status":"Pending","date":"2024-05-01T10:00:00.000Z","employeeEmail":"a@x.com"}"#,
        )
        .unwrap();
        assert_eq!(req.kind, "Equipment");
        assert_eq!(req.items_summary(), "Laptop (1)");
    }
}
