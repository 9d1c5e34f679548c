//! Department domain model

use serde::{Deserialize, Serialize};

use super::new_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Department {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into().trim().to_string(),
            description: normalize_description(description),
        }
    }
}

/// Blank descriptions are stored as absent
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_description_dropped() {
        let dept = Department::new(" Finance ", Some("   ".to_string()));
        assert_eq!(dept.name, "Finance");
        assert!(dept.description.is_none());
    }

    #[test]
    fn test_reads_stored_shape() {
        let dept: Department =
            serde_json::from_str(r#"{"id":"lq1","name":"HR","description":"Human Resources"}"#)
                .unwrap();
        assert_eq!(dept.description.as_deref(), Some("Human Resources"));

        let bare: Department = serde_json::from_str(r#"{"id":"lq2","name":"Ops"}"#).unwrap();
        assert!(bare.description.is_none());
    }
}
