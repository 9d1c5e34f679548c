//! Employee domain model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::new_id;

/// Directory entry linking an account to a position and department.
///
/// `email` and `department_id` are checked (email) or taken as-is
/// (department) at write time only; either may dangle later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    /// Human-facing code, e.g. "EMP-001"
    pub employee_id: String,
    pub email: String,
    pub position: String,
    pub department_id: String,
    #[serde(default, with = "hire_date_format")]
    pub hire_date: Option<NaiveDate>,
}

/// Editable employee fields, shared by create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFields {
    pub employee_id: String,
    pub email: String,
    pub position: String,
    pub department_id: String,
    pub hire_date: Option<NaiveDate>,
}

impl Employee {
    pub fn new(fields: EmployeeFields) -> Self {
        let mut employee = Self {
            id: new_id(),
            employee_id: String::new(),
            email: String::new(),
            position: String::new(),
            department_id: String::new(),
            hire_date: None,
        };
        employee.apply(fields);
        employee
    }

    /// Overwrite every editable field
    pub fn apply(&mut self, fields: EmployeeFields) {
        self.employee_id = fields.employee_id.trim().to_string();
        self.email = super::account::normalize_email(&fields.email);
        self.position = fields.position.trim().to_string();
        self.department_id = fields.department_id;
        self.hire_date = fields.hire_date;
    }
}

/// Hire dates travel as "YYYY-MM-DD"; an empty string means not set.
mod hire_date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(FORMAT).to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> EmployeeFields {
        EmployeeFields {
            employee_id: " EMP-001 ".to_string(),
            email: "Jane@X.com".to_string(),
            position: "Engineer".to_string(),
            department_id: "d1".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        }
    }

    #[test]
    fn test_new_normalizes() {
        let emp = Employee::new(fields());
        assert_eq!(emp.employee_id, "EMP-001");
        assert_eq!(emp.email, "jane@x.com");
    }

    #[test]
    fn test_hire_date_wire_format() {
        let emp = Employee::new(fields());
        let json = serde_json::to_value(&emp).unwrap();
        assert_eq!(json["hireDate"], "2024-03-01");
        assert_eq!(json["employeeId"], "EMP-001");
        assert_eq!(json["departmentId"], "d1");

        let legacy: Employee = serde_json::from_str(
            r#"{"id":"e1","employeeId":"E1","email":"a@x.com","position":"P","departmentId":"","hireDate":""}"#,
        )
        .unwrap();
        assert!(legacy.hire_date.is_none());
    }
}
