//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, TreeResult};

/// A person in the organization.
///
/// `boss` is only consulted when the employee is placed into a tree;
/// afterwards the tree position is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique across the whole hierarchy
    pub name: String,
    pub job_title: String,
    pub salary: String,
    /// Intended superior at hire time, None for the top of the hierarchy
    pub boss: Option<String>,
}

impl Employee {
    pub fn new(
        name: impl Into<String>,
        job_title: impl Into<String>,
        salary: impl Into<String>,
        boss: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            job_title: job_title.into(),
            salary: salary.into(),
            boss: boss.map(str::to_string),
        }
    }

    /// Normalize a raw roster record into an employee.
    ///
    /// Both the name and the boss name go through [`normalize_name`].
    pub fn from_record(record: &EmployeeRecord) -> TreeResult<Self> {
        let name = normalize_name(&record.name).ok_or_else(|| DomainError::InvalidRecord {
            name: record.name.clone(),
            message: "empty name".to_string(),
        })?;
        let boss = match record.boss.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(normalize_name(raw).ok_or_else(|| DomainError::InvalidRecord {
                name: record.name.clone(),
                message: format!("invalid boss name '{raw}'"),
            })?),
        };
        Ok(Self {
            name,
            job_title: record.job_title.clone(),
            salary: record.salary.clone(),
            boss,
        })
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.job_title.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.job_title)
        }
    }
}

/// Employee record as it appears in a roster file, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub boss: Option<String>,
}

/// Roster file layout: `{ "employees": [ ... ] }`.
///
/// The first record is the top of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub employees: Vec<EmployeeRecord>,
}

/// Turn a login such as `sarah@acme.com` into a display name (`Sarah`).
///
/// Everything from the first `@` is dropped and the first character is
/// upper-cased. Returns None if nothing is left.
pub fn normalize_name(raw: &str) -> Option<String> {
    let local = raw.split('@').next().unwrap_or_default().trim();
    let mut chars = local.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
///
/// Returns the input unchanged if expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
