//! Reorganization scripts: a list of structural edits applied in order.
//!
//! ```toml
//! [[steps]]
//! hire = { name = "Jeb", job_title = "Chauffeur", salary = "99999", boss = "Sarah" }
//!
//! [[steps]]
//! fire = "Alicia"
//!
//! [[steps]]
//! promote = "Jared"
//!
//! [[steps]]
//! demote = { employee = "Xavier", subordinate = "Maria" }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Employee, OrgTree, SuccessorPicker, TreeResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HireStep {
    pub name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub salary: String,
    pub boss: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoteStep {
    pub employee: String,
    pub subordinate: String,
}

/// One structural edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Hire(HireStep),
    Fire(String),
    Promote(String),
    Demote(DemoteStep),
}

impl Step {
    /// Apply this edit to `tree`, returning the confirmation message.
    pub fn apply(&self, tree: &mut OrgTree, picker: &mut dyn SuccessorPicker) -> TreeResult<String> {
        match self {
            Step::Hire(hire) => tree.hire(
                Employee::new(
                    hire.name.as_str(),
                    hire.job_title.as_str(),
                    hire.salary.as_str(),
                    Some(hire.boss.as_str()),
                ),
                &hire.boss,
            ),
            Step::Fire(name) => tree.fire(name, picker).map(|f| f.to_string()),
            Step::Promote(name) => tree.promote(name).map(|p| p.to_string()),
            Step::Demote(demote) => tree
                .demote(&demote.employee, &demote.subordinate)
                .map(|d| d.to_string()),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Hire(hire) => write!(f, "hire {} under {}", hire.name, hire.boss),
            Step::Fire(name) => write!(f, "fire {name}"),
            Step::Promote(name) => write!(f, "promote {name}"),
            Step::Demote(demote) => {
                write!(f, "demote {} below {}", demote.employee, demote.subordinate)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorgScript {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl ReorgScript {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_all_step_kinds_when_parsing_then_reads_them_in_order() {
        let script = ReorgScript::parse(
            r#"
[[steps]]
hire = { name = "Jeb", job_title = "Chauffeur", salary = "99999", boss = "Sarah" }

[[steps]]
fire = "Alicia"

[[steps]]
promote = "Jared"

[[steps]]
demote = { employee = "Xavier", subordinate = "Maria" }
"#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 4);
        assert!(matches!(&script.steps[0], Step::Hire(h) if h.name == "Jeb" && h.boss == "Sarah"));
        assert_eq!(script.steps[1], Step::Fire("Alicia".to_string()));
        assert_eq!(script.steps[2], Step::Promote("Jared".to_string()));
        assert_eq!(script.steps[3].to_string(), "demote Xavier below Maria");
    }

    #[test]
    fn given_empty_document_when_parsing_then_has_no_steps() {
        assert!(ReorgScript::parse("").unwrap().steps.is_empty());
    }

    #[test]
    fn given_unknown_step_when_parsing_then_fails() {
        assert!(ReorgScript::parse("[[steps]]\nretire = \"Bill\"\n").is_err());
    }
}
