//! Builds the initial hierarchy from roster records.

use tracing::{debug, instrument};

use crate::domain::arena::OrgTree;
use crate::domain::entities::{Employee, EmployeeRecord};
use crate::domain::error::{DomainError, TreeResult};

/// Constructs an [`OrgTree`] from roster records.
///
/// The first record is the top of the hierarchy; every following record is
/// hired under its declared boss, in roster order. A boss must therefore
/// appear before their reports.
#[derive(Debug, Default)]
pub struct RosterBuilder {
    normalized: Vec<Employee>,
}

impl RosterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Employees produced by the last build, in roster order.
    pub fn normalized(&self) -> &[Employee] {
        &self.normalized
    }

    /// Normalize raw records and fold them into a hierarchy.
    #[instrument(level = "debug", skip(self, records), fields(count = records.len()))]
    pub fn build_from_records(&mut self, records: &[EmployeeRecord]) -> TreeResult<OrgTree> {
        self.normalized = records
            .iter()
            .map(Employee::from_record)
            .collect::<TreeResult<Vec<_>>>()?;
        debug!("normalized {} record(s)", self.normalized.len());
        Self::build_from_employees(self.normalized.clone())
    }

    /// Fold already normalized employees into a hierarchy.
    pub fn build_from_employees(employees: Vec<Employee>) -> TreeResult<OrgTree> {
        let mut employees = employees.into_iter();
        let root = employees.next().ok_or(DomainError::EmptyRoster)?;
        debug!("top of hierarchy: {}", root.name);
        let mut tree = OrgTree::new(root);

        for employee in employees {
            let boss = employee
                .boss
                .clone()
                .ok_or_else(|| DomainError::InvalidRecord {
                    name: employee.name.clone(),
                    message: format!("{} has no boss", employee.name),
                })?;
            tree.hire_node(employee, &boss)?;
        }

        Ok(tree)
    }
}
