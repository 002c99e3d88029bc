//! Structural edits: hire, fire, promote and demote.
//!
//! Each operation resolves every handle and position it needs before the
//! first mutation, so an error always leaves the hierarchy untouched.
//! Child lists change owners by value (`mem::take`), never by sharing.

use std::fmt;
use std::mem;

use generational_arena::Index;
use tracing::{debug, info, instrument};

use crate::domain::arena::OrgTree;
use crate::domain::entities::Employee;
use crate::domain::error::{DomainError, TreeResult};
use crate::domain::succession::SuccessorPicker;

/// Outcome of firing an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Firing {
    pub fired: Employee,
    /// Subordinate who took over the fired employee's place, if any
    pub replacement: Option<String>,
}

impl fmt::Display for Firing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.replacement {
            Some(replacement) => write!(
                f,
                "Fired {} and replaced with {}",
                self.fired.name, replacement
            ),
            None => write!(f, "Fired {} (no team to hand over)", self.fired.name),
        }
    }
}

/// Outcome of promoting an employee over their boss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    pub promoted: String,
    pub former_boss: String,
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Promoted {} and made {} their subordinate",
            self.promoted, self.former_boss
        )
    }
}

/// Outcome of demoting an employee below one of their reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demotion {
    pub demoted: String,
    pub replacement: String,
}

impl fmt::Display for Demotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Demoted employee (demoted {} and replaced with {})",
            self.demoted, self.replacement
        )
    }
}

impl OrgTree {
    /// Place a new employee as the last direct report of `boss_name`.
    ///
    /// Returns a confirmation message.
    pub fn hire(&mut self, employee: Employee, boss_name: &str) -> TreeResult<String> {
        let name = employee.name.clone();
        self.hire_node(employee, boss_name)?;
        Ok(format!(
            "Added new employee ({}) with {} as their boss",
            name, boss_name
        ))
    }

    /// Like [`OrgTree::hire`], returning the handle of the new node.
    #[instrument(level = "debug", skip(self, employee), fields(name = %employee.name))]
    pub fn hire_node(&mut self, employee: Employee, boss_name: &str) -> TreeResult<Index> {
        if employee.name.trim().is_empty() {
            return Err(DomainError::InvalidRecord {
                name: employee.name,
                message: "empty name".to_string(),
            });
        }
        let boss = self
            .find_node(boss_name)
            .ok_or_else(|| DomainError::NoSuchBoss(boss_name.to_string()))?;
        if self.find_node(&employee.name).is_some() {
            return Err(DomainError::DuplicateEmployee(employee.name));
        }

        let name = employee.name.clone();
        let idx = self.create_node(employee);
        self.node_mut(boss)?.children.push(idx);
        info!("Added new employee ({}) with {} as their boss", name, boss_name);
        Ok(idx)
    }

    /// Remove `name` from the hierarchy.
    ///
    /// A leaf simply disappears. Otherwise `picker` chooses one direct
    /// subordinate as successor: the successor moves up under the fired
    /// employee's boss and the remaining subordinates become its reports.
    #[instrument(level = "debug", skip(self, picker))]
    pub fn fire<P>(&mut self, name: &str, picker: &mut P) -> TreeResult<Firing>
    where
        P: SuccessorPicker + ?Sized,
    {
        let target = self
            .find_node(name)
            .ok_or_else(|| DomainError::NoSuchEmployee(name.to_string()))?;
        if target == self.root() {
            return Err(DomainError::CannotFireRoot(name.to_string()));
        }
        let boss = self
            .find_boss(name)
            .ok_or_else(|| DomainError::Corrupted(format!("{name} has no boss")))?;
        let target_pos = self.position_in(boss, target)?;

        let team = &self.node_ref(target)?.children;
        let choice = if team.is_empty() {
            None
        } else {
            let candidates = team
                .iter()
                .map(|&idx| self.node_ref(idx).map(|n| &n.employee))
                .collect::<TreeResult<Vec<_>>>()?;
            Some(picker.pick(&candidates).min(candidates.len() - 1))
        };

        let replacement = match choice {
            None => {
                self.node_mut(boss)?.children.remove(target_pos);
                None
            }
            Some(choice) => {
                let mut team = mem::take(&mut self.node_mut(target)?.children);
                let successor = team.remove(choice);
                debug!(
                    "{} succeeds {}, absorbing {} colleague(s)",
                    self.name(successor),
                    name,
                    team.len()
                );
                self.node_mut(successor)?.children.extend(team);
                let boss_node = self.node_mut(boss)?;
                boss_node.children.push(successor);
                boss_node.children.remove(target_pos);
                Some(self.name(successor).to_string())
            }
        };

        let fired = self.destroy_node(target)?.employee;
        let firing = Firing { fired, replacement };
        info!("{}", firing);
        Ok(firing)
    }

    /// Swap `name` with their boss.
    ///
    /// The employee takes the boss's place (or becomes the top of the
    /// hierarchy), inherits the boss's other reports and gets the boss as
    /// last direct report; the boss takes over the employee's former team.
    #[instrument(level = "debug", skip(self))]
    pub fn promote(&mut self, name: &str) -> TreeResult<Promotion> {
        let employee = self
            .find_node(name)
            .ok_or_else(|| DomainError::NoSuchEmployee(name.to_string()))?;
        if employee == self.root() {
            return Err(DomainError::CannotPromoteRoot(name.to_string()));
        }
        let boss = self
            .find_boss(name)
            .ok_or_else(|| DomainError::Corrupted(format!("{name} has no boss")))?;
        let boss_name = self.name(boss).to_string();
        let super_boss = self.find_boss(&boss_name);

        self.swap_with_boss(boss, employee, super_boss)?;

        let promotion = Promotion {
            promoted: name.to_string(),
            former_boss: boss_name,
        };
        info!("{}", promotion);
        Ok(promotion)
    }

    /// Swap `name` with their direct report `subordinate_name`.
    ///
    /// Equivalent to promoting `subordinate_name`.
    #[instrument(level = "debug", skip(self))]
    pub fn demote(&mut self, name: &str, subordinate_name: &str) -> TreeResult<Demotion> {
        let employee = self
            .find_node(name)
            .ok_or_else(|| DomainError::NoSuchEmployee(name.to_string()))?;
        let subordinate = self
            .find_node(subordinate_name)
            .ok_or_else(|| DomainError::NoSuchEmployee(subordinate_name.to_string()))?;
        if !self.node_ref(employee)?.children.contains(&subordinate) {
            return Err(DomainError::NotADirectSubordinate {
                employee: name.to_string(),
                subordinate: subordinate_name.to_string(),
            });
        }
        let super_boss = if employee == self.root() {
            None
        } else {
            Some(
                self.find_boss(name)
                    .ok_or_else(|| DomainError::Corrupted(format!("{name} has no boss")))?,
            )
        };

        self.swap_with_boss(employee, subordinate, super_boss)?;

        let demotion = Demotion {
            demoted: name.to_string(),
            replacement: subordinate_name.to_string(),
        };
        info!("{}", demotion);
        Ok(demotion)
    }

    /// Exchange `upper` and its direct report `lower`.
    ///
    /// `super_boss` is the boss of `upper`, None when `upper` is the root.
    fn swap_with_boss(
        &mut self,
        upper: Index,
        lower: Index,
        super_boss: Option<Index>,
    ) -> TreeResult<()> {
        let lower_pos = self.position_in(upper, lower)?;
        let upper_pos = super_boss
            .map(|sb| self.position_in(sb, upper))
            .transpose()?;

        let mut upper_team = mem::take(&mut self.node_mut(upper)?.children);
        upper_team.remove(lower_pos);
        let lower_team = mem::take(&mut self.node_mut(lower)?.children);
        debug!(
            "swapping {} ({} other report(s)) with {} ({} report(s))",
            self.name(upper),
            upper_team.len(),
            self.name(lower),
            lower_team.len()
        );

        self.node_mut(upper)?.children = lower_team;
        self.node_mut(lower)?.children = upper_team;

        match (super_boss, upper_pos) {
            (Some(sb), Some(pos)) => self.node_mut(sb)?.children[pos] = lower,
            _ => {
                debug!("{} is now at the top", self.name(lower));
                self.set_root(lower);
            }
        }
        self.node_mut(lower)?.children.push(upper);
        Ok(())
    }

    /// Position of `child` within the direct reports of `parent`.
    fn position_in(&self, parent: Index, child: Index) -> TreeResult<usize> {
        self.node_ref(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or_else(|| {
                DomainError::Corrupted(format!(
                    "{} is not listed under {}",
                    self.name(child),
                    self.name(parent)
                ))
            })
    }
}
