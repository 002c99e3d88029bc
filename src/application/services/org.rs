//! Organization service
//!
//! Loads rosters and reorganization scripts and applies scripts to a
//! hierarchy.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::script::ReorgScript;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{OrgTree, Roster, RosterBuilder, SuccessorPicker};
use crate::infrastructure::traits::FileSystem;

/// Service for building and restructuring the employee hierarchy.
pub struct OrgService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl OrgService {
    /// Create a new organization service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Roster path: explicit override first, then the configured one.
    pub fn roster_path(&self, explicit: Option<&Path>) -> ApplicationResult<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.settings.roster.clone())
            .ok_or_else(|| ApplicationError::Config {
                message: "no roster given (use --roster or set `roster` in .orgtree.toml)"
                    .to_string(),
            })
    }

    /// Read and parse a roster file.
    #[instrument(level = "debug", skip(self))]
    pub fn load_roster(&self, path: &Path) -> ApplicationResult<Roster> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::Roster {
                path: path.to_path_buf(),
                message: "file not found".to_string(),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| ApplicationError::Roster {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let roster: Roster =
            serde_json::from_str(&content).map_err(|e| ApplicationError::Roster {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        debug!("load_roster: {} record(s)", roster.employees.len());
        Ok(roster)
    }

    /// Build the initial hierarchy from a roster.
    pub fn build_tree(&self, roster: &Roster) -> ApplicationResult<OrgTree> {
        let tree = RosterBuilder::new().build_from_records(&roster.employees)?;
        info!(
            "Generated employee tree: {} employee(s) under {}",
            tree.len(),
            tree.name(tree.root())
        );
        Ok(tree)
    }

    /// Load a roster file and build its hierarchy.
    pub fn load_tree(&self, explicit: Option<&Path>) -> ApplicationResult<OrgTree> {
        let path = self.roster_path(explicit)?;
        let roster = self.load_roster(&path)?;
        self.build_tree(&roster)
    }

    /// Read and parse a reorganization script.
    #[instrument(level = "debug", skip(self))]
    pub fn load_script(&self, path: &Path) -> ApplicationResult<ReorgScript> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| ApplicationError::Script {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        ReorgScript::parse(&content).map_err(|e| ApplicationError::Script {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Successor picker as configured.
    pub fn succession(&self) -> Box<dyn SuccessorPicker> {
        self.settings.successor_picker()
    }

    /// Apply every step of `script` in order.
    ///
    /// Stops at the first failing step; the steps before it stay applied
    /// and the failing one has changed nothing. Returns one confirmation
    /// message per step.
    #[instrument(level = "debug", skip_all, fields(steps = script.steps.len()))]
    pub fn run_script(
        &self,
        tree: &mut OrgTree,
        script: &ReorgScript,
        picker: &mut dyn SuccessorPicker,
    ) -> ApplicationResult<Vec<String>> {
        let mut report = Vec::with_capacity(script.steps.len());
        for (i, step) in script.steps.iter().enumerate() {
            debug!("step {}: {}", i + 1, step);
            let message = step
                .apply(tree, picker)
                .map_err(|source| ApplicationError::StepFailed {
                    index: i + 1,
                    step: step.to_string(),
                    source,
                })?;
            report.push(message);
        }
        Ok(report)
    }
}
