//! Name-based queries over the hierarchy.
//!
//! All lookups walk down from the root, so each call costs O(employees).
//! Traversal order is depth-first, root first, children in stored order;
//! the first match wins.

use generational_arena::Index;
use tracing::{instrument, trace};

use crate::domain::arena::OrgTree;

impl OrgTree {
    /// Find the node holding `name`.
    #[instrument(level = "trace", skip(self))]
    pub fn find_node(&self, name: &str) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.employee.name == name)
            .map(|(idx, _)| idx)
    }

    /// Find the node whose direct subordinates include `name`.
    ///
    /// The top of the hierarchy has no boss.
    #[instrument(level = "trace", skip(self))]
    pub fn find_boss(&self, name: &str) -> Option<Index> {
        let boss = self
            .iter()
            .find(|(_, node)| node.children.iter().any(|&c| self.name(c) == name))
            .map(|(idx, _)| idx);
        trace!("boss of {}: {:?}", name, boss.map(|b| self.name(b)));
        boss
    }

    /// Direct subordinates of `name`; empty for someone without reports,
    /// None if nobody is called `name`.
    #[instrument(level = "trace", skip(self))]
    pub fn find_subordinates(&self, name: &str) -> Option<&[Index]> {
        let idx = self.find_node(name)?;
        self.get_node(idx).map(|node| node.children.as_slice())
    }

    /// Names of the direct subordinates of `name`.
    pub fn subordinate_names(&self, name: &str) -> Option<Vec<&str>> {
        self.find_subordinates(name)
            .map(|subs| subs.iter().map(|&idx| self.name(idx)).collect())
    }

    /// Chain of command from the top of the hierarchy down to `name`.
    #[instrument(level = "trace", skip(self))]
    pub fn path_to(&self, name: &str) -> Option<Vec<Index>> {
        let mut path: Vec<Index> = Vec::new();
        let mut stack = vec![(self.root(), 0usize)];

        while let Some((idx, depth)) = stack.pop() {
            let Some(node) = self.get_node(idx) else {
                continue;
            };
            path.truncate(depth);
            path.push(idx);
            if node.employee.name == name {
                return Some(path);
            }
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        None
    }

    /// The lowest-ranking employee and their depth (the top is depth 0).
    ///
    /// Among several employees at the same depth the first one in traversal
    /// order is returned.
    #[instrument(level = "debug", skip(self))]
    pub fn lowest_employee(&self) -> Option<(Index, usize)> {
        let mut lowest: Option<(Index, usize)> = None;
        let mut stack = vec![(self.root(), 0usize)];

        while let Some((idx, depth)) = stack.pop() {
            let Some(node) = self.get_node(idx) else {
                continue;
            };
            if lowest.map_or(true, |(_, d)| depth > d) {
                lowest = Some((idx, depth));
            }
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        lowest
    }
}
