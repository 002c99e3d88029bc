use std::collections::HashSet;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::Employee;
use crate::domain::error::{DomainError, TreeResult};

/// Tree node in the arena-based hierarchy.
///
/// There is no parent link: a node's boss is whichever node lists it in
/// `children`, found by walking down from the root.
#[derive(Debug, Clone)]
pub struct OrgNode {
    pub employee: Employee,
    /// Direct subordinates, in hiring order
    pub children: Vec<Index>,
}

/// Arena-based organizational hierarchy.
///
/// Node handles are generational arena indices, so a handle to a fired
/// employee never resolves to someone hired later into the same slot.
/// Every node stored in the arena is reachable from `root`.
#[derive(Debug, Clone)]
pub struct OrgTree {
    arena: Arena<OrgNode>,
    root: Index,
}

impl OrgTree {
    /// Create a hierarchy consisting only of its top employee.
    pub fn new(root: Employee) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(OrgNode {
            employee: root,
            children: Vec::new(),
        });
        Self { arena, root }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&OrgNode> {
        self.arena.get(idx)
    }

    pub fn employee(&self, idx: Index) -> Option<&Employee> {
        self.arena.get(idx).map(|node| &node.employee)
    }

    /// Name of the employee behind a handle, empty if the handle is stale.
    pub fn name(&self, idx: Index) -> &str {
        self.employee(idx).map_or("", |e| e.name.as_str())
    }

    /// Number of employees in the hierarchy.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Depth-first, pre-order traversal starting at the root.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Names of all employees, in traversal order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|(_, node)| node.employee.name.as_str()).collect()
    }

    /// Number of levels in the hierarchy (a lone root has depth 1).
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.lowest_employee().map_or(0, |(_, d)| d + 1)
    }

    /// Collects the names of all employees without subordinates.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_names(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.employee.name.clone())
            .collect()
    }

    /// Verify the structural invariants of the hierarchy.
    ///
    /// Checks that every node is reached exactly once from the root, that
    /// all child handles are live, that names are unique and that no node
    /// is left unreachable.
    #[instrument(level = "debug", skip(self))]
    pub fn check_invariants(&self) -> TreeResult<()> {
        let mut visited: HashSet<Index> = HashSet::new();
        let mut names: HashSet<&str> = HashSet::new();
        let mut stack = vec![self.root];

        while let Some(idx) = stack.pop() {
            let node = self
                .get_node(idx)
                .ok_or_else(|| DomainError::Corrupted(format!("dangling node handle {idx:?}")))?;
            if !visited.insert(idx) {
                return Err(DomainError::Corrupted(format!(
                    "{} is reachable more than once",
                    node.employee.name
                )));
            }
            if !names.insert(node.employee.name.as_str()) {
                return Err(DomainError::Corrupted(format!(
                    "duplicate employee name {}",
                    node.employee.name
                )));
            }
            stack.extend(node.children.iter().rev().copied());
        }

        if visited.len() != self.arena.len() {
            return Err(DomainError::Corrupted(format!(
                "{} employee(s) unreachable from {}",
                self.arena.len() - visited.len(),
                self.name(self.root)
            )));
        }
        Ok(())
    }

    pub(crate) fn node_mut(&mut self, idx: Index) -> TreeResult<&mut OrgNode> {
        self.arena
            .get_mut(idx)
            .ok_or_else(|| DomainError::Corrupted(format!("dangling node handle {idx:?}")))
    }

    pub(crate) fn node_ref(&self, idx: Index) -> TreeResult<&OrgNode> {
        self.get_node(idx)
            .ok_or_else(|| DomainError::Corrupted(format!("dangling node handle {idx:?}")))
    }

    /// Store a new, unlinked node. The caller must attach it.
    pub(crate) fn create_node(&mut self, employee: Employee) -> Index {
        self.arena.insert(OrgNode {
            employee,
            children: Vec::new(),
        })
    }

    /// Drop a node that has already been unlinked from its boss.
    pub(crate) fn destroy_node(&mut self, idx: Index) -> TreeResult<OrgNode> {
        self.arena
            .remove(idx)
            .ok_or_else(|| DomainError::Corrupted(format!("dangling node handle {idx:?}")))
    }

    pub(crate) fn set_root(&mut self, idx: Index) {
        self.root = idx;
    }
}

pub struct TreeIterator<'a> {
    tree: &'a OrgTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a OrgTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a OrgNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
