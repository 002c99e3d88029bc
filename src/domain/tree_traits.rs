use std::fmt;

use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::OrgTree;

pub trait OrgTreeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl OrgTreeConvert for OrgTree {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(tree: &OrgTree, node_idx: Index) -> Tree<String> {
            match tree.get_node(node_idx) {
                Some(node) => Tree::new(node.employee.to_string()).with_leaves(
                    node.children
                        .iter()
                        .map(|&child| build_tree(tree, child)),
                ),
                None => Tree::new(format!("<missing {node_idx:?}>")),
            }
        }

        build_tree(self, self.root())
    }
}

impl fmt::Display for OrgTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tree_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Employee;

    #[test]
    fn given_small_tree_when_rendering_then_shows_titles_and_nesting() {
        let mut tree = OrgTree::new(Employee::new("Sarah", "CEO", "", None));
        tree.hire(Employee::new("Bill", "VP", "", None), "Sarah")
            .unwrap();
        tree.hire(Employee::new("Jared", "", "", None), "Bill")
            .unwrap();

        let rendered = tree.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Sarah (CEO)");
        assert!(lines[1].ends_with("Bill (VP)"));
        assert!(lines[2].ends_with("Jared"));
        assert_eq!(lines.len(), 3);
    }
}
