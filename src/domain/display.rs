use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::GenealogyTree;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for GenealogyTree {
    fn to_tree_string(&self) -> Tree<String> {
        if let Some(root_idx) = self.root() {
            let label = self
                .get_node(root_idx)
                .map(|node| node.data.to_string())
                .unwrap_or_default();
            let mut tree = Tree::new(label);

            fn build_tree(genealogy: &GenealogyTree, node_idx: Index, parent_tree: &mut Tree<String>) {
                if let Some(node) = genealogy.get_node(node_idx) {
                    for &child_idx in &node.children {
                        if let Some(child) = genealogy.get_node(child_idx) {
                            let mut child_tree = Tree::new(child.data.to_string());
                            build_tree(genealogy, child_idx, &mut child_tree);
                            parent_tree.push(child_tree);
                        }
                    }
                }
            }

            build_tree(self, root_idx, &mut tree);
            tree
        } else {
            Tree::new("Empty tree".to_string())
        }
    }
}
