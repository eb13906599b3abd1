//! Arena-based genealogical trees.
//!
//! A `GenealogyTree` stores vampires in a generational arena and answers
//! lineage queries over them: offspring and descendant counts, generations
//! from the original, seniority, closest common ancestor, name lookup and
//! attribute filtering. All traversals are iterative, so query depth is
//! bounded by heap, not call stack.

pub mod domain;
pub mod util;

pub use domain::{
    DomainError, GenealogyBuilder, GenealogyTree, TreeNode, TreeNodeConvert, TreeResult, Vampire,
    VampireRecord,
};
