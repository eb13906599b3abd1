//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod display;
pub mod error;

pub use arena::{AncestorIterator, GenealogyTree, TreeIterator, TreeNode, Vampire};
pub use builder::{GenealogyBuilder, VampireRecord};
pub use display::TreeNodeConvert;
pub use error::{DomainError, TreeResult};
