//! Tree builder for assembling a genealogy from flat lineage records.

use std::collections::{HashMap, HashSet};

use tracing::instrument;

use crate::domain::arena::{GenealogyTree, Vampire};
use crate::domain::error::{DomainError, TreeResult};

/// One flat lineage record: a vampire and the name of its progenitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VampireRecord {
    pub name: String,
    pub year_converted: i32,
    /// Name of the converting ancestor, None for the root record
    pub progenitor: Option<String>,
}

/// Constructs a well-formed [`GenealogyTree`] from name-keyed records.
///
/// The record format references progenitors by name, so the builder
/// requires names to be unique and exactly one record without a
/// progenitor. Records that never become reachable from the root form a
/// cycle among themselves and are rejected.
#[derive(Debug, Default)]
pub struct GenealogyBuilder {
    records: Vec<VampireRecord>,
}

impl GenealogyBuilder {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Adds the root record (no progenitor).
    pub fn record(mut self, name: impl Into<String>, year_converted: i32) -> Self {
        self.records.push(VampireRecord {
            name: name.into(),
            year_converted,
            progenitor: None,
        });
        self
    }

    /// Adds a record converted by `progenitor`.
    pub fn record_with_progenitor(
        mut self,
        name: impl Into<String>,
        year_converted: i32,
        progenitor: impl Into<String>,
    ) -> Self {
        self.records.push(VampireRecord {
            name: name.into(),
            year_converted,
            progenitor: Some(progenitor.into()),
        });
        self
    }

    #[instrument(level = "debug", skip(self))]
    pub fn build(self) -> TreeResult<GenealogyTree> {
        let mut names = HashSet::new();
        for record in &self.records {
            if !names.insert(record.name.as_str()) {
                return Err(DomainError::DuplicateName(record.name.clone()));
            }
        }

        // progenitor name -> offspring records, preserving record order
        let mut offspring_of: HashMap<&str, Vec<&VampireRecord>> = HashMap::new();
        let mut roots = Vec::new();
        for record in &self.records {
            match &record.progenitor {
                Some(progenitor) => {
                    if !names.contains(progenitor.as_str()) {
                        return Err(DomainError::UnknownProgenitor {
                            name: record.name.clone(),
                            progenitor: progenitor.clone(),
                        });
                    }
                    offspring_of
                        .entry(progenitor.as_str())
                        .or_default()
                        .push(record);
                }
                None => roots.push(record),
            }
        }

        let root = match roots.as_slice() {
            [] if self.records.is_empty() => return Ok(GenealogyTree::new()),
            [] => return Err(DomainError::NoRoot),
            [root] => *root,
            _ => {
                return Err(DomainError::MultipleRoots(
                    roots.iter().map(|r| r.name.clone()).collect(),
                ))
            }
        };

        let mut tree = GenealogyTree::new();
        let mut visited = HashSet::new();
        let root_idx = tree.insert_node(Vampire::new(root.name.clone(), root.year_converted), None)?;
        visited.insert(root.name.as_str());

        let mut stack = vec![(root.name.as_str(), root_idx)];
        while let Some((current_name, current_idx)) = stack.pop() {
            if let Some(children) = offspring_of.get(current_name) {
                for child in children {
                    let child_idx = tree.insert_node(
                        Vampire::new(child.name.clone(), child.year_converted),
                        Some(current_idx),
                    )?;
                    visited.insert(child.name.as_str());
                    stack.push((child.name.as_str(), child_idx));
                }
            }
        }

        // Records never reached from the root can only reference each other
        // in a cycle, since each names exactly one progenitor.
        if visited.len() != self.records.len() {
            let unreached = self
                .records
                .iter()
                .find(|r| !visited.contains(r.name.as_str()))
                .map(|r| r.name.clone())
                .unwrap_or_default();
            return Err(DomainError::CycleDetected(unreached));
        }

        Ok(tree)
    }
}
