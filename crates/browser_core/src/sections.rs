//! The collapsible section tree of one fetched program.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use serde_json::{Map, Value};
use shared::{domain::CREATE_WINDOW_SECTION, protocol::RawSection};

use crate::error::ViewError;

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TreeId(u64);

impl TreeId {
    fn fresh() -> Self {
        Self(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to a section of one particular tree. Handles from an earlier tree
/// (a previous program, or a previous fetch of the same program) never
/// resolve against a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId {
    tree: TreeId,
    index: usize,
}

impl SectionId {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section {} of tree {}", self.index, self.tree.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    section_type: String,
    body: Map<String, Value>,
    open: bool,
}

impl Section {
    pub fn section_type(&self) -> &str {
        &self.section_type
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_create_window(&self) -> bool {
        self.section_type == CREATE_WINDOW_SECTION
    }
}

/// Copy of a section's state for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSnapshot {
    pub id: SectionId,
    pub section_type: String,
    pub body: Map<String, Value>,
    pub open: bool,
    pub primary: bool,
}

/// Sections in fetch order, each closed until toggled. The primary section is
/// held as an index into `sections`, so it shares its open flag with the
/// section it designates.
#[derive(Debug)]
pub struct SectionTree {
    id: TreeId,
    sections: Vec<Section>,
    primary: Option<usize>,
}

impl Default for SectionTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl SectionTree {
    pub fn empty() -> Self {
        Self {
            id: TreeId::fresh(),
            sections: Vec::new(),
            primary: None,
        }
    }

    /// Builds the tree in one pass. With several `CreateWindow` sections the
    /// first one becomes primary.
    pub fn build(raw: impl IntoIterator<Item = RawSection>) -> Self {
        let mut sections = Vec::new();
        let mut primary = None;

        for (index, raw) in raw.into_iter().enumerate() {
            let section = Section {
                section_type: raw.section_type,
                body: raw.body,
                open: false,
            };
            if primary.is_none() && section.is_create_window() {
                primary = Some(index);
            }
            sections.push(section);
        }

        Self {
            id: TreeId::fresh(),
            sections,
            primary,
        }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn id_at(&self, index: usize) -> Option<SectionId> {
        (index < self.sections.len()).then_some(SectionId {
            tree: self.id,
            index,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionId, &Section)> + '_ {
        self.sections.iter().enumerate().map(move |(index, section)| {
            (
                SectionId {
                    tree: self.id,
                    index,
                },
                section,
            )
        })
    }

    pub fn get(&self, id: SectionId) -> Option<&Section> {
        self.resolve(id).map(|index| &self.sections[index])
    }

    pub fn primary_section(&self) -> Option<&Section> {
        self.primary.map(|index| &self.sections[index])
    }

    pub fn primary_section_id(&self) -> Option<SectionId> {
        self.primary.and_then(|index| self.id_at(index))
    }

    /// Flips the open flag of `id` and returns the new value. Exactly one
    /// section changes.
    pub fn toggle(&mut self, id: SectionId) -> Result<bool, ViewError> {
        let index = self
            .resolve(id)
            .ok_or(ViewError::InvalidToggleTarget(id))?;
        let section = &mut self.sections[index];
        section.open = !section.open;
        Ok(section.open)
    }

    pub fn snapshot(&self) -> Vec<SectionSnapshot> {
        self.iter()
            .map(|(id, section)| SectionSnapshot {
                id,
                section_type: section.section_type.clone(),
                body: section.body.clone(),
                open: section.open,
                primary: self.primary == Some(id.index),
            })
            .collect()
    }

    fn resolve(&self, id: SectionId) -> Option<usize> {
        (id.tree == self.id && id.index < self.sections.len()).then_some(id.index)
    }
}

#[cfg(test)]
#[path = "tests/sections_tests.rs"]
mod tests;
