/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! Block expansion.
//!
//! Walks the raw header, trailer and message blocks and produces fully
//! resolved blocks: components spliced in place, repeating groups
//! expanded once under their canonical name, and DATA/LENGTH pairs
//! folded into single data entries.
//!
//! A length tag is consumed by the data tag immediately following it
//! and never appears in the resolved block. The one exception is a
//! length tag dangling at the very end of a block: it is kept as an
//! ordinary entry, matching the historical behavior of the table
//! format.

use crate::error::{CodegenError, Result};
use fix2c_dictionary::schema::{Block, Entry, TagDef, TagKind};
use indexmap::IndexMap;

/// Nesting depth at which expansion gives up and reports a cycle.
pub const MAX_EXPANSION_DEPTH: usize = 10;

/// One entry of a fully resolved block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedEntry {
    /// A concrete tag: regular, data (length folded in), or a stray
    /// length left dangling at the end of its block.
    Tag(TagDef),
    /// Reference to an expanded repeating group.
    Group {
        /// NumInGroup tag counting the repetitions.
        size_tag: String,
        /// Canonical (scope-qualified) group name.
        name: String,
    },
}

/// Ordered sequence of resolved entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedBlock {
    /// Entries in wire order.
    pub entries: Vec<ResolvedEntry>,
}

impl ResolvedBlock {
    /// Number of entries in the block.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the block has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical group name: the enclosing group/message names joined by
/// `_`, then the size tag. Header and trailer expand under the empty
/// path, so their groups keep bare size-tag names. Components never
/// contribute a path segment.
#[must_use]
pub fn canonical_name(path: &[String], size_tag: &str) -> String {
    if path.is_empty() {
        size_tag.to_string()
    } else {
        format!("{}_{}", path.join("_"), size_tag)
    }
}

/// Expands components and groups across header, trailer and messages.
///
/// Expanded groups accumulate in insertion order; a nested group is
/// always memoized before the group that encloses it.
#[derive(Debug)]
pub struct Expander<'a> {
    components: &'a IndexMap<String, Block>,
    groups: IndexMap<String, ResolvedBlock>,
    component_stack: Vec<String>,
}

impl<'a> Expander<'a> {
    /// Creates an expander over the given component table.
    #[must_use]
    pub fn new(components: &'a IndexMap<String, Block>) -> Self {
        Self {
            components,
            groups: IndexMap::new(),
            component_stack: Vec::new(),
        }
    }

    /// Expands one top-level block under the given scope path.
    pub fn expand(&mut self, block: &Block, path: &[String]) -> Result<ResolvedBlock> {
        self.expand_block(block, path, 0)
    }

    /// Consumes the expander and returns the accumulated group map.
    #[must_use]
    pub fn into_groups(self) -> IndexMap<String, ResolvedBlock> {
        self.groups
    }

    fn expand_block(&mut self, block: &Block, path: &[String], depth: usize) -> Result<ResolvedBlock> {
        if depth > MAX_EXPANSION_DEPTH {
            return Err(CodegenError::CycleSuspected {
                name: self.cycle_name(path),
            });
        }

        let mut resolved = ResolvedBlock::default();
        let mut pending: Option<&TagDef> = None;

        for (name, entry) in &block.entries {
            match entry {
                Entry::Field(tag) => match &tag.kind {
                    TagKind::Regular { .. } => {
                        check_no_pending(&pending, path, name)?;
                        resolved.entries.push(ResolvedEntry::Tag(tag.clone()));
                    }
                    TagKind::DataLength { .. } => {
                        check_no_pending(&pending, path, name)?;
                        pending = Some(tag);
                    }
                    TagKind::Data { length_name, .. } => match pending.take() {
                        None => {
                            return Err(CodegenError::UnexpectedDataTag {
                                path: render_path(path),
                                name: name.clone(),
                            });
                        }
                        Some(length) if length.name == *length_name => {
                            resolved.entries.push(ResolvedEntry::Tag(tag.clone()));
                        }
                        Some(length) => {
                            return Err(CodegenError::LengthDataMismatch {
                                path: render_path(path),
                                length: length.name.clone(),
                                found: name.clone(),
                            });
                        }
                    },
                },
                Entry::Component(component) => {
                    check_no_pending(&pending, path, component)?;
                    let components: &'a IndexMap<String, Block> = self.components;
                    let Some(body) = components.get(component) else {
                        return Err(CodegenError::UnknownComponent {
                            path: render_path(path),
                            name: component.clone(),
                        });
                    };
                    if self.component_stack.iter().any(|seen| seen == component) {
                        return Err(CodegenError::CycleSuspected {
                            name: component.clone(),
                        });
                    }
                    self.component_stack.push(component.clone());
                    let inner = self.expand_block(body, path, depth + 1)?;
                    self.component_stack.pop();
                    resolved.entries.extend(inner.entries);
                }
                Entry::Group(group) => {
                    check_no_pending(&pending, path, name)?;
                    let canonical = canonical_name(path, &group.size_tag);
                    if !self.groups.contains_key(&canonical) {
                        let mut sub_path = path.to_vec();
                        sub_path.push(group.size_tag.clone());
                        let body = self.expand_block(&group.body, &sub_path, depth + 1)?;
                        self.groups.insert(canonical.clone(), body);
                    }
                    resolved.entries.push(ResolvedEntry::Group {
                        size_tag: group.size_tag.clone(),
                        name: canonical,
                    });
                }
            }
        }

        if let Some(length) = pending {
            // Dangling length at block end: kept as an ordinary tag.
            resolved.entries.push(ResolvedEntry::Tag(length.clone()));
        }

        Ok(resolved)
    }

    fn cycle_name(&self, path: &[String]) -> String {
        self.component_stack
            .last()
            .or_else(|| path.last())
            .cloned()
            .unwrap_or_default()
    }
}

fn check_no_pending(pending: &Option<&TagDef>, path: &[String], next: &str) -> Result<()> {
    if let Some(length) = pending {
        return Err(CodegenError::LengthDataMismatch {
            path: render_path(path),
            length: length.name.clone(),
            found: next.to_string(),
        });
    }
    Ok(())
}

fn render_path(path: &[String]) -> String {
    path.join("/")
}
