/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! Reachability pruning and group ordering.
//!
//! Only tags and groups actually reachable from the emitted blocks make
//! it into the output. Groups are collected post-order, so every group
//! lands after all groups nested inside it and the tables can be
//! emitted in one pass without forward references.

use crate::expand::{ResolvedBlock, ResolvedEntry};
use fix2c_dictionary::schema::{TagDef, TagKind, TagTable};
use indexmap::IndexMap;

/// Tags and groups reachable from the emitted blocks.
#[derive(Debug, Default)]
pub struct Pruned {
    /// Reachable tags keyed by name, in first-visit order.
    pub tags: IndexMap<String, TagDef>,
    /// Reachable groups in dependency order: nested before enclosing.
    pub groups: IndexMap<String, ResolvedBlock>,
}

/// Collects the tags and groups reachable from the given blocks.
///
/// A data entry also pulls in its folded length tag: the length never
/// appears as a block entry, but its symbol still belongs in the tag
/// enum.
#[must_use]
pub fn prune(
    blocks: &[&ResolvedBlock],
    all_groups: &IndexMap<String, ResolvedBlock>,
    table: &TagTable,
) -> Pruned {
    let mut pruned = Pruned::default();
    for block in blocks {
        visit(block, all_groups, table, &mut pruned);
    }
    pruned
}

fn visit(
    block: &ResolvedBlock,
    all_groups: &IndexMap<String, ResolvedBlock>,
    table: &TagTable,
    out: &mut Pruned,
) {
    for entry in &block.entries {
        match entry {
            ResolvedEntry::Tag(tag) => {
                if let TagKind::Data { length_name, .. } = &tag.kind
                    && let Some(length) = table.get(length_name)
                {
                    insert_tag(out, length.clone());
                }
                insert_tag(out, tag.clone());
            }
            ResolvedEntry::Group { size_tag, name } => {
                if let Some(tag) = table.get(size_tag) {
                    insert_tag(out, tag.clone());
                }
                if !out.groups.contains_key(name)
                    && let Some(body) = all_groups.get(name)
                {
                    visit(body, all_groups, table, out);
                    out.groups.insert(name.clone(), body.clone());
                }
            }
        }
    }
}

fn insert_tag(out: &mut Pruned, tag: TagDef) {
    out.tags.entry(tag.name.clone()).or_insert(tag);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regular(name: &str, number: u32) -> TagDef {
        TagDef::regular(name, number, "STRING")
    }

    fn table(tags: Vec<TagDef>) -> TagTable {
        let mut table = TagTable::default();
        for tag in tags {
            table.insert(tag);
        }
        table
    }

    #[test]
    fn test_prune_collects_reachable_tags_only() {
        let table = table(vec![
            regular("Account", 1),
            regular("ClOrdID", 11),
            regular("Unused", 999),
        ]);
        let block = ResolvedBlock {
            entries: vec![
                ResolvedEntry::Tag(regular("Account", 1)),
                ResolvedEntry::Tag(regular("ClOrdID", 11)),
            ],
        };
        let groups = IndexMap::new();

        let pruned = prune(&[&block], &groups, &table);
        assert_eq!(pruned.tags.len(), 2);
        assert!(pruned.tags.contains_key("Account"));
        assert!(!pruned.tags.contains_key("Unused"));
    }

    #[test]
    fn test_prune_pulls_in_folded_length_tag() {
        let data = TagDef {
            name: "RawData".to_string(),
            number: 96,
            kind: TagKind::Data {
                length_tag: 95,
                length_name: "RawDataLength".to_string(),
            },
        };
        let length = TagDef {
            name: "RawDataLength".to_string(),
            number: 95,
            kind: TagKind::DataLength {
                data_tag: "RawData".to_string(),
            },
        };
        let table = table(vec![data.clone(), length]);

        let block = ResolvedBlock {
            entries: vec![ResolvedEntry::Tag(data)],
        };
        let groups = IndexMap::new();

        let pruned = prune(&[&block], &groups, &table);
        assert!(pruned.tags.contains_key("RawData"));
        assert!(pruned.tags.contains_key("RawDataLength"));
    }

    #[test]
    fn test_prune_orders_groups_post_order() {
        let table = table(vec![
            TagDef::regular("NoOuter", 100, "NUMINGROUP"),
            TagDef::regular("NoInner", 101, "NUMINGROUP"),
            regular("Symbol", 55),
        ]);

        let inner = ResolvedBlock {
            entries: vec![ResolvedEntry::Tag(regular("Symbol", 55))],
        };
        let outer = ResolvedBlock {
            entries: vec![ResolvedEntry::Group {
                size_tag: "NoInner".to_string(),
                name: "M_NoOuter_NoInner".to_string(),
            }],
        };
        let mut groups = IndexMap::new();
        // Memoization order already has inner first; the pruner must
        // not depend on it, so register outer first here.
        groups.insert("M_NoOuter".to_string(), outer);
        groups.insert("M_NoOuter_NoInner".to_string(), inner);

        let message = ResolvedBlock {
            entries: vec![ResolvedEntry::Group {
                size_tag: "NoOuter".to_string(),
                name: "M_NoOuter".to_string(),
            }],
        };

        let pruned = prune(&[&message], &groups, &table);
        let names: Vec<&String> = pruned.groups.keys().collect();
        assert_eq!(names, ["M_NoOuter_NoInner", "M_NoOuter"]);

        assert!(pruned.tags.contains_key("NoOuter"));
        assert!(pruned.tags.contains_key("NoInner"));
        assert!(pruned.tags.contains_key("Symbol"));
    }

    #[test]
    fn test_prune_deduplicates_shared_groups() {
        let table = table(vec![
            TagDef::regular("NoHops", 627, "NUMINGROUP"),
            regular("HopCompID", 628),
        ]);
        let body = ResolvedBlock {
            entries: vec![ResolvedEntry::Tag(regular("HopCompID", 628))],
        };
        let mut groups = IndexMap::new();
        groups.insert("NoHops".to_string(), body);

        let reference = ResolvedEntry::Group {
            size_tag: "NoHops".to_string(),
            name: "NoHops".to_string(),
        };
        let a = ResolvedBlock {
            entries: vec![reference.clone()],
        };
        let b = ResolvedBlock {
            entries: vec![reference],
        };

        let pruned = prune(&[&a, &b], &groups, &table);
        assert_eq!(pruned.groups.len(), 1);
    }
}
