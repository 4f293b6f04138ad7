/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! C table and enum emitters.
//!
//! Every block (group, message, or the shared common block) emits a
//! tag-info array listing its entries in wire order, followed by a
//! group-info block describing the nested groups it references. The
//! macros themselves are defined by the `fix.h` runtime; this module
//! only arranges their invocations.

use crate::expand::{ResolvedBlock, ResolvedEntry};
use fix2c_dictionary::schema::{FixVersion, MessageDef, TagDef, TagKind};
use indexmap::IndexMap;
use std::fmt::Write;

/// Selects the group-table or message-table macro family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Repeating group (and common block) tables.
    Group,
    /// Per-message tables.
    Message,
}

impl TableKind {
    fn reg(self) -> &'static str {
        match self {
            Self::Group => "REG_TAG_INFO",
            Self::Message => "REG_MSG_TAG_INFO",
        }
    }

    fn bin(self) -> &'static str {
        match self {
            Self::Group => "BIN_TAG_INFO",
            Self::Message => "BIN_MSG_TAG_INFO",
        }
    }

    fn grp(self) -> &'static str {
        match self {
            Self::Group => "GRP_TAG_INFO",
            Self::Message => "GRP_MSG_TAG_INFO",
        }
    }

    fn group_info_func(self) -> &'static str {
        match self {
            Self::Group => "GROUP_INFO_FUNC",
            Self::Message => "MSG_GROUP_INFO_FUNC",
        }
    }

    fn group_info(self) -> &'static str {
        match self {
            Self::Group => "GROUP_INFO",
            Self::Message => "MSG_GROUP_INFO",
        }
    }

    fn empty_group_info(self) -> &'static str {
        match self {
            Self::Group => "EMPTY_GROUP_INFO",
            Self::Message => "EMPTY_MSG_GROUP_INFO",
        }
    }
}

/// Emits the closed tag enum, sorted lexicographically by tag name.
#[must_use]
pub fn tag_enum(tags: &IndexMap<String, TagDef>) -> String {
    let mut names: Vec<&String> = tags.keys().collect();
    names.sort();

    let lines: Vec<String> = names
        .iter()
        .filter_map(|name| {
            tags.get(*name)
                .map(|tag| format!("    {} = {}", tag.name, tag.number))
        })
        .collect();

    format!("enum {{\n{}\n}};\n", lines.join(",\n"))
}

/// Emits the message-type enum, sorted lexicographically by message
/// name, each entry annotated with its msgtype string.
#[must_use]
pub fn msg_type_enum(messages: &IndexMap<String, MessageDef>) -> String {
    let mut names: Vec<&String> = messages.keys().collect();
    names.sort();

    let lines: Vec<String> = names
        .iter()
        .filter_map(|name| {
            messages
                .get(*name)
                .map(|message| format!("    MSG_{} /* \"{}\" */", message.name, message.msg_type))
        })
        .collect();

    format!("enum {{\n{}\n}};\n", lines.join(",\n"))
}

/// Emits the tag-info array for one block. `offset` shifts the entry
/// indices; message blocks are numbered after the common block.
#[must_use]
pub fn tag_info(name: &str, block: &ResolvedBlock, offset: usize, kind: TableKind) -> String {
    let lines: Vec<String> = block
        .entries
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            let index = position + offset;
            match entry {
                ResolvedEntry::Tag(tag) => match &tag.kind {
                    TagKind::Data { length_tag, .. } => {
                        format!("    {}({}, {}, {})", kind.bin(), tag.name, length_tag, index)
                    }
                    _ => format!("    {}({}, {})", kind.reg(), tag.name, index),
                },
                ResolvedEntry::Group { size_tag, .. } => {
                    format!("    {}({}, {})", kind.grp(), size_tag, index)
                }
            }
        })
        .collect();

    format!(
        "static const fix_tag_info {name}_tag_info[] = {{\n{}\n}};\n",
        lines.join(",\n")
    )
}

/// The stable wire-order anchor of a block: the first tag number a
/// parser will meet. For a data entry that is the folded length tag's
/// number; for a group it is the size tag.
#[must_use]
pub fn first_tag(block: &ResolvedBlock) -> String {
    match block.entries.first() {
        Some(ResolvedEntry::Tag(tag)) => match &tag.kind {
            TagKind::Data { length_tag, .. } => length_tag.to_string(),
            _ => tag.name.clone(),
        },
        Some(ResolvedEntry::Group { size_tag, .. }) => size_tag.clone(),
        None => String::new(),
    }
}

fn nested_groups(block: &ResolvedBlock) -> Vec<&str> {
    block
        .entries
        .iter()
        .filter_map(|entry| match entry {
            ResolvedEntry::Group { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect()
}

fn group_info_func(name: &str, nested: &[&str], kind: TableKind) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}({name})", kind.group_info_func());
    out.push_str("{\n");
    for group in nested {
        let _ = writeln!(out, "    {}({group});", kind.group_info());
    }
    out.push_str("}\n");
    out
}

/// Emits the group-info block: a lookup body over the nested groups,
/// or the empty form parameterized by block length and first tag.
#[must_use]
pub fn group_info(name: &str, block: &ResolvedBlock, kind: TableKind) -> String {
    let nested = nested_groups(block);
    if nested.is_empty() {
        format!(
            "{}({name}, {}, {});\n",
            kind.empty_group_info(),
            block.len(),
            first_tag(block)
        )
    } else {
        group_info_func(name, &nested, kind)
    }
}

/// Emits the common block tables. With no nested groups the group-info
/// function aliases the runtime's empty implementation; a fully empty
/// common block aliases the tag array as well.
#[must_use]
pub fn common_tables(common: &ResolvedBlock) -> String {
    let mut out = String::new();

    if common.is_empty() {
        out.push_str("#define common_tag_info empty_tag_info\n");
        out.push_str("#define common_group_info_func empty_group_info_func\n");
        return out;
    }

    out.push_str(&tag_info("common", common, 0, TableKind::Group));
    out.push('\n');

    let nested = nested_groups(common);
    if nested.is_empty() {
        out.push_str("#define common_group_info_func empty_group_info_func\n");
    } else {
        out.push_str(&group_info_func("common", &nested, TableKind::Group));
    }
    out
}

/// Emits the generated header file: banner, enums and the parser
/// constructor declaration.
#[must_use]
pub fn header_file(
    base_name: &str,
    prefix: &str,
    version: &FixVersion,
    tags: &IndexMap<String, TagDef>,
    messages: &IndexMap<String, MessageDef>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "/*\n * FIX tag and message type definitions for {base_name} ({version}).\n *\n\
         \x20* Generated by fix2c. Do not edit by hand; regenerate from the XML\n\
         \x20* specification instead.\n */"
    );
    out.push('\n');
    out.push_str("#pragma once\n\n");
    out.push_str("#include \"fix.h\"\n\n");
    out.push_str("#ifdef __cplusplus\nextern \"C\" {\n#endif\n\n");
    out.push_str(&tag_enum(tags));
    out.push('\n');
    out.push_str(&msg_type_enum(messages));
    out.push('\n');
    let _ = writeln!(out, "fix_parser* create_{prefix}_parser();");
    out.push('\n');
    out.push_str("#ifdef __cplusplus\n}\n#endif\n");

    out
}
