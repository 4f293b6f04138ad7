/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! Common block construction.
//!
//! The runtime framing layer owns `BeginString`, `BodyLength`,
//! `MsgType` and `CheckSum`, so the generated tables must not describe
//! them. This module verifies the expanded header starts with exactly
//! that prefix and the expanded trailer ends with CheckSum, strips
//! both, and concatenates what remains into the block shared by every
//! message.

use crate::error::{CodegenError, Result};
use crate::expand::{ResolvedBlock, ResolvedEntry};
use fix2c_dictionary::schema::TagKind;

/// Fixed leading header fields, in order: name, number, data type.
const HEADER_PREFIX: [(&str, u32, &str); 3] = [
    ("BeginString", 8, "STRING"),
    ("BodyLength", 9, "LENGTH"),
    ("MsgType", 35, "STRING"),
];

/// Fixed trailing trailer field.
const TRAILER_SUFFIX: (&str, u32, &str) = ("CheckSum", 10, "STRING");

/// Validates the fixed framing fields, strips them, and returns the
/// concatenation of the remaining header and trailer entries.
pub fn build_common(header: &ResolvedBlock, trailer: &ResolvedBlock) -> Result<ResolvedBlock> {
    if header.len() < HEADER_PREFIX.len() {
        return Err(CodegenError::HeaderTooShort);
    }
    for (position, (name, number, data_type)) in HEADER_PREFIX.iter().enumerate() {
        let entry = &header.entries[position];
        if !entry_matches(entry, name, *number, data_type) {
            return Err(CodegenError::InvalidHeader {
                position,
                found: describe(entry),
                expected: format!("{name}({number}, {data_type})"),
            });
        }
    }

    let (name, number, data_type) = TRAILER_SUFFIX;
    let trailer_ok = trailer
        .entries
        .last()
        .is_some_and(|entry| entry_matches(entry, name, number, data_type));
    if !trailer_ok {
        return Err(CodegenError::InvalidTrailer);
    }

    let mut common = ResolvedBlock::default();
    common
        .entries
        .extend(header.entries[HEADER_PREFIX.len()..].iter().cloned());
    common
        .entries
        .extend(trailer.entries[..trailer.len() - 1].iter().cloned());
    Ok(common)
}

/// An entry matches when it is a regular tag with exactly this name,
/// number and data type.
fn entry_matches(entry: &ResolvedEntry, name: &str, number: u32, data_type: &str) -> bool {
    match entry {
        ResolvedEntry::Tag(tag) => {
            tag.name == name
                && tag.number == number
                && matches!(&tag.kind, TagKind::Regular { data_type: dt } if dt == data_type)
        }
        ResolvedEntry::Group { .. } => false,
    }
}

fn describe(entry: &ResolvedEntry) -> String {
    match entry {
        ResolvedEntry::Tag(tag) => format!("{}({})", tag.name, tag.number),
        ResolvedEntry::Group { size_tag, .. } => format!("group {size_tag}"),
    }
}
