/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! Normalized model of a FIX specification.
//!
//! This module defines the structures the code generator consumes:
//! - [`TagDef`]: a named tag with its wire number and promoted [`TagKind`]
//! - [`Block`]: an ordered sequence of uniquely named [`Entry`] values
//! - [`MessageDef`]: a message with its msgtype string and raw body
//! - [`Dictionary`]: the complete parsed specification
//!
//! Raw blocks keep component references unresolved; expansion happens in
//! the codegen crate.

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// FIX protocol version triple taken from the specification root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixVersion {
    /// Protocol family, e.g. `FIX` or `FIXT`.
    pub protocol: String,
    /// Major version component.
    pub major: String,
    /// Minor version component.
    pub minor: String,
}

impl FixVersion {
    /// Creates a new version triple.
    #[must_use]
    pub fn new(
        protocol: impl Into<String>,
        major: impl Into<String>,
        minor: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            major: major.into(),
            minor: minor.into(),
        }
    }
}

impl fmt::Display for FixVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.protocol, self.major, self.minor)
    }
}

/// Kind of a tag after DATA/LENGTH promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagKind {
    /// Ordinary field carrying an opaque FIX data type token.
    Regular {
        /// Raw type token from the specification (`STRING`, `INT`, ...).
        data_type: String,
    },
    /// Binary payload tag whose byte length travels in a companion tag.
    Data {
        /// Wire number of the companion length tag.
        length_tag: u32,
        /// Name of the companion length tag.
        length_name: String,
    },
    /// The companion length tag of a data tag.
    DataLength {
        /// Name of the data tag this length belongs to.
        data_tag: String,
    },
}

/// A named tag with its wire number and promoted kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDef {
    /// Tag name as declared in the specification.
    pub name: String,
    /// Wire tag number.
    pub number: u32,
    /// Promoted kind.
    pub kind: TagKind,
}

impl TagDef {
    /// Creates a regular (unpromoted) tag definition.
    #[must_use]
    pub fn regular(name: impl Into<String>, number: u32, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number,
            kind: TagKind::Regular {
                data_type: data_type.into(),
            },
        }
    }

    /// Returns the raw data type token, if this tag is still regular.
    #[must_use]
    pub fn data_type(&self) -> Option<&str> {
        match &self.kind {
            TagKind::Regular { data_type } => Some(data_type),
            _ => None,
        }
    }

    /// Returns true if this tag counts repeating group entries.
    #[must_use]
    pub fn is_num_in_group(&self) -> bool {
        self.data_type() == Some("NUMINGROUP")
    }
}

/// One entry of a raw (unexpanded) block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entry {
    /// Snapshot of the referenced tag record.
    Field(TagDef),
    /// Deferred reference to a component body.
    Component(String),
    /// Inline repeating group.
    Group(RawGroup),
}

/// A repeating group as it appears in the XML: its NumInGroup tag name
/// and the raw body repeated per instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGroup {
    /// Name of the NumInGroup tag counting the repetitions.
    pub size_tag: String,
    /// Raw block repeated per group instance.
    pub body: Block,
}

/// Ordered sequence of uniquely named entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// `(local name, entry)` pairs in document order.
    pub entries: Vec<(String, Entry)>,
}

impl Block {
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

/// A message definition: name, msgtype string and raw body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDef {
    /// Message name, e.g. `NewOrderSingle`.
    pub name: String,
    /// Wire msgtype string (tag 35 value), one or more characters.
    pub msg_type: String,
    /// Raw message body.
    pub block: Block,
}

/// Tag table keyed by name, frozen after DATA/LENGTH promotion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagTable {
    tags: IndexMap<String, TagDef>,
}

impl TagTable {
    /// Adds a tag definition, replacing any previous one of the same
    /// name.
    pub fn insert(&mut self, tag: TagDef) {
        self.tags.insert(tag.name.clone(), tag);
    }

    /// Looks up a tag by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TagDef> {
        self.tags.get(name)
    }

    /// Number of tags in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if the table holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates the tag definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TagDef> {
        self.tags.values()
    }

    /// Rewrites the kind of an existing tag; missing names are ignored.
    pub(crate) fn set_kind(&mut self, name: &str, kind: TagKind) {
        if let Some(tag) = self.tags.get_mut(name) {
            tag.kind = kind;
        }
    }
}

/// Complete parsed specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dictionary {
    /// FIX version triple from the root element.
    pub version: FixVersion,
    /// All declared tags, promotion applied.
    pub tags: TagTable,
    /// Component bodies keyed by component name.
    pub components: IndexMap<String, Block>,
    /// Messages keyed by message name.
    pub messages: IndexMap<String, MessageDef>,
    /// Raw header block.
    pub header: Block,
    /// Raw trailer block.
    pub trailer: Block,
}

impl Dictionary {
    /// Parses a FIX XML specification document.
    ///
    /// # Errors
    /// Returns a [`crate::DictionaryError`] describing the first
    /// problem found in the document.
    pub fn parse(xml: &str) -> Result<Self> {
        crate::parser::parse_dictionary(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_display() {
        assert_eq!(FixVersion::new("FIX", "4", "4").to_string(), "FIX.4.4");
        assert_eq!(FixVersion::new("FIXT", "1", "1").to_string(), "FIXT.1.1");
    }

    #[test]
    fn test_tag_def_regular() {
        let tag = TagDef::regular("Account", 1, "STRING");
        assert_eq!(tag.data_type(), Some("STRING"));
        assert!(!tag.is_num_in_group());
    }

    #[test]
    fn test_tag_def_num_in_group() {
        let tag = TagDef::regular("NoRoutingIDs", 215, "NUMINGROUP");
        assert!(tag.is_num_in_group());
    }

    #[test]
    fn test_data_tag_has_no_data_type() {
        let tag = TagDef {
            name: "RawData".to_string(),
            number: 96,
            kind: TagKind::Data {
                length_tag: 95,
                length_name: "RawDataLength".to_string(),
            },
        };
        assert_eq!(tag.data_type(), None);
    }

    #[test]
    fn test_tag_table_operations() {
        let mut table = TagTable::default();
        table.insert(TagDef::regular("Account", 1, "STRING"));
        table.insert(TagDef::regular("ClOrdID", 11, "STRING"));

        assert_eq!(table.len(), 2);
        assert!(table.get("Account").is_some());
        assert!(table.get("Price").is_none());

        table.set_kind(
            "Account",
            TagKind::DataLength {
                data_tag: "X".to_string(),
            },
        );
        assert!(matches!(
            table.get("Account").map(|t| &t.kind),
            Some(TagKind::DataLength { .. })
        ));
    }
}
