/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! Error types for FIX specification parsing.
//!
//! Every error here is fatal: the compiler makes a single pass over the
//! input and aborts on the first problem it finds. Paths in messages are
//! `/`-joined element paths, e.g. `News/NoLinesOfText`.

use thiserror::Error;

/// Result type alias using [`DictionaryError`] as the error type.
pub type Result<T> = std::result::Result<T, DictionaryError>;

/// Errors raised while loading and normalizing a FIX XML specification.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// Malformed XML in the input document.
    #[error("xml parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Non-UTF-8 content in an element name or attribute.
    #[error("invalid utf-8 in specification: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The document contains no complete root element.
    #[error("specification contains no root element")]
    MissingRoot,

    /// The root element is not `fix`.
    #[error("root element is {found}, expected fix")]
    BadRoot {
        /// Name of the element actually found at the root.
        found: String,
    },

    /// The `fix` root lacks one of `type`, `major`, `minor`.
    #[error("root element is missing attribute {attr}")]
    MissingRootAttr {
        /// Name of the missing attribute.
        attr: &'static str,
    },

    /// An element lacks a required attribute.
    #[error("element {element} is missing attribute {attr}")]
    MissingAttr {
        /// Name of the offending element.
        element: String,
        /// Name of the missing attribute.
        attr: &'static str,
    },

    /// A field's `number` attribute is not an integer.
    #[error("invalid tag number {value:?} for field {name}")]
    InvalidTagNumber {
        /// Name of the field definition.
        name: String,
        /// The raw attribute value.
        value: String,
    },

    /// The specification defines no fields at all.
    #[error("specification defines no fields")]
    NoFields,

    /// A DATA field has no `...Len`/`...Length` companion of type LENGTH.
    #[error("data field {name} has no matching length field")]
    MissingLengthTag {
        /// Name of the DATA field.
        name: String,
    },

    /// A block child references a name missing from the tag table.
    #[error("unknown name {name} referenced from {path}")]
    UnknownNode {
        /// Path of the enclosing block.
        path: String,
        /// The unresolved name.
        name: String,
    },

    /// A group's size tag exists but is not of type NUMINGROUP.
    #[error("group tag {name} in {path} is not NUMINGROUP")]
    NotNumInGroup {
        /// Path of the enclosing block.
        path: String,
        /// Name of the offending size tag.
        name: String,
    },

    /// Two entries share a local name within one block.
    #[error("duplicate entry {name} in {path}")]
    DuplicateTag {
        /// Path of the enclosing block.
        path: String,
        /// The repeated local name.
        name: String,
    },

    /// A block (or a required section) contains no entries.
    #[error("block {path} contains no entries")]
    EmptyBlock {
        /// Path of the empty block.
        path: String,
    },

    /// A message declares an empty msgtype string.
    #[error("message {name} declares an empty msgtype")]
    EmptyMsgType {
        /// Name of the offending message.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_tag_display() {
        let err = DictionaryError::DuplicateTag {
            path: "News/NoLinesOfText".to_string(),
            name: "Text".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate entry Text in News/NoLinesOfText");
    }

    #[test]
    fn test_invalid_tag_number_display() {
        let err = DictionaryError::InvalidTagNumber {
            name: "Account".to_string(),
            value: "x1".to_string(),
        };
        assert_eq!(err.to_string(), "invalid tag number \"x1\" for field Account");
    }

    #[test]
    fn test_missing_root_attr_display() {
        let err = DictionaryError::MissingRootAttr { attr: "major" };
        assert_eq!(err.to_string(), "root element is missing attribute major");
    }
}
