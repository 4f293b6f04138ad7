/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! Error types for semantic analysis and emission.

use fix2c_dictionary::DictionaryError;
use thiserror::Error;

/// Result type alias using [`CodegenError`] as the error type.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors raised while expanding, validating and emitting a parsed
/// specification.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Error while loading the specification.
    #[error("dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// A component reference does not resolve to a component body.
    #[error("unknown component {name} referenced from {path}")]
    UnknownComponent {
        /// Path of the referencing block.
        path: String,
        /// Name of the unresolved component.
        name: String,
    },

    /// A component re-entered itself on the expansion path, or the
    /// nesting depth guard tripped.
    #[error("component cycle suspected while expanding {name}")]
    CycleSuspected {
        /// Name of the component or group being expanded.
        name: String,
    },

    /// A length tag is not immediately followed by its data tag.
    #[error("length tag {length} in {path} is not followed by its data tag (found {found})")]
    LengthDataMismatch {
        /// Path of the block under expansion.
        path: String,
        /// Name of the pending length tag.
        length: String,
        /// Name of the entry actually found.
        found: String,
    },

    /// A data tag appeared without a preceding length tag.
    #[error("data tag {name} in {path} has no preceding length tag")]
    UnexpectedDataTag {
        /// Path of the block under expansion.
        path: String,
        /// Name of the offending data tag.
        name: String,
    },

    /// The fixed header prefix is present but wrong at one position.
    #[error("invalid header at position {position}: found {found}, expected {expected}")]
    InvalidHeader {
        /// Zero-based position within the header.
        position: usize,
        /// Description of the entry actually found.
        found: String,
        /// Description of the entry required there.
        expected: String,
    },

    /// The header has fewer than three leading entries.
    #[error("header is missing the fixed BeginString/BodyLength/MsgType prefix")]
    HeaderTooShort,

    /// The trailer is empty or does not end with CheckSum.
    #[error("trailer is empty or does not end with CheckSum")]
    InvalidTrailer,

    /// Two messages declare the same msgtype string.
    #[error("duplicate msgtype {msg_type:?} declared by message {name}")]
    DuplicateMsgType {
        /// Name of the second message with this msgtype.
        name: String,
        /// The repeated msgtype string.
        msg_type: String,
    },
}
