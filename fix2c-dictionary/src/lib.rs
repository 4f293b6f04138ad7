/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! # fix2c Dictionary
//!
//! FIX specification loading for the fix2c compiler.
//!
//! This crate provides:
//! - **XML loading**: a minimal element tree over the input document
//! - **Tag table**: name-keyed tag catalogue with DATA/LENGTH promotion
//! - **Block reading**: ordered `field`/`component`/`group` sequences
//! - **Dictionary**: components, messages, header and trailer, raw
//!
//! Component references are left unresolved here; expansion and all
//! further semantic analysis live in `fix2c-codegen`.

pub mod error;
pub mod parser;
pub mod schema;
pub mod xml;

pub use error::{DictionaryError, Result};
pub use schema::{
    Block, Dictionary, Entry, FixVersion, MessageDef, RawGroup, TagDef, TagKind, TagTable,
};
