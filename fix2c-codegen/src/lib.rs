/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! # fix2c Codegen
//!
//! Semantic analysis and C emission for the fix2c compiler.
//!
//! This crate takes a parsed [`Dictionary`](fix2c_dictionary::Dictionary)
//! and produces the two C artifacts consumed together with the `fix.h`
//! runtime:
//! - **Expansion**: components inlined, groups expanded once under
//!   canonical names, DATA/LENGTH pairs folded
//! - **Common block**: header prefix and trailer CheckSum validated and
//!   stripped, the remainders concatenated
//! - **Pruning**: only reachable tags and groups are emitted, groups in
//!   dependency order
//! - **Dispatch**: a msgtype trie lowered to cascaded C switches
//! - **Emission**: enums, tag-info/group-info tables and the templated
//!   source file

pub mod common;
pub mod dispatch;
pub mod emit;
pub mod error;
pub mod expand;
pub mod generator;
pub mod prune;

pub use error::{CodegenError, Result};
pub use generator::{GeneratedCode, Generator};
