/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! Message-type dispatch.
//!
//! Builds a byte trie over the declared msgtype strings and lowers it
//! into cascaded C `switch` statements over the incoming type string.
//! The end-of-string transition is the SOH byte that terminates the
//! MsgType field on the wire.
//!
//! A child holding exactly one outcome (its end-of-string) collapses to
//! an inline `RETURN_MESSAGE_OR_NULL` case; everything else jumps to a
//! labeled switch for the next character. Subtrees queued during a
//! switch are emitted LIFO, which keeps related labels clustered in a
//! depth-first listing.

use crate::error::{CodegenError, Result};
use fix2c_dictionary::schema::MessageDef;
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Debug, Default)]
struct TrieNode {
    /// Message whose msgtype ends at this node.
    message: Option<String>,
    /// Children keyed by the next msgtype byte.
    children: BTreeMap<u8, TrieNode>,
}

impl TrieNode {
    /// A pure leaf has exactly one outcome: the end-of-string.
    fn is_pure_leaf(&self) -> bool {
        self.message.is_some() && self.children.is_empty()
    }
}

/// Message-type dispatch trie.
#[derive(Debug)]
pub struct Dispatch {
    root: TrieNode,
}

impl Dispatch {
    /// Builds the trie over the given messages.
    ///
    /// # Errors
    /// Fails with [`CodegenError::DuplicateMsgType`] when two messages
    /// declare the same msgtype string.
    pub fn build<'a>(messages: impl IntoIterator<Item = &'a MessageDef>) -> Result<Self> {
        let mut root = TrieNode::default();

        for message in messages {
            let mut node = &mut root;
            for byte in message.msg_type.bytes() {
                node = node.children.entry(byte).or_default();
            }
            if node.message.is_some() {
                return Err(CodegenError::DuplicateMsgType {
                    name: message.name.clone(),
                    msg_type: message.msg_type.clone(),
                });
            }
            node.message = Some(message.name.clone());
        }

        Ok(Self { root })
    }

    /// Emits the cascade of labeled switch statements over `type`.
    #[must_use]
    pub fn emit(&self) -> String {
        let mut out = String::new();
        let mut queue: Vec<(String, &TrieNode)> = Vec::new();

        emit_switch(&mut out, &self.root, "", &mut queue);
        while let Some((prefix, node)) = queue.pop() {
            let _ = writeln!(out, "_{prefix}:");
            emit_switch(&mut out, node, &prefix, &mut queue);
        }

        out
    }
}

fn emit_switch<'a>(
    out: &mut String,
    node: &'a TrieNode,
    prefix: &str,
    queue: &mut Vec<(String, &'a TrieNode)>,
) {
    let _ = writeln!(out, "    switch (type[{}]) {{", prefix.len());

    if let Some(name) = &node.message {
        let _ = writeln!(out, "    case SOH: RETURN_MESSAGE({name});");
    }

    for (byte, child) in &node.children {
        let c = *byte as char;
        if let Some(name) = child.message.as_ref().filter(|_| child.is_pure_leaf()) {
            let _ = writeln!(out, "    case '{c}': RETURN_MESSAGE_OR_NULL({name});");
        } else {
            let _ = writeln!(out, "    case '{c}': goto _{prefix}{c};");
            queue.push((format!("{prefix}{c}"), child));
        }
    }

    let _ = writeln!(out, "    default: return NULL;");
    let _ = writeln!(out, "    }}");
}
