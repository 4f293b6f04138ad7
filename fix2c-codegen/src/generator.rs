/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! Pipeline orchestration.
//!
//! Drives one parsed specification through expansion, common-block
//! construction, pruning and emission, and produces the header/source
//! artifact pair. The source file is an embedded template with seven
//! substitution slots; the generator fills the slots and interprets
//! nothing else.

use crate::common::build_common;
use crate::dispatch::Dispatch;
use crate::emit::{self, TableKind};
use crate::error::Result;
use crate::expand::{Expander, ResolvedBlock};
use crate::prune::prune;
use fix2c_dictionary::schema::Dictionary;
use std::fmt::Write;
use tracing::{debug, info};

/// C source template; `{slot}` markers are filled by [`Generator::generate`].
const SOURCE_TEMPLATE: &str = include_str!("template.c");

/// Generated artifact pair.
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    /// Contents of `<base>.h`.
    pub header: String,
    /// Contents of `<base>.c`.
    pub source: String,
}

/// Drives the code generation pipeline for one parsed specification.
#[derive(Debug)]
pub struct Generator {
    dictionary: Dictionary,
}

impl Generator {
    /// Creates a generator over a parsed specification.
    #[must_use]
    pub fn new(dictionary: Dictionary) -> Self {
        Self { dictionary }
    }

    /// Generates the header and source artifacts.
    ///
    /// `base_name` is the input file stem; it names the artifacts and,
    /// with `.` mapped to `_`, forms the C symbol prefix.
    pub fn generate(&self, base_name: &str) -> Result<GeneratedCode> {
        let dict = &self.dictionary;
        let prefix = base_name.replace('.', "_");

        let mut expander = Expander::new(&dict.components);
        let header_block = expander.expand(&dict.header, &[])?;
        let trailer_block = expander.expand(&dict.trailer, &[])?;

        let mut message_blocks = Vec::with_capacity(dict.messages.len());
        for message in dict.messages.values() {
            let path = [message.name.clone()];
            let block = expander.expand(&message.block, &path)?;
            message_blocks.push((message, block));
        }
        let groups = expander.into_groups();

        let common = build_common(&header_block, &trailer_block)?;
        let dispatch = Dispatch::build(dict.messages.values())?;

        // The unstripped header and trailer seed the reachable set, so
        // the framing tags keep their enum symbols.
        let mut roots: Vec<&ResolvedBlock> = vec![&header_block, &trailer_block];
        roots.extend(message_blocks.iter().map(|(_, block)| block));
        let pruned = prune(&roots, &groups, &dict.tags);

        debug!(
            expanded_groups = groups.len(),
            reachable_groups = pruned.groups.len(),
            reachable_tags = pruned.tags.len(),
            "pruned specification"
        );

        let mut groups_out = String::new();
        for (name, block) in &pruned.groups {
            groups_out.push_str(&emit::tag_info(name, block, 0, TableKind::Group));
            groups_out.push('\n');
            groups_out.push_str(&emit::group_info(name, block, TableKind::Group));
            groups_out.push('\n');
        }

        let common_out = emit::common_tables(&common);

        let offset = common.len();
        let mut messages_out = String::new();
        for (message, block) in &message_blocks {
            messages_out.push_str(&emit::tag_info(&message.name, block, offset, TableKind::Message));
            messages_out.push('\n');
            messages_out.push_str(&emit::group_info(&message.name, block, TableKind::Message));
            let _ = writeln!(
                messages_out,
                "MESSAGE_INFO({}, \"{}\");",
                message.name, message.msg_type
            );
            messages_out.push('\n');
        }

        let header = emit::header_file(
            base_name,
            &prefix,
            &dict.version,
            &pruned.tags,
            &dict.messages,
        );
        let source = SOURCE_TEMPLATE
            .replace("{base_name}", base_name)
            .replace("{prefix}", &prefix)
            .replace("{fix_version}", &dict.version.to_string())
            .replace("{groups}", groups_out.trim_end())
            .replace("{common}", common_out.trim_end())
            .replace("{messages}", messages_out.trim_end())
            .replace("{parser_table}", dispatch.emit().trim_end());

        info!(
            version = %dict.version,
            messages = dict.messages.len(),
            groups = pruned.groups.len(),
            tags = pruned.tags.len(),
            "generated parser tables"
        );

        Ok(GeneratedCode { header, source })
    }
}
