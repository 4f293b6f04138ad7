/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! FIX specification parser.
//!
//! Turns the XML element tree into a [`Dictionary`]: builds the tag
//! table from `<fields>`, promotes DATA/LENGTH pairs, and reads the
//! component, message, header and trailer blocks. Component references
//! stay unresolved here; the codegen crate expands them.

use crate::error::{DictionaryError, Result};
use crate::schema::{Block, Dictionary, Entry, FixVersion, MessageDef, RawGroup, TagDef, TagKind, TagTable};
use crate::xml::XmlElement;
use indexmap::IndexMap;
use tracing::debug;

const TYPE_DATA: &str = "DATA";
const TYPE_LENGTH: &str = "LENGTH";

/// Companion name suffixes tried for a DATA field, in order.
const LENGTH_SUFFIXES: [&str; 2] = ["Len", "Length"];

/// Parses a FIX XML specification document into a [`Dictionary`].
pub fn parse_dictionary(xml: &str) -> Result<Dictionary> {
    let root = XmlElement::parse(xml)?;
    if root.name != "fix" {
        return Err(DictionaryError::BadRoot { found: root.name });
    }

    let version = FixVersion::new(
        root_attr(&root, "type")?,
        root_attr(&root, "major")?,
        root_attr(&root, "minor")?,
    );

    let tags = build_tag_table(&root)?;
    let components = read_components(&root, &tags)?;
    let messages = read_messages(&root, &tags)?;
    let header = read_section(&root, "header", &tags)?;
    let trailer = read_section(&root, "trailer", &tags)?;

    debug!(
        version = %version,
        fields = tags.len(),
        components = components.len(),
        messages = messages.len(),
        "parsed FIX specification"
    );

    Ok(Dictionary {
        version,
        tags,
        components,
        messages,
        header,
        trailer,
    })
}

fn root_attr<'a>(root: &'a XmlElement, attr: &'static str) -> Result<&'a str> {
    root.attr(attr)
        .ok_or(DictionaryError::MissingRootAttr { attr })
}

/// Builds the name-keyed tag table from `<fields>/<field>` and applies
/// DATA/LENGTH promotion. The table is frozen afterwards.
fn build_tag_table(root: &XmlElement) -> Result<TagTable> {
    let mut table = TagTable::default();

    if let Some(fields) = root.child("fields") {
        for field in fields.children_named("field") {
            let name = field.require_attr("name")?;
            let number = field.require_attr("number")?;
            let data_type = field.require_attr("type")?;

            let number: u32 =
                number
                    .parse()
                    .map_err(|_| DictionaryError::InvalidTagNumber {
                        name: name.to_string(),
                        value: number.to_string(),
                    })?;

            table.insert(TagDef::regular(name, number, data_type));
        }
    }

    if table.is_empty() {
        return Err(DictionaryError::NoFields);
    }

    promote_data_pairs(&mut table)?;
    Ok(table)
}

/// Links every DATA field to its LENGTH companion: the first of
/// `<name>Len`, `<name>Length` that exists with type LENGTH wins.
fn promote_data_pairs(table: &mut TagTable) -> Result<()> {
    let data_names: Vec<String> = table
        .iter()
        .filter(|tag| tag.data_type() == Some(TYPE_DATA))
        .map(|tag| tag.name.clone())
        .collect();

    for data_name in data_names {
        let companion = LENGTH_SUFFIXES.iter().find_map(|suffix| {
            let candidate = format!("{data_name}{suffix}");
            match table.get(&candidate) {
                Some(tag) if tag.data_type() == Some(TYPE_LENGTH) => {
                    Some((candidate, tag.number))
                }
                _ => None,
            }
        });

        let Some((length_name, length_tag)) = companion else {
            return Err(DictionaryError::MissingLengthTag { name: data_name });
        };

        table.set_kind(
            &data_name,
            TagKind::Data {
                length_tag,
                length_name: length_name.clone(),
            },
        );
        table.set_kind(
            &length_name,
            TagKind::DataLength {
                data_tag: data_name.clone(),
            },
        );
    }

    Ok(())
}

/// Reads one block body: `field`, `component` and `group` children, in
/// document order. Unrecognized child elements are ignored.
fn read_block(element: &XmlElement, path: &[&str], tags: &TagTable) -> Result<Block> {
    let mut block = Block::default();

    for child in &element.children {
        match child.name.as_str() {
            "field" => {
                let name = child.require_attr("name")?;
                let Some(tag) = tags.get(name) else {
                    return Err(unknown_node(path, name));
                };
                push_entry(&mut block, path, name, Entry::Field(tag.clone()))?;
            }
            "component" => {
                let name = child.require_attr("name")?;
                push_entry(&mut block, path, name, Entry::Component(name.to_string()))?;
            }
            "group" => {
                let name = child.require_attr("name")?;
                let Some(tag) = tags.get(name) else {
                    return Err(unknown_node(path, name));
                };
                if !tag.is_num_in_group() {
                    return Err(DictionaryError::NotNumInGroup {
                        path: render_path(path),
                        name: name.to_string(),
                    });
                }
                let sub_path: Vec<&str> = path.iter().copied().chain([name]).collect();
                let body = read_block(child, &sub_path, tags)?;
                push_entry(
                    &mut block,
                    path,
                    name,
                    Entry::Group(RawGroup {
                        size_tag: name.to_string(),
                        body,
                    }),
                )?;
            }
            _ => {}
        }
    }

    if block.is_empty() {
        return Err(DictionaryError::EmptyBlock {
            path: render_path(path),
        });
    }
    Ok(block)
}

fn push_entry(block: &mut Block, path: &[&str], name: &str, entry: Entry) -> Result<()> {
    if block.entries.iter().any(|(existing, _)| existing == name) {
        return Err(DictionaryError::DuplicateTag {
            path: render_path(path),
            name: name.to_string(),
        });
    }
    block.entries.push((name.to_string(), entry));
    Ok(())
}

fn unknown_node(path: &[&str], name: &str) -> DictionaryError {
    DictionaryError::UnknownNode {
        path: render_path(path),
        name: name.to_string(),
    }
}

fn render_path(path: &[&str]) -> String {
    path.join("/")
}

fn read_components(root: &XmlElement, tags: &TagTable) -> Result<IndexMap<String, Block>> {
    let mut components = IndexMap::new();

    if let Some(section) = root.child("components") {
        for component in section.children_named("component") {
            let name = component.require_attr("name")?;
            let block = read_block(component, &[name], tags)?;
            components.insert(name.to_string(), block);
        }
    }

    Ok(components)
}

fn read_messages(root: &XmlElement, tags: &TagTable) -> Result<IndexMap<String, MessageDef>> {
    let mut messages = IndexMap::new();

    if let Some(section) = root.child("messages") {
        for message in section.children_named("message") {
            let name = message.require_attr("name")?;
            let msg_type = message.require_attr("msgtype")?;
            if msg_type.is_empty() {
                return Err(DictionaryError::EmptyMsgType {
                    name: name.to_string(),
                });
            }
            let block = read_block(message, &[name], tags)?;
            messages.insert(
                name.to_string(),
                MessageDef {
                    name: name.to_string(),
                    msg_type: msg_type.to_string(),
                    block,
                },
            );
        }
    }

    Ok(messages)
}

/// Reads `<header>` or `<trailer>`. An absent section reads as an
/// empty block and fails accordingly.
fn read_section(root: &XmlElement, name: &'static str, tags: &TagTable) -> Result<Block> {
    match root.child(name) {
        Some(section) => read_block(section, &[name], tags),
        None => Err(DictionaryError::EmptyBlock {
            path: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"<fix type="FIX" major="4" minor="4">
  <fields>
    <field name="BeginString" number="8" type="STRING"/>
    <field name="BodyLength" number="9" type="LENGTH"/>
    <field name="MsgType" number="35" type="STRING"/>
    <field name="CheckSum" number="10" type="STRING"/>
    <field name="Account" number="1" type="STRING"/>
  </fields>
  <header>
    <field name="BeginString"/>
    <field name="BodyLength"/>
    <field name="MsgType"/>
  </header>
  <trailer>
    <field name="CheckSum"/>
  </trailer>
  <messages>
    <message name="Heartbeat" msgtype="0">
      <field name="Account"/>
    </message>
  </messages>
</fix>"#;

    #[test]
    fn test_parse_minimal_spec() {
        let dict = Dictionary::parse(MINIMAL).expect("parse");

        assert_eq!(dict.version.to_string(), "FIX.4.4");
        assert_eq!(dict.tags.len(), 5);
        assert_eq!(dict.header.len(), 3);
        assert_eq!(dict.trailer.len(), 1);
        assert_eq!(dict.messages.len(), 1);

        let heartbeat = dict.messages.get("Heartbeat").expect("message");
        assert_eq!(heartbeat.msg_type, "0");
        assert_eq!(heartbeat.block.len(), 1);
    }

    #[test]
    fn test_bad_root() {
        let err = Dictionary::parse("<spec/>").unwrap_err();
        assert!(matches!(err, DictionaryError::BadRoot { .. }));
    }

    #[test]
    fn test_missing_root_attr() {
        let err = Dictionary::parse(r#"<fix type="FIX" major="4"/>"#).unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::MissingRootAttr { attr: "minor" }
        ));
    }

    #[test]
    fn test_no_fields() {
        let err =
            Dictionary::parse(r#"<fix type="FIX" major="4" minor="4"><fields/></fix>"#).unwrap_err();
        assert!(matches!(err, DictionaryError::NoFields));
    }

    #[test]
    fn test_invalid_tag_number() {
        let xml = r#"<fix type="FIX" major="4" minor="4">
  <fields><field name="Account" number="one" type="STRING"/></fields>
</fix>"#;
        let err = Dictionary::parse(xml).unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::InvalidTagNumber { ref name, .. } if name == "Account"
        ));
    }

    #[test]
    fn test_data_pair_promotion() {
        let xml = MINIMAL.replace(
            "<field name=\"Account\" number=\"1\" type=\"STRING\"/>",
            "<field name=\"RawDataLength\" number=\"95\" type=\"LENGTH\"/>\n    \
             <field name=\"RawData\" number=\"96\" type=\"DATA\"/>\n    \
             <field name=\"Account\" number=\"1\" type=\"STRING\"/>",
        );
        let dict = Dictionary::parse(&xml).expect("parse");

        let data = dict.tags.get("RawData").expect("RawData");
        assert_eq!(
            data.kind,
            TagKind::Data {
                length_tag: 95,
                length_name: "RawDataLength".to_string(),
            }
        );

        let length = dict.tags.get("RawDataLength").expect("RawDataLength");
        assert_eq!(
            length.kind,
            TagKind::DataLength {
                data_tag: "RawData".to_string(),
            }
        );
    }

    #[test]
    fn test_data_pair_prefers_len_suffix() {
        let xml = MINIMAL.replace(
            "<field name=\"Account\" number=\"1\" type=\"STRING\"/>",
            "<field name=\"SignatureLen\" number=\"93\" type=\"LENGTH\"/>\n    \
             <field name=\"SignatureLength\" number=\"90\" type=\"LENGTH\"/>\n    \
             <field name=\"Signature\" number=\"89\" type=\"DATA\"/>\n    \
             <field name=\"Account\" number=\"1\" type=\"STRING\"/>",
        );
        let dict = Dictionary::parse(&xml).expect("parse");

        let data = dict.tags.get("Signature").expect("Signature");
        assert_eq!(
            data.kind,
            TagKind::Data {
                length_tag: 93,
                length_name: "SignatureLen".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_length_tag() {
        let xml = MINIMAL.replace(
            "<field name=\"Account\" number=\"1\" type=\"STRING\"/>",
            "<field name=\"RawData\" number=\"96\" type=\"DATA\"/>",
        );
        let err = Dictionary::parse(&xml).unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::MissingLengthTag { ref name } if name == "RawData"
        ));
    }

    #[test]
    fn test_length_candidate_with_wrong_type_is_skipped() {
        // RawDataLength exists but is STRING, so promotion must fail.
        let xml = MINIMAL.replace(
            "<field name=\"Account\" number=\"1\" type=\"STRING\"/>",
            "<field name=\"RawDataLength\" number=\"95\" type=\"STRING\"/>\n    \
             <field name=\"RawData\" number=\"96\" type=\"DATA\"/>",
        );
        let err = Dictionary::parse(&xml).unwrap_err();
        assert!(matches!(err, DictionaryError::MissingLengthTag { .. }));
    }

    #[test]
    fn test_unknown_field_in_block() {
        let xml = MINIMAL.replace("<field name=\"Account\"/>", "<field name=\"Price\"/>");
        let err = Dictionary::parse(&xml).unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::UnknownNode { ref path, ref name }
                if path == "Heartbeat" && name == "Price"
        ));
    }

    #[test]
    fn test_duplicate_entry_in_block() {
        let xml = MINIMAL.replace(
            "<field name=\"Account\"/>",
            "<field name=\"Account\"/><field name=\"Account\"/>",
        );
        let err = Dictionary::parse(&xml).unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::DuplicateTag { ref name, .. } if name == "Account"
        ));
    }

    #[test]
    fn test_empty_message_block() {
        let xml = MINIMAL.replace("<field name=\"Account\"/>", "");
        let err = Dictionary::parse(&xml).unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::EmptyBlock { ref path } if path == "Heartbeat"
        ));
    }

    #[test]
    fn test_empty_header_section() {
        // An absent section reads the same way as a present-but-empty one.
        let xml = MINIMAL
            .replace("<field name=\"BeginString\"/>", "")
            .replace("<field name=\"BodyLength\"/>", "")
            .replace("<field name=\"MsgType\"/>", "");
        let err = Dictionary::parse(&xml).unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::EmptyBlock { ref path } if path == "header"
        ));
    }

    #[test]
    fn test_empty_msgtype() {
        let xml = MINIMAL.replace("msgtype=\"0\"", "msgtype=\"\"");
        let err = Dictionary::parse(&xml).unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::EmptyMsgType { ref name } if name == "Heartbeat"
        ));
    }

    #[test]
    fn test_group_requires_num_in_group_type() {
        let xml = MINIMAL.replace(
            "<field name=\"Account\"/>",
            "<group name=\"Account\"><field name=\"Account\"/></group>",
        );
        let err = Dictionary::parse(&xml).unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::NotNumInGroup { ref name, .. } if name == "Account"
        ));
    }

    #[test]
    fn test_group_reading_and_paths() {
        let xml = MINIMAL.replace(
            "<field name=\"Account\"/>",
            "<group name=\"NoLines\"><field name=\"Account\"/></group>",
        );
        let with_tag = xml.replace(
            "<field name=\"Account\" number=\"1\" type=\"STRING\"/>",
            "<field name=\"Account\" number=\"1\" type=\"STRING\"/>\n    \
             <field name=\"NoLines\" number=\"33\" type=\"NUMINGROUP\"/>",
        );
        let dict = Dictionary::parse(&with_tag).expect("parse");
        let message = dict.messages.get("Heartbeat").expect("message");

        let (name, entry) = &message.block.entries[0];
        assert_eq!(name, "NoLines");
        match entry {
            Entry::Group(group) => {
                assert_eq!(group.size_tag, "NoLines");
                assert_eq!(group.body.len(), 1);
            }
            other => panic!("expected group entry, got {other:?}"),
        }
    }

    #[test]
    fn test_components_are_deferred() {
        // Swap the message body first so the component body keeps its field.
        let xml = MINIMAL
            .replace(
                "<field name=\"Account\"/>",
                "<component name=\"Parties\"/>",
            )
            .replace(
                "<header>",
                "<components>\n    <component name=\"Parties\">\n      \
                 <field name=\"Account\"/>\n    </component>\n  </components>\n  <header>",
            );
        let dict = Dictionary::parse(&xml).expect("parse");

        assert!(dict.components.contains_key("Parties"));
        let message = dict.messages.get("Heartbeat").expect("message");
        assert_eq!(
            message.block.entries[0].1,
            Entry::Component("Parties".to_string())
        );
    }
}
