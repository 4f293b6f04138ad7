/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! Minimal XML element tree.
//!
//! The block reader walks element bodies recursively, so the loader
//! materializes the whole document as a tree instead of exposing the
//! event stream. Text content, comments and processing instructions are
//! discarded; a FIX specification carries everything in element names
//! and attributes.

use crate::error::{DictionaryError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One XML element: name, attributes and child elements, in document
/// order.
#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    /// Element name.
    pub name: String,
    attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parses a document and returns its root element.
    ///
    /// # Errors
    /// Returns [`DictionaryError::Xml`] on malformed input and
    /// [`DictionaryError::MissingRoot`] when the document holds no
    /// complete element.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let element = Self::from_start(e)?;
                    stack.push(element);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = Self::from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Ok(Event::End(_)) => {
                    let Some(element) = stack.pop() else {
                        return Err(DictionaryError::MissingRoot);
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(DictionaryError::Xml(e)),
            }
            buf.clear();
        }

        Err(DictionaryError::MissingRoot)
    }

    /// Builds an element from a start (or empty) tag.
    fn from_start(e: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(e.name().as_ref())?.to_string();

        let mut attributes = Vec::new();
        for attr in e.attributes().flatten() {
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = std::str::from_utf8(&attr.value)?.to_string();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Looks up an attribute value by key.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Looks up a required attribute, failing with
    /// [`DictionaryError::MissingAttr`] when absent.
    pub fn require_attr(&self, key: &'static str) -> Result<&str> {
        self.attr(key).ok_or_else(|| DictionaryError::MissingAttr {
            element: self.name.clone(),
            attr: key,
        })
    }

    /// Returns the first child element with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Iterates the child elements with the given name, in order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }
}
