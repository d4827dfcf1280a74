//! XML document handling
//!
//! This module builds an owned element tree from catalogue XML. The tree is
//! deliberately small: local name, resolved namespace, attributes, text and
//! children. That is everything the catalogue parsers need and nothing else.
//!
//! Two properties matter for the rest of the crate:
//!
//! - Element namespaces are resolved once, while the tree is built. Catalogue
//!   code asks the document for its namespace a single time and passes it to
//!   the name-based query helpers.
//! - Parsing is error-tolerant. Community `.cat` files occasionally arrive
//!   truncated or mangled; a mid-stream syntax error ends the walk and keeps
//!   whatever tree was built so far instead of failing the whole import.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::namespaces::{NamespaceScope, QName, ScopeStack};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// XML Element in the document tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Element qualified name (namespace resolved at parse time)
    pub qname: QName,
    /// Element attributes in document order, keyed by local name
    pub attributes: IndexMap<String, String>,
    /// Accumulated text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Get an attribute value by local name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Trimmed text content, empty string when absent
    pub fn text(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append a run of character data
    fn push_text(&mut self, chunk: &str) {
        match &mut self.text {
            Some(t) => t.push_str(chunk),
            None => self.text = Some(chunk.to_string()),
        }
    }

    fn matches(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.local_name() == local_name && self.namespace() == namespace
    }

    /// Direct children with the given namespace and local name
    pub fn children_named<'a>(
        &'a self,
        namespace: Option<&'a str>,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children
            .iter()
            .filter(move |c| c.matches(namespace, local_name))
    }

    /// First direct child with the given namespace and local name
    pub fn first_child_named(&self, namespace: Option<&str>, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.matches(namespace, local_name))
    }

    /// All descendants with the given namespace and local name, in document
    /// order. The element itself is not included.
    pub fn descendants_named<'a>(
        &'a self,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Vec<&'a Element> {
        let mut out = Vec::new();
        self.collect_descendants(namespace, local_name, &mut out);
        out
    }

    fn collect_descendants<'a>(
        &'a self,
        namespace: Option<&str>,
        local_name: &str,
        out: &mut Vec<&'a Element>,
    ) {
        for child in &self.children {
            if child.matches(namespace, local_name) {
                out.push(child);
            }
            child.collect_descendants(namespace, local_name, out);
        }
    }

    /// First descendant with the given namespace and local name
    pub fn first_descendant_named(
        &self,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Option<&Element> {
        for child in &self.children {
            if child.matches(namespace, local_name) {
                return Some(child);
            }
            if let Some(found) = child.first_descendant_named(namespace, local_name) {
                return Some(found);
            }
        }
        None
    }
}

/// XML Document representation
#[derive(Debug)]
pub struct Document {
    /// Root element of the document
    pub root: Option<Element>,
}

impl Document {
    /// Parse an XML document from a string with default limits
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse_with_limits(xml.as_bytes(), &Limits::default())
    }

    /// Parse an XML document from bytes, enforcing the given limits
    ///
    /// Syntax errors after the root element opened are tolerated: the walk
    /// stops and open elements are folded back into the partial tree. Limit
    /// violations are not tolerated and fail the parse.
    pub fn parse_with_limits(xml: &[u8], limits: &Limits) -> Result<Self> {
        limits.check_size(xml.len())?;

        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut doc = Document { root: None };
        let mut element_stack: Vec<Element> = Vec::new();
        let mut scopes = ScopeStack::new();
        let mut element_count: usize = 0;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    element_count += 1;
                    limits.check_elements(element_count)?;
                    limits.check_depth(element_stack.len() + 1)?;
                    let element = Self::parse_element(&e, &mut scopes)?;
                    element_stack.push(element);
                }
                Ok(Event::End(_)) => {
                    scopes.pop();
                    if let Some(current) = element_stack.pop() {
                        match element_stack.last_mut() {
                            Some(parent) => parent.add_child(current),
                            None => doc.root = Some(current),
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    element_count += 1;
                    limits.check_elements(element_count)?;
                    let element = Self::parse_element(&e, &mut scopes)?;
                    scopes.pop();
                    match element_stack.last_mut() {
                        Some(parent) => parent.add_child(element),
                        None => doc.root = Some(element),
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        // Unknown entities degrade to the raw text run
                        let text = match e.unescape() {
                            Ok(t) => t.into_owned(),
                            Err(err) => {
                                log::warn!("failed to unescape text: {}; keeping raw", err);
                                String::from_utf8_lossy(e.as_ref()).into_owned()
                            }
                        };
                        if !text.trim().is_empty() {
                            current.push_text(&text);
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                        if !text.trim().is_empty() {
                            current.push_text(&text);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    // Keep the partial tree from a truncated or mangled file.
                    log::warn!(
                        "XML error at position {}: {}; keeping partial document",
                        reader.buffer_position(),
                        e
                    );
                    break;
                }
                _ => {} // Ignore comments, processing instructions, etc.
            }
            buf.clear();
        }

        // Fold any still-open elements into their parents (truncated input).
        while let Some(current) = element_stack.pop() {
            match element_stack.last_mut() {
                Some(parent) => parent.add_child(current),
                None => doc.root = Some(current),
            }
        }

        Ok(doc)
    }

    /// Parse element from BytesStart event, resolving its namespace
    ///
    /// Pushes the element's namespace scope onto the stack; the caller pops
    /// it when the element ends.
    fn parse_element(start: &BytesStart, scopes: &mut ScopeStack) -> Result<Element> {
        let name_bytes = start.name();
        let name = std::str::from_utf8(name_bytes.as_ref())
            .map_err(|e| Error::Xml(format!("invalid element name: {}", e)))?
            .to_string();

        let mut scope = NamespaceScope::new();
        let mut attributes: IndexMap<String, String> = IndexMap::new();

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("invalid attribute name: {}", e)))?;

            let attr_value = match attr.unescape_value() {
                Ok(v) => v.to_string(),
                Err(e) => {
                    log::warn!("failed to unescape attribute value: {}; keeping raw", e);
                    String::from_utf8_lossy(&attr.value).into_owned()
                }
            };

            // Namespace declarations go into the scope, not the attribute map
            if attr_name == "xmlns" {
                scope.set_default_namespace(&attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                scope.add_prefix(prefix, &attr_value);
            } else {
                let local = match attr_name.split_once(':') {
                    Some((_prefix, local)) => local,
                    None => attr_name,
                };
                attributes.insert(local.to_string(), attr_value);
            }
        }

        scopes.push(scope);
        let qname = scopes.resolve_element_name(&name);

        let mut element = Element::new(qname);
        element.attributes = attributes;
        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// The document's namespace: the resolved namespace of the root element.
    ///
    /// Catalogue parsers call this once and pass the result to every
    /// name-based query.
    pub fn namespace(&self) -> Option<&str> {
        self.root.as_ref().and_then(|r| r.namespace())
    }

    /// Build a one-time `id → element` index over the whole tree.
    ///
    /// Link resolution between catalogues is id-based; indexing once keeps
    /// lookup linear instead of rescanning the tree per `targetId`. The
    /// first element carrying a given id wins, matching document order.
    pub fn id_index(&self) -> HashMap<&str, &Element> {
        let mut index = HashMap::new();
        if let Some(root) = &self.root {
            Self::index_ids(root, &mut index);
        }
        index
    }

    fn index_ids<'a>(element: &'a Element, index: &mut HashMap<&'a str, &'a Element>) {
        if let Some(id) = element.attr("id") {
            index.entry(id).or_insert(element);
        }
        for child in &element.children {
            Self::index_ids(child, index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "http://www.battlescribe.net/schema/catalogueSchema";

    #[test]
    fn test_parse_simple_xml() {
        let xml = r#"<root><child>text</child></root>"#;
        let doc = Document::from_string(xml).unwrap();

        let root = doc.root().unwrap();
        assert_eq!(root.local_name(), "root");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].local_name(), "child");
        assert_eq!(root.children[0].text(), "text");
    }

    #[test]
    fn test_parse_with_attributes() {
        let xml = r#"<root attr1="value1" attr2="value2"><child/></root>"#;
        let doc = Document::from_string(xml).unwrap();

        let root = doc.root().unwrap();
        assert_eq!(root.attr("attr1"), Some("value1"));
        assert_eq!(root.attr("attr2"), Some("value2"));
        assert_eq!(root.attr("missing"), None);
    }

    #[test]
    fn test_default_namespace_is_inherited() {
        let xml = format!(
            r#"<catalogue xmlns="{}" name="Test"><sharedSelectionEntries><selectionEntry type="unit"/></sharedSelectionEntries></catalogue>"#,
            NS
        );
        let doc = Document::from_string(&xml).unwrap();

        assert_eq!(doc.namespace(), Some(NS));
        let root = doc.root().unwrap();
        let shared = root.first_child_named(Some(NS), "sharedSelectionEntries").unwrap();
        let entry = shared.first_child_named(Some(NS), "selectionEntry").unwrap();
        assert_eq!(entry.attr("type"), Some("unit"));
    }

    #[test]
    fn test_children_named_respects_namespace() {
        let xml = r#"<root xmlns="http://a"><x/><y xmlns="http://b"><x/></y><x/></root>"#;
        let doc = Document::from_string(xml).unwrap();
        let root = doc.root().unwrap();

        assert_eq!(root.children_named(Some("http://a"), "x").count(), 2);
        // The nested x sits in namespace http://b and is not a match
        assert_eq!(root.descendants_named(Some("http://a"), "x").len(), 2);
        assert_eq!(root.descendants_named(Some("http://b"), "x").len(), 1);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let xml = r#"<root><a n="1"/><b><a n="2"/></b><a n="3"/></root>"#;
        let doc = Document::from_string(xml).unwrap();
        let root = doc.root().unwrap();
        let found = root.descendants_named(None, "a");
        let order: Vec<_> = found.iter().filter_map(|e| e.attr("n")).collect();
        assert_eq!(order, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_text_accumulates_across_entities() {
        let xml = r#"<root><c>Crit (2 Hits) &amp; Shock</c></root>"#;
        let doc = Document::from_string(xml).unwrap();
        let c = doc.root().unwrap().first_child_named(None, "c").unwrap();
        assert_eq!(c.text(), "Crit (2 Hits) & Shock");
    }

    #[test]
    fn test_truncated_document_keeps_partial_tree() {
        let xml = r#"<catalogue name="Broken"><sharedSelectionEntries><selectionEntry type="unit" name="Unit A"/>"#;
        let doc = Document::from_string(xml).unwrap();

        let root = doc.root().unwrap();
        assert_eq!(root.local_name(), "catalogue");
        let entries = root.descendants_named(None, "selectionEntry");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].attr("name"), Some("Unit A"));
    }

    #[test]
    fn test_id_index_first_occurrence_wins() {
        let xml = r#"<root><a id="x" n="first"/><b id="x" n="second"/><c id="y"/></root>"#;
        let doc = Document::from_string(xml).unwrap();
        let index = doc.id_index();
        assert_eq!(index["x"].attr("n"), Some("first"));
        assert!(index.contains_key("y"));
    }

    #[test]
    fn test_size_limit_enforced() {
        let limits = Limits {
            max_xml_size: 8,
            ..Limits::default()
        };
        let err = Document::parse_with_limits(b"<root></root>", &limits);
        assert!(err.is_err());
    }

    #[test]
    fn test_depth_limit_enforced() {
        let limits = Limits {
            max_xml_depth: 2,
            ..Limits::default()
        };
        let err = Document::parse_with_limits(b"<a><b><c/></b></a>", &limits);
        assert!(err.is_err());
    }
}
