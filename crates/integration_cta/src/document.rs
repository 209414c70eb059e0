//! Parsed response documents
//!
//! A [`RemoteDocument`] is a generic element tree. Record shapes are defined
//! by the CTA services and passed through unchanged; accessors only help
//! find them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One XML element with its attributes, text and child elements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Element name
    pub name: String,
    /// Attributes by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Concatenated text content, trimmed
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// Child elements in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Create an element with no content
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns true if the element has no child elements
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// First child element with the given name
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first child element with the given name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Attribute value by name
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// An error payload reported by a CTA service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFault {
    /// Service error code, when the service reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable message from the service
    pub message: String,
}

impl ServiceFault {
    #[must_use]
    pub fn new(code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ServiceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{code}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Structured result of a successful call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDocument {
    root: Node,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    faults: Vec<ServiceFault>,
}

impl RemoteDocument {
    /// Wrap a parsed root element
    #[must_use]
    pub const fn new(root: Node) -> Self {
        Self {
            root,
            faults: Vec::new(),
        }
    }

    /// Attach faults reported alongside data (bus partial errors)
    #[must_use]
    pub fn with_faults(mut self, faults: Vec<ServiceFault>) -> Self {
        self.faults = faults;
        self
    }

    /// Root element
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Consume the document, returning its root element
    #[must_use]
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Records: root children that carry child elements of their own
    pub fn records(&self) -> impl Iterator<Item = &Node> {
        self.root.children.iter().filter(|c| !c.is_leaf())
    }

    /// Records with the given element name (e.g. `vehicle`, `eta`, `Alert`)
    pub fn records_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.root.children_named(name).filter(|c| !c.is_leaf())
    }

    /// Number of records
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records().count()
    }

    /// Returns true if the document holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records().next().is_none()
    }

    /// Text of a root-level scalar element (e.g. `tm`, `tmst`)
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.root.field(name)
    }

    /// Faults the service reported next to the returned records
    #[must_use]
    pub fn faults(&self) -> &[ServiceFault] {
        &self.faults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, text: &str) -> Node {
        Node {
            text: text.to_string(),
            ..Node::new(name)
        }
    }

    fn sample() -> RemoteDocument {
        let mut vehicle = Node::new("vehicle");
        vehicle.children = vec![leaf("vid", "1462"), leaf("rt", "3")];
        let mut other = Node::new("vehicle");
        other.children = vec![leaf("vid", "1463"), leaf("rt", "81")];

        let mut root = Node::new("bustime-response");
        root.children = vec![leaf("tmstmp", "20240115 12:00"), vehicle, other];
        RemoteDocument::new(root)
    }

    #[test]
    fn test_records_skip_scalars() {
        let doc = sample();
        assert_eq!(doc.record_count(), 2);
        assert!(!doc.is_empty());
        assert_eq!(doc.field("tmstmp"), Some("20240115 12:00"));

        let vids: Vec<_> = doc.records_named("vehicle").filter_map(|v| v.field("vid")).collect();
        assert_eq!(vids, vec!["1462", "1463"]);
    }

    #[test]
    fn test_empty_document() {
        let mut root = Node::new("bustime-response");
        root.children.push(leaf("tm", "20240115 12:00:00"));
        let doc = RemoteDocument::new(root);
        assert!(doc.is_empty());
        assert_eq!(doc.field("tm"), Some("20240115 12:00:00"));
    }

    #[test]
    fn test_node_lookup() {
        let mut node = Node::new("route");
        node.attributes.insert("id".to_string(), "22".to_string());
        node.children.push(leaf("rtnm", "Clark"));
        assert_eq!(node.attribute("id"), Some("22"));
        assert_eq!(node.field("rtnm"), Some("Clark"));
        assert!(node.child("missing").is_none());
        assert!(!node.is_leaf());
    }

    #[test]
    fn test_fault_display() {
        assert_eq!(
            ServiceFault::new(Some("101".to_string()), "Invalid API key").to_string(),
            "[101] Invalid API key"
        );
        assert_eq!(
            ServiceFault::new(None, "No data found for parameter").to_string(),
            "No data found for parameter"
        );
    }

    #[test]
    fn test_json_serialization() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["root"]["name"], "bustime-response");
        assert_eq!(json["root"]["children"][1]["children"][0]["text"], "1462");
        assert!(json.get("faults").is_none());
    }
}
