//! Element schema for HIVE documents
//!
//! Maps each element name to the child elements and attributes it accepts.
//! The synthetic [`ROOT_ELEMENT`](crate::tags::ROOT_ELEMENT) entry lists what
//! may appear at the top level of a document.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Children and attributes allowed for one element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl SchemaEntry {
    pub fn new(children: &[&str], attributes: &[&str]) -> Self {
        Self {
            children: children.iter().map(|s| s.to_string()).collect(),
            attributes: attributes.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Lookup table from element name to [`SchemaEntry`]
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    elements: HashMap<String, SchemaEntry>,
}

const CONTENT: &[&str] = &[
    "metaParam",
    "object",
    "encrypted",
    "export",
    "system",
    "file",
    "platform",
    "param",
    "unclassified",
    "confidential",
    "secret",
    "topsecret",
    "script",
    "playback",
];

const MARKING: &[&str] = &[
    "controlSystems",
    "isFGI",
    "isNATO",
    "foreignGovernments",
    "dissemination",
    "proprietary",
    "citation",
];

const CITATION_ATTRIBUTES: &[&str] = &[
    "lastName",
    "firstName",
    "version",
    "organization",
    "titleOfArticle",
    "title",
    "city",
    "publisher",
    "pagesBegin",
    "pagesEnd",
    "medium",
    "volume",
    "issue",
    "year",
    "exportControlled",
    "destructionNotice",
    "classificationReason",
    "derivedFrom",
    "declassification",
    "distributionStatementDate",
    "distributionStatementReleasingAuthorityMailingAddress",
    "distributionStatement",
    "distributionStatementReason",
    "classificationOfDocument",
    "classificationOfTitle",
];

impl SchemaRegistry {
    /// An empty registry
    pub fn empty() -> Self {
        Self::default()
    }

    /// The elements understood by the HIVE loader
    pub fn hive() -> Self {
        let mut registry = Self::empty();
        registry.insert("root", SchemaEntry::new(&["hive"], &[]));
        registry.insert("hive", SchemaEntry::new(CONTENT, &[]));
        registry.insert(
            "object",
            SchemaEntry::new(CONTENT, &["id", "type", "entityID", "append", "serialize"]),
        );
        registry.insert(
            "encrypted",
            SchemaEntry::new(&["encryptionMethod", "cipherData"], &[]),
        );
        registry.insert("param", SchemaEntry::new(&[], &["name", "value"]));
        registry.insert("file", SchemaEntry::new(&[], &["name"]));
        for marking in ["unclassified", "confidential", "secret", "topsecret"] {
            registry.insert(marking, SchemaEntry::new(MARKING, &[]));
        }
        registry.insert("citation", SchemaEntry::new(&[], CITATION_ATTRIBUTES));
        registry
    }

    /// Add or replace an element
    pub fn insert(&mut self, element: impl Into<String>, entry: SchemaEntry) {
        self.elements.insert(element.into(), entry);
    }

    /// Add or replace every element of `overrides`
    pub fn extend(&mut self, overrides: impl IntoIterator<Item = (String, SchemaEntry)>) {
        self.elements.extend(overrides);
    }

    pub fn get(&self, element: &str) -> Option<&SchemaEntry> {
        self.elements.get(element)
    }

    /// Child element names, empty for unknown elements
    pub fn children(&self, element: &str) -> &[String] {
        self.get(element).map(|e| e.children.as_slice()).unwrap_or_default()
    }

    /// Attribute names, empty for unknown elements
    pub fn attributes(&self, element: &str) -> &[String] {
        self.get(element).map(|e| e.attributes.as_slice()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
