//! Namespaced tour ids
//!
//! A document tour is registered as `<namespace>:<document>:<definition>`.
//! The document segment is escaped (`%` as `%25`, `:` as `%3A`) so that the
//! prefix `<namespace>:<document>:` matches the tours of exactly one
//! document.

use std::fmt;

/// Catalog id of one (document, definition) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacedTourId {
    namespace: String,
    document_id: String,
    definition_id: String,
}

impl NamespacedTourId {
    /// Create id for a definition of a document
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        document_id: impl Into<String>,
        definition_id: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            document_id: document_id.into(),
            definition_id: definition_id.into(),
        }
    }

    /// Prefix shared by every tour of `document_id`
    #[must_use]
    pub fn document_prefix(namespace: &str, document_id: &str) -> String {
        format!("{namespace}:{}:", escape(document_id))
    }

    /// Whether `id` is a tour of `document_id`
    #[must_use]
    pub fn belongs_to(id: &str, namespace: &str, document_id: &str) -> bool {
        id.starts_with(&Self::document_prefix(namespace, document_id))
    }

    /// Recover the parts of an id built under `namespace`
    #[must_use]
    pub fn parse(namespace: &str, id: &str) -> Option<Self> {
        let rest = id.strip_prefix(namespace)?.strip_prefix(':')?;
        let (document, definition) = rest.split_once(':')?;
        Some(Self::new(namespace, unescape(document)?, definition))
    }

    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[inline]
    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    #[inline]
    #[must_use]
    pub fn definition_id(&self) -> &str {
        &self.definition_id
    }
}

impl fmt::Display for NamespacedTourId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            Self::document_prefix(&self.namespace, &self.document_id),
            self.definition_id
        )
    }
}

fn escape(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(segment: &str) -> Option<String> {
    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let code = rest.get(pos + 1..pos + 3)?;
        match code {
            "25" => out.push('%'),
            "3A" => out.push(':'),
            _ => return None,
        }
        rest = &rest[pos + 3..];
    }
    out.push_str(rest);
    Some(out)
}
