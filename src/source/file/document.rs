//! Labeled two-level documents
//!
//! A document maps labels to sections, and each section maps keys to a scalar
//! or a list of scalars:
//!
//! ```yaml
//! base:
//!   image: alpine
//! prod:
//!   <<: base
//!   replicas: 3
//!   hosts: [a, b]
//! ```
//!
//! A document without labels (top-level keys holding scalars) is read as the
//! single label `default`.

use crate::data::Data;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Label used for documents without labels, and preferred when no label is requested.
pub const DEFAULT_LABEL: &str = "default";

/// Reserved key naming the label a section inherits from.
pub const INHERIT_KEY: &str = "<<";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("no file given")]
    NoPath,

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to parse yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unable to parse toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("only 2 levels of nesting allowed, `{label}.{key}` holds a nested value")]
    NestingDepthExceeded { label: String, key: String },

    #[error("label `{label}` inherits from unknown label `{parent}`")]
    UnknownParent { label: String, parent: String },

    #[error("cyclic inheritance: {}", .0.join(" -> "))]
    CyclicInheritance(Vec<String>),
}

/// On-disk syntax of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML, which also covers JSON.
    Yaml,
    Toml,
}

impl Format {
    /// Pick the format from a file extension. Anything but `.toml` is YAML.
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Format::Toml,
            _ => Format::Yaml,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Section {
    parent: Option<String>,
    values: Data,
}

/// A parsed document: sections by label, plus the labels in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    labels: Vec<String>,
    sections: HashMap<String, Section>,
}

impl Document {
    pub fn parse(body: &str, format: Format) -> Result<Self, DocumentError> {
        let root: Value = match format {
            Format::Yaml => serde_yaml::from_str(body)?,
            Format::Toml => from_toml(toml::from_str(body)?),
        };
        Self::from_value(root)
    }

    fn from_value(root: Value) -> Result<Self, DocumentError> {
        let mapping = match root {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            Value::Tagged(tagged) => return Self::from_value(tagged.value),
            _ => return Err(DocumentError::Malformed("top level must be a mapping".into())),
        };

        let mut document = Self::default();

        // Labeled only if every top-level value is a section (or empty).
        let labeled = mapping.values().all(|v| matches!(v, Value::Mapping(_) | Value::Null));
        if !labeled {
            let section = Section::from_mapping(DEFAULT_LABEL, mapping)?;
            document.insert(DEFAULT_LABEL.to_string(), section);
            return Ok(document);
        }

        for (label, value) in mapping {
            let label = key_string(&label)?;
            let section = match value {
                Value::Mapping(entries) => Section::from_mapping(&label, entries)?,
                _ => Section::default(),
            };
            document.insert(label, section);
        }
        Ok(document)
    }

    fn insert(&mut self, label: String, section: Section) {
        self.labels.push(label.clone());
        self.sections.insert(label, section);
    }

    /// Labels in declaration order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Choose the label to use, in order of preference:
    ///
    /// 1. `requested`, if declared
    /// 2. `fallback` when nothing was requested, if declared
    /// 3. `default`, if declared
    /// 4. the first declared label
    ///
    /// Returns `None` only for a document without labels.
    pub fn select_label<'a>(&'a self, requested: &'a str, fallback: &'a str) -> Option<&'a str> {
        if self.has_label(requested) {
            Some(requested)
        } else if requested.is_empty() && self.has_label(fallback) {
            Some(fallback)
        } else if self.has_label(DEFAULT_LABEL) {
            Some(DEFAULT_LABEL)
        } else {
            self.labels.first().map(String::as_str)
        }
    }

    /// Resolve one label with its inheritance chain applied.
    ///
    /// An undeclared label resolves to empty data.
    pub fn resolve(&self, label: &str) -> Result<Data, DocumentError> {
        let mut chain = Vec::new();
        self.resolve_chain(label, &mut chain)
    }

    fn resolve_chain(&self, label: &str, chain: &mut Vec<String>) -> Result<Data, DocumentError> {
        if chain.iter().any(|l| l == label) {
            let mut cycle = chain.clone();
            cycle.push(label.to_string());
            return Err(DocumentError::CyclicInheritance(cycle));
        }
        let Some(section) = self.sections.get(label) else {
            return Ok(Data::new());
        };

        chain.push(label.to_string());
        let mut resolved = match &section.parent {
            Some(parent) if self.sections.contains_key(parent) => {
                self.resolve_chain(parent, chain)?
            }
            Some(parent) => {
                return Err(DocumentError::UnknownParent {
                    label: label.to_string(),
                    parent: parent.clone(),
                })
            }
            None => Data::new(),
        };
        chain.pop();

        resolved.merge(&section.values);
        Ok(resolved)
    }

    /// Resolve every label, in declaration order.
    pub fn resolve_all(&self) -> Result<Vec<(String, Data)>, DocumentError> {
        self.labels.iter().map(|label| Ok((label.clone(), self.resolve(label)?))).collect()
    }

    /// Resolve all labels, then return the data of the label selected for `label`.
    pub fn data_for(&self, label: &str) -> Result<Data, DocumentError> {
        let resolved = self.resolve_all()?;
        let Some(selected) = self.select_label(label, label) else {
            return Ok(Data::new());
        };
        tracing::debug!("Selected label {:?} (requested {:?})", selected, label);

        Ok(resolved.into_iter().find(|(l, _)| l == selected).map(|(_, d)| d).unwrap_or_default())
    }
}

impl Section {
    fn from_mapping(label: &str, mapping: Mapping) -> Result<Self, DocumentError> {
        let mut section = Section::default();
        let mut inline_base = Data::new();

        for (key, value) in mapping {
            let key = key_string(&key)?;
            if key != INHERIT_KEY {
                section.values.set(key.clone(), values_of(label, &key, value)?);
                continue;
            }

            match value {
                Value::Null => {}
                // `<<: *anchor` arrives here with the alias already expanded
                Value::Mapping(base) => {
                    for (base_key, base_value) in base {
                        let base_key = key_string(&base_key)?;
                        inline_base.set(base_key.clone(), values_of(label, &base_key, base_value)?);
                    }
                }
                other => match scalar_string(&other) {
                    Some(parent) => section.parent = Some(parent),
                    None => {
                        return Err(DocumentError::Malformed(format!(
                            "`{INHERIT_KEY}` in label `{label}` must name a label"
                        )))
                    }
                },
            }
        }

        inline_base.merge(&section.values);
        section.values = inline_base;
        Ok(section)
    }
}

/// Convert a TOML tree, keeping table order. Datetimes become their TOML text.
fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Value::Number(f.into()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table.into_iter().map(|(k, v)| (Value::String(k), from_toml(v))).collect(),
        ),
    }
}

fn key_string(key: &Value) -> Result<String, DocumentError> {
    match key {
        Value::Null => Err(DocumentError::Malformed("empty key".into())),
        _ => scalar_string(key)
            .ok_or_else(|| DocumentError::Malformed(format!("unsupported key {key:?}"))),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn values_of(label: &str, key: &str, value: Value) -> Result<Vec<String>, DocumentError> {
    let too_deep = || DocumentError::NestingDepthExceeded {
        label: label.to_string(),
        key: key.to_string(),
    };

    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => {
            items.iter().map(|item| scalar_string(item).ok_or_else(too_deep)).collect()
        }
        Value::Tagged(tagged) => values_of(label, key, tagged.value),
        other => scalar_string(&other).map(|s| vec![s]).ok_or_else(too_deep),
    }
}
