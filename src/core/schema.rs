//! Purpose: Schema file model: representation id plus named record templates.
//! Exports: `Schema`, `Template`, `Kind`, `MAX_SCHEMA_DEPTH`.
//! Role: Validated declaration of the shape documents and data objects must follow.
//! Invariants: Every template level declares at least one field.
//! Invariants: Template nesting never exceeds `MAX_SCHEMA_DEPTH`.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::error::{Error, ErrorKind};

pub const MAX_SCHEMA_DEPTH: usize = 32;

/// Declared kind of a template field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Kind {
    Text,
    List,
    Record(Template),
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Text => "text",
            Kind::List => "list",
            Kind::Record(_) => "record",
        }
    }
}

/// Field layout one record must follow.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Template {
    fields: BTreeMap<String, Kind>,
}

impl Template {
    pub fn field(&self, name: &str) -> Option<&Kind> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Kind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), kind))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schema {
    id: String,
    records: BTreeMap<String, Template>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSchema {
    id: String,
    records: BTreeMap<String, RawTemplate>,
}

type RawTemplate = BTreeMap<String, RawKind>;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKind {
    Name(String),
    Nested(BTreeMap<String, RawKind>),
}

impl Schema {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            Error::new(ErrorKind::InvalidFilePath)
                .with_message("failed to read schema file")
                .with_path(path)
                .with_source(err)
        })?;
        Self::parse(&text).map_err(|err| err.with_path(path))
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        let raw: RawSchema = serde_json::from_str(text).map_err(|err| {
            Error::new(ErrorKind::InvalidSchema)
                .with_message("malformed schema")
                .with_source(err)
        })?;
        if raw.id.is_empty() {
            return Err(Error::new(ErrorKind::InvalidSchema).with_message("schema id is empty"));
        }
        if raw.records.is_empty() {
            return Err(
                Error::new(ErrorKind::InvalidSchema).with_message("schema declares no records")
            );
        }

        let mut records = BTreeMap::new();
        for (name, template) in raw.records {
            if name.is_empty() {
                return Err(
                    Error::new(ErrorKind::InvalidSchema).with_message("record name is empty")
                );
            }
            let template = build_template(&name, template, 1)?;
            records.insert(name, template);
        }

        Ok(Self {
            id: raw.id,
            records,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn template(&self, name: &str) -> Option<&Template> {
        self.records.get(name)
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &Template)> {
        self.records
            .iter()
            .map(|(name, template)| (name.as_str(), template))
    }

    pub fn record_names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

fn build_template(record: &str, raw: RawTemplate, depth: usize) -> Result<Template, Error> {
    if depth > MAX_SCHEMA_DEPTH {
        return Err(Error::new(ErrorKind::InvalidSchema)
            .with_message("schema nesting exceeds max depth")
            .with_key(record));
    }
    if raw.is_empty() {
        return Err(Error::new(ErrorKind::InvalidSchema)
            .with_message("record template is empty")
            .with_key(record));
    }

    let mut fields = BTreeMap::new();
    for (name, kind) in raw {
        if name.is_empty() {
            return Err(Error::new(ErrorKind::InvalidSchema)
                .with_message("field name is empty")
                .with_key(record));
        }
        let kind = match kind {
            RawKind::Name(kind_name) => match kind_name.as_str() {
                "text" => Kind::Text,
                "list" => Kind::List,
                other => {
                    return Err(Error::new(ErrorKind::InvalidSchema)
                        .with_message(format!("unknown field kind: {other}"))
                        .with_key(name));
                }
            },
            RawKind::Nested(nested) => Kind::Record(build_template(record, nested, depth + 1)?),
        };
        fields.insert(name, kind);
    }

    Ok(Template { fields })
}
