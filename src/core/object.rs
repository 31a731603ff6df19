//! Purpose: Typed in-memory structured object graph.
//! Exports: `DataObject`, `Record`, `Value`.
//! Role: The data side of every representation conversion.
//! Invariants: Keys and identity strings are never empty.
//! Invariants: Inserts reject key collisions instead of overwriting.
use std::collections::BTreeMap;

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Text(String),
    List(Vec<String>),
    Record(Record),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }
}

/// One named level of the object graph: keys mapped to typed values.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Record {
    entries: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_text(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), Error> {
        self.insert(key, Value::Text(value.into()))
    }

    pub fn put_list(&mut self, key: impl Into<String>, values: Vec<String>) -> Result<(), Error> {
        self.insert(key, Value::List(values))
    }

    pub fn put_record(&mut self, key: impl Into<String>, record: Record) -> Result<(), Error> {
        self.insert(key, Value::Record(record))
    }

    fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<(), Error> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::new(ErrorKind::InvalidParam).with_message("key is empty"));
        }
        if self.entries.contains_key(&key) {
            return Err(Error::new(ErrorKind::KeyAlreadyExist)
                .with_message("key already present")
                .with_key(key));
        }
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn text(&self, key: &str) -> Result<&str, Error> {
        match self.value(key)? {
            Value::Text(text) => Ok(text),
            other => Err(wrong_kind(key, other, "text")),
        }
    }

    pub fn list(&self, key: &str) -> Result<&[String], Error> {
        match self.value(key)? {
            Value::List(values) => Ok(values),
            other => Err(wrong_kind(key, other, "list")),
        }
    }

    pub fn record(&self, key: &str) -> Result<&Record, Error> {
        match self.value(key)? {
            Value::Record(record) => Ok(record),
            other => Err(wrong_kind(key, other, "record")),
        }
    }

    fn value(&self, key: &str) -> Result<&Value, Error> {
        self.entries.get(key).ok_or_else(|| {
            Error::new(ErrorKind::KeyNotExist)
                .with_message("no such key")
                .with_key(key)
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn wrong_kind(key: &str, actual: &Value, wanted: &str) -> Error {
    Error::new(ErrorKind::InvalidDataType)
        .with_message(format!("field is {}, not {wanted}", actual.kind_name()))
        .with_key(key)
}

/// Structured data object: identity plus named records.
///
/// `ident` defaults to `"{device_id}_{timestamp}"` when not supplied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataObject {
    device_id: String,
    timestamp: String,
    ident: String,
    records: BTreeMap<String, Record>,
}

impl DataObject {
    pub fn new(
        device_id: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Result<Self, Error> {
        let device_id = device_id.into();
        let timestamp = timestamp.into();
        let ident = format!("{device_id}_{timestamp}");
        Self::build(device_id, timestamp, ident)
    }

    pub fn with_ident(
        device_id: impl Into<String>,
        timestamp: impl Into<String>,
        ident: impl Into<String>,
    ) -> Result<Self, Error> {
        Self::build(device_id.into(), timestamp.into(), ident.into())
    }

    fn build(device_id: String, timestamp: String, ident: String) -> Result<Self, Error> {
        if device_id.is_empty() {
            return Err(Error::new(ErrorKind::InvalidParam).with_message("device id is empty"));
        }
        if timestamp.is_empty() {
            return Err(Error::new(ErrorKind::InvalidParam).with_message("timestamp is empty"));
        }
        if ident.is_empty() {
            return Err(Error::new(ErrorKind::InvalidParam).with_message("ident is empty"));
        }
        Ok(Self {
            device_id,
            timestamp,
            ident,
            records: BTreeMap::new(),
        })
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn add_record(&mut self, name: impl Into<String>, record: Record) -> Result<(), Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::new(ErrorKind::InvalidParam).with_message("record name is empty"));
        }
        if self.records.contains_key(&name) {
            return Err(Error::new(ErrorKind::KeyAlreadyExist)
                .with_message("record already present")
                .with_key(name));
        }
        self.records.insert(name, record);
        Ok(())
    }

    pub fn record(&self, name: &str) -> Result<&Record, Error> {
        self.records.get(name).ok_or_else(|| {
            Error::new(ErrorKind::KeyNotExist)
                .with_message("no such record")
                .with_key(name)
        })
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.records
            .iter()
            .map(|(name, record)| (name.as_str(), record))
    }

    pub fn record_names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
