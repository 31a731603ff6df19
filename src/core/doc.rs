//! Purpose: Canonical JSON document codec for data objects.
//! Exports: `encode_document`, `decode_document`, `DOC_FORMAT`, `MAX_DOC_LEN`.
//! Role: Conversion core behind `Representation::encode`/`decode`.
//! Invariants: Validation against the schema is strict in both directions.
//! Invariants: Documents larger than `MAX_DOC_LEN` are refused as `NoMemory`.
use serde_json::{Map, Value as Json, json};

use crate::core::error::{Error, ErrorKind};
use crate::core::object::{DataObject, Record, Value};
use crate::core::schema::{Kind, Schema, Template};

/// Envelope format revision this codec reads and writes.
pub const DOC_FORMAT: u64 = 1;

/// Hard cap on document text, input or produced. 16 MiB.
pub const MAX_DOC_LEN: usize = 16 * 1024 * 1024;

/// Serializes `object` as a compact document envelope:
/// `{"format":1,"meta":{...},"data":{...}}`.
///
/// The object must carry exactly the records the schema declares, with
/// exactly the declared fields and kinds.
pub fn encode_document(schema: &Schema, object: &DataObject) -> Result<String, Error> {
    let mut data = Map::new();
    for (name, record) in object.records() {
        let template = schema.template(name).ok_or_else(|| {
            Error::new(ErrorKind::InvalidRecordName)
                .with_message("record not declared by schema")
                .with_key(name)
        })?;
        data.insert(name.to_string(), record_to_json(name, template, record)?);
    }
    for name in schema.record_names() {
        if !data.contains_key(name) {
            return Err(Error::new(ErrorKind::KeyValueMismatch)
                .with_message("schema record missing from object")
                .with_key(name));
        }
    }

    let doc = json!({
        "format": DOC_FORMAT,
        "meta": {
            "model": schema.id(),
            "device": object.device_id(),
            "stamp": object.timestamp(),
            "ident": object.ident(),
        },
        "data": Json::Object(data),
    });
    let text = serde_json::to_string(&doc).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("document serialization failed")
            .with_source(err)
    })?;
    if text.len() > MAX_DOC_LEN {
        return Err(Error::new(ErrorKind::NoMemory).with_message("document exceeds max length"));
    }
    Ok(text)
}

fn record_to_json(path: &str, template: &Template, record: &Record) -> Result<Json, Error> {
    for key in record.keys() {
        if template.field(key).is_none() {
            return Err(Error::new(ErrorKind::KeyValueMismatch)
                .with_message("field not declared by template")
                .with_key(field_path(path, key)));
        }
    }
    let mut fields = Map::new();
    for (name, kind) in template.fields() {
        let field = field_path(path, name);
        let value = record.get(name).ok_or_else(|| {
            Error::new(ErrorKind::KeyValueMismatch)
                .with_message("field missing from object")
                .with_key(field.clone())
        })?;
        let encoded = match (kind, value) {
            (Kind::Text, Value::Text(text)) => Json::String(text.clone()),
            (Kind::List, Value::List(items)) => {
                Json::Array(items.iter().cloned().map(Json::String).collect())
            }
            (Kind::Record(inner), Value::Record(nested)) => {
                record_to_json(&field, inner, nested)?
            }
            (kind, value) => {
                return Err(Error::new(ErrorKind::InvalidDataType)
                    .with_message(format!("field is {}, not {}", value.kind_name(), kind.name()))
                    .with_key(field));
            }
        };
        fields.insert(name.to_string(), encoded);
    }
    Ok(Json::Object(fields))
}

/// Parses and validates a document envelope, rebuilding the data object
/// under the schema's templates.
pub fn decode_document(schema: &Schema, text: &str) -> Result<DataObject, Error> {
    if text.len() > MAX_DOC_LEN {
        return Err(Error::new(ErrorKind::NoMemory).with_message("document exceeds max length"));
    }
    let doc: Json = serde_json::from_str(text).map_err(|err| {
        Error::new(ErrorKind::InvalidDoc)
            .with_message("malformed document")
            .with_source(err)
    })?;
    let root = doc
        .as_object()
        .ok_or_else(|| invalid_doc("document is not an object"))?;

    let format = root
        .get("format")
        .and_then(Json::as_u64)
        .ok_or_else(|| invalid_doc("missing or non-numeric format"))?;
    if format != DOC_FORMAT {
        return Err(Error::new(ErrorKind::NotImplemented)
            .with_message(format!("unsupported document format {format}")));
    }

    let meta = root
        .get("meta")
        .and_then(Json::as_object)
        .ok_or_else(|| invalid_doc("missing meta"))?;
    let model = meta_text(meta, "model")?;
    if model != schema.id() {
        return Err(invalid_doc("meta.model does not match representation id")
            .with_hint(schema.id().to_string()));
    }
    let device = meta_text(meta, "device")?;
    let stamp = meta_text(meta, "stamp")?;
    let mut object = match meta.get("ident") {
        Some(Json::String(ident)) if !ident.is_empty() => {
            DataObject::with_ident(device, stamp, ident.as_str())?
        }
        Some(Json::String(_)) => return Err(invalid_doc("meta.ident is empty")),
        Some(_) => return Err(invalid_doc("meta.ident is not text")),
        None => DataObject::new(device, stamp)?,
    };

    let data = root
        .get("data")
        .and_then(Json::as_object)
        .ok_or_else(|| invalid_doc("missing data"))?;
    for (name, value) in data {
        let template = schema.template(name).ok_or_else(|| {
            Error::new(ErrorKind::InvalidRecordName)
                .with_message("record not declared by schema")
                .with_key(name.as_str())
        })?;
        object.add_record(name.as_str(), record_from_json(name, template, value)?)?;
    }
    for name in schema.record_names() {
        if object.record(name).is_err() {
            return Err(Error::new(ErrorKind::KeyValueMismatch)
                .with_message("schema record missing from document")
                .with_key(name));
        }
    }
    Ok(object)
}

fn record_from_json(path: &str, template: &Template, value: &Json) -> Result<Record, Error> {
    let fields = value.as_object().ok_or_else(|| {
        Error::new(ErrorKind::InvalidDataType)
            .with_message("record value is not a record")
            .with_key(path)
    })?;
    for key in fields.keys() {
        if template.field(key).is_none() {
            return Err(Error::new(ErrorKind::KeyValueMismatch)
                .with_message("field not declared by template")
                .with_key(field_path(path, key)));
        }
    }
    let mut record = Record::new();
    for (name, kind) in template.fields() {
        let field = field_path(path, name);
        let value = fields.get(name).ok_or_else(|| {
            Error::new(ErrorKind::KeyValueMismatch)
                .with_message("field missing from document")
                .with_key(field.clone())
        })?;
        match kind {
            Kind::Text => match value {
                Json::String(text) => record.put_text(name, text.clone())?,
                other => return Err(decoded_kind_error(field, other, kind)),
            },
            Kind::List => match value {
                Json::Array(items) => {
                    let mut values = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            Json::String(text) => values.push(text.clone()),
                            _ => {
                                return Err(Error::new(ErrorKind::InvalidDataType)
                                    .with_message("list element is not text")
                                    .with_key(field));
                            }
                        }
                    }
                    record.put_list(name, values)?;
                }
                other => return Err(decoded_kind_error(field, other, kind)),
            },
            Kind::Record(inner) => {
                record.put_record(name, record_from_json(&field, inner, value)?)?;
            }
        }
    }
    Ok(record)
}

fn meta_text<'a>(meta: &'a Map<String, Json>, key: &str) -> Result<&'a str, Error> {
    match meta.get(key) {
        Some(Json::String(text)) if !text.is_empty() => Ok(text),
        Some(Json::String(_)) => Err(invalid_doc(format!("meta.{key} is empty"))),
        Some(_) => Err(invalid_doc(format!("meta.{key} is not text"))),
        None => Err(invalid_doc(format!("missing meta.{key}"))),
    }
}

fn field_path(path: &str, name: &str) -> String {
    format!("{path}.{name}")
}

fn invalid_doc(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidDoc).with_message(message)
}

fn decoded_kind_error(field: String, value: &Json, kind: &Kind) -> Error {
    Error::new(ErrorKind::InvalidDataType)
        .with_message(format!("field is {}, not {}", json_kind(value), kind.name()))
        .with_key(field)
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "text",
        Json::Array(_) => "list",
        Json::Object(_) => "record",
    }
}
