//! Purpose: Schema-bound representation, the conversion facade.
//! Exports: `Representation`.
//! Role: Owns a validated `Schema` and converts documents and objects
//! both ways; every public engine entry point lives here.
//! Notes: Calls are synchronous and hold no state between them.
use std::path::Path;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::doc;
use crate::core::error::{Error, ErrorKind};
use crate::core::object::{DataObject, Record};
use crate::core::schema::{Kind, Schema, Template};

#[derive(Clone, Debug)]
pub struct Representation {
    schema: Schema,
}

impl Representation {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self {
            schema: Schema::from_file(path)?,
        })
    }

    pub fn from_schema_text(text: &str) -> Result<Self, Error> {
        Ok(Self {
            schema: Schema::parse(text)?,
        })
    }

    pub fn id(&self) -> &str {
        self.schema.id()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Builds the configuration skeleton: one record per schema record,
    /// every field holding its empty placeholder, stamped with the
    /// introspection time.
    ///
    /// The skeleton always encodes cleanly through [`Representation::encode`].
    pub fn config_info(&self) -> Result<DataObject, Error> {
        let stamp = OffsetDateTime::now_utc().format(&Rfc3339).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("timestamp formatting failed")
                .with_source(err)
        })?;
        let mut object = DataObject::new(self.schema.id(), stamp)?;
        for (name, template) in self.schema.records() {
            object.add_record(name, skeleton_record(template)?)?;
        }
        Ok(object)
    }

    pub fn encode(&self, object: &DataObject) -> Result<String, Error> {
        doc::encode_document(&self.schema, object)
    }

    pub fn decode(&self, text: &str) -> Result<DataObject, Error> {
        doc::decode_document(&self.schema, text)
    }
}

fn skeleton_record(template: &Template) -> Result<Record, Error> {
    let mut record = Record::new();
    for (name, kind) in template.fields() {
        match kind {
            Kind::Text => record.put_text(name, "")?,
            Kind::List => record.put_list(name, Vec::new())?,
            Kind::Record(inner) => record.put_record(name, skeleton_record(inner)?)?,
        }
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::Representation;
    use crate::core::error::ErrorKind;
    use crate::core::object::{DataObject, Record};

    const ROBOT: &str = r#"{
        "id": "robot_arm",
        "records": {
            "Robot": {
                "speed": "text",
                "joints": "list",
                "status": { "mode": "text" }
            }
        }
    }"#;

    #[test]
    fn loads_from_file_and_reports_id() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(ROBOT.as_bytes()).expect("write");
        let rep = Representation::from_file(file.path()).expect("representation");
        assert_eq!(rep.id(), "robot_arm");
    }

    #[test]
    fn missing_file_is_invalid_file_path() {
        let err = Representation::from_file("/no/such/schema.json").expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::InvalidFilePath);
    }

    #[test]
    fn config_skeleton_mirrors_the_schema() {
        let rep = Representation::from_schema_text(ROBOT).expect("representation");
        let config = rep.config_info().expect("config");
        assert_eq!(config.device_id(), "robot_arm");
        let robot = config.record("Robot").expect("record");
        assert_eq!(robot.text("speed").expect("speed"), "");
        assert!(robot.list("joints").expect("joints").is_empty());
        assert_eq!(robot.record("status").expect("status").text("mode").expect("mode"), "");
    }

    #[test]
    fn config_skeleton_encodes_cleanly() {
        let rep = Representation::from_schema_text(ROBOT).expect("representation");
        let config = rep.config_info().expect("config");
        let doc = rep.encode(&config).expect("encode");
        let back = rep.decode(&doc).expect("decode");
        assert_eq!(back, config);
    }

    #[test]
    fn converts_both_ways() {
        let rep = Representation::from_schema_text(ROBOT).expect("representation");
        let mut record = Record::new();
        record.put_text("speed", "2.5").expect("speed");
        record
            .put_list("joints", vec!["j1".to_string()])
            .expect("joints");
        let mut status = Record::new();
        status.put_text("mode", "auto").expect("mode");
        record.put_record("status", status).expect("status");
        let mut object = DataObject::new("edge-01", "20260823T100000Z").expect("object");
        object.add_record("Robot", record).expect("record");

        let doc = rep.encode(&object).expect("encode");
        assert_eq!(rep.decode(&doc).expect("decode"), object);
    }
}
