use serde_json::{Map, Value};

use crate::model::{Equipment, ToRecord};

/// Schema version of the envelope itself, independent of device software.
pub const ENVELOPE_VERSION: u64 = 1;

/// A canonical record ready to be written: one device, one producer.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    name: String,
    producer: String,
    payload: Value,
}

impl Record {
    /// Snapshot `equipment` under `producer`.
    pub fn new(equipment: &Equipment, producer: impl Into<String>) -> Self {
        Self {
            name: equipment.name().to_string(),
            producer: producer.into(),
            payload: equipment.to_record(),
        }
    }

    /// Canonical device name, also the output file stem.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn producer(&self) -> &str {
        &self.producer
    }

    /// The equipment projection wrapped by the envelope.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// `{"host": {"name": .., "version": 1, <producer>: <payload>}}`
    pub fn to_envelope(&self) -> Value {
        let mut host = Map::new();
        host.insert("name".to_string(), Value::String(self.name.clone()));
        host.insert("version".to_string(), Value::from(ENVELOPE_VERSION));
        host.insert(self.producer.clone(), self.payload.clone());

        let mut root = Map::new();
        root.insert("host".to_string(), Value::Object(host));
        Value::Object(root)
    }
}
