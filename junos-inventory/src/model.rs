//! Canonical, vendor-agnostic equipment model.
//!
//! Every entity projects itself onto a plain JSON object through
//! [`ToRecord`]; that projection is what ends up in the written record.

use serde_json::{json, Map, Value};

use crate::error::ExtractError;

/// Projection of a model entity onto a plain JSON mapping.
pub trait ToRecord {
    fn to_record(&self) -> Value;
}

/// Tunnel endpoints declared on an interface or one of its units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tunnel {
    pub source: Option<String>,
    pub destination: Option<String>,
}

/// Logical sub-interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unit {
    pub unit: String,
    pub description: Option<String>,
    pub vlanid: Option<String>,
    pub address: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    /// Interface identifier as given by the source, e.g. `ge-0/1/0`.
    pub name: String,
    /// Aggregated-ethernet bundle this interface is a member of.
    pub bundle: Option<String>,
    pub description: Option<String>,
    /// Plain or flexible 802.1Q tagging declared.
    pub vlantagging: bool,
    pub tunneldict: Vec<Tunnel>,
    /// Units in source order; empty, never absent.
    pub unitdict: Vec<Unit>,
    /// Marked inactive or disabled in the configuration.
    pub inactive: bool,
}

/// One BGP session, i.e. one neighbor inside one group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BgpPeering {
    pub peer_type: Option<String>,
    pub group: Option<String>,
    pub remote_address: Option<String>,
    /// Inherited from the enclosing group.
    pub local_address: Option<String>,
    pub description: Option<String>,
    /// Kept as text so 4-byte and asdot notations survive unchanged.
    pub as_number: Option<String>,
}

/// A router with its interfaces, BGP sessions and optional chassis facts.
///
/// Built through [`RouterBuilder`], which refuses an empty name.
#[derive(Debug, Clone, PartialEq)]
pub struct Router {
    name: String,
    interfaces: Vec<Interface>,
    bgp_peerings: Vec<BgpPeering>,
    hardware: Option<Map<String, Value>>,
    model: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    name: String,
    interfaces: Vec<Interface>,
}

/// Any piece of inventoried equipment.
#[derive(Debug, Clone, PartialEq)]
pub enum Equipment {
    Router(Router),
    Switch(Switch),
}

#[derive(Debug, Default)]
pub struct RouterBuilder {
    name: String,
    interfaces: Vec<Interface>,
    bgp_peerings: Vec<BgpPeering>,
    hardware: Option<Map<String, Value>>,
    model: Option<String>,
    version: Option<String>,
}

impl RouterBuilder {
    pub fn interfaces(mut self, interfaces: Vec<Interface>) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn bgp_peerings(mut self, peerings: Vec<BgpPeering>) -> Self {
        self.bgp_peerings = peerings;
        self
    }

    /// Attach chassis inventory. The model is taken from its top-level
    /// `description` when present.
    pub fn hardware(mut self, hardware: Option<Map<String, Value>>) -> Self {
        self.model = hardware
            .as_ref()
            .and_then(|h| h.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string);
        self.hardware = hardware.filter(|h| !h.is_empty());
        self
    }

    pub fn version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn build(self) -> Result<Router, ExtractError> {
        if self.name.trim().is_empty() {
            return Err(ExtractError::EmptyName { raw: self.name });
        }
        Ok(Router {
            name: self.name,
            interfaces: self.interfaces,
            bgp_peerings: self.bgp_peerings,
            hardware: self.hardware,
            model: self.model,
            version: self.version,
        })
    }
}

impl Router {
    pub fn builder(name: impl Into<String>) -> RouterBuilder {
        RouterBuilder {
            name: name.into(),
            ..RouterBuilder::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn bgp_peerings(&self) -> &[BgpPeering] {
        &self.bgp_peerings
    }

    pub fn hardware(&self) -> Option<&Map<String, Value>> {
        self.hardware.as_ref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl Switch {
    pub fn new(name: impl Into<String>, interfaces: Vec<Interface>) -> Result<Self, ExtractError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ExtractError::EmptyName { raw: name });
        }
        Ok(Self { name, interfaces })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }
}

impl Equipment {
    pub fn name(&self) -> &str {
        match self {
            Equipment::Router(router) => router.name(),
            Equipment::Switch(switch) => switch.name(),
        }
    }

    pub fn interfaces(&self) -> &[Interface] {
        match self {
            Equipment::Router(router) => router.interfaces(),
            Equipment::Switch(switch) => switch.interfaces(),
        }
    }
}

fn records<T: ToRecord>(items: &[T]) -> Value {
    Value::Array(items.iter().map(ToRecord::to_record).collect())
}

impl ToRecord for Tunnel {
    fn to_record(&self) -> Value {
        json!({
            "source": self.source,
            "destination": self.destination,
        })
    }
}

impl ToRecord for Unit {
    fn to_record(&self) -> Value {
        json!({
            "unit": self.unit,
            "description": self.description,
            "vlanid": self.vlanid,
            "address": self.address,
        })
    }
}

impl ToRecord for Interface {
    fn to_record(&self) -> Value {
        json!({
            "name": self.name,
            "bundle": self.bundle,
            "description": self.description,
            "vlantagging": self.vlantagging,
            "tunnels": records(&self.tunneldict),
            "units": records(&self.unitdict),
            "inactive": self.inactive,
        })
    }
}

impl ToRecord for BgpPeering {
    fn to_record(&self) -> Value {
        json!({
            "type": self.peer_type,
            "group": self.group,
            "remote_address": self.remote_address,
            "local_address": self.local_address,
            "description": self.description,
            "as_number": self.as_number,
        })
    }
}

impl ToRecord for Router {
    fn to_record(&self) -> Value {
        let mut record = json!({
            "name": self.name,
            "interfaces": records(&self.interfaces),
            "bgp_peerings": records(&self.bgp_peerings),
            "model": self.model,
            "version": self.version,
        });
        if let (Some(hardware), Value::Object(map)) = (&self.hardware, &mut record) {
            map.insert("hardware".to_string(), Value::Object(hardware.clone()));
        }
        record
    }
}

impl ToRecord for Switch {
    fn to_record(&self) -> Value {
        json!({
            "name": self.name,
            "interfaces": records(&self.interfaces),
        })
    }
}

impl ToRecord for Equipment {
    fn to_record(&self) -> Value {
        match self {
            Equipment::Router(router) => router.to_record(),
            Equipment::Switch(switch) => switch.to_record(),
        }
    }
}
