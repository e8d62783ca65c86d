//! Vendor extractors mapping raw configuration trees onto the canonical model.
//!
//! One [`VendorExtractor`] exists per (vendor, encoding) pair. Extraction of
//! optional substructure never fails: absent parts yield empty lists, `None`
//! or `false`. Only the device identity is required.

pub mod restconf;
mod rules;
pub mod xml;

use conf_tree_core::{find, parse, to_value, XmlNode};
use serde_json::{Map, Value};

use crate::error::ExtractError;
use crate::model::{BgpPeering, Interface, Router};

pub use restconf::{parse_bgp_sessions, parse_interfaces, JunosRestconf};
pub use xml::JunosXml;

/// An already-parsed configuration tree in one of the supported encodings.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTree {
    /// Element tree from a `display xml` export or NETCONF reply.
    Xml(XmlNode),
    /// JSON tree from a RESTCONF response.
    Json(Value),
}

impl RawTree {
    /// Parse raw bytes, choosing the encoding from the first significant
    /// character: `<` for XML, `{` or `[` for JSON.
    ///
    /// Leading text before the first `<` (a command echo from an interactive
    /// session) is tolerated.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractError> {
        let first = bytes.iter().copied().find(|b| !b.is_ascii_whitespace());
        match first {
            Some(b'{') | Some(b'[') => serde_json::from_slice(bytes)
                .map(RawTree::Json)
                .map_err(|err| ExtractError::MalformedInput(format!("invalid JSON: {err}"))),
            Some(_) if bytes.contains(&b'<') => parse(bytes)
                .map(RawTree::Xml)
                .map_err(|err| ExtractError::MalformedInput(err.to_string())),
            Some(_) => Err(ExtractError::MalformedInput(
                "input is neither XML nor JSON".to_string(),
            )),
            None => Err(ExtractError::MalformedInput("input is empty".to_string())),
        }
    }

    /// Short label of the encoding for logs and summaries.
    pub fn encoding(&self) -> &'static str {
        match self {
            RawTree::Xml(_) => "xml",
            RawTree::Json(_) => "json",
        }
    }
}

/// Capability set shared by all vendor extractors.
pub trait VendorExtractor: Sync {
    /// Stable identifier, e.g. `junos-xml`.
    fn name(&self) -> &'static str;

    /// Key under which the record payload is stored in the envelope.
    fn producer(&self) -> &'static str;

    /// Cheap structural check for this vendor's marker node.
    fn is_vendor(&self, raw: &RawTree) -> bool;

    /// Canonical device name. Fails when no identity can be located.
    fn extract_hostname(&self, raw: &RawTree) -> Result<String, ExtractError>;

    /// Device software or configuration schema version.
    fn extract_version(&self, raw: &RawTree) -> Option<String>;

    fn extract_interfaces(&self, raw: &RawTree) -> Vec<Interface>;

    fn extract_bgp_peerings(&self, raw: &RawTree) -> Vec<BgpPeering>;

    /// Chassis inventory copied verbatim from a separate chassis fetch.
    fn extract_hardware(&self, chassis: &RawTree) -> Option<Map<String, Value>> {
        chassis_inventory(chassis)
    }

    /// Build a complete router record from one configuration snapshot.
    fn extract_router(
        &self,
        raw: &RawTree,
        chassis: Option<&RawTree>,
    ) -> Result<Router, ExtractError> {
        let name = self.extract_hostname(raw)?;
        Router::builder(name)
            .version(self.extract_version(raw))
            .interfaces(self.extract_interfaces(raw))
            .bgp_peerings(self.extract_bgp_peerings(raw))
            .hardware(chassis.and_then(|c| self.extract_hardware(c)))
            .build()
    }
}

/// Extractors in dispatch order.
static EXTRACTORS: [&dyn VendorExtractor; 2] = [&JunosXml, &JunosRestconf];

/// All registered extractors, in the order [`detect_extractor`] tries them.
pub fn extractors() -> &'static [&'static dyn VendorExtractor] {
    &EXTRACTORS
}

/// First extractor whose marker predicate matches `raw`.
///
/// Tried in order: JunOS XML, then JunOS RESTCONF.
pub fn detect_extractor(raw: &RawTree) -> Option<&'static dyn VendorExtractor> {
    extractors().iter().copied().find(|e| e.is_vendor(raw))
}

/// Extract a router with whichever extractor recognises `raw`.
pub fn extract(
    raw: &RawTree,
    chassis: Option<&RawTree>,
) -> Result<(Router, &'static dyn VendorExtractor), ExtractError> {
    let extractor = detect_extractor(raw).ok_or(ExtractError::UnsupportedVendor)?;
    let router = extractor.extract_router(raw, chassis)?;
    Ok((router, extractor))
}

/// Locate the `chassis` node of a chassis-inventory reply in either encoding.
fn chassis_inventory(chassis: &RawTree) -> Option<Map<String, Value>> {
    let node = match chassis {
        RawTree::Xml(root) => {
            let inventory = if root.tag == "chassis-inventory" {
                root
            } else {
                root.find_descendant("chassis-inventory")?
            };
            to_value(inventory.get_child("chassis")?)
        }
        RawTree::Json(tree) => find("junos-rpc:output.chassis-inventory.chassis", tree)
            .or_else(|| find("chassis-inventory.chassis", tree))?
            .clone(),
    };
    match node {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{detect_extractor, extract, RawTree};
    use crate::error::ExtractError;

    #[test]
    fn from_bytes_picks_encoding() {
        let xml = RawTree::from_bytes(b"  <rpc-reply><configuration/></rpc-reply>").expect("xml");
        assert_eq!(xml.encoding(), "xml");
        let json = RawTree::from_bytes(b"\n{\"a\": 1}").expect("json");
        assert_eq!(json, RawTree::Json(json!({"a": 1})));
    }

    #[test]
    fn from_bytes_reports_malformed_input() {
        for raw in [&b""[..], b"plain text", b"{\"unterminated\": ", b"<a><b></a>"] {
            assert!(
                matches!(
                    RawTree::from_bytes(raw),
                    Err(ExtractError::MalformedInput(_))
                ),
                "input {:?}",
                String::from_utf8_lossy(raw)
            );
        }
    }

    #[test]
    fn dispatch_tries_xml_then_restconf() {
        let xml = RawTree::from_bytes(b"<rpc-reply><configuration/></rpc-reply>").expect("xml");
        assert_eq!(detect_extractor(&xml).map(|e| e.name()), Some("junos-xml"));

        let restconf = RawTree::Json(json!({
            "tailf-ncs:device": {"config": {"junos:configuration": {}}}
        }));
        assert_eq!(
            detect_extractor(&restconf).map(|e| e.name()),
            Some("junos-restconf")
        );

        let arista = RawTree::Json(json!({
            "tailf-ncs:device": {"config": {"tailf-ned-arista-dcs:logging": {}}}
        }));
        assert!(detect_extractor(&arista).is_none());
        assert!(matches!(
            extract(&arista, None),
            Err(ExtractError::UnsupportedVendor)
        ));
    }
}
