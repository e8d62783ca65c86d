//! JunOS `show configuration | display xml` exports.

use conf_tree_core::XmlNode;

use super::rules::{
    clean, is_physical_interface, BUNDLE_PATHS, DISABLE_MARKER, VLAN_TAGGING_MARKERS,
};
use super::{RawTree, VendorExtractor};
use crate::error::ExtractError;
use crate::hostname::normalize_hostname;
use crate::model::{BgpPeering, Interface, Tunnel, Unit};

/// Extractor for XML configuration exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct JunosXml;

const ENCODING: &str = "JunOS XML";

impl VendorExtractor for JunosXml {
    fn name(&self) -> &'static str {
        "junos-xml"
    }

    fn producer(&self) -> &'static str {
        "juniper_conf"
    }

    fn is_vendor(&self, raw: &RawTree) -> bool {
        matches!(raw, RawTree::Xml(root) if configuration(root).is_some())
    }

    /// `system/host-name`, or else the first `host-name` anywhere in the
    /// document; dual routing-engine configs keep it under `groups/re0`.
    fn extract_hostname(&self, raw: &RawTree) -> Result<String, ExtractError> {
        let missing = ExtractError::MissingField {
            field: "host-name",
            encoding: ENCODING,
        };
        let RawTree::Xml(root) = raw else {
            return Err(missing);
        };
        let config = configuration(root).unwrap_or(root);
        let host = clean(config.get_text(&["system", "host-name"]))
            .or_else(|| clean(root.find_descendant("host-name")?.text.as_deref()))
            .ok_or(missing)?;
        Ok(normalize_hostname(&host))
    }

    fn extract_version(&self, raw: &RawTree) -> Option<String> {
        let RawTree::Xml(root) = raw else {
            return None;
        };
        clean(configuration(root)?.get_text(&["version"]))
    }

    fn extract_interfaces(&self, raw: &RawTree) -> Vec<Interface> {
        let Some(interfaces) = section(raw, &["interfaces"]) else {
            return Vec::new();
        };
        interfaces
            .get_children("interface")
            .into_iter()
            .filter_map(parse_interface)
            .collect()
    }

    fn extract_bgp_peerings(&self, raw: &RawTree) -> Vec<BgpPeering> {
        let Some(bgp) = section(raw, &["protocols", "bgp"]) else {
            return Vec::new();
        };
        bgp.get_children("group")
            .into_iter()
            .flat_map(parse_group)
            .collect()
    }
}

/// The `configuration` element, either as root or directly below `rpc-reply`.
fn configuration(root: &XmlNode) -> Option<&XmlNode> {
    if root.tag == "configuration" {
        return Some(root);
    }
    root.get_child("configuration")
}

fn section<'a>(raw: &'a RawTree, path: &[&str]) -> Option<&'a XmlNode> {
    let RawTree::Xml(root) = raw else {
        return None;
    };
    configuration(root)?.get_path(path)
}

fn parse_interface(node: &XmlNode) -> Option<Interface> {
    let name = clean(node.get_text(&["name"]))?;
    if !is_physical_interface(&name) {
        return None;
    }

    let units = node.get_children("unit");
    let mut tunnels: Vec<Tunnel> = node.get_child("tunnel").map(parse_tunnel).into_iter().collect();
    tunnels.extend(units.iter().filter_map(|u| u.get_child("tunnel")).map(parse_tunnel));

    Some(Interface {
        name,
        bundle: BUNDLE_PATHS
            .iter()
            .find_map(|path| clean(node.get_text(path))),
        description: clean(node.get_text(&["description"])),
        vlantagging: VLAN_TAGGING_MARKERS.iter().any(|m| node.has_child(m)),
        tunneldict: tunnels,
        unitdict: units.into_iter().filter_map(parse_unit).collect(),
        inactive: is_inactive(node),
    })
}

fn parse_unit(node: &XmlNode) -> Option<Unit> {
    Some(Unit {
        unit: clean(node.get_text(&["name"]))?,
        description: clean(node.get_text(&["description"])),
        vlanid: clean(node.get_text(&["vlan-id"])),
        address: unit_addresses(node),
    })
}

/// Every `family/<afi>/address/name` in document order, plus any address
/// declared directly on the unit.
fn unit_addresses(unit: &XmlNode) -> Vec<String> {
    let families = unit
        .get_children("family")
        .into_iter()
        .flat_map(|family| family.children.iter());
    families
        .chain(std::iter::once(unit))
        .flat_map(|afi| afi.get_children("address"))
        .filter_map(|address| clean(address.get_text(&["name"])))
        .collect()
}

fn parse_tunnel(node: &XmlNode) -> Tunnel {
    Tunnel {
        source: clean(node.get_text(&["source"])),
        destination: clean(node.get_text(&["destination"])),
    }
}

/// JunOS marks deactivated statements with `inactive="inactive"`.
fn is_inactive(node: &XmlNode) -> bool {
    node.attribute("inactive") == Some("inactive") || node.has_child(DISABLE_MARKER)
}

fn parse_group(group: &XmlNode) -> Vec<BgpPeering> {
    let name = clean(group.get_text(&["name"]));
    let peer_type = clean(group.get_text(&["type"]));
    let local_address = clean(group.get_text(&["local-address"]));

    group
        .get_children("neighbor")
        .into_iter()
        .map(|neighbor| BgpPeering {
            peer_type: peer_type.clone(),
            group: name.clone(),
            remote_address: clean(neighbor.get_text(&["name"])),
            local_address: local_address.clone(),
            description: clean(neighbor.get_text(&["description"])),
            as_number: clean(neighbor.get_text(&["peer-as"])),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use conf_tree_core::parse;
    use pretty_assertions::assert_eq;

    use super::JunosXml;
    use crate::error::ExtractError;
    use crate::extract::{RawTree, VendorExtractor};
    use crate::model::{BgpPeering, Tunnel, Unit};

    fn raw(xml: &str) -> RawTree {
        RawTree::Xml(parse(xml.as_bytes()).expect("parse"))
    }

    #[test]
    fn recognises_configuration_marker() {
        assert!(JunosXml.is_vendor(&raw("<rpc-reply><configuration/></rpc-reply>")));
        assert!(JunosXml.is_vendor(&raw("<configuration/>")));
        assert!(!JunosXml.is_vendor(&raw("<rpc-reply><system-information/></rpc-reply>")));
        assert!(!JunosXml.is_vendor(&RawTree::Json(serde_json::json!({}))));
    }

    #[test]
    fn hostname_prefers_system_then_grouped_value() {
        let direct = raw(
            "<configuration><groups><system><host-name>r-re0</host-name></system></groups>\
             <system><host-name>edge2:22</host-name></system></configuration>",
        );
        assert_eq!(JunosXml.extract_hostname(&direct).expect("host"), "edge2");

        let grouped = raw(
            "<configuration><groups><name>re1</name><system><host-name>core1-re1</host-name>\
             </system></groups></configuration>",
        );
        assert_eq!(JunosXml.extract_hostname(&grouped).expect("host"), "core1");
    }

    #[test]
    fn missing_hostname_is_an_error_value() {
        let err = JunosXml
            .extract_hostname(&raw("<configuration><system/></configuration>"))
            .expect_err("no hostname");
        assert!(matches!(
            err,
            ExtractError::MissingField {
                field: "host-name",
                ..
            }
        ));
    }

    #[test]
    fn interface_rules() {
        let tree = raw(
            r#"<configuration><interfaces>
                <interface><name>xe-0/0/0</name><flexible-vlan-tagging/>
                    <unit><name>5</name><vlan-id>5</vlan-id></unit></interface>
                <interface><name>ge-0/0/1</name><ether-options><ieee-802.3ad><bundle>ae3</bundle></ieee-802.3ad></ether-options></interface>
                <interface><name>ge-0/0/2</name><disable/></interface>
                <interface><name>ge-0/0/3.0</name></interface>
                <interface><name>lo0</name></interface>
                <interface><name>*</name></interface>
                <interface><name>all</name></interface>
                <interface><description>unnamed</description></interface>
            </interfaces></configuration>"#,
        );
        let interfaces = JunosXml.extract_interfaces(&tree);
        let names: Vec<_> = interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["xe-0/0/0", "ge-0/0/1", "ge-0/0/2"]);

        assert!(interfaces[0].vlantagging);
        assert_eq!(
            interfaces[0].unitdict,
            vec![Unit {
                unit: "5".to_string(),
                description: None,
                vlanid: Some("5".to_string()),
                address: Vec::new(),
            }]
        );
        assert_eq!(interfaces[1].bundle.as_deref(), Some("ae3"));
        assert!(!interfaces[1].vlantagging);
        assert!(interfaces[1].unitdict.is_empty());
        assert!(interfaces[2].inactive);
        assert!(!interfaces[0].inactive);
    }

    #[test]
    fn tunnels_come_from_interface_and_units() {
        let tree = raw(
            r#"<configuration><interfaces><interface><name>gr-1/0/0</name>
                <tunnel><source>192.0.2.1</source></tunnel>
                <unit><name>0</name><tunnel><source>192.0.2.2</source><destination>192.0.2.3</destination></tunnel></unit>
                <unit><name>1</name></unit>
            </interface></interfaces></configuration>"#,
        );
        let iface = &JunosXml.extract_interfaces(&tree)[0];
        assert_eq!(
            iface.tunneldict,
            vec![
                Tunnel {
                    source: Some("192.0.2.1".to_string()),
                    destination: None,
                },
                Tunnel {
                    source: Some("192.0.2.2".to_string()),
                    destination: Some("192.0.2.3".to_string()),
                },
            ]
        );
        assert_eq!(iface.unitdict.len(), 2);
    }

    #[test]
    fn bgp_groups_and_neighbors_keep_order_and_inherit_local_address() {
        let tree = raw(
            r#"<configuration><protocols><bgp>
                <group><name>IBGP</name><type>internal</type><local-address>10.0.0.1</local-address>
                    <neighbor><name>10.0.0.2</name></neighbor>
                    <neighbor><name>10.0.0.3</name><description>rr</description></neighbor>
                </group>
                <group><name>NONE</name></group>
                <group><name>G1</name><type>external</type>
                    <neighbor><name>1.2.3.4</name><peer-as>123</peer-as></neighbor>
                </group>
            </bgp></protocols></configuration>"#,
        );
        let peerings = JunosXml.extract_bgp_peerings(&tree);
        assert_eq!(peerings.len(), 3);
        assert_eq!(peerings[0].local_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(peerings[1].description.as_deref(), Some("rr"));
        assert_eq!(
            peerings[2],
            BgpPeering {
                peer_type: Some("external".to_string()),
                group: Some("G1".to_string()),
                remote_address: Some("1.2.3.4".to_string()),
                local_address: None,
                description: None,
                as_number: Some("123".to_string()),
            }
        );
    }

    #[test]
    fn absent_sections_yield_empty_results() {
        let tree = raw("<configuration><system><host-name>x</host-name></system></configuration>");
        assert!(JunosXml.extract_interfaces(&tree).is_empty());
        assert!(JunosXml.extract_bgp_peerings(&tree).is_empty());
        assert_eq!(JunosXml.extract_version(&tree), None);
    }
}
