//! JunOS devices read through the NSO RESTCONF API.
//!
//! The device tree (`tailf-ncs:device`) may carry the whole configuration,
//! or the interfaces and BGP subtrees may have been fetched separately and
//! merged in at top level as `junos:interfaces` / `junos:bgp`. Both layouts
//! are accepted.

use conf_tree_core::{find, find_all, find_list, find_path_str, find_str, has_key};
use serde_json::Value;

use super::rules::{
    clean, is_physical_interface, BUNDLE_PATHS, DISABLE_MARKER, VLAN_TAGGING_MARKERS,
};
use super::{RawTree, VendorExtractor};
use crate::error::ExtractError;
use crate::hostname::canonical_name;
use crate::model::{BgpPeering, Interface, Tunnel, Unit};

/// Extractor for RESTCONF JSON device trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct JunosRestconf;

const ENCODING: &str = "JunOS RESTCONF";
const DEVICE: &str = "tailf-ncs:device";
const MARKER: &str = "tailf-ncs:device.config.junos:configuration";

impl VendorExtractor for JunosRestconf {
    fn name(&self) -> &'static str {
        "junos-restconf"
    }

    fn producer(&self) -> &'static str {
        "nso_juniper"
    }

    fn is_vendor(&self, raw: &RawTree) -> bool {
        matches!(raw, RawTree::Json(tree) if find(MARKER, tree).is_some())
    }

    /// Configured `host-name` plus `domain-name`; without a configured name
    /// the device address and then the NSO device name stand in.
    fn extract_hostname(&self, raw: &RawTree) -> Result<String, ExtractError> {
        let RawTree::Json(tree) = raw else {
            return Err(missing_hostname());
        };
        let config = configuration(tree);
        let host = config
            .and_then(|c| find_str("system.host-name", c))
            .or_else(|| find_str(&format!("{DEVICE}.address"), tree))
            .or_else(|| find_str(&format!("{DEVICE}.name"), tree));
        let host = clean(host.as_deref()).ok_or_else(missing_hostname)?;
        let domain = config.and_then(|c| find_str("system.domain-name", c));
        Ok(canonical_name(&host, domain.as_deref()))
    }

    fn extract_version(&self, raw: &RawTree) -> Option<String> {
        let RawTree::Json(tree) = raw else {
            return None;
        };
        clean(find_str("version", configuration(tree)?).as_deref())
    }

    fn extract_interfaces(&self, raw: &RawTree) -> Vec<Interface> {
        match raw {
            RawTree::Json(tree) => parse_interfaces(tree),
            RawTree::Xml(_) => Vec::new(),
        }
    }

    fn extract_bgp_peerings(&self, raw: &RawTree) -> Vec<BgpPeering> {
        match raw {
            RawTree::Json(tree) => parse_bgp_sessions(tree),
            RawTree::Xml(_) => Vec::new(),
        }
    }
}

fn missing_hostname() -> ExtractError {
    ExtractError::MissingField {
        field: "host-name",
        encoding: ENCODING,
    }
}

/// The `junos:configuration` node from a device tree or a bare
/// configuration response.
fn configuration(tree: &Value) -> Option<&Value> {
    find(MARKER, tree).or_else(|| find("junos:configuration", tree))
}

/// First non-empty list found at `standalone` or at `nested` below the
/// configuration node.
fn subtree_list<'a>(tree: &'a Value, standalone: &str, nested: &str) -> Vec<&'a Value> {
    let items = find_list(standalone, tree);
    if !items.is_empty() {
        return items;
    }
    configuration(tree)
        .map(|config| find_list(nested, config))
        .unwrap_or_default()
}

/// Interfaces from an interfaces subtree response or a full device tree.
pub fn parse_interfaces(data: &Value) -> Vec<Interface> {
    subtree_list(data, "junos:interfaces.interface", "interfaces.interface")
        .into_iter()
        .filter_map(parse_interface)
        .collect()
}

/// One peering per (group, neighbor) pair, both in source order.
///
/// An empty tree, or one without a BGP node, yields no peerings.
pub fn parse_bgp_sessions(data: &Value) -> Vec<BgpPeering> {
    let groups = subtree_list(data, "junos:bgp.group", "protocols.bgp.group");
    let groups = if groups.is_empty() {
        // A group list handed over without its wrapper.
        find_list("group", data)
    } else {
        groups
    };
    groups.into_iter().flat_map(parse_group).collect()
}

fn parse_interface(item: &Value) -> Option<Interface> {
    let name = clean(find_str("name", item).as_deref())?;
    if !is_physical_interface(&name) {
        return None;
    }

    let units = find_list("unit", item);
    let mut tunnels: Vec<Tunnel> = find("tunnel", item).map(parse_tunnel).into_iter().collect();
    tunnels.extend(units.iter().filter_map(|u| find("tunnel", u)).map(parse_tunnel));

    Some(Interface {
        name,
        bundle: BUNDLE_PATHS
            .iter()
            .find_map(|path| clean(find_path_str(path, item).as_deref())),
        description: clean(find_str("description", item).as_deref()),
        vlantagging: VLAN_TAGGING_MARKERS.iter().any(|m| has_key(m, item)),
        tunneldict: tunnels,
        unitdict: units.into_iter().filter_map(parse_unit).collect(),
        inactive: is_inactive(item),
    })
}

fn parse_unit(item: &Value) -> Option<Unit> {
    Some(Unit {
        unit: clean(find_str("name", item).as_deref())?,
        description: clean(find_str("description", item).as_deref()),
        vlanid: clean(find_str("vlan-id", item).as_deref()),
        address: unit_addresses(item),
    })
}

/// Addresses from every `family.<afi>.address[].name`, then any address
/// list kept directly on the unit.
fn unit_addresses(unit: &Value) -> Vec<String> {
    let families = find("family", unit)
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|families| families.values());
    families
        .chain(std::iter::once(unit))
        .filter_map(|afi| find("address", afi))
        .flat_map(address_names)
        .collect()
}

fn address_names(addresses: &Value) -> Vec<String> {
    let names = match addresses {
        Value::Array(_) => find_all("name", addresses),
        single => find("name", single).into_iter().collect(),
    };
    names
        .into_iter()
        .filter_map(|name| clean(name.as_str()))
        .collect()
}

fn parse_tunnel(node: &Value) -> Tunnel {
    Tunnel {
        source: clean(find_str("source", node).as_deref()),
        destination: clean(find_str("destination", node).as_deref()),
    }
}

/// Inactive statements carry `"@": {"inactive": true}` metadata.
fn is_inactive(item: &Value) -> bool {
    let flagged = match find("@.inactive", item) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => matches!(text.as_str(), "true" | "inactive"),
        _ => false,
    };
    flagged || has_key(DISABLE_MARKER, item)
}

fn parse_group(group: &Value) -> Vec<BgpPeering> {
    let name = clean(find_str("name", group).as_deref());
    let peer_type = clean(find_str("type", group).as_deref());
    let local_address = clean(find_str("local-address", group).as_deref());

    find_list("neighbor", group)
        .into_iter()
        .map(|neighbor| BgpPeering {
            peer_type: peer_type.clone(),
            group: name.clone(),
            remote_address: clean(find_str("name", neighbor).as_deref()),
            local_address: local_address.clone(),
            description: clean(find_str("description", neighbor).as_deref()),
            as_number: clean(find_str("peer-as", neighbor).as_deref()),
        })
        .collect()
}
