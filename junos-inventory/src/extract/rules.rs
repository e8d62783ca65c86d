//! JunOS naming and marker rules shared by both encodings.

/// Markers declaring 802.1Q tagging on a physical interface.
pub(crate) const VLAN_TAGGING_MARKERS: [&str; 2] = ["vlan-tagging", "flexible-vlan-tagging"];

/// Places an aggregated-ethernet membership may be declared, most specific
/// first.
pub(crate) const BUNDLE_PATHS: [&[&str]; 4] = [
    &["gigether-options", "ieee-802.3ad", "bundle"],
    &["ether-options", "ieee-802.3ad", "bundle"],
    &["ieee-802.3ad", "bundle"],
    &["bundle"],
];

/// Marker element for an administratively disabled interface.
pub(crate) const DISABLE_MARKER: &str = "disable";

/// True for names that denote a physical interface record.
///
/// Unit references (`ae0.0`), loopbacks (`lo0`), wildcards (`*`, `ge-*`) and
/// the `all` placeholder are rejected; their data belongs to units or to
/// configuration templates, not to an interface of its own.
pub(crate) fn is_physical_interface(name: &str) -> bool {
    let name = name.trim();
    !(name.is_empty()
        || name.contains('.')
        || name.contains('*')
        || name.starts_with("lo")
        || name == "all")
}

/// Trimmed, non-empty text.
pub(crate) fn clean(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{clean, is_physical_interface};

    #[test]
    fn rejects_units_loopbacks_and_wildcards() {
        for name in ["ge-0/0/0.100", "lo0", "lo0.0", "*", "ge-*/0/0", "all", ""] {
            assert!(!is_physical_interface(name), "{name} should be skipped");
        }
    }

    #[test]
    fn accepts_physical_and_aggregate_names() {
        for name in ["ge-0/0/0", "xe-1/2/3", "ae0", "gr-0/0/0", "et-0/0/1", "irb", "fxp0"] {
            assert!(is_physical_interface(name), "{name} should be kept");
        }
    }

    #[test]
    fn clean_drops_blank_text() {
        assert_eq!(clean(Some("  x ")), Some("x".to_string()));
        assert_eq!(clean(Some("   ")), None);
        assert_eq!(clean(None), None);
    }
}
