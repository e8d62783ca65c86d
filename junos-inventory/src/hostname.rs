/// Trailing markers naming one of a chassis' redundant routing engines.
///
/// Checked in order; only the first match is stripped. A bare `re1` only
/// counts as a marker when it forms its own label, otherwise `core1` would
/// lose its tail.
const ROUTING_ENGINE_SUFFIXES: [&str; 6] = ["-re0", "-re1", "_re0", "_re1", ".re0", ".re1"];

/// Normalize a raw device name or address into the canonical hostname.
///
/// Drops everything from the first `:` (management port) and then strips one
/// trailing routing-engine marker, so both engines of a dual-RE chassis map
/// to the same name. Applying it twice gives the same result as once for
/// names that do not stack markers.
pub fn normalize_hostname(raw: &str) -> String {
    let host = raw.split(':').next().unwrap_or_default().trim();
    for suffix in ROUTING_ENGINE_SUFFIXES {
        if let Some(stripped) = host.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    host.to_string()
}

/// Normalize `raw` and append `.domain` when a domain is configured.
///
/// The domain is not appended twice when the host name already carries it.
pub fn canonical_name(raw: &str, domain: Option<&str>) -> String {
    let host = normalize_hostname(raw);
    let Some(domain) = domain.map(str::trim).filter(|d| !d.is_empty()) else {
        return host;
    };
    if host.is_empty() || host == domain || host.ends_with(&format!(".{domain}")) {
        return host;
    }
    format!("{host}.{domain}")
}
