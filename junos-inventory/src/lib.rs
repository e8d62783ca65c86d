//! JunOS configuration normalization into canonical inventory records.
//!
//! Configuration exports arrive in two shapes: the XML document produced by
//! `show configuration | display xml` and the JSON tree returned by a Cisco
//! NSO RESTCONF API. Both are mapped onto one vendor-neutral equipment model
//! and written as one deterministic JSON record per device.
//!
//! # Architecture
//!
//! - [`source`]: Fetch raw configuration (local files, ssh, NSO RESTCONF)
//! - [`extract`]: Vendor extractors and the fixed-order dispatcher
//! - [`hostname`]: Canonical device names (port and routing-engine suffixes)
//! - [`model`]: Router, switch, interface, unit, tunnel and BGP peering types
//! - [`record`]: The `{"host": {...}}` envelope
//! - [`output`]: Emission to stdout or `<dir>/<name>.json`
//! - [`pipeline`]: Batch driver with per-device failure isolation
//! - [`summary`]: Per-device outcomes, rendered as text or JSON
//! - [`config`]: TOML run configuration
//!
//! # Examples
//!
//! ```ignore
//! use junos_inventory::extract::RawTree;
//! use junos_inventory::pipeline::extract_record;
//! use junos_inventory::source::RawDevice;
//!
//! let config = RawTree::from_bytes(&std::fs::read("core1-re0.xml")?)?;
//! let device = RawDevice { label: "core1-re0.xml".into(), config, chassis: None };
//! let record = extract_record(&device)?;
//! conf_tree_core::write_json(&mut std::io::stdout(), &record.to_envelope())?;
//! ```
//!
//! # Built on conf-tree-core
//!
//! Generic XML parsing, typed tree lookups and deterministic JSON writing live
//! in `conf-tree-core`. All JunOS-specific logic is contained in this crate.

pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod hostname;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod summary;
