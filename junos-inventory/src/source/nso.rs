//! Cisco NSO RESTCONF API client.

use std::rc::Rc;

use conf_tree_core::{find_all, find_or};
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info};

use super::{ConfigSource, RawDevice, SourceError};
use crate::context::RunContext;
use crate::extract::{JunosRestconf, RawTree, VendorExtractor};

const YANG_JSON: &str = "application/vnd.yang.data+json";

/// Blocking RESTCONF client with basic auth.
#[derive(Debug)]
pub struct NsoClient {
    base_url: String,
    user: String,
    password: String,
    client: Client,
}

impl NsoClient {
    pub fn new(url: &str, user: &str, password: &str, ctx: &RunContext) -> Result<Self, SourceError> {
        let base_url = url.trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(ctx.timeout)
            .build()
            .map_err(|source| SourceError::Http {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self {
            base_url,
            user: user.to_string(),
            password: password.to_string(),
            client,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, url: &str, request: reqwest::blocking::RequestBuilder) -> Result<Response, SourceError> {
        request
            .basic_auth(&self.user, Some(&self.password))
            .header(ACCEPT, YANG_JSON)
            .send()
            .map_err(|source| SourceError::Http {
                url: url.to_string(),
                source,
            })
    }

    fn decode(url: &str, response: Response) -> Result<Value, SourceError> {
        response.json::<Value>().map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })
    }

    /// GET `path`; any non-success status is an error.
    pub fn get(&self, path: &str) -> Result<Value, SourceError> {
        self.get_optional(path)?.ok_or_else(|| SourceError::Status {
            url: self.api_url(path),
            status: StatusCode::NOT_FOUND.as_u16(),
        })
    }

    /// GET `path`, mapping `404 Not Found` (unconfigured subtree) to `None`.
    pub fn get_optional(&self, path: &str) -> Result<Option<Value>, SourceError> {
        let url = self.api_url(path);
        debug!(url = %url, "GET");
        let response = self.send(&url, self.client.get(&url))?;
        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => Self::decode(&url, response).map(Some),
            status => Err(SourceError::Status {
                url,
                status: status.as_u16(),
            }),
        }
    }

    /// Names of all devices managed by NSO, in API order.
    pub fn device_names(&self) -> Result<Vec<String>, SourceError> {
        let devices = self.get("/devices")?;
        Ok(listed_names(&devices))
    }

    /// Chassis inventory through the device RPC. Best effort: any failure
    /// only means the record carries no hardware section.
    pub fn chassis_inventory(&self, device: &str) -> Option<Value> {
        let url = self.api_url(&format!(
            "/devices/device/{device}/rpc/rpc-get-chassis-inventory/get-chassis-inventory"
        ));
        let result = self
            .send(&url, self.client.post(&url))
            .and_then(|response| {
                if response.status().is_success() {
                    Self::decode(&url, response)
                } else {
                    Err(SourceError::Status {
                        url: url.clone(),
                        status: response.status().as_u16(),
                    })
                }
            });
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(device, error = %err, "chassis inventory unavailable");
                None
            }
        }
    }
}

/// Device names from a `/devices` reply; a reply without a device list
/// names no devices.
fn listed_names(devices: &Value) -> Vec<String> {
    let none = Value::Null;
    let names = find_all("name", find_or("tailf-ncs:devices.device", devices, &none));
    names
        .into_iter()
        .filter_map(|name| name.as_str().map(str::to_string))
        .collect()
}

/// One device behind an [`NsoClient`].
#[derive(Debug, Clone)]
pub struct NsoDevice {
    client: Rc<NsoClient>,
    name: String,
}

impl NsoDevice {
    pub fn new(client: Rc<NsoClient>, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    /// Every device NSO knows about, optionally restricted to `only`.
    pub fn all(client: Rc<NsoClient>, only: &[String]) -> Result<Vec<Self>, SourceError> {
        let names = if only.is_empty() {
            client.device_names()?
        } else {
            only.to_vec()
        };
        Ok(names
            .into_iter()
            .map(|name| Self::new(Rc::clone(&client), name))
            .collect())
    }
}

impl ConfigSource for NsoDevice {
    fn label(&self) -> String {
        format!("nso:{}", self.name)
    }

    /// Device tree, with the interfaces and BGP subtrees merged in at top
    /// level for JunOS devices.
    fn fetch(&self, ctx: &RunContext) -> Result<RawDevice, SourceError> {
        if ctx.verbose {
            info!(device = %self.name, "fetching from NSO");
        }
        let base = format!("/devices/device/{}", self.name);
        let mut tree = self.client.get(&base)?;

        let is_junos = JunosRestconf.is_vendor(&RawTree::Json(tree.clone()));
        let mut chassis = None;
        if is_junos {
            let subtrees = [
                format!("{base}/config/configuration/interfaces?deep"),
                format!("{base}/config/configuration/protocols/bgp?deep"),
            ];
            for path in &subtrees {
                if let (Some(Value::Object(extra)), Value::Object(root)) =
                    (self.client.get_optional(path)?, &mut tree)
                {
                    root.extend(extra);
                }
            }
            chassis = self.client.chassis_inventory(&self.name).map(RawTree::Json);
        }

        Ok(RawDevice {
            label: self.label(),
            config: RawTree::Json(tree),
            chassis,
        })
    }
}
