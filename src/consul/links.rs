//! Policy/role links and service/node identities.
//!
//! Caller input arrives as loosely shaped mappings (`{id, name}`,
//! `{name, datacenters}`, ...). Each type here checks that shape once and
//! carries the canonical wire form the ACL endpoints expect.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{LinkKind, ValidationError};

/// Reference to a policy or role by id and/or name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Link {
    #[serde(rename = "ID", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
}

pub type PolicyLink = Link;
pub type RoleLink = Link;

/// Grants the token the identity of a service, optionally limited to datacenters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceIdentity {
    #[serde(rename = "ServiceName")]
    pub service_name: String,
    /// `None` means valid in every datacenter.
    #[serde(rename = "Datacenters", default)]
    pub datacenters: Option<Vec<String>>,
}

/// Grants the token the identity of a node, optionally limited to one datacenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIdentity {
    #[serde(rename = "NodeName")]
    pub node_name: String,
    #[serde(rename = "Datacenter", default)]
    pub datacenter: Option<String>,
}

impl Link {
    pub fn from_input(kind: LinkKind, index: usize, input: &Value) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::Link {
            kind,
            index,
            reason: reason.to_owned(),
        };

        let map = input
            .as_object()
            .ok_or_else(|| invalid("must be a mapping with the keys id and/or name"))?;
        let id = optional_string(map, "id").map_err(|reason| invalid(&reason))?;
        let name = optional_string(map, "name").map_err(|reason| invalid(&reason))?;

        if id.is_none() && name.is_none() {
            return Err(invalid("at least one of id or name must be set"));
        }
        Ok(Self { id, name })
    }
}

impl ServiceIdentity {
    pub fn from_input(index: usize, input: &Value) -> Result<Self, ValidationError> {
        let invalid = |reason: String| ValidationError::ServiceIdentity { index, reason };

        let map = input.as_object().ok_or_else(|| {
            invalid("must be a mapping with the keys name and optionally datacenters".to_owned())
        })?;
        let service_name = required_string(map, "name").map_err(invalid)?;

        let datacenters = match map.get("datacenters") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|dc| {
                        dc.as_str()
                            .map(str::to_owned)
                            .ok_or_else(|| {
                                invalid("datacenters must only contain strings".to_owned())
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(_) => return Err(invalid("datacenters must be a list of strings".to_owned())),
        };

        Ok(Self {
            service_name,
            datacenters,
        })
    }
}

impl NodeIdentity {
    pub fn from_input(index: usize, input: &Value) -> Result<Self, ValidationError> {
        let invalid = |reason: String| ValidationError::NodeIdentity { index, reason };

        let map = input.as_object().ok_or_else(|| {
            invalid("must be a mapping with the keys name and optionally datacenter".to_owned())
        })?;
        let node_name = required_string(map, "name").map_err(invalid)?;
        let datacenter = optional_string(map, "datacenter").map_err(invalid)?;

        Ok(Self {
            node_name,
            datacenter,
        })
    }
}

fn required_string(map: &Map<String, Value>, key: &str) -> Result<String, String> {
    optional_string(map, key)?.ok_or_else(|| format!("'{}' is required", key))
}

fn optional_string(map: &Map<String, Value>, key: &str) -> Result<Option<String>, String> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.to_owned())),
        Some(_) => Err(format!("'{}' must be a string", key)),
    }
}
