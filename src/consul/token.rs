use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consul::links::{NodeIdentity, PolicyLink, RoleLink, ServiceIdentity};

/// ACL token as returned by the agent.
///
/// The listing endpoint returns a partial view and the single token endpoint
/// the full one, so every attribute is optional. Bookkeeping fields
/// (indices, timestamps, hash) are kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RemoteToken {
    #[serde(rename = "AccessorID", default, skip_serializing_if = "Option::is_none")]
    pub accessor_id: Option<String>,
    #[serde(rename = "SecretID", default, skip_serializing_if = "Option::is_none")]
    pub secret_id: Option<String>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Local", default, skip_serializing_if = "Option::is_none")]
    pub local: Option<bool>,
    #[serde(rename = "Policies", default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<Vec<PolicyLink>>,
    #[serde(rename = "Roles", default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<RoleLink>>,
    #[serde(rename = "ServiceIdentities", default, skip_serializing_if = "Option::is_none")]
    pub service_identities: Option<Vec<ServiceIdentity>>,
    #[serde(rename = "NodeIdentities", default, skip_serializing_if = "Option::is_none")]
    pub node_identities: Option<Vec<NodeIdentity>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RemoteToken {
    /// Merge the listing entry with the full record of the same token.
    ///
    /// Every field the full record carries wins; fields only the listing
    /// entry carries are kept. A field reported as `null` counts as absent.
    pub fn merge(index_entry: RemoteToken, full: RemoteToken) -> RemoteToken {
        let mut extra = index_entry.extra;
        extra.extend(full.extra);

        RemoteToken {
            accessor_id: full.accessor_id.or(index_entry.accessor_id),
            secret_id: full.secret_id.or(index_entry.secret_id),
            description: full.description.or(index_entry.description),
            local: full.local.or(index_entry.local),
            policies: full.policies.or(index_entry.policies),
            roles: full.roles.or(index_entry.roles),
            service_identities: full.service_identities.or(index_entry.service_identities),
            node_identities: full.node_identities.or(index_entry.node_identities),
            extra,
        }
    }

    /// True when any attribute this tool manages differs between the two views.
    pub fn differs_from(&self, other: &RemoteToken) -> bool {
        self.description != other.description
            || self.local != other.local
            || self.policies != other.policies
            || self.roles != other.roles
            || self.service_identities != other.service_identities
            || self.node_identities != other.node_identities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token(value: Value) -> RemoteToken {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn full_record_wins_on_overlap() {
        let index_entry = token(json!({
            "AccessorID": "a-1",
            "Description": "stale",
            "CreateIndex": 10,
            "Legacy": false
        }));
        let full = token(json!({
            "AccessorID": "a-1",
            "Description": "fresh",
            "Local": true,
            "CreateIndex": 11
        }));

        let merged = RemoteToken::merge(index_entry, full);
        assert_eq!(merged.description.as_deref(), Some("fresh"));
        assert_eq!(merged.local, Some(true));
        assert_eq!(merged.extra.get("CreateIndex"), Some(&json!(11)));
        assert_eq!(merged.extra.get("Legacy"), Some(&json!(false)));
    }

    #[test]
    fn listing_only_fields_survive_merge() {
        let index_entry = token(json!({"AccessorID": "a-1", "Policies": [{"ID": "x", "Name": "p"}]}));
        let full = token(json!({"AccessorID": "a-1"}));

        let merged = RemoteToken::merge(index_entry, full);
        assert_eq!(merged.policies.map(|p| p.len()), Some(1));
    }

    #[test]
    fn bookkeeping_fields_do_not_count_as_change() {
        let before = token(json!({"Description": "d", "Local": false, "ModifyIndex": 1}));
        let after = token(json!({"Description": "d", "Local": false, "ModifyIndex": 2}));
        assert!(!before.differs_from(&after));

        let after = token(json!({"Description": "d", "Local": true}));
        assert!(before.differs_from(&after));
    }

    #[test]
    fn round_trips_unknown_fields() {
        let raw = json!({"AccessorID": "a-1", "Hash": "abc", "CreateTime": "2020-01-01T00:00:00Z"});
        assert_eq!(serde_json::to_value(token(raw.clone())).unwrap(), raw);
    }
}
