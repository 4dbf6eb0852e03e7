//! Configuration validation with aggregated errors.
//! - Every problem is collected before reporting, nothing touches the network
//! - Link and identity mappings are normalized into their wire types here

use http::HeaderValue;
use serde_json::Value;
use tracing::{error, info};

use crate::config::settings::ConnectionConfig;
use crate::config::token::TokenConfig;
use crate::config::types::{Configuration, DesiredToken};
use crate::consul::links::{Link, NodeIdentity, ServiceIdentity};
use crate::errors::{LinkKind, ValidationError, ValidationErrors};
use crate::utils::constants::{SCHEME_HTTP, SCHEME_HTTPS};

/// Public entrypoint: returns the validated configuration or every issue found.
pub fn validate_service_config(
    connection: ConnectionConfig,
    token: &TokenConfig,
) -> Result<Configuration, ValidationErrors> {
    let mut errors: Vec<ValidationError> = Vec::new();

    validate_connection(&connection, &mut errors);
    let desired = validate_token(token, &mut errors);

    if errors.is_empty() {
        info!("config valid");
        Ok(Configuration {
            connection,
            token: desired,
        })
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(ValidationErrors(errors))
    }
}

/// CONNECTION VALIDATION
fn validate_connection(connection: &ConnectionConfig, errors: &mut Vec<ValidationError>) {
    if connection.scheme != SCHEME_HTTP && connection.scheme != SCHEME_HTTPS {
        errors.push(ValidationError::UnsupportedScheme(connection.scheme.to_owned()));
    }

    if let Some(token) = connection.management_token() {
        if HeaderValue::from_str(token.expose()).is_err() {
            errors.push(ValidationError::ManagementToken);
        }
    }
}

/// TOKEN VALIDATION
fn validate_token(token: &TokenConfig, errors: &mut Vec<ValidationError>) -> DesiredToken {
    if token.id.trim().is_empty() {
        errors.push(ValidationError::MissingId);
    }

    DesiredToken {
        id: token.id.to_owned(),
        secret: token.secret.clone().filter(|secret| !secret.is_empty()),
        description: token.description.to_owned(),
        local: token.local,
        policies: collect(&token.policies, errors, |i, v| {
            Link::from_input(LinkKind::Policy, i, v)
        }),
        roles: collect(&token.roles, errors, |i, v| Link::from_input(LinkKind::Role, i, v)),
        service_identities: collect(&token.service_identities, errors, ServiceIdentity::from_input),
        node_identities: collect(&token.node_identities, errors, NodeIdentity::from_input),
        state: token.state,
    }
}

fn collect<T>(
    inputs: &[Value],
    errors: &mut Vec<ValidationError>,
    normalize: impl Fn(usize, &Value) -> Result<T, ValidationError>,
) -> Vec<T> {
    inputs
        .iter()
        .enumerate()
        .filter_map(|(index, input)| match normalize(index, input) {
            Ok(value) => Some(value),
            Err(err) => {
                errors.push(err);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::Secret;
    use serde_json::json;

    #[test]
    fn normalizes_links_and_identities() {
        let mut token = TokenConfig::new("ID-1");
        token.policies = vec![json!({"name": "p1"}), json!({"id": "0000-1111"})];
        token.roles = vec![json!({"name": "ops"})];
        token.service_identities = vec![json!({"name": "web", "datacenters": ["dc1"]})];
        token.node_identities = vec![json!({"name": "node-1"})];

        let configuration = validate_service_config(ConnectionConfig::default(), &token).unwrap();
        let desired = configuration.token;
        assert_eq!(desired.policies.len(), 2);
        assert_eq!(desired.policies[1].id.as_deref(), Some("0000-1111"));
        assert_eq!(desired.roles[0].name.as_deref(), Some("ops"));
        assert_eq!(desired.service_identities[0].service_name, "web");
        assert_eq!(desired.node_identities[0].datacenter, None);
    }

    #[test]
    fn reports_all_errors() {
        let mut token = TokenConfig::new("  ");
        token.policies = vec![json!("p1")];
        token.service_identities = vec![json!({"datacenters": ["dc1"]})];
        token.node_identities = vec![json!({"name": "ok"}), json!([1, 2])];
        let connection = ConnectionConfig {
            scheme: "ftp".to_owned(),
            ..ConnectionConfig::default()
        };

        let errors = validate_service_config(connection, &token).unwrap_err();
        let errors = errors.errors();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::MissingId));
        assert!(errors.contains(&ValidationError::UnsupportedScheme("ftp".to_owned())));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::Link { kind: LinkKind::Policy, index: 0, .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::ServiceIdentity { index: 0, .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::NodeIdentity { index: 1, .. })));
    }

    #[test]
    fn rejects_management_token_unfit_for_header() {
        let connection = ConnectionConfig {
            management_token: Some(Secret::new("bad\ntoken")),
            ..ConnectionConfig::default()
        };
        let errors = validate_service_config(connection, &TokenConfig::new("ID-1")).unwrap_err();
        assert_eq!(errors.errors(), &[ValidationError::ManagementToken]);
    }

    #[test]
    fn empty_secret_seed_is_dropped() {
        let mut token = TokenConfig::new("ID-1");
        token.secret = Some(Secret::new(""));
        let configuration = validate_service_config(ConnectionConfig::default(), &token).unwrap();
        assert!(configuration.token.secret.is_none());
    }
}
