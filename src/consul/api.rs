use std::collections::HashMap;

use http::{HeaderMap, HeaderValue, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::settings::ConnectionConfig;
use crate::config::types::DesiredToken;
use crate::consul::links::{NodeIdentity, PolicyLink, RoleLink, ServiceIdentity};
use crate::consul::token::RemoteToken;
use crate::consul::transport::{ApiRequest, ApiResponse, Transport};
use crate::consul::version::ApiVersion;
use crate::errors::{ReconcileError, ValidationError, ValidationErrors};
use crate::utils::constants::AUTH_HEADER;

/// Tokens visible to the management credential, keyed by AccessorID.
pub type TokenDirectory = HashMap<String, RemoteToken>;

#[derive(Debug, Deserialize)]
struct AgentSelf {
    #[serde(rename = "Config")]
    config: AgentConfig,
}

#[derive(Debug, Deserialize)]
struct AgentConfig {
    #[serde(rename = "Version")]
    version: String,
}

/// Identity fields only sent when creating a token.
#[derive(Debug, Serialize)]
struct CreateIdentity<'a> {
    #[serde(rename = "AccessorID")]
    accessor_id: &'a str,
    #[serde(rename = "SecretID")]
    secret_id: Option<&'a str>,
}

/// Body of `PUT /acl/token` and `PUT /acl/token/{id}`.
#[derive(Debug, Serialize)]
pub struct TokenWrite<'a> {
    #[serde(flatten)]
    identity: Option<CreateIdentity<'a>>,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Policies")]
    policies: &'a [PolicyLink],
    #[serde(rename = "Roles")]
    roles: &'a [RoleLink],
    #[serde(rename = "Local")]
    local: bool,
    #[serde(rename = "ServiceIdentities", skip_serializing_if = "Option::is_none")]
    service_identities: Option<&'a [ServiceIdentity]>,
    #[serde(rename = "NodeIdentities", skip_serializing_if = "Option::is_none")]
    node_identities: Option<&'a [NodeIdentity]>,
}

impl<'a> TokenWrite<'a> {
    /// Identities are left out entirely on agents that predate them.
    pub fn update(desired: &'a DesiredToken, version: &ApiVersion) -> Self {
        Self {
            identity: None,
            description: &desired.description,
            policies: &desired.policies,
            roles: &desired.roles,
            local: desired.local,
            service_identities: version
                .supports_service_identities()
                .then_some(desired.service_identities.as_slice()),
            node_identities: version
                .supports_node_identities()
                .then_some(desired.node_identities.as_slice()),
        }
    }

    pub fn create(desired: &'a DesiredToken, version: &ApiVersion) -> Self {
        Self {
            identity: Some(CreateIdentity {
                accessor_id: &desired.id,
                secret_id: desired.secret.as_ref().map(|secret| secret.expose()),
            }),
            ..Self::update(desired, version)
        }
    }
}

/// Consul ACL token endpoints on top of an injected transport.
#[derive(Debug, Clone)]
pub struct ConsulApi<T> {
    transport: T,
    headers: HeaderMap,
    host: String,
    port: u16,
}

impl<T: Transport> ConsulApi<T> {
    pub fn new(transport: T, connection: &ConnectionConfig) -> Result<Self, ReconcileError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = connection.management_token() {
            let mut value = HeaderValue::from_str(token.expose())
                .map_err(|_| ValidationErrors(vec![ValidationError::ManagementToken]))?;
            value.set_sensitive(true);
            headers.insert(AUTH_HEADER, value);
        }

        Ok(Self {
            transport,
            headers,
            host: connection.host.to_owned(),
            port: connection.port,
        })
    }

    /// `GET /agent/self` and parse the reported version.
    pub async fn negotiate_version(&self) -> Result<ApiVersion, ReconcileError> {
        let agent: AgentSelf = self.get("/agent/self").await?;
        Ok(ApiVersion::parse(&agent.config.version)?)
    }

    /// `GET /acl/tokens`, indexed by AccessorID.
    pub async fn list_tokens(&self) -> Result<TokenDirectory, ReconcileError> {
        let tokens: Vec<RemoteToken> = self.get("/acl/tokens").await?;
        let total = tokens.len();

        let directory: TokenDirectory = tokens
            .into_iter()
            .filter_map(|token| token.accessor_id.clone().map(|id| (id, token)))
            .collect();
        if directory.len() < total {
            warn!("skipped {} listed tokens without AccessorID", total - directory.len());
        }
        debug!("listed {} tokens", directory.len());
        Ok(directory)
    }

    /// `GET /acl/token/{accessor_id}`
    pub async fn fetch_token(&self, accessor_id: &str) -> Result<RemoteToken, ReconcileError> {
        self.get(&format!("/acl/token/{}", accessor_id)).await
    }

    /// `PUT /acl/token`, returning the response body as sent by the agent.
    pub async fn create_token(&self, body: &TokenWrite<'_>) -> Result<Value, ReconcileError> {
        let path = "/acl/token".to_owned();
        let request = ApiRequest::new(Method::PUT, &path, &self.headers).json(encode(&path, body)?);
        let response = self.call(request).await?;
        decode(&path, &response)
    }

    /// `PUT /acl/token/{accessor_id}`, returning the response body as sent by the agent.
    pub async fn update_token(
        &self,
        accessor_id: &str,
        body: &TokenWrite<'_>,
    ) -> Result<Value, ReconcileError> {
        let path = format!("/acl/token/{}", accessor_id);
        let request = ApiRequest::new(Method::PUT, &path, &self.headers).json(encode(&path, body)?);
        let response = self.call(request).await?;
        decode(&path, &response)
    }

    /// `DELETE /acl/token/{accessor_id}`; the response body is ignored.
    pub async fn delete_token(&self, accessor_id: &str) -> Result<(), ReconcileError> {
        let path = format!("/acl/token/{}", accessor_id);
        self.call(ApiRequest::new(Method::DELETE, path, &self.headers))
            .await
            .map(|_| ())
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ReconcileError> {
        let response = self
            .call(ApiRequest::new(Method::GET, path, &self.headers))
            .await?;
        decode(path, &response)
    }

    async fn call(&self, request: ApiRequest) -> Result<ApiResponse, ReconcileError> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|source| ReconcileError::Connectivity {
                host: self.host.to_owned(),
                port: self.port,
                source,
            })?;

        if response.is_error() {
            return Err(ReconcileError::RemoteApi {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }
}

fn encode<B: Serialize>(path: &str, body: &B) -> Result<Value, ReconcileError> {
    serde_json::to_value(body).map_err(|source| ReconcileError::Json {
        path: path.to_owned(),
        source,
    })
}

fn decode<R: DeserializeOwned>(path: &str, response: &ApiResponse) -> Result<R, ReconcileError> {
    serde_json::from_str(&response.body).map_err(|source| ReconcileError::Json {
        path: path.to_owned(),
        source,
    })
}

/// Typed view of a token document already received from `path`.
pub fn token_view(path: &str, document: &Value) -> Result<RemoteToken, ReconcileError> {
    RemoteToken::deserialize(document).map_err(|source| ReconcileError::Json {
        path: path.to_owned(),
        source,
    })
}
