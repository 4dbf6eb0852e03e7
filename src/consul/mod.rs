//! Consul ACL token endpoints and the value types exchanged with them.

pub mod api;
pub mod links;
pub mod token;
pub mod transport;
pub mod version;
