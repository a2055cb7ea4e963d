//! OData gateway.
//!
//! Wires the path resolver, option parser and query executor together and
//! renders results as legacy (`{"d": ...}`) or v4 (`@odata.context`) JSON.
//! Data comes from a JSON fixture loaded into an in-memory store.

pub mod config;
pub mod error;
pub mod fixture;
pub mod json;
pub mod service;

pub use config::{Args, GatewayConfig};
pub use error::{ErrorResponse, GatewayError};
pub use json::{serialize, EnvelopeWriter, SerializeContext, Shape};
pub use service::{ODataService, Response};
