//! Request handling: path and options in, envelope bytes out.

use std::sync::Arc;

use odata_core::{MemoryStore, QueryExecutor};
use odata_lang::{parse_query_options, resolve};
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::{ErrorResponse, GatewayError};
use crate::fixture;
use crate::json::{serialize, SerializeContext};

/// Outcome of a request as a transport would send it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status.
    pub status: u16,
    /// JSON body.
    pub body: Vec<u8>,
}

impl Response {
    /// Whether the request succeeded.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Serves requests against a loaded store.
#[derive(Debug, Clone)]
pub struct ODataService {
    /// Store shared across requests.
    pub store: Arc<MemoryStore>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl ODataService {
    /// Create a service over a store.
    pub fn new(store: MemoryStore, config: GatewayConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Load the configured fixture and serve it.
    pub fn from_config(config: GatewayConfig) -> Result<Self, GatewayError> {
        let store = fixture::load(&config.fixture)?;
        Ok(Self::new(store, config))
    }

    /// Handle a request, returning the serialized envelope.
    pub fn handle(&self, path: &str, query: &str) -> Result<Vec<u8>, GatewayError> {
        let target = resolve(path)?;
        let options = parse_query_options(query)?;
        debug!(resource = %target, options = ?options, "handling request");

        let result = QueryExecutor::new(self.store.as_ref()).execute(&target, Some(&options))?;

        let ctx = SerializeContext {
            service_root: &self.config.service_root,
            select: options.select.as_deref(),
            pretty: self.config.pretty,
        };
        Ok(serialize(&result, self.config.shape, &ctx)?)
    }

    /// Handle a request, turning errors into an error body and status.
    pub fn respond(&self, path: &str, query: &str) -> Response {
        match self.handle(path, query) {
            Ok(body) => Response { status: 200, body },
            Err(err) => {
                warn!(path, query, status = err.status(), error = %err, "request failed");
                if let GatewayError::Parse(parse) = &err {
                    debug!("\n{}", parse.diagnostic());
                }
                let body = serde_json::to_vec(&ErrorResponse::from(&err))
                    .unwrap_or_else(|_| err.to_string().into_bytes());
                Response {
                    status: err.status(),
                    body,
                }
            }
        }
    }
}
