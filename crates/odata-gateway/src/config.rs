//! Gateway configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::json::Shape;

/// Service root used when none is given.
pub const DEFAULT_SERVICE_ROOT: &str = "http://localhost/odata/";

/// OData gateway command line arguments.
#[derive(Debug, Parser)]
#[command(name = "odata-gateway")]
#[command(about = "Run one OData request against a JSON fixture")]
pub struct Args {
    /// JSON fixture holding the schema and records.
    #[arg(short, long)]
    pub fixture: PathBuf,

    /// Service root prefixed to entity URIs and context URLs.
    #[arg(short = 'r', long, default_value = DEFAULT_SERVICE_ROOT)]
    pub service_root: String,

    /// Response envelope.
    #[arg(short, long, value_enum, default_value_t = Shape::Legacy)]
    pub shape: Shape,

    /// Pretty-print the response.
    #[arg(long)]
    pub pretty: bool,

    /// Resource path, e.g. `Author(1)/posts`.
    pub path: String,

    /// Query string, e.g. `$filter=name eq 'tag1'&$orderby=id desc`.
    #[arg(default_value = "")]
    pub query: String,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Fixture file to load.
    pub fixture: PathBuf,
    /// Service root, always ending with `/`.
    pub service_root: String,
    /// Response envelope.
    pub shape: Shape,
    /// Pretty-print responses.
    pub pretty: bool,
}

impl GatewayConfig {
    /// Set the service root.
    pub fn with_service_root(mut self, root: &str) -> Self {
        self.service_root = normalize_service_root(root);
        self
    }

    /// Set the response envelope.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }
}

impl From<&Args> for GatewayConfig {
    fn from(args: &Args) -> Self {
        Self {
            fixture: args.fixture.clone(),
            service_root: normalize_service_root(&args.service_root),
            shape: args.shape,
            pretty: args.pretty,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            fixture: PathBuf::from("fixtures/blog.json"),
            service_root: DEFAULT_SERVICE_ROOT.to_string(),
            shape: Shape::Legacy,
            pretty: false,
        }
    }
}

/// Make sure the root ends with exactly one `/`.
pub fn normalize_service_root(root: &str) -> String {
    format!("{}/", root.trim_end_matches('/'))
}
