// Implements a diagnostic http probe: a single endpoint that reports the
// connection metadata, request headers and process environment it sees.

pub mod config;
pub mod connection;
pub mod environment;
pub mod errors;
pub mod headers;
pub mod report;
pub mod routes;
pub mod server;

mod operators;

pub use config::*;
pub use connection::{ConnectionContext, ConnectionIdGenerator, ConnectionInfo};
pub use environment::EnvironmentSnapshot;
pub use errors::*;
pub use headers::HeaderSet;
pub use operators::*;
pub use report::{render, DiagnosticReport, ProbeRequest, RequestView};
pub use server::*;
