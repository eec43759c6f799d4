//! Renders the diagnostic report returned by the probe endpoint.
//!
//! The layout is read by scripts and log scrapers, so labels, their padding
//! and the separator rule are fixed. Values are written exactly as received:
//! no escaping, no truncation, no redaction.

use core::fmt;
use std::net::IpAddr;

use crate::connection::ConnectionInfo;
use crate::environment::EnvironmentSnapshot;
use crate::headers::HeaderSet;

pub const REPORT_TITLE: &str = "MiniServer";
pub const SEPARATOR: &str = "----------------------------------------------------------------";
pub const CONNECTION_SECTION: &str = "CONNECTION INFO:";
pub const HEADERS_SECTION: &str = "HTTP HEADERS:";
pub const ENVIRONMENT_SECTION: &str = "ENVIRONMENT VARIABLES:";
pub const ATTRIBUTION: &str = "Served by MiniServer, a connectivity probe. End of report.";

pub const CONNECTION_ID_LABEL: &str = "Connection Id:    ";
pub const TRACE_ID_LABEL: &str = "Trace Id:         ";
pub const SOURCE_IP_LABEL: &str = "Source IP:        ";
pub const SOURCE_PORT_LABEL: &str = "Source Port:      ";
pub const DESTINATION_IP_LABEL: &str = "Destination IP:   ";
pub const DESTINATION_PORT_LABEL: &str = "Destination Port: ";

/// `RequestView` is the read-only slice of an inbound request the report
/// needs.
pub trait RequestView {
    fn connection(&self) -> &ConnectionInfo;
    fn trace_id(&self) -> &str;
    fn headers(&self) -> &HeaderSet;
}

/// `ProbeRequest` is the owned `RequestView` the http layer builds for every
/// request it serves.
#[derive(Debug, Clone, Default)]
pub struct ProbeRequest {
    pub connection: ConnectionInfo,
    pub trace_id: String,
    pub headers: HeaderSet,
}

impl ProbeRequest {
    #[must_use]
    pub fn new(connection: ConnectionInfo, trace_id: String, headers: HeaderSet) -> Self {
        Self {
            connection,
            trace_id,
            headers,
        }
    }
}

impl RequestView for ProbeRequest {
    fn connection(&self) -> &ConnectionInfo {
        &self.connection
    }

    fn trace_id(&self) -> &str {
        &self.trace_id
    }

    fn headers(&self) -> &HeaderSet {
        &self.headers
    }
}

/// `DiagnosticReport` borrows a request and an environment snapshot and
/// writes the report through its `Display` implementation.
pub struct DiagnosticReport<'a, R: RequestView + ?Sized> {
    request: &'a R,
    environment: &'a EnvironmentSnapshot,
}

impl<'a, R: RequestView + ?Sized> DiagnosticReport<'a, R> {
    pub fn new(request: &'a R, environment: &'a EnvironmentSnapshot) -> Self {
        Self {
            request,
            environment,
        }
    }
}

// Absent values render as nothing, the label stays.
struct OrBlank<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for OrBlank<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => Ok(()),
        }
    }
}

fn write_connection(
    f: &mut fmt::Formatter<'_>,
    connection: &ConnectionInfo,
    trace_id: &str,
) -> fmt::Result {
    writeln!(f, "{CONNECTION_ID_LABEL}{}", OrBlank(connection.id.as_deref()))?;
    writeln!(f, "{TRACE_ID_LABEL}{trace_id}")?;
    writeln!(f, "{SOURCE_IP_LABEL}{}", OrBlank::<IpAddr>(connection.remote_addr))?;
    writeln!(f, "{SOURCE_PORT_LABEL}{}", OrBlank(connection.remote_port))?;
    writeln!(f, "{DESTINATION_IP_LABEL}{}", OrBlank::<IpAddr>(connection.local_addr))?;
    writeln!(f, "{DESTINATION_PORT_LABEL}{}", OrBlank(connection.local_port))
}

impl<R: RequestView + ?Sized> fmt::Display for DiagnosticReport<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REPORT_TITLE}")?;
        writeln!(f, "{SEPARATOR}")?;

        writeln!(f, "{CONNECTION_SECTION}")?;
        write_connection(f, self.request.connection(), self.request.trace_id())?;
        writeln!(f, "{SEPARATOR}")?;

        writeln!(f, "{HEADERS_SECTION}")?;
        for (name, value) in self.request.headers().iter() {
            writeln!(f, "{name}: {value}")?;
        }
        writeln!(f, "{SEPARATOR}")?;

        writeln!(f, "{ENVIRONMENT_SECTION}")?;
        for (name, value) in self.environment.iter() {
            writeln!(f, "{name}: {value}")?;
        }
        writeln!(f, "{SEPARATOR}")?;

        writeln!(f, "{ATTRIBUTION}")
    }
}

/// Renders the full report for `request` against `environment`.
#[must_use]
pub fn render<R: RequestView + ?Sized>(request: &R, environment: &EnvironmentSnapshot) -> String {
    DiagnosticReport::new(request, environment).to_string()
}
