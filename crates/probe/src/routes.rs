use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use http::{header, HeaderMap};

use crate::connection::{ConnectionContext, ConnectionInfo};
use crate::environment::EnvironmentSnapshot;
use crate::headers::HeaderSet;
use crate::report::{self, ProbeRequest};

pub const PROBE_PATH: &str = "/";
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Builds the router serving the diagnostic report on [`PROBE_PATH`].
///
/// The connection state is expected as an `Extension<ConnectionContext>`
/// layered on per connection by the server. Without it the report still
/// renders, with blank connection fields.
pub fn router() -> Router {
    Router::new().route(PROBE_PATH, get(home_page))
}

async fn home_page(
    connection: Option<Extension<ConnectionContext>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let connection = connection.map_or_else(
        || ConnectionContext::new(ConnectionInfo::default()),
        |Extension(context)| context,
    );

    let request = ProbeRequest::new(
        connection.info().clone(),
        connection.next_trace_id(),
        HeaderSet::from(&headers),
    );
    let environment = EnvironmentSnapshot::capture();
    let body = report::render(&request, &environment);

    mini_trace::info!(
        trace_id = %request.trace_id,
        headers = request.headers.len(),
        variables = environment.len(),
        "Served diagnostic report"
    );

    ([(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)], body)
}
