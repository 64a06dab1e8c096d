//! The per-request pipeline: extract, call the service, dispatch.

use std::convert::Infallible;

use tower::{Service, ServiceExt};

use crate::http::dispatch::dispatch;
use crate::http::extract::extract;
use crate::http::handle::ConnectionHandle;
use crate::http::request::Request;
use crate::http::response::Response;

/// Serve one request on one connection handle.
///
/// The service is called exactly once and is not timed out here. The only
/// error is a transport failure while draining the request body, in which
/// case the service is never called.
pub async fn handle_request<S, C>(service: S, handle: C) -> Result<C::Reply, C::Error>
where
    S: Service<Request, Response = Response, Error = Infallible>,
    C: ConnectionHandle,
{
    let (request, handle) = extract(handle).await?;
    let response = match service.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    Ok(dispatch(response, handle))
}
