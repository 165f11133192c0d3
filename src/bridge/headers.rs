//! Header names of the rpcx HTTP convention.

use axum::http::HeaderName;

/// Target service of the invocation.
pub const X_SERVICE_PATH: HeaderName = HeaderName::from_static("x-rpcx-servicepath");

/// Method to call on the target service.
pub const X_SERVICE_METHOD: HeaderName = HeaderName::from_static("x-rpcx-servicemethod");

/// Correlation identifier echoed back to the caller.
pub const X_MESSAGE_ID: HeaderName = HeaderName::from_static("x-rpcx-messageid");

/// Set to [`MESSAGE_STATUS_ERROR`] on failed invocations.
pub const X_MESSAGE_STATUS_TYPE: HeaderName =
    HeaderName::from_static("x-rpcx-messagestatustype");

/// Textual error of a failed invocation.
pub const X_ERROR_MESSAGE: HeaderName = HeaderName::from_static("x-rpcx-errormessage");

/// Payload serialization used by the rpcx service.
pub const X_SERIALIZE_TYPE: HeaderName = HeaderName::from_static("x-rpcx-serializetype");

/// Value of [`X_MESSAGE_STATUS_TYPE`] marking a failure.
pub const MESSAGE_STATUS_ERROR: &str = "Error";

/// Prefix shared by every rpcx header, lowercase.
pub const RPCX_HEADER_PREFIX: &str = "x-rpcx-";

/// Returns true if the header belongs to the rpcx convention.
///
/// [`HeaderName`] is always lowercase, so the comparison is case-insensitive
/// with respect to what the client sent.
pub fn is_rpcx_header(name: &HeaderName) -> bool {
    name.as_str().starts_with(RPCX_HEADER_PREFIX)
}
