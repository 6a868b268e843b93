//! OAuth 1.0a PIN authorization
//!
//! - [`signature`]: HMAC-SHA1 request signing
//! - [`transport`]: the HTTP seam (`HttpTransport`) and its `reqwest` implementation
//! - [`authorizer`]: the request-token / PIN / access-token state machine

pub mod authorizer;
pub mod signature;
pub mod transport;

pub use authorizer::{AuthState, Authorize, OAuthAuthorizer, DEFAULT_BASE_URL};
pub use signature::{Consumer, HttpMethod};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
