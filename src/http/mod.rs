//! HTTP adapter subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, hyper HTTP/1.1 driver)
//!     → backend.rs (HyperConnection: the per-request handle)
//!     → extract.rs (handle → Request, one body drain)
//!     → service (tower::Service<Request>)
//!     → dispatch.rs (split headers, set cookies, one reply)
//!     → Send to client
//! ```
//!
//! The adapter core (`handle`, `extract`, `dispatch`, `adapter`) only knows
//! the `ConnectionHandle` trait; `backend` and `server` bind it to hyper.

pub mod adapter;
pub mod backend;
pub mod cookie;
pub mod dispatch;
pub mod echo;
pub mod extract;
pub mod handle;
pub mod request;
pub mod response;
pub mod server;
pub mod token;

pub use adapter::handle_request;
pub use cookie::{parse_cookie_header, AttributeValue, CookieDirective};
pub use dispatch::dispatch;
pub use extract::extract;
pub use handle::ConnectionHandle;
pub use request::{method_from_raw, scheme_from_raw, Method, Request, Scheme};
pub use response::Response;
pub use server::{start, HttpServer, ServerError, ServerHandle};
pub use token::is_valid_token;
