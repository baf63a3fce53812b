//! # pagemeta
//!
//! A minimal HTTP framework for Rust services behind a reverse proxy, with a
//! middleware that reports pagination state in JSON responses.
//!
//! ## The pipeline
//!
//! ```text
//! request ─► route lookup ─► on_request hooks ─► handler
//!                                                   │
//! response ◄─ serialise ◄─ on_response hooks ◄──────┘
//! ```
//!
//! - Radix-tree routing via [`matchit`]; each request knows the pattern it
//!   matched ([`Request::route`])
//! - Two-phase [`middleware`]: synchronous hooks before and after the handler
//! - Typed response [`Body`], so JSON can be reshaped before it is serialised
//! - hyper 1 server, HTTP/1.1 and HTTP/2, graceful shutdown on SIGTERM / Ctrl-C
//! - [`Router::inject`] runs the whole pipeline in-process, for tests
//!
//! TLS, rate limiting and body-size limits are left to the proxy in front.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pagemeta::{Method, Request, Response, Router, Server};
//! use pagemeta::middleware::paginate::{Count, Paginate, Pagination};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pagemeta::Error> {
//!     let app = Router::new()
//!         .on(Method::GET, "/users", list_users)
//!         .layer(Paginate::default());
//!
//!     Server::bind("0.0.0.0:3000")?.serve(app).await
//! }
//!
//! // GET /users?page=2&limit=2
//! // → {"meta":{"page":2,"limit":2,"found":3},"results":["cy"]}
//! async fn list_users(req: Request) -> Response {
//!     let p = req.extension::<Pagination>().copied().unwrap_or_default();
//!     let all = ["ann", "bob", "cy"];
//!     let skip = usize::try_from(p.page.saturating_sub(1).saturating_mul(p.limit)).unwrap_or(0);
//!     let take = usize::try_from(p.limit).unwrap_or(0);
//!     let page: Vec<_> = all.iter().skip(skip).take(take).collect();
//!     Response::builder().extension(Count(all.len() as u64)).json(page)
//! }
//! ```

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;

pub use error::Error;
pub use handler::Handler;
pub use http::{Method, StatusCode};
pub use request::{Query, Request, RequestHead};
pub use response::{Body, ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
