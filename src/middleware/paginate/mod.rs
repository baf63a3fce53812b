//! Pagination metadata middleware.
//!
//! Reads `page` and `limit` from the query before the handler runs and
//! reports them back in a metadata object on the JSON response:
//!
//! ```text
//! GET /users?page=3&limit=10        handler returns ["ann", "bob"]
//!
//! {"meta":{"page":3,"limit":10},"results":["ann","bob"]}
//! ```
//!
//! - `page` and `limit` are removed from the query the handler sees and
//!   stored as a [`Pagination`] extension on the request.
//! - A handler that knows the total number of matches attaches [`Count`] to
//!   its response; it is reported as `found`.
//! - An object body that already has the metadata key gets the fields merged
//!   into it instead of being wrapped.
//! - Responses built from an [`Error`](crate::Error) are never touched.
//! - Routes outside [`Options::routes`] and requests whose `format` query
//!   value is excluded get no envelope, and any `page`, `limit` or `found`
//!   already present in their metadata object is removed.
//!
//! The middleware itself holds only its configuration. Everything it learns
//! about a request lives on that request.
//!
//! ```rust,no_run
//! use pagemeta::{Method, Request, Response, Router};
//! use pagemeta::middleware::paginate::{Count, Options, Paginate, Pagination};
//!
//! async fn list_users(req: Request) -> Response {
//!     let p = req.extension::<Pagination>().copied().unwrap_or_default();
//!     let users = vec!["ann", "bob"]; // fetch `p.limit` rows at page `p.page`
//!     Response::builder().extension(Count(2)).json(users)
//! }
//!
//! # fn main() -> Result<(), pagemeta::Error> {
//! let app = Router::new()
//!     .on(Method::GET, "/users", list_users)
//!     .layer(Paginate::new(Options::default().limit(25))?);
//! # Ok(()) }
//! ```

mod config;
mod envelope;
mod extract;
mod filter;

use std::sync::Arc;

use tracing::{debug, trace, warn};

pub use config::{ALL_ROUTES, Config, OnInvalid, Options, Routes};

use crate::error::{Error, ErrorResponse};
use crate::middleware::Middleware;
use crate::request::{Request, RequestHead};
use crate::response::{IntoResponse, Response};

/// The resolved page and page size of one request.
///
/// Inserted into the request's extensions before the handler runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: config::DEFAULT_PAGE, limit: config::DEFAULT_LIMIT }
    }
}

/// Total number of items matching the request, set by the handler on its
/// response. Reported as `found`; omitted entirely when not set.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Count(pub u64);

/// The pagination middleware. Register with [`Router::layer`](crate::Router::layer).
#[derive(Clone, Debug)]
pub struct Paginate {
    config: Arc<Config>,
}

impl Paginate {
    /// Validates `options` and builds the middleware.
    pub fn new(options: Options) -> Result<Self, Error> {
        Ok(Self::from_config(Config::from_options(options)?))
    }

    pub fn from_config(config: Config) -> Self {
        Self { config: Arc::new(config) }
    }

    pub fn config(&self) -> &Config { &self.config }
}

impl Default for Paginate {
    fn default() -> Self { Self::from_config(Config::default()) }
}

impl Middleware for Paginate {
    fn on_request(&self, req: &mut Request) -> Result<(), Response> {
        match extract::extract(req.query_mut(), &self.config) {
            Ok(pagination) => {
                trace!(route = req.route(), page = pagination.page, limit = pagination.limit, "pagination resolved");
                req.extensions_mut().insert(pagination);
                Ok(())
            }
            Err(e) => {
                warn!(route = req.route(), "rejecting request: {e}");
                Err(e.into_response())
            }
        }
    }

    fn on_response(&self, head: &RequestHead, res: &mut Response) {
        let Some(&pagination) = head.extension::<Pagination>() else {
            return;
        };
        if res.extensions().get::<ErrorResponse>().is_some() {
            trace!(route = head.route(), "error response left as is");
            return;
        }

        if filter::approves(&self.config, head.route(), head.query().get("format")) {
            let count = res.extensions().get::<Count>().copied();
            let meta = envelope::meta_object(pagination, count);
            envelope::attach(res.body_mut(), meta, &self.config);
            debug!(route = head.route(), "pagination metadata attached");
        } else {
            envelope::strip(res.body_mut(), &self.config);
            debug!(route = head.route(), "pagination metadata withheld");
        }
    }
}
