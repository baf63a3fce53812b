//! Radix-tree request router and middleware pipeline.
//!
//! One tree per HTTP method. O(path-length) lookup. Each entry keeps the
//! pattern it was registered under, so middleware can filter on the route
//! rather than on the concrete path.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, Uri};
use matchit::Router as MatchitRouter;
use tracing::trace;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{BoxedMiddleware, Middleware};
use crate::request::{Query, Request};
use crate::response::Response;

struct Route {
    pattern: Arc<str>,
    handler: BoxedHandler,
}

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve)
/// or drive it in-process with [`Router::inject`]. Registration methods
/// return `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Route>>,
    middleware: Vec<BoxedMiddleware>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), middleware: Vec::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use pagemeta::{Method, Request, Response, Router};
    /// # async fn get_user(_: Request) -> Response { Response::text("") }
    /// # async fn list_users(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::GET, "/users",      list_users)
    ///     .on(Method::GET, "/users/{id}", get_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with an existing one.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        let route = Route { pattern: Arc::from(path), handler: handler.into_boxed_handler() };
        self.routes
            .entry(method)
            .or_default()
            .insert(path, route)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Append a middleware. See [`middleware`](crate::middleware) for ordering.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Dispatches a request in-process, without a socket.
    ///
    /// Runs the same pipeline as the server: routing, request hooks,
    /// handler, response hooks.
    pub async fn inject(&self, req: http::Request<Bytes>) -> Response {
        let (parts, body) = req.into_parts();
        self.dispatch(&parts.method, &parts.uri, parts.headers, body).await
    }

    pub(crate) async fn dispatch(
        &self,
        method: &Method,
        uri: &Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> Response {
        let path = uri.path();
        let Some((handler, pattern, params)) = self.lookup(method, path) else {
            return Response::status(StatusCode::NOT_FOUND);
        };

        let mut req = Request::new(
            method.clone(),
            path.to_owned(),
            pattern,
            Query::parse(uri.query()),
            headers,
            body,
            params,
        );

        let mut entered = 0;
        let mut early = None;
        for mw in &self.middleware {
            if let Err(res) = mw.on_request(&mut req) {
                early = Some(res);
                break;
            }
            entered += 1;
        }

        let head = req.head();
        let mut res = match early {
            Some(res) => {
                trace!(route = head.route(), status = %res.status_code(), "request short-circuited");
                res
            }
            None => handler.call(req).await,
        };

        for mw in self.middleware[..entered].iter().rev() {
            mw.on_response(&head, &mut res);
        }
        res
    }

    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, Arc<str>, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((
            Arc::clone(&matched.value.handler),
            Arc::clone(&matched.value.pattern),
            params,
        ))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
