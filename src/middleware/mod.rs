//! Middleware layer.
//!
//! Middleware intercepts a routed request twice: once before the handler
//! runs and once after it has produced a response, before anything is sent.
//!
//! ```text
//! request ─► on_request (a) ─► on_request (b) ─► handler
//!                                                   │
//! response ◄─ on_response (a) ◄─ on_response (b) ◄──┘
//! ```
//!
//! Request hooks run in registration order, response hooks in reverse. If a
//! request hook short-circuits with a response, the handler is skipped and
//! only the middleware that already ran its request hook sees the response.
//!
//! Hooks are synchronous and receive the request or response of one
//! exchange. Per-request state belongs in [`Request::extensions_mut`] or
//! [`Response::extensions_mut`], never in the middleware value itself, which
//! is shared by every in-flight request.
//!
//! Unmatched routes answer `404` without running any middleware.
//!
//! Built-in middleware:
//! - [`paginate`] — page/limit extraction and metadata envelopes

use std::sync::Arc;

use crate::request::{Request, RequestHead};
use crate::response::Response;

pub mod paginate;

/// A pair of lifecycle hooks around the handler.
pub trait Middleware: Send + Sync + 'static {
    /// Runs before the handler. Returning `Err` answers the request with
    /// that response instead of calling the handler.
    fn on_request(&self, req: &mut Request) -> Result<(), Response> {
        let _ = req;
        Ok(())
    }

    /// Runs after the handler, before the response is serialised.
    fn on_response(&self, head: &RequestHead, res: &mut Response) {
        let _ = (head, res);
    }
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;
