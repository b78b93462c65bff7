use std::collections::HashMap;

use crate::http::request::{Method, Request};
use crate::http::response::Response;

/// A registered request handler.
///
/// Handlers are pure functions from a request to a response; they must not
/// retain references past their own invocation. Anything that goes wrong
/// inside a handler is its job to translate into a Response.
pub type Handler = Box<dyn Fn(&Request) -> Response + Send + Sync>;

/// Outcome of resolving a (path, method) pair.
pub enum RouteOutcome<'a> {
    /// A handler is registered for this exact path and method.
    Found(&'a Handler),
    /// The path is registered, but not for this method (405).
    MethodNotAllowed,
    /// No route registered for this path (404).
    NotFound,
}

/// Registry mapping exact paths to per-method handlers.
///
/// Built once at startup and never mutated afterwards, so workers can share
/// it behind an `Arc` and resolve concurrently without locking. Path matching
/// is exact string equality: no trailing-slash normalization, no
/// percent-decoding, no query-string stripping.
#[derive(Default)]
pub struct Router {
    routes: HashMap<String, HashMap<Method, Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Registers a handler for a (path, method) pair.
    ///
    /// Registering the same pair again replaces the earlier handler.
    pub fn register<F>(&mut self, path: impl Into<String>, method: Method, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.routes
            .entry(path.into())
            .or_default()
            .insert(method, Box::new(handler));
    }

    /// Resolves a path and method to a handler, distinguishing an unknown
    /// path from a known path with an unregistered method.
    pub fn resolve(&self, path: &str, method: Method) -> RouteOutcome<'_> {
        match self.routes.get(path) {
            Some(methods) => match methods.get(&method) {
                Some(handler) => RouteOutcome::Found(handler),
                None => RouteOutcome::MethodNotAllowed,
            },
            None => RouteOutcome::NotFound,
        }
    }

    /// Dispatches a request, synthesizing the 404/405 responses for misses.
    pub fn dispatch(&self, req: &Request) -> Response {
        match self.resolve(&req.path, req.method) {
            RouteOutcome::Found(handler) => handler(req),
            RouteOutcome::MethodNotAllowed => Response::method_not_allowed(),
            RouteOutcome::NotFound => Response::not_found(),
        }
    }
}
