//! Resource routers: ordered `(verb, path-pattern, handler)` triples.
//!
//! A [`ResourceRouter`] is the unit a resource module hands to the server. The
//! server never looks inside the handlers; it only prefixes the triples and
//! appends them to the application's dispatch table (see
//! [`Server::add_router`](crate::server::Server::add_router)).

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    handler::Handler,
    response::Response,
    routing::{MethodFilter, MethodRouter},
};

/// Boxed future returned by [`RequestHandler::dispatch`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// HTTP verbs a resource router can bind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    fn filter(self) -> MethodFilter {
        match self {
            Verb::Get => MethodFilter::GET,
            Verb::Post => MethodFilter::POST,
            Verb::Put => MethodFilter::PUT,
            Verb::Patch => MethodFilter::PATCH,
            Verb::Delete => MethodFilter::DELETE,
        }
    }
}

impl core::fmt::Display for Verb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// A single dispatch operation: request in, response out.
pub trait RequestHandler: Send + Sync + 'static {
    fn dispatch(&self, req: Request) -> HandlerFuture;
}

/// Adapts a plain async closure into a [`RequestHandler`].
pub struct HandlerFn<F>(F);

pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    HandlerFn(f)
}

impl<F, Fut> RequestHandler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn dispatch(&self, req: Request) -> HandlerFuture {
        Box::pin((self.0)(req))
    }
}

/// Adapts an axum handler (extractor-based async fn) plus its state.
struct AxumHandler<H, T, S> {
    handler: H,
    state: S,
    _marker: PhantomData<fn() -> T>,
}

impl<H, T, S> RequestHandler for AxumHandler<H, T, S>
where
    H: Handler<T, S> + Sync,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    fn dispatch(&self, req: Request) -> HandlerFuture {
        Box::pin(self.handler.clone().call(req, self.state.clone()))
    }
}

/// One `(verb, path-pattern, handler)` triple.
#[derive(Clone)]
pub struct Route {
    verb: Verb,
    path: String,
    handler: Arc<dyn RequestHandler>,
}

impl Route {
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Path pattern relative to the mount prefix (axum syntax, e.g. `/:id`).
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl core::fmt::Debug for Route {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Route")
            .field("verb", &self.verb)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Ordered set of routes for one resource type.
///
/// Binding the same `(verb, path)` twice replaces the earlier handler in place.
#[derive(Debug, Clone, Default)]
pub struct ResourceRouter {
    routes: Vec<Route>,
}

impl ResourceRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a stateless axum handler.
    pub fn route<H, T>(self, verb: Verb, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()> + Sync,
        T: 'static,
    {
        self.route_with_state(verb, path, handler, ())
    }

    /// Bind an axum handler that extracts `State<S>`.
    pub fn route_with_state<H, T, S>(self, verb: Verb, path: &str, handler: H, state: S) -> Self
    where
        H: Handler<T, S> + Sync,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        self.route_handler(
            verb,
            path,
            AxumHandler {
                handler,
                state,
                _marker: PhantomData,
            },
        )
    }

    /// Bind any [`RequestHandler`].
    pub fn route_handler(mut self, verb: Verb, path: &str, handler: impl RequestHandler) -> Self {
        let route = Route {
            verb,
            path: path.to_string(),
            handler: Arc::new(handler),
        };

        match self
            .routes
            .iter_mut()
            .find(|r| r.verb == verb && r.path == path)
        {
            Some(existing) => *existing = route,
            None => self.routes.push(route),
        }
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Build the axum dispatch table for these routes (unprefixed).
    ///
    /// Verbs sharing a path are merged into one method router, in insertion order.
    pub fn into_axum(self) -> Router {
        let mut by_path: Vec<(String, Vec<(Verb, Arc<dyn RequestHandler>)>)> = Vec::new();
        for route in self.routes {
            match by_path.iter_mut().find(|(path, _)| *path == route.path) {
                Some((_, verbs)) => verbs.push((route.verb, route.handler)),
                None => by_path.push((route.path, vec![(route.verb, route.handler)])),
            }
        }

        let mut router = Router::new();
        for (path, verbs) in by_path {
            let method_router = verbs
                .into_iter()
                .fold(MethodRouter::<()>::new(), |method_router, (verb, handler)| {
                    method_router.on(verb.filter(), move |req: Request| handler.dispatch(req))
                });
            router = router.route(&path, method_router);
        }
        router
    }
}

/// A resource router paired with the prefix it is mounted at.
#[derive(Debug, Clone)]
pub struct ResourceMount {
    pub prefix: String,
    pub router: ResourceRouter,
}

impl ResourceMount {
    pub fn new(prefix: impl Into<String>, router: ResourceRouter) -> Self {
        Self {
            prefix: prefix.into(),
            router,
        }
    }
}
