//! The single handler slot and its invocation contract.
//!
//! A handler receives the request's [`Environment`] by mutable reference
//! and returns a future; the response side is considered complete when
//! that future resolves to `Ok(())`. One handler value serves every
//! connection concurrently, so it must be `Send + Sync` and keep any
//! per-request state in the environment.

mod invoker;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use invoker::Invoker;

use crate::environment::Environment;
use crate::error::HandlerError;

/// Completion signal returned by a handler.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + 'a>>;

pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, env: &'a mut Environment) -> HandlerFuture<'a>;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn call<'a>(&'a self, env: &'a mut Environment) -> HandlerFuture<'a> {
        (**self).call(env)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn call<'a>(&'a self, env: &'a mut Environment) -> HandlerFuture<'a> {
        (**self).call(env)
    }
}

/// Handler backed by a closure, see [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wraps a closure as a [`Handler`].
///
/// ```
/// use fracture_http::handler_fn;
///
/// let hello = handler_fn(|env| {
///     Box::pin(async move {
///         env.response.set_status(200);
///         env.response.headers.append("Content-Type", "text/plain");
///         env.response.write("Hello, world!");
///         Ok(())
///     })
/// });
/// # let _ = hello;
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(&'a mut Environment) -> HandlerFuture<'a> + Send + Sync + 'static,
{
    HandlerFn { f }
}

impl<F> Handler for HandlerFn<F>
where
    F: for<'a> Fn(&'a mut Environment) -> HandlerFuture<'a> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, env: &'a mut Environment) -> HandlerFuture<'a> {
        (self.f)(env)
    }
}
