use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use super::Handler;
use crate::environment::Environment;
use crate::error::HandlerFailure;

/// Runs the registered handler against one environment per call.
///
/// Cloning is cheap; each connection task holds its own clone. The invoker
/// keeps no state between calls.
#[derive(Clone)]
pub struct Invoker {
    handler: Arc<dyn Handler>,
}

impl Invoker {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    /// Invokes the handler and waits for its completion signal.
    ///
    /// A panic, whether raised while creating the future or while polling
    /// it, is contained and reported as [`HandlerFailure::Panic`].
    pub async fn invoke(&self, env: &mut Environment) -> Result<(), HandlerFailure> {
        let handler = &self.handler;
        // `call` runs on first poll, so both panic sites unwind into `catch_unwind`.
        let completion = async move { handler.call(env).await };

        match AssertUnwindSafe(completion).catch_unwind().await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(HandlerFailure::Error(source)),
            Err(payload) => Err(HandlerFailure::Panic(panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::HandlerError;
    use crate::handler::{HandlerFuture, handler_fn};
    use crate::http::request::HttpRequest;
    use crate::http::{HttpMethod, HttpVersion};

    fn env() -> Environment {
        let req = HttpRequest::new(HttpMethod::Get, "/", HttpVersion::V1_1);
        Environment::from_request(req, None, None)
    }

    #[async_std::test]
    async fn successful_handler_fills_response() {
        let invoker = Invoker::new(Arc::new(handler_fn(|env| {
            Box::pin(async move {
                env.response.set_status(200);
                env.response.write(env.request.path.clone());
                Ok(())
            })
        })));

        let mut env = env();
        invoker.invoke(&mut env).await.unwrap();
        assert_eq!(env.response.status, Some(200));
        assert_eq!(env.response.body.as_bytes(), b"/");
    }

    #[async_std::test]
    async fn returned_error_is_a_failure() {
        let invoker = Invoker::new(Arc::new(handler_fn(|_env| {
            Box::pin(async move { Err(HandlerError::from("database unavailable")) })
        })));

        let err = invoker.invoke(&mut env()).await.unwrap_err();
        assert!(matches!(err, HandlerFailure::Error(_)));
        assert!(err.to_string().contains("database unavailable"));
    }

    #[async_std::test]
    async fn panic_while_polling_is_contained() {
        let invoker = Invoker::new(Arc::new(handler_fn(|env| {
            Box::pin(async move {
                if env.request.path == "/" {
                    panic!("boom");
                }
                Ok(())
            })
        })));

        let err = invoker.invoke(&mut env()).await.unwrap_err();
        assert!(matches!(err, HandlerFailure::Panic(ref msg) if msg == "boom"));
    }

    struct EagerPanic;

    impl Handler for EagerPanic {
        fn call<'a>(&'a self, _env: &'a mut Environment) -> HandlerFuture<'a> {
            panic!("failed before returning a future: {}", 42)
        }
    }

    #[async_std::test]
    async fn panic_while_creating_the_future_is_contained() {
        let invoker = Invoker::new(Arc::new(EagerPanic));

        let err = invoker.invoke(&mut env()).await.unwrap_err();
        assert!(
            matches!(err, HandlerFailure::Panic(ref msg) if msg == "failed before returning a future: 42")
        );
    }

    struct Counting {
        calls: AtomicUsize,
    }

    impl Handler for Counting {
        fn call<'a>(&'a self, env: &'a mut Environment) -> HandlerFuture<'a> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
                env.response.set_status(200);
                env.response.write(n.to_string());
                Ok(())
            })
        }
    }

    #[async_std::test]
    async fn clones_share_one_handler() {
        let handler = Arc::new(Counting {
            calls: AtomicUsize::new(0),
        });
        let invoker = Invoker::new(handler.clone());
        let other = invoker.clone();

        let (mut a, mut b) = (env(), env());
        invoker.invoke(&mut a).await.unwrap();
        other.invoke(&mut b).await.unwrap();

        assert_eq!(handler.calls.load(Ordering::SeqCst), 2);
        assert_ne!(a.response.body, b.response.body);
    }
}
