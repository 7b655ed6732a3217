//! A minimal asynchronous HTTP/1.1 host built around a single pluggable
//! handler.
//!
//! Each accepted connection serves one request. The raw request is parsed,
//! turned into an [`Environment`], handed to the registered [`Handler`],
//! and whatever the handler leaves on the environment's response side is
//! written back before the connection is closed.
//!
//! ```no_run
//! use fracture_http::{Server, handler_fn};
//!
//! async_std::task::block_on(async {
//!     let mut server = Server::new(handler_fn(|env| {
//!         Box::pin(async move {
//!             env.response.set_status(200);
//!             env.response.headers.append("Content-Type", "text/plain");
//!             env.response.write("Hello, world!");
//!             Ok(())
//!         })
//!     }));
//!
//!     server.start(6667).await.expect("port 6667 is free");
//!     // ...
//!     server.stop().await;
//! });
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod handler;
pub mod http;
pub mod net;

pub use crate::config::ServerConfig;
pub use crate::environment::{
    Environment, Extensions, RequestBody, RequestEnv, ResponseBody, ResponseEnv,
};
pub use crate::error::{
    ConfigError, HandlerError, HandlerFailure, ParseError, ResponseError, ServerError,
};
pub use crate::handler::{Handler, HandlerFn, HandlerFuture, Invoker, handler_fn};
pub use crate::http::headers::HttpHeaders;
pub use crate::http::{HttpMethod, HttpVersion};
pub use crate::net::server::{Server, ServerState};
