pub(crate) mod connection;
pub mod server;
