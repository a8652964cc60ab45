pub mod config;
pub mod connection;
pub mod feed_client;
