pub mod client;
pub mod error;
pub mod exchange;
pub mod model;
pub mod protocols;
pub mod shared;
