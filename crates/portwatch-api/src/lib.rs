// portwatch-api: Async Rust client for a host's port-status service

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{Endpoints, StatusClient};
pub use error::Error;
pub use models::{
    PortStatusBatch, RawArpNeighbor, RawNeighbor, RawPortRecord, RawTopology,
};
pub use transport::{TlsMode, TransportConfig};
