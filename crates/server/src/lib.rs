//! Geonear Server
//!
//! HTTP front end for the geonear nearest-location engine.
//!
//! # Endpoints
//!
//! - `GET /api/locations` - every loaded record
//! - `GET /api/locations/find?lat=&lng=&method=index|brute` - nearest record
//! - `GET /api/locations/within?lat=&lng=&miles=` - records within a radius
//!
//! # Example
//!
//! ```ignore
//! use geonear_server::run_server;
//!
//! run_server(addr, catalog, shutdown).await?;
//! ```

pub mod handler;
pub mod transport;

pub use handler::{ApiError, Handler, RadiusMatch};
pub use transport::http::{router, run_server};
