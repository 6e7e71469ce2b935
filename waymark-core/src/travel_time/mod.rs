//! Offline node-to-node travel times.
//!
//! The `TravelTimeProvider` trait abstracts the computation of pairwise
//! travel times between road-network nodes. Callers supply a slice of node
//! ids and receive a square matrix of optional
//! [`Duration`](std::time::Duration) values, with `None` marking pairs that
//! cannot be reached.
//!
//! Errors are returned when inputs are invalid, e.g. an empty slice.

mod error;
mod provider;

pub use error::TravelTimeError;
pub use provider::{NetworkTravelTimes, TravelTimeMatrix, TravelTimeProvider};
