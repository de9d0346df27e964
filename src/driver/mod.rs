//! Client side of the COSI driver's Identity service.
//!
//! The relay only needs reachability: a probe succeeds when the driver answers
//! `DriverGetInfo` over its Unix socket before the probe deadline.

mod client;
pub mod proto;

pub use client::{probe_driver, DriverConnection, DriverInfo};
