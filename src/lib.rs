//! A small Rust client for the Powderlines SNOTEL snow-telemetry API.
//!
//! Powderlines fronts the NRCS SNOTEL network of backcountry weather
//! stations. This crate wraps its three endpoints and hands every result
//! back as a [`DataFrame`]: find the stations closest to a coordinate,
//! pull a station's daily observation history, list the stations of a
//! state, or summarize elevations across the whole inventory.
//!
//! ## Quick start
//! - The public endpoint needs no credentials; set `POWDERLINES_URL` only
//!   to point the client somewhere else.
//! - Stations are addressed by their triplet, e.g. `1159:WA:SNTL`.
//!
//! ```no_run
//! use anyhow::Result;
//! use powderlines::{Client, ClientConfig};
//!
//! fn main() -> Result<()> {
//!     let client = Client::new(ClientConfig::default())?;
//!
//!     let nearby = client.closest_stations(47, -121, 3)?;
//!     println!("{nearby}");
//!
//!     let history = client.station_observations("1159:WA:SNTL", 7)?;
//!     println!("{history}");
//!     Ok(())
//! }
//! ```
//!
//! For full usage and configuration details, see the crate README.

#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
mod fetch;
mod filter;
mod frame;
mod schema;
mod stats;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use frame::DataFrame;
pub use schema::{Column, Schema};
