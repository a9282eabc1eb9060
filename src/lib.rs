//! Duckweed coverage controller library.
//!
//! Estimates how much of a vessel's surface is covered by duckweed from a
//! camera frame, then drives the inlet valve and the pH adjustment relay.
//! Hardware, pH probes and segmentation backends sit behind the port
//! traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod sensors;
pub mod state;
pub mod vision;
