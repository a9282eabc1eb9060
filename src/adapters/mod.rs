//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements  | Connects to             |
//! |---------------|-------------|-------------------------|
//! | `env_config`  | ConfigPort  | Process environment     |
//! | `file_config` | ConfigPort  | JSON file on disk       |
//! | `log_sink`    | EventSink   | `log` facade            |
//!
//! Actuator drivers live in [`crate::drivers`], pH sources in
//! [`crate::sensors`].

pub mod env_config;
pub mod file_config;
pub mod log_sink;
