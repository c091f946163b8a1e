//! Logger setup for binaries that embed the materializer.
//!
//! The library itself only emits through the `log` facade: node construction
//! and binding at `debug`, id registration and constructor ranking at
//! `trace`, listener fields that attach to nothing at `warn`.

mod init;

pub use init::{LoggingConfig, init_logging};
