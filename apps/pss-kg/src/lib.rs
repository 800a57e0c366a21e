//! # pss-kg
//!
//! Library half of the pss-kg binary: configuration, record I/O and the
//! command implementations, exposed for integration tests.

pub mod cli;
pub mod config;
pub mod io;
