//! Utility functions for Arrow data, file output and logging.

pub mod arrow;
pub mod io;
pub mod logging;
