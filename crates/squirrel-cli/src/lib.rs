//! Library side of the `squirrel-dash` command.
//!
//! Loading runs off the main thread; everything that touches the
//! [`squirrel_dashboard::Dashboard`] stays on it.

pub mod logging;
pub mod report;
pub mod session;
