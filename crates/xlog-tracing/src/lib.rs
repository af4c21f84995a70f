//! Bridge from `tracing` to xlog
//!
//! Lets crates instrumented with `tracing` macros end up in the same hourly
//! files as direct xlog calls:
//! - [`XlogLayer`] forwards events, message first, then `key=value` fields
//! - [`init`] installs it once, behind an `EnvFilter`

pub mod init;
pub mod layer;

pub use init::init;
pub use layer::{severity_of, XlogLayer};
