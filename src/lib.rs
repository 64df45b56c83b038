//! Generate `setup.py` for a Python distribution from a template and a Maven `pom.xml`.
//!
//! # Installing
//!
//! The binary reads `setup.py.template` from its own directory. `cargo install`
//! only installs the binary, so copy the shipped template beside it:
//!
//! ```sh
//! cargo install --path .
//! cp templates/setup.py.template "$(dirname "$(command -v setupgen)")/"
//! ```
//!
//! Without it, runs that do not pass `--template` fail with `internal.io_error`.

/// Macro for prefixed status logging to stderr (only when stderr is a terminal).
///
/// Usage:
/// ```ignore
/// log_status!("setup", "Wrote {}", path.display());
/// ```
#[macro_export]
macro_rules! log_status {
    ($prefix:expr, $($arg:tt)*) => {
        if ::std::io::IsTerminal::is_terminal(&::std::io::stderr()) {
            eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*));
        }
    };
}

pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `setupgen::descriptor` instead of `setupgen::core::descriptor`
pub use crate::core::*;
pub use crate::utils::*;
