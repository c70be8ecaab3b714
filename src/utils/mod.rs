//! Shared utilities.
//!
//! | Module   | Purpose                                         |
//! |----------|-------------------------------------------------|
//! | `path`   | Path normalization against the project root     |
//! | `plural` | Count/noun formatting for log lines             |
//! | `write`  | Atomic file replacement (temp file + rename)    |

pub mod path;
pub mod plural;
pub mod write;

pub use plural::plural_count;
pub use write::{WriteError, write_atomic};
