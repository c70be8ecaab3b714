//! Configuration section definitions.
//!
//! Each module corresponds to a section in `feedwheel.toml`:
//!
//! | Module     | TOML Section   | Purpose                                  |
//! |------------|----------------|------------------------------------------|
//! | `rotation` | `[rotation]`   | Recency gate, score weights, quota       |
//! | `paths`    | `[paths]`      | Pool, core tree, output, rotation doc    |
//! | `output`   | `[output]`     | Generated document title and labels      |

mod output;
mod paths;
mod rotation;

pub use output::OutputConfig;
pub use paths::PathsConfig;
pub use rotation::RotationConfig;
