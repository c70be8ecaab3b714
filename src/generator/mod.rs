//! Output generators.
//!
//! - **OPML**: core feed tree plus this run's discovery category (`feeds.opml`)

pub mod opml;

pub use opml::compose;
