//! Calibration and tool configuration.
//!
//! - [`PlateConfig`]: physical plate proportions and the canonical template
//!   size used by the edge finder.
//! - [`edge_tool`]: JSON configuration of the `plate_edges` command line tool.

pub mod edge_tool;
mod plate;

pub use plate::PlateConfig;
