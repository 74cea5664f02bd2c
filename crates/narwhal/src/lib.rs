//! Dagre-compatible graph layout algorithms.
//!
//! The crate is organized as a pipeline of focused passes over a [`graphlib::Graph`]:
//! [`acyclic`] breaks cycles, [`rank`] assigns an integer layer to every node via network
//! simplex, [`normalize`] and the compound-graph helpers ([`nesting_graph`],
//! [`parent_dummy_chains`], [`add_border_segments`]) materialize dummy/border nodes, [`order`]
//! minimizes edge crossings within each layer, and [`position`] assigns final `(x, y)`
//! coordinates with the Brandes & Köpf algorithm. [`pipeline::layout_dagreish`] (re-exported as
//! [`layout`]) drives the full sequence.

pub use narwhal_graph as graphlib;

mod model;
pub use model::*;

pub mod acyclic;
pub mod add_border_segments;
pub mod coordinate_system;
pub mod data;
pub mod greedy_fas;
pub mod nesting_graph;
pub mod normalize;
pub mod order;
pub mod parent_dummy_chains;
mod pipeline;
pub mod position;
pub mod rank;
pub mod self_edges;
pub mod util;

pub use pipeline::layout_dagreish as layout;

/// The crate's own version, matching `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
