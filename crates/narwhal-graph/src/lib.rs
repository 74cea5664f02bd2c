//! Graph container APIs used by `narwhal`.

mod graph;

pub use graph::alg;
pub use graph::{EdgeKey, Graph, GraphOptions};
