//! Small reusable data structures shared by the layout algorithms.

pub mod list;
