//! Brandes & Köpf (BK) horizontal compaction.
//!
//! This module is a parity-oriented port of Dagre's `position/bk` helpers, split into the public
//! conflict/alignment/compaction API (`core`) and the private geometry helpers it shares (`util`).

mod core;
mod util;

pub use core::{
    Alignment, Conflicts, add_conflict, align_coordinates, balance, find_smallest_width_alignment,
    find_type1_conflicts, find_type2_conflicts, has_conflict, horizontal_compaction,
    position_x, position_x_with_layering, vertical_alignment,
};
