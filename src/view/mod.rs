//! Pure view-model computations shared by the page components.

pub mod reward_ring;
