//! Players for the Reversi engine
//!
//! [`MoveSelector`] is the seam between the rules and whoever picks moves:
//! bots, a human behind a UI, or a remote client runtime. [`play_local`]
//! drives two selectors through a full game without any networking.

pub mod play;
pub mod select;

pub use reversi_core as core;
pub use reversi_types as types;

pub use play::{play_from, play_local};
pub use select::{HumanInput, HumanSelector, MaxFlipSelector, MoveSelector, RandomSelector};
