//! Deck, draw selection and layout rules. Keep this crate free of IO and platform concerns.

pub mod deck;
pub mod draw;
pub mod layout;
pub mod notice;
pub mod outs;
pub mod platform;
pub mod rng;

pub use deck::*;
pub use draw::*;
pub use layout::*;
pub use notice::*;
pub use outs::*;
pub use platform::*;
pub use rng::*;
