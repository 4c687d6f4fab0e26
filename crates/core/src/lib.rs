//! Board logic for the firm card catalog: color pipeline, catalog building,
//! placement and filtering. Keep this crate free of IO and platform concerns.

pub mod board;
pub mod cards;
pub mod catalog;
pub mod color;
pub mod config;
pub mod content;
pub mod events;
pub mod filter;
pub mod palette;
pub mod placeholder;
pub mod placement;

pub use board::*;
pub use cards::*;
pub use catalog::*;
pub use color::*;
pub use config::*;
pub use content::*;
pub use events::*;
pub use filter::*;
pub use palette::*;
pub use placeholder::*;
pub use placement::*;
