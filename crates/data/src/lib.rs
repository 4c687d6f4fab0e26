//! Loading and validation of the firm dataset and board configuration.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
