//! Command implementations

mod core;
mod serve;
mod users;

pub use core::*;
pub use serve::*;
pub use users::*;
