//! API request handlers

mod auth;
mod budgets;
mod reports;
mod transactions;

pub use auth::*;
pub use budgets::*;
pub use reports::*;
pub use transactions::*;
