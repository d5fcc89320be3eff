//! Shopping cart module.
//!
//! Contains the line item list and the persisted store around it.

mod items;
mod store;

pub use items::{CartItem, CartItems, Product};
pub use store::{CartStore, Hydration};
