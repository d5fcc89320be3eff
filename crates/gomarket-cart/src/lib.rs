//! Persistent shopping cart state for the GoMarketplace storefront.
//!
//! The cart is a short list of line items, one per product, kept in memory
//! and mirrored to a [`KeyValueStore`](gomarket_storage::KeyValueStore) after
//! every mutation. On startup the store hydrates from the last snapshot.
//!
//! - [`CartItems`] - the pure line item list and its mutation rules
//! - [`CartStore`] - the shared, persisted cart handed to UI consumers
//! - [`CartConfig`] - storage keys and the zero-quantity policy
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gomarket_cart::prelude::*;
//! use gomarket_storage::MemoryStore;
//!
//! let cart = CartStore::open(Arc::new(MemoryStore::new()), CartConfig::default()).await?;
//!
//! cart.add_to_cart(Product::new("p1", "Shirt", "https://cdn/shirt.png", 10.0)).await?;
//! cart.increment(&ProductId::new("p1")).await?;
//!
//! let items = cart.items().await;
//! assert_eq!(items[0].quantity, 2);
//! ```

pub mod cart;
pub mod config;
pub mod error;
pub mod ids;

pub use cart::{CartItem, CartItems, CartStore, Hydration, Product};
pub use config::{CartConfig, ZeroQuantity};
pub use error::CartError;
pub use ids::ProductId;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{CartItem, CartItems, CartStore, Hydration, Product};
    pub use crate::config::{CartConfig, ZeroQuantity};
    pub use crate::error::CartError;
    pub use crate::ids::ProductId;
}
