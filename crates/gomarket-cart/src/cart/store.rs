//! The persisted cart handed to storefront consumers.

use std::sync::Arc;

use gomarket_storage::KeyValueStore;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cart::{CartItem, CartItems, Product};
use crate::config::CartConfig;
use crate::error::CartError;
use crate::ids::ProductId;

/// Result of a hydration read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    /// A snapshot was found under the storage key and loaded.
    Restored { items: usize },
    /// A snapshot was found under a legacy key, loaded, and re-persisted
    /// under the storage key.
    Migrated { from: String, items: usize },
    /// No snapshot exists; the cart was left as is.
    Empty,
    /// A snapshot was found but could not be parsed, and nothing else was
    /// loaded; the cart was left as is and the bad data is still stored.
    Discarded,
}

#[derive(Debug, Default)]
struct CartState {
    items: CartItems,
    hydrated: bool,
}

/// Shopping cart mirrored to a key-value store.
///
/// Construct one per application and share it (it is `Send + Sync`) with
/// every consumer that reads or edits the cart. Each mutation applies to the
/// in-memory list and then writes the full post-mutation list under
/// [`CartConfig::storage_key`]. The state lock is held across that write, so
/// snapshots land in the order mutations were applied.
///
/// Persistence failures are returned to the caller; the in-memory change is
/// kept.
pub struct CartStore<S: ?Sized> {
    store: Arc<S>,
    config: CartConfig,
    state: Mutex<CartState>,
}

impl<S: KeyValueStore + ?Sized> CartStore<S> {
    /// Create an empty, not yet hydrated cart.
    ///
    /// The cart is usable immediately; call [`hydrate`](Self::hydrate) to
    /// load the last snapshot.
    pub fn new(store: Arc<S>, config: CartConfig) -> Self {
        Self {
            store,
            config,
            state: Mutex::new(CartState::default()),
        }
    }

    /// Create a cart and hydrate it from the last snapshot.
    pub async fn open(store: Arc<S>, config: CartConfig) -> Result<Self, CartError> {
        let cart = Self::new(store, config);
        cart.hydrate().await?;
        Ok(cart)
    }

    /// Load the last persisted snapshot into memory.
    ///
    /// A snapshot replaces the in-memory list in full. When the storage key
    /// holds nothing, the legacy keys are tried in order and the first
    /// parseable one is migrated. Line items restored at zero follow the
    /// configured [`ZeroQuantity`](crate::ZeroQuantity) policy. An
    /// unparseable snapshot is logged and ignored.
    pub async fn hydrate(&self) -> Result<Hydration, CartError> {
        let mut state = self.state.lock().await;
        let key = &self.config.storage_key;

        let outcome = match self.store.get(key).await? {
            Some(raw) => match self.parse_snapshot(key, &raw) {
                Some(items) => {
                    let count = items.unique_item_count();
                    state.items = items;
                    Hydration::Restored { items: count }
                }
                None => Hydration::Discarded,
            },
            None => self.hydrate_legacy(&mut state).await?,
        };

        state.hydrated = true;
        info!(key = %key, outcome = ?outcome, "Cart hydrated");
        Ok(outcome)
    }

    async fn hydrate_legacy(&self, state: &mut CartState) -> Result<Hydration, CartError> {
        let mut discarded = false;

        for legacy_key in &self.config.legacy_keys {
            let Some(raw) = self.store.get(legacy_key).await? else {
                continue;
            };
            let Some(items) = self.parse_snapshot(legacy_key, &raw) else {
                discarded = true;
                continue;
            };

            let count = items.unique_item_count();
            state.items = items;
            self.persist(&state.items).await?;
            info!(from = %legacy_key, to = %self.config.storage_key, items = count, "Migrated legacy cart snapshot");
            return Ok(Hydration::Migrated {
                from: legacy_key.clone(),
                items: count,
            });
        }

        Ok(if discarded {
            Hydration::Discarded
        } else {
            Hydration::Empty
        })
    }

    fn parse_snapshot(&self, key: &str, raw: &str) -> Option<CartItems> {
        match serde_json::from_str::<CartItems>(raw) {
            Ok(mut items) => {
                let dropped = items.apply_zero_policy(self.config.zero_quantity);
                if dropped > 0 {
                    debug!(key, dropped, "Dropped zero-quantity items from snapshot");
                }
                Some(items)
            }
            Err(e) => {
                warn!(key, error = %e, "Ignoring malformed cart snapshot");
                None
            }
        }
    }

    /// Whether a hydration read has completed.
    pub async fn is_hydrated(&self) -> bool {
        self.state.lock().await.hydrated
    }

    /// Current line items in insertion order.
    pub async fn items(&self) -> Vec<CartItem> {
        self.state.lock().await.items.as_slice().to_vec()
    }

    /// Copy of the current line item list, for totals and lookups.
    pub async fn snapshot(&self) -> CartItems {
        self.state.lock().await.items.clone()
    }

    /// Add one unit of `product` and persist.
    ///
    /// Returns the product's resulting quantity.
    pub async fn add_to_cart(&self, product: Product) -> Result<u32, CartError> {
        let mut state = self.state.lock().await;
        let id = product.id.clone();
        let quantity = state.items.add(product);
        debug!(product_id = %id, quantity, "Added product to cart");

        self.persist(&state.items).await?;
        Ok(quantity)
    }

    /// Add one unit to a product already in the cart and persist.
    ///
    /// Returns the new quantity, or `None` (without writing) if the product
    /// is not in the cart.
    pub async fn increment(&self, id: &ProductId) -> Result<Option<u32>, CartError> {
        let mut state = self.state.lock().await;
        let Some(quantity) = state.items.increment(id) else {
            debug!(product_id = %id, "Increment ignored, product not in cart");
            return Ok(None);
        };
        debug!(product_id = %id, quantity, "Incremented cart item");

        self.persist(&state.items).await?;
        Ok(Some(quantity))
    }

    /// Remove one unit from a product in the cart and persist.
    ///
    /// At zero the configured [`ZeroQuantity`](crate::ZeroQuantity) policy
    /// applies. Returns the new quantity, or `None` (without writing) if the
    /// product is not in the cart.
    pub async fn decrement(&self, id: &ProductId) -> Result<Option<u32>, CartError> {
        let mut state = self.state.lock().await;
        let Some(quantity) = state.items.decrement(id, self.config.zero_quantity) else {
            debug!(product_id = %id, "Decrement ignored, product not in cart");
            return Ok(None);
        };
        debug!(product_id = %id, quantity, "Decremented cart item");

        self.persist(&state.items).await?;
        Ok(Some(quantity))
    }

    /// Drop a product from the cart and persist.
    ///
    /// Returns whether the product was present.
    pub async fn remove(&self, id: &ProductId) -> Result<bool, CartError> {
        let mut state = self.state.lock().await;
        if !state.items.remove(id) {
            return Ok(false);
        }
        debug!(product_id = %id, "Removed product from cart");

        self.persist(&state.items).await?;
        Ok(true)
    }

    /// Empty the cart and delete its snapshot.
    pub async fn clear(&self) -> Result<(), CartError> {
        let mut state = self.state.lock().await;
        state.items.clear();
        self.store.remove(&self.config.storage_key).await?;
        info!(key = %self.config.storage_key, "Cart cleared");
        Ok(())
    }

    /// The configuration this cart was built with.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    async fn persist(&self, items: &CartItems) -> Result<(), CartError> {
        let snapshot = serde_json::to_string(items)?;
        self.store.set(&self.config.storage_key, snapshot).await?;
        debug!(
            key = %self.config.storage_key,
            items = items.unique_item_count(),
            "Persisted cart snapshot"
        );
        Ok(())
    }
}
