//! Cart line items and the rules for mutating them.

use serde::{Deserialize, Serialize};

use crate::config::ZeroQuantity;
use crate::ids::ProductId;

/// A product as offered to the cart, before it has a quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Product image URI.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
}

impl Product {
    /// Create a new product descriptor.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

/// A line item in the cart.
///
/// The serialized field names are the snapshot format and must not change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product ID, unique within the cart.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Product image URI.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
    /// Units of this product in the cart.
    pub quantity: u32,
}

impl CartItem {
    /// Create a line item for `product` with the given quantity.
    pub fn new(product: Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity,
        }
    }

    /// Line total (unit price * quantity).
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Ordered list of line items with at most one entry per product.
///
/// Order is insertion order. Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CartItems {
    items: Vec<CartItem>,
}

impl CartItems {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line item or appends a new one with quantity 1.
    /// Returns the resulting quantity.
    pub fn add(&mut self, product: Product) -> u32 {
        if let Some(existing) = self.get_mut(&product.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return existing.quantity;
        }

        self.items.push(CartItem::new(product, 1));
        1
    }

    /// Add one unit to an existing line item.
    ///
    /// Returns the new quantity, or `None` if the product is not in the cart.
    pub fn increment(&mut self, id: &ProductId) -> Option<u32> {
        let item = self.get_mut(id)?;
        item.quantity = item.quantity.saturating_add(1);
        Some(item.quantity)
    }

    /// Remove one unit from an existing line item.
    ///
    /// Quantity never goes below zero. When it reaches zero, `policy`
    /// decides whether the line item stays or is dropped. Returns the new
    /// quantity (zero when dropped), or `None` if the product is not in the
    /// cart.
    pub fn decrement(&mut self, id: &ProductId, policy: ZeroQuantity) -> Option<u32> {
        let index = self.position(id)?;
        let item = &mut self.items[index];
        item.quantity = item.quantity.saturating_sub(1);
        let quantity = item.quantity;

        if quantity == 0 && policy == ZeroQuantity::Remove {
            self.items.remove(index);
        }
        Some(quantity)
    }

    /// Drop a line item. Returns whether it was present.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != id);
        self.items.len() < len_before
    }

    /// Apply `policy` to line items already at zero.
    ///
    /// Returns how many line items were dropped.
    pub fn apply_zero_policy(&mut self, policy: ZeroQuantity) -> usize {
        if policy == ZeroQuantity::Keep {
            return 0;
        }
        let len_before = self.items.len();
        self.items.retain(|i| i.quantity > 0);
        len_before - self.items.len()
    }

    /// Drop every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get a line item by product ID.
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| &i.id == id)
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|i| &i.id == id)
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Cart total (sum of line subtotals).
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line items in insertion order.
    pub fn as_slice(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over line items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Consume into the underlying vector.
    pub fn into_vec(self) -> Vec<CartItem> {
        self.items
    }
}

impl From<Vec<CartItem>> for CartItems {
    /// Build a list from raw entries, folding duplicate IDs into the first
    /// occurrence so the one-entry-per-product invariant holds.
    fn from(entries: Vec<CartItem>) -> Self {
        let mut items = Self::new();
        for entry in entries {
            match items.get_mut(&entry.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(entry.quantity);
                }
                None => items.items.push(entry),
            }
        }
        items
    }
}

/// Snapshot entry as older app builds wrote it.
///
/// Those builds stored a freshly added entry with `"quantity": null` and
/// appended a duplicate without `quantity` on every repeat add. Each such
/// occurrence stands for one unit. Negative quantities (no floor on
/// decrement back then) read as zero.
#[derive(Deserialize)]
struct SnapshotEntry {
    id: ProductId,
    title: String,
    image_url: String,
    price: f64,
    #[serde(default)]
    quantity: Option<i64>,
}

impl From<SnapshotEntry> for CartItem {
    fn from(entry: SnapshotEntry) -> Self {
        let quantity = match entry.quantity {
            None => 1,
            Some(q) => u32::try_from(q.max(0)).unwrap_or(u32::MAX),
        };
        Self {
            id: entry.id,
            title: entry.title,
            image_url: entry.image_url,
            price: entry.price,
            quantity,
        }
    }
}

impl<'de> Deserialize<'de> for CartItems {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<SnapshotEntry>::deserialize(deserializer)?;
        Ok(Self::from(
            entries.into_iter().map(CartItem::from).collect::<Vec<_>>(),
        ))
    }
}

impl<'a> IntoIterator for &'a CartItems {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> Product {
        Product::new("p1", "Shirt", "https://cdn.example/shirt.png", 10.0)
    }

    fn mug() -> Product {
        Product::new("p2", "Mug", "https://cdn.example/mug.png", 4.5)
    }

    #[test]
    fn test_add_new_product_starts_at_one() {
        let mut items = CartItems::new();
        assert_eq!(items.add(shirt()), 1);

        assert_eq!(items.unique_item_count(), 1);
        let item = items.get(&ProductId::new("p1")).unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.title, "Shirt");
    }

    #[test]
    fn test_add_same_product_accumulates() {
        let mut items = CartItems::new();
        for _ in 0..5 {
            items.add(shirt());
        }

        assert_eq!(items.unique_item_count(), 1);
        assert_eq!(items.item_count(), 5);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut items = CartItems::new();
        items.add(mug());
        items.add(shirt());
        items.add(mug());

        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[test]
    fn test_increment_then_decrement_restores_quantity() {
        let mut items = CartItems::new();
        items.add(shirt());
        items.add(shirt());
        let id = ProductId::new("p1");

        assert_eq!(items.increment(&id), Some(3));
        assert_eq!(items.decrement(&id, ZeroQuantity::Remove), Some(2));
        assert_eq!(items.get(&id).unwrap().quantity, 2);
    }

    #[test]
    fn test_missing_id_is_noop() {
        let mut items = CartItems::new();
        items.add(shirt());
        let before = items.clone();
        let missing = ProductId::new("nonexistent");

        assert_eq!(items.increment(&missing), None);
        assert_eq!(items.decrement(&missing, ZeroQuantity::Keep), None);
        assert!(!items.remove(&missing));
        assert_eq!(items, before);
    }

    #[test]
    fn test_decrement_to_zero_removes_by_default() {
        let mut items = CartItems::new();
        items.add(shirt());
        items.add(mug());

        assert_eq!(items.decrement(&ProductId::new("p1"), ZeroQuantity::Remove), Some(0));
        assert!(items.get(&ProductId::new("p1")).is_none());
        assert_eq!(items.unique_item_count(), 1);
    }

    #[test]
    fn test_decrement_keep_floors_at_zero() {
        let mut items = CartItems::new();
        items.add(shirt());
        let id = ProductId::new("p1");

        assert_eq!(items.decrement(&id, ZeroQuantity::Keep), Some(0));
        assert_eq!(items.decrement(&id, ZeroQuantity::Keep), Some(0));
        assert_eq!(items.get(&id).unwrap().quantity, 0);
    }

    #[test]
    fn test_totals() {
        let mut items = CartItems::new();
        items.add(shirt());
        items.add(shirt());
        items.add(mug());

        assert_eq!(items.item_count(), 3);
        assert!((items.total() - 24.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_format() {
        let mut items = CartItems::new();
        items.add(shirt());

        let json: serde_json::Value = serde_json::to_value(&items).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "id": "p1",
                "title": "Shirt",
                "image_url": "https://cdn.example/shirt.png",
                "price": 10.0,
                "quantity": 1
            }])
        );
    }

    #[test]
    fn test_deserialize_folds_duplicate_ids() {
        let raw = r#"[
            {"id": "p1", "title": "Shirt", "image_url": "a", "price": 10, "quantity": 2},
            {"id": "p2", "title": "Mug", "image_url": "b", "price": 4.5, "quantity": 1},
            {"id": "p1", "title": "Shirt", "image_url": "a", "price": 10, "quantity": 1}
        ]"#;

        let items: CartItems = serde_json::from_str(raw).unwrap();
        assert_eq!(items.unique_item_count(), 2);
        assert_eq!(items.get(&ProductId::new("p1")).unwrap().quantity, 3);
        assert_eq!(items.as_slice()[1].id.as_str(), "p2");
    }

    #[test]
    fn test_deserialize_null_and_missing_quantity_count_one_each() {
        let raw = r#"[
            {"id": "p1", "title": "Shirt", "image_url": "a", "price": 10, "quantity": null},
            {"id": "p2", "title": "Mug", "image_url": "b", "price": 4.5, "quantity": null},
            {"id": "p1", "title": "Shirt", "image_url": "a", "price": 10},
            {"id": "p1", "title": "Shirt", "image_url": "a", "price": 10}
        ]"#;

        let items: CartItems = serde_json::from_str(raw).unwrap();
        assert_eq!(items.unique_item_count(), 2);
        assert_eq!(items.get(&ProductId::new("p1")).unwrap().quantity, 3);
        assert_eq!(items.get(&ProductId::new("p2")).unwrap().quantity, 1);
    }

    #[test]
    fn test_deserialize_negative_quantity_reads_as_zero() {
        let raw = r#"[
            {"id": "p1", "title": "Shirt", "image_url": "a", "price": 10, "quantity": -2},
            {"id": "p2", "title": "Mug", "image_url": "b", "price": 4.5, "quantity": 3}
        ]"#;

        let mut items: CartItems = serde_json::from_str(raw).unwrap();
        assert_eq!(items.get(&ProductId::new("p1")).unwrap().quantity, 0);

        assert_eq!(items.apply_zero_policy(ZeroQuantity::Keep), 0);
        assert_eq!(items.unique_item_count(), 2);

        assert_eq!(items.apply_zero_policy(ZeroQuantity::Remove), 1);
        assert!(items.get(&ProductId::new("p1")).is_none());
        assert_eq!(items.item_count(), 3);
    }
}
