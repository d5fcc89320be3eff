//! Cart commands.

use anyhow::Result;
use dialoguer::Confirm;
use gomarket_cart::{CartItems, Product, ProductId};
use serde::Serialize;

use super::{AddArgs, ClearArgs, ItemArgs};
use crate::context::Context;

/// JSON view of the cart.
#[derive(Serialize)]
struct CartSummary<'a> {
    items: &'a CartItems,
    item_count: u64,
    total: f64,
}

impl<'a> CartSummary<'a> {
    fn new(items: &'a CartItems) -> Self {
        Self {
            items,
            item_count: items.item_count(),
            total: items.total(),
        }
    }
}

/// Print the cart contents.
pub async fn list(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    let items = cart.snapshot().await;
    print_cart(ctx, &items);
    Ok(())
}

/// Add one unit of a product.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    let product = Product::new(args.id, args.title, args.image_url, args.price);
    let title = product.title.clone();

    let quantity = cart.add_to_cart(product).await?;
    ctx.output
        .success(&format!("Added {} (quantity {})", title, quantity));

    print_json(ctx, &cart.snapshot().await);
    Ok(())
}

/// Add one unit to an item already in the cart.
pub async fn increment(args: ItemArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    let id = ProductId::new(args.id);

    match cart.increment(&id).await? {
        Some(quantity) => ctx
            .output
            .success(&format!("{} quantity is now {}", id, quantity)),
        None => ctx.output.warn(&format!("{} is not in the cart", id)),
    }

    print_json(ctx, &cart.snapshot().await);
    Ok(())
}

/// Remove one unit from an item in the cart.
pub async fn decrement(args: ItemArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    let id = ProductId::new(args.id);

    let decremented = cart.decrement(&id).await?;
    let items = cart.snapshot().await;

    match decremented {
        Some(_) if items.get(&id).is_none() => ctx
            .output
            .success(&format!("{} removed from the cart", id)),
        Some(quantity) => ctx
            .output
            .success(&format!("{} quantity is now {}", id, quantity)),
        None => ctx.output.warn(&format!("{} is not in the cart", id)),
    }

    print_json(ctx, &items);
    Ok(())
}

/// Drop an item from the cart.
pub async fn remove(args: ItemArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    let id = ProductId::new(args.id);

    if cart.remove(&id).await? {
        ctx.output.success(&format!("{} removed from the cart", id));
    } else {
        ctx.output.warn(&format!("{} is not in the cart", id));
    }

    print_json(ctx, &cart.snapshot().await);
    Ok(())
}

/// Empty the cart.
pub async fn clear(args: ClearArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    let items = cart.snapshot().await;

    if items.is_empty() {
        ctx.output.info("Cart is already empty");
        return Ok(());
    }

    if !args.yes && !ctx.output.is_json() {
        ctx.output.warn(&format!(
            "This will remove {} item(s) from the cart",
            items.item_count()
        ));

        let confirmed = Confirm::new()
            .with_prompt("Clear the cart?")
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Clear cancelled");
            return Ok(());
        }
    }

    cart.clear().await?;
    ctx.output.success("Cart cleared");
    print_json(ctx, &cart.snapshot().await);
    Ok(())
}

fn print_json(ctx: &Context, items: &CartItems) {
    if ctx.output.is_json() {
        ctx.output.json(&CartSummary::new(items));
    }
}

fn print_cart(ctx: &Context, items: &CartItems) {
    if ctx.output.is_json() {
        print_json(ctx, items);
        return;
    }

    ctx.output.header("Cart");

    if items.is_empty() {
        ctx.output.info("Cart is empty");
        return;
    }

    ctx.output.cart_table(items);
}
