//! Output formatting for the CLI.

use console::{style, StyledObject};
use gomarket_cart::CartItems;

const CART_COLUMNS: [(&str, usize); 5] = [
    ("ID", 12),
    ("TITLE", 28),
    ("PRICE", 10),
    ("QTY", 5),
    ("SUBTOTAL", 10),
];

/// Output handler for CLI messages.
///
/// Diagnostics go through `tracing`; this only prints what the user asked
/// for. In JSON mode everything but errors and [`Output::json`] is silent.
#[derive(Clone)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn info(&self, msg: &str) {
        self.notice(style("ℹ").blue(), msg, false);
    }

    pub fn success(&self, msg: &str) {
        self.notice(style("✓").green(), msg, false);
    }

    /// Print a warning to stderr.
    pub fn warn(&self, msg: &str) {
        self.notice(style("⚠").yellow(), msg, true);
    }

    /// Print an error to stderr, as `{"error": ...}` in JSON mode.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.json {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    /// Print `value` as pretty JSON on stdout.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    /// Print the cart as a table followed by its item count and total.
    pub fn cart_table(&self, items: &CartItems) {
        if self.json {
            return;
        }

        let header: Vec<&str> = CART_COLUMNS.iter().map(|(name, _)| *name).collect();
        println!("  {}", style(cart_row(&header)).dim());
        for item in items {
            let price = format_price(item.price);
            let quantity = item.quantity.to_string();
            let subtotal = format_price(item.subtotal());
            println!(
                "  {}",
                cart_row(&[item.id.as_str(), &item.title, &price, &quantity, &subtotal])
            );
        }

        println!();
        self.kv("items", &items.item_count().to_string());
        self.kv("total", &format_price(items.total()));
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    fn notice(&self, icon: StyledObject<&str>, msg: &str, to_stderr: bool) {
        if self.json {
            return;
        }
        if to_stderr {
            eprintln!("{} {}", icon, msg);
        } else {
            println!("{} {}", icon, msg);
        }
    }
}

/// Pad each cell to its cart column width. Long cells are not truncated.
fn cart_row(cells: &[&str]) -> String {
    cells
        .iter()
        .zip(CART_COLUMNS.iter())
        .map(|(cell, (_, width))| format!("{:width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Format a price with two decimals.
fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}
