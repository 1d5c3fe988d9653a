//! One-shot CLI: read a cart-items JSON file (or fetch one cart over
//! Supabase REST with `--cart <id>`), run the unit pipeline, print the team
//! summary.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crew_cart::{
    add_line_numbers, expand_items_to_unit_rows, fetch_cart_snapshot, parse_cart_items,
    render_summary, sort_assignee_rows, CartItem, SummaryLayout, SupabaseConfig,
};

fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let items = match args.next().as_deref() {
        Some("--cart") => {
            let cart_id = args
                .next()
                .context("usage: crew-cart --cart <cart-id> | crew-cart <cart-items.json>")?;
            fetch_items(&cart_id)?
        }
        Some(path) => load_items(path)?,
        None => anyhow::bail!("usage: crew-cart --cart <cart-id> | crew-cart <cart-items.json>"),
    };
    info!(items = items.len(), "loaded cart items");

    let mut rows = expand_items_to_unit_rows(&items);
    sort_assignee_rows(&mut rows);
    add_line_numbers(&mut rows);

    print!("{}", render_summary(&rows, &SummaryLayout::default()));
    Ok(())
}

fn load_items(path: &str) -> Result<Vec<CartItem>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parse {path}"))?;
    Ok(parse_cart_items(&value))
}

fn fetch_items(cart_id: &str) -> Result<Vec<CartItem>> {
    let cfg = SupabaseConfig::from_env().context("cart source configuration")?;
    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    let snapshot = runtime
        .block_on(fetch_cart_snapshot(&cfg, cart_id))
        .with_context(|| format!("fetch cart {cart_id}"))?;
    Ok(snapshot.items)
}
