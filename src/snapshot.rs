use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::model::CartItem;

const FETCH_TIMEOUT_SECS: u64 = 20;
const CART_ITEM_COLUMNS: &str = "id,menu_item_id,name,quantity,price,customized_price,\
customizations,selected_options,special_instructions,assigned_to,created_at";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cart source not configured: missing {0}")]
    Config(&'static str),
    #[error("invalid cart source URL: {0}")]
    BadUrl(String),
    #[error("cart request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("cart source error ({status}): {body}")]
    Status { status: StatusCode, body: String },
}

/// Read-only connection settings for the cart store's REST endpoint.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self, SnapshotError> {
        let url = non_empty_env("SUPABASE_URL").ok_or(SnapshotError::Config("SUPABASE_URL"))?;
        let anon_key =
            non_empty_env("SUPABASE_ANON_KEY").ok_or(SnapshotError::Config("SUPABASE_ANON_KEY"))?;
        Ok(Self { url, anon_key })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A freshly fetched, already-parsed view of one cart. Consumers re-run the
/// row pipeline on every snapshot; nothing here is mutated in place.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    pub cart_id: String,
    pub items: Vec<CartItem>,
    pub fetched_at: DateTime<Utc>,
}

/// Lenient row parsing: anything that is not an object is skipped with a
/// warning instead of failing the whole snapshot.
pub fn parse_cart_items(rows: &Value) -> Vec<CartItem> {
    let Some(rows) = rows.as_array() else {
        if !rows.is_null() {
            warn!("cart items payload is not an array; ignoring");
        }
        return Vec::new();
    };
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        match CartItem::from_value(row) {
            Some(item) => items.push(item),
            None => warn!("skipping non-object cart item row"),
        }
    }
    items
}

/// Reads all items of one cart from the Supabase REST endpoint. Rows come
/// back in creation order so repeated fetches of an unchanged cart produce
/// identical snapshots.
pub async fn fetch_cart_snapshot(
    cfg: &SupabaseConfig,
    cart_id: &str,
) -> Result<CartSnapshot, SnapshotError> {
    let base = cfg.url.trim_end_matches('/');
    let mut url = Url::parse(&format!("{base}/rest/v1/cart_items"))
        .map_err(|e| SnapshotError::BadUrl(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("select", CART_ITEM_COLUMNS)
        .append_pair("cart_id", &format!("eq.{cart_id}"))
        .append_pair("order", "created_at.asc");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()?;
    let resp = client
        .get(url)
        .header("apikey", &cfg.anon_key)
        .header("Authorization", format!("Bearer {}", cfg.anon_key))
        .header("Content-Type", "application/json")
        .send()
        .await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(SnapshotError::Status { status, body });
    }
    let rows = resp.json::<Value>().await?;
    let items = parse_cart_items(&rows);
    info!(cart_id = %cart_id, items = items.len(), "fetched cart snapshot");
    Ok(CartSnapshot {
        cart_id: cart_id.to_string(),
        items,
        fetched_at: Utc::now(),
    })
}

/// Polls one cart on a fixed interval and publishes each successful fetch
/// on a watch channel. Failed fetches keep the last good snapshot so the
/// consumer never renders from a half-broken state; the loop exits once
/// every receiver is dropped.
pub fn start_cart_watch(
    cfg: SupabaseConfig,
    cart_id: String,
    interval_secs: u64,
) -> watch::Receiver<CartSnapshot> {
    let (tx, rx) = watch::channel(CartSnapshot {
        cart_id: cart_id.clone(),
        items: Vec::new(),
        fetched_at: Utc::now(),
    });

    tokio::spawn(async move {
        info!(cart_id = %cart_id, interval_secs, "cart watch started");
        loop {
            tokio::time::sleep(Duration::from_secs(interval_secs)).await;
            match fetch_cart_snapshot(&cfg, &cart_id).await {
                Ok(snapshot) => {
                    if tx.send(snapshot).is_err() {
                        info!(cart_id = %cart_id, "cart watch stopped: no receivers");
                        break;
                    }
                }
                Err(error) => {
                    warn!(cart_id = %cart_id, error = %error, "cart refresh failed");
                }
            }
        }
    });

    rx
}
