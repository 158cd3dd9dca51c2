// src/fetch/mod.rs

use crate::error::{Result, WranglerError};
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Blocking client for the single page fetch. No timeout unless one is given.
pub fn build_client(timeout_secs: Option<u64>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| WranglerError::Config(format!("building HTTP client: {}", e)))
}

/// GET the page and return its body. One attempt, no retry.
#[instrument(level = "info", skip(client))]
pub fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let parsed =
        Url::parse(url).map_err(|e| WranglerError::Config(format!("bad URL {:?}: {}", url, e)))?;
    let fetch_err = |source| WranglerError::Fetch {
        url: url.to_string(),
        source,
    };

    let body = client
        .get(parsed)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(fetch_err)?;

    debug!(bytes = body.len(), "page fetched");
    Ok(body)
}

/// Rows (`<tr>`, header row first) of the first `<table>` carrying `class`.
pub fn extract_table_rows<'a>(doc: &'a Html, class: &str) -> Result<Vec<ElementRef<'a>>> {
    let tables = Selector::parse("table").expect("static selector should parse");
    let rows = Selector::parse("tr").expect("static selector should parse");

    let table = doc
        .select(&tables)
        .find(|t| t.value().classes().any(|c| c == class))
        .ok_or_else(|| WranglerError::Extraction {
            class: class.to_string(),
        })?;

    let body: Vec<ElementRef<'a>> = table.select(&rows).collect();
    info!(class, rows = body.len(), "table found and extracted from page");
    Ok(body)
}
