use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::task::JoinSet;

use crate::catalog::{CatalogEntry, HydratedPage};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed response from {url}: {source}")]
    Parse {
        url: String,
        source: serde_json::Error,
    },
    #[error("{0}")]
    Upstream(String),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ListedItem {
    pub name: String,
    pub url: String,
}

/// One page of the listing endpoint.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ListingPage {
    pub results: Vec<ListedItem>,
    pub next: Option<String>,
}

/// Where catalog pages, details and sprite bytes come from.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_listing(&self, url: &str) -> Result<ListingPage, FetchError>;
    async fn fetch_detail(&self, url: &str) -> Result<CatalogEntry, FetchError>;
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    name: String,
    height: u32,
    weight: u32,
    base_experience: Option<u32>,
    types: Vec<PokemonTypeSlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

/// PokeAPI over HTTP.
#[derive(Clone, Debug)]
pub struct PokeApiClient {
    client: reqwest::Client,
}

impl PokeApiClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokedex-tui/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait::async_trait]
impl CatalogSource for PokeApiClient {
    async fn fetch_listing(&self, url: &str) -> Result<ListingPage, FetchError> {
        let bytes = self.get_bytes(url).await?;
        parse_json(url, &bytes)
    }

    async fn fetch_detail(&self, url: &str) -> Result<CatalogEntry, FetchError> {
        let bytes = self.get_bytes(url).await?;
        parse_detail(url, &bytes)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.get_bytes(url).await
    }
}

/// Fetches the listing at `url` and hydrates every item concurrently.
///
/// Entries come back in listing order whatever order the details finish in.
/// Items whose detail fails are dropped and counted; only a listing failure
/// fails the page.
pub async fn load_page(
    source: Arc<dyn CatalogSource>,
    url: &str,
) -> Result<HydratedPage, FetchError> {
    let listing = source.fetch_listing(url).await.map_err(|err| {
        tracing::error!(%url, error = %err, "listing fetch failed");
        err
    })?;
    let total = listing.results.len();

    let mut join_set = JoinSet::new();
    for (index, item) in listing.results.into_iter().enumerate() {
        let source = Arc::clone(&source);
        join_set.spawn(async move {
            let result = source.fetch_detail(&item.url).await;
            (index, item.name, result)
        });
    }

    let mut slots: Vec<Option<CatalogEntry>> = vec![None; total];
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, _, Ok(entry))) => {
                if let Some(slot) = slots.get_mut(index) {
                    *slot = Some(entry);
                }
            }
            Ok((_, name, Err(err))) => {
                tracing::warn!(%name, error = %err, "dropping entry with failed detail");
            }
            Err(err) => {
                tracing::warn!(error = %err, "detail task did not complete");
            }
        }
    }

    let entries: Vec<CatalogEntry> = slots.into_iter().flatten().collect();
    let dropped = total - entries.len();
    tracing::info!(%url, loaded = entries.len(), dropped, "page hydrated");

    Ok(HydratedPage {
        url: url.to_string(),
        entries,
        next: listing.next,
        dropped,
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(url: &str, bytes: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(bytes).map_err(|source| FetchError::Parse {
        url: url.to_string(),
        source,
    })
}

pub(crate) fn parse_detail(url: &str, bytes: &[u8]) -> Result<CatalogEntry, FetchError> {
    let response: PokemonResponse = parse_json(url, bytes)?;
    let type_label = response
        .types
        .into_iter()
        .map(|slot| slot.type_info.name)
        .collect::<Vec<_>>()
        .join(", ");
    Ok(CatalogEntry {
        name: response.name,
        sprite_url: pointer_string(&response.sprites, "/front_default"),
        type_label,
        height: response.height,
        weight: response.weight,
        base_experience: response.base_experience,
    })
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}
