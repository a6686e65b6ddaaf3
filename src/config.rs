//! Command-line configuration for the catalog.

use clap::Args;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

#[derive(Args, Clone, Debug, PartialEq)]
pub struct CatalogArgs {
    /// Base URL of the catalog API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,
    /// Entries requested per page
    #[arg(long, default_value_t = 151, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,
    /// Fraction of the visible rows left before the next page is requested
    #[arg(long, default_value_t = 0.5, value_parser = parse_threshold)]
    pub prefetch_threshold: f32,
    /// Search debounce window in milliseconds
    #[arg(long, default_value_t = 300)]
    pub debounce_ms: u64,
    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

impl CatalogArgs {
    /// First listing page: `{api_base}/pokemon?limit={page_size}`.
    pub fn start_url(&self) -> String {
        format!(
            "{}/pokemon?limit={}",
            self.api_base.trim_end_matches('/'),
            self.page_size
        )
    }
}

impl Default for CatalogArgs {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: 151,
            prefetch_threshold: 0.5,
            debounce_ms: 300,
            timeout_secs: 10,
        }
    }
}

fn parse_threshold(raw: &str) -> Result<f32, String> {
    let value: f32 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("threshold must be a non-negative number, got {raw}"));
    }
    Ok(value)
}
