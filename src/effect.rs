/// Side effects declared by the reducer and run by the task runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch and hydrate the listing page at `url`
    FetchPage { url: String },
    /// Deliver `query` as `SearchApply` once input has been quiet for `delay_ms`
    DebounceQuery { query: String, delay_ms: u64 },
    /// Drop a pending debounced query
    CancelPendingQuery,
    LoadSprite { name: String, url: String },
}
