//! Catalog state: the accumulated store, rename overlay, pagination cursor and
//! the derived (filtered, ordered) view the list renders.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One hydrated catalog record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    pub name: String,
    pub sprite_url: Option<String>,
    /// Type tags joined with ", " in slot order.
    pub type_label: String,
    pub height: u32,
    pub weight: u32,
    pub base_experience: Option<u32>,
}

impl CatalogEntry {
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.type_label
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }
}

/// A fully hydrated listing page, ready to merge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HydratedPage {
    /// The cursor this page was requested with.
    pub url: String,
    /// Entries in listing order; failed details are already dropped.
    pub entries: Vec<CatalogEntry>,
    pub next: Option<String>,
    /// Number of listed items whose detail fetch failed.
    pub dropped: usize,
}

/// User-chosen display names keyed by original catalog name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenameOverlay {
    aliases: BTreeMap<String, String>,
}

impl RenameOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn is_renamed(&self, name: &str) -> bool {
        self.aliases.get(name).is_some_and(|alias| !alias.is_empty())
    }

    /// Alias if present, else the original name.
    pub fn display_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.alias(name).unwrap_or(name)
    }

    /// Sets `name`'s alias to the trimmed `new_name`.
    ///
    /// Returns `false` without touching the map when the trimmed value is
    /// empty or equals the current effective name.
    pub fn rename(&mut self, name: &str, new_name: &str) -> bool {
        let trimmed = new_name.trim();
        if trimmed.is_empty() || trimmed == self.display_name(name) {
            return false;
        }
        self.aliases.insert(name.to_string(), trimmed.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(name, alias)| (name.as_str(), alias.as_str()))
    }
}

/// Cursor bookkeeping for sequential page loads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Paginator {
    cursor: Option<String>,
    /// Runtime only: a restored snapshot has no task behind it.
    #[serde(skip)]
    in_flight: Option<String>,
    pages_loaded: u32,
}

impl Paginator {
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            cursor: Some(start_url.into()),
            in_flight: None,
            pages_loaded: 0,
        }
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_none()
    }

    pub fn can_load(&self) -> bool {
        !self.is_loading() && !self.is_exhausted()
    }

    pub fn pages_loaded(&self) -> u32 {
        self.pages_loaded
    }

    /// Marks the current cursor as in flight and returns it, or `None` when a
    /// load is already running or the catalog is exhausted.
    pub fn begin(&mut self) -> Option<String> {
        if !self.can_load() {
            return None;
        }
        let url = self.cursor.clone()?;
        self.in_flight = Some(url.clone());
        Some(url)
    }

    /// Advances to `next` if `url` is the load in flight.
    pub fn complete(&mut self, url: &str, next: Option<String>) -> bool {
        if self.in_flight.as_deref() != Some(url) {
            return false;
        }
        self.in_flight = None;
        self.cursor = next;
        self.pages_loaded += 1;
        true
    }

    /// Releases the in-flight slot; the cursor stays put for a retry.
    pub fn fail(&mut self, url: &str) -> bool {
        if self.in_flight.as_deref() != Some(url) {
            return false;
        }
        self.in_flight = None;
        true
    }
}

/// Indices into `entries` that match `query`, aliased entries first.
///
/// Matching is a case-insensitive substring test against the original name
/// or the alias, with the query taken as typed. Only an empty query matches
/// everything. Relative store order is kept inside each partition.
pub fn compute_view(entries: &[CatalogEntry], overlay: &RenameOverlay, query: &str) -> Vec<usize> {
    let query = query.to_lowercase();
    let matches = |entry: &CatalogEntry| {
        if query.is_empty() || entry.name.to_lowercase().contains(&query) {
            return true;
        }
        overlay
            .alias(&entry.name)
            .is_some_and(|alias| alias.to_lowercase().contains(&query))
    };

    let (mut renamed, plain): (Vec<usize>, Vec<usize>) = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| matches(*entry))
        .map(|(idx, _)| idx)
        .partition(|idx| overlay.is_renamed(&entries[*idx].name));
    renamed.extend(plain);
    renamed
}

/// Whether `selected` sits within `threshold` visible lengths of the end.
///
/// An empty view counts as near the end so an initial or filtered-out list
/// keeps pulling pages.
pub fn near_end(selected: usize, view_len: usize, visible_rows: usize, threshold: f32) -> bool {
    if view_len == 0 {
        return true;
    }
    let remaining = view_len.saturating_sub(selected.saturating_add(1));
    let window = (visible_rows.max(1) as f32 * threshold.max(0.0)).ceil() as usize;
    remaining <= window
}

/// The catalog state manager: store, overlay, pagination and derived view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    renames: RenameOverlay,
    paginator: Paginator,
    query: String,
    view: Vec<usize>,
}

impl Catalog {
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            renames: RenameOverlay::new(),
            paginator: Paginator::new(start_url),
            query: String::new(),
            view: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn renames(&self) -> &RenameOverlay {
        &self.renames
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Store indices of the current derived view.
    pub fn view(&self) -> &[usize] {
        &self.view
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn view_entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.view.iter().filter_map(|idx| self.entries.get(*idx))
    }

    pub fn view_entry(&self, position: usize) -> Option<&CatalogEntry> {
        self.view
            .get(position)
            .and_then(|idx| self.entries.get(*idx))
    }

    /// Position in the view of the entry stored at `store_index`.
    pub fn view_position(&self, store_index: usize) -> Option<usize> {
        self.view.iter().position(|idx| *idx == store_index)
    }

    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn display_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.renames.display_name(name)
    }

    pub fn is_loading(&self) -> bool {
        self.paginator.is_loading()
    }

    pub fn is_exhausted(&self) -> bool {
        self.paginator.is_exhausted()
    }

    pub fn begin_load(&mut self) -> Option<String> {
        self.paginator.begin()
    }

    /// Appends a hydrated page in listing order and advances the cursor.
    /// Pages that do not answer the in-flight request are ignored.
    pub fn finish_load(&mut self, page: HydratedPage) -> bool {
        if !self.paginator.complete(&page.url, page.next) {
            return false;
        }
        self.entries.extend(page.entries);
        self.rebuild_view();
        true
    }

    pub fn fail_load(&mut self, url: &str) -> bool {
        self.paginator.fail(url)
    }

    pub fn rename(&mut self, name: &str, new_name: &str) -> bool {
        if !self.renames.rename(name, new_name) {
            return false;
        }
        self.rebuild_view();
        true
    }

    pub fn set_query(&mut self, query: &str) -> bool {
        if self.query == query {
            return false;
        }
        self.query = query.to_string();
        self.rebuild_view();
        true
    }

    pub fn rebuild_view(&mut self) {
        self.view = compute_view(&self.entries, &self.renames, &self.query);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(name: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            sprite_url: None,
            type_label: "normal".to_string(),
            height: 1,
            weight: 1,
            base_experience: None,
        }
    }

    fn names(entries: &[CatalogEntry], view: &[usize]) -> Vec<String> {
        view.iter().map(|idx| entries[*idx].name.clone()).collect()
    }

    #[test]
    fn alias_partition_keeps_store_order() {
        let entries = vec![entry("a"), entry("b"), entry("c")];
        let mut overlay = RenameOverlay::new();
        overlay.rename("b", "bee");

        let view = compute_view(&entries, &overlay, "");
        assert_eq!(names(&entries, &view), vec!["b", "a", "c"]);
    }

    #[test]
    fn aliased_entries_keep_relative_order() {
        let entries = vec![entry("a"), entry("b"), entry("c"), entry("d")];
        let mut overlay = RenameOverlay::new();
        overlay.rename("d", "delta");
        overlay.rename("b", "bravo");

        let view = compute_view(&entries, &overlay, "");
        assert_eq!(names(&entries, &view), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn query_matches_alias_or_original_case_insensitively() {
        let entries = vec![entry("pikachu"), entry("raichu"), entry("bulbasaur")];
        let mut overlay = RenameOverlay::new();
        overlay.rename("pikachu", "Sparky");

        assert_eq!(
            names(&entries, &compute_view(&entries, &overlay, "SPARK")),
            vec!["pikachu"]
        );
        assert_eq!(
            names(&entries, &compute_view(&entries, &overlay, "Pika")),
            vec!["pikachu"]
        );
        assert_eq!(
            names(&entries, &compute_view(&entries, &overlay, "chu")),
            vec!["pikachu", "raichu"]
        );
    }

    #[test]
    fn query_whitespace_is_matched_literally() {
        let entries = vec![entry("pikachu"), entry("bulbasaur")];
        let overlay = RenameOverlay::new();
        assert_eq!(compute_view(&entries, &overlay, ""), vec![0, 1]);
        assert!(compute_view(&entries, &overlay, "   ").is_empty());
        assert!(compute_view(&entries, &overlay, " pika").is_empty());
        assert!(compute_view(&entries, &overlay, "pika ").is_empty());
        assert_eq!(compute_view(&entries, &overlay, "PIKA"), vec![0]);
    }

    #[test]
    fn rename_trims_and_rejects_noops() {
        let mut overlay = RenameOverlay::new();
        assert!(!overlay.rename("pikachu", "   "));
        assert!(!overlay.rename("pikachu", " pikachu "));
        assert!(overlay.is_empty());

        assert!(overlay.rename("pikachu", "  Sparky "));
        assert_eq!(overlay.alias("pikachu"), Some("Sparky"));
        assert!(!overlay.rename("pikachu", "Sparky"));
    }

    #[test]
    fn second_rename_replaces_the_first() {
        let entries = vec![entry("pikachu")];
        let mut overlay = RenameOverlay::new();
        overlay.rename("pikachu", "Sparky");
        overlay.rename("pikachu", "Volt");

        assert_eq!(overlay.len(), 1);
        assert_eq!(overlay.display_name("pikachu"), "Volt");
        assert!(compute_view(&entries, &overlay, "sparky").is_empty());
        assert_eq!(compute_view(&entries, &overlay, "volt"), vec![0]);
    }

    #[test]
    fn paginator_guards_single_flight_and_terminal_cursor() {
        let mut paginator = Paginator::new("page-1");
        assert_eq!(paginator.begin().as_deref(), Some("page-1"));
        assert_eq!(paginator.begin(), None);

        assert!(!paginator.complete("page-0", None));
        assert!(paginator.complete("page-1", Some("page-2".into())));
        assert_eq!(paginator.cursor(), Some("page-2"));

        assert_eq!(paginator.begin().as_deref(), Some("page-2"));
        assert!(paginator.complete("page-2", None));
        assert!(paginator.is_exhausted());
        assert_eq!(paginator.begin(), None);
        assert_eq!(paginator.pages_loaded(), 2);
    }

    #[test]
    fn paginator_failure_keeps_cursor_for_retry() {
        let mut paginator = Paginator::new("page-1");
        let url = paginator.begin().expect("first load");
        assert!(paginator.fail(&url));
        assert!(!paginator.is_loading());
        assert_eq!(paginator.cursor(), Some("page-1"));
        assert_eq!(paginator.begin().as_deref(), Some("page-1"));
    }

    #[test]
    fn near_end_uses_visible_window() {
        assert!(near_end(0, 0, 20, 0.5));
        assert!(!near_end(0, 100, 20, 0.5));
        assert!(!near_end(88, 100, 20, 0.5));
        assert!(near_end(89, 100, 20, 0.5));
        assert!(near_end(99, 100, 20, 0.5));
        assert!(near_end(3, 5, 20, 0.5));
    }

    #[test]
    fn catalog_merges_pages_and_ignores_stale_ones() {
        let mut catalog = Catalog::new("page-1");
        let url = catalog.begin_load().expect("load");
        let stale = HydratedPage {
            url: "elsewhere".into(),
            entries: vec![entry("zubat")],
            next: None,
            dropped: 0,
        };
        assert!(!catalog.finish_load(stale));
        assert!(catalog.entries().is_empty());

        let page = HydratedPage {
            url,
            entries: vec![entry("bulbasaur"), entry("ivysaur")],
            next: Some("page-2".into()),
            dropped: 1,
        };
        assert!(catalog.finish_load(page));
        assert_eq!(catalog.view(), &[0, 1]);
        assert_eq!(catalog.paginator().cursor(), Some("page-2"));
    }

    #[test]
    fn catalog_rename_and_query_rebuild_view() {
        let mut catalog = Catalog::new("page-1");
        let url = catalog.begin_load().expect("load");
        catalog.finish_load(HydratedPage {
            url,
            entries: vec![entry("a"), entry("b"), entry("c")],
            next: None,
            dropped: 0,
        });

        assert!(catalog.rename("c", "Cee"));
        let shown: Vec<_> = catalog.view_entries().map(|e| e.name.as_str()).collect();
        assert_eq!(shown, vec!["c", "a", "b"]);

        assert!(catalog.set_query("cee"));
        assert_eq!(catalog.view(), &[2]);
        assert!(!catalog.set_query("cee"));
        assert_eq!(catalog.display_name("c"), "Cee");
    }
}
