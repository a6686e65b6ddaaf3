use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::catalog::{self, Catalog, CatalogEntry};
use crate::config::CatalogArgs;
use crate::sprite::SpriteArt;

/// Rows around the list: title, search box, message line, footer, list border.
pub const LIST_CHROME_ROWS: u16 = 8;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    /// What the user typed; the catalog query trails it by the debounce window.
    pub input: String,
    pub focused: bool,
}

/// The open profile card and its rename draft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProfileState {
    /// Original catalog name of the profiled entry.
    pub name: String,
    pub editing: bool,
    pub draft: String,
    /// Draft edited since the rename started.
    pub dirty: bool,
}

impl ProfileState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            editing: false,
            draft: String::new(),
            dirty: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub catalog: Catalog,
    /// Position in the derived view.
    pub selected_index: usize,
    pub search: SearchState,
    pub profile: Option<ProfileState>,

    pub sprites: HashMap<String, SpriteArt>,
    pub sprite_loading: bool,
    pub sprite_error: Option<String>,

    /// Page-level failure, shown until the next load starts or lands.
    pub error: Option<String>,
    /// Non-blocking status such as dropped entries.
    pub notice: Option<String>,

    pub prefetch_threshold: f32,
    pub debounce_ms: u64,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&CatalogArgs::default())
    }
}

impl AppState {
    pub fn new(args: &CatalogArgs) -> Self {
        Self {
            terminal_size: (80, 24),
            catalog: Catalog::new(args.start_url()),
            selected_index: 0,
            search: SearchState::default(),
            profile: None,
            sprites: HashMap::new(),
            sprite_loading: false,
            sprite_error: None,
            error: None,
            notice: None,
            prefetch_threshold: args.prefetch_threshold,
            debounce_ms: args.debounce_ms,
            tick: 0,
        }
    }

    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.catalog.view_entry(self.selected_index)
    }

    /// Store index of the selected entry, stable across view rebuilds.
    pub fn selected_store_index(&self) -> Option<usize> {
        self.catalog.view().get(self.selected_index).copied()
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        let len = self.catalog.view_len();
        if len == 0 {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(len - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    /// Puts the selection back on `store_index` after the view changed, or
    /// clamps it when that entry is no longer shown.
    pub fn reselect(&mut self, store_index: Option<usize>) {
        let position = store_index.and_then(|idx| self.catalog.view_position(idx));
        match position {
            Some(position) => self.selected_index = position,
            None => {
                let last = self.catalog.view_len().saturating_sub(1);
                self.selected_index = self.selected_index.min(last);
            }
        }
    }

    pub fn visible_rows(&self) -> usize {
        self.terminal_size.1.saturating_sub(LIST_CHROME_ROWS).max(1) as usize
    }

    pub fn near_end(&self) -> bool {
        catalog::near_end(
            self.selected_index,
            self.catalog.view_len(),
            self.visible_rows(),
            self.prefetch_threshold,
        )
    }

    pub fn profile_entry(&self) -> Option<&CatalogEntry> {
        let profile = self.profile.as_ref()?;
        self.catalog.entry(&profile.name)
    }

    pub fn is_editing(&self) -> bool {
        self.profile.as_ref().is_some_and(|profile| profile.editing)
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let paginator = self.catalog.paginator();
        vec![
            DebugSection::new("Catalog")
                .entry("loaded", ron_string(&self.catalog.entries().len()))
                .entry("shown", ron_string(&self.catalog.view_len()))
                .entry("renamed", ron_string(&self.catalog.renames().len()))
                .entry("selected", ron_string(&self.selected_index))
                .entry("query", ron_string(&self.catalog.query())),
            DebugSection::new("Paging")
                .entry("cursor", ron_string(&paginator.cursor()))
                .entry("loading", ron_string(&paginator.is_loading()))
                .entry("pages", ron_string(&paginator.pages_loaded()))
                .entry("near_end", ron_string(&self.near_end())),
            DebugSection::new("Search")
                .entry("input", ron_string(&self.search.input))
                .entry("focused", ron_string(&self.search.focused)),
            DebugSection::new("Profile")
                .entry("name", ron_string(&self.profile.as_ref().map(|p| p.name.clone())))
                .entry("editing", ron_string(&self.is_editing()))
                .entry("sprite_loading", ron_string(&self.sprite_loading))
                .entry("sprite_error", ron_string(&self.sprite_error)),
            DebugSection::new("Status")
                .entry("error", ron_string(&self.error))
                .entry("notice", ron_string(&self.notice)),
        ]
    }
}
