use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, ProfileState};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init | Action::PageLoadNext => match begin_page(state) {
            Some(effect) => DispatchResult::changed_with(effect),
            None => DispatchResult::unchanged(),
        },

        Action::PageDidLoad(page) => {
            let dropped = page.dropped;
            let selected = state.selected_store_index();
            if !state.catalog.finish_load(page) {
                return DispatchResult::unchanged();
            }
            state.reselect(selected);
            state.error = None;
            state.notice = (dropped > 0).then(|| dropped_notice(dropped));
            DispatchResult::changed_with_many(load_more_if_near_end(state))
        }

        Action::PageDidError { url, error } => {
            if !state.catalog.fail_load(&url) {
                return DispatchResult::unchanged();
            }
            state.error = Some(format!("Failed to load more Pokémon: {error}"));
            DispatchResult::changed()
        }

        Action::SelectionMove(delta) => {
            let len = state.catalog.view_len();
            if len == 0 {
                return selection_result(state, false);
            }
            let next = (state.selected_index as i32 + delta as i32).clamp(0, len as i32 - 1);
            let moved = state.set_selected_index(next as usize);
            selection_result(state, moved)
        }

        Action::SelectionPage(direction) => {
            let len = state.catalog.view_len();
            if len == 0 {
                return selection_result(state, false);
            }
            let step = state.visible_rows() as i32 * direction as i32;
            let next = (state.selected_index as i32 + step).clamp(0, len as i32 - 1);
            let moved = state.set_selected_index(next as usize);
            selection_result(state, moved)
        }

        Action::SelectionJumpTop => {
            let moved = state.set_selected_index(0);
            selection_result(state, moved)
        }

        Action::SelectionJumpBottom => {
            let last = state.catalog.view_len().saturating_sub(1);
            let moved = state.set_selected_index(last);
            selection_result(state, moved)
        }

        Action::DexSelect(index) => {
            let moved = state.set_selected_index(index);
            selection_result(state, moved)
        }

        Action::SearchFocus => {
            if state.search.focused || state.profile.is_some() {
                return DispatchResult::unchanged();
            }
            state.search.focused = true;
            DispatchResult::changed()
        }

        Action::SearchBlur => {
            if !state.search.focused {
                return DispatchResult::unchanged();
            }
            state.search.focused = false;
            DispatchResult::changed()
        }

        Action::SearchInput(input) => {
            if state.search.input == input {
                return DispatchResult::unchanged();
            }
            state.search.input = input.clone();
            DispatchResult::changed_with(Effect::DebounceQuery {
                query: input,
                delay_ms: state.debounce_ms,
            })
        }

        Action::SearchApply(query) => {
            let selected = state.selected_store_index();
            if !state.catalog.set_query(&query) {
                return DispatchResult::unchanged();
            }
            state.reselect(selected);
            DispatchResult::changed_with_many(load_more_if_near_end(state))
        }

        Action::SearchClear => {
            let had_input = !state.search.input.is_empty() || state.search.focused;
            state.search.input.clear();
            state.search.focused = false;
            let selected = state.selected_store_index();
            let query_changed = state.catalog.set_query("");
            if !had_input && !query_changed {
                return DispatchResult::unchanged();
            }
            state.reselect(selected);
            let mut effects = vec![Effect::CancelPendingQuery];
            effects.extend(load_more_if_near_end(state));
            DispatchResult::changed_with_many(effects)
        }

        Action::ProfileOpen => {
            if state.profile.is_some() {
                return DispatchResult::unchanged();
            }
            let Some(entry) = state.selected_entry().cloned() else {
                return DispatchResult::unchanged();
            };
            state.search.focused = false;
            state.profile = Some(ProfileState::new(entry.name.clone()));
            state.sprite_error = None;
            state.sprite_loading = false;
            if state.sprites.contains_key(&entry.name) {
                return DispatchResult::changed();
            }
            match entry.sprite_url {
                Some(url) => {
                    state.sprite_loading = true;
                    DispatchResult::changed_with(Effect::LoadSprite {
                        name: entry.name,
                        url,
                    })
                }
                None => DispatchResult::changed(),
            }
        }

        Action::ProfileClose => {
            let Some(profile) = state.profile.take() else {
                return DispatchResult::unchanged();
            };
            if profile.editing && profile.dirty {
                apply_rename(state, &profile.name, &profile.draft);
            }
            state.sprite_loading = false;
            state.sprite_error = None;
            DispatchResult::changed()
        }

        Action::RenameStart => {
            let Some(profile) = state.profile.as_ref() else {
                return DispatchResult::unchanged();
            };
            if profile.editing {
                return DispatchResult::unchanged();
            }
            let current = state.catalog.display_name(&profile.name).to_string();
            if let Some(profile) = state.profile.as_mut() {
                profile.editing = true;
                profile.draft = current;
                profile.dirty = false;
            }
            DispatchResult::changed()
        }

        Action::RenameInput(draft) => match state.profile.as_mut() {
            Some(profile) if profile.editing && profile.draft != draft => {
                profile.draft = draft;
                profile.dirty = true;
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        Action::RenameSubmit => {
            let Some(profile) = state.profile.as_mut().filter(|profile| profile.editing) else {
                return DispatchResult::unchanged();
            };
            profile.editing = false;
            profile.dirty = false;
            let name = profile.name.clone();
            let draft = std::mem::take(&mut profile.draft);
            apply_rename(state, &name, &draft);
            DispatchResult::changed()
        }

        Action::RenameCancel => match state.profile.as_mut() {
            Some(profile) if profile.editing => {
                profile.editing = false;
                profile.dirty = false;
                profile.draft.clear();
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        Action::SpriteDidLoad { name, sprite } => {
            state.sprites.insert(name.clone(), sprite);
            if is_profiled(state, &name) {
                state.sprite_loading = false;
                state.sprite_error = None;
            }
            DispatchResult::changed()
        }

        Action::SpriteDidError { name, error } => {
            if !is_profiled(state, &name) {
                return DispatchResult::unchanged();
            }
            state.sprite_loading = false;
            state.sprite_error = Some(error);
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            state.terminal_size = (width, height);
            DispatchResult::changed_with_many(load_more_if_near_end(state))
        }

        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            if state.catalog.is_loading() || state.sprite_loading {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Starts a page load at the cursor unless one is running or none remain.
fn begin_page(state: &mut AppState) -> Option<Effect> {
    let url = state.catalog.begin_load()?;
    state.error = None;
    Some(Effect::FetchPage { url })
}

fn load_more_if_near_end(state: &mut AppState) -> Vec<Effect> {
    if !state.near_end() {
        return Vec::new();
    }
    begin_page(state).into_iter().collect()
}

fn selection_result(state: &mut AppState, moved: bool) -> DispatchResult<Effect> {
    let effects = load_more_if_near_end(state);
    if effects.is_empty() && !moved {
        DispatchResult::unchanged()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}

fn apply_rename(state: &mut AppState, name: &str, draft: &str) {
    let selected = state.selected_store_index();
    if state.catalog.rename(name, draft) {
        tracing::debug!(%name, alias = draft.trim(), "renamed entry");
        state.reselect(selected);
    }
}

fn is_profiled(state: &AppState, name: &str) -> bool {
    state
        .profile
        .as_ref()
        .is_some_and(|profile| profile.name == name)
}

fn dropped_notice(dropped: usize) -> String {
    if dropped == 1 {
        "1 entry could not be loaded".to_string()
    } else {
        format!("{dropped} entries could not be loaded")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::{CatalogEntry, HydratedPage};
    use crate::sprite::SpriteArt;

    fn entry(name: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            sprite_url: Some(format!("https://img/{name}.png")),
            type_label: "normal".to_string(),
            height: 1,
            weight: 1,
            base_experience: None,
        }
    }

    fn page(url: &str, names: &[&str], next: Option<&str>) -> HydratedPage {
        HydratedPage {
            url: url.to_string(),
            entries: names.iter().map(|name| entry(name)).collect(),
            next: next.map(str::to_string),
            dropped: 0,
        }
    }

    fn many(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("mon-{i:03}")).collect()
    }

    /// State with one loaded page of `count` entries and a follow-up cursor.
    fn loaded(count: usize) -> AppState {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);
        let Some(Effect::FetchPage { url }) = result.effects.first().cloned() else {
            panic!("expected FetchPage");
        };
        let names = many(count);
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        reducer(&mut state, Action::PageDidLoad(page(&url, &names, Some("page-2"))));
        state
    }

    #[test]
    fn init_requests_first_page_once() {
        let mut state = AppState::default();
        let first = reducer(&mut state, Action::Init);
        assert!(first.changed);
        assert_eq!(
            first.effects,
            vec![Effect::FetchPage {
                url: "https://pokeapi.co/api/v2/pokemon?limit=151".to_string()
            }]
        );

        let before = state.clone();
        let second = reducer(&mut state, Action::PageLoadNext);
        assert!(!second.changed);
        assert!(second.effects.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn page_error_keeps_store_and_cursor() {
        let mut state = loaded(40);
        state.set_selected_index(39);
        let result = reducer(&mut state, Action::SelectionMove(0));
        let Some(Effect::FetchPage { url }) = result.effects.first().cloned() else {
            panic!("expected FetchPage");
        };
        assert_eq!(url, "page-2");

        let entries = state.catalog.entries().to_vec();
        let renames = state.catalog.renames().clone();
        reducer(
            &mut state,
            Action::PageDidError {
                url: url.clone(),
                error: "timeout".into(),
            },
        );
        assert_eq!(state.catalog.entries(), entries.as_slice());
        assert_eq!(state.catalog.renames(), &renames);
        assert_eq!(state.catalog.paginator().cursor(), Some("page-2"));
        assert!(!state.catalog.is_loading());
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to load more Pokémon: timeout")
        );

        let retry = reducer(&mut state, Action::PageLoadNext);
        assert_eq!(retry.effects, vec![Effect::FetchPage { url }]);
        assert_eq!(state.error, None);
    }

    #[test]
    fn stale_page_result_is_ignored() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        let result = reducer(&mut state, Action::PageDidLoad(page("other", &["a"], None)));
        assert!(!result.changed);
        assert!(state.catalog.entries().is_empty());
        assert!(state.catalog.is_loading());
    }

    #[test]
    fn dropped_items_set_a_notice() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);
        let Some(Effect::FetchPage { url }) = result.effects.first().cloned() else {
            panic!("expected FetchPage");
        };
        let mut hydrated = page(&url, &["a", "b"], None);
        hydrated.dropped = 3;
        reducer(&mut state, Action::PageDidLoad(hydrated));
        assert_eq!(state.notice.as_deref(), Some("3 entries could not be loaded"));
        assert_eq!(state.error, None);
    }

    #[test]
    fn moving_near_the_end_requests_next_page() {
        let mut state = loaded(100);
        let far = reducer(&mut state, Action::SelectionMove(50));
        assert!(far.effects.is_empty());

        let near = reducer(&mut state, Action::SelectionJumpBottom);
        assert_eq!(
            near.effects,
            vec![Effect::FetchPage {
                url: "page-2".to_string()
            }]
        );
        let again = reducer(&mut state, Action::SelectionMove(-1));
        assert!(again.effects.is_empty());
    }

    #[test]
    fn short_page_chains_another_load() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);
        let Some(Effect::FetchPage { url }) = result.effects.first().cloned() else {
            panic!("expected FetchPage");
        };
        let chained = reducer(&mut state, Action::PageDidLoad(page(&url, &["a"], Some("p2"))));
        assert_eq!(
            chained.effects,
            vec![Effect::FetchPage {
                url: "p2".to_string()
            }]
        );
    }

    #[test]
    fn exhausted_catalog_stops_loading() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        let url = state.catalog.paginator().cursor().map(str::to_string).expect("cursor");
        let last = reducer(&mut state, Action::PageDidLoad(page(&url, &["a"], None)));
        assert!(last.effects.is_empty());
        assert!(state.catalog.is_exhausted());
        assert!(!reducer(&mut state, Action::PageLoadNext).changed);
    }

    #[test]
    fn search_input_debounces_and_apply_filters() {
        let mut state = loaded(30);
        let typed = reducer(&mut state, Action::SearchInput("007".into()));
        assert_eq!(
            typed.effects,
            vec![Effect::DebounceQuery {
                query: "007".into(),
                delay_ms: 300
            }]
        );
        assert_eq!(state.catalog.view_len(), 30);

        reducer(&mut state, Action::SearchApply("007".into()));
        let shown: Vec<_> = state.catalog.view_entries().map(|e| e.name.clone()).collect();
        assert_eq!(shown, vec!["mon-007".to_string()]);
    }

    #[test]
    fn search_clear_cancels_pending_query() {
        let mut state = loaded(30);
        reducer(&mut state, Action::SearchFocus);
        reducer(&mut state, Action::SearchInput("mon-01".into()));
        reducer(&mut state, Action::SearchApply("mon-01".into()));

        let cleared = reducer(&mut state, Action::SearchClear);
        assert_eq!(cleared.effects.first(), Some(&Effect::CancelPendingQuery));
        assert_eq!(state.catalog.query(), "");
        assert_eq!(state.catalog.view_len(), 30);
        assert!(!state.search.focused);
    }

    #[test]
    fn rename_moves_entry_to_top_and_keeps_selection() {
        let mut state = loaded(30);
        reducer(&mut state, Action::DexSelect(5));
        reducer(&mut state, Action::ProfileOpen);
        reducer(&mut state, Action::RenameStart);
        assert_eq!(
            state.profile.as_ref().map(|p| p.draft.as_str()),
            Some("mon-005")
        );
        reducer(&mut state, Action::RenameInput("Sparky".into()));
        reducer(&mut state, Action::RenameSubmit);

        assert_eq!(state.catalog.display_name("mon-005"), "Sparky");
        assert_eq!(state.selected_index, 0);
        assert_eq!(state.selected_entry().map(|e| e.name.as_str()), Some("mon-005"));
        assert!(!state.is_editing());
    }

    #[test]
    fn closing_with_pending_draft_applies_rename() {
        let mut state = loaded(10);
        reducer(&mut state, Action::ProfileOpen);
        reducer(&mut state, Action::RenameStart);
        reducer(&mut state, Action::RenameInput("Zappy".into()));
        reducer(&mut state, Action::ProfileClose);
        assert_eq!(state.catalog.display_name("mon-000"), "Zappy");
        assert!(state.profile.is_none());
    }

    #[test]
    fn cancel_discards_draft() {
        let mut state = loaded(10);
        reducer(&mut state, Action::ProfileOpen);
        reducer(&mut state, Action::RenameStart);
        reducer(&mut state, Action::RenameInput("Zappy".into()));
        reducer(&mut state, Action::RenameCancel);
        reducer(&mut state, Action::ProfileClose);
        assert!(state.catalog.renames().is_empty());
    }

    #[test]
    fn blank_rename_is_a_noop() {
        let mut state = loaded(10);
        reducer(&mut state, Action::ProfileOpen);
        reducer(&mut state, Action::RenameStart);
        reducer(&mut state, Action::RenameInput("   ".into()));
        reducer(&mut state, Action::RenameSubmit);
        assert!(state.catalog.renames().is_empty());
    }

    #[test]
    fn profile_fetches_sprite_once() {
        let mut state = loaded(10);
        let opened = reducer(&mut state, Action::ProfileOpen);
        assert_eq!(
            opened.effects,
            vec![Effect::LoadSprite {
                name: "mon-000".into(),
                url: "https://img/mon-000.png".into()
            }]
        );
        assert!(state.sprite_loading);

        let art = SpriteArt {
            width: 1,
            height: 1,
            pixels: vec![[1, 2, 3, 255]],
        };
        reducer(
            &mut state,
            Action::SpriteDidLoad {
                name: "mon-000".into(),
                sprite: art,
            },
        );
        assert!(!state.sprite_loading);
        reducer(&mut state, Action::ProfileClose);

        let reopened = reducer(&mut state, Action::ProfileOpen);
        assert!(reopened.effects.is_empty());
    }

    #[test]
    fn sprite_error_for_other_entry_is_ignored() {
        let mut state = loaded(10);
        reducer(&mut state, Action::ProfileOpen);
        let result = reducer(
            &mut state,
            Action::SpriteDidError {
                name: "mon-009".into(),
                error: "404".into(),
            },
        );
        assert!(!result.changed);
        assert!(state.sprite_loading);
    }

    #[test]
    fn tick_only_redraws_while_loading() {
        let mut state = loaded(100);
        assert!(!reducer(&mut state, Action::Tick).changed);
        reducer(&mut state, Action::SelectionJumpBottom);
        assert!(reducer(&mut state, Action::Tick).changed);
    }

    #[test]
    fn restored_mid_load_snapshot_can_fetch_again() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        assert!(state.catalog.is_loading());

        let snapshot = serde_json::to_string(&state).expect("serialize");
        let mut restored: AppState = serde_json::from_str(&snapshot).expect("deserialize");
        assert!(!restored.catalog.is_loading());

        let result = reducer(&mut restored, Action::Init);
        let start = state.catalog.paginator().cursor().map(str::to_string);
        assert_eq!(
            result.effects,
            vec![Effect::FetchPage {
                url: start.expect("cursor")
            }]
        );
    }
}
