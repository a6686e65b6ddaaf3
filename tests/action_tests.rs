//! Reducer, action category and component key tests.

use pokedex::{
    action::Action,
    catalog::{CatalogEntry, HydratedPage},
    components::{
        Component, ProfileCard, ProfileCardProps, SearchBar, SearchBarProps,
    },
    config::CatalogArgs,
    effect::Effect,
    reducer::reducer,
    state::{AppState, ProfileState},
};
use tui_dispatch::testing::*;
use tui_dispatch::{assert_emitted, assert_not_emitted, EffectStore, NumericComponentId};

fn mew() -> CatalogEntry {
    CatalogEntry {
        name: "mew".to_string(),
        sprite_url: None,
        type_label: "psychic".to_string(),
        height: 4,
        weight: 40,
        base_experience: Some(300),
    }
}

#[test]
fn test_reducer_init_fetches_first_page() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    let result = store.dispatch(Action::Init);
    assert!(result.changed);
    assert!(store.state().catalog.is_loading());
    assert_eq!(
        result.effects,
        vec![Effect::FetchPage {
            url: CatalogArgs::default().start_url()
        }]
    );
}

#[test]
fn test_reducer_ignores_stale_completion() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);

    let result = store.dispatch(Action::PageDidLoad(HydratedPage {
        url: "https://elsewhere/pokemon?offset=999".to_string(),
        entries: vec![mew()],
        next: None,
        dropped: 0,
    }));
    assert!(!result.changed);
    assert!(store.state().catalog.entries().is_empty());
    assert!(store.state().catalog.is_loading());
}

#[test]
fn test_profile_without_sprite_url_skips_fetch() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(Action::PageDidLoad(HydratedPage {
        url: CatalogArgs::default().start_url(),
        entries: vec![mew()],
        next: None,
        dropped: 0,
    }));

    let result = store.dispatch(Action::ProfileOpen);
    assert!(result.changed);
    assert!(result.effects.is_empty());
    assert!(!store.state().sprite_loading);
}

#[test]
fn test_action_categories() {
    let did_load = Action::PageDidLoad(HydratedPage {
        url: String::new(),
        entries: Vec::new(),
        next: None,
        dropped: 0,
    });
    let resize = Action::UiTerminalResize(80, 24);

    assert_eq!(did_load.category(), Some("page_did"));
    assert_eq!(resize.category(), Some("ui_terminal"));
    assert_eq!(Action::Tick.category(), None);
}

#[test]
fn test_assert_emitted_macro() {
    let actions = vec![Action::SearchClear, Action::SearchBlur];

    assert_emitted!(actions, Action::SearchClear);
    assert_not_emitted!(actions, Action::SearchInput(_));
}

#[test]
fn test_search_bar_typing() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut bar = SearchBar::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("a", |state, event| {
        let props = SearchBarProps {
            value: &state.search.input,
            is_focused: true,
            on_change: Action::SearchInput,
        };
        bar.handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    assert_emitted!(actions, Action::SearchInput(_));
    assert_not_emitted!(actions, Action::SearchClear);
}

#[test]
fn test_profile_card_ignores_when_unfocused() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut card = ProfileCard::new();
    let entry = mew();
    let profile = ProfileState::new("mew");

    let actions = harness.send_keys::<NumericComponentId, _, _>("e q", |_, event| {
        let props = ProfileCardProps {
            entry: &entry,
            display_name: "mew",
            profile: &profile,
            sprite: None,
            sprite_loading: false,
            sprite_error: None,
            is_focused: false,
        };
        card.handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_empty();
}
