use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::{
    Component, EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext,
};
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use crate::action::Action;
use crate::components::{
    DexList, DexListProps, ProfileCard, ProfileCardProps, SearchBar, SearchBarProps, ACCENT_GOLD,
    ACCENT_TEAL, BG_BASE, BG_PANEL, ERROR_RED, TEXT_DIM, TEXT_MAIN,
};
use crate::state::AppState;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PokedexComponentId {
    Search,
    List,
    Profile,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokedexContext {
    Search,
    List,
    Profile,
}

impl EventRoutingState<PokedexComponentId, PokedexContext> for AppState {
    fn focused(&self) -> Option<PokedexComponentId> {
        if self.profile.is_some() {
            Some(PokedexComponentId::Profile)
        } else if self.search.focused {
            Some(PokedexComponentId::Search)
        } else {
            Some(PokedexComponentId::List)
        }
    }

    fn modal(&self) -> Option<PokedexComponentId> {
        self.profile.as_ref().map(|_| PokedexComponentId::Profile)
    }

    fn binding_context(&self, id: PokedexComponentId) -> PokedexContext {
        match id {
            PokedexComponentId::Search => PokedexContext::Search,
            PokedexComponentId::List => PokedexContext::List,
            PokedexComponentId::Profile => PokedexContext::Profile,
        }
    }

    fn default_context(&self) -> PokedexContext {
        PokedexContext::List
    }
}

/// Where each interactive component landed in the last frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenAreas {
    pub search: Rect,
    pub list: Rect,
    pub profile: Option<Rect>,
}

pub struct PokedexUi {
    search: SearchBar,
    dex_list: DexList,
    profile: ProfileCard,
    status_bar: StatusBar,
}

impl Default for PokedexUi {
    fn default() -> Self {
        Self::new()
    }
}

impl PokedexUi {
    pub fn new() -> Self {
        Self {
            search: SearchBar::new(),
            dex_list: DexList::new(),
            profile: ProfileCard::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokedexComponentId>,
    ) {
        let areas = self.draw(frame, area, state);
        event_ctx.set_component_area(PokedexComponentId::Search, areas.search);
        event_ctx.set_component_area(PokedexComponentId::List, areas.list);
        match areas.profile {
            Some(profile_area) => {
                event_ctx.set_component_area(PokedexComponentId::Profile, profile_area)
            }
            None => {
                event_ctx
                    .component_areas
                    .remove(&PokedexComponentId::Profile);
            }
        }
    }

    /// Draws the whole screen and reports the component areas.
    pub fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) -> ScreenAreas {
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
        let layout = Layout::vertical([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Search
            Constraint::Length(1), // Error / notice
            Constraint::Min(3),    // List
            Constraint::Length(1), // Footer
        ])
        .split(area);

        render_title(frame, layout[0], state);

        self.search.render(
            frame,
            layout[1],
            SearchBarProps {
                value: &state.search.input,
                is_focused: state.search.focused,
                on_change: Action::SearchInput,
            },
        );

        render_message(frame, layout[2], state);

        let list_focused = !state.search.focused && state.profile.is_none();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Pokémon ")
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(if list_focused {
                Style::default().fg(ACCENT_TEAL)
            } else {
                Style::default().fg(TEXT_DIM)
            });
        let list_inner = block.inner(layout[3]);
        frame.render_widget(block, layout[3]);
        self.dex_list.render(
            frame,
            list_inner,
            DexListProps {
                catalog: &state.catalog,
                selected: state.selected_index,
                is_focused: list_focused,
                on_select: Action::DexSelect,
            },
        );

        render_footer(frame, layout[4], state, &mut self.status_bar);

        let profile = self.render_profile(frame, area, state);
        ScreenAreas {
            search: layout[1],
            list: layout[3],
            profile,
        }
    }

    fn render_profile(&mut self, frame: &mut Frame, area: Rect, state: &AppState) -> Option<Rect> {
        let profile = state.profile.as_ref()?;
        let entry = state.profile_entry()?;
        let props = ProfileCardProps {
            entry,
            display_name: state.catalog.display_name(&entry.name),
            profile,
            sprite: state.sprites.get(&entry.name),
            sprite_loading: state.sprite_loading,
            sprite_error: state.sprite_error.as_deref(),
            is_focused: true,
        };
        self.profile.render(frame, area, props);
        Some(ProfileCard::area(area))
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = SearchBarProps {
            value: &state.search.input,
            is_focused: state.search.focused,
            on_change: Action::SearchInput,
        };
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        // Typing must not leak into list or global bindings.
        if state.search.focused && matches!(event, EventKind::Key(_)) {
            return HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            };
        }
        handler_response(actions)
    }

    pub fn handle_list_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = DexListProps {
            catalog: &state.catalog,
            selected: state.selected_index,
            is_focused: !state.search.focused && state.profile.is_none(),
            on_select: Action::DexSelect,
        };
        let actions: Vec<_> = self
            .dex_list
            .handle_event(event, props)
            .into_iter()
            .collect();
        handler_response(actions)
    }

    pub fn handle_profile_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let (Some(profile), Some(entry)) = (state.profile.as_ref(), state.profile_entry()) else {
            return HandlerResponse::ignored();
        };
        let props = ProfileCardProps {
            entry,
            display_name: state.catalog.display_name(&entry.name),
            profile,
            sprite: state.sprites.get(&entry.name),
            sprite_loading: state.sprite_loading,
            sprite_error: state.sprite_error.as_deref(),
            is_focused: true,
        };
        let actions: Vec<_> = self.profile.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: matches!(event, EventKind::Key(_)),
            needs_render: false,
        }
    }
}

/// Bindings that apply when no input has the keyboard.
pub fn handle_global_event(event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
    match event {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(*width, *height)).with_render()
        }
        EventKind::Key(key)
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') =>
        {
            HandlerResponse::action(Action::Quit)
        }
        EventKind::Key(key) if !state.search.focused && state.profile.is_none() => {
            match key.code {
                KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
                KeyCode::Char('/') => HandlerResponse::action(Action::SearchFocus),
                KeyCode::Char('r') => HandlerResponse::action(Action::PageLoadNext),
                KeyCode::Esc if !state.search.input.is_empty() => {
                    HandlerResponse::action(Action::SearchClear)
                }
                _ => HandlerResponse::ignored(),
            }
        }
        _ => HandlerResponse::ignored(),
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_title(frame: &mut Frame, area: Rect, state: &AppState) {
    let catalog = &state.catalog;
    let dim = Style::default().fg(TEXT_DIM);
    let line = Line::from(vec![
        Span::styled(
            " PokéDex ",
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" loaded ", dim),
        Span::styled(catalog.entries().len().to_string(), Style::default().fg(TEXT_MAIN)),
        Span::styled("  shown ", dim),
        Span::styled(catalog.view_len().to_string(), Style::default().fg(TEXT_MAIN)),
        Span::styled("  renamed ", dim),
        Span::styled(
            catalog.renames().len().to_string(),
            Style::default().fg(ACCENT_GOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_message(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = if let Some(error) = &state.error {
        Line::from(vec![
            Span::styled(
                format!(" {error}"),
                Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (r to retry)", Style::default().fg(TEXT_DIM)),
        ])
    } else if let Some(notice) = &state.notice {
        Line::styled(format!(" {notice}"), Style::default().fg(ACCENT_GOLD))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn status_text(state: &AppState) -> String {
    let catalog = &state.catalog;
    if catalog.is_loading() {
        let frame = SPINNER[(state.tick as usize) % SPINNER.len()];
        format!("{frame} Loading page {}", catalog.paginator().pages_loaded() + 1)
    } else if catalog.is_exhausted() {
        format!("All {} Pokémon loaded", catalog.entries().len())
    } else {
        String::new()
    }
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.is_editing() {
        vec![
            StatusBarHint::new("Enter", "Save"),
            StatusBarHint::new("Esc", "Cancel"),
        ]
    } else if state.profile.is_some() {
        vec![
            StatusBarHint::new("e", "Rename"),
            StatusBarHint::new("Esc", "Close"),
        ]
    } else if state.search.focused {
        vec![
            StatusBarHint::new("Enter", "Done"),
            StatusBarHint::new("Esc", "Clear"),
        ]
    } else {
        vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("Enter", "Profile"),
            StatusBarHint::new("/", "Search"),
            StatusBarHint::new("r", "Load"),
            StatusBarHint::new("q", "Quit"),
        ]
    }
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let hints = status_hints(state);
    let status = status_text(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&hints).with_separator("  "),
        center: StatusBarSection::empty(),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}
