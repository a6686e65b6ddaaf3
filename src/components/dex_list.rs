use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle,
};

use super::{Component, ACCENT_GOLD, BG_HIGHLIGHT, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::catalog::{Catalog, CatalogEntry};
use crate::palette;

const NAME_WIDTH: usize = 22;
pub const RENAMED_MARKER: &str = "✎";

pub struct DexList {
    list: SelectList,
}

pub struct DexListProps<'a> {
    pub catalog: &'a Catalog,
    pub selected: usize,
    pub is_focused: bool,
    pub on_select: fn(usize) -> Action,
}

impl Default for DexList {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
        }
    }
}

impl DexList {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One list row: effective name, renamed marker and a colored type badge.
pub fn row_line(catalog: &Catalog, entry: &CatalogEntry) -> Line<'static> {
    let name = catalog.display_name(&entry.name);
    let renamed = catalog.renames().is_renamed(&entry.name);
    let color = palette::type_color(&entry.type_label);
    let badge_style = Style::default()
        .bg(color.into())
        .fg(palette::text_on(color).into());

    let name_style = if renamed {
        Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_MAIN)
    };
    let marker = if renamed { RENAMED_MARKER } else { " " };
    let padded: String = format!("{name:<width$}", width = NAME_WIDTH)
        .chars()
        .take(NAME_WIDTH)
        .collect();

    Line::from(vec![
        Span::styled(padded, name_style),
        Span::styled(format!("{marker} "), Style::default().fg(ACCENT_GOLD)),
        Span::styled(
            format!(" {} ", palette::display_label(&entry.type_label)),
            badge_style,
        ),
    ])
}

fn dex_items(catalog: &Catalog) -> Vec<Line<'static>> {
    let mut items: Vec<Line<'static>> = catalog
        .view_entries()
        .map(|entry| row_line(catalog, entry))
        .collect();
    if catalog.is_loading() {
        items.push(Line::styled(
            "Loading more Pokémon...",
            Style::default().fg(TEXT_DIM).add_modifier(Modifier::ITALIC),
        ));
    }
    items
}

fn dex_list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

impl Component<Action> for DexList {
    type Props<'a> = DexListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('j') | KeyCode::Down => vec![Action::SelectionMove(1)],
                KeyCode::Char('k') | KeyCode::Up => vec![Action::SelectionMove(-1)],
                KeyCode::PageDown => vec![Action::SelectionPage(1)],
                KeyCode::PageUp => vec![Action::SelectionPage(-1)],
                KeyCode::Char('g') | KeyCode::Home => vec![Action::SelectionJumpTop],
                KeyCode::Char('G') | KeyCode::End => vec![Action::SelectionJumpBottom],
                KeyCode::Enter if props.catalog.view_len() > 0 => vec![Action::ProfileOpen],
                _ => {
                    let items = dex_items(props.catalog);
                    let list_props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: props.selected.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: dex_list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: props.on_select,
                        render_item: &|item| item.clone(),
                    };
                    self.list.handle_event(event, list_props).into_iter().collect()
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::SelectionMove((*delta * 3) as i16)],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let catalog = props.catalog;
        if catalog.view_len() == 0 {
            let message = if catalog.is_loading() {
                "Loading Pokémon...".to_string()
            } else if !catalog.query().is_empty() {
                format!("No Pokémon match \"{}\"", catalog.query())
            } else {
                "No Pokémon loaded".to_string()
            };
            let paragraph = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM));
            frame.render_widget(paragraph, area);
            return;
        }

        let items = dex_items(catalog);
        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: props.selected.min(items.len().saturating_sub(1)),
            is_focused: props.is_focused,
            style: dex_list_style(),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: props.on_select,
            render_item: &|item| item.clone(),
        };
        self.list.render(frame, area, list_props);
    }
}
