use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, TextInput,
    TextInputProps, TextInputStyle,
};

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::catalog::CatalogEntry;
use crate::palette;
use crate::sprite::SpriteArt;
use crate::state::ProfileState;

pub const CARD_WIDTH: u16 = 52;
pub const CARD_HEIGHT: u16 = 32;
const PLACEHOLDER_ROWS: u16 = 3;

pub struct ProfileCard {
    modal: Modal,
    rename: TextInput,
    was_editing: bool,
}

pub struct ProfileCardProps<'a> {
    pub entry: &'a CatalogEntry,
    pub display_name: &'a str,
    pub profile: &'a ProfileState,
    pub sprite: Option<&'a SpriteArt>,
    pub sprite_loading: bool,
    pub sprite_error: Option<&'a str>,
    pub is_focused: bool,
}

impl Default for ProfileCard {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
            rename: TextInput::new(),
            was_editing: false,
        }
    }
}

impl ProfileCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn area(screen: Rect) -> Rect {
        centered_rect(
            CARD_WIDTH.min(screen.width),
            CARD_HEIGHT.min(screen.height),
            screen,
        )
    }

    /// Fresh input for each rename so the cursor starts at the end of the draft.
    fn sync_editing(&mut self, editing: bool) {
        if editing && !self.was_editing {
            self.rename = TextInput::new();
        }
        self.was_editing = editing;
    }
}

fn rename_style() -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::BOTTOM,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        placeholder_style: Some(Style::default().fg(TEXT_DIM)),
        cursor_style: None,
    }
}

fn modal_style() -> ModalStyle {
    ModalStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(ACCENT_TEAL),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(2, 1),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        ..Default::default()
    }
}

fn info_text(entry: &CatalogEntry) -> Text<'static> {
    let label = Style::default().fg(TEXT_DIM);
    let value = Style::default().fg(TEXT_MAIN);
    let color = palette::type_color(&entry.type_label);
    let badge = Style::default()
        .bg(color.into())
        .fg(palette::text_on(color).into());
    let base_experience = entry
        .base_experience
        .map(|exp| exp.to_string())
        .unwrap_or_else(|| "?".to_string());

    Text::from(vec![
        Line::from(vec![
            Span::styled("Type: ", label),
            Span::styled(format!(" {} ", palette::display_label(&entry.type_label)), badge),
        ]),
        Line::from(vec![
            Span::styled("Base Experience: ", label),
            Span::styled(base_experience, value),
        ]),
        Line::from(vec![
            Span::styled("Height: ", label),
            Span::styled(entry.height.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Weight: ", label),
            Span::styled(entry.weight.to_string(), value),
        ]),
    ])
}

fn sprite_text(props: &ProfileCardProps<'_>) -> Text<'static> {
    if let Some(sprite) = props.sprite {
        return Text::from(sprite.lines());
    }
    let message = if props.sprite_loading {
        "Loading sprite...".to_string()
    } else if let Some(error) = props.sprite_error {
        format!("Sprite unavailable: {error}")
    } else {
        "No sprite".to_string()
    };
    Text::from(vec![
        Line::default(),
        Line::styled(message, Style::default().fg(TEXT_DIM)),
    ])
}

fn hint_line(editing: bool) -> Line<'static> {
    let key = Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD);
    let text = Style::default().fg(TEXT_DIM);
    let hints: &[(&str, &str)] = if editing {
        &[("Enter", "save"), ("Esc", "cancel")]
    } else {
        &[("e", "rename"), ("Esc", "close")]
    };
    let mut spans = Vec::new();
    for (idx, (k, label)) in hints.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*k, key));
        spans.push(Span::styled(format!(" {label}"), text));
    }
    Line::from(spans)
}

impl Component<Action> for ProfileCard {
    type Props<'a> = ProfileCardProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let editing = props.profile.editing;
        self.sync_editing(editing);
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        if editing {
            return match key.code {
                KeyCode::Esc => vec![Action::RenameCancel],
                KeyCode::Enter => vec![Action::RenameSubmit],
                _ => {
                    let input_props = TextInputProps {
                        value: &props.profile.draft,
                        placeholder: props.entry.name.as_str(),
                        is_focused: true,
                        style: rename_style(),
                        on_change: Action::RenameInput,
                        on_submit: |_| Action::RenameSubmit,
                        on_cursor_move: Some(|_| Action::Render),
                    };
                    self.rename
                        .handle_event(event, input_props)
                        .into_iter()
                        .collect()
                }
            };
        }

        match key.code {
            KeyCode::Char('e') | KeyCode::Enter => vec![Action::RenameStart],
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => vec![Action::ProfileClose],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.sync_editing(props.profile.editing);
        let ProfileCard { modal, rename, .. } = self;
        let sprite_rows = props
            .sprite
            .map(|sprite| sprite.rows())
            .unwrap_or(PLACEHOLDER_ROWS);

        let mut render_content = |frame: &mut Frame, content: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(2),           // Name / rename input
                Constraint::Length(sprite_rows), // Sprite
                Constraint::Length(1),
                Constraint::Length(4), // Info
                Constraint::Min(0),
                Constraint::Length(1), // Hints
            ])
            .split(content);

            if props.profile.editing {
                let input_props = TextInputProps {
                    value: &props.profile.draft,
                    placeholder: props.entry.name.as_str(),
                    is_focused: props.is_focused,
                    style: rename_style(),
                    on_change: Action::RenameInput,
                    on_submit: |_| Action::RenameSubmit,
                    on_cursor_move: Some(|_| Action::Render),
                };
                rename.render(frame, chunks[0], input_props);
            } else {
                let mut lines = vec![Line::styled(
                    props.display_name.to_string(),
                    Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
                )];
                if props.display_name != props.entry.name {
                    lines.push(Line::styled(
                        format!("({})", props.entry.name),
                        Style::default().fg(TEXT_DIM),
                    ));
                }
                frame.render_widget(
                    Paragraph::new(lines).alignment(Alignment::Center),
                    chunks[0],
                );
            }

            frame.render_widget(
                Paragraph::new(sprite_text(&props)).alignment(Alignment::Center),
                chunks[1],
            );
            frame.render_widget(Paragraph::new(info_text(props.entry)), chunks[3]);
            frame.render_widget(
                Paragraph::new(hint_line(props.profile.editing)).alignment(Alignment::Center),
                chunks[5],
            );
        };

        modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: Self::area(area),
                style: modal_style(),
                behavior: ModalBehavior::default(),
                on_close: || Action::ProfileClose,
                render_content: &mut render_content,
            },
        );
    }
}
