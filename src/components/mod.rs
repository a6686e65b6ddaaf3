pub mod dex_list;
pub mod profile_card;
pub mod search_bar;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use dex_list::{DexList, DexListProps};
pub use profile_card::{ProfileCard, ProfileCardProps};
pub use search_bar::{SearchBar, SearchBarProps};

use ratatui::style::Color;

pub const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
pub const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
pub const ERROR_RED: Color = Color::Rgb(232, 72, 72);
