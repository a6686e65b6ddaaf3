use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::HydratedPage;
use crate::sprite::SpriteArt;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,

    // ===== Page category =====
    /// Request the next page at the cursor (no-op while loading or exhausted)
    PageLoadNext,
    PageDidLoad(HydratedPage),
    PageDidError { url: String, error: String },

    // ===== Selection category =====
    SelectionMove(i16),
    SelectionPage(i16),
    SelectionJumpTop,
    SelectionJumpBottom,
    DexSelect(usize),

    // ===== Search category =====
    SearchFocus,
    SearchBlur,
    /// Raw input; the view updates after the debounce window
    SearchInput(String),
    /// Debounced query reaching the view
    SearchApply(String),
    SearchClear,

    // ===== Profile category =====
    ProfileOpen,
    ProfileClose,

    // ===== Rename category =====
    RenameStart,
    RenameInput(String),
    RenameSubmit,
    RenameCancel,

    // ===== Sprite category =====
    SpriteDidLoad { name: String, sprite: SpriteArt },
    SpriteDidError { name: String, error: String },

    // ===== Ui category =====
    UiTerminalResize(u16, u16),
    /// Force a re-render (cursor movement inside inputs)
    Render,

    Tick,
    Quit,
}
