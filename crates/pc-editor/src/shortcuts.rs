//! Keyboard mapping for tables.
//!
//! Two contexts: the grid (a cell range is selected, no cell is being
//! edited) follows the ARIA grid pattern; while a cell is edited only the
//! commit/cancel keys are ours and everything else types into the cell.
//! Copy and paste are not here: they arrive as native clipboard events.

use crate::input::Modifiers;
use crate::selection::NavKey;
use pc_core::model::StyleFlag;

/// Actions that keys can trigger on a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    Navigate { key: NavKey, grow: bool },
    /// Escape: drop the cell range.
    ClearSelection,
    /// Delete/Backspace: empty every cell in the range.
    ClearContent,
    /// F2: edit the anchor cell, keeping its text.
    StartEdit,
    /// A printable key: edit the anchor cell, replacing its text.
    TypeToEdit(char),
    /// Finish editing and optionally move (Enter stays, Tab moves).
    CommitEdit { then: Option<NavKey> },
    CancelEdit,
    Toggle(StyleFlag),
    SelectAll,
    Undo,
    Redo,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key pressed while the grid has focus.
    pub fn resolve(key: &str, mods: Modifiers) -> Option<TableAction> {
        if mods.command() {
            return match (key, mods.shift) {
                ("z" | "Z", true) => Some(TableAction::Redo),
                ("z" | "Z", false) => Some(TableAction::Undo),
                ("y" | "Y", _) => Some(TableAction::Redo),
                ("a" | "A", _) => Some(TableAction::SelectAll),
                ("b" | "B", _) => Some(TableAction::Toggle(StyleFlag::Bold)),
                ("i" | "I", _) => Some(TableAction::Toggle(StyleFlag::Italic)),
                ("u" | "U", _) => Some(TableAction::Toggle(StyleFlag::Underline)),
                _ => None,
            };
        }

        let grow = mods.shift;
        let nav = |key| Some(TableAction::Navigate { key, grow });
        match key {
            "ArrowUp" => nav(NavKey::Up),
            "ArrowDown" => nav(NavKey::Down),
            "ArrowLeft" => nav(NavKey::Left),
            "ArrowRight" => nav(NavKey::Right),
            "Tab" => nav(if mods.shift { NavKey::Prev } else { NavKey::Next }),
            "Enter" => nav(if mods.shift {
                NavKey::Above
            } else {
                NavKey::Below
            }),
            "Escape" => Some(TableAction::ClearSelection),
            "Delete" | "Backspace" => Some(TableAction::ClearContent),
            "F2" => Some(TableAction::StartEdit),
            _ if !mods.alt => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if !ch.is_control() => Some(TableAction::TypeToEdit(ch)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Resolve a key pressed while a cell is being edited.
    pub fn resolve_editing(key: &str, mods: Modifiers) -> Option<TableAction> {
        match key {
            "Enter" if !mods.shift => Some(TableAction::CommitEdit { then: None }),
            "Escape" => Some(TableAction::CancelEdit),
            "Tab" => Some(TableAction::CommitEdit {
                then: Some(if mods.shift { NavKey::Prev } else { NavKey::Next }),
            }),
            _ => None,
        }
    }
}
