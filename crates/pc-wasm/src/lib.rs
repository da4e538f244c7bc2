//! WASM bridge for Pagecraft: exposes the table editing engine to the
//! browser editor.
//!
//! Compiled via `wasm-pack build --target web`. Structured results cross the
//! boundary as JSON strings; failures come back as `false`, `""` or `"{}"`
//! and are logged, never thrown.

mod dom;

use pc_core::document::Document;
use pc_core::id::NodeId;
use pc_core::model::{AlignH, AlignV, CellRange, Color, StyleFlag};
use pc_core::style::{BorderMode, CellStylePatch};
use pc_editor::{EditorConfig, EditorSession, InputEvent, Modifiers};
use serde::Serialize;
use std::fmt::Display;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

/// The browser-facing editor controller.
///
/// Owns one `EditorSession`; every interaction from the page goes through
/// this struct.
#[wasm_bindgen]
pub struct PcEditor {
    session: EditorSession,
}

impl Default for PcEditor {
    fn default() -> Self {
        Self::new()
    }
}

/// Log a failed command and report it as "nothing changed".
fn changed<E: Display>(what: &str, result: Result<bool, E>) -> bool {
    result.unwrap_or_else(|e| {
        log::warn!("{what}: {e}");
        false
    })
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

/// `""` and `"none"` clear a colour; anything else must parse.
fn parse_color(value: &str) -> Result<Option<Color>, String> {
    match value.trim() {
        "" | "none" | "transparent" => Ok(None),
        v => Color::from_css(v)
            .map(Some)
            .ok_or_else(|| format!("bad colour `{v}`")),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HoverInfo<'a> {
    table_id: &'a str,
    axis: &'static str,
    index: usize,
}

#[wasm_bindgen]
impl PcEditor {
    /// Create an editor over an empty one-page document, in edit mode.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self {
            session: EditorSession::new(EditorConfig::default()),
        }
    }

    // ─── Document ────────────────────────────────────────────────────────

    /// Replace the document with the host's JSON value. Returns `false` on
    /// malformed input, leaving the current document in place.
    pub fn load_json(&mut self, json: &str) -> bool {
        match Document::from_json(json) {
            Ok(doc) => {
                self.session.load(doc);
                true
            }
            Err(e) => {
                log::warn!("load: {e}");
                false
            }
        }
    }

    /// The document as the host's JSON value.
    pub fn to_json(&self) -> String {
        self.session
            .document()
            .to_json()
            .unwrap_or_else(|_| "{}".to_string())
    }

    pub fn set_edit_mode(&mut self, on: bool) {
        self.session.set_edit_mode(on);
    }

    pub fn edit_mode(&self) -> bool {
        self.session.edit_mode()
    }

    pub fn set_current_page(&mut self, page_id: &str) -> bool {
        self.session
            .set_current_page(NodeId::intern(page_id))
            .map_err(|e| log::warn!("page: {e}"))
            .is_ok()
    }

    /// Add a default table to the current page. Returns its id, or `""`.
    pub fn add_table(&mut self) -> String {
        match self.session.add_table() {
            Ok(id) => id.as_str().to_string(),
            Err(e) => {
                log::warn!("add table: {e}");
                String::new()
            }
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Replace the element selection with a JSON array of ids.
    pub fn select_elements(&mut self, ids_json: &str) -> bool {
        let Ok(ids) = serde_json::from_str::<Vec<String>>(ids_json) else {
            return false;
        };
        let ids: Vec<NodeId> = ids.iter().map(|s| NodeId::intern(s)).collect();
        self.session.select_elements(&ids);
        true
    }

    pub fn get_selected_ids(&self) -> js_sys::Array {
        self.session
            .selected()
            .iter()
            .map(|id| JsValue::from_str(id.as_str()))
            .collect()
    }

    pub fn set_table_selection(
        &mut self,
        table_id: &str,
        r0: usize,
        c0: usize,
        r1: usize,
        c1: usize,
    ) -> bool {
        self.session
            .set_table_selection(NodeId::intern(table_id), CellRange::new(r0, c0, r1, c1))
            .map_err(|e| log::warn!("table selection: {e}"))
            .is_ok()
    }

    pub fn clear_table_selection(&mut self) {
        self.session.clear_table_selection();
    }

    /// `{"tableId","r0","c0","r1","c1"}` or `"null"`.
    pub fn table_sel(&self) -> String {
        to_json(&self.session.table_sel())
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Handle pointer down. Returns true if anything needs a re-render.
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let mods = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        let event = InputEvent::from_pointer_down(x, y, mods);
        changed("pointer down", self.session.handle_event(&event))
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let mods = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        let event = InputEvent::from_pointer_move(x, y, mods);
        changed("pointer move", self.session.handle_event(&event))
    }

    pub fn handle_pointer_up(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let mods = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        let event = InputEvent::from_pointer_up(x, y, mods);
        changed("pointer up", self.session.handle_event(&event))
    }

    /// Handle a keydown. Returns true if the key was consumed and the host
    /// should prevent its default action.
    pub fn handle_key(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let mods = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        let event = InputEvent::from_key(key, mods);
        changed("key", self.session.handle_event(&event))
    }

    /// Resize boundary under the pointer, for the cursor:
    /// `{"tableId","axis","index"}` or `"null"`.
    pub fn hovered_boundary(&self) -> String {
        let hover = self
            .session
            .hovered_boundary()
            .map(|(id, hit)| (id.as_str().to_string(), hit));
        let info = hover.as_ref().map(|(id, hit)| HoverInfo {
            table_id: id,
            axis: hit.axis.name(),
            index: hit.index,
        });
        to_json(&info)
    }

    // ─── Structure ───────────────────────────────────────────────────────

    pub fn insert_row_above(&mut self) -> bool {
        changed("insert row", self.session.insert_row(false))
    }

    pub fn insert_row_below(&mut self) -> bool {
        changed("insert row", self.session.insert_row(true))
    }

    pub fn insert_column_left(&mut self) -> bool {
        changed("insert column", self.session.insert_column(false))
    }

    pub fn insert_column_right(&mut self) -> bool {
        changed("insert column", self.session.insert_column(true))
    }

    pub fn delete_rows(&mut self) -> bool {
        changed("delete rows", self.session.delete_rows())
    }

    pub fn delete_columns(&mut self) -> bool {
        changed("delete columns", self.session.delete_columns())
    }

    pub fn merge_cells(&mut self) -> bool {
        changed("merge", self.session.merge())
    }

    pub fn unmerge_cells(&mut self) -> bool {
        changed("unmerge", self.session.unmerge())
    }

    pub fn distribute_rows(&mut self) -> bool {
        changed("distribute rows", self.session.distribute_rows())
    }

    pub fn distribute_columns(&mut self) -> bool {
        changed("distribute columns", self.session.distribute_columns())
    }

    pub fn clear_content(&mut self) -> bool {
        changed("clear", self.session.clear_content())
    }

    // ─── Style ───────────────────────────────────────────────────────────

    /// Fill colour as CSS (`""` clears).
    pub fn set_fill(&mut self, color: &str) -> bool {
        match parse_color(color) {
            Ok(c) => changed("fill", self.session.set_fill(c)),
            Err(e) => changed::<String>("fill", Err(e)),
        }
    }

    /// Text colour as CSS (`""` clears).
    pub fn set_text_color(&mut self, color: &str) -> bool {
        match parse_color(color) {
            Ok(c) => changed("text colour", self.session.set_text_color(c)),
            Err(e) => changed::<String>("text colour", Err(e)),
        }
    }

    /// `"left" | "center" | "right"` and `"top" | "middle" | "bottom"`;
    /// an empty string leaves that axis alone.
    pub fn set_align(&mut self, horizontal: &str, vertical: &str) -> bool {
        changed(
            "align",
            self.session
                .set_align(AlignH::parse(horizontal), AlignV::parse(vertical)),
        )
    }

    /// `"bold" | "italic" | "underline"`.
    pub fn toggle_style(&mut self, flag: &str) -> bool {
        let Some(flag) = StyleFlag::parse(flag) else {
            return false;
        };
        changed("toggle", self.session.toggle_style(flag))
    }

    /// A CSS declaration string from the properties panel.
    pub fn apply_style_css(&mut self, css: &str) -> bool {
        changed(
            "style",
            self.session.apply_style_patch(CellStylePatch::from_css(css)),
        )
    }

    /// Border preset (`"all"`, `"outer"`, `"inner"`, `"none"`, a side).
    pub fn set_borders(&mut self, mode: &str, color: &str, width: f32) -> bool {
        let Some(mode) = BorderMode::parse(mode) else {
            return false;
        };
        let Ok(Some(color)) = parse_color(color) else {
            return false;
        };
        changed("borders", self.session.set_borders(mode, color, width))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn conditional_format(
        &mut self,
        table_id: &str,
        r: usize,
        c: usize,
        min_off: i32,
        max_off: i32,
        ok_css: &str,
        nok_css: &str,
    ) -> bool {
        changed(
            "conditional format",
            self.session.conditional_format(
                NodeId::intern(table_id),
                r,
                c,
                min_off as isize,
                max_off as isize,
                ok_css,
                nok_css,
            ),
        )
    }

    // ─── Cell text ───────────────────────────────────────────────────────

    /// Start editing the selected cell, keeping its text.
    pub fn begin_edit(&mut self) -> bool {
        self.session.begin_edit(None)
    }

    pub fn update_draft(&mut self, text: &str) {
        self.session.update_draft(text);
    }

    pub fn commit_edit(&mut self) -> bool {
        changed("commit edit", self.session.commit_edit())
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.session.cancel_edit()
    }

    pub fn commit_cell_text(&mut self, table_id: &str, r: usize, c: usize, text: &str) -> bool {
        changed(
            "cell text",
            self.session
                .commit_cell_text(NodeId::intern(table_id), r, c, text),
        )
    }

    // ─── Clipboard ───────────────────────────────────────────────────────

    /// `{"text","html"}` for a native copy event, or `"{}"` when the copy
    /// should fall through to the browser.
    pub fn copy(&self) -> String {
        self.session
            .copy()
            .map(|payload| to_json(&payload))
            .unwrap_or_else(|| "{}".to_string())
    }

    /// Like `copy`, then clears the selected cells.
    pub fn cut(&mut self) -> String {
        match self.session.cut() {
            Ok(Some(payload)) => to_json(&payload),
            Ok(None) => "{}".to_string(),
            Err(e) => {
                log::warn!("cut: {e}");
                "{}".to_string()
            }
        }
    }

    /// Paste `text/plain` clipboard data into the selection.
    pub fn paste(&mut self, text: &str) -> bool {
        changed("paste", self.session.paste(text))
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        changed("undo", self.session.undo())
    }

    pub fn redo(&mut self) -> bool {
        changed("redo", self.session.redo())
    }

    pub fn can_undo(&self) -> bool {
        self.session.history().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.history().can_redo()
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// The table's view as JSON, or `"{}"` for an unknown id.
    pub fn render_table(&self, table_id: &str) -> String {
        match self.session.render_table(NodeId::intern(table_id)) {
            Ok(view) => to_json(&view),
            Err(e) => {
                log::warn!("render: {e}");
                "{}".to_string()
            }
        }
    }

    /// Views of every table on the current page, as a JSON array.
    pub fn render_page(&self) -> String {
        to_json(&self.session.render_page())
    }

    /// Project the table into `container`.
    pub fn apply_table(&self, container: &HtmlElement, table_id: &str) -> bool {
        let view = match self.session.render_table(NodeId::intern(table_id)) {
            Ok(view) => view,
            Err(e) => {
                log::warn!("render: {e}");
                return false;
            }
        };
        match dom::apply(container, &view) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("dom: {e:?}");
                false
            }
        }
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Pagecraft WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
