//! Applies a `TableView` to real DOM nodes.
//!
//! The table container is reused; its children are rebuilt on every call so
//! applying the same view twice leaves the same tree. Attributes set by the
//! previous call but absent from the new view are removed.

use pc_core::model::CellRect;
use pc_render::{CellView, ResizeHandle, TableView};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

/// Names of the container attributes written by the last `apply`.
const APPLIED_ATTRS: &str = "data-pc-attrs";

/// Grip thickness of a resize handle, in pixels.
const HANDLE_SIZE: f32 = 6.0;

fn div(doc: &Document) -> Result<HtmlElement, JsValue> {
    doc.create_element("div")?.dyn_into::<HtmlElement>().map_err(JsValue::from)
}

fn place(el: &HtmlElement, rect: CellRect) -> Result<(), JsValue> {
    let style = el.style();
    style.set_property("position", "absolute")?;
    style.set_property("left", &format!("{}px", rect.x))?;
    style.set_property("top", &format!("{}px", rect.y))?;
    style.set_property("width", &format!("{}px", rect.w))?;
    style.set_property("height", &format!("{}px", rect.h))?;
    Ok(())
}

fn sync_attrs(container: &HtmlElement, attrs: &[(String, String)]) -> Result<(), JsValue> {
    if let Some(previous) = container.get_attribute(APPLIED_ATTRS) {
        for name in previous.split_whitespace() {
            if !attrs.iter().any(|(n, _)| n == name) {
                container.remove_attribute(name)?;
            }
        }
    }
    let mut names = Vec::with_capacity(attrs.len());
    for (name, value) in attrs {
        container.set_attribute(name, value)?;
        names.push(name.as_str());
    }
    container.set_attribute(APPLIED_ATTRS, &names.join(" "))
}

fn cell_node(doc: &Document, cell: &CellView) -> Result<HtmlElement, JsValue> {
    let el = div(doc)?;
    let classes = el.class_list();
    for class in &cell.classes {
        classes.add_1(class)?;
    }
    for (name, value) in &cell.attrs {
        el.set_attribute(name, value)?;
    }
    let style = el.style();
    style.set_property("display", "flex")?;
    style.set_property("box-sizing", "border-box")?;
    style.set_property("grid-area", &cell.grid_area)?;
    for (prop, value) in &cell.style {
        style.set_property(prop, value)?;
    }
    el.set_text_content(Some(&cell.content));
    if cell.editable {
        el.set_content_editable("true");
    }
    Ok(el)
}

fn handle_node(
    doc: &Document,
    handle: &ResizeHandle,
    view: &TableView,
) -> Result<HtmlElement, JsValue> {
    let el = div(doc)?;
    el.class_list().add_1("table-resize-handle")?;
    el.set_attribute("data-axis", handle.axis)?;
    el.set_attribute("data-index", &handle.index.to_string())?;
    let offset = handle.position - HANDLE_SIZE / 2.0;
    let (rect, cursor) = if handle.axis == "col" {
        (
            CellRect {
                x: offset,
                y: 0.0,
                w: HANDLE_SIZE,
                h: view.h,
            },
            "col-resize",
        )
    } else {
        (
            CellRect {
                x: 0.0,
                y: offset,
                w: view.w,
                h: HANDLE_SIZE,
            },
            "row-resize",
        )
    };
    place(&el, rect)?;
    el.style().set_property("cursor", cursor)?;
    Ok(el)
}

/// Project `view` into `container`.
pub fn apply(container: &HtmlElement, view: &TableView) -> Result<(), JsValue> {
    let doc = container
        .owner_document()
        .ok_or_else(|| JsValue::from_str("table container is not in a document"))?;

    while let Some(child) = container.first_child() {
        container.remove_child(&child)?;
    }

    place(
        container,
        CellRect {
            x: view.x,
            y: view.y,
            w: view.w,
            h: view.h,
        },
    )?;
    let style = container.style();
    style.set_property("display", "grid")?;
    style.set_property("box-sizing", "border-box")?;
    style.set_property("grid-template-columns", &view.grid_template_columns)?;
    style.set_property("grid-template-rows", &view.grid_template_rows)?;
    style.set_property("border", &view.outer_border)?;
    sync_attrs(container, &view.attrs)?;

    for cell in &view.cells {
        let node: HtmlElement = cell_node(&doc, cell)?;
        container.append_child(&node)?;
    }

    if let Some(rect) = view.selection {
        let overlay = div(&doc)?;
        overlay.class_list().add_1("table-selection")?;
        place(&overlay, rect)?;
        overlay.style().set_property("pointer-events", "none")?;
        container.append_child(&overlay)?;
    }

    for handle in &view.handles {
        let node: HtmlElement = handle_node(&doc, handle, view)?;
        container.append_child(&node)?;
    }
    Ok(())
}
