//! Host document model: pages holding positioned elements, one of which may
//! be a table.
//!
//! Stored as a `petgraph` stable graph `root → page → element`. Tables are
//! replaced wholesale after every op. The whole document serializes to JSON
//! (the host's value format) and to MessagePack for history snapshots.

use crate::error::DocumentError;
use crate::id::NodeId;
use crate::model::{Attrs, Table};
use crate::style::CellStylePatch;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// A page of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: NodeId,
    pub name: String,
}

/// Box of a non-table element, in page pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// A plain (non-table) element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub styles: CellStylePatch,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub attrs: Attrs,
}

impl Shape {
    pub fn new(id: NodeId, frame: Frame) -> Self {
        Self {
            id,
            x: frame.x,
            y: frame.y,
            w: frame.w,
            h: frame.h,
            content: String::new(),
            styles: CellStylePatch::default(),
            attrs: SmallVec::new(),
        }
    }
}

/// A positioned element, tagged by `type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text(Shape),
    Field(Shape),
    Rect(Shape),
    Line(Shape),
    Image(Shape),
    Table(Table),
}

/// Element kind without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Field,
    Rect,
    Line,
    Image,
    Table,
}

impl Element {
    pub fn id(&self) -> NodeId {
        match self {
            Element::Text(s)
            | Element::Field(s)
            | Element::Rect(s)
            | Element::Line(s)
            | Element::Image(s) => s.id,
            Element::Table(t) => t.id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Text(_) => ElementKind::Text,
            Element::Field(_) => ElementKind::Field,
            Element::Rect(_) => ElementKind::Rect,
            Element::Line(_) => ElementKind::Line,
            Element::Image(_) => ElementKind::Image,
            Element::Table(_) => ElementKind::Table,
        }
    }

    pub fn frame(&self) -> Frame {
        match self {
            Element::Text(s)
            | Element::Field(s)
            | Element::Rect(s)
            | Element::Line(s)
            | Element::Image(s) => Frame {
                x: s.x,
                y: s.y,
                w: s.w,
                h: s.h,
            },
            Element::Table(t) => Frame {
                x: t.x,
                y: t.y,
                w: t.w,
                h: t.h,
            },
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Element::Table(t) => Some(t),
            _ => None,
        }
    }
}

/// A graph node.
#[derive(Debug, Clone)]
pub enum DocNode {
    Root,
    Page(Page),
    Element(Element),
}

/// Flat serialized form of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentData {
    pub pages: Vec<PageData>,
    #[serde(default)]
    pub edit_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// The document: pages and their elements.
#[derive(Debug, Clone)]
pub struct Document {
    pub graph: StableDiGraph<DocNode, ()>,
    pub root: NodeIndex,
    /// Index from page/element id → graph node.
    pub id_index: HashMap<NodeId, NodeIndex>,
    /// Whether the canvas is in edit (design) mode rather than run mode.
    pub edit_mode: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document (no pages), in edit mode.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(DocNode::Root);
        Self {
            graph,
            root,
            id_index: HashMap::new(),
            edit_mode: true,
        }
    }

    /// Children of a node in insertion order.
    fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        out.sort();
        out
    }

    fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    // ─── Pages ───────────────────────────────────────────────────────────

    /// Append a page and return its id.
    pub fn add_page(&mut self, name: &str) -> NodeId {
        let id = NodeId::with_prefix("page");
        self.insert_page(Page {
            id,
            name: name.to_string(),
        });
        id
    }

    fn insert_page(&mut self, page: Page) -> NodeIndex {
        let id = page.id;
        let idx = self.graph.add_node(DocNode::Page(page));
        self.graph.add_edge(self.root, idx, ());
        self.id_index.insert(id, idx);
        idx
    }

    /// Remove a page together with its elements.
    pub fn remove_page(&mut self, id: NodeId) -> Result<Page, DocumentError> {
        let idx = self.page_index(id)?;
        for child in self.children(idx) {
            if let Some(DocNode::Element(el)) = self.graph.remove_node(child) {
                self.id_index.remove(&el.id());
            }
        }
        self.id_index.remove(&id);
        match self.graph.remove_node(idx) {
            Some(DocNode::Page(page)) => Ok(page),
            _ => Err(DocumentError::PageNotFound(id)),
        }
    }

    fn page_index(&self, id: NodeId) -> Result<NodeIndex, DocumentError> {
        self.id_index
            .get(&id)
            .copied()
            .filter(|idx| matches!(self.graph.node_weight(*idx), Some(DocNode::Page(_))))
            .ok_or(DocumentError::PageNotFound(id))
    }

    /// Pages in document order.
    pub fn pages(&self) -> Vec<&Page> {
        self.children(self.root)
            .into_iter()
            .filter_map(|idx| match &self.graph[idx] {
                DocNode::Page(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    // ─── Elements ────────────────────────────────────────────────────────

    /// Add an element to the end of `page`'s stacking order.
    pub fn add_element(&mut self, page: NodeId, element: Element) -> Result<NodeId, DocumentError> {
        let parent = self.page_index(page)?;
        let id = element.id();
        let idx = self.graph.add_node(DocNode::Element(element));
        self.graph.add_edge(parent, idx, ());
        self.id_index.insert(id, idx);
        log::debug!("document: added element {id} to {page}");
        Ok(id)
    }

    pub fn remove_element(&mut self, id: NodeId) -> Result<Element, DocumentError> {
        let idx = self.element_index(id)?;
        self.id_index.remove(&id);
        match self.graph.remove_node(idx) {
            Some(DocNode::Element(el)) => Ok(el),
            _ => Err(DocumentError::ElementNotFound(id)),
        }
    }

    fn element_index(&self, id: NodeId) -> Result<NodeIndex, DocumentError> {
        self.id_index
            .get(&id)
            .copied()
            .filter(|idx| matches!(self.graph.node_weight(*idx), Some(DocNode::Element(_))))
            .ok_or(DocumentError::ElementNotFound(id))
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        let idx = self.element_index(id).ok()?;
        match &self.graph[idx] {
            DocNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        let idx = self.element_index(id).ok()?;
        match &mut self.graph[idx] {
            DocNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Elements of `page` in stacking order.
    pub fn elements_on(&self, page: NodeId) -> Vec<&Element> {
        let Ok(idx) = self.page_index(page) else {
            return Vec::new();
        };
        self.children(idx)
            .into_iter()
            .filter_map(|child| match &self.graph[child] {
                DocNode::Element(el) => Some(el),
                _ => None,
            })
            .collect()
    }

    /// Page holding element `id`.
    pub fn page_of(&self, id: NodeId) -> Option<NodeId> {
        let idx = self.element_index(id).ok()?;
        match &self.graph[self.parent(idx)?] {
            DocNode::Page(p) => Some(p.id),
            _ => None,
        }
    }

    /// The table element `id`.
    pub fn table(&self, id: NodeId) -> Result<&Table, DocumentError> {
        self.element(id)
            .ok_or(DocumentError::ElementNotFound(id))?
            .as_table()
            .ok_or(DocumentError::NotATable(id))
    }

    /// Replace the table element with the same id as `table`.
    pub fn replace_table(&mut self, table: Table) -> Result<(), DocumentError> {
        let id = table.id;
        match self.element_mut(id) {
            Some(Element::Table(slot)) => {
                *slot = table;
                Ok(())
            }
            Some(_) => Err(DocumentError::NotATable(id)),
            None => Err(DocumentError::ElementNotFound(id)),
        }
    }

    // ─── Serialization ───────────────────────────────────────────────────

    pub fn to_data(&self) -> DocumentData {
        let pages = self
            .children(self.root)
            .into_iter()
            .filter_map(|idx| match &self.graph[idx] {
                DocNode::Page(p) => Some(PageData {
                    id: p.id,
                    name: p.name.clone(),
                    elements: self.elements_on(p.id).into_iter().cloned().collect(),
                }),
                _ => None,
            })
            .collect();
        DocumentData {
            pages,
            edit_mode: self.edit_mode,
        }
    }

    /// Rebuild from serialized data. Tables are normalized on the way in.
    pub fn from_data(data: DocumentData) -> Self {
        let mut doc = Document::new();
        doc.edit_mode = data.edit_mode;
        for page in data.pages {
            let page_idx = doc.insert_page(Page {
                id: page.id,
                name: page.name,
            });
            for element in page.elements {
                let element = match element {
                    Element::Table(t) => Element::Table(t.normalized()),
                    other => other,
                };
                let id = element.id();
                let idx = doc.graph.add_node(DocNode::Element(element));
                doc.graph.add_edge(page_idx, idx, ());
                doc.id_index.insert(id, idx);
            }
        }
        doc
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(&self.to_data())?)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let data: DocumentData = serde_json::from_str(json)?;
        Ok(Self::from_data(data))
    }

    /// Compact binary snapshot for the undo history.
    pub fn snapshot(&self) -> Result<Vec<u8>, DocumentError> {
        Ok(rmp_serde::to_vec_named(&self.to_data())?)
    }

    pub fn restore(bytes: &[u8]) -> Result<Self, DocumentError> {
        let data: DocumentData = rmp_serde::from_slice(bytes)?;
        Ok(Self::from_data(data))
    }
}
