pub mod history;
pub mod input;
pub mod selection;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use history::History;
pub use input::{InputEvent, Modifiers};
pub use selection::{NavKey, SelectionState, TableSel, TableSelection};
pub use session::{ClipboardPayload, EditorConfig, EditorSession};
pub use shortcuts::{ShortcutMap, TableAction};
pub use tools::{TableTool, ToolAction};
