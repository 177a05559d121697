pub mod page_model;
pub mod terminal_view;

pub use page_model::{DashboardView, Element, PageModel, Slot};
pub use terminal_view::{RenderMode, TerminalView};
