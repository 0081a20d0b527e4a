pub mod central_panel;
pub mod palette_panel;
pub mod tools_panel;

pub use central_panel::central_panel;
pub use palette_panel::palette_panel;
pub use tools_panel::tools_panel;
