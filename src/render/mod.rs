//! Chart rendering: interactive HTML and static PNG export.

pub mod html;
pub mod png;

pub use html::render_html_chart;
pub use png::write_png_chart;
