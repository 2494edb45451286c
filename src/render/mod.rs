//! Rendering stage: YAML style/header files, resume layout and `.docx` output.

pub mod document;
pub mod docx;
pub mod header;
pub mod resume;
pub mod style;

pub use document::Document;
pub use header::Header;
pub use resume::ResumeLayout;
pub use style::Formatting;
