//! Catalog read operations and the display rules layered over stored rows.

pub mod assembler;
pub mod rules;
pub mod service;

pub use assembler::ViewAssembler;
pub use rules::CatalogSettings;
pub use service::CatalogService;
