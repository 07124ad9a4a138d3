pub mod repositories;
pub mod templates;
