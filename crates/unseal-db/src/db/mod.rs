pub mod document;
pub mod purchase;
