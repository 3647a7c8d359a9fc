//! Data types shared across the extraction pipeline.

pub mod contact;
pub mod document;
pub mod record;
pub mod result;
pub mod schema;
