//! Product documents.
//!
//! The catalog has no business rules of its own: products are written once and
//! listed back. This crate only owns the document shape and input normalisation
//! (no IO, no HTTP, no storage).

pub mod product;

pub use product::{NewProduct, Product, parse_categories};
