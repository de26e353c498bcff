//! Tessera Core Types and Definitions
//!
//! This crate provides the foundational types of the Tessera block diagram
//! language. It includes:
//!
//! - **Identifiers**: Cheaply clonable block identifiers ([`identifier::Id`])
//! - **Colors**: CSS color parsing for style declarations ([`color::Color`])
//! - **Geometry**: Points, sizes and bounds ([`geometry`] module)
//! - **Shapes**: Shape kinds with sizing and boundary intersection ([`shape`] module)
//! - **Text**: Label measurement ([`text`] module)
//! - **Semantic**: The document model produced by the parser ([`semantic`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod semantic;
pub mod shape;
pub mod text;
