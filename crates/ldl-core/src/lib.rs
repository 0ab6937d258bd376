//! LDL Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Level Description
//! Language parser and loader. It includes:
//!
//! - **Identifiers**: Owned names and dotted class names ([`identifier::Id`])
//! - **Literals**: Constructor argument values ([`literal::Literal`])
//! - **Geometry**: Connector transforms and their composition ([`geometry`] module)
//! - **Entity**: The seam to game objects ([`entity::Entity`])
//! - **Registry**: Constructible class lookup ([`registry::ConstructibleRegistry`])

pub mod entity;
pub mod geometry;
pub mod identifier;
pub mod literal;
pub mod registry;
