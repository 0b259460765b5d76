//! docblocks - structured document editing
//!
//! Documents are trees of titled sections and subsections holding typed
//! content blocks (text, list, table, image). This crate provides the tree
//! model with its pure structural edits, the markdown table codec used by
//! table blocks, and a client for the document API that stores them.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]

pub mod api_client;
pub mod app_config;
pub mod chat_marker;
pub mod document_model;
pub mod edit;
pub mod image_refs;
pub mod markdown_exporter;
pub mod outline;
pub mod table_codec;

pub use document_model::{
    Block, BlockContainer, BlockKind, Direction, Document, NodeId, Section, Subsection,
};
pub use edit::{BlockParent, Edit, EditError};
pub use table_codec::{parse_markdown_table, serialize_to_markdown, TableData, TableEdit};
