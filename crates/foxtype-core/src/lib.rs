//! foxtype Core Library
//!
//! This library turns the schemas and endpoints of an Apifox shared doc into
//! TypeScript declarations (`schema.d.ts`, `paths.d.ts`) and request
//! functions (`services.ts`).

pub mod builders;
pub mod config;
pub mod error;
pub mod generate;
pub mod model;
pub mod naming;
pub mod registry;
pub mod render;
pub mod resolver;
pub mod schema;
pub mod source;
pub mod tree;
pub mod utils;

pub use crate::{
    config::Config,
    error::{Error, Result},
    generate::{GeneratedFiles, GenerationReport, Generator, SkippedEndpoint},
    source::{save_snapshot, DocumentSource, HttpSource, SnapshotSource},
};
