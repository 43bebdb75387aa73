//! hashmark-core: Markdown-style block triggers without framework dependencies.
//!
//! This crate provides:
//! - `TriggerTable` - ordered line-start patterns (`# `, `## `, ..., `. `)
//! - `BlockConverter` - resolves the block under the caret and swaps it for
//!   the element its trigger asks for
//! - `DocumentTree` / `CaretPlatform` traits for the host document
//! - `MemoryDocument` - arena-backed host for tests and headless use
//! - `Debouncer`, `DemoPlayer`, `BlinkingCursor` - timing-free state the
//!   browser layer drives with real timers

pub mod config;
pub mod convert;
pub mod cursor;
pub mod debounce;
pub mod demo;
pub mod memory;
pub mod platform;
pub mod tag;
pub mod trigger;

pub use config::EditorConfig;
pub use convert::BlockConverter;
pub use cursor::{BlinkingCursor, caret_to_last_block};
pub use debounce::Debouncer;
pub use demo::{DemoLine, DemoPhase, DemoPlayer, DemoTick};
pub use memory::{MemoryDocument, NodeId};
pub use platform::{CaretPlatform, CaretTarget, DocumentTree, EditorHost, HostError, NodeKind};
pub use smol_str::SmolStr;
pub use tag::BlockTag;
pub use trigger::{TriggerRule, TriggerTable};
