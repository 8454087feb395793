//! Common test utilities for codegraph-ifds
//!
//! Synthetic ICFGs plus two client problems: linear constant propagation
//! (IDE) and taint reachability (IFDS).

#![allow(dead_code)]

mod builders;
mod lca;
mod taint;

pub use builders::*;
pub use lca::*;
pub use taint::*;
