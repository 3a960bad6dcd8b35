//! Clause blocks.
//!
//! Each statement is a fixed pipeline of these. A block owns the data for one
//! clause, validates it when it is added, and renders it through
//! [`Block::render`](crate::Block::render).

mod condition;
mod fields;
mod insert;
mod join;
mod limit;
mod order;
mod set;
mod table;
mod union;

pub use condition::ConditionBlock;
pub use fields::{FieldsBlock, GroupByBlock};
pub use insert::{InsertFromQueryBlock, InsertValuesBlock};
pub use join::{JoinBlock, JoinClause, JoinKind};
pub use limit::{LimitBlock, OffsetBlock};
pub use order::{Direction, OrderByBlock};
pub use set::SetFieldBlock;
pub use table::{TableBlock, TableBlockKind, TableRef, TargetList};
pub use union::{UnionBlock, UnionKind};

use crate::error::QbResult;
use crate::options::Options;
use crate::render::{Block, RenderCtx};
use std::sync::Arc;

/// A fixed keyword such as `SELECT` or `DELETE`.
#[derive(Clone, Debug)]
pub struct KeywordBlock {
    options: Arc<Options>,
    keyword: &'static str,
}

impl KeywordBlock {
    pub fn new(options: Arc<Options>, keyword: &'static str) -> Self {
        Self { options, keyword }
    }
}

impl Block for KeywordBlock {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, _ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        Ok(self.keyword.to_string())
    }
}

/// `DISTINCT`, when enabled.
#[derive(Clone, Debug)]
pub struct DistinctBlock {
    options: Arc<Options>,
    enabled: bool,
}

impl DistinctBlock {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            options,
            enabled: false,
        }
    }

    pub fn set(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl Block for DistinctBlock {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, _ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        Ok(if self.enabled {
            "DISTINCT".to_string()
        } else {
            String::new()
        })
    }
}
