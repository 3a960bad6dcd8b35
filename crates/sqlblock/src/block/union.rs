//! UNION / UNION ALL of nested selects.

use crate::error::QbResult;
use crate::options::Options;
use crate::query::Query;
use crate::render::{Block, RenderCtx};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnionKind {
    Union,
    UnionAll,
}

impl UnionKind {
    pub fn as_sql(self) -> &'static str {
        match self {
            UnionKind::Union => "UNION",
            UnionKind::UnionAll => "UNION ALL",
        }
    }
}

/// Trailing `UNION (SELECT ...)` parts of a SELECT.
#[derive(Clone, Debug)]
pub struct UnionBlock {
    options: Arc<Options>,
    unions: Vec<(UnionKind, Box<Query>)>,
}

impl UnionBlock {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            options,
            unions: Vec::new(),
        }
    }

    pub fn add(&mut self, kind: UnionKind, query: impl Into<Query>) -> QbResult<()> {
        let query = query.into();
        query.ensure_nestable()?;
        self.unions.push((kind, Box::new(query)));
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.unions.is_empty()
    }
}

impl Block for UnionBlock {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        let mut parts = Vec::with_capacity(self.unions.len());
        for (kind, query) in &self.unions {
            parts.push(format!("{} {}", kind.as_sql(), ctx.push_nested(query)?));
        }
        Ok(parts.join(" "))
    }
}
