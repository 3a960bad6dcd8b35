//! JOIN clauses, rendered in insertion order.

use crate::error::QbResult;
use crate::expr::{Condition, IntoCondition};
use crate::options::Options;
use crate::render::{Block, RenderCtx};
use crate::sanitize::TableSource;
use std::fmt;
use std::sync::Arc;

use super::table::TableRef;

/// Join flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Outer,
    LeftOuter,
    Full,
    Cross,
}

impl JoinKind {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Outer => "OUTER",
            JoinKind::LeftOuter => "LEFT OUTER",
            JoinKind::Full => "FULL",
            JoinKind::Cross => "CROSS",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One `<KIND> JOIN target [alias] [ON (cond)]` entry.
#[derive(Clone, Debug)]
pub struct JoinClause {
    kind: JoinKind,
    target: TableRef,
    condition: Option<Arc<dyn Condition>>,
}

impl JoinClause {
    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    pub fn has_condition(&self) -> bool {
        self.condition.is_some()
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        // Target first: its values precede the condition's in the text.
        let target = self.target.render(ctx)?;
        let mut sql = format!("{} JOIN {}", self.kind.as_sql(), target);
        if let Some(condition) = &self.condition {
            let cond = condition.render_condition(ctx)?;
            if !cond.is_empty() {
                sql.push_str(" ON (");
                sql.push_str(&cond);
                sql.push(')');
            }
        }
        Ok(sql)
    }
}

/// Ordered join clauses.
#[derive(Clone, Debug)]
pub struct JoinBlock {
    options: Arc<Options>,
    joins: Vec<JoinClause>,
}

impl JoinBlock {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            options,
            joins: Vec::new(),
        }
    }

    /// Append a join. Table and alias are validated now; nested targets are
    /// allowed when the query kind is nestable.
    pub fn add_join(
        &mut self,
        kind: JoinKind,
        target: impl Into<TableSource>,
        alias: Option<&str>,
        condition: impl IntoCondition,
    ) -> QbResult<()> {
        let target = TableRef::resolve(&self.options, None, target.into(), alias, true)?;
        self.joins.push(JoinClause {
            kind,
            target,
            condition: condition.into_condition(),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    pub fn clauses(&self) -> &[JoinClause] {
        &self.joins
    }
}

impl Block for JoinBlock {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        let mut parts = Vec::with_capacity(self.joins.len());
        for join in &self.joins {
            parts.push(join.render(ctx)?);
        }
        Ok(parts.join(" "))
    }
}
