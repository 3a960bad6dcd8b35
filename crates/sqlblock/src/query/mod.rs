//! Statement builders.
//!
//! Each builder is a fixed pipeline of [`block`](crate::block)s sharing one
//! `Arc<Options>`. Mutators consume and return the builder:
//!
//! ```ignore
//! use sqlblock::{Expr, dialect};
//!
//! let q = dialect("postgres")?
//!     .select()
//!     .from_as("users", "u")?
//!     .left_join("orders", Some("o"), "o.user_id = u.id")?
//!     .where_(Expr::eq("u.status", "active"))
//!     .limit(10);
//!
//! let p = q.to_param()?;
//! // p.text:   SELECT * FROM users "u" LEFT JOIN orders "o" ON (o.user_id = u.id)
//! //           WHERE (u.status = $1) LIMIT $2
//! // p.values: ["active", 10]
//! ```

#[macro_use]
mod macros;

mod delete;
mod insert;
mod select;
mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use select::Select;
pub use update::Update;

use crate::error::{QbError, QbResult};
use crate::options::Options;
use crate::render::{
    Block, ParamQuery, RenderCtx, RenderMode, join_fragments, render_statement,
};
use std::fmt;

/// Statement kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any statement, as used for nesting.
#[derive(Clone, Debug)]
pub enum Query {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Query {
    pub fn kind(&self) -> StatementKind {
        match self {
            Query::Select(_) => StatementKind::Select,
            Query::Insert(_) => StatementKind::Insert,
            Query::Update(_) => StatementKind::Update,
            Query::Delete(_) => StatementKind::Delete,
        }
    }

    /// SELECT always nests; other kinds only when marked with `nestable(true)`.
    pub fn is_nestable(&self) -> bool {
        match self {
            Query::Select(_) => true,
            Query::Insert(q) => q.is_nestable(),
            Query::Update(q) => q.is_nestable(),
            Query::Delete(q) => q.is_nestable(),
        }
    }

    pub(crate) fn ensure_nestable(&self) -> QbResult<()> {
        if self.is_nestable() {
            Ok(())
        } else {
            Err(QbError::UnsupportedNesting(self.kind()))
        }
    }

    fn inner(&self) -> &dyn Block {
        match self {
            Query::Select(q) => q,
            Query::Insert(q) => q,
            Query::Update(q) => q,
            Query::Delete(q) => q,
        }
    }

    pub fn to_sql(&self) -> QbResult<String> {
        render_statement(self, self.kind(), RenderMode::Inline).map(|q| q.text)
    }

    pub fn to_param(&self) -> QbResult<ParamQuery> {
        render_statement(self, self.kind(), RenderMode::Param)
    }
}

impl Block for Query {
    fn options(&self) -> &Options {
        self.inner().options()
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        self.inner().render(ctx)
    }
}

macro_rules! impl_query_from {
    ($($t:ident),*) => {
        $(impl From<$t> for Query {
            fn from(query: $t) -> Self {
                Query::$t(query)
            }
        })*
    };
}

impl_query_from!(Select, Insert, Update, Delete);

/// Render blocks in order, dropping empty fragments.
pub(crate) fn render_pipeline(
    blocks: &[&dyn Block],
    ctx: &mut RenderCtx<'_>,
) -> QbResult<String> {
    let separator = &ctx.options().separator;
    let mut parts = Vec::with_capacity(blocks.len());
    for block in blocks {
        parts.push(block.render(ctx)?);
    }
    Ok(join_fragments(parts, separator))
}
