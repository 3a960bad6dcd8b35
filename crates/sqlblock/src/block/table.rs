//! FROM / UPDATE / INTO / DELETE-target blocks.
//!
//! All four share [`TargetList`]; a [`TableBlockKind`] tag fixes the keyword,
//! whether only one target may exist, whether a target is required, and
//! whether nested queries are accepted.

use crate::error::{QbError, QbResult};
use crate::options::Options;
use crate::render::{Block, RenderCtx};
use crate::sanitize::{Sanitized, TableSource, sanitize_table_alias, sanitize_table_source};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableBlockKind {
    /// `FROM a, b`
    From,
    /// The table of `UPDATE t SET ...`
    Update,
    /// `INTO t`
    Into,
    /// The target list of `DELETE t1, t2 FROM ...`
    Target,
}

impl TableBlockKind {
    fn keyword(self) -> Option<&'static str> {
        match self {
            TableBlockKind::From => Some("FROM"),
            TableBlockKind::Into => Some("INTO"),
            TableBlockKind::Update | TableBlockKind::Target => None,
        }
    }

    fn single_target(self) -> bool {
        matches!(self, TableBlockKind::Update | TableBlockKind::Into)
    }

    fn required(self) -> bool {
        matches!(self, TableBlockKind::Update | TableBlockKind::Into)
    }

    fn allows_nested(self) -> bool {
        matches!(self, TableBlockKind::From)
    }

    fn allows_alias(self) -> bool {
        !matches!(self, TableBlockKind::Into | TableBlockKind::Target)
    }
}

/// One sanitized table reference.
#[derive(Clone, Debug)]
pub struct TableRef {
    name: Sanitized,
    alias: Option<String>,
}

impl TableRef {
    pub(crate) fn resolve(
        options: &Options,
        schema: Option<&str>,
        source: TableSource,
        alias: Option<&str>,
        allow_nested: bool,
    ) -> QbResult<Self> {
        let source = source.with_schema(schema)?;
        let name = sanitize_table_source(source, allow_nested, options)?;
        let alias = alias
            .map(|a| sanitize_table_alias(a, options))
            .transpose()?;
        Ok(Self { name, alias })
    }

    pub fn is_nested(&self) -> bool {
        matches!(self.name, Sanitized::Nested(_))
    }

    /// `name[ alias]`, with nested queries rendered into `ctx`.
    pub(crate) fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        let name = match &self.name {
            Sanitized::Name(name) => name.clone(),
            Sanitized::Nested(query) => ctx.push_nested(query)?,
        };
        Ok(match &self.alias {
            Some(alias) => format!("{name} {alias}"),
            None => name,
        })
    }
}

/// Ordered table references.
///
/// In single-target mode each push replaces whatever was there.
#[derive(Clone, Debug, Default)]
pub struct TargetList {
    refs: Vec<TableRef>,
    single: bool,
}

impl TargetList {
    pub fn new(single: bool) -> Self {
        Self {
            refs: Vec::new(),
            single,
        }
    }

    pub fn push(&mut self, table: TableRef) {
        if self.single {
            self.refs.clear();
        }
        self.refs.push(table);
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableRef> {
        self.refs.iter()
    }

    pub(crate) fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        let mut parts = Vec::with_capacity(self.refs.len());
        for table in &self.refs {
            parts.push(table.render(ctx)?);
        }
        Ok(parts.join(", "))
    }
}

/// A block naming the table(s) a statement works on.
#[derive(Clone, Debug)]
pub struct TableBlock {
    options: Arc<Options>,
    kind: TableBlockKind,
    targets: TargetList,
}

impl TableBlock {
    pub fn new(options: Arc<Options>, kind: TableBlockKind) -> Self {
        Self {
            options,
            kind,
            targets: TargetList::new(kind.single_target()),
        }
    }

    /// A FROM block holding at most one table (single-table DELETE).
    pub fn single_from(options: Arc<Options>) -> Self {
        Self {
            options,
            kind: TableBlockKind::From,
            targets: TargetList::new(true),
        }
    }

    pub fn kind(&self) -> TableBlockKind {
        self.kind
    }

    pub fn targets(&self) -> &TargetList {
        &self.targets
    }

    /// Append `schema.name alias`, validating every part now.
    pub fn add_target(
        &mut self,
        schema: Option<&str>,
        name: impl Into<TableSource>,
        alias: Option<&str>,
    ) -> QbResult<()> {
        if alias.is_some() && !self.kind.allows_alias() {
            return Err(QbError::invalid(format!(
                "{:?} tables do not take an alias",
                self.kind
            )));
        }
        let table = TableRef::resolve(
            &self.options,
            schema,
            name.into(),
            alias,
            self.kind.allows_nested(),
        )?;
        self.targets.push(table);
        Ok(())
    }
}

impl Block for TableBlock {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        if self.targets.is_empty() {
            if self.kind.required() {
                return Err(QbError::incomplete(match self.kind {
                    TableBlockKind::Into => "INSERT requires a table: call into() first",
                    _ => "UPDATE requires a table: call table() first",
                }));
            }
            return Ok(String::new());
        }
        let list = self.targets.render(ctx)?;
        Ok(match self.kind.keyword() {
            Some(keyword) => format!("{keyword} {list}"),
            None => list,
        })
    }
}
