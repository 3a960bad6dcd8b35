//! DELETE builder.

use crate::block::{
    ConditionBlock, JoinBlock, KeywordBlock, LimitBlock, OrderByBlock, TableBlock, TableBlockKind,
};
use crate::error::QbResult;
use crate::options::Options;
use crate::query::{StatementKind, render_pipeline};
use crate::render::{Block, RenderCtx};
use crate::sanitize::TableSource;
use std::sync::Arc;

/// `DELETE [targets] FROM table JOIN ... WHERE ... ORDER BY ... LIMIT ...`
#[derive(Clone, Debug)]
pub struct Delete {
    options: Arc<Options>,
    nestable: bool,
    keyword: KeywordBlock,
    targets: TableBlock,
    from: TableBlock,
    joins: JoinBlock,
    where_block: ConditionBlock,
    order: OrderByBlock,
    limit: LimitBlock,
}

impl Delete {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            nestable: false,
            keyword: KeywordBlock::new(options.clone(), "DELETE"),
            targets: TableBlock::new(options.clone(), TableBlockKind::Target),
            from: TableBlock::single_from(options.clone()),
            joins: JoinBlock::new(options.clone()),
            where_block: ConditionBlock::where_(options.clone()),
            order: OrderByBlock::new(options.clone()),
            limit: LimitBlock::new(options.clone()),
            options,
        }
    }

    fn blocks(&self) -> [&dyn Block; 7] {
        [
            &self.keyword,
            &self.targets,
            &self.from,
            &self.joins,
            &self.where_block,
            &self.order,
            &self.limit,
        ]
    }

    pub fn nestable(mut self, nestable: bool) -> Self {
        self.nestable = nestable;
        self
    }

    pub fn is_nestable(&self) -> bool {
        self.nestable
    }

    /// Name a table to delete from in a multi-table DELETE (`DELETE a, b FROM ...`).
    pub fn target(mut self, table: &str) -> QbResult<Self> {
        self.targets.add_target(None, table, None)?;
        Ok(self)
    }

    /// Set the FROM table; a second call replaces the first.
    pub fn from(self, table: impl Into<TableSource>) -> QbResult<Self> {
        self.from_table(None, table, None)
    }

    pub fn from_as(self, table: impl Into<TableSource>, alias: &str) -> QbResult<Self> {
        self.from_table(None, table, Some(alias))
    }

    pub fn from_table(
        mut self,
        schema: Option<&str>,
        table: impl Into<TableSource>,
        alias: Option<&str>,
    ) -> QbResult<Self> {
        self.from.add_target(schema, table, alias)?;
        Ok(self)
    }

    impl_join_methods!(joins);
    impl_where_methods!(where_block);
    impl_order_methods!(order);
    impl_limit_methods!(limit);
    impl_render_methods!(StatementKind::Delete);
}

impl Block for Delete {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        render_pipeline(&self.blocks(), ctx)
    }
}
