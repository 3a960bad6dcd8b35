//! UPDATE builder.

use crate::block::{
    ConditionBlock, KeywordBlock, LimitBlock, OrderByBlock, SetFieldBlock, TableBlock,
    TableBlockKind,
};
use crate::error::QbResult;
use crate::expr::Arg;
use crate::options::Options;
use crate::query::{Query, StatementKind, render_pipeline};
use crate::render::{Block, RenderCtx};
use crate::sanitize::TableSource;
use crate::value::Value;
use std::sync::Arc;

/// `UPDATE table SET ... WHERE ... ORDER BY ... LIMIT ...`
#[derive(Clone, Debug)]
pub struct Update {
    options: Arc<Options>,
    nestable: bool,
    keyword: KeywordBlock,
    table: TableBlock,
    set: SetFieldBlock,
    where_block: ConditionBlock,
    order: OrderByBlock,
    limit: LimitBlock,
}

impl Update {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            nestable: false,
            keyword: KeywordBlock::new(options.clone(), "UPDATE"),
            table: TableBlock::new(options.clone(), TableBlockKind::Update),
            set: SetFieldBlock::new(options.clone()),
            where_block: ConditionBlock::where_(options.clone()),
            order: OrderByBlock::new(options.clone()),
            limit: LimitBlock::new(options.clone()),
            options,
        }
    }

    fn blocks(&self) -> [&dyn Block; 6] {
        [
            &self.keyword,
            &self.table,
            &self.set,
            &self.where_block,
            &self.order,
            &self.limit,
        ]
    }

    /// Allow this statement to be used as a sub-query.
    pub fn nestable(mut self, nestable: bool) -> Self {
        self.nestable = nestable;
        self
    }

    pub fn is_nestable(&self) -> bool {
        self.nestable
    }

    /// Set the table; a second call replaces the first.
    pub fn table(self, table: impl Into<TableSource>) -> QbResult<Self> {
        self.update_table(None, table, None)
    }

    pub fn table_as(self, table: impl Into<TableSource>, alias: &str) -> QbResult<Self> {
        self.update_table(None, table, Some(alias))
    }

    /// Set `schema.table alias` as the table to update.
    pub fn update_table(
        mut self,
        schema: Option<&str>,
        table: impl Into<TableSource>,
        alias: Option<&str>,
    ) -> QbResult<Self> {
        self.table.add_target(schema, table, alias)?;
        Ok(self)
    }

    /// `field = value`
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> QbResult<Self> {
        self.set.set(field, Arg::value(value))?;
        Ok(self)
    }

    /// `field = (SELECT ...)`
    pub fn set_query(mut self, field: &str, query: impl Into<Query>) -> QbResult<Self> {
        self.set.set(field, Arg::query(query))?;
        Ok(self)
    }

    pub fn set_fields<S, V, I>(mut self, fields: I) -> QbResult<Self>
    where
        S: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (S, V)>,
    {
        for (field, value) in fields {
            self.set.set(field.as_ref(), Arg::value(value))?;
        }
        Ok(self)
    }

    /// A hand-written assignment such as `visits = visits + 1`.
    pub fn set_raw(mut self, sql: &str) -> QbResult<Self> {
        self.set.set_raw(sql, Vec::new())?;
        Ok(self)
    }

    /// A hand-written assignment with bound arguments.
    pub fn set_raw_with(mut self, sql: &str, args: Vec<Arg>) -> QbResult<Self> {
        self.set.set_raw(sql, args)?;
        Ok(self)
    }

    impl_where_methods!(where_block);
    impl_order_methods!(order);
    impl_limit_methods!(limit);
    impl_render_methods!(StatementKind::Update);
}

impl Block for Update {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        render_pipeline(&self.blocks(), ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;

    fn opts() -> Arc<Options> {
        Arc::new(Options::default())
    }

    #[test]
    fn basic_update() {
        let q = Update::new(opts())
            .table("users")
            .unwrap()
            .set("name", "bob")
            .unwrap()
            .set_raw("visits = visits + 1")
            .unwrap()
            .where_(Expr::eq("id", 7i32))
            .limit(1);
        assert_eq!(
            q.to_sql().unwrap(),
            "UPDATE users SET name = 'bob', visits = visits + 1 WHERE (id = 7) LIMIT 1"
        );
        let p = q.to_param().unwrap();
        assert_eq!(
            p.text,
            "UPDATE users SET name = ?, visits = visits + 1 WHERE (id = ?) LIMIT ?"
        );
        assert_eq!(p.values.len(), 3);
    }

    #[test]
    fn missing_parts_are_incomplete() {
        let err = Update::new(opts()).set("a", 1i32).unwrap().to_sql().unwrap_err();
        assert!(err.is_incomplete());
        let err = Update::new(opts()).table("t").unwrap().to_param().unwrap_err();
        assert!(err.is_incomplete());
    }

    #[test]
    fn table_is_single_target() {
        let q = Update::new(opts())
            .table("a")
            .unwrap()
            .table("b")
            .unwrap()
            .set("x", 1i32)
            .unwrap();
        assert_eq!(q.to_sql().unwrap(), "UPDATE b SET x = 1");
    }

    #[test]
    fn sub_query_as_value() {
        let sub = crate::query::Select::new(opts())
            .field("max(id)")
            .unwrap()
            .from("other")
            .unwrap()
            .where_(Expr::eq("kind", "x"));
        let q = Update::new(opts())
            .table("t")
            .unwrap()
            .set_query("top", sub)
            .unwrap()
            .where_(Expr::eq("id", 1i32));
        let p = q.to_param().unwrap();
        assert_eq!(
            p.text,
            "UPDATE t SET top = (SELECT max(id) FROM other WHERE (kind = ?)) WHERE (id = ?)"
        );
        assert_eq!(p.values.len(), 2);
    }
}
