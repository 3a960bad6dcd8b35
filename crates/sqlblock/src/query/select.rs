//! SELECT builder.

use crate::block::{
    ConditionBlock, DistinctBlock, FieldsBlock, GroupByBlock, JoinBlock, KeywordBlock,
    LimitBlock, OffsetBlock, OrderByBlock, TableBlock, TableBlockKind, UnionBlock, UnionKind,
};
use crate::error::QbResult;
use crate::expr::IntoCondition;
use crate::options::Options;
use crate::query::{Query, StatementKind, render_pipeline};
use crate::render::{Block, RenderCtx};
use crate::sanitize::TableSource;
use std::sync::Arc;

/// `SELECT [DISTINCT] fields FROM ... JOIN ... WHERE ... GROUP BY ... HAVING ...
/// ORDER BY ... LIMIT ... OFFSET ... UNION ...`
#[derive(Clone, Debug)]
pub struct Select {
    options: Arc<Options>,
    keyword: KeywordBlock,
    distinct: DistinctBlock,
    fields: FieldsBlock,
    from: TableBlock,
    joins: JoinBlock,
    where_block: ConditionBlock,
    group: GroupByBlock,
    having: ConditionBlock,
    order: OrderByBlock,
    limit: LimitBlock,
    offset: OffsetBlock,
    unions: UnionBlock,
}

impl Select {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            keyword: KeywordBlock::new(options.clone(), "SELECT"),
            distinct: DistinctBlock::new(options.clone()),
            fields: FieldsBlock::new(options.clone()),
            from: TableBlock::new(options.clone(), TableBlockKind::From),
            joins: JoinBlock::new(options.clone()),
            where_block: ConditionBlock::where_(options.clone()),
            group: GroupByBlock::new(options.clone()),
            having: ConditionBlock::having(options.clone()),
            order: OrderByBlock::new(options.clone()),
            limit: LimitBlock::new(options.clone()),
            offset: OffsetBlock::new(options.clone()),
            unions: UnionBlock::new(options.clone()),
            options,
        }
    }

    fn blocks(&self) -> [&dyn Block; 12] {
        [
            &self.keyword,
            &self.distinct,
            &self.fields,
            &self.from,
            &self.joins,
            &self.where_block,
            &self.group,
            &self.having,
            &self.order,
            &self.limit,
            &self.offset,
            &self.unions,
        ]
    }

    pub fn distinct(mut self) -> Self {
        self.distinct.set(true);
        self
    }

    pub fn field(mut self, name: &str) -> QbResult<Self> {
        self.fields.add_field(name, None)?;
        Ok(self)
    }

    /// `name AS alias`
    pub fn field_as(mut self, name: &str, alias: &str) -> QbResult<Self> {
        self.fields.add_field(name, Some(alias))?;
        Ok(self)
    }

    pub fn fields<S: AsRef<str>>(mut self, names: &[S]) -> QbResult<Self> {
        for name in names {
            self.fields.add_field(name.as_ref(), None)?;
        }
        Ok(self)
    }

    /// `(SELECT ...) [AS alias]` as a column.
    pub fn field_query(mut self, query: impl Into<Query>, alias: Option<&str>) -> QbResult<Self> {
        self.fields.add_query(query, alias)?;
        Ok(self)
    }

    /// Add a FROM table, `schema.table` pair or sub-query.
    pub fn from(self, table: impl Into<TableSource>) -> QbResult<Self> {
        self.from_table(None, table, None)
    }

    pub fn from_as(self, table: impl Into<TableSource>, alias: &str) -> QbResult<Self> {
        self.from_table(None, table, Some(alias))
    }

    /// Add `schema.table alias` to FROM.
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

    pub fn group(mut self, field: &str) -> QbResult<Self> {
        self.group.add(field)?;
        Ok(self)
    }

    /// Add a HAVING condition. Multiple calls are joined with `AND`.
    pub fn having(mut self, condition: impl IntoCondition) -> Self {
        self.having.add(condition);
        self
    }

    impl_order_methods!(order);
    impl_limit_methods!(limit);

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset.set(Some(offset));
        self
    }

    pub fn clear_offset(mut self) -> Self {
        self.offset.set(None);
        self
    }

    /// `UNION (SELECT ...)`
    pub fn union(mut self, query: impl Into<Query>) -> QbResult<Self> {
        self.unions.add(UnionKind::Union, query)?;
        Ok(self)
    }

    /// `UNION ALL (SELECT ...)`
    pub fn union_all(mut self, query: impl Into<Query>) -> QbResult<Self> {
        self.unions.add(UnionKind::UnionAll, query)?;
        Ok(self)
    }

    impl_render_methods!(StatementKind::Select);
}

impl Block for Select {
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
    use crate::block::Direction;
    use crate::expr::Expr;
    use crate::value::Value;

    fn opts() -> Arc<Options> {
        Arc::new(Options::default())
    }

    #[test]
    fn bare_select_is_star() {
        assert_eq!(Select::new(opts()).to_sql().unwrap(), "SELECT *");
    }

    #[test]
    fn full_pipeline_order() {
        let q = Select::new(opts())
            .distinct()
            .fields(&["a", "b"])
            .unwrap()
            .from("t")
            .unwrap()
            .join("u", None, "u.id = t.u_id")
            .unwrap()
            .where_(Expr::gt("a", 1i32))
            .group("a")
            .unwrap()
            .having("count(*) > 1")
            .order("a", Some(Direction::Asc))
            .unwrap()
            .limit(5)
            .offset(10);
        assert_eq!(
            q.to_sql().unwrap(),
            "SELECT DISTINCT a, b FROM t INNER JOIN u ON (u.id = t.u_id) WHERE (a > 1) \
             GROUP BY a HAVING (count(*) > 1) ORDER BY a ASC LIMIT 5 OFFSET 10"
        );
        let p = q.to_param().unwrap();
        assert_eq!(
            p.text,
            "SELECT DISTINCT a, b FROM t INNER JOIN u ON (u.id = t.u_id) WHERE (a > ?) \
             GROUP BY a HAVING (count(*) > 1) ORDER BY a ASC LIMIT ? OFFSET ?"
        );
        assert_eq!(p.values, vec![Value::Int(1), Value::Int(5), Value::Int(10)]);
    }

    #[test]
    fn clear_limit_and_offset() {
        let q = Select::new(opts())
            .from("t")
            .unwrap()
            .limit(1)
            .offset(2)
            .clear_limit()
            .clear_offset();
        assert_eq!(q.to_sql().unwrap(), "SELECT * FROM t");
    }

    #[test]
    fn union_nests_each_part() {
        let other = Select::new(opts()).from("b").unwrap().where_(Expr::eq("x", 2i32));
        let q = Select::new(opts())
            .from("a")
            .unwrap()
            .where_(Expr::eq("x", 1i32))
            .union_all(other)
            .unwrap();
        let p = q.to_param().unwrap();
        assert_eq!(
            p.text,
            "SELECT * FROM a WHERE (x = ?) UNION ALL (SELECT * FROM b WHERE (x = ?))"
        );
        assert_eq!(p.values, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn custom_separator() {
        let options = Arc::new(Options::default().with_separator("\n"));
        let q = Select::new(options).from("t").unwrap().where_("a = 1");
        assert_eq!(q.to_sql().unwrap(), "SELECT\n*\nFROM t\nWHERE (a = 1)");
    }
}
