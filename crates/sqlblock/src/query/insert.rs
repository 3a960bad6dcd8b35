//! INSERT builder.

use crate::block::{
    InsertFromQueryBlock, InsertValuesBlock, KeywordBlock, TableBlock, TableBlockKind,
};
use crate::error::{QbError, QbResult};
use crate::expr::Arg;
use crate::options::Options;
use crate::query::{Query, StatementKind, render_pipeline};
use crate::render::{Block, RenderCtx};
use crate::sanitize::TableSource;
use crate::value::Value;
use std::sync::Arc;

/// `INSERT INTO table (a, b) VALUES (...), (...)` or
/// `INSERT INTO table (a, b) (SELECT ...)`.
///
/// Values and a source query are exclusive; setting one clears the other.
#[derive(Clone, Debug)]
pub struct Insert {
    options: Arc<Options>,
    nestable: bool,
    keyword: KeywordBlock,
    into: TableBlock,
    values: InsertValuesBlock,
    from_query: InsertFromQueryBlock,
}

impl Insert {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            nestable: false,
            keyword: KeywordBlock::new(options.clone(), "INSERT"),
            into: TableBlock::new(options.clone(), TableBlockKind::Into),
            values: InsertValuesBlock::new(options.clone()),
            from_query: InsertFromQueryBlock::new(options.clone()),
            options,
        }
    }

    fn blocks(&self) -> [&dyn Block; 4] {
        [&self.keyword, &self.into, &self.values, &self.from_query]
    }

    pub fn nestable(mut self, nestable: bool) -> Self {
        self.nestable = nestable;
        self
    }

    pub fn is_nestable(&self) -> bool {
        self.nestable
    }

    /// Set the target table; a second call replaces the first.
    pub fn into(self, table: impl Into<TableSource>) -> QbResult<Self> {
        self.into_table(None, table)
    }

    /// Set `schema.table` as the target.
    pub fn into_table(mut self, schema: Option<&str>, table: impl Into<TableSource>) -> QbResult<Self> {
        self.into.add_target(schema, table, None)?;
        Ok(self)
    }

    /// Set `field` to `value` in every row.
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> QbResult<Self> {
        self.values.set(field, Arg::value(value))?;
        self.from_query = InsertFromQueryBlock::new(self.options.clone());
        Ok(self)
    }

    /// Set `field` to a sub-query result in every row.
    pub fn set_query(mut self, field: &str, query: impl Into<Query>) -> QbResult<Self> {
        self.values.set(field, Arg::query(query))?;
        self.from_query = InsertFromQueryBlock::new(self.options.clone());
        Ok(self)
    }

    pub fn set_fields<S, V, I>(mut self, fields: I) -> QbResult<Self>
    where
        S: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (S, V)>,
    {
        for (field, value) in fields {
            self.values.set(field.as_ref(), Arg::value(value))?;
        }
        self.from_query = InsertFromQueryBlock::new(self.options.clone());
        Ok(self)
    }

    /// Insert several rows at once, replacing any values set before.
    ///
    /// Every row must carry the same fields.
    pub fn set_fields_rows<S, V>(mut self, rows: Vec<Vec<(S, V)>>) -> QbResult<Self>
    where
        S: AsRef<str>,
        V: Into<Value>,
    {
        let rows: Vec<Vec<(S, Arg)>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(field, value)| (field, Arg::value(value)))
                    .collect()
            })
            .collect();
        self.values.set_rows(rows)?;
        self.from_query = InsertFromQueryBlock::new(self.options.clone());
        Ok(self)
    }

    /// `INSERT INTO t (fields) (SELECT ...)`, replacing any values set before.
    pub fn from_query<S: AsRef<str>>(
        mut self,
        fields: &[S],
        query: impl Into<Query>,
    ) -> QbResult<Self> {
        self.from_query.set(fields, query)?;
        self.values = InsertValuesBlock::new(self.options.clone());
        Ok(self)
    }

    impl_render_methods!(StatementKind::Insert);
}

impl Block for Insert {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        if self.values.is_empty() && self.from_query.is_empty() {
            return Err(QbError::incomplete(
                "INSERT requires values: call set() or from_query() first",
            ));
        }
        render_pipeline(&self.blocks(), ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Select;

    fn opts() -> Arc<Options> {
        Arc::new(Options::default())
    }

    #[test]
    fn single_row() {
        let q = Insert::new(opts())
            .into("users")
            .unwrap()
            .set("name", "ann")
            .unwrap()
            .set("age", 30i32)
            .unwrap();
        assert_eq!(
            q.to_sql().unwrap(),
            "INSERT INTO users (name, age) VALUES ('ann', 30)"
        );
        let p = q.to_param().unwrap();
        assert_eq!(p.text, "INSERT INTO users (name, age) VALUES (?, ?)");
        assert_eq!(p.values.len(), 2);
    }

    #[test]
    fn multiple_rows() {
        let q = Insert::new(opts())
            .into("t")
            .unwrap()
            .set_fields_rows(vec![
                vec![("a", 1i32), ("b", 2i32)],
                vec![("a", 3i32), ("b", 4i32)],
            ])
            .unwrap();
        assert_eq!(
            q.to_sql().unwrap(),
            "INSERT INTO t (a, b) VALUES (1, 2), (3, 4)"
        );
    }

    #[test]
    fn incomplete_inserts() {
        let err = Insert::new(opts()).into("t").unwrap().to_sql().unwrap_err();
        assert!(err.is_incomplete());
        let err = Insert::new(opts()).set("a", 1i32).unwrap().to_sql().unwrap_err();
        assert!(err.is_incomplete());
    }

    #[test]
    fn insert_select() {
        let select = Select::new(opts())
            .fields(&["a", "b"])
            .unwrap()
            .from("src")
            .unwrap()
            .where_(crate::Expr::eq("ok", true));
        let q = Insert::new(opts())
            .into("dst")
            .unwrap()
            .set("z", 1i32)
            .unwrap()
            .from_query(&["a", "b"], select)
            .unwrap();
        let p = q.to_param().unwrap();
        assert_eq!(
            p.text,
            "INSERT INTO dst (a, b) (SELECT a, b FROM src WHERE (ok = ?))"
        );
        assert_eq!(p.values, vec![Value::Bool(true)]);
    }
}
