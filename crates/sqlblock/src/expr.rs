//! Conditions for WHERE / HAVING / JOIN ... ON.
//!
//! Blocks only see the [`Condition`] trait. Plain strings are conditions whose
//! text is used verbatim with no values. [`Expr`] is the structured
//! implementation shipped with the crate:
//!
//! - AND/OR/NOT grouping
//! - comparison operators (eq, ne, gt, lt, like, ...)
//! - `IN` lists and `IN (SELECT ...)` / `EXISTS (SELECT ...)` sub-queries
//! - `?` templates and raw SQL fragments
//!
//! Placeholders are produced while rendering, so an `Expr` can be reused across
//! statements and dialects.

use crate::error::QbResult;
use crate::query::{Query, Select};
use crate::render::RenderCtx;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A template argument: a bound value or a nested query.
#[derive(Clone, Debug)]
pub enum Arg {
    Value(Value),
    Query(Box<Query>),
}

impl Arg {
    pub fn value(value: impl Into<Value>) -> Self {
        Arg::Value(value.into())
    }

    pub fn query(query: impl Into<Query>) -> Self {
        Arg::Query(Box::new(query.into()))
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<Query> for Arg {
    fn from(query: Query) -> Self {
        Arg::Query(Box::new(query))
    }
}

impl From<Select> for Arg {
    fn from(query: Select) -> Self {
        Arg::Query(Box::new(Query::Select(query)))
    }
}

/// Anything that can render itself as a boolean SQL condition.
pub trait Condition: fmt::Debug + Send + Sync {
    /// Render the condition text, pushing any values into `ctx`.
    ///
    /// An empty result means "no condition"; blocks skip it.
    fn render_condition(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String>;
}

impl Condition for String {
    fn render_condition(&self, _ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        Ok(self.clone())
    }
}

/// Convert an input into a shared condition.
///
/// Empty strings convert to `None`, which is how a join without `ON` is spelled.
pub trait IntoCondition {
    fn into_condition(self) -> Option<Arc<dyn Condition>>;
}

impl IntoCondition for &str {
    fn into_condition(self) -> Option<Arc<dyn Condition>> {
        if self.is_empty() {
            None
        } else {
            Some(Arc::new(self.to_string()))
        }
    }
}

impl IntoCondition for String {
    fn into_condition(self) -> Option<Arc<dyn Condition>> {
        if self.is_empty() {
            None
        } else {
            Some(Arc::new(self))
        }
    }
}

impl IntoCondition for Expr {
    fn into_condition(self) -> Option<Arc<dyn Condition>> {
        Some(Arc::new(self))
    }
}

impl IntoCondition for Arc<dyn Condition> {
    fn into_condition(self) -> Option<Arc<dyn Condition>> {
        Some(self)
    }
}

impl<T: IntoCondition> IntoCondition for Option<T> {
    fn into_condition(self) -> Option<Arc<dyn Condition>> {
        self.and_then(IntoCondition::into_condition)
    }
}

/// Expression node for building WHERE/HAVING/ON conditions.
#[derive(Clone, Debug)]
pub enum Expr {
    /// AND group: all conditions must be true.
    And(Vec<Expr>),

    /// OR group: at least one condition must be true.
    Or(Vec<Expr>),

    /// NOT: negate the inner expression.
    Not(Box<Expr>),

    /// Simple comparison: column op value
    Compare {
        column: String,
        op: &'static str,
        value: Value,
    },

    /// NULL check: column IS NULL or column IS NOT NULL
    NullCheck { column: String, is_null: bool },

    /// IN list: column IN (v1, v2, ...) or column NOT IN (...)
    InList {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },

    /// IN sub-query: column IN (SELECT ...)
    InQuery {
        column: String,
        query: Box<Query>,
        negated: bool,
    },

    /// EXISTS (SELECT ...)
    Exists { query: Box<Query>, negated: bool },

    /// BETWEEN: column BETWEEN from AND to
    Between {
        column: String,
        from: Value,
        to: Value,
        negated: bool,
    },

    /// Template with parameter-character placeholders, one per argument.
    /// Example: `Template { sql: "a = ? OR b = ?", args: [1, 2] }`
    Template { sql: String, args: Vec<Arg> },

    /// Raw SQL fragment without parameters.
    Raw(String),

    /// Always true (used for empty NOT IN lists).
    True,

    /// Always false (used for empty IN lists).
    False,
}

impl Expr {
    pub fn and(exprs: Vec<Expr>) -> Self {
        Expr::And(exprs)
    }

    pub fn or(exprs: Vec<Expr>) -> Self {
        Expr::Or(exprs)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    fn compare(column: impl Into<String>, op: &'static str, value: impl Into<Value>) -> Self {
        Expr::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// column = value
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, "=", value)
    }

    /// column <> value
    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, "<>", value)
    }

    /// column > value
    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, ">", value)
    }

    /// column >= value
    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, ">=", value)
    }

    /// column < value
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, "<", value)
    }

    /// column <= value
    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, "<=", value)
    }

    /// column LIKE pattern
    pub fn like(column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::compare(column, "LIKE", pattern)
    }

    /// column NOT LIKE pattern
    pub fn not_like(column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::compare(column, "NOT LIKE", pattern)
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Expr::NullCheck {
            column: column.into(),
            is_null: true,
        }
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Expr::NullCheck {
            column: column.into(),
            is_null: false,
        }
    }

    /// column IN (values...); an empty list is always false.
    pub fn in_list<T: Into<Value>>(column: impl Into<String>, values: Vec<T>) -> Self {
        if values.is_empty() {
            return Expr::False;
        }
        Expr::InList {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    /// column NOT IN (values...); an empty list is always true.
    pub fn not_in<T: Into<Value>>(column: impl Into<String>, values: Vec<T>) -> Self {
        if values.is_empty() {
            return Expr::True;
        }
        Expr::InList {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    /// column IN (SELECT ...)
    pub fn in_query(column: impl Into<String>, query: impl Into<Query>) -> Self {
        Expr::InQuery {
            column: column.into(),
            query: Box::new(query.into()),
            negated: false,
        }
    }

    /// column NOT IN (SELECT ...)
    pub fn not_in_query(column: impl Into<String>, query: impl Into<Query>) -> Self {
        Expr::InQuery {
            column: column.into(),
            query: Box::new(query.into()),
            negated: true,
        }
    }

    /// EXISTS (SELECT ...)
    pub fn exists(query: impl Into<Query>) -> Self {
        Expr::Exists {
            query: Box::new(query.into()),
            negated: false,
        }
    }

    /// NOT EXISTS (SELECT ...)
    pub fn not_exists(query: impl Into<Query>) -> Self {
        Expr::Exists {
            query: Box::new(query.into()),
            negated: true,
        }
    }

    pub fn between(
        column: impl Into<String>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        Expr::Between {
            column: column.into(),
            from: from.into(),
            to: to.into(),
            negated: false,
        }
    }

    pub fn not_between(
        column: impl Into<String>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        Expr::Between {
            column: column.into(),
            from: from.into(),
            to: to.into(),
            negated: true,
        }
    }

    /// Template with one placeholder per argument.
    ///
    /// # Example
    /// ```ignore
    /// Expr::template("id IN ? OR owner = ?", vec![Arg::query(sub), Arg::value(7)])
    /// ```
    pub fn template(sql: impl Into<String>, args: Vec<Arg>) -> Self {
        Expr::Template {
            sql: sql.into(),
            args,
        }
    }

    /// Template whose arguments are all plain values.
    ///
    /// # Example
    /// ```ignore
    /// Expr::template_values("a = ? OR b = ?", vec![1i32, 2i32])
    /// ```
    pub fn template_values<T: Into<Value>>(sql: impl Into<String>, values: Vec<T>) -> Self {
        Expr::Template {
            sql: sql.into(),
            args: values.into_iter().map(Arg::value).collect(),
        }
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw(sql.into())
    }

    /// Check if this expression is empty (contains no conditions).
    pub fn is_empty(&self) -> bool {
        match self {
            Expr::And(exprs) | Expr::Or(exprs) => exprs.iter().all(Expr::is_empty),
            Expr::Not(inner) => inner.is_empty(),
            _ => false,
        }
    }

    /// Render the expression, pushing values into `ctx` as they appear.
    pub fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        Ok(match self {
            Expr::And(exprs) => render_group(exprs, " AND ", ctx)?,
            Expr::Or(exprs) => render_group(exprs, " OR ", ctx)?,
            Expr::Not(inner) => {
                let sql = inner.render(ctx)?;
                if sql.is_empty() {
                    String::new()
                } else {
                    format!("NOT ({sql})")
                }
            }
            Expr::Compare { column, op, value } => {
                format!("{} {} {}", column, op, ctx.push_value(value)?)
            }
            Expr::NullCheck { column, is_null } => {
                if *is_null {
                    format!("{column} IS NULL")
                } else {
                    format!("{column} IS NOT NULL")
                }
            }
            Expr::InList {
                column,
                values,
                negated,
            } => {
                if values.is_empty() {
                    return Ok(if *negated { "1=1" } else { "1=0" }.to_string());
                }
                let list = ctx.push_value(&Value::List(values.clone()))?;
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{column} {op} {list}")
            }
            Expr::InQuery {
                column,
                query,
                negated,
            } => {
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{} {} {}", column, op, ctx.push_nested(query)?)
            }
            Expr::Exists { query, negated } => {
                let op = if *negated { "NOT EXISTS" } else { "EXISTS" };
                format!("{} {}", op, ctx.push_nested(query)?)
            }
            Expr::Between {
                column,
                from,
                to,
                negated,
            } => {
                let low = ctx.push_value(from)?;
                let high = ctx.push_value(to)?;
                let op = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                format!("{column} {op} {low} AND {high}")
            }
            Expr::Template { sql, args } => ctx.push_template(sql, args)?,
            Expr::Raw(sql) => sql.clone(),
            Expr::True => "1=1".to_string(),
            Expr::False => "1=0".to_string(),
        })
    }
}

fn render_group(exprs: &[Expr], joiner: &str, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
    let mut parts = Vec::with_capacity(exprs.len());
    for e in exprs.iter().filter(|e| !e.is_empty()) {
        let sql = e.render(ctx)?;
        if sql.is_empty() {
            continue;
        }
        // Parenthesize nested groups so precedence survives.
        if matches!(e, Expr::And(_) | Expr::Or(_)) {
            parts.push(format!("({sql})"));
        } else {
            parts.push(sql);
        }
    }
    Ok(parts.join(joiner))
}

impl Condition for Expr {
    fn render_condition(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        self.render(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::render::RenderMode;

    fn param(expr: &Expr) -> (String, Vec<Value>) {
        let opts = Options::default().with_numbered_parameters("$");
        let mut ctx = RenderCtx::new(&opts, RenderMode::Param);
        let sql = expr.render(&mut ctx).unwrap();
        (sql, ctx.into_values())
    }

    fn inline(expr: &Expr) -> String {
        let opts = Options::default();
        let mut ctx = RenderCtx::new(&opts, RenderMode::Inline);
        expr.render(&mut ctx).unwrap()
    }

    #[test]
    fn test_simple_eq() {
        let (sql, values) = param(&Expr::eq("name", "alice"));
        assert_eq!(sql, "name = $1");
        assert_eq!(values.len(), 1);
        assert_eq!(inline(&Expr::eq("name", "alice")), "name = 'alice'");
    }

    #[test]
    fn test_nested_and_or() {
        let expr = Expr::and(vec![
            Expr::eq("status", "active"),
            Expr::or(vec![Expr::eq("role", "admin"), Expr::eq("role", "superuser")]),
        ]);
        let (sql, values) = param(&expr);
        assert_eq!(sql, "status = $1 AND (role = $2 OR role = $3)");
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_in_list() {
        let (sql, values) = param(&Expr::in_list("id", vec![1i32, 2, 3]));
        assert_eq!(sql, "id IN ($1, $2, $3)");
        assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(inline(&Expr::in_list("id", vec![1i32, 2])), "id IN (1, 2)");
    }

    #[test]
    fn test_empty_in_lists() {
        assert_eq!(param(&Expr::in_list::<i32>("id", vec![])).0, "1=0");
        assert_eq!(param(&Expr::not_in::<i32>("id", vec![])).0, "1=1");
    }

    #[test]
    fn test_between_and_not() {
        let (sql, _) = param(&Expr::between("age", 18i32, 65i32));
        assert_eq!(sql, "age BETWEEN $1 AND $2");
        let (sql, _) = param(&Expr::not(Expr::eq("banned", true)));
        assert_eq!(sql, "NOT (banned = $1)");
    }

    #[test]
    fn test_template() {
        let (sql, values) = param(&Expr::template_values("a = ? OR b = ?", vec![1i32, 2i32]));
        assert_eq!(sql, "a = $1 OR b = $2");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_null_check_and_raw() {
        assert_eq!(inline(&Expr::is_null("deleted_at")), "deleted_at IS NULL");
        assert_eq!(inline(&Expr::raw("a.id = b.a_id")), "a.id = b.a_id");
    }

    #[test]
    fn test_empty_groups() {
        let expr = Expr::and(vec![Expr::or(vec![]), Expr::and(vec![])]);
        assert!(expr.is_empty());
        assert_eq!(param(&expr).0, "");
    }

    #[test]
    fn into_condition_treats_empty_text_as_none() {
        assert!("".into_condition().is_none());
        assert!("a = b".into_condition().is_some());
        assert!(None::<Expr>.into_condition().is_none());
    }
}
