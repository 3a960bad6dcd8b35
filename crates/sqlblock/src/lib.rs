//! # sqlblock
//!
//! A composable SQL statement builder.
//!
//! ## Features
//!
//! - **Block pipelines**: every statement is a fixed sequence of clause blocks
//! - **Dual rendering**: `to_sql()` inlines literals, `to_param()` returns text plus values
//! - **Nesting**: sub-queries as FROM/JOIN targets, fields, conditions and SET values
//! - **Correct numbering**: `$1, $2, ...` follow textual order across any depth of nesting
//! - **Dialects**: quoting, placeholders and value handlers bundled per name
//!
//! ## Example
//!
//! ```ignore
//! use sqlblock::{Expr, dialect};
//!
//! let hdb = dialect("hdb")?;
//!
//! let q = hdb
//!     .select()
//!     .from_table(Some("app"), "users", Some("u"))?
//!     .left_join("orders", Some("o"), "\"o\".\"user_id\" = \"u\".\"id\"")?
//!     .where_(Expr::eq("\"u\".\"status\"", "active"));
//!
//! q.to_sql()?;
//! // SELECT * FROM "app"."users" "u" LEFT JOIN "orders" "o"
//! //   ON ("o"."user_id" = "u"."id") WHERE ("u"."status" = 'active')
//!
//! let p = q.to_param()?;
//! // p.text   = ... WHERE ("u"."status" = ?)
//! // p.values = [Text("active")]
//!
//! // INSERT
//! sqlblock::insert().into("users")?.set("name", "alice")?.to_param()?;
//!
//! // UPDATE
//! sqlblock::update()
//!     .table("users")?
//!     .set("status", "inactive")?
//!     .where_(Expr::eq("id", 7))
//!     .to_param()?;
//!
//! // DELETE
//! sqlblock::delete().from("users")?.where_(Expr::eq("id", 7)).to_param()?;
//! ```
//!
//! Render events are logged with `tracing` at `debug` level on the
//! `sqlblock.render` target; registry changes on `sqlblock.dialect`.

pub mod block;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod options;
pub mod query;
pub mod render;
pub mod sanitize;
pub mod value;

pub use dialect::{
    DEFAULT_DIALECT, Dialect, default_dialect, delete, dialect, dialect_names, insert,
    register_dialect, select, update,
};
pub use error::{QbError, QbResult};
pub use expr::{Arg, Condition, Expr, IntoCondition};
pub use options::Options;
pub use query::{Delete, Insert, Query, Select, StatementKind, Update};
pub use render::{Block, ParamQuery, RenderCtx, RenderMode};
pub use sanitize::{TableSource, quote_identifier};
pub use value::{CustomValue, HandlerOutput, Value, ValueHandlerFn, ValueHandlers};

pub use block::{Direction, JoinKind};
