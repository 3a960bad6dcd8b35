//! Named option bundles.
//!
//! A process-wide registry maps dialect names to frozen [`Options`]. It is
//! seeded on first use with:
//!
//! | name | names quoted with | auto quote | placeholders |
//! |---|---|---|---|
//! | `default`, `mysql` | `` ` `` | no | `?` |
//! | `postgres` | `"` | no | `$1, $2, ...` |
//! | `mssql` | `[...]` | no | `@1, @2, ...` |
//! | `hdb` | `"` | tables and fields | `?` |
//!
//! Register custom dialects at startup:
//!
//! ```ignore
//! sqlblock::register_dialect("sqlite", |o| {
//!     o.name_quote_character = "\"".into();
//!     o.auto_quote_table_names = true;
//! });
//! let q = sqlblock::dialect("sqlite")?.select().from("t")?;
//! ```

use crate::error::{QbError, QbResult};
use crate::options::Options;
use crate::query::{Delete, Insert, Select, Update};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

pub const DEFAULT_DIALECT: &str = "default";

static REGISTRY: LazyLock<RwLock<HashMap<String, Arc<Options>>>> =
    LazyLock::new(|| RwLock::new(builtin_dialects()));

fn builtin_dialects() -> HashMap<String, Arc<Options>> {
    let mut map = HashMap::new();
    map.insert(DEFAULT_DIALECT.to_string(), Arc::new(Options::default()));
    map.insert("mysql".to_string(), Arc::new(Options::default()));
    map.insert(
        "postgres".to_string(),
        Arc::new(
            Options::default()
                .with_quote_character("\"")
                .with_numbered_parameters("$"),
        ),
    );
    map.insert(
        "mssql".to_string(),
        Arc::new(
            Options::default()
                .with_quote_character("[]")
                .with_numbered_parameters("@")
                .with_replace_single_quotes(true),
        ),
    );
    let mut hdb = Options::default().with_quote_character("\"");
    hdb.auto_quote_table_names = true;
    hdb.auto_quote_field_names = true;
    hdb.auto_quote_alias_names = true;
    map.insert("hdb".to_string(), Arc::new(hdb));
    map
}

/// A named, immutable option bundle and the builders that use it.
#[derive(Clone, Debug)]
pub struct Dialect {
    name: String,
    options: Arc<Options>,
}

impl Dialect {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn select(&self) -> Select {
        Select::new(self.options.clone())
    }

    pub fn insert(&self) -> Insert {
        Insert::new(self.options.clone())
    }

    pub fn update(&self) -> Update {
        Update::new(self.options.clone())
    }

    pub fn delete(&self) -> Delete {
        Delete::new(self.options.clone())
    }

    /// A SELECT with this dialect's options adjusted for one builder.
    pub fn select_with(&self, configure: impl FnOnce(&mut Options)) -> Select {
        Select::new(self.derive(configure))
    }

    pub fn insert_with(&self, configure: impl FnOnce(&mut Options)) -> Insert {
        Insert::new(self.derive(configure))
    }

    pub fn update_with(&self, configure: impl FnOnce(&mut Options)) -> Update {
        Update::new(self.derive(configure))
    }

    pub fn delete_with(&self, configure: impl FnOnce(&mut Options)) -> Delete {
        Delete::new(self.derive(configure))
    }

    fn derive(&self, configure: impl FnOnce(&mut Options)) -> Arc<Options> {
        let mut options = (*self.options).clone();
        configure(&mut options);
        Arc::new(options)
    }
}

/// Register (or replace) a dialect.
///
/// `configure` starts from [`Options::default`]. Builders created before a
/// replacement keep the options they were built with.
pub fn register_dialect(name: &str, configure: impl FnOnce(&mut Options)) -> Dialect {
    let mut options = Options::default();
    configure(&mut options);
    let options = Arc::new(options);

    let replaced = REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.to_string(), options.clone())
        .is_some();
    tracing::debug!(
        target: "sqlblock.dialect",
        name = %name,
        replaced,
        "registered dialect"
    );

    Dialect {
        name: name.to_string(),
        options,
    }
}

/// Look up a registered dialect.
pub fn dialect(name: &str) -> QbResult<Dialect> {
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    let options = registry
        .get(name)
        .cloned()
        .ok_or_else(|| QbError::UnknownDialect(name.to_string()))?;
    Ok(Dialect {
        name: name.to_string(),
        options,
    })
}

/// Names of all registered dialects, sorted.
pub fn dialect_names() -> Vec<String> {
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    let mut names: Vec<String> = registry.keys().cloned().collect();
    names.sort();
    names
}

/// The `default` dialect, or plain defaults if it was never seeded.
pub fn default_dialect() -> Dialect {
    dialect(DEFAULT_DIALECT).unwrap_or_else(|_| Dialect {
        name: DEFAULT_DIALECT.to_string(),
        options: Arc::new(Options::default()),
    })
}

/// A SELECT builder using the `default` dialect.
pub fn select() -> Select {
    default_dialect().select()
}

/// An INSERT builder using the `default` dialect.
pub fn insert() -> Insert {
    default_dialect().insert()
}

/// An UPDATE builder using the `default` dialect.
pub fn update() -> Update {
    default_dialect().update()
}

/// A DELETE builder using the `default` dialect.
pub fn delete() -> Delete {
    default_dialect().delete()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;

    #[test]
    fn builtins_are_seeded() {
        let names = dialect_names();
        for name in ["default", "hdb", "mssql", "mysql", "postgres"] {
            assert!(names.iter().any(|n| n == name), "missing {name}");
        }
    }

    #[test]
    fn unknown_dialect_is_an_error() {
        let err = dialect("no-such-dialect").unwrap_err();
        assert_eq!(err, QbError::UnknownDialect("no-such-dialect".to_string()));
    }

    #[test]
    fn postgres_numbers_placeholders() {
        let p = dialect("postgres")
            .unwrap()
            .select()
            .from("t")
            .unwrap()
            .where_(Expr::eq("a", 1i32))
            .where_(Expr::eq("b", 2i32))
            .to_param()
            .unwrap();
        assert_eq!(p.text, "SELECT * FROM t WHERE (a = $1) AND (b = $2)");
    }

    #[test]
    fn mssql_brackets_and_at_params() {
        let d = dialect("mssql").unwrap();
        let q = d
            .select_with(|o| o.auto_quote_table_names = true)
            .from_as("users", "u")
            .unwrap()
            .where_(Expr::eq("name", "o'neil"));
        assert_eq!(
            q.to_sql().unwrap(),
            "SELECT * FROM [users] [u] WHERE (name = 'o''neil')"
        );
        assert_eq!(
            q.to_param().unwrap().text,
            "SELECT * FROM [users] [u] WHERE (name = @1)"
        );
    }

    #[test]
    fn register_is_last_write_wins() {
        register_dialect("test-lww", |o| o.parameter_character = "?".into());
        register_dialect("test-lww", |o| o.parameter_character = ":p".into());
        let d = dialect("test-lww").unwrap();
        assert_eq!(d.options().parameter_character, ":p");
        let p = d
            .select()
            .where_(Expr::eq("a", 1i32))
            .to_param()
            .unwrap();
        assert_eq!(p.text, "SELECT * WHERE (a = :p)");
    }

    #[test]
    fn per_builder_overrides_do_not_leak() {
        let d = dialect("default").unwrap();
        let _ = d.select_with(|o| o.separator = "\n".into());
        assert_eq!(d.select().from("t").unwrap().to_sql().unwrap(), "SELECT * FROM t");
    }
}
