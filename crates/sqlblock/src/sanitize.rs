//! Identifier validation and quoting.
//!
//! Table-like arguments arrive as a [`TableSource`], resolved once at the call
//! site: a bare name, a schema-qualified name, or a nested query. Bare
//! identifiers are validated (non-empty, no NUL) and, when the builder's
//! [`Options`] ask for it, wrapped in the dialect's quote character with embedded
//! closing quotes doubled:
//!
//! ```ignore
//! // name_quote_character = "\""
//! sanitize_table_name("users", &opts)?;    // "users"
//! sanitize_table_name(r#"a"b"#, &opts)?;   // "a""b"
//! sanitize_field_name("u.id", &opts)?;     // "u"."id"
//! ```

use crate::error::{QbError, QbResult};
use crate::options::Options;
use crate::query::{Delete, Insert, Query, Select, Update};

/// A table argument: plain name, `schema.name`, or a nested query.
#[derive(Clone, Debug)]
pub enum TableSource {
    BareName(String),
    SchemaQualifiedName { schema: String, name: String },
    NestedQuery(Box<Query>),
}

impl TableSource {
    /// Attach an explicit schema.
    ///
    /// Fails for nested queries and for sources that already carry a schema.
    pub fn with_schema(self, schema: Option<&str>) -> QbResult<Self> {
        let Some(schema) = schema else {
            return Ok(self);
        };
        match self {
            TableSource::BareName(name) => Ok(TableSource::SchemaQualifiedName {
                schema: schema.to_string(),
                name,
            }),
            TableSource::SchemaQualifiedName { .. } => Err(QbError::invalid(format!(
                "schema '{schema}' given for a table that is already schema-qualified"
            ))),
            TableSource::NestedQuery(_) => Err(QbError::invalid(format!(
                "schema '{schema}' cannot be applied to a nested query"
            ))),
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, TableSource::NestedQuery(_))
    }
}

impl From<&str> for TableSource {
    fn from(name: &str) -> Self {
        TableSource::BareName(name.to_string())
    }
}

impl From<String> for TableSource {
    fn from(name: String) -> Self {
        TableSource::BareName(name)
    }
}

impl From<(&str, &str)> for TableSource {
    fn from((schema, name): (&str, &str)) -> Self {
        TableSource::SchemaQualifiedName {
            schema: schema.to_string(),
            name: name.to_string(),
        }
    }
}

impl From<(String, String)> for TableSource {
    fn from((schema, name): (String, String)) -> Self {
        TableSource::SchemaQualifiedName { schema, name }
    }
}

impl From<Query> for TableSource {
    fn from(query: Query) -> Self {
        TableSource::NestedQuery(Box::new(query))
    }
}

macro_rules! impl_nested_source {
    ($($t:ty),*) => {
        $(impl From<$t> for TableSource {
            fn from(query: $t) -> Self {
                TableSource::NestedQuery(Box::new(Query::from(query)))
            }
        })*
    };
}

impl_nested_source!(Select, Insert, Update, Delete);

/// A sanitized table operand.
#[derive(Clone, Debug)]
pub(crate) enum Sanitized {
    Name(String),
    Nested(Box<Query>),
}

/// Resolve a table operand into its rendered name or a nestable query.
pub(crate) fn sanitize_table_source(
    source: TableSource,
    allow_nested: bool,
    options: &Options,
) -> QbResult<Sanitized> {
    match source {
        TableSource::BareName(name) => Ok(Sanitized::Name(sanitize_table_name(&name, options)?)),
        TableSource::SchemaQualifiedName { schema, name } => {
            let schema = sanitize_table_name(&schema, options)?;
            let name = sanitize_table_name(&name, options)?;
            Ok(Sanitized::Name(format!("{schema}.{name}")))
        }
        TableSource::NestedQuery(query) => {
            if !allow_nested {
                return Err(QbError::invalid(format!(
                    "a nested {} query is not allowed here",
                    query.kind()
                )));
            }
            query.ensure_nestable()?;
            Ok(Sanitized::Nested(query))
        }
    }
}

pub(crate) fn validate_identifier(raw: &str, what: &str) -> QbResult<()> {
    if raw.trim().is_empty() {
        return Err(QbError::invalid(format!("{what} cannot be empty")));
    }
    if raw.contains('\0') {
        return Err(QbError::invalid(format!(
            "{what} cannot contain NUL character"
        )));
    }
    Ok(())
}

/// Split a quote setting into its opening and closing parts.
fn quote_pair(quote: &str) -> (&str, &str) {
    let mut chars = quote.char_indices();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(_), Some((split, _)), None) => quote.split_at(split),
        _ => (quote, quote),
    }
}

/// True when `name` is wrapped in `open`/`close` and every `close` inside
/// the wrapper is doubled.
fn is_quoted(name: &str, open: &str, close: &str) -> bool {
    if name.len() < open.len() + close.len() || !name.starts_with(open) || !name.ends_with(close)
    {
        return false;
    }
    let mut rest = &name[open.len()..name.len() - close.len()];
    while let Some(pos) = rest.find(close) {
        let after = &rest[pos + close.len()..];
        match after.strip_prefix(close) {
            Some(tail) => rest = tail,
            None => return false,
        }
    }
    true
}

/// Wrap `name` in `quote`, doubling embedded closing quotes.
///
/// Names that are already wrapped pass through unchanged. An empty `quote`
/// disables quoting.
pub fn quote_identifier(name: &str, quote: &str) -> String {
    if quote.is_empty() {
        return name.to_string();
    }
    let (open, close) = quote_pair(quote);
    if is_quoted(name, open, close) {
        return name.to_string();
    }
    let mut doubled = String::with_capacity(close.len() * 2);
    doubled.push_str(close);
    doubled.push_str(close);

    let mut out = String::with_capacity(name.len() + open.len() + close.len());
    out.push_str(open);
    out.push_str(&name.replace(close, &doubled));
    out.push_str(close);
    out
}

pub(crate) fn sanitize_table_name(name: &str, options: &Options) -> QbResult<String> {
    validate_identifier(name, "Table name")?;
    if options.auto_quote_table_names {
        Ok(quote_identifier(name, &options.name_quote_character))
    } else {
        Ok(name.to_string())
    }
}

pub(crate) fn sanitize_field_name(name: &str, options: &Options) -> QbResult<String> {
    validate_identifier(name, "Field name")?;
    if !options.auto_quote_field_names || name == "*" {
        return Ok(name.to_string());
    }
    let quote = &options.name_quote_character;
    if options.ignore_periods_for_field_name_quotes {
        return Ok(quote_identifier(name, quote));
    }
    // A name quoted as a whole must not be split on its inner periods.
    let (open, close) = quote_pair(quote);
    if is_quoted(name, open, close) {
        return Ok(name.to_string());
    }
    let parts: Vec<String> = name
        .split('.')
        .map(|part| {
            if part == "*" {
                part.to_string()
            } else {
                quote_identifier(part, quote)
            }
        })
        .collect();
    Ok(parts.join("."))
}

pub(crate) fn sanitize_table_alias(alias: &str, options: &Options) -> QbResult<String> {
    validate_identifier(alias, "Table alias")?;
    let alias = if options.auto_quote_alias_names {
        quote_identifier(alias, &options.table_alias_quote_character)
    } else {
        alias.to_string()
    };
    if options.use_as_for_table_alias_names {
        Ok(format!("AS {alias}"))
    } else {
        Ok(alias)
    }
}

pub(crate) fn sanitize_field_alias(alias: &str, options: &Options) -> QbResult<String> {
    validate_identifier(alias, "Field alias")?;
    if options.auto_quote_alias_names {
        Ok(quote_identifier(alias, &options.field_alias_quote_character))
    } else {
        Ok(alias.to_string())
    }
}
