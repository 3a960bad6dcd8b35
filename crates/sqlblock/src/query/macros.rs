/// Join adders for a builder with a `JoinBlock` field.
///
/// Usage:
/// ```ignore
/// impl Select {
///     impl_join_methods!(joins);
/// }
/// ```
macro_rules! impl_join_methods {
    ($field:ident) => {
        /// Add a join of any kind.
        pub fn add_join(
            mut self,
            kind: $crate::block::JoinKind,
            target: impl Into<$crate::sanitize::TableSource>,
            alias: Option<&str>,
            on: impl $crate::expr::IntoCondition,
        ) -> $crate::error::QbResult<Self> {
            self.$field.add_join(kind, target, alias, on)?;
            Ok(self)
        }

        /// `INNER JOIN target [alias] ON (on)`
        pub fn join(
            self,
            target: impl Into<$crate::sanitize::TableSource>,
            alias: Option<&str>,
            on: impl $crate::expr::IntoCondition,
        ) -> $crate::error::QbResult<Self> {
            self.add_join($crate::block::JoinKind::Inner, target, alias, on)
        }

        pub fn left_join(
            self,
            target: impl Into<$crate::sanitize::TableSource>,
            alias: Option<&str>,
            on: impl $crate::expr::IntoCondition,
        ) -> $crate::error::QbResult<Self> {
            self.add_join($crate::block::JoinKind::Left, target, alias, on)
        }

        pub fn right_join(
            self,
            target: impl Into<$crate::sanitize::TableSource>,
            alias: Option<&str>,
            on: impl $crate::expr::IntoCondition,
        ) -> $crate::error::QbResult<Self> {
            self.add_join($crate::block::JoinKind::Right, target, alias, on)
        }

        pub fn outer_join(
            self,
            target: impl Into<$crate::sanitize::TableSource>,
            alias: Option<&str>,
            on: impl $crate::expr::IntoCondition,
        ) -> $crate::error::QbResult<Self> {
            self.add_join($crate::block::JoinKind::Outer, target, alias, on)
        }

        pub fn left_outer_join(
            self,
            target: impl Into<$crate::sanitize::TableSource>,
            alias: Option<&str>,
            on: impl $crate::expr::IntoCondition,
        ) -> $crate::error::QbResult<Self> {
            self.add_join($crate::block::JoinKind::LeftOuter, target, alias, on)
        }

        pub fn full_join(
            self,
            target: impl Into<$crate::sanitize::TableSource>,
            alias: Option<&str>,
            on: impl $crate::expr::IntoCondition,
        ) -> $crate::error::QbResult<Self> {
            self.add_join($crate::block::JoinKind::Full, target, alias, on)
        }

        /// `CROSS JOIN target [alias]`, never with `ON`.
        pub fn cross_join(
            self,
            target: impl Into<$crate::sanitize::TableSource>,
            alias: Option<&str>,
        ) -> $crate::error::QbResult<Self> {
            self.add_join(
                $crate::block::JoinKind::Cross,
                target,
                alias,
                None::<$crate::expr::Expr>,
            )
        }
    };
}

/// `where_` for a builder with a WHERE `ConditionBlock` field.
macro_rules! impl_where_methods {
    ($field:ident) => {
        /// Add a WHERE condition. Multiple calls are joined with `AND`.
        pub fn where_(mut self, condition: impl $crate::expr::IntoCondition) -> Self {
            self.$field.add(condition);
            self
        }
    };
}

/// ORDER BY setters for a builder with an `OrderByBlock` field.
macro_rules! impl_order_methods {
    ($field:ident) => {
        /// `ORDER BY field [ASC|DESC]`
        pub fn order(
            mut self,
            field: &str,
            direction: Option<$crate::block::Direction>,
        ) -> $crate::error::QbResult<Self> {
            self.$field.add(field, direction)?;
            Ok(self)
        }

        /// Order by a raw expression with bound arguments.
        pub fn order_with(
            mut self,
            sql: &str,
            args: Vec<$crate::expr::Arg>,
            direction: Option<$crate::block::Direction>,
        ) -> Self {
            self.$field.add_template(sql, args, direction);
            self
        }
    };
}

/// LIMIT setters for a builder with a `LimitBlock` field.
macro_rules! impl_limit_methods {
    ($field:ident) => {
        pub fn limit(mut self, limit: u32) -> Self {
            self.$field.set(Some(limit));
            self
        }

        pub fn clear_limit(mut self) -> Self {
            self.$field.set(None);
            self
        }
    };
}

/// Inherent render methods, so callers need not import [`Block`](crate::Block).
macro_rules! impl_render_methods {
    ($kind:expr) => {
        /// Render with values interpolated as literals.
        pub fn to_sql(&self) -> $crate::error::QbResult<String> {
            $crate::render::render_statement(self, $kind, $crate::render::RenderMode::Inline)
                .map(|q| q.text)
        }

        /// Render as text plus positional values.
        pub fn to_param(&self) -> $crate::error::QbResult<$crate::render::ParamQuery> {
            $crate::render::render_statement(self, $kind, $crate::render::RenderMode::Param)
        }
    };
}
