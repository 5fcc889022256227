//! Method families shared by the views.
//!
//! Each macro adds one capability to a view type. A view gets exactly the
//! families listed for it, so calling e.g. `update()` on a `WhereQuery` is a
//! compile error rather than a runtime one.

macro_rules! view {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[must_use = "views do nothing until a terminal method is called"]
        pub struct $name<'a, E, M> {
            pub(crate) plan: $crate::plan::QueryPlan<'a, E, M>,
        }

        impl<'a, E, M> $name<'a, E, M> {
            pub(crate) fn new(plan: $crate::plan::QueryPlan<'a, E, M>) -> Self {
                Self { plan }
            }

            /// The underlying plan, for inspection.
            pub fn plan(&self) -> &$crate::plan::QueryPlan<'a, E, M> {
                &self.plan
            }
        }
    };
}

/// Comparison sugar feeding the clause the view is building.
macro_rules! impl_filters {
    ($view:ident) => {
        impl<'a, E, M> $view<'a, E, M> {
            pub fn filter(mut self, filter: $crate::filter::Filter) -> Self {
                self.plan.add_filter(filter);
                self
            }

            pub fn equal(
                self,
                left: impl $crate::filter::IntoOperand,
                right: impl $crate::filter::IntoOperand,
            ) -> Self {
                self.filter($crate::filter::Filter::equal(left, right))
            }

            pub fn not_equal(
                self,
                left: impl $crate::filter::IntoOperand,
                right: impl $crate::filter::IntoOperand,
            ) -> Self {
                self.filter($crate::filter::Filter::not_equal(left, right))
            }

            pub fn less(
                self,
                left: impl $crate::filter::IntoOperand,
                right: impl $crate::filter::IntoOperand,
            ) -> Self {
                self.filter($crate::filter::Filter::less(left, right))
            }

            pub fn less_or_equal(
                self,
                left: impl $crate::filter::IntoOperand,
                right: impl $crate::filter::IntoOperand,
            ) -> Self {
                self.filter($crate::filter::Filter::less_or_equal(left, right))
            }

            pub fn greater(
                self,
                left: impl $crate::filter::IntoOperand,
                right: impl $crate::filter::IntoOperand,
            ) -> Self {
                self.filter($crate::filter::Filter::greater(left, right))
            }

            pub fn greater_or_equal(
                self,
                left: impl $crate::filter::IntoOperand,
                right: impl $crate::filter::IntoOperand,
            ) -> Self {
                self.filter($crate::filter::Filter::greater_or_equal(left, right))
            }

            pub fn like(
                self,
                left: impl $crate::filter::IntoOperand,
                pattern: impl $crate::filter::IntoOperand,
            ) -> Self {
                self.filter($crate::filter::Filter::like(left, pattern))
            }

            /// `expr IN (values...)`; an empty list is recorded as an error.
            pub fn in_list<V: $crate::filter::IntoOperand>(
                mut self,
                expr: impl $crate::filter::IntoOperand,
                values: impl IntoIterator<Item = V>,
            ) -> Self {
                self.plan
                    .add_filter_result($crate::filter::Filter::in_list(expr, values));
                self
            }

            pub fn null(self, expr: impl $crate::filter::IntoOperand) -> Self {
                self.filter($crate::filter::Filter::null(expr))
            }

            pub fn not_null(self, expr: impl $crate::filter::IntoOperand) -> Self {
                self.filter($crate::filter::Filter::not_null(expr))
            }

            pub fn is_true(self, expr: impl $crate::filter::IntoOperand) -> Self {
                self.filter($crate::filter::Filter::is_true(expr))
            }

            pub fn is_false(self, expr: impl $crate::filter::IntoOperand) -> Self {
                self.filter($crate::filter::Filter::is_false(expr))
            }
        }
    };
}

/// `where_()`: close any open join and start feeding WHERE.
macro_rules! impl_where {
    ($view:ident => $next:ident) => {
        impl<'a, E, M> $view<'a, E, M> {
            pub fn where_(mut self) -> $next<'a, E, M> {
                self.plan.open_where();
                $next::new(self.plan)
            }
        }
    };
}

macro_rules! impl_join {
    ($view:ident => $next:ident) => {
        impl<'a, E, M> $view<'a, E, M> {
            /// `INNER JOIN` the table of `target`. Filters now feed its ON clause.
            pub fn join<R: $crate::mapping::Reference>(mut self, target: &R) -> $next<'a, E, M> {
                self.plan
                    .join_table($crate::filter::JoinKind::Inner, target, None);
                $next::new(self.plan)
            }

            /// `LEFT OUTER JOIN` the table of `target`.
            pub fn left_join<R: $crate::mapping::Reference>(
                mut self,
                target: &R,
            ) -> $next<'a, E, M> {
                self.plan
                    .join_table($crate::filter::JoinKind::LeftOuter, target, None);
                $next::new(self.plan)
            }

            /// `INNER JOIN table AS alias`; needed to join a table twice.
            pub fn join_as<R: $crate::mapping::Reference>(
                mut self,
                target: &R,
                alias: &str,
            ) -> $next<'a, E, M> {
                self.plan
                    .join_table($crate::filter::JoinKind::Inner, target, Some(alias));
                $next::new(self.plan)
            }

            pub fn left_join_as<R: $crate::mapping::Reference>(
                mut self,
                target: &R,
                alias: &str,
            ) -> $next<'a, E, M> {
                self.plan
                    .join_table($crate::filter::JoinKind::LeftOuter, target, Some(alias));
                $next::new(self.plan)
            }
        }
    };
}

macro_rules! impl_on {
    ($view:ident) => {
        impl<'a, E, M> $view<'a, E, M> {
            /// Readability marker before ON conditions.
            pub fn on(self) -> Self {
                self
            }
        }
    };
}

macro_rules! impl_assign {
    ($view:ident => $next:ident) => {
        impl<'a, E, M> $view<'a, E, M> {
            /// `column = value` for INSERT and UPDATE.
            pub fn assign<V>(mut self, field: $crate::mapping::Column, value: V) -> $next<'a, E, M>
            where
                V: tokio_postgres::types::ToSql + Send + Sync + 'static,
            {
                self.plan.assign(field, $crate::param::Param::new(value));
                $next::new(self.plan)
            }
        }
    };
}

macro_rules! impl_select_manipulators {
    ($view:ident) => {
        impl<'a, E, M> $view<'a, E, M> {
            /// `ORDER BY expr [ASC|DESC]`; `direction` is "", "asc" or "desc".
            pub fn order_by(
                mut self,
                expr: impl $crate::filter::IntoOperand,
                direction: &str,
            ) -> $crate::gate::SelectQuery<'a, E, M> {
                self.plan.order_by(expr.into_operand(), direction);
                $crate::gate::SelectQuery::new(self.plan)
            }

            pub fn discard_order_by(mut self) -> $crate::gate::SelectQuery<'a, E, M> {
                self.plan.discard_order_by();
                $crate::gate::SelectQuery::new(self.plan)
            }

            pub fn group_by(
                mut self,
                field: $crate::mapping::Column,
            ) -> $crate::gate::SelectQuery<'a, E, M> {
                self.plan.group_by(field);
                $crate::gate::SelectQuery::new(self.plan)
            }

            pub fn limit(mut self, limit: i64) -> $crate::gate::SelectQuery<'a, E, M> {
                self.plan.set_limit(Some(limit));
                $crate::gate::SelectQuery::new(self.plan)
            }

            pub fn discard_limit(mut self) -> $crate::gate::SelectQuery<'a, E, M> {
                self.plan.set_limit(None);
                $crate::gate::SelectQuery::new(self.plan)
            }

            pub fn offset(mut self, offset: i64) -> $crate::gate::SelectQuery<'a, E, M> {
                self.plan.set_offset(Some(offset));
                $crate::gate::SelectQuery::new(self.plan)
            }

            pub fn discard_offset(mut self) -> $crate::gate::SelectQuery<'a, E, M> {
                self.plan.set_offset(None);
                $crate::gate::SelectQuery::new(self.plan)
            }

            /// Select only `fields`.
            pub fn fields(
                mut self,
                fields: impl IntoIterator<Item = $crate::mapping::Column>,
            ) -> $crate::gate::SelectQuery<'a, E, M> {
                self.plan.fields(fields);
                $crate::gate::SelectQuery::new(self.plan)
            }

            /// Add a field to the select list, running its join callback.
            pub fn add_field(
                mut self,
                field: $crate::mapping::Column,
            ) -> $crate::gate::SelectQuery<'a, E, M> {
                self.plan.add_field(field);
                $crate::gate::SelectQuery::new(self.plan)
            }

            /// Select `expr AS <field's column>` in place of the field.
            pub fn select_as(
                mut self,
                field: $crate::mapping::Column,
                expr: impl $crate::filter::IntoOperand,
            ) -> $crate::gate::SelectQuery<'a, E, M> {
                self.plan.select_as(field, expr.into_operand());
                $crate::gate::SelectQuery::new(self.plan)
            }

            pub fn distinct_on<V: $crate::filter::IntoOperand>(
                mut self,
                exprs: impl IntoIterator<Item = V>,
            ) -> $crate::gate::SelectQuery<'a, E, M> {
                self.plan.distinct_on(
                    exprs
                        .into_iter()
                        .map($crate::filter::IntoOperand::into_operand)
                        .collect(),
                );
                $crate::gate::SelectQuery::new(self.plan)
            }

            pub fn for_update(mut self) -> $crate::gate::SelectQuery<'a, E, M> {
                self.plan.for_update(None);
                $crate::gate::SelectQuery::new(self.plan)
            }

            /// `FOR UPDATE OF <table of target>`.
            pub fn for_update_of<R: $crate::mapping::Reference>(
                mut self,
                target: &R,
            ) -> $crate::gate::SelectQuery<'a, E, M> {
                self.plan.for_update(Some(target));
                $crate::gate::SelectQuery::new(self.plan)
            }
        }
    };
}

macro_rules! impl_selector {
    ($view:ident) => {
        impl<'a, E, M> $view<'a, E, M> {
            pub fn select_statement(&self) -> $crate::error::OrmResult<$crate::plan::Statement> {
                Ok(self.plan.select_statement()?)
            }

            pub fn count_statement(&self) -> $crate::error::OrmResult<$crate::plan::Statement> {
                Ok(self.plan.count_statement()?)
            }

            /// Render this SELECT for use as the FROM clause of another query.
            pub fn into_subquery(self, alias: &str) -> $crate::plan::SubQuery<M> {
                self.plan.to_subquery(alias)
            }
        }

        impl<'a, E, M> $view<'a, E, M>
        where
            E: $crate::executor::Executor,
        {
            pub async fn select(self) -> $crate::error::OrmResult<Vec<M>>
            where
                M: $crate::row::FromRow + Send,
            {
                self.plan.select().await
            }

            /// Decode the rows into another type.
            pub async fn select_to_target<T>(
                self,
                target: &mut Vec<T>,
            ) -> $crate::error::OrmResult<()>
            where
                T: $crate::row::FromRow + Send,
            {
                self.plan.select_to_target(target).await
            }

            pub async fn count(self) -> $crate::error::OrmResult<i64> {
                self.plan.count().await
            }
        }
    };
}

macro_rules! impl_inserter {
    ($view:ident) => {
        impl<'a, E, M> $view<'a, E, M> {
            pub fn insert_statement(&self) -> $crate::error::OrmResult<$crate::plan::Statement> {
                Ok(self.plan.insert_statement()?)
            }
        }

        impl<'a, E, M> $view<'a, E, M>
        where
            E: $crate::executor::Executor,
        {
            pub async fn insert(self) -> $crate::error::OrmResult<u64> {
                self.plan.insert().await
            }
        }
    };
}

macro_rules! impl_updater {
    ($view:ident) => {
        impl<'a, E, M> $view<'a, E, M> {
            pub fn update_statement(&self) -> $crate::error::OrmResult<$crate::plan::Statement> {
                Ok(self.plan.update_statement()?)
            }
        }

        impl<'a, E, M> $view<'a, E, M>
        where
            E: $crate::executor::Executor,
        {
            /// Returns the number of updated rows.
            pub async fn update(self) -> $crate::error::OrmResult<u64> {
                self.plan.update().await
            }
        }
    };
}

macro_rules! impl_deleter {
    ($view:ident) => {
        impl<'a, E, M> $view<'a, E, M> {
            pub fn delete_statement(&self) -> $crate::error::OrmResult<$crate::plan::Statement> {
                Ok(self.plan.delete_statement()?)
            }
        }

        impl<'a, E, M> $view<'a, E, M>
        where
            E: $crate::executor::Executor,
        {
            /// Returns the number of deleted rows.
            pub async fn delete(self) -> $crate::error::OrmResult<u64> {
                self.plan.delete().await
            }
        }
    };
}

macro_rules! impl_truncater {
    ($view:ident) => {
        impl<'a, E, M> $view<'a, E, M> {
            pub fn truncate_statement(&self) -> $crate::error::OrmResult<$crate::plan::Statement> {
                Ok(self.plan.truncate_statement()?)
            }
        }

        impl<'a, E, M> $view<'a, E, M>
        where
            E: $crate::executor::Executor,
        {
            pub async fn truncate(self) -> $crate::error::OrmResult<u64> {
                self.plan.truncate().await
            }
        }
    };
}

pub(crate) use {
    impl_assign, impl_deleter, impl_filters, impl_inserter, impl_join, impl_on,
    impl_select_manipulators, impl_selector, impl_truncater, impl_updater, impl_where, view,
};
