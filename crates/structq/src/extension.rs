//! Dialect-specific query extensions.
//!
//! Standard SQL has no JOIN for UPDATE or INSERT. PostgreSQL accepts joined
//! tables in `UPDATE ... FROM` and `DELETE ... USING`, so the Postgres views
//! below reach those terminals after a join. They are only available once
//! the extension is enabled in [`DbMapConfig`](crate::DbMapConfig):
//!
//! ```ignore
//! let db = DbMap::from_config(
//!     DbMapConfig::new(DialectKind::Postgres).with_extension(ExtensionKind::Postgres),
//! );
//! db.query(&client, &inv)
//!     .postgres()
//!     .assign(inv.memo, "paid")
//!     .join(&person)
//!     .equal(inv.person_id, person.id)
//!     .where_()
//!     .equal(person.name, "Alice")
//!     .update()
//!     .await?;
//! ```

use crate::dialect::DialectKind;
use crate::filter::{Filter, IntoOperand};
use crate::gate::macros::{
    impl_assign, impl_deleter, impl_filters, impl_inserter, impl_join, impl_on,
    impl_select_manipulators, impl_selector, impl_updater, impl_where, view,
};
use crate::gate::{Query, UpdateQuery, WhereQuery};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionKind {
    Postgres,
}

impl ExtensionKind {
    pub fn name(self) -> &'static str {
        match self {
            ExtensionKind::Postgres => "postgres",
        }
    }

    /// Whether the extension's SQL is valid for `dialect`.
    pub fn supports(self, dialect: DialectKind) -> bool {
        match self {
            ExtensionKind::Postgres => dialect == DialectKind::Postgres,
        }
    }
}

/// `left ILIKE pattern`
pub fn ilike(left: impl IntoOperand, pattern: impl IntoOperand) -> Filter {
    Filter::comparison(left, "ILIKE", pattern)
}

impl<'a, E, M> Query<'a, E, M> {
    /// Switch to the Postgres views.
    ///
    /// Records [`PlanError::ExtensionNotFound`](crate::PlanError::ExtensionNotFound)
    /// when the extension is not enabled for this dialect.
    pub fn postgres(mut self) -> PgQuery<'a, E, M> {
        self.plan.require_extension(ExtensionKind::Postgres);
        PgQuery::new(self.plan)
    }
}

view!(
    /// A query with the Postgres extension.
    PgQuery
);
view!(
    /// A Postgres query whose most recent join's ON clause is being built.
    PgJoinQuery
);
view!(
    /// A Postgres query with at least one assignment.
    PgAssignQuery
);
view!(
    /// A Postgres UPDATE with joined tables.
    PgAssignJoinQuery
);

impl_assign!(PgQuery => PgAssignQuery);
impl_join!(PgQuery => PgJoinQuery);
impl_where!(PgQuery => WhereQuery);
impl_select_manipulators!(PgQuery);
impl_selector!(PgQuery);
impl_deleter!(PgQuery);

impl_join!(PgJoinQuery => PgJoinQuery);
impl_on!(PgJoinQuery);
impl_filters!(PgJoinQuery);
impl_where!(PgJoinQuery => WhereQuery);
impl_deleter!(PgJoinQuery);
impl_select_manipulators!(PgJoinQuery);
impl_selector!(PgJoinQuery);

impl_assign!(PgAssignQuery => PgAssignQuery);
impl_join!(PgAssignQuery => PgAssignJoinQuery);
impl_where!(PgAssignQuery => UpdateQuery);
impl_inserter!(PgAssignQuery);
impl_updater!(PgAssignQuery);

impl_join!(PgAssignJoinQuery => PgAssignJoinQuery);
impl_on!(PgAssignJoinQuery);
impl_filters!(PgAssignJoinQuery);
impl_where!(PgAssignJoinQuery => UpdateQuery);
impl_updater!(PgAssignJoinQuery);

impl<'a, E, M> PgJoinQuery<'a, E, M> {
    /// Case-insensitive LIKE in the ON clause.
    pub fn ilike(self, left: impl IntoOperand, pattern: impl IntoOperand) -> Self {
        self.filter(ilike(left, pattern))
    }
}
