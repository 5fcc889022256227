//! Typed views over a [`QueryPlan`](crate::plan::QueryPlan).
//!
//! Every builder call consumes the current view and returns the view for the
//! next legal step. Only methods that are valid at that step exist, so
//! `db.query(&c, &inv).assign(..).select()` does not compile.
//!
//! | view          | reachable methods                                            |
//! |---------------|--------------------------------------------------------------|
//! | `Query`       | assign, join, where_, select modifiers, delete, select, truncate |
//! | `AssignQuery` | assign, where_, insert, update                               |
//! | `UpdateQuery` | filters, update                                              |
//! | `WhereQuery`  | filters, select modifiers, delete, select                    |
//! | `JoinQuery`   | join, on, filters, where_, select modifiers, delete, select  |
//! | `SelectQuery` | select modifiers, select                                     |

pub(crate) mod macros;

use macros::{
    impl_assign, impl_deleter, impl_filters, impl_inserter, impl_join, impl_on,
    impl_select_manipulators, impl_selector, impl_truncater, impl_updater, impl_where, view,
};

view!(
    /// A freshly started query.
    Query
);
view!(
    /// A query with at least one assignment.
    AssignQuery
);
view!(
    /// An UPDATE whose WHERE clause is being built.
    UpdateQuery
);
view!(
    /// A query whose WHERE clause is being built.
    WhereQuery
);
view!(
    /// A query whose most recent join's ON clause is being built.
    JoinQuery
);
view!(
    /// A query past its filters; only select modifiers remain.
    SelectQuery
);

impl_assign!(Query => AssignQuery);
impl_join!(Query => JoinQuery);
impl_where!(Query => WhereQuery);
impl_select_manipulators!(Query);
impl_deleter!(Query);
impl_selector!(Query);
impl_truncater!(Query);

impl_assign!(AssignQuery => AssignQuery);
impl_where!(AssignQuery => UpdateQuery);
impl_inserter!(AssignQuery);
impl_updater!(AssignQuery);

impl_filters!(UpdateQuery);
impl_updater!(UpdateQuery);

impl_filters!(WhereQuery);
impl_select_manipulators!(WhereQuery);
impl_deleter!(WhereQuery);
impl_selector!(WhereQuery);

impl_join!(JoinQuery => JoinQuery);
impl_on!(JoinQuery);
impl_filters!(JoinQuery);
impl_where!(JoinQuery => WhereQuery);
impl_select_manipulators!(JoinQuery);
impl_deleter!(JoinQuery);
impl_selector!(JoinQuery);

impl_select_manipulators!(SelectQuery);
impl_selector!(SelectQuery);
