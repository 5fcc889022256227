//! Filter algebra.
//!
//! Filters never see a bind variable or a column name. Rendering is
//! two-phase: [`Filter::actual_values`] lists the operands in textual order,
//! the plan resolves each one to a string, and [`Filter::where_sql`] splices
//! the resolved strings back in. This keeps bind numbering in one place.

mod operand;
mod wrapper;

#[cfg(test)]
mod tests;

pub use operand::{IntoOperand, Operand, SqlWrapper};
pub use wrapper::{
    CaseWhen, Cast, Coalesce, Function, case_when, cast, coalesce, function, lower, upper,
};

use crate::error::PlanError;

/// A boolean condition over operands.
#[derive(Clone, Debug)]
pub enum Filter {
    /// `left op right`
    Comparison {
        left: Operand,
        op: &'static str,
        right: Operand,
    },
    /// All members must hold. Parenthesised when it has two or more members.
    And(Vec<Filter>),
    /// Any member holds. Parenthesised when it has two or more members.
    Or(Vec<Filter>),
    /// `NOT inner`
    Not(Box<Filter>),
    /// `expr IN (v1, v2, ...)`; never empty.
    In { expr: Operand, values: Vec<Operand> },
    /// `expr IS NULL`
    Null(Operand),
    /// `expr IS NOT NULL`
    NotNull(Operand),
    /// The bare expression, for boolean columns.
    True(Operand),
}

impl Filter {
    pub fn comparison(left: impl IntoOperand, op: &'static str, right: impl IntoOperand) -> Self {
        Filter::Comparison {
            left: left.into_operand(),
            op,
            right: right.into_operand(),
        }
    }

    /// `left = right`
    pub fn equal(left: impl IntoOperand, right: impl IntoOperand) -> Self {
        Self::comparison(left, "=", right)
    }

    /// `left <> right`
    pub fn not_equal(left: impl IntoOperand, right: impl IntoOperand) -> Self {
        Self::comparison(left, "<>", right)
    }

    /// `left < right`
    pub fn less(left: impl IntoOperand, right: impl IntoOperand) -> Self {
        Self::comparison(left, "<", right)
    }

    /// `left <= right`
    pub fn less_or_equal(left: impl IntoOperand, right: impl IntoOperand) -> Self {
        Self::comparison(left, "<=", right)
    }

    /// `left > right`
    pub fn greater(left: impl IntoOperand, right: impl IntoOperand) -> Self {
        Self::comparison(left, ">", right)
    }

    /// `left >= right`
    pub fn greater_or_equal(left: impl IntoOperand, right: impl IntoOperand) -> Self {
        Self::comparison(left, ">=", right)
    }

    /// `left LIKE pattern`
    pub fn like(left: impl IntoOperand, pattern: impl IntoOperand) -> Self {
        Self::comparison(left, "LIKE", pattern)
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    pub fn not(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    /// `expr IN (values...)`. An empty value list is an error.
    pub fn in_list<V: IntoOperand>(
        expr: impl IntoOperand,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self, PlanError> {
        let values: Vec<Operand> = values.into_iter().map(IntoOperand::into_operand).collect();
        if values.is_empty() {
            return Err(PlanError::EmptyInList);
        }
        Ok(Filter::In {
            expr: expr.into_operand(),
            values,
        })
    }

    pub fn null(expr: impl IntoOperand) -> Self {
        Filter::Null(expr.into_operand())
    }

    pub fn not_null(expr: impl IntoOperand) -> Self {
        Filter::NotNull(expr.into_operand())
    }

    pub fn is_true(expr: impl IntoOperand) -> Self {
        Filter::True(expr.into_operand())
    }

    pub fn is_false(expr: impl IntoOperand) -> Self {
        Self::not(Self::is_true(expr))
    }

    /// Add a member to a combining filter.
    ///
    /// Any other filter is first turned into a one-member AND group.
    pub fn add(&mut self, filter: Filter) {
        match self {
            Filter::And(filters) | Filter::Or(filters) => filters.push(filter),
            other => {
                let current = std::mem::replace(other, Filter::And(Vec::new()));
                *other = Filter::And(vec![current, filter]);
            }
        }
    }

    /// Check invariants that the public variants cannot enforce: an IN
    /// filter anywhere in the tree must have values.
    pub fn validate(&self) -> Result<(), PlanError> {
        match self {
            Filter::In { values, .. } if values.is_empty() => Err(PlanError::EmptyInList),
            Filter::And(filters) | Filter::Or(filters) => {
                filters.iter().try_for_each(Filter::validate)
            }
            Filter::Not(inner) => inner.validate(),
            _ => Ok(()),
        }
    }

    /// Number of operands `where_sql` expects.
    pub fn value_count(&self) -> usize {
        match self {
            Filter::Comparison { .. } => 2,
            Filter::And(filters) | Filter::Or(filters) => {
                filters.iter().map(Filter::value_count).sum()
            }
            Filter::Not(inner) => inner.value_count(),
            Filter::In { values, .. } => 1 + values.len(),
            Filter::Null(_) | Filter::NotNull(_) | Filter::True(_) => 1,
        }
    }

    /// Operands in the order their strings are consumed by `where_sql`.
    pub fn actual_values(&self) -> Vec<&Operand> {
        let mut out = Vec::with_capacity(self.value_count());
        self.collect_values(&mut out);
        out
    }

    fn collect_values<'a>(&'a self, out: &mut Vec<&'a Operand>) {
        match self {
            Filter::Comparison { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            Filter::And(filters) | Filter::Or(filters) => {
                for f in filters {
                    f.collect_values(out);
                }
            }
            Filter::Not(inner) => inner.collect_values(out),
            Filter::In { expr, values } => {
                out.push(expr);
                out.extend(values.iter());
            }
            Filter::Null(expr) | Filter::NotNull(expr) | Filter::True(expr) => out.push(expr),
        }
    }

    /// Render with resolved operand strings.
    ///
    /// An empty group renders as an empty string.
    pub fn where_sql(&self, values: &[String]) -> String {
        debug_assert_eq!(values.len(), self.value_count());
        match self {
            Filter::Comparison { op, .. } => format!("{} {} {}", values[0], op, values[1]),
            Filter::And(filters) => combine(filters, " AND ", values),
            Filter::Or(filters) => combine(filters, " OR ", values),
            Filter::Not(inner) => format!("NOT {}", inner.where_sql(values)),
            Filter::In { .. } => format!("{} IN ({})", values[0], values[1..].join(", ")),
            Filter::Null(_) => format!("{} IS NULL", values[0]),
            Filter::NotNull(_) => format!("{} IS NOT NULL", values[0]),
            Filter::True(_) => values[0].clone(),
        }
    }
}

fn combine(filters: &[Filter], sep: &str, values: &[String]) -> String {
    let mut parts = Vec::with_capacity(filters.len());
    let mut offset = 0;
    for f in filters {
        let n = f.value_count();
        let sql = f.where_sql(&values[offset..offset + n]);
        offset += n;
        if !sql.is_empty() {
            parts.push(sql);
        }
    }
    match parts.len() {
        0 => String::new(),
        1 => parts.swap_remove(0),
        _ => format!("({})", parts.join(sep)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    LeftOuter,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::LeftOuter => "LEFT OUTER JOIN",
        }
    }
}

/// A joined table and its ON conditions.
#[derive(Clone, Debug)]
pub struct JoinFilter {
    kind: JoinKind,
    quoted_table: String,
    quoted_alias: Option<String>,
    on: Filter,
}

impl JoinFilter {
    pub fn new(kind: JoinKind, quoted_table: String, quoted_alias: Option<String>) -> Self {
        Self {
            kind,
            quoted_table,
            quoted_alias,
            on: Filter::And(Vec::new()),
        }
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    pub fn add(&mut self, filter: Filter) {
        self.on.add(filter);
    }

    pub fn on(&self) -> &Filter {
        &self.on
    }

    pub fn actual_values(&self) -> Vec<&Operand> {
        self.on.actual_values()
    }

    /// `table` or `table AS alias`, as listed in FROM/USING.
    pub fn from_item(&self) -> String {
        match &self.quoted_alias {
            Some(alias) => format!("{} AS {}", self.quoted_table, alias),
            None => self.quoted_table.clone(),
        }
    }

    /// Full JOIN clause; the ON part is omitted when there are no conditions.
    pub fn join_clause(&self, values: &[String]) -> String {
        let mut sql = format!("{} {}", self.kind.keyword(), self.from_item());
        let on = self.on.where_sql(values);
        if !on.is_empty() {
            sql.push_str(" ON ");
            sql.push_str(&on);
        }
        sql
    }

    /// ON conditions alone, for UPDATE ... FROM and DELETE ... USING.
    pub fn where_sql(&self, values: &[String]) -> String {
        self.on.where_sql(values)
    }
}
