use super::*;
use crate::mapping::{Column, FieldCursor};

/// Resolve operands the way a plan would: columns by index, values as `$n`.
fn resolve(values: &[&Operand]) -> Vec<String> {
    let mut binds = 0;
    values
        .iter()
        .map(|v| resolve_one(v, &mut binds))
        .collect()
}

fn resolve_one(value: &Operand, binds: &mut usize) -> String {
    match value {
        Operand::Column(c) => format!("t.c{}", c.index()),
        Operand::Value(_) => {
            *binds += 1;
            format!("${}", binds)
        }
        Operand::Wrapped(w) => {
            let inner: Vec<String> = w
                .actual_values()
                .iter()
                .map(|v| resolve_one(v, binds))
                .collect();
            w.wrap_sql(&inner)
        }
    }
}

fn render(filter: &Filter) -> String {
    let values = resolve(&filter.actual_values());
    filter.where_sql(&values)
}

fn columns(n: usize) -> Vec<Column> {
    let mut cursor = FieldCursor::new();
    (0..n).map(|_| cursor.next_column()).collect()
}

#[test]
fn comparisons_use_their_own_operator() {
    let c = columns(1)[0];
    assert_eq!(render(&Filter::equal(c, 1i64)), "t.c0 = $1");
    assert_eq!(render(&Filter::not_equal(c, 1i64)), "t.c0 <> $1");
    assert_eq!(render(&Filter::less(c, 1i64)), "t.c0 < $1");
    assert_eq!(render(&Filter::less_or_equal(c, 1i64)), "t.c0 <= $1");
    assert_eq!(render(&Filter::greater(c, 1i64)), "t.c0 > $1");
    assert_eq!(render(&Filter::greater_or_equal(c, 1i64)), "t.c0 >= $1");
    assert_eq!(render(&Filter::like(c, "a%")), "t.c0 LIKE $1");
}

#[test]
fn column_to_column_comparison_has_no_binds() {
    let cols = columns(2);
    let f = Filter::equal(cols[0], cols[1]);
    assert_eq!(render(&f), "t.c0 = t.c1");
}

#[test]
fn single_member_groups_are_not_parenthesised() {
    let c = columns(1)[0];
    let f = Filter::and(vec![Filter::equal(c, 1i64)]);
    assert_eq!(render(&f), "t.c0 = $1");
    assert_eq!(render(&Filter::and(vec![])), "");
}

#[test]
fn nested_groups_number_in_order() {
    let cols = columns(3);
    let f = Filter::and(vec![
        Filter::equal(cols[0], "active"),
        Filter::or(vec![
            Filter::equal(cols[1], "admin"),
            Filter::and(vec![
                Filter::equal(cols[1], "user"),
                Filter::greater(cols[2], 100i32),
            ]),
        ]),
    ]);
    assert_eq!(f.value_count(), 8);
    assert_eq!(
        render(&f),
        "(t.c0 = $1 AND (t.c1 = $2 OR (t.c1 = $3 AND t.c2 > $4)))"
    );
}

#[test]
fn not_null_in_and_truthiness() {
    let cols = columns(2);
    assert_eq!(render(&Filter::null(cols[0])), "t.c0 IS NULL");
    assert_eq!(render(&Filter::not_null(cols[0])), "t.c0 IS NOT NULL");
    assert_eq!(render(&Filter::is_true(cols[1])), "t.c1");
    assert_eq!(render(&Filter::is_false(cols[1])), "NOT t.c1");
    assert_eq!(
        render(&Filter::not(Filter::and(vec![
            Filter::equal(cols[0], 1i64),
            Filter::equal(cols[1], 2i64),
        ]))),
        "NOT (t.c0 = $1 AND t.c1 = $2)"
    );

    let f = Filter::in_list(cols[0], [1i64, 2, 3]).unwrap();
    assert_eq!(f.value_count(), 4);
    assert_eq!(render(&f), "t.c0 IN ($1, $2, $3)");
}

#[test]
fn empty_in_list_is_rejected() {
    let c = columns(1)[0];
    let err = Filter::in_list(c, Vec::<i64>::new()).unwrap_err();
    assert_eq!(err, PlanError::EmptyInList);
}

#[test]
fn add_promotes_leaf_filters_to_groups() {
    let cols = columns(2);
    let mut f = Filter::equal(cols[0], 1i64);
    f.add(Filter::equal(cols[1], 2i64));
    assert_eq!(render(&f), "(t.c0 = $1 AND t.c1 = $2)");

    let mut or = Filter::or(vec![Filter::null(cols[0])]);
    or.add(Filter::null(cols[1]));
    assert_eq!(render(&or), "(t.c0 IS NULL OR t.c1 IS NULL)");
}

#[test]
fn wrappers_render_around_resolved_values() {
    let cols = columns(2);
    assert_eq!(render(&Filter::equal(lower(cols[0]), "bob")), "lower(t.c0) = $1");
    assert_eq!(
        render(&Filter::equal(cast(cols[0], "text"), upper("x"))),
        "CAST(t.c0 AS text) = upper($1)"
    );
    assert_eq!(
        render(&Filter::equal(coalesce([cols[0], cols[1]]), 0i64)),
        "COALESCE(t.c0, t.c1) = $1"
    );
    assert!(lower(cols[0]).references_column());
    assert!(!lower("x").references_column());
}

#[test]
fn case_when_consumes_condition_values_first() {
    let cols = columns(2);
    let expr = case_when(Filter::greater(cols[0], 10i64), "big")
        .when(Filter::null(cols[1]), "unknown")
        .otherwise("small")
        .into_operand();
    let f = Filter::equal(expr, "big");
    assert_eq!(
        render(&f),
        "CASE WHEN t.c0 > $1 THEN $2 WHEN t.c1 IS NULL THEN $3 ELSE $4 END = $5"
    );
}

#[test]
fn join_clause_omits_empty_on() {
    let cols = columns(2);
    let mut join = JoinFilter::new(JoinKind::LeftOuter, "\"people\"".into(), Some("\"p\"".into()));
    assert_eq!(join.join_clause(&[]), "LEFT OUTER JOIN \"people\" AS \"p\"");

    join.add(Filter::equal(cols[0], cols[1]));
    let values = resolve(&join.actual_values());
    assert_eq!(
        join.join_clause(&values),
        "LEFT OUTER JOIN \"people\" AS \"p\" ON t.c0 = t.c1"
    );
    assert_eq!(join.from_item(), "\"people\" AS \"p\"");
}
