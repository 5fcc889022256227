//! Built-in SQL wrappers.

use super::operand::{IntoOperand, Operand, SqlWrapper};
use super::Filter;

/// `name(value)`.
#[derive(Debug, Clone)]
pub struct Function {
    name: String,
    value: Operand,
}

impl Function {
    pub fn new(name: impl Into<String>, value: impl IntoOperand) -> Self {
        Self {
            name: name.into(),
            value: value.into_operand(),
        }
    }
}

impl SqlWrapper for Function {
    fn actual_values(&self) -> Vec<&Operand> {
        vec![&self.value]
    }

    fn wrap_sql(&self, values: &[String]) -> String {
        format!("{}({})", self.name, values[0])
    }
}

/// `lower(value)`
pub fn lower(value: impl IntoOperand) -> Operand {
    Operand::wrap(Function::new("lower", value))
}

/// `upper(value)`
pub fn upper(value: impl IntoOperand) -> Operand {
    Operand::wrap(Function::new("upper", value))
}

/// `name(value)` for any single-argument SQL function.
pub fn function(name: impl Into<String>, value: impl IntoOperand) -> Operand {
    Operand::wrap(Function::new(name, value))
}

/// `CAST(value AS type)`.
#[derive(Debug, Clone)]
pub struct Cast {
    value: Operand,
    sql_type: String,
}

impl SqlWrapper for Cast {
    fn actual_values(&self) -> Vec<&Operand> {
        vec![&self.value]
    }

    fn wrap_sql(&self, values: &[String]) -> String {
        format!("CAST({} AS {})", values[0], self.sql_type)
    }
}

pub fn cast(value: impl IntoOperand, sql_type: impl Into<String>) -> Operand {
    Operand::wrap(Cast {
        value: value.into_operand(),
        sql_type: sql_type.into(),
    })
}

/// `COALESCE(a, b, ...)`.
#[derive(Debug, Clone)]
pub struct Coalesce {
    values: Vec<Operand>,
}

impl SqlWrapper for Coalesce {
    fn actual_values(&self) -> Vec<&Operand> {
        self.values.iter().collect()
    }

    fn wrap_sql(&self, values: &[String]) -> String {
        format!("COALESCE({})", values.join(", "))
    }
}

pub fn coalesce<V: IntoOperand>(values: impl IntoIterator<Item = V>) -> Operand {
    Operand::wrap(Coalesce {
        values: values.into_iter().map(IntoOperand::into_operand).collect(),
    })
}

/// `CASE WHEN cond THEN value ... [ELSE value] END`.
///
/// Values are resolved arm by arm: the condition's values, then the arm's
/// result, and finally the ELSE value.
#[derive(Debug, Clone)]
pub struct CaseWhen {
    arms: Vec<(Filter, Operand)>,
    otherwise: Option<Operand>,
}

impl CaseWhen {
    pub fn when(mut self, condition: Filter, then: impl IntoOperand) -> Self {
        self.arms.push((condition, then.into_operand()));
        self
    }

    pub fn otherwise(mut self, value: impl IntoOperand) -> Self {
        self.otherwise = Some(value.into_operand());
        self
    }
}

/// Start a CASE expression with its first arm.
pub fn case_when(condition: Filter, then: impl IntoOperand) -> CaseWhen {
    CaseWhen {
        arms: Vec::new(),
        otherwise: None,
    }
    .when(condition, then)
}

impl SqlWrapper for CaseWhen {
    fn actual_values(&self) -> Vec<&Operand> {
        let mut out = Vec::new();
        for (condition, then) in &self.arms {
            out.extend(condition.actual_values());
            out.push(then);
        }
        out.extend(self.otherwise.iter());
        out
    }

    fn wrap_sql(&self, values: &[String]) -> String {
        let mut sql = String::from("CASE");
        let mut offset = 0;
        for (condition, _) in &self.arms {
            let n = condition.value_count();
            sql.push_str(" WHEN ");
            sql.push_str(&condition.where_sql(&values[offset..offset + n]));
            sql.push_str(" THEN ");
            sql.push_str(&values[offset + n]);
            offset += n + 1;
        }
        if self.otherwise.is_some() {
            sql.push_str(" ELSE ");
            sql.push_str(&values[offset]);
        }
        sql.push_str(" END");
        sql
    }
}

impl IntoOperand for CaseWhen {
    fn into_operand(self) -> Operand {
        Operand::wrap(self)
    }
}
