//! Evaluate an EQL AST against a narrow view of a Neurona.

use super::ast::{Condition, Expr, Op};
use crate::model::Neurona;

/// The fields an EQL condition can address, borrowed from a `Neurona`.
pub struct NeuronaView<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub type_name: &'a str,
    pub tags: &'a [String],
    pub connections: &'a std::collections::BTreeMap<String, Vec<crate::model::Connection>>,
    pub status: Option<&'a str>,
    pub priority: Option<i32>,
    pub assignee: Option<&'a str>,
}

impl<'a> NeuronaView<'a> {
    pub fn from_neurona(n: &'a Neurona) -> Self {
        Self {
            id: &n.id,
            title: &n.title,
            type_name: n.r#type.as_str(),
            tags: &n.tags,
            connections: &n.connections,
            status: n.context.status(),
            priority: n.context.priority(),
            assignee: n.context.assignee(),
        }
    }
}

pub fn eval(expr: &Expr, view: &NeuronaView) -> bool {
    match expr {
        Expr::Condition(c) => eval_condition(c, view),
        Expr::And(l, r) => eval(l, view) && eval(r, view),
        Expr::Or(l, r) => eval(l, view) || eval(r, view),
        Expr::Not(e) => !eval(e, view),
        Expr::Group(e) => eval(e, view),
    }
}

fn eval_condition(cond: &Condition, view: &NeuronaView) -> bool {
    match cond {
        Condition::Link { conn_type, target_id } => view
            .connections
            .get(conn_type.as_str())
            .map(|edges| edges.iter().any(|e| e.target_id == *target_id))
            .unwrap_or(false),
        Condition::Field { field, op, value } => eval_field(field, *op, value, view),
    }
}

fn eval_field(field: &str, op: Op, value: &str, view: &NeuronaView) -> bool {
    match field {
        "id" => compare_str(view.id, op, value),
        "title" => compare_str(view.title, op, value),
        "type" => compare_str(view.type_name, op, value),
        "tag" => view.tags.iter().any(|t| compare_str(t, op, value)),
        "priority" => match view.priority {
            Some(p) => compare_num(p as f64, op, value),
            None => false,
        },
        "context.status" => match view.status {
            Some(s) => compare_str(s, op, value),
            None => false,
        },
        "context.priority" => match view.priority {
            Some(p) => compare_num(p as f64, op, value),
            None => false,
        },
        "context.assignee" => match view.assignee {
            Some(a) => compare_str(a, op, value),
            None => false,
        },
        // Unknown fields evaluate to false rather than error.
        _ => false,
    }
}

fn compare_str(actual: &str, op: Op, value: &str) -> bool {
    match op {
        Op::Eq => actual == value,
        Op::Neq => actual != value,
        Op::Contains => actual.contains(value),
        Op::Gt => actual > value,
        Op::Gte => actual >= value,
        Op::Lt => actual < value,
        Op::Lte => actual <= value,
    }
}

fn compare_num(actual: f64, op: Op, value: &str) -> bool {
    let Ok(value) = value.parse::<f64>() else { return false };
    match op {
        Op::Eq => actual == value,
        Op::Neq => actual != value,
        Op::Contains => false,
        Op::Gt => actual > value,
        Op::Gte => actual >= value,
        Op::Lt => actual < value,
        Op::Lte => actual <= value,
    }
}
