//! The EQL abstract syntax tree.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Neq,
    Contains,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Op {
    pub fn parse_name(s: &str) -> Option<Self> {
        Some(match s {
            "eq" => Op::Eq,
            "neq" => Op::Neq,
            "contains" => Op::Contains,
            "gt" => Op::Gt,
            "gte" => Op::Gte,
            "lt" => Op::Lt,
            "lte" => Op::Lte,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Field { field: String, op: Op, value: String },
    Link { conn_type: String, target_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Condition(Condition),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Group(Box<Expr>),
}
