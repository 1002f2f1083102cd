// Predicate Expression Tree
//
// A closed set of expression nodes (column reference, literal value and
// binary predicate) and the combinators that build WHERE conditions.
// Construction never fails; names are resolved when the tree is rendered.

use std::fmt;
use std::ops;

use crate::common::types::DataValue;

/// Operators a predicate can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Lt,
    Gt,
    And,
    Or,
    Not,
}

impl Op {
    /// SQL token for this operator
    pub fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::And => "AND",
            Op::Or => "OR",
            Op::Not => "NOT",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Reference to an entity field, by its declared name
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
}

/// Shorthand for [`Column::new`]
pub fn col(name: impl Into<String>) -> Column {
    Column::new(name)
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Column { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `column = value`
    pub fn eq(self, value: impl Into<DataValue>) -> Predicate {
        self.compare(Op::Eq, value.into())
    }

    /// `column < value`
    pub fn lt(self, value: impl Into<DataValue>) -> Predicate {
        self.compare(Op::Lt, value.into())
    }

    /// `column > value`
    pub fn gt(self, value: impl Into<DataValue>) -> Predicate {
        self.compare(Op::Gt, value.into())
    }

    fn compare(self, op: Op, value: DataValue) -> Predicate {
        Predicate {
            left: Some(Box::new(Expression::Column(self))),
            op,
            right: Box::new(Expression::Value(value)),
        }
    }
}

/// Binary predicate; `NOT` leaves `left` empty
#[derive(Debug, Clone)]
pub struct Predicate {
    pub(crate) left: Option<Box<Expression>>,
    pub(crate) op: Op,
    pub(crate) right: Box<Expression>,
}

impl Predicate {
    pub fn op(&self) -> Op {
        self.op
    }

    pub fn left(&self) -> Option<&Expression> {
        self.left.as_deref()
    }

    pub fn right(&self) -> &Expression {
        &self.right
    }

    pub fn and(self, other: Predicate) -> Predicate {
        Predicate {
            left: Some(Box::new(Expression::Predicate(self))),
            op: Op::And,
            right: Box::new(Expression::Predicate(other)),
        }
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Predicate {
            left: Some(Box::new(Expression::Predicate(self))),
            op: Op::Or,
            right: Box::new(Expression::Predicate(other)),
        }
    }
}

/// `NOT predicate`
pub fn not(predicate: Predicate) -> Predicate {
    Predicate {
        left: None,
        op: Op::Not,
        right: Box::new(Expression::Predicate(predicate)),
    }
}

impl ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        not(self)
    }
}

/// Any node of the expression tree
#[derive(Debug, Clone)]
pub enum Expression {
    Column(Column),
    Value(DataValue),
    Predicate(Predicate),
}

impl Expression {
    pub fn is_predicate(&self) -> bool {
        matches!(self, Expression::Predicate(_))
    }
}

impl From<Column> for Expression {
    fn from(column: Column) -> Self {
        Expression::Column(column)
    }
}

impl From<Predicate> for Expression {
    fn from(predicate: Predicate) -> Self {
        Expression::Predicate(predicate)
    }
}

impl From<DataValue> for Expression {
    fn from(value: DataValue) -> Self {
        Expression::Value(value)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Column(c) => write!(f, "{}", c.name),
            Expression::Value(v) => write!(f, "{}", v),
            Expression::Predicate(p) => {
                match &p.left {
                    Some(left) => write!(f, "({}) {} ({})", left, p.op, p.right),
                    None => write!(f, "{} ({})", p.op, p.right),
                }
            }
        }
    }
}

/// Fold several predicates into one left-leaning `AND` tree
pub fn fold_and(predicates: &[Predicate]) -> Option<Predicate> {
    let mut iter = predicates.iter().cloned();
    let first = iter.next()?;
    Some(iter.fold(first, Predicate::and))
}
