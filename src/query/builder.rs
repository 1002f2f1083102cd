// SQL Builder
//
// Renders an expression tree into SQL text with placeholders and collects the
// bound arguments in the order their placeholders appear. One builder serves
// exactly one statement; it is dropped when the statement fails.

use crate::catalog::Model;
use crate::common::error::{OrmError, OrmResult};
use crate::common::types::DataValue;
use crate::query::ast::{fold_and, Expression, Op, Predicate};
use crate::query::dialect::Dialect;
use crate::query::types::Query;

pub struct Builder<'a> {
    sql: String,
    args: Vec<DataValue>,
    model: &'a Model,
    dialect: Dialect,
}

impl<'a> Builder<'a> {
    pub fn new(model: &'a Model, dialect: Dialect) -> Self {
        Builder {
            sql: String::with_capacity(64),
            args: Vec::new(),
            model,
            dialect,
        }
    }

    pub fn write_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    pub fn write_char(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Write an identifier wrapped in the dialect's quote character
    pub fn quote(&mut self, name: &str) {
        let q = self.dialect.quote();
        self.sql.push(q);
        self.sql.push_str(name);
        self.sql.push(q);
    }

    /// Write the table: a non-empty override is written raw (so `db.table`
    /// works), otherwise the model's table name is quoted.
    pub fn write_table(&mut self, table_override: Option<&str>) {
        match table_override {
            Some(table) if !table.is_empty() => self.sql.push_str(table),
            _ => {
                let model = self.model;
                self.quote(model.table_name());
            }
        }
    }

    /// Write ` WHERE ` and the `AND` of all predicates; nothing if empty
    pub fn build_where(&mut self, predicates: &[Predicate]) -> OrmResult<()> {
        if let Some(p) = fold_and(predicates) {
            self.sql.push_str(" WHERE ");
            self.build_predicate(&p)?;
        }
        Ok(())
    }

    pub fn build_expression(&mut self, expr: &Expression) -> OrmResult<()> {
        match expr {
            Expression::Predicate(p) => self.build_predicate(p),
            Expression::Column(c) => {
                let model = self.model;
                let field = model
                    .field(c.name())
                    .ok_or_else(|| OrmError::UnknownField(c.name().to_string()))?;
                self.quote(field.column_name());
                Ok(())
            }
            Expression::Value(v) => {
                self.args.push(v.clone());
                self.dialect.write_placeholder(&mut self.sql, self.args.len());
                Ok(())
            }
        }
    }

    fn build_predicate(&mut self, p: &Predicate) -> OrmResult<()> {
        match (&p.left, p.op) {
            (None, Op::Not) => {}
            (Some(left), op) if op != Op::Not => self.build_operand(left)?,
            _ => {
                return Err(OrmError::UnsupportedExpression(
                    Expression::Predicate(p.clone()).to_string(),
                ));
            }
        }

        self.sql.push(' ');
        self.sql.push_str(p.op.as_sql());
        self.sql.push(' ');

        self.build_operand(&p.right)
    }

    /// Sub-predicates are parenthesized, leaves are written bare
    fn build_operand(&mut self, expr: &Expression) -> OrmResult<()> {
        if expr.is_predicate() {
            self.sql.push('(');
            self.build_expression(expr)?;
            self.sql.push(')');
            Ok(())
        } else {
            self.build_expression(expr)
        }
    }

    /// Finish the statement with `;` and hand out the query
    pub fn finish(mut self) -> Query {
        self.sql.push(';');
        log::trace!("Built query: {} ({} args)", self.sql, self.args.len());
        Query::new(self.sql, self.args)
    }
}
