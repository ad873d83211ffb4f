//! Delete：构建 DELETE 语句。

use crate::clauses::{render_returning, render_where};
use crate::context::Context;
use crate::error::Result;
use crate::expr::Expr;
use crate::relation::{Relation, Table};
use crate::subquery::Subquery;

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    table: Table,
    with: Vec<Subquery>,
    where_: Vec<Expr>,
    returning: Vec<Expr>,
}

pub fn delete_from(table: &Table) -> Delete {
    Delete::new(table)
}

impl Delete {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            with: Vec::new(),
            where_: Vec::new(),
            returning: Vec::new(),
        }
    }

    pub(crate) fn with_subqueries(self, subqueries: Vec<Subquery>) -> Self {
        Self {
            with: subqueries,
            ..self
        }
    }

    /// 追加 WHERE 谓词。
    pub fn where_<T: Into<Expr>>(&self, predicates: impl IntoIterator<Item = T>) -> Self {
        let mut d = self.clone();
        d.where_.extend(predicates.into_iter().map(Into::into));
        d
    }

    pub fn returning<T: Into<Expr>>(&self, items: impl IntoIterator<Item = T>) -> Self {
        Self {
            returning: items.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    pub fn subquery(&self, alias: impl Into<String>) -> Result<Subquery> {
        Subquery::new(self.clone(), alias)
    }

    pub(crate) fn render(&self, ctx: &mut Context) -> Result<String> {
        let mut parts = Vec::new();
        if !self.with.is_empty() {
            parts.push(crate::cte::render_with(&self.with, ctx)?);
        }
        let target = Relation::from(&self.table).render_from(ctx)?;
        parts.push(format!("DELETE FROM {target}"));
        if let Some(w) = render_where(&self.where_, ctx)? {
            parts.push(w);
        }
        if !self.returning.is_empty() {
            parts.push(render_returning(&self.returning, ctx)?);
        }
        Ok(parts.join(" "))
    }
}
