//! Update：构建 UPDATE 语句。

use crate::clauses::{Field, render_from, render_returning, render_set, render_where};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::relation::{Relation, Table};
use crate::subquery::Subquery;

/// UPDATE 语句。SET 为空时编译报错。
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    table: Table,
    with: Vec<Subquery>,
    set: Vec<(Field, Expr)>,
    from: Vec<Relation>,
    where_: Vec<Expr>,
    returning: Vec<Expr>,
}

pub fn update(table: &Table) -> Update {
    Update::new(table)
}

impl Update {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            with: Vec::new(),
            set: Vec::new(),
            from: Vec::new(),
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

    /// `SET a = x, …`（替换之前的设置）。
    pub fn set<F, V>(&self, assignments: impl IntoIterator<Item = (F, V)>) -> Self
    where
        F: Into<Field>,
        V: Into<Expr>,
    {
        Self {
            set: assignments
                .into_iter()
                .map(|(f, v)| (f.into(), v.into()))
                .collect(),
            ..self.clone()
        }
    }

    /// `FROM …`（替换之前的设置）。
    pub fn from<T: Into<Relation>>(&self, relations: impl IntoIterator<Item = T>) -> Self {
        Self {
            from: relations.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    /// 追加 WHERE 谓词。
    pub fn where_<T: Into<Expr>>(&self, predicates: impl IntoIterator<Item = T>) -> Self {
        let mut u = self.clone();
        u.where_.extend(predicates.into_iter().map(Into::into));
        u
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
        if self.set.is_empty() {
            return Err(Error::UpdateWithoutSet);
        }
        let mut parts = Vec::new();
        if !self.with.is_empty() {
            parts.push(crate::cte::render_with(&self.with, ctx)?);
        }
        let target = Relation::from(&self.table).render_from(ctx)?;
        parts.push(format!("UPDATE {target}"));
        parts.push(render_set(&self.set, ctx)?);
        if !self.from.is_empty() {
            parts.push(render_from(&self.from, ctx)?);
        }
        if let Some(w) = render_where(&self.where_, ctx)? {
            parts.push(w);
        }
        if !self.returning.is_empty() {
            parts.push(render_returning(&self.returning, ctx)?);
        }
        Ok(parts.join(" "))
    }
}
