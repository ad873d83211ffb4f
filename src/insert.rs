//! Insert：构建 INSERT 语句（VALUES 或 SELECT 来源、ON CONFLICT、RETURNING）。

use crate::brackets;
use crate::clauses::{Field, render_returning, render_set};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::relation::Table;
use crate::select::Select;
use crate::subquery::Subquery;

/// ON CONFLICT 子句。
///
/// 组合规则在 [`Insert::on_conflict`] 中校验：
/// - `constraint` 与 `index_elements` / `index_where` 互斥；
/// - `index_where` 需要 `index_elements`；
/// - `do_update` 与 `do_nothing` 必须且只能选一个。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnConflict {
    constraint: Option<String>,
    index_elements: Option<Vec<Field>>,
    index_where: Option<Expr>,
    do_update: Option<Vec<(Field, Expr)>>,
    do_nothing: bool,
}

impl OnConflict {
    pub fn new() -> Self {
        Self::default()
    }

    /// `ON CONSTRAINT name`
    pub fn constraint(&self, name: impl Into<String>) -> Self {
        Self {
            constraint: Some(name.into()),
            ..self.clone()
        }
    }

    /// `(col, (expr), …)`
    pub fn index_elements<F: Into<Field>>(&self, items: impl IntoIterator<Item = F>) -> Self {
        Self {
            index_elements: Some(items.into_iter().map(Into::into).collect()),
            ..self.clone()
        }
    }

    /// 部分索引谓词 `WHERE …`。
    pub fn index_where(&self, predicate: impl Into<Expr>) -> Self {
        Self {
            index_where: Some(predicate.into()),
            ..self.clone()
        }
    }

    /// `DO UPDATE SET …`
    pub fn do_update<F, V>(&self, assignments: impl IntoIterator<Item = (F, V)>) -> Self
    where
        F: Into<Field>,
        V: Into<Expr>,
    {
        Self {
            do_update: Some(
                assignments
                    .into_iter()
                    .map(|(f, v)| (f.into(), v.into()))
                    .collect(),
            ),
            ..self.clone()
        }
    }

    /// `DO NOTHING`
    pub fn do_nothing(&self) -> Self {
        Self {
            do_nothing: true,
            ..self.clone()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.constraint.is_some() {
            if self.index_elements.is_some() || self.index_where.is_some() {
                return Err(Error::OnConflict(
                    "constraint excludes index elements and index where",
                ));
            }
        } else if self.index_elements.is_none() && self.index_where.is_some() {
            return Err(Error::OnConflict("index where requires index elements"));
        }
        match (&self.do_update, self.do_nothing) {
            (Some(_), true) => Err(Error::OnConflict(
                "do update and do nothing are exclusive",
            )),
            (None, false) => Err(Error::OnConflict(
                "do update or do nothing must be specified",
            )),
            _ => Ok(()),
        }
    }

    fn render(&self, ctx: &mut Context) -> Result<String> {
        let mut parts = vec![String::from("ON CONFLICT")];
        if let Some(name) = &self.constraint {
            parts.push(format!("ON CONSTRAINT {name}"));
        }
        if let Some(elements) = &self.index_elements {
            let rendered = ctx.scoped(
                |f| {
                    f.force_cast_brackets = true;
                    f.disable_table_in_column = true;
                },
                |ctx| -> Result<Vec<String>> {
                    let mut out = Vec::with_capacity(elements.len());
                    for el in elements {
                        out.push(brackets::index_element(el.render(ctx)?));
                    }
                    Ok(out)
                },
            )?;
            parts.push(format!("({})", rendered.join(", ")));
        }
        if let Some(predicate) = &self.index_where {
            let predicate = ctx.scoped(
                |f| f.disable_table_in_column = true,
                |ctx| predicate.render_required(ctx, "ON CONFLICT WHERE"),
            )?;
            parts.push(format!("WHERE {predicate}"));
        }
        if let Some(assignments) = &self.do_update {
            parts.push(format!("DO UPDATE {}", render_set(assignments, ctx)?));
        }
        if self.do_nothing {
            parts.push(String::from("DO NOTHING"));
        }
        Ok(parts.join(" "))
    }
}

/// INSERT 语句。
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    table: Table,
    columns: Vec<Field>,
    with: Vec<Subquery>,
    values: Vec<Vec<Expr>>,
    select: Option<Select>,
    on_conflict: Option<OnConflict>,
    returning: Vec<Expr>,
}

/// `INSERT INTO table (columns)`；列清单不能为空。
pub fn insert<F: Into<Field>>(table: &Table, columns: impl IntoIterator<Item = F>) -> Result<Insert> {
    Insert::new(table, columns)
}

impl Insert {
    pub fn new<F: Into<Field>>(table: &Table, columns: impl IntoIterator<Item = F>) -> Result<Self> {
        let columns: Vec<Field> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(Error::Empty("INSERT column list"));
        }
        Ok(Self {
            table: table.clone(),
            columns,
            with: Vec::new(),
            values: Vec::new(),
            select: None,
            on_conflict: None,
            returning: Vec::new(),
        })
    }

    pub(crate) fn with_subqueries(self, subqueries: Vec<Subquery>) -> Self {
        Self {
            with: subqueries,
            ..self
        }
    }

    /// `VALUES (…), (…)`（替换之前的行）；每行长度必须等于列数，且不能与 SELECT 同时使用。
    pub fn values<R, T>(&self, rows: impl IntoIterator<Item = R>) -> Result<Self>
    where
        R: IntoIterator<Item = T>,
        T: Into<Expr>,
    {
        if self.select.is_some() {
            return Err(Error::ValuesWithSelect);
        }
        let rows: Vec<Vec<Expr>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(Error::ValuesArity {
                    row: i,
                    expected: self.columns.len(),
                    got: row.len(),
                });
            }
        }
        Ok(Self {
            values: rows,
            ..self.clone()
        })
    }

    /// `INSERT … SELECT …`；不能与 VALUES 同时使用。
    pub fn select(&self, select: &Select) -> Result<Self> {
        if !self.values.is_empty() {
            return Err(Error::ValuesWithSelect);
        }
        Ok(Self {
            select: Some(select.clone()),
            ..self.clone()
        })
    }

    pub fn on_conflict(&self, on_conflict: OnConflict) -> Result<Self> {
        on_conflict.validate()?;
        Ok(Self {
            on_conflict: Some(on_conflict),
            ..self.clone()
        })
    }

    /// `RETURNING …`（替换之前的设置）。
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

        let target = crate::relation::Relation::from(&self.table).render_from(ctx)?;
        let mut columns = Vec::with_capacity(self.columns.len());
        for c in &self.columns {
            columns.push(c.render(ctx)?);
        }
        parts.push(format!("INSERT INTO {target} ({})", columns.join(", ")));

        if !self.values.is_empty() {
            let mut rows = Vec::with_capacity(self.values.len());
            for row in &self.values {
                rows.push(format!("({})", crate::expr::render_list(row, ctx)?));
            }
            parts.push(format!("VALUES {}", rows.join(", ")));
        }
        if let Some(select) = &self.select {
            parts.push(select.render(ctx)?);
        }
        if let Some(on_conflict) = &self.on_conflict {
            parts.push(on_conflict.render(ctx)?);
        }
        if !self.returning.is_empty() {
            parts.push(render_returning(&self.returning, ctx)?);
        }
        Ok(parts.join(" "))
    }
}
