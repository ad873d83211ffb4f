//! With：把一组命名子查询绑定到随后构建的 SELECT / INSERT / UPDATE / DELETE。

use crate::clauses::Field;
use crate::context::Context;
use crate::delete::Delete;
use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::insert::Insert;
use crate::relation::Table;
use crate::select::{Select, select};
use crate::subquery::Subquery;
use crate::update::Update;

/// WITH 列表。
#[derive(Debug, Clone, PartialEq)]
pub struct With {
    subqueries: Vec<Subquery>,
}

/// 创建 WITH 列表，至少需要一个子查询。
pub fn with(subqueries: impl IntoIterator<Item = Subquery>) -> Result<With> {
    let subqueries: Vec<Subquery> = subqueries.into_iter().collect();
    if subqueries.is_empty() {
        return Err(Error::Empty("WITH list"));
    }
    Ok(With { subqueries })
}

impl With {
    pub fn subqueries(&self) -> &[Subquery] {
        &self.subqueries
    }

    pub fn select<T: Into<Expr>>(&self, columns: impl IntoIterator<Item = T>) -> Select {
        select(columns).with_subqueries(self.subqueries.clone())
    }

    pub fn insert<F: Into<Field>>(
        &self,
        table: &Table,
        columns: impl IntoIterator<Item = F>,
    ) -> Result<Insert> {
        Ok(Insert::new(table, columns)?.with_subqueries(self.subqueries.clone()))
    }

    pub fn update(&self, table: &Table) -> Update {
        Update::new(table).with_subqueries(self.subqueries.clone())
    }

    pub fn delete(&self, table: &Table) -> Delete {
        Delete::new(table).with_subqueries(self.subqueries.clone())
    }
}

/// `WITH a AS (…), b AS MATERIALIZED (…)`，同时登记到本次编译的 CTE 表中。
pub(crate) fn render_with(subqueries: &[Subquery], ctx: &mut Context) -> Result<String> {
    ctx.bind_cte(subqueries)?;
    let mut parts = Vec::with_capacity(subqueries.len());
    for sq in subqueries {
        parts.push(sq.render_with(ctx)?);
    }
    Ok(format!("WITH {}", parts.join(", ")))
}
