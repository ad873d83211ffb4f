//! 各语句共用的子句：WHERE、FROM、SET、RETURNING，以及列名 / 表达式二选一的 Field。

use crate::context::Context;
use crate::error::Result;
use crate::expr::{Expr, render_conjunction};
use crate::relation::Relation;

/// INSERT 列清单、SET 左侧与 ON CONFLICT 索引元素：普通名字或表达式。
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Name(String),
    Expr(Expr),
}

impl Field {
    /// 表达式在“列不带前缀”的作用域里渲染，名字原样输出。
    pub(crate) fn render(&self, ctx: &mut Context) -> Result<String> {
        match self {
            Self::Name(name) => Ok(name.clone()),
            Self::Expr(e) => ctx.scoped(
                |f| f.disable_table_in_column = true,
                |ctx| e.render_required(ctx, "field"),
            ),
        }
    }
}

impl From<&str> for Field {
    fn from(v: &str) -> Self {
        Self::Name(v.to_string())
    }
}

impl From<String> for Field {
    fn from(v: String) -> Self {
        Self::Name(v)
    }
}

impl From<Expr> for Field {
    fn from(v: Expr) -> Self {
        Self::Expr(v)
    }
}

impl From<&Expr> for Field {
    fn from(v: &Expr) -> Self {
        Self::Expr(v.clone())
    }
}

/// 多个谓词用 AND 连接；全部为空时返回 `None`。
pub(crate) fn render_predicates(predicates: &[Expr], ctx: &mut Context) -> Result<Option<String>> {
    if predicates.is_empty() {
        return Ok(None);
    }
    render_conjunction(predicates, " AND ", ctx)
}

pub(crate) fn render_where(predicates: &[Expr], ctx: &mut Context) -> Result<Option<String>> {
    Ok(render_predicates(predicates, ctx)?.map(|p| format!("WHERE {p}")))
}

/// `FROM a, b`；已登记的 CTE 只输出别名。
pub(crate) fn render_from(relations: &[Relation], ctx: &mut Context) -> Result<String> {
    let mut parts = Vec::with_capacity(relations.len());
    for relation in relations {
        if ctx.is_cte(relation) {
            parts.push(relation.qualifier());
        } else {
            parts.push(relation.render_from(ctx)?);
        }
    }
    Ok(format!("FROM {}", parts.join(", ")))
}

/// `SET a = x, b = y`
pub(crate) fn render_set(assignments: &[(Field, Expr)], ctx: &mut Context) -> Result<String> {
    let mut parts = Vec::with_capacity(assignments.len());
    for (field, value) in assignments {
        let field = field.render(ctx)?;
        let value = value.render_required(ctx, "SET value")?;
        parts.push(format!("{field} = {value}"));
    }
    Ok(format!("SET {}", parts.join(", ")))
}

/// `RETURNING a, b`
pub(crate) fn render_returning(items: &[Expr], ctx: &mut Context) -> Result<String> {
    Ok(format!("RETURNING {}", crate::expr::render_list(items, ctx)?))
}
