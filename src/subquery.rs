//! Subquery：给语句命名，用在 FROM / JOIN 中或作为 WITH 列表的成员。

use std::sync::Arc;

use crate::builder::Statement;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::relation::Relation;

/// 命名子查询。相等性按结构比较。
#[derive(Debug, Clone, PartialEq)]
pub struct Subquery {
    statement: Arc<Statement>,
    alias: String,
    materialized: bool,
}

impl Subquery {
    /// 包装任意语句；SELECT 自身的 cast / alias 会被去掉。
    pub fn new(statement: impl Into<Statement>, alias: impl Into<String>) -> Result<Self> {
        let alias = alias.into();
        if alias.is_empty() {
            return Err(Error::Empty("subquery alias"));
        }
        let statement = match statement.into() {
            Statement::Select(s) => Statement::Select(s.without_decorations()),
            other => other,
        };
        Ok(Self {
            statement: Arc::new(statement),
            alias,
            materialized: false,
        })
    }

    /// 换一个别名，同时重置 MATERIALIZED。
    pub fn as_(&self, alias: impl Into<String>) -> Result<Self> {
        let alias = alias.into();
        if alias.is_empty() {
            return Err(Error::Empty("subquery alias"));
        }
        Ok(Self {
            statement: Arc::clone(&self.statement),
            alias,
            materialized: false,
        })
    }

    /// WITH 中输出 `AS MATERIALIZED`。
    pub fn materialized(&self, materialized: bool) -> Self {
        Self {
            materialized,
            ..self.clone()
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn column(&self, name: impl Into<String>) -> Expr {
        Relation::Subquery(self.clone()).column(name)
    }

    pub fn star(&self) -> Expr {
        self.column("*")
    }

    /// `(stmt) AS alias`
    pub(crate) fn render_from(&self, ctx: &mut Context) -> Result<String> {
        let sql = self.statement.render(ctx)?;
        Ok(format!("({sql}) AS {}", self.alias))
    }

    /// `alias AS [MATERIALIZED] (stmt)`
    pub(crate) fn render_with(&self, ctx: &mut Context) -> Result<String> {
        let sql = self.statement.render(ctx)?;
        let materialized = if self.materialized { " MATERIALIZED" } else { "" };
        Ok(format!("{} AS{materialized} ({sql})", self.alias))
    }
}
