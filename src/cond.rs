//! 运算节点：比较、算术、IN、BETWEEN、ANY、LIKE、自定义运算符与数组下标。

use crate::brackets;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::expr::{Expr, ExprKind};
use crate::select::Select;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operator {
    /// `=` / `!=`，遇到 NULL / 布尔值时换成 `IS` / `IS NOT`。
    Equality {
        eq: &'static str,
        is: &'static str,
    },
    Math(&'static str),
    Any,
    Like(&'static str),
    Custom(String),
}

/// 二元运算。
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Operation {
    left: Expr,
    right: Expr,
    op: Operator,
}

impl Operation {
    fn expr(left: &Expr, op: Operator, right: Expr) -> Expr {
        Expr::new(ExprKind::Operation(Self {
            left: left.clone(),
            right,
            op,
        }))
    }

    pub(crate) fn render(&self, ctx: &mut Context) -> Result<String> {
        let left = self.left.render_member(ctx)?;
        match &self.op {
            Operator::Equality { eq, is } => {
                let op = if self.left.is_null_or_bool_value() || self.right.is_null_or_bool_value() {
                    is
                } else {
                    eq
                };
                let right = self.right.render_member(ctx)?;
                Ok(format!("{left} {op} {right}"))
            }
            Operator::Math(op) => {
                let right = self.right.render_member(ctx)?;
                Ok(format!("{left} {op} {right}"))
            }
            Operator::Any => {
                let right = self.right.render_operand(ctx)?;
                Ok(format!("{left} = ANY({right})"))
            }
            Operator::Like(op) => {
                let right = self.right.render_operand(ctx)?;
                Ok(format!("{left} {op} {right}"))
            }
            Operator::Custom(op) => {
                let right = self.right.render_operand(ctx)?;
                Ok(format!("{left} {op} {right}"))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum InItems {
    List(Vec<Expr>),
    Select(Select),
}

/// `left [NOT] IN (…)`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InList {
    left: Expr,
    items: InItems,
    negated: bool,
}

impl InList {
    fn expr(left: &Expr, items: InItems, negated: bool) -> Expr {
        Expr::new(ExprKind::In(Self {
            left: left.clone(),
            items,
            negated,
        }))
    }

    fn list<T: Into<Expr>>(
        left: &Expr,
        items: impl IntoIterator<Item = T>,
        negated: bool,
    ) -> Result<Expr> {
        let items: Vec<Expr> = items.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return Err(Error::Empty("IN list"));
        }
        Ok(Self::expr(left, InItems::List(items), negated))
    }

    pub(crate) fn render(&self, ctx: &mut Context) -> Result<String> {
        let left = self.left.render_member(ctx)?;
        let op = if self.negated { "NOT IN" } else { "IN" };
        let items = match &self.items {
            InItems::List(items) => crate::expr::render_list(items, ctx)?,
            InItems::Select(select) => select.render(ctx)?,
        };
        Ok(format!("{left} {op} ({items})"))
    }
}

/// `left BETWEEN start AND end`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Between {
    left: Expr,
    start: Expr,
    end: Expr,
}

impl Between {
    pub(crate) fn render(&self, ctx: &mut Context) -> Result<String> {
        let left = self.left.render_member(ctx)?;
        let start = self.start.render_operand(ctx)?;
        let end = self.end.render_operand(ctx)?;
        Ok(format!("{left} BETWEEN {start} AND {end}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Index {
    At(Expr),
    Slice(Option<Expr>, Option<Expr>),
}

/// 数组下标 / 切片；主体按 cast 的括号规则处理。
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Subscript {
    base: Expr,
    index: Index,
}

impl Subscript {
    pub(crate) fn at(base: Expr, index: Expr) -> Expr {
        Expr::new(ExprKind::Subscript(Self {
            base,
            index: Index::At(index),
        }))
    }

    pub(crate) fn slice(base: Expr, start: Option<Expr>, end: Option<Expr>) -> Expr {
        Expr::new(ExprKind::Subscript(Self {
            base,
            index: Index::Slice(start, end),
        }))
    }

    pub(crate) fn render(&self, ctx: &mut Context) -> Result<String> {
        let base = self.base.render_required(ctx, "subscript base")?;
        let base = if brackets::needs_wrapping(&base) {
            brackets::wrap(&base)
        } else {
            base
        };
        let index = match &self.index {
            Index::At(i) => i.render_required(ctx, "subscript")?,
            Index::Slice(start, end) => {
                let start = match start {
                    Some(e) => e.render_required(ctx, "slice start")?,
                    None => String::new(),
                };
                let end = match end {
                    Some(e) => e.render_required(ctx, "slice end")?,
                    None => String::new(),
                };
                format!("{start}:{end}")
            }
        };
        Ok(format!("{base}[{index}]"))
    }
}

impl Expr {
    /// `=`（NULL / 布尔值时为 `IS`）
    pub fn equal(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Equality { eq: "=", is: "IS" }, right.into())
    }

    /// `!=`（NULL / 布尔值时为 `IS NOT`）
    pub fn not_equal(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(
            self,
            Operator::Equality {
                eq: "!=",
                is: "IS NOT",
            },
            right.into(),
        )
    }

    pub fn greater_than(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Math(">"), right.into())
    }

    pub fn greater_equal_than(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Math(">="), right.into())
    }

    pub fn less_than(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Math("<"), right.into())
    }

    pub fn less_equal_than(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Math("<="), right.into())
    }

    pub fn plus(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Math("+"), right.into())
    }

    pub fn minus(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Math("-"), right.into())
    }

    pub fn times(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Math("*"), right.into())
    }

    pub fn divide(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Math("/"), right.into())
    }

    pub fn is(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Math("IS"), right.into())
    }

    pub fn is_not(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Math("IS NOT"), right.into())
    }

    /// `IN (a, b, …)`；列表不能为空。
    pub fn in_<T: Into<Expr>>(&self, items: impl IntoIterator<Item = T>) -> Result<Expr> {
        InList::list(self, items, false)
    }

    /// `NOT IN (a, b, …)`；列表不能为空。
    pub fn not_in<T: Into<Expr>>(&self, items: impl IntoIterator<Item = T>) -> Result<Expr> {
        InList::list(self, items, true)
    }

    /// `IN (SELECT …)`
    pub fn in_select(&self, select: &Select) -> Expr {
        InList::expr(self, InItems::Select(select.clone()), false)
    }

    /// `NOT IN (SELECT …)`
    pub fn not_in_select(&self, select: &Select) -> Expr {
        InList::expr(self, InItems::Select(select.clone()), true)
    }

    /// `= ANY(right)`
    pub fn any(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Any, right.into())
    }

    pub fn between(&self, start: impl Into<Expr>, end: impl Into<Expr>) -> Expr {
        Expr::new(ExprKind::Between(Between {
            left: self.clone(),
            start: start.into(),
            end: end.into(),
        }))
    }

    pub fn like(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Like("LIKE"), right.into())
    }

    pub fn ilike(&self, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Like("ILIKE"), right.into())
    }

    /// 任意二元运算符，例如 `->`、`#>`、`at time zone`。
    pub fn op(&self, operator: impl Into<String>, right: impl Into<Expr>) -> Expr {
        Operation::expr(self, Operator::Custom(operator.into()), right.into())
    }
}
