//! Expr：不可变的表达式节点（字面量、参数、列、原始片段、运算、函数、CASE、数组 / 元组、标量子查询）。
//!
//! 节点之间通过 `Arc` 共享，`clone` 只复制引用；所有变换都返回新节点。

use std::sync::Arc;

use crate::brackets;
use crate::cond::{Between, InList, Operation, Subscript};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::func::Func;
use crate::marks::{Marked, Marks};
use crate::relation::Column;
use crate::select::Select;
use crate::value::{Scalar, SqlValue};

/// 表达式节点。
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub(crate) kind: Arc<ExprKind>,
    pub(crate) marks: Marks,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ExprKind {
    Literal(SqlValue),
    Param(SqlValue),
    Column(Column),
    Raw(String),
    Operation(Operation),
    In(InList),
    Between(Between),
    Subscript(Subscript),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Expr),
    Exists(Expr),
    Func(Func),
    Case(Case),
    Array(Vec<Expr>),
    Tuple(Vec<Expr>),
    Select(Select),
}

impl Marked for Expr {
    fn marks(&self) -> &Marks {
        &self.marks
    }

    fn marks_mut(&mut self) -> &mut Marks {
        &mut self.marks
    }
}

impl Expr {
    pub(crate) fn new(kind: ExprKind) -> Self {
        Self {
            kind: Arc::new(kind),
            marks: Marks::default(),
        }
    }

    /// 是否是比较 / 算术 / ANY / LIKE / 自定义运算符节点（IN 与 BETWEEN 不算）。
    pub fn is_operation(&self) -> bool {
        matches!(*self.kind, ExprKind::Operation(_))
    }

    pub(crate) fn is_conjunction(&self) -> bool {
        matches!(*self.kind, ExprKind::And(_) | ExprKind::Or(_))
    }

    pub(crate) fn is_select(&self) -> bool {
        matches!(*self.kind, ExprKind::Select(_))
    }

    pub(crate) fn as_column(&self) -> Option<&Column> {
        match &*self.kind {
            ExprKind::Column(c) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn as_select(&self) -> Option<&Select> {
        match &*self.kind {
            ExprKind::Select(s) => Some(s),
            _ => None,
        }
    }

    /// 字面量 / 参数且值为 NULL 或布尔。
    pub(crate) fn is_null_or_bool_value(&self) -> bool {
        match &*self.kind {
            ExprKind::Literal(v) | ExprKind::Param(v) => v.is_null_or_bool(),
            _ => false,
        }
    }

    /// 渲染节点；空的 AND / OR 返回 `None`。
    pub(crate) fn render(&self, ctx: &mut Context) -> Result<Option<String>> {
        if let ExprKind::And(items) | ExprKind::Or(items) = &*self.kind {
            if items.is_empty() {
                return Ok(None);
            }
        }
        if let Some(alias) = self.marks.alias_only(ctx) {
            return Ok(Some(alias));
        }

        let text = match &*self.kind {
            ExprKind::Literal(v) => Some(
                v.literal_sql()
                    .ok_or_else(|| Error::UnhandledLiteral(v.clone()))?,
            ),
            ExprKind::Param(v) => Some(ctx.bind(v)),
            ExprKind::Column(c) => Some(c.render(ctx)),
            ExprKind::Raw(s) => Some(s.clone()),
            ExprKind::Operation(op) => Some(op.render(ctx)?),
            ExprKind::In(x) => Some(x.render(ctx)?),
            ExprKind::Between(x) => Some(x.render(ctx)?),
            ExprKind::Subscript(x) => Some(x.render(ctx)?),
            ExprKind::And(items) => render_conjunction(items, " AND ", ctx)?,
            ExprKind::Or(items) => render_conjunction(items, " OR ", ctx)?,
            ExprKind::Not(inner) => {
                let sql = inner.render_required(ctx, "NOT operand")?;
                Some(if inner.is_operation() {
                    format!("NOT {sql}")
                } else {
                    format!("NOT ({sql})")
                })
            }
            ExprKind::Exists(inner) => Some(format!(
                "EXISTS ({})",
                inner.render_required(ctx, "EXISTS operand")?
            )),
            ExprKind::Func(f) => Some(f.render(ctx)?),
            ExprKind::Case(c) => Some(c.render(ctx)?),
            ExprKind::Array(items) => Some(format!("ARRAY[{}]", render_list(items, ctx)?)),
            ExprKind::Tuple(items) => Some(format!("({})", render_list(items, ctx)?)),
            ExprKind::Select(s) => {
                let sql = s.render(ctx)?;
                Some(if self.marks.is_empty() {
                    sql
                } else {
                    brackets::wrap(&sql)
                })
            }
        };
        Ok(text.map(|t| self.marks.apply(t, ctx)))
    }

    pub(crate) fn render_required(&self, ctx: &mut Context, what: &'static str) -> Result<String> {
        self.render(ctx)?.ok_or(Error::EmptyExpression(what))
    }

    /// 作为运算数：未加括号的运算节点和子查询补一对括号。
    pub(crate) fn render_operand(&self, ctx: &mut Context) -> Result<String> {
        let sql = self.render_required(ctx, "operand")?;
        if (self.is_operation() && !brackets::is_parenthesized(&sql)) || self.is_select() {
            Ok(brackets::wrap(&sql))
        } else {
            Ok(sql)
        }
    }

    /// 作为二元运算的成员：AND / OR 总是再加一层括号。
    pub(crate) fn render_member(&self, ctx: &mut Context) -> Result<String> {
        let sql = self.render_operand(ctx)?;
        if self.is_conjunction() {
            Ok(brackets::wrap(&sql))
        } else {
            Ok(sql)
        }
    }

    /// 选择列 / 函数参数：没有 cast 与 alias 的子查询需要括号。
    pub(crate) fn render_item(&self, ctx: &mut Context) -> Result<String> {
        let sql = self.render_required(ctx, "select item")?;
        match self.as_select() {
            Some(s) if self.marks.is_empty() && s.is_bare() => Ok(brackets::wrap(&sql)),
            _ => Ok(sql),
        }
    }

    /// 数组下标 `expr[index]`。
    pub fn at(&self, index: impl Into<Expr>) -> Expr {
        Subscript::at(self.clone(), index.into())
    }

    /// 数组切片 `expr[start:end]`，两端都可省略。
    pub fn slice(&self, start: Option<Expr>, end: Option<Expr>) -> Expr {
        Subscript::slice(self.clone(), start, end)
    }
}

/// 依次渲染并用 `, ` 连接。
pub(crate) fn render_list(items: &[Expr], ctx: &mut Context) -> Result<String> {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        parts.push(item.render_required(ctx, "list item")?);
    }
    Ok(parts.join(", "))
}

/// AND / OR 的主体：单个成员原样输出，多个成员时 OR 成员加括号、空成员跳过。
pub(crate) fn render_conjunction(
    items: &[Expr],
    sep: &str,
    ctx: &mut Context,
) -> Result<Option<String>> {
    if items.len() == 1 {
        return items[0].render(ctx);
    }
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        if let Some(sql) = item.render(ctx)? {
            if matches!(*item.kind, ExprKind::Or(_)) {
                parts.push(brackets::wrap(&sql));
            } else {
                parts.push(sql);
            }
        }
    }
    if parts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(parts.join(sep)))
    }
}

/// CASE WHEN … THEN … [ELSE …] END
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    whens: Vec<(Expr, Expr)>,
    else_: Option<Expr>,
}

impl Case {
    /// 至少需要一个 WHEN 分支。
    pub fn new<C, V>(whens: impl IntoIterator<Item = (C, V)>) -> Result<Self>
    where
        C: Into<Expr>,
        V: Into<Expr>,
    {
        let whens: Vec<(Expr, Expr)> = whens
            .into_iter()
            .map(|(c, v)| (c.into(), v.into()))
            .collect();
        if whens.is_empty() {
            return Err(Error::Empty("CASE"));
        }
        Ok(Self { whens, else_: None })
    }

    pub fn else_(&self, value: impl Into<Expr>) -> Self {
        Self {
            whens: self.whens.clone(),
            else_: Some(value.into()),
        }
    }

    fn render(&self, ctx: &mut Context) -> Result<String> {
        let mut parts = Vec::with_capacity(self.whens.len() + 1);
        for (cond, value) in &self.whens {
            let cond = cond.render_required(ctx, "CASE condition")?;
            let value = value.render_required(ctx, "CASE value")?;
            parts.push(format!("WHEN {cond} THEN {value}"));
        }
        if let Some(value) = &self.else_ {
            parts.push(format!("ELSE {}", value.render_required(ctx, "CASE value")?));
        }
        Ok(format!("CASE {} END", parts.join(" ")))
    }
}

/// 内联字面量，只接受标量类型；数组用 [`lit_tuple`]。
pub fn lit(value: impl Scalar) -> Expr {
    Expr::new(ExprKind::Literal(value.into()))
}

/// 运行期才知道类型的值作为字面量：数组按 [`lit_tuple`] 校验，bytes 不能内联。
pub fn lit_value(value: SqlValue) -> Result<Expr> {
    match value {
        SqlValue::Array(items) => lit_tuple(items),
        v @ SqlValue::Bytes(_) => Err(Error::UnsupportedLiteral(vec![v])),
        v => Ok(Expr::new(ExprKind::Literal(v))),
    }
}

/// 内联元组字面量 `ARRAY[…]`，构造时即校验：不能为空，元素必须是可内联的标量。
pub fn lit_tuple<T: Into<SqlValue>>(items: impl IntoIterator<Item = T>) -> Result<Expr> {
    let items: Vec<SqlValue> = items.into_iter().map(Into::into).collect();
    if items.is_empty() {
        return Err(Error::Empty("tuple literal"));
    }
    let bad: Vec<SqlValue> = items
        .iter()
        .filter(|v| matches!(v, SqlValue::Bytes(_) | SqlValue::Array(_)))
        .cloned()
        .collect();
    if !bad.is_empty() {
        return Err(Error::UnsupportedLiteral(bad));
    }
    Ok(Expr::new(ExprKind::Literal(SqlValue::Array(items))))
}

/// NULL 字面量。
pub fn null() -> Expr {
    lit(())
}

/// 绑定参数。值在构造时被复制进节点。
pub fn param(value: impl Into<SqlValue>) -> Expr {
    Expr::new(ExprKind::Param(value.into()))
}

/// 原样输出的 SQL 片段。
pub fn raw(sql: impl Into<String>) -> Expr {
    Expr::new(ExprKind::Raw(sql.into()))
}

/// `*`
pub fn star() -> Expr {
    raw("*")
}

pub fn and<T: Into<Expr>>(items: impl IntoIterator<Item = T>) -> Expr {
    Expr::new(ExprKind::And(items.into_iter().map(Into::into).collect()))
}

pub fn or<T: Into<Expr>>(items: impl IntoIterator<Item = T>) -> Expr {
    Expr::new(ExprKind::Or(items.into_iter().map(Into::into).collect()))
}

pub fn not(inner: impl Into<Expr>) -> Expr {
    Expr::new(ExprKind::Not(inner.into()))
}

pub fn exists(inner: impl Into<Expr>) -> Expr {
    Expr::new(ExprKind::Exists(inner.into()))
}

/// `ARRAY[a, b, …]`
pub fn array<T: Into<Expr>>(items: impl IntoIterator<Item = T>) -> Expr {
    Expr::new(ExprKind::Array(items.into_iter().map(Into::into).collect()))
}

/// `(a, b, …)`
pub fn tuple<T: Into<Expr>>(items: impl IntoIterator<Item = T>) -> Expr {
    Expr::new(ExprKind::Tuple(items.into_iter().map(Into::into).collect()))
}

impl From<&Expr> for Expr {
    fn from(v: &Expr) -> Self {
        v.clone()
    }
}

impl From<Case> for Expr {
    fn from(v: Case) -> Self {
        Expr::new(ExprKind::Case(v))
    }
}

impl From<Select> for Expr {
    fn from(v: Select) -> Self {
        Expr::new(ExprKind::Select(v))
    }
}

impl From<&Select> for Expr {
    fn from(v: &Select) -> Self {
        Expr::new(ExprKind::Select(v.clone()))
    }
}

impl From<SqlValue> for Expr {
    fn from(v: SqlValue) -> Self {
        param(v)
    }
}

macro_rules! impl_param_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Expr {
                fn from(v: $t) -> Self {
                    param(v)
                }
            }
        )*
    };
}

impl_param_from!(
    (),
    bool,
    i8,
    i16,
    i32,
    i64,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    &String,
    &'static str,
    time::Date,
    time::PrimitiveDateTime,
    Vec<u8>,
    Vec<bool>,
    Vec<i16>,
    Vec<i32>,
    Vec<i64>,
    Vec<u32>,
    Vec<u64>,
    Vec<f64>,
    Vec<String>,
    Vec<&'static str>,
    Vec<SqlValue>,
);
