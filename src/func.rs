//! Func：函数调用 `NAME(args)`，支持聚合内 ORDER BY、窗口 OVER 与 FILTER。

use crate::context::Context;
use crate::error::Result;
use crate::expr::{Expr, ExprKind, render_conjunction};
use crate::marks::{Marked, Marks};

/// 函数调用。名字统一转为大写。
#[derive(Debug, Clone, PartialEq)]
pub struct Func {
    name: String,
    params: Vec<Expr>,
    over: Option<Over>,
    filter: Vec<Expr>,
    order_by: Vec<Expr>,
    marks: Marks,
}

/// 窗口定义 `OVER (PARTITION BY … ORDER BY …)`。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Over {
    partition_by: Vec<Expr>,
    order_by: Vec<Expr>,
}

impl Over {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition_by<T: Into<Expr>>(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.partition_by = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_by<T: Into<Expr>>(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.order_by = items.into_iter().map(Into::into).collect();
        self
    }

    fn render(&self, ctx: &mut Context) -> Result<String> {
        let mut parts = Vec::new();
        if !self.partition_by.is_empty() {
            parts.push(format!(
                "PARTITION BY {}",
                crate::expr::render_list(&self.partition_by, ctx)?
            ));
        }
        if !self.order_by.is_empty() {
            parts.push(format!(
                "ORDER BY {}",
                crate::expr::render_list(&self.order_by, ctx)?
            ));
        }
        Ok(format!("OVER ({})", parts.join(" ")))
    }
}

/// 构造函数调用，例如 `func("count", [star()])`。
pub fn func<T: Into<Expr>>(name: impl AsRef<str>, params: impl IntoIterator<Item = T>) -> Func {
    Func {
        name: name.as_ref().to_uppercase(),
        params: params.into_iter().map(Into::into).collect(),
        over: None,
        filter: Vec::new(),
        order_by: Vec::new(),
        marks: Marks::default(),
    }
}

impl Marked for Func {
    fn marks(&self) -> &Marks {
        &self.marks
    }

    fn marks_mut(&mut self) -> &mut Marks {
        &mut self.marks
    }
}

impl Func {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 设置窗口（替换之前的设置）。
    pub fn over(&self, over: Over) -> Self {
        let mut f = self.clone();
        f.over = Some(over);
        f
    }

    /// `FILTER (WHERE …)`，多个谓词用 AND 连接；替换之前的设置。
    pub fn filter<T: Into<Expr>>(&self, predicates: impl IntoIterator<Item = T>) -> Self {
        let mut f = self.clone();
        f.filter = predicates.into_iter().map(Into::into).collect();
        f
    }

    /// 聚合内排序 `NAME(args ORDER BY …)`，追加到已有排序之后。
    pub fn order_by<T: Into<Expr>>(&self, items: impl IntoIterator<Item = T>) -> Self {
        let mut f = self.clone();
        f.order_by.extend(items.into_iter().map(Into::into));
        f
    }

    pub fn clear_order_by(&self) -> Self {
        let mut f = self.clone();
        f.order_by.clear();
        f
    }

    pub(crate) fn render(&self, ctx: &mut Context) -> Result<String> {
        let mut args = Vec::with_capacity(self.params.len());
        for p in &self.params {
            args.push(p.render_item(ctx)?);
        }
        let mut args = args.join(", ");

        if !self.order_by.is_empty() {
            let order = ctx.scoped(
                |f| f.alias_only = true,
                |ctx| crate::expr::render_list(&self.order_by, ctx),
            )?;
            args = format!("{args} ORDER BY {order}");
        }

        let mut parts = vec![format!("{}({})", self.name, args)];
        if let Some(over) = &self.over {
            let over = ctx.scoped(|f| f.alias_only = false, |ctx| over.render(ctx))?;
            parts.push(over);
        }
        if let Some(predicate) = render_conjunction(&self.filter, " AND ", ctx)? {
            parts.push(format!("FILTER (WHERE {predicate})"));
        }
        Ok(parts.join(" "))
    }
}

impl From<Func> for Expr {
    fn from(mut f: Func) -> Self {
        let marks = std::mem::take(&mut f.marks);
        Expr {
            kind: std::sync::Arc::new(ExprKind::Func(f)),
            marks,
        }
    }
}

impl From<&Func> for Expr {
    fn from(f: &Func) -> Self {
        Expr::from(f.clone())
    }
}
