//! 装饰（Marks）：cast / alias / distinct / 排序方向 / NULLS 位置。

use crate::brackets;
use crate::context::Context;

/// 排序方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    Asc,
    Desc,
}

/// NULL 值在排序中的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nulls {
    First,
    Last,
}

/// 一个节点上的装饰；每个槽位只保留最后一次设置的值。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Marks {
    pub(crate) cast: Option<String>,
    pub(crate) alias: Option<String>,
    pub(crate) distinct: bool,
    pub(crate) order: Option<Order>,
    pub(crate) nulls: Option<Nulls>,
}

impl Marks {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn cast(&self) -> Option<&str> {
        self.cast.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn distinct(&self) -> bool {
        self.distinct
    }

    pub fn order(&self) -> Option<Order> {
        self.order
    }

    pub fn nulls(&self) -> Option<Nulls> {
        self.nulls
    }

    /// 依次套上 cast、alias、DISTINCT、排序与 NULLS 后缀。
    pub(crate) fn apply(&self, value: String, ctx: &Context) -> String {
        let mut value = value;
        if let Some(to) = &self.cast {
            value = brackets::cast(value, to, ctx.flags().force_cast_brackets);
        }
        if let Some(alias) = &self.alias {
            value = format!("{value} AS {alias}");
        }
        if self.distinct {
            value = format!("DISTINCT {value}");
        }
        self.order_suffix(value)
    }

    fn order_suffix(&self, mut value: String) -> String {
        match self.order {
            Some(Order::Asc) => value.push_str(" ASC"),
            Some(Order::Desc) => value.push_str(" DESC"),
            None => {}
        }
        match self.nulls {
            Some(Nulls::First) => value.push_str(" NULLS FIRST"),
            Some(Nulls::Last) => value.push_str(" NULLS LAST"),
            None => {}
        }
        value
    }

    /// 仅别名模式（GROUP BY / ORDER BY）下，带别名的节点只输出别名和排序后缀。
    pub(crate) fn alias_only(&self, ctx: &Context) -> Option<String> {
        if !ctx.flags().alias_only {
            return None;
        }
        let alias = self.alias.clone()?;
        Some(self.order_suffix(alias))
    }
}

/// 可装饰的节点。所有方法都返回新节点，原节点保持不变。
pub trait Marked: Clone {
    fn marks(&self) -> &Marks;

    fn marks_mut(&mut self) -> &mut Marks;

    /// `::to`
    fn cast(&self, to: impl Into<String>) -> Self {
        let mut node = self.clone();
        node.marks_mut().cast = Some(to.into());
        node
    }

    /// `AS alias`
    fn as_(&self, alias: impl Into<String>) -> Self {
        let mut node = self.clone();
        node.marks_mut().alias = Some(alias.into());
        node
    }

    fn distinct(&self) -> Self {
        let mut node = self.clone();
        node.marks_mut().distinct = true;
        node
    }

    fn asc(&self) -> Self {
        let mut node = self.clone();
        node.marks_mut().order = Some(Order::Asc);
        node
    }

    fn desc(&self) -> Self {
        let mut node = self.clone();
        node.marks_mut().order = Some(Order::Desc);
        node
    }

    fn nulls_first(&self) -> Self {
        let mut node = self.clone();
        node.marks_mut().nulls = Some(Nulls::First);
        node
    }

    fn nulls_last(&self) -> Self {
        let mut node = self.clone();
        node.marks_mut().nulls = Some(Nulls::Last);
        node
    }
}
