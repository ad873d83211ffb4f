//! Select：构建 SELECT 语句（WITH / DISTINCT ON / FROM / JOIN / WHERE / GROUP BY /
//! HAVING / ORDER BY / LIMIT / OFFSET / UNION）。

use crate::brackets;
use crate::clauses::{render_from, render_predicates, render_where};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::expr::{Expr, ExprKind, lit, render_list};
use crate::relation::Relation;
use crate::subquery::Subquery;
use crate::union::{Union, UnionKind};
use crate::value::SqlValue;

/// JOIN 类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "JOIN",
            Self::Left => "LEFT JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Join {
    kind: JoinKind,
    relation: Relation,
    on: Expr,
    lateral: bool,
}

impl Join {
    fn new(kind: JoinKind, relation: Relation, on: Expr, lateral: bool) -> Self {
        // `ON true` 写成字面量而不是参数
        let on = match &*on.kind {
            ExprKind::Param(SqlValue::Bool(true)) if on.marks.is_empty() => lit(true),
            _ => on,
        };
        Self {
            kind,
            relation,
            on,
            lateral,
        }
    }

    fn render(&self, ctx: &mut Context) -> Result<String> {
        let cte = ctx.is_cte(&self.relation);
        let mut sql = self.kind.as_sql().to_string();
        if self.lateral {
            if cte {
                return Err(Error::LateralCte(self.relation.qualifier()));
            }
            sql.push_str(" LATERAL");
        }
        let target = if cte {
            self.relation.qualifier()
        } else {
            self.relation.render_from(ctx)?
        };
        // ON 中的列总是带前缀
        let on = ctx.with_tables(Vec::new(), |ctx| {
            self.on.render_required(ctx, "JOIN condition")
        })?;
        Ok(format!("{sql} {target} ON {on}"))
    }
}

/// SELECT 语句。所有方法都返回新的 Select，原值不变。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    columns: Vec<Expr>,
    with: Vec<Subquery>,
    from: Vec<Relation>,
    joins: Vec<Join>,
    where_: Vec<Expr>,
    group_by: Vec<Expr>,
    having: Vec<Expr>,
    distinct_on: Vec<Expr>,
    order_by: Vec<Expr>,
    limit: Option<Expr>,
    offset: Option<Expr>,
    unions: Vec<Union>,
    cast: Option<String>,
    alias: Option<String>,
}

/// `SELECT columns`。列清单在编译时校验不能为空。
pub fn select<T: Into<Expr>>(columns: impl IntoIterator<Item = T>) -> Select {
    Select {
        columns: columns.into_iter().map(Into::into).collect(),
        ..Select::default()
    }
}

impl Select {
    pub(crate) fn with_subqueries(&self, subqueries: Vec<Subquery>) -> Self {
        Self {
            with: subqueries,
            ..self.clone()
        }
    }

    /// 没有 cast 与 alias，作为值使用时需要外层括号。
    pub(crate) fn is_bare(&self) -> bool {
        self.cast.is_none() && self.alias.is_none()
    }

    pub(crate) fn without_decorations(self) -> Self {
        Self {
            cast: None,
            alias: None,
            ..self
        }
    }

    pub fn add_columns<T: Into<Expr>>(&self, columns: impl IntoIterator<Item = T>) -> Self {
        let mut s = self.clone();
        s.columns.extend(columns.into_iter().map(Into::into));
        s
    }

    /// 每个选择列的输出名：别名，其次是列名，都没有时为 `None`。
    pub fn columns_names(&self) -> Vec<Option<String>> {
        self.columns
            .iter()
            .map(|c| {
                if let Some(alias) = c.marks.alias() {
                    return Some(alias.to_string());
                }
                if let Some(col) = c.as_column() {
                    return Some(col.name().to_string());
                }
                c.as_select().and_then(|s| s.alias.clone())
            })
            .collect()
    }

    /// 设置 FROM（替换之前的设置）。
    pub fn from<T: Into<Relation>>(&self, relations: impl IntoIterator<Item = T>) -> Self {
        Self {
            from: relations.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    fn push_join(&self, kind: JoinKind, relation: Relation, on: Expr, lateral: bool) -> Self {
        let mut s = self.clone();
        s.joins.push(Join::new(kind, relation, on, lateral));
        s
    }

    pub fn join(&self, relation: impl Into<Relation>, on: impl Into<Expr>) -> Self {
        self.push_join(JoinKind::Inner, relation.into(), on.into(), false)
    }

    pub fn left_join(&self, relation: impl Into<Relation>, on: impl Into<Expr>) -> Self {
        self.push_join(JoinKind::Left, relation.into(), on.into(), false)
    }

    pub fn join_lateral(&self, relation: impl Into<Relation>, on: impl Into<Expr>) -> Self {
        self.push_join(JoinKind::Inner, relation.into(), on.into(), true)
    }

    pub fn left_join_lateral(&self, relation: impl Into<Relation>, on: impl Into<Expr>) -> Self {
        self.push_join(JoinKind::Left, relation.into(), on.into(), true)
    }

    /// 追加 WHERE 谓词，多个谓词用 AND 连接。
    pub fn where_<T: Into<Expr>>(&self, predicates: impl IntoIterator<Item = T>) -> Self {
        let mut s = self.clone();
        s.where_.extend(predicates.into_iter().map(Into::into));
        s
    }

    /// GROUP BY 只能设置一次。
    pub fn group_by<T: Into<Expr>>(&self, items: impl IntoIterator<Item = T>) -> Result<Self> {
        if !self.group_by.is_empty() {
            return Err(Error::GroupByAlreadySet);
        }
        Ok(Self {
            group_by: items.into_iter().map(Into::into).collect(),
            ..self.clone()
        })
    }

    /// 追加 HAVING 谓词。
    pub fn having<T: Into<Expr>>(&self, predicates: impl IntoIterator<Item = T>) -> Self {
        let mut s = self.clone();
        s.having.extend(predicates.into_iter().map(Into::into));
        s
    }

    /// `SELECT DISTINCT ON (…)`（替换之前的设置）。
    pub fn distinct_on<T: Into<Expr>>(&self, items: impl IntoIterator<Item = T>) -> Self {
        Self {
            distinct_on: items.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    /// 追加 ORDER BY 项。
    pub fn order_by<T: Into<Expr>>(&self, items: impl IntoIterator<Item = T>) -> Self {
        let mut s = self.clone();
        s.order_by.extend(items.into_iter().map(Into::into));
        s
    }

    pub fn clear_order_by(&self) -> Self {
        Self {
            order_by: Vec::new(),
            ..self.clone()
        }
    }

    pub fn limit(&self, value: impl Into<Expr>) -> Self {
        Self {
            limit: Some(value.into()),
            ..self.clone()
        }
    }

    pub fn clear_limit(&self) -> Self {
        Self {
            limit: None,
            ..self.clone()
        }
    }

    pub fn offset(&self, value: impl Into<Expr>) -> Self {
        Self {
            offset: Some(value.into()),
            ..self.clone()
        }
    }

    pub fn clear_offset(&self) -> Self {
        Self {
            offset: None,
            ..self.clone()
        }
    }

    pub fn union(&self, other: &Select) -> Self {
        let mut s = self.clone();
        s.unions.push(Union::new(UnionKind::Distinct, other.clone()));
        s
    }

    pub fn union_all(&self, other: &Select) -> Self {
        let mut s = self.clone();
        s.unions.push(Union::new(UnionKind::All, other.clone()));
        s
    }

    /// 整条语句 `::to`。
    pub fn cast(&self, to: impl Into<String>) -> Self {
        Self {
            cast: Some(to.into()),
            ..self.clone()
        }
    }

    /// 整条语句 `(…) AS alias`，用作选择列。
    pub fn as_(&self, alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            ..self.clone()
        }
    }

    pub fn subquery(&self, alias: impl Into<String>) -> Result<Subquery> {
        Subquery::new(self.clone(), alias)
    }

    fn visible_tables(&self) -> Vec<Relation> {
        self.from
            .iter()
            .cloned()
            .chain(self.joins.iter().map(|j| j.relation.clone()))
            .collect()
    }

    pub(crate) fn render(&self, ctx: &mut Context) -> Result<String> {
        if self.columns.is_empty() {
            return Err(Error::Empty("SELECT column list"));
        }
        let mut sql = ctx.scoped(|f| f.alias_only = false, |ctx| self.render_body(ctx))?;
        if let Some(to) = &self.cast {
            sql = brackets::cast(sql, to, ctx.flags().force_cast_brackets);
        }
        if let Some(alias) = &self.alias {
            sql = format!("({sql}) AS {alias}");
        }
        Ok(sql)
    }

    fn render_body(&self, ctx: &mut Context) -> Result<String> {
        let mut parts = Vec::new();

        if !self.with.is_empty() {
            parts.push(crate::cte::render_with(&self.with, ctx)?);
        }

        let tables = self.visible_tables();
        let head = ctx.with_tables(tables.clone(), |ctx| -> Result<String> {
            let mut head = String::from("SELECT");
            if !self.distinct_on.is_empty() {
                head = format!("SELECT DISTINCT ON ({})", render_list(&self.distinct_on, ctx)?);
            }
            let mut columns = Vec::with_capacity(self.columns.len());
            for c in &self.columns {
                columns.push(c.render_item(ctx)?);
            }
            Ok(format!("{head} {}", columns.join(", ")))
        })?;
        parts.push(head);

        if !self.from.is_empty() {
            parts.push(render_from(&self.from, ctx)?);
        }
        for join in &self.joins {
            parts.push(join.render(ctx)?);
        }

        ctx.with_tables(tables, |ctx| -> Result<()> {
            if let Some(w) = render_where(&self.where_, ctx)? {
                parts.push(w);
            }
            if !self.group_by.is_empty() {
                let items = ctx.scoped(
                    |f| f.alias_only = true,
                    |ctx| render_list(&self.group_by, ctx),
                )?;
                parts.push(format!("GROUP BY {items}"));
            }
            if let Some(h) = render_predicates(&self.having, ctx)? {
                parts.push(format!("HAVING {h}"));
            }
            if !self.order_by.is_empty() {
                let items = ctx.scoped(
                    |f| f.alias_only = true,
                    |ctx| render_list(&self.order_by, ctx),
                )?;
                parts.push(format!("ORDER BY {items}"));
            }
            if let Some(limit) = &self.limit {
                parts.push(format!("LIMIT {}", limit.render_required(ctx, "LIMIT")?));
            }
            if let Some(offset) = &self.offset {
                parts.push(format!("OFFSET {}", offset.render_required(ctx, "OFFSET")?));
            }
            Ok(())
        })?;

        for union in &self.unions {
            parts.push(union.render(ctx)?);
        }

        Ok(parts.join(" "))
    }
}
