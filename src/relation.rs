//! 关系（FROM 来源）：表、子查询、表函数，以及 ON CONFLICT 中的 `excluded`。

use crate::context::Context;
use crate::error::{Error, Result};
use crate::expr::{Expr, ExprKind};
use crate::func::Func;
use crate::marks::Marked;
use crate::subquery::Subquery;

const RESERVED_NAMES: [&str; 2] = ["user", "role"];

/// 表，可带别名。保留字表名（`user` / `role`）自动加双引号。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table {
    name: String,
    alias: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if RESERVED_NAMES.contains(&name.as_str()) {
            format!("\"{name}\"")
        } else {
            name
        };
        Self { name, alias: None }
    }

    pub fn as_(&self, alias: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            alias: Some(alias.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// 列引用 `table.name`。
    pub fn column(&self, name: impl Into<String>) -> Expr {
        Relation::Table(self.clone()).column(name)
    }

    /// `table.*`
    pub fn star(&self) -> Expr {
        self.column("*")
    }

    fn from_sql(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS {alias}", self.name),
            None => self.name.clone(),
        }
    }
}

/// 可以出现在 FROM / JOIN 中、也可以作为列前缀的关系。
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    Table(Table),
    Subquery(Subquery),
    /// 表函数，例如 `UNNEST($1) AS x(name)`；它的列不带前缀。
    Function(Func),
    /// INSERT … ON CONFLICT 中的 `excluded` 伪表。
    Excluded,
}

impl Relation {
    pub fn function(f: Func) -> Self {
        Self::Function(f)
    }

    /// 属于本关系的列；表函数的列不带关系。
    pub fn column(&self, name: impl Into<String>) -> Expr {
        let relation = match self {
            Self::Function(_) => None,
            other => Some(other.clone()),
        };
        Expr::new(ExprKind::Column(Column {
            name: name.into(),
            relation,
        }))
    }

    pub fn star(&self) -> Expr {
        self.column("*")
    }

    /// 列前缀使用的名字：别名优先。
    pub fn qualifier(&self) -> String {
        match self {
            Self::Table(t) => t.alias.clone().unwrap_or_else(|| t.name.clone()),
            Self::Subquery(sq) => sq.alias().to_string(),
            // `w(a, b)` 形式的别名只取关系名部分
            Self::Function(f) => match f.marks().alias() {
                Some(alias) => alias.split('(').next().unwrap_or(alias).trim().to_string(),
                None => f.name().to_string(),
            },
            Self::Excluded => String::from("excluded"),
        }
    }

    /// FROM / JOIN 中的写法。
    pub(crate) fn render_from(&self, ctx: &mut Context) -> Result<String> {
        match self {
            Self::Table(t) => Ok(t.from_sql()),
            Self::Subquery(sq) => sq.render_from(ctx),
            Self::Function(f) => Expr::from(f).render_required(ctx, "table function"),
            Self::Excluded => Err(Error::ExcludedInFrom),
        }
    }
}

impl From<Table> for Relation {
    fn from(v: Table) -> Self {
        Self::Table(v)
    }
}

impl From<&Table> for Relation {
    fn from(v: &Table) -> Self {
        Self::Table(v.clone())
    }
}

impl From<Subquery> for Relation {
    fn from(v: Subquery) -> Self {
        Self::Subquery(v)
    }
}

impl From<&Subquery> for Relation {
    fn from(v: &Subquery) -> Self {
        Self::Subquery(v.clone())
    }
}

impl From<Func> for Relation {
    fn from(v: Func) -> Self {
        Self::Function(v)
    }
}

/// 列引用。
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    relation: Option<Relation>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 只有一个可见关系且正是本列所属关系时省略前缀；`excluded` 列总带前缀。
    pub(crate) fn render(&self, ctx: &Context) -> String {
        if ctx.flags().disable_table_in_column {
            return self.name.clone();
        }
        let Some(relation) = &self.relation else {
            return self.name.clone();
        };
        let bare = !matches!(relation, Relation::Excluded)
            && ctx.tables().len() == 1
            && ctx.tables()[0] == *relation;
        if bare {
            self.name.clone()
        } else {
            format!("{}.{}", relation.qualifier(), self.name)
        }
    }
}

/// `excluded.name`
pub fn excluded(name: impl Into<String>) -> Expr {
    Relation::Excluded.column(name)
}

/// 把已有的列引用改成 `excluded` 下的同名列，保留装饰。
pub fn excluded_of(column: &Expr) -> Result<Expr> {
    let Some(col) = column.as_column() else {
        return Err(Error::NotAColumn("excluded"));
    };
    let mut out = excluded(col.name.clone());
    out.marks = column.marks.clone();
    Ok(out)
}
