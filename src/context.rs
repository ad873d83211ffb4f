//! 编译上下文：一次 `compile` 调用私有的参数收集器、CTE 登记与作用域标志。

use crate::args::Args;
use crate::error::{Error, Result};
use crate::flavor::Flavor;
use crate::relation::Relation;
use crate::subquery::Subquery;
use crate::value::SqlValue;

/// 作用域标志，进入子作用域时整体保存、退出时恢复。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Flags {
    /// 每个 cast 外面再包一层括号（ON CONFLICT 索引元素）。
    pub force_cast_brackets: bool,
    /// 列不带关系名前缀（INSERT 列清单、SET 左侧等）。
    pub disable_table_in_column: bool,
    /// 带别名的节点只输出别名（GROUP BY / ORDER BY）。
    pub alias_only: bool,
}

/// 编译上下文。由 `compile` 创建，沿着渲染调用以 `&mut` 传递，调用结束即丢弃。
#[derive(Debug)]
pub struct Context {
    args: Args,
    cte: Option<Vec<Subquery>>,
    tables: Vec<Relation>,
    flags: Flags,
}

impl Context {
    pub(crate) fn new(flavor: Flavor) -> Self {
        Self {
            args: Args::new(flavor),
            cte: None,
            tables: Vec::new(),
            flags: Flags::default(),
        }
    }

    /// 绑定一个参数并返回占位符。
    pub(crate) fn bind(&mut self, value: &SqlValue) -> String {
        self.args.add(value.clone())
    }

    pub(crate) fn flags(&self) -> Flags {
        self.flags
    }

    /// 在修改过标志的作用域里执行 `f`，结束后恢复原标志。
    pub(crate) fn scoped<R>(
        &mut self,
        update: impl FnOnce(&mut Flags),
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = self.flags;
        update(&mut self.flags);
        let out = f(self);
        self.flags = saved;
        out
    }

    /// 在“可见关系”为 `tables` 的作用域里执行 `f`。
    pub(crate) fn with_tables<R>(
        &mut self,
        tables: Vec<Relation>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = std::mem::replace(&mut self.tables, tables);
        let out = f(self);
        self.tables = saved;
        out
    }

    pub(crate) fn tables(&self) -> &[Relation] {
        &self.tables
    }

    /// 登记 WITH 列表；一次编译只允许登记一次，登记后持续到编译结束。
    pub(crate) fn bind_cte(&mut self, subqueries: &[Subquery]) -> Result<()> {
        if self.cte.is_some() {
            return Err(Error::NestedWith);
        }
        self.cte = Some(subqueries.to_vec());
        Ok(())
    }

    /// 关系是否是已登记的 CTE（按结构相等比较）。
    pub(crate) fn is_cte(&self, relation: &Relation) -> bool {
        match (relation, &self.cte) {
            (Relation::Subquery(sq), Some(cte)) => cte.contains(sq),
            _ => false,
        }
    }

    pub(crate) fn into_args(self) -> Args {
        self.args
    }
}
