//! 编译入口：`compile` 把表达式或语句树渲染成 SQL 文本和绑定参数。
//!
//! 每次调用都创建独立的 [`Context`]，调用之间不共享任何状态。

use tracing::debug;

use crate::args::BoundArgs;
use crate::context::Context;
use crate::delete::Delete;
use crate::error::Result;
use crate::expr::{Case, Expr};
use crate::flavor::{Flavor, default_flavor};
use crate::func::Func;
use crate::insert::Insert;
use crate::select::Select;
use crate::subquery::Subquery;
use crate::update::Update;

/// 编译结果：SQL（空的 AND / OR 时为 `None`）与参数。
pub type Compiled = (Option<String>, BoundArgs);

/// 可作为 `compile` 根节点的类型。
pub trait Builder {
    /// 在给定上下文里渲染自身。
    fn write_sql(&self, ctx: &mut Context) -> Result<Option<String>>;

    /// 日志里使用的节点类别。
    fn kind(&self) -> &'static str {
        "expression"
    }

    /// 使用全局默认 Flavor 编译。
    fn build(&self) -> Result<Compiled> {
        compile(self, default_flavor())
    }

    fn build_with_flavor(&self, flavor: Flavor) -> Result<Compiled> {
        compile(self, flavor)
    }
}

/// Compile：以 `flavor` 的占位符风格编译 `root`。
///
/// 出错时整次调用失败，不返回部分 SQL。
pub fn compile<B: Builder + ?Sized>(root: &B, flavor: Flavor) -> Result<Compiled> {
    let mut ctx = Context::new(flavor);
    match root.write_sql(&mut ctx) {
        Ok(sql) => {
            let args = ctx.into_args().into_bound();
            debug!(
                kind = root.kind(),
                %flavor,
                args = args.len(),
                empty = sql.is_none(),
                "compiled"
            );
            Ok((sql, args))
        }
        Err(err) => {
            debug!(kind = root.kind(), %flavor, error = %err, "compile failed");
            Err(err)
        }
    }
}

/// 四类 SQL 语句。
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    pub fn subquery(&self, alias: impl Into<String>) -> Result<Subquery> {
        Subquery::new(self.clone(), alias)
    }

    pub(crate) fn render(&self, ctx: &mut Context) -> Result<String> {
        match self {
            Self::Select(s) => s.render(ctx),
            Self::Insert(s) => s.render(ctx),
            Self::Update(s) => s.render(ctx),
            Self::Delete(s) => s.render(ctx),
        }
    }
}

impl From<Select> for Statement {
    fn from(v: Select) -> Self {
        Self::Select(v)
    }
}

impl From<Insert> for Statement {
    fn from(v: Insert) -> Self {
        Self::Insert(v)
    }
}

impl From<Update> for Statement {
    fn from(v: Update) -> Self {
        Self::Update(v)
    }
}

impl From<Delete> for Statement {
    fn from(v: Delete) -> Self {
        Self::Delete(v)
    }
}

impl Builder for Expr {
    fn write_sql(&self, ctx: &mut Context) -> Result<Option<String>> {
        self.render(ctx)
    }
}

impl Builder for Func {
    fn write_sql(&self, ctx: &mut Context) -> Result<Option<String>> {
        Expr::from(self).render(ctx)
    }
}

impl Builder for Case {
    fn write_sql(&self, ctx: &mut Context) -> Result<Option<String>> {
        Expr::from(self.clone()).render(ctx)
    }
}

impl Builder for Statement {
    fn write_sql(&self, ctx: &mut Context) -> Result<Option<String>> {
        self.render(ctx).map(Some)
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

impl Builder for Subquery {
    fn write_sql(&self, ctx: &mut Context) -> Result<Option<String>> {
        self.render_from(ctx).map(Some)
    }

    fn kind(&self) -> &'static str {
        "subquery"
    }
}

macro_rules! impl_statement_builder {
    ($($t:ty => $kind:literal),* $(,)?) => {
        $(
            impl Builder for $t {
                fn write_sql(&self, ctx: &mut Context) -> Result<Option<String>> {
                    self.render(ctx).map(Some)
                }

                fn kind(&self) -> &'static str {
                    $kind
                }
            }
        )*
    };
}

impl_statement_builder!(
    Select => "select",
    Insert => "insert",
    Update => "update",
    Delete => "delete",
);
