//! halo-pgsql：把不可变的表达式 / 语句树编译成 PostgreSQL 语句与绑定参数。

pub mod args;
mod brackets;
pub mod builder;
pub mod clauses;
pub mod cond;
mod context;
pub mod cte;
pub mod delete;
pub mod error;
pub mod expr;
pub mod flavor;
pub mod func;
pub mod insert;
#[cfg(test)]
mod insert_tests;
pub mod macros;
pub mod marks;
pub mod relation;
pub mod select;
#[cfg(test)]
mod select_more_tests;
pub mod subquery;
pub mod union;
pub mod update;
pub mod value;

pub use crate::args::{Args, BoundArgs};
pub use crate::builder::{Builder, Compiled, Statement, compile};
pub use crate::clauses::Field;
pub use crate::context::Context;
pub use crate::cte::{With, with};
pub use crate::delete::{Delete, delete_from};
pub use crate::error::{Error, Result};
pub use crate::expr::{
    Case, Expr, and, array, exists, lit, lit_tuple, lit_value, not, null, or, param, raw, star,
    tuple,
};
pub use crate::flavor::{
    DefaultFlavorGuard, Flavor, default_flavor, set_default_flavor, set_default_flavor_scoped,
};
pub use crate::func::{Func, Over, func};
pub use crate::insert::{Insert, OnConflict, insert};
pub use crate::marks::{Marked, Marks, Nulls, Order};
pub use crate::relation::{Column, Relation, Table, excluded, excluded_of};
pub use crate::select::{JoinKind, Select, select};
pub use crate::subquery::Subquery;
pub use crate::union::UnionKind;
pub use crate::update::{Update, update};
pub use crate::value::{Scalar, SqlValue};

/// 常用 trait 的便捷导入：`use halo_pgsql::prelude::*;`
pub mod prelude {
    pub use crate::builder::Builder;
    pub use crate::marks::Marked;
}
