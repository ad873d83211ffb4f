//! Args：编译过程中收集绑定参数，并按 Flavor 生成占位符。

use crate::flavor::{Flavor, default_flavor};
use crate::value::SqlValue;

/// Args 存储一次编译收集到的参数（按追加顺序）。
#[derive(Debug, Clone)]
pub struct Args {
    /// 占位符风格。
    pub flavor: Flavor,

    pub(crate) values: Vec<SqlValue>,
}

impl Default for Args {
    fn default() -> Self {
        Self::new(default_flavor())
    }
}

impl Args {
    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            values: Vec::new(),
        }
    }

    /// Add：追加一个参数并返回它的占位符（`$N` 或 `%(pN)s`）。
    pub fn add(&mut self, value: impl Into<SqlValue>) -> String {
        self.values.push(value.into());
        self.flavor.placeholder(self.values.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 转成最终交给驱动的参数集合。
    pub fn into_bound(self) -> BoundArgs {
        match self.flavor {
            Flavor::Positional => BoundArgs::Positional(self.values),
            Flavor::Named => BoundArgs::Named(
                self.values
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (Flavor::param_name(i + 1), v))
                    .collect(),
            ),
        }
    }
}

/// 编译产物中的参数：位置列表或 `pN -> 值` 的有序映射。
#[derive(Debug, Clone, PartialEq)]
pub enum BoundArgs {
    Positional(Vec<SqlValue>),
    Named(Vec<(String, SqlValue)>),
}

impl Default for BoundArgs {
    fn default() -> Self {
        Self::Positional(Vec::new())
    }
}

impl BoundArgs {
    pub fn len(&self) -> usize {
        match self {
            Self::Positional(v) => v.len(),
            Self::Named(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按名字取值，仅 `Named` 有效。
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        match self {
            Self::Positional(_) => None,
            Self::Named(v) => v.iter().find(|(k, _)| k == name).map(|(_, v)| v),
        }
    }

    /// 按绑定顺序返回所有值。
    pub fn values(&self) -> Vec<&SqlValue> {
        match self {
            Self::Positional(v) => v.iter().collect(),
            Self::Named(v) => v.iter().map(|(_, v)| v).collect(),
        }
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        match self {
            Self::Positional(v) => v,
            Self::Named(v) => v.into_iter().map(|(_, v)| v).collect(),
        }
    }
}
