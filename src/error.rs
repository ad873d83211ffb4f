//! 错误类型：构造期的参数校验错误与编译期的用法错误。

use crate::value::SqlValue;

/// 构造语句或编译语句树时可能出现的错误。
///
/// 构造期错误在对应的 builder 方法里直接返回；编译期错误会让整次 `compile`
/// 失败，不会产生部分输出。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("builder {0} must not be empty")]
    Empty(&'static str),

    #[error("builder unsupported literal values: {0:?}")]
    UnsupportedLiteral(Vec<SqlValue>),

    #[error("builder expected a column reference, got {0}")]
    NotAColumn(&'static str),

    #[error("builder VALUES row {row} has {got} items, expected {expected}")]
    ValuesArity {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("builder INSERT accepts either VALUES or SELECT, not both")]
    ValuesWithSelect,

    #[error("builder invalid ON CONFLICT: {0}")]
    OnConflict(&'static str),

    #[error("builder GROUP BY is already set")]
    GroupByAlreadySet,

    #[error("builder WITH is already bound in this statement tree")]
    NestedWith,

    #[error("builder LATERAL join cannot target CTE `{0}`")]
    LateralCte(String),

    #[error("builder UPDATE requires SET")]
    UpdateWithoutSet,

    #[error("builder unhandled literal value {0:?}")]
    UnhandledLiteral(SqlValue),

    #[error("builder `excluded` cannot be used as a FROM source")]
    ExcludedInFrom,

    #[error("builder {0} rendered no SQL")]
    EmptyExpression(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
