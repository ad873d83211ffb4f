//! SQL 值类型：参数绑定的值，也是内联字面量的来源。

use std::borrow::Cow;
use time::macros::format_description;

/// SQL 值。
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(Cow<'static, str>),
    Bytes(Vec<u8>),
    Date(time::Date),
    DateTime(time::PrimitiveDateTime),
    Array(Vec<SqlValue>),
}

impl SqlValue {
    /// 将 `Option<T>` 映射为 `SqlValue`：`None => Null`，`Some(v) => v.into()`。
    pub fn from_option<T: Into<SqlValue>>(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// 比较运算遇到 NULL / 布尔值时改写成 `IS` / `IS NOT`。
    pub(crate) fn is_null_or_bool(&self) -> bool {
        matches!(self, Self::Null | Self::Bool(_))
    }

    /// 能否内联成字面量；数组只允许一层、且元素都是标量。
    pub fn is_literal_kind(&self) -> bool {
        match self {
            Self::Bytes(_) => false,
            Self::Array(items) => !items.is_empty() && items.iter().all(Self::is_scalar_literal),
            _ => true,
        }
    }

    fn is_scalar_literal(&self) -> bool {
        !matches!(self, Self::Bytes(_) | Self::Array(_))
    }

    /// 内联字面量的 SQL 文本，不支持的类型返回 `None`。
    pub(crate) fn literal_sql(&self) -> Option<String> {
        let sql = match self {
            Self::Null => "NULL".to_string(),
            Self::Bool(true) => "TRUE".to_string(),
            Self::Bool(false) => "FALSE".to_string(),
            Self::I64(v) => v.to_string(),
            Self::U64(v) => v.to_string(),
            Self::F64(v) => v.to_string(),
            Self::String(s) => quote(s),
            Self::Date(d) => quote(&format_date(d)?),
            Self::DateTime(dt) => quote(&format_datetime(dt)?),
            Self::Array(items) => {
                if !self.is_literal_kind() {
                    return None;
                }
                let items = items
                    .iter()
                    .map(Self::literal_sql)
                    .collect::<Option<Vec<_>>>()?;
                format!("ARRAY[{}]", items.join(", "))
            }
            Self::Bytes(_) => return None,
        };
        Some(sql)
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn format_date(d: &time::Date) -> Option<String> {
    d.format(format_description!("[year]-[month]-[day]")).ok()
}

fn format_datetime(dt: &time::PrimitiveDateTime) -> Option<String> {
    if dt.nanosecond() == 0 {
        dt.format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .ok()
    } else {
        dt.format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]"
        ))
        .ok()
    }
}

impl From<()> for SqlValue {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i8> for SqlValue {
    fn from(v: i8) -> Self {
        Self::I64(v as i64)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        Self::I64(v as i64)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::I64(v as i64)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<u16> for SqlValue {
    fn from(v: u16) -> Self {
        Self::U64(v as u64)
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        Self::U64(v as u64)
    }
}

impl From<u64> for SqlValue {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        Self::F64(v as f64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::String(Cow::Owned(v))
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        Self::String(Cow::Owned(v.clone()))
    }
}

impl From<&'static str> for SqlValue {
    fn from(v: &'static str) -> Self {
        Self::String(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<time::Date> for SqlValue {
    fn from(v: time::Date) -> Self {
        Self::Date(v)
    }
}

impl From<time::PrimitiveDateTime> for SqlValue {
    fn from(v: time::PrimitiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        Self::from_option(v)
    }
}

/// 可以直接内联成字面量的标量类型。
pub trait Scalar: Into<SqlValue> {}

macro_rules! impl_scalar {
    ($($t:ty),* $(,)?) => {
        $(impl Scalar for $t {})*
    };
}

impl_scalar!(
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
);

impl<T: Scalar> Scalar for Option<T> {}

macro_rules! impl_from_vec {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<Vec<$t>> for SqlValue {
                fn from(v: Vec<$t>) -> Self {
                    Self::Array(v.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

impl_from_vec!(
    bool,
    i16,
    i32,
    i64,
    u32,
    u64,
    f64,
    String,
    &'static str,
    time::Date,
    time::PrimitiveDateTime,
    SqlValue,
);
