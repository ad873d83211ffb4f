//! 宏集合：接受不同类型的可变参数，统一转换成 `Expr` 后交给对应的构造函数。
//!
//! 例如 `select![t.column("id"), 1, "a"]` 中列、整数、字符串混用，无需手动写 `Expr::from`。

#[doc(hidden)]
#[macro_export]
macro_rules! __collect_exprs {
    () => {
        Vec::<$crate::Expr>::new()
    };
    ($($value:expr),+ $(,)?) => {{
        let mut values = Vec::<$crate::Expr>::new();
        $(
            values.push($crate::Expr::from($value));
        )*
        values
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __builder_with_exprs {
    ($builder:expr, $method:ident $(, $arg:expr)* $(,)?) => {
        $builder.$method($crate::__collect_exprs!($($arg),*))
    };
}

/// `Vec<Expr>`，例如 VALUES 的一行。
#[macro_export]
macro_rules! exprs {
    ($($value:expr),* $(,)?) => {
        $crate::__collect_exprs!($($value),*)
    };
}

/// `SELECT …`
#[macro_export]
macro_rules! select {
    ($($value:expr),* $(,)?) => {
        $crate::select($crate::__collect_exprs!($($value),*))
    };
}

#[macro_export]
macro_rules! and {
    ($($value:expr),* $(,)?) => {
        $crate::and($crate::__collect_exprs!($($value),*))
    };
}

#[macro_export]
macro_rules! or {
    ($($value:expr),* $(,)?) => {
        $crate::or($crate::__collect_exprs!($($value),*))
    };
}

/// `NAME(args)`
#[macro_export]
macro_rules! func {
    ($name:expr $(, $value:expr)* $(,)?) => {
        $crate::func($name, $crate::__collect_exprs!($($value),*))
    };
}

#[macro_export]
macro_rules! array {
    ($($value:expr),* $(,)?) => {
        $crate::array($crate::__collect_exprs!($($value),*))
    };
}

#[macro_export]
macro_rules! tuple {
    ($($value:expr),* $(,)?) => {
        $crate::tuple($crate::__collect_exprs!($($value),*))
    };
}

/// `builder.where_(…)`
#[macro_export]
macro_rules! where_exprs {
    ($builder:expr $(, $value:expr)* $(,)?) => {
        $crate::__builder_with_exprs!($builder, where_ $(, $value)*)
    };
}

/// `builder.order_by(…)`
#[macro_export]
macro_rules! order_by_cols {
    ($builder:expr $(, $value:expr)* $(,)?) => {
        $crate::__builder_with_exprs!($builder, order_by $(, $value)*)
    };
}

/// `builder.returning(…)`
#[macro_export]
macro_rules! returning_cols {
    ($builder:expr $(, $value:expr)* $(,)?) => {
        $crate::__builder_with_exprs!($builder, returning $(, $value)*)
    };
}
