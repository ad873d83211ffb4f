//! 占位符风格（Flavor）：决定参数在 SQL 中写成 `$N` 还是 `%(pN)s`。

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

/// 参数占位符风格。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flavor {
    /// `$1, $2, …`，参数按出现顺序组成列表。
    #[default]
    Positional,
    /// `%(p1)s, %(p2)s, …`，参数按名字组成映射。
    Named,
}

static DEFAULT_FLAVOR: AtomicU8 = AtomicU8::new(Flavor::Positional as u8);
static DEFAULT_FLAVOR_LOCK: Mutex<()> = Mutex::new(());

impl Flavor {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Named,
            _ => Self::Positional,
        }
    }

    fn to_u8(self) -> u8 {
        self as u8
    }

    /// 第 `index` 个参数（从 1 开始）的名字：`p1`、`p2` …
    pub fn param_name(index: usize) -> String {
        format!("p{index}")
    }

    /// 第 `index` 个参数（从 1 开始）在 SQL 中的占位符。
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Self::Positional => format!("${index}"),
            Self::Named => format!("%({})s", Self::param_name(index)),
        }
    }
}

/// `Builder::build` 使用的占位符风格，初始为 `Positional`。
pub fn default_flavor() -> Flavor {
    Flavor::from_u8(DEFAULT_FLAVOR.load(Ordering::Relaxed))
}

/// 替换进程级默认风格，返回被替换的值。`compile` 不受影响。
pub fn set_default_flavor(flavor: Flavor) -> Flavor {
    Flavor::from_u8(DEFAULT_FLAVOR.swap(flavor.to_u8(), Ordering::Relaxed))
}

/// 临时默认风格的持有者：drop 时写回之前的风格并释放锁。
/// 同一时刻只能有一个 guard 存活。
pub struct DefaultFlavorGuard {
    _lock: MutexGuard<'static, ()>,
    previous: Flavor,
}

impl Drop for DefaultFlavorGuard {
    fn drop(&mut self) {
        set_default_flavor(self.previous);
    }
}

/// 把默认风格改成 `flavor`，直到返回的 guard 被 drop。
pub fn set_default_flavor_scoped(flavor: Flavor) -> DefaultFlavorGuard {
    let lock = DEFAULT_FLAVOR_LOCK
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    let previous = set_default_flavor(flavor);
    DefaultFlavorGuard {
        _lock: lock,
        previous,
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Positional => "positional",
            Self::Named => "named",
        };
        f.write_str(s)
    }
}
