//! UNION / UNION ALL：把右侧 SELECT 原样拼接在左侧语句之后。

use crate::context::Context;
use crate::error::Result;
use crate::select::Select;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnionKind {
    Distinct,
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Union {
    kind: UnionKind,
    select: Select,
}

impl Union {
    pub(crate) fn new(kind: UnionKind, select: Select) -> Self {
        Self { kind, select }
    }

    pub(crate) fn render(&self, ctx: &mut Context) -> Result<String> {
        let keyword = match self.kind {
            UnionKind::Distinct => "UNION",
            UnionKind::All => "UNION ALL",
        };
        Ok(format!("{keyword} {}", self.select.render(ctx)?))
    }
}
