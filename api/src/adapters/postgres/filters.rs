//! Shared SQL building blocks for list filters

use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::ColumnTrait;

/// Escape LIKE wildcards so user input matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `LOWER(col) LIKE '%needle%'`
pub(super) fn icontains<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column.as_column_ref())))
        .like(LikeExpr::new(pattern).escape('\\'))
}

/// `col LIKE 'prefix%'`, matching the prefix literally
pub(super) fn startswith<C: ColumnTrait>(column: C, prefix: &str) -> SimpleExpr {
    let pattern = format!("{}%", escape_like(prefix));
    Expr::col(column.as_column_ref()).like(LikeExpr::new(pattern).escape('\\'))
}
