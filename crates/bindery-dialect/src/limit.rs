use crate::{Error, Result};

/// How a dialect applies row limits and offsets to a query.
///
/// `process_sql` rewrites a finished statement; it never inspects the query
/// beyond what the strategy needs (the select keyword for `Top`, the order
/// by clause for `OffsetFetchWithOrderBy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitHandler {
    /// `limit n offset m`
    LimitOffset,

    /// `limit m, n`, with the offset first
    LimitCommaOffset,

    /// ANSI `offset m rows fetch next n rows only`
    OffsetFetch,

    /// Offset-fetch attached to the order by clause; pagination without an
    /// `order by` is rejected
    OffsetFetchWithOrderBy,

    /// `select top n`, no offset
    Top,

    /// Wrap the query in `rownum` subqueries
    Rownum,

    Unsupported,
}

impl LimitHandler {
    pub fn supports_limit(self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    pub fn supports_offset(self) -> bool {
        !matches!(self, Self::Top | Self::Unsupported)
    }

    pub fn requires_order_by(self) -> bool {
        matches!(self, Self::OffsetFetchWithOrderBy)
    }

    /// Applies the limit and offset to a statement.
    pub fn process_sql(self, sql: &str, limit: Option<u64>, offset: Option<u64>) -> Result<String> {
        if limit.is_none() && offset.is_none() {
            return Ok(sql.to_string());
        }

        match self {
            Self::LimitOffset => Ok(limit_offset(sql, limit, offset)),
            Self::LimitCommaOffset => limit_comma_offset(sql, limit, offset),
            Self::OffsetFetch => Ok(offset_fetch(sql, limit, offset)),
            Self::OffsetFetchWithOrderBy => offset_fetch_with_order_by(sql, limit, offset),
            Self::Top => top(sql, limit, offset),
            Self::Rownum => Ok(rownum(sql, limit, offset)),
            Self::Unsupported => Err(Error::unsupported_feature("sql-level pagination")),
        }
    }
}

fn limit_offset(sql: &str, limit: Option<u64>, offset: Option<u64>) -> String {
    let mut out = sql.to_string();
    if let Some(limit) = limit {
        out.push_str(&format!(" limit {limit}"));
    }
    if let Some(offset) = offset {
        out.push_str(&format!(" offset {offset}"));
    }
    out
}

fn limit_comma_offset(sql: &str, limit: Option<u64>, offset: Option<u64>) -> Result<String> {
    match (limit, offset) {
        (Some(limit), Some(offset)) => Ok(format!("{sql} limit {offset}, {limit}")),
        (Some(limit), None) => Ok(format!("{sql} limit {limit}")),
        (None, Some(_)) => Err(Error::unsupported_feature("an offset without a limit")),
        (None, None) => unreachable!(),
    }
}

fn offset_fetch(sql: &str, limit: Option<u64>, offset: Option<u64>) -> String {
    let mut out = sql.to_string();
    if let Some(offset) = offset {
        out.push_str(&format!(" offset {offset} rows"));
    }
    if let Some(limit) = limit {
        if offset.is_some() {
            out.push_str(&format!(" fetch next {limit} rows only"));
        } else {
            out.push_str(&format!(" fetch first {limit} rows only"));
        }
    }
    out
}

fn offset_fetch_with_order_by(sql: &str, limit: Option<u64>, offset: Option<u64>) -> Result<String> {
    if !sql.to_lowercase().contains("order by") {
        return Err(Error::unsupported_feature(
            "pagination without an order by clause",
        ));
    }

    // The offset clause is mandatory before fetch in this form.
    let mut out = format!("{sql} offset {} rows", offset.unwrap_or(0));
    if let Some(limit) = limit {
        out.push_str(&format!(" fetch next {limit} rows only"));
    }
    Ok(out)
}

fn top(sql: &str, limit: Option<u64>, offset: Option<u64>) -> Result<String> {
    if offset.is_some() {
        return Err(Error::unsupported_feature(
            "an offset with top-based pagination",
        ));
    }
    let Some(limit) = limit else {
        unreachable!();
    };

    let lower = sql.to_lowercase();
    let Some(position) = lower.find("select") else {
        return Err(crate::err!("statement has no select clause"));
    };

    // `top` goes after `distinct` when present.
    let mut insert_at = position + "select".len();
    let rest = &lower[insert_at..];
    let trimmed = rest.trim_start();
    if trimmed.starts_with("distinct") {
        insert_at += rest.len() - trimmed.len() + "distinct".len();
    }

    Ok(format!(
        "{} top {limit}{}",
        &sql[..insert_at],
        &sql[insert_at..]
    ))
}

fn rownum(sql: &str, limit: Option<u64>, offset: Option<u64>) -> String {
    match (limit, offset) {
        (Some(limit), Some(offset)) => format!(
            "select * from (select row_.*, rownum rownum_ from ({sql}) row_ where rownum <= {}) where rownum_ > {offset}",
            offset + limit
        ),
        (Some(limit), None) => format!("select * from ({sql}) where rownum <= {limit}"),
        (None, Some(offset)) => format!(
            "select * from (select row_.*, rownum rownum_ from ({sql}) row_) where rownum_ > {offset}"
        ),
        (None, None) => unreachable!(),
    }
}
