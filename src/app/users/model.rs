//! 用户数据模型

use serde::{Deserialize, Serialize};

/// `users` 表中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// 通过校验的用户输入，创建和更新都使用全部三个字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// 列表接口的分页参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_LIMIT: u64 = 10;

    /// 从原始查询串解析 `page` 和 `limit`。
    ///
    /// 只取数字前缀（`"3abc"` 视为 3）；缺失、无法解析或不为正数时使用默认值。
    /// `limit` 没有上限。
    pub fn from_query(query: Option<&str>) -> Self {
        let mut page = None;
        let mut limit = None;

        for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "page" if page.is_none() => page = Some(value.into_owned()),
                "limit" if limit.is_none() => limit = Some(value.into_owned()),
                _ => {}
            }
        }

        Self {
            page: positive_or(page.as_deref(), Self::DEFAULT_PAGE),
            limit: positive_or(limit.as_deref(), Self::DEFAULT_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(leading_integer)
        .filter(|value| *value > 0)
        .and_then(|value| u64::try_from(value).ok())
        .unwrap_or(default)
}

/// 解析字符串开头的十进制整数，允许前导空白和正负号
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;

    Some(if negative { -value } else { value })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub items_per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        Self {
            current_page: request.page,
            items_per_page: request.limit,
            total_items,
            total_pages: total_items.div_ceil(request.limit),
        }
    }
}

/// 分页列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct UserPage {
    pub users: Vec<User>,
    pub pagination: Pagination,
}
