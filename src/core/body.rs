//! 请求体与查询串解析
//!
//! JSON 与 urlencoded 两种请求体都被解码成 `serde_json::Value`，
//! 重复出现的键会合并成字符串数组。

use axum::http::{header, HeaderMap};
use serde_json::{Map, Value};

/// 根据 Content-Type 判断的请求体格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(content_type) = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        else {
            return BodyKind::Other;
        };

        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/json" || essence.ends_with("+json") {
            BodyKind::Json
        } else if essence == "application/x-www-form-urlencoded" {
            BodyKind::Form
        } else {
            BodyKind::Other
        }
    }
}

/// 解码请求体；空请求体和无法识别的格式都视为空对象
pub fn decode(kind: BodyKind, bytes: &[u8]) -> Result<Value, serde_json::Error> {
    if bytes.is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    match kind {
        BodyKind::Json => serde_json::from_slice(bytes),
        BodyKind::Form => Ok(Value::Object(params_to_object(bytes))),
        BodyKind::Other => Ok(Value::Object(Map::new())),
    }
}

/// 把 `a=1&b=2&a=3` 形式的参数转换成 `{"a": ["1", "3"], "b": "2"}`
pub fn params_to_object(raw: &[u8]) -> Map<String, Value> {
    let mut params = Map::new();

    for (key, value) in form_urlencoded::parse(raw) {
        let value = Value::String(value.into_owned());
        match params.get_mut(key.as_ref()) {
            None => {
                params.insert(key.into_owned(), value);
            }
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }

    params
}
