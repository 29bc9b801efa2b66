//! 用户输入校验
//!
//! 请求体先被解码成 `UserPayload`，再整体转换成 `UserInput`；
//! 三条规则分别检查，所有失败项按 name、email、age 的顺序返回。

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use super::model::UserInput;
use crate::core::{
    body::{decode, BodyKind},
    error::AppError,
};

const RULES: [(&str, &str); 3] = [
    ("name", "Invalid name"),
    ("email", "Invalid email"),
    ("age", "Invalid age"),
];

/// 尚未校验的用户请求体
#[derive(Debug, Clone, Default)]
pub struct UserPayload(Map<String, Value>);

#[derive(Debug, Validate)]
struct UserCandidate {
    #[validate(required, length(min = 2))]
    name: Option<String>,

    #[validate(required, email)]
    email: Option<String>,

    #[validate(required, range(min = 0, max = 120))]
    age: Option<i64>,
}

impl UserPayload {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }

    /// 校验并转换为类型化的输入
    pub fn into_input(self) -> Result<UserInput, Vec<String>> {
        let candidate = UserCandidate {
            name: self.string_field("name"),
            email: self.string_field("email"),
            age: self.0.get("age").and_then(coerce_age),
        };

        let result = candidate.validate();
        let errors: Vec<String> = RULES
            .iter()
            .filter(|&&(field, _)| ValidationErrors::has_error(&result, field))
            .map(|&(_, message)| message.to_string())
            .collect();

        match (candidate.name, candidate.email, candidate.age) {
            (Some(name), Some(email), Some(age)) if errors.is_empty() => {
                Ok(UserInput { name, email, age })
            }
            _ => Err(errors),
        }
    }

    fn string_field(&self, key: &str) -> Option<String> {
        match self.0.get(key) {
            Some(Value::String(value)) => Some(value.clone()),
            _ => None,
        }
    }
}

/// 年龄可以是整数，也可以是内容为整数的字符串（表单提交）
fn coerce_age(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(number) => {
            if let Some(age) = number.as_i64() {
                return Some(age);
            }
            number.as_f64()?
        }
        Value::String(raw) => raw.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    (number.is_finite() && number.fract() == 0.0).then_some(number as i64)
}

#[async_trait]
impl<S> FromRequest<S> for UserPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = BodyKind::from_headers(req.headers());
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge
            } else {
                AppError::MalformedBody
            }
        })?;

        let value = decode(kind, &bytes).map_err(|_| AppError::MalformedBody)?;
        Ok(Self::from_value(value))
    }
}
