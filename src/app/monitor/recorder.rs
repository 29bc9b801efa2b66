//! 最近请求记录器
//!
//! 固定容量的环形缓冲区，最新的请求位于下标 0，超出容量时丢弃最旧的一条。

use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

pub const MAX_RECORDED_REQUESTS: usize = 10;

/// 一次请求的快照
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedRequest {
    pub timestamp: String,
    pub method: String,
    pub path: String,
    pub query: Map<String, Value>,
    /// GET 请求不记录请求体
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    pub source_address: String,
}

#[derive(Debug, Clone)]
pub struct RequestRecorder {
    entries: Arc<Mutex<VecDeque<RecordedRequest>>>,
    capacity: usize,
}

impl RequestRecorder {
    pub fn new() -> Self {
        Self::with_capacity(MAX_RECORDED_REQUESTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity + 1))),
            capacity,
        }
    }

    pub fn record(&self, request: RecordedRequest) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push_front(request);
        entries.truncate(self.capacity);
    }

    /// 按从新到旧的顺序返回当前记录
    pub fn snapshot(&self) -> Vec<RecordedRequest> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RequestRecorder {
    fn default() -> Self {
        Self::new()
    }
}
