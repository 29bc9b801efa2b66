//! 请求监控

pub mod dashboard;
pub mod handler;
pub mod recorder;

pub use recorder::{RecordedRequest, RequestRecorder, MAX_RECORDED_REQUESTS};
