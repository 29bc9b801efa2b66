//! 按客户端地址的固定窗口限流

use std::{
    collections::HashMap,
    net::IpAddr,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use crate::infrastructure::config::RateLimitConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    clients: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.config.max_requests
    }

    pub fn check(&self, client: IpAddr) -> RateDecision {
        self.check_at(client, Instant::now())
    }

    /// 计数并判断本次请求是否放行，窗口从该地址的第一个请求开始计时
    pub fn check_at(&self, client: IpAddr, now: Instant) -> RateDecision {
        let window = self.config.window;
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);

        // 清理过期的记录
        clients.retain(|_, entry| now.duration_since(entry.started) < window);

        let entry = clients.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });

        if entry.count >= self.config.max_requests {
            return RateDecision::Limited {
                retry_after: window.saturating_sub(now.duration_since(entry.started)),
            };
        }

        entry.count += 1;
        RateDecision::Allowed {
            remaining: self.config.max_requests - entry.count,
        }
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
