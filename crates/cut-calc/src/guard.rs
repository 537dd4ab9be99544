//! 搜尋中斷控制（取消旗標與時限）

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cutstock_core::{CutError, Result};

/// 遞迴搜尋每一步檢查的中斷條件
#[derive(Debug, Clone)]
pub struct SearchGuard {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl SearchGuard {
    pub fn new(cancelled: Arc<AtomicBool>, time_limit_ms: Option<u64>) -> Self {
        Self {
            cancelled,
            deadline: time_limit_ms.map(|ms| Instant::now() + Duration::from_millis(ms)),
        }
    }

    /// 不會中斷的 guard
    pub fn unbounded() -> Self {
        Self::new(Arc::new(AtomicBool::new(false)), None)
    }

    pub fn is_tripped(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// 已取消或超時則返回 [`CutError::Cancelled`]
    pub fn check(&self) -> Result<()> {
        if self.is_tripped() {
            return Err(CutError::Cancelled { completed_bars: 0 });
        }
        Ok(())
    }
}
