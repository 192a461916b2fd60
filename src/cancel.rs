//! Кооперативная отмена длинных этапов (релаксация, реки)

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{MapError, MapResult};

/// Токен отмены. Клоны разделяют один флаг.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Токен, который срабатывает сам по истечении `timeout`
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Точка проверки между итерациями
    pub fn checkpoint(&self) -> MapResult<()> {
        if self.is_cancelled() {
            Err(MapError::Cancelled)
        } else {
            Ok(())
        }
    }
}
