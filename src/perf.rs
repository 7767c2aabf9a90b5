// ==========================================
// 图书零售库存决策支持系统 - 性能统计
// ==========================================
// 职责: API 入口级耗时统计 (target="perf" 结构化日志)
// ==========================================

use std::time::Instant;

/// 性能统计 Guard: 记录操作耗时
///
/// 使用方式:
/// ```ignore
/// let _perf = retail_inventory_dss::perf::PerfGuard::new("forecast_item");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            "done"
        );
    }
}
