// ==========================================
// 图书零售库存决策支持系统 - 引擎层性能指标上报
// ==========================================
// 职责: 定义性能指标上报 trait,实现依赖倒置
// 说明: 指标服务为可选协作方,调用方必须做存在性判断,不得假设其存在
// ==========================================

use std::sync::Arc;

// ==========================================
// 指标上报 Trait
// ==========================================

/// 性能指标接收方 Trait
///
/// Engine 层定义,外部监控设施实现
///
/// # 实现说明
/// - 上报为尽力而为: 实现方不应阻塞分析主流程
pub trait MetricsSink: Send + Sync {
    /// 上报单阶段耗时
    fn record_phase(&self, phase: &str, elapsed_ms: u64);

    /// 上报缓存命中/未命中
    fn record_cache_lookup(&self, report_type: &str, hit: bool);
}

/// 空操作指标接收方
///
/// 用于不需要指标上报的场景 (如单元测试)
#[derive(Debug, Clone, Default)]
pub struct NoOpMetricsSink;

impl MetricsSink for NoOpMetricsSink {
    fn record_phase(&self, phase: &str, elapsed_ms: u64) {
        tracing::debug!(phase, elapsed_ms, "NoOpMetricsSink: 跳过阶段指标上报");
    }

    fn record_cache_lookup(&self, report_type: &str, hit: bool) {
        tracing::debug!(report_type, hit, "NoOpMetricsSink: 跳过缓存指标上报");
    }
}

/// 可选的指标接收方包装
///
/// 简化 Option<Arc<dyn MetricsSink>> 的使用
pub struct OptionalMetricsSink {
    inner: Option<Arc<dyn MetricsSink>>,
}

impl OptionalMetricsSink {
    /// 创建带接收方的实例
    pub fn with_sink(sink: Arc<dyn MetricsSink>) -> Self {
        Self { inner: Some(sink) }
    }

    /// 创建空实例 (不上报指标)
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 上报阶段耗时 (如果配置了接收方)
    pub fn record_phase(&self, phase: &str, elapsed_ms: u64) {
        if let Some(sink) = &self.inner {
            sink.record_phase(phase, elapsed_ms);
        }
    }

    /// 上报缓存查询结果 (如果配置了接收方)
    pub fn record_cache_lookup(&self, report_type: &str, hit: bool) {
        if let Some(sink) = &self.inner {
            sink.record_cache_lookup(report_type, hit);
        }
    }

    /// 检查是否配置了接收方
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalMetricsSink {
    fn default() -> Self {
        Self::none()
    }
}
