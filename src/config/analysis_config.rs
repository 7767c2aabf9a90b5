// ==========================================
// 图书零售库存决策支持系统 - 分析配置
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 12. 配置项全集
// ==========================================
// 职责: 分析引擎的只读配置 (进程启动时加载一次, Arc 共享)
// 红线: 配置不可变,跨并发运行共享,无需加锁
// ==========================================

use crate::domain::optimization::OptimizationConstraints;
use crate::domain::types::{PriorityFocus, ReportType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

// ==========================================
// AnalysisConfig - 分析配置全集
// ==========================================
// 由外部配置源提供; 缺省值对应标准门店画像
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // ===== 库存策略常量 =====
    /// 单次订货固定成本 (元/单)
    pub ordering_cost: f64,
    /// 年持有成本率 (占单价比例)
    pub holding_cost_rate: f64,
    /// 服务水平 Z 分数 (95% 服务水平 ≈ 1.65)
    pub service_level_z: f64,
    /// 供货提前期 (周)
    pub lead_time_weeks: f64,
    /// 高价品单价阈值 (元, 超过则 EOQ ×0.9)
    pub high_value_threshold: f64,
    /// 进货成本率 (占售价比例)
    pub cost_ratio: f64,

    // ===== 分类参数 =====
    /// ABC 纳入的最低年销售额 (元)
    pub min_sales_threshold: f64,

    // ===== 季节因子表 (月份 → 因子, 未配置月份取 1.0) =====
    pub seasonal_factors: HashMap<u32, f64>,

    // ===== 缺省优化约束 =====
    pub default_constraints: OptimizationConstraints,

    // ===== 结果缓存 TTL (按报告类型, 秒) =====
    pub cache_ttl_secs: HashMap<ReportType, u64>,
}

impl AnalysisConfig {
    /// 从 JSON 字符串加载 (缺失字段回落到缺省值)
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// 查询月度季节因子 (未配置月份取 1.0)
    pub fn seasonal_factor(&self, month: u32) -> f64 {
        self.seasonal_factors.get(&month).copied().unwrap_or(1.0)
    }

    /// 查询报告类型的缓存 TTL
    pub fn cache_ttl(&self, report_type: ReportType) -> Duration {
        let secs = self
            .cache_ttl_secs
            .get(&report_type)
            .copied()
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);
        Duration::from_secs(secs)
    }
}

const DEFAULT_CACHE_TTL_SECS: u64 = 600;

impl Default for AnalysisConfig {
    fn default() -> Self {
        // 图书零售的月度季节画像: 开学季/大促/年末走高,春节后走低
        let seasonal_factors: HashMap<u32, f64> = [
            (1, 1.15),
            (2, 0.90),
            (3, 1.05),
            (4, 0.95),
            (5, 0.90),
            (6, 1.10),
            (7, 1.00),
            (8, 1.10),
            (9, 1.15),
            (10, 0.95),
            (11, 1.20),
            (12, 1.15),
        ]
        .into_iter()
        .collect();

        let cache_ttl_secs: HashMap<ReportType, u64> = [
            (ReportType::Dashboard, 300),
            (ReportType::Classification, 1800),
            (ReportType::Forecast, 3600),
            (ReportType::FullAnalysis, 3600),
        ]
        .into_iter()
        .collect();

        Self {
            ordering_cost: 50.0,
            holding_cost_rate: 0.25,
            service_level_z: 1.65,
            lead_time_weeks: 2.0,
            high_value_threshold: 150.0,
            cost_ratio: 0.70,
            min_sales_threshold: 200.0,
            seasonal_factors,
            default_constraints: OptimizationConstraints {
                max_budget: 50_000.0,
                max_items: 100,
                max_weight: 2_000.0,
                min_profit_margin: 0.20,
                priority_focus: PriorityFocus::Profit,
            },
            cache_ttl_secs,
        }
    }
}
