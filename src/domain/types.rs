// ==========================================
// 图书零售库存决策支持系统 - 领域类型定义
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 0.2 分类体系与状态体系
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 预测算法 (Forecast Algorithm)
// ==========================================
// 每个算法具有固定置信度,预测值恒为正整数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForecastAlgorithm {
    MovingAverage,        // 移动平均 (6个月窗口)
    ExponentialSmoothing, // 指数平滑 (12个月窗口, α=0.3)
    LinearRegression,     // 线性回归 (12个月窗口, 最少3点)
    SeasonalAdjusted,     // 季节调整 (移动平均 × 月度季节因子)
    Ensemble,             // 加权集成
}

impl ForecastAlgorithm {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastAlgorithm::MovingAverage => "MOVING_AVERAGE",
            ForecastAlgorithm::ExponentialSmoothing => "EXPONENTIAL_SMOOTHING",
            ForecastAlgorithm::LinearRegression => "LINEAR_REGRESSION",
            ForecastAlgorithm::SeasonalAdjusted => "SEASONAL_ADJUSTED",
            ForecastAlgorithm::Ensemble => "ENSEMBLE",
        }
    }
}

impl fmt::Display for ForecastAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// ABC 分类 (销售贡献度)
// ==========================================
// 按累计销售贡献百分比划分: A=头部, C=尾部
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    A, // 累计贡献前 20%
    B, // 累计贡献 20%~80%
    C, // 累计贡献 80% 之后
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbcClass::A => write!(f, "A"),
            AbcClass::B => write!(f, "B"),
            AbcClass::C => write!(f, "C"),
        }
    }
}

// ==========================================
// XYZ 分类 (需求波动性)
// ==========================================
// 按月需求变异系数 (CV = σ/μ) 划分
// 边界: X < 0.5 ≤ Y < 1.0 ≤ Z (Z 的下界为闭区间)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum XyzClass {
    X, // 稳定需求 (CV < 0.5)
    Y, // 波动需求 (0.5 ≤ CV < 1.0)
    Z, // 不规则需求 (CV ≥ 1.0)
}

impl fmt::Display for XyzClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XyzClass::X => write!(f, "X"),
            XyzClass::Y => write!(f, "Y"),
            XyzClass::Z => write!(f, "Z"),
        }
    }
}

// ==========================================
// 周转速度 (Turnover Speed)
// ==========================================
// 由 ABC×XYZ 组合映射,驱动处置策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnoverSpeed {
    Fast,   // AX/AY
    Medium, // BX/BY
    Slow,   // CX/CY
    Dead,   // AZ/BZ/CZ
}

impl fmt::Display for TurnoverSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnoverSpeed::Fast => write!(f, "FAST"),
            TurnoverSpeed::Medium => write!(f, "MEDIUM"),
            TurnoverSpeed::Slow => write!(f, "SLOW"),
            TurnoverSpeed::Dead => write!(f, "DEAD"),
        }
    }
}

// ==========================================
// 库存状态 (Stock Status)
// ==========================================
// 判定顺序: REORDER_NEEDED 优先于区间判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    ReorderNeeded, // 现货 ≤ 再订货点
    Understock,    // 现货 < 0.8 × 最优库存
    Overstock,     // 现货 > 1.2 × 最优库存
    Optimal,       // 其余
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::ReorderNeeded => "REORDER_NEEDED",
            StockStatus::Understock => "UNDERSTOCK",
            StockStatus::Overstock => "OVERSTOCK",
            StockStatus::Optimal => "OPTIMAL",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 优化目标 (Priority Focus)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityFocus {
    Profit,           // 利润率最大化
    CashFlow,         // 现金流效率 (利润率 × 紧急度)
    RiskMinimization, // 风险最小化 (低风险优先)
}

impl fmt::Display for PriorityFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFocus::Profit => write!(f, "PROFIT"),
            PriorityFocus::CashFlow => write!(f, "CASH_FLOW"),
            PriorityFocus::RiskMinimization => write!(f, "RISK_MINIMIZATION"),
        }
    }
}

// ==========================================
// 报告类型 (Report Type)
// ==========================================
// 决定结果缓存的 TTL: 看板类短,重分析类长
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    Dashboard,      // 看板摘要
    Classification, // ABC/XYZ 分类报告
    Forecast,       // 需求预测报告
    FullAnalysis,   // 完整集成分析
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Dashboard => "DASHBOARD",
            ReportType::Classification => "CLASSIFICATION",
            ReportType::Forecast => "FORECAST",
            ReportType::FullAnalysis => "FULL_ANALYSIS",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 处置策略 (Disposal Strategy)
// ==========================================
// 慢销/滞销库存的出清方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisposalStrategy {
    Liquidate,        // 清仓处理
    BulkSale,         // 批量折价外销
    ReturnToSupplier, // 退货给供应商 (新书退货窗口内)
    DiscountSale,     // 店内折扣促销
}

impl fmt::Display for DisposalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisposalStrategy::Liquidate => write!(f, "LIQUIDATE"),
            DisposalStrategy::BulkSale => write!(f, "BULK_SALE"),
            DisposalStrategy::ReturnToSupplier => write!(f, "RETURN_TO_SUPPLIER"),
            DisposalStrategy::DiscountSale => write!(f, "DISCOUNT_SALE"),
        }
    }
}

// ==========================================
// 生命周期阶段 (Lifecycle Stage)
// ==========================================
// 按出版时长划分,用于处置策略与退货窗口判断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStage {
    NewRelease, // 出版 ≤ 1 年 (供应商退货窗口)
    Backlist,   // 出版 ≤ 5 年
    Legacy,     // 出版 > 5 年
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleStage::NewRelease => write!(f, "NEW_RELEASE"),
            LifecycleStage::Backlist => write!(f, "BACKLIST"),
            LifecycleStage::Legacy => write!(f, "LEGACY"),
        }
    }
}

// ==========================================
// 分析阶段 (Analysis Phase)
// ==========================================
// 编排器的四个阶段,用于阶段计时与失败定位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisPhase {
    BaseAggregation, // 基础数据聚合
    Classification,  // ABC/XYZ 分类
    Forecasting,     // 需求预测
    Optimization,    // 采购优化
}

impl AnalysisPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisPhase::BaseAggregation => "BASE_AGGREGATION",
            AnalysisPhase::Classification => "CLASSIFICATION",
            AnalysisPhase::Forecasting => "FORECASTING",
            AnalysisPhase::Optimization => "OPTIMIZATION",
        }
    }
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
