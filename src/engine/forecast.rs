// ==========================================
// 图书零售库存决策支持系统 - 需求预测引擎
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 3. Forecast Engine
// 红线: 预测值恒为正整数,历史不足降级为低置信度缺省,不报错
// ==========================================
// 职责: 五算法月度需求预测 + 加权集成 + 回测精度评估
// 输入: 品目主数据 + 月度需求序列
// 输出: DemandForecast 列表 (每算法一条 + 集成一条)
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::forecast::{DemandForecast, ForecastAccuracy};
use crate::domain::item::{first_of_month, trailing_window, DemandObservation, ItemMaster};
use crate::domain::types::ForecastAlgorithm;
use chrono::{Datelike, Months, NaiveDate, Utc};
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// 算法参数 (固定窗口与置信度)
// ==========================================

const MOVING_AVERAGE_WINDOW: u32 = 6;
const SMOOTHING_WINDOW: u32 = 12;
const SMOOTHING_ALPHA: f64 = 0.3;
const REGRESSION_WINDOW: u32 = 12;
const REGRESSION_MIN_POINTS: usize = 3;

const CONF_MOVING_AVERAGE: f64 = 0.70;
const CONF_SMOOTHING: f64 = 0.75;
const CONF_SMOOTHING_EMPTY: f64 = 0.60;
const CONF_REGRESSION: f64 = 0.65;
const CONF_REGRESSION_FALLBACK: f64 = 0.50;
const CONF_SEASONAL: f64 = 0.80;
const CONF_ENSEMBLE: f64 = 0.85;

/// 集成权重 (固定, 合计 1.0)
const ENSEMBLE_WEIGHTS: [(ForecastAlgorithm, f64); 4] = [
    (ForecastAlgorithm::MovingAverage, 0.25),
    (ForecastAlgorithm::ExponentialSmoothing, 0.30),
    (ForecastAlgorithm::LinearRegression, 0.25),
    (ForecastAlgorithm::SeasonalAdjusted, 0.20),
];

// ==========================================
// ForecastEngine - 需求预测引擎
// ==========================================
pub struct ForecastEngine {
    config: Arc<AnalysisConfig>,
}

impl ForecastEngine {
    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 单品目全算法预测
    ///
    /// # 参数
    /// - item: 品目主数据
    /// - history: 月度需求序列 (按月升序)
    /// - as_of: 预测基准日期
    /// - horizon_months: 展望期 (月)
    ///
    /// # 返回
    /// 每算法一条预测 + 集成预测,预测值恒 ≥ 1
    #[instrument(skip(self, item, history), fields(
        item_id = %item.item_id,
        history_len = history.len(),
        horizon_months
    ))]
    pub fn forecast(
        &self,
        item: &ItemMaster,
        history: &[DemandObservation],
        as_of: NaiveDate,
        horizon_months: u32,
    ) -> Vec<DemandForecast> {
        let horizon = horizon_months.max(1);

        let (ma_pred, ma_conf) = self.moving_average(history, as_of, horizon);
        let (es_pred, es_conf) = self.exponential_smoothing(history, as_of, horizon);
        let (lr_pred, lr_conf) = self.linear_regression(history, as_of, horizon);
        let (sa_pred, sa_conf) = self.seasonal_adjusted(history, as_of, horizon);

        let parts = [
            (ForecastAlgorithm::MovingAverage, ma_pred),
            (ForecastAlgorithm::ExponentialSmoothing, es_pred),
            (ForecastAlgorithm::LinearRegression, lr_pred),
            (ForecastAlgorithm::SeasonalAdjusted, sa_pred),
        ];
        let (en_pred, en_conf) = self.combine_ensemble(&parts);

        let created_at = Utc::now();
        let build = |algorithm: ForecastAlgorithm, predicted: i64, confidence: f64| DemandForecast {
            item_id: item.item_id.clone(),
            forecast_date: as_of,
            algorithm,
            horizon_months: horizon,
            predicted_demand: predicted,
            confidence,
            created_at,
        };

        vec![
            build(ForecastAlgorithm::MovingAverage, ma_pred, ma_conf),
            build(ForecastAlgorithm::ExponentialSmoothing, es_pred, es_conf),
            build(ForecastAlgorithm::LinearRegression, lr_pred, lr_conf),
            build(ForecastAlgorithm::SeasonalAdjusted, sa_pred, sa_conf),
            build(ForecastAlgorithm::Ensemble, en_pred, en_conf),
        ]
    }

    // ==========================================
    // 移动平均 (6个月窗口)
    // ==========================================

    /// 预测 = round(近6月均值 × 展望期), 下限 1
    ///
    /// 窗口为空时降级为 1 (同置信度)
    pub fn moving_average(
        &self,
        history: &[DemandObservation],
        as_of: NaiveDate,
        horizon_months: u32,
    ) -> (i64, f64) {
        let window = trailing_window(history, as_of, MOVING_AVERAGE_WINDOW);
        let mean = mean_quantity(&window);
        let predicted = (mean * horizon_months as f64).round() as i64;
        (predicted.max(1), CONF_MOVING_AVERAGE)
    }

    // ==========================================
    // 指数平滑 (12个月窗口, α=0.3)
    // ==========================================

    /// 从窗口均值起步迭代平滑: s = α·x + (1−α)·s
    ///
    /// 历史为空时返回 1, 置信度降为 0.60
    pub fn exponential_smoothing(
        &self,
        history: &[DemandObservation],
        as_of: NaiveDate,
        horizon_months: u32,
    ) -> (i64, f64) {
        let window = trailing_window(history, as_of, SMOOTHING_WINDOW);
        if window.is_empty() {
            return (1, CONF_SMOOTHING_EMPTY);
        }

        let mut smoothed = mean_quantity(&window);
        for obs in &window {
            smoothed = SMOOTHING_ALPHA * obs.quantity as f64 + (1.0 - SMOOTHING_ALPHA) * smoothed;
        }

        let predicted = (smoothed * horizon_months as f64).round() as i64;
        (predicted.max(1), CONF_SMOOTHING)
    }

    // ==========================================
    // 线性回归 (12个月窗口, 最少3点)
    // ==========================================

    /// (时间序号, 需求量) 最小二乘拟合,在序号 n + 展望期处取值
    ///
    /// 样本点少于 3 个时降级为 1, 置信度 0.50
    pub fn linear_regression(
        &self,
        history: &[DemandObservation],
        as_of: NaiveDate,
        horizon_months: u32,
    ) -> (i64, f64) {
        let window = trailing_window(history, as_of, REGRESSION_WINDOW);
        let n = window.len();
        if n < REGRESSION_MIN_POINTS {
            return (1, CONF_REGRESSION_FALLBACK);
        }

        let nf = n as f64;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_x2 = 0.0;
        for (i, obs) in window.iter().enumerate() {
            let x = i as f64;
            let y = obs.quantity as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_x2 += x * x;
        }

        let denominator = nf * sum_x2 - sum_x * sum_x;
        if denominator.abs() < f64::EPSILON {
            return (1, CONF_REGRESSION_FALLBACK);
        }
        let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / nf;

        let x_pred = (n as u32 + horizon_months) as f64;
        let predicted = (slope * x_pred + intercept).round() as i64;
        (predicted.max(1), CONF_REGRESSION)
    }

    // ==========================================
    // 季节调整 (移动平均 × 月度季节因子)
    // ==========================================

    /// 因子按预测目标月 (as_of + 展望期) 查表,未配置月份取 1.0
    pub fn seasonal_adjusted(
        &self,
        history: &[DemandObservation],
        as_of: NaiveDate,
        horizon_months: u32,
    ) -> (i64, f64) {
        let (ma_pred, _) = self.moving_average(history, as_of, horizon_months);
        let target_month = as_of
            .checked_add_months(Months::new(horizon_months))
            .unwrap_or(as_of)
            .month();
        let factor = self.config.seasonal_factor(target_month);
        let predicted = (ma_pred as f64 * factor).round() as i64;
        (predicted.max(1), CONF_SEASONAL)
    }

    // ==========================================
    // 加权集成
    // ==========================================

    /// 集成 = Σ(权重 × 预测) / 1.0
    ///
    /// 缺失算法只从分子剔除,分母固定为全权重和 1.0 (不重新归一化)
    pub fn combine_ensemble(&self, parts: &[(ForecastAlgorithm, i64)]) -> (i64, f64) {
        let mut numerator = 0.0;
        for (algorithm, predicted) in parts {
            if let Some(weight) = ensemble_weight(*algorithm) {
                numerator += weight * *predicted as f64;
            }
        }
        let predicted = numerator.round() as i64;
        (predicted.max(1), CONF_ENSEMBLE)
    }

    // ==========================================
    // 回测精度评估
    // ==========================================

    /// 将窗口内的历史预测与同月实际需求比对
    ///
    /// # 参数
    /// - algorithm: 被评估算法
    /// - forecasts: 历史预测记录
    /// - actuals: 实际月度需求观测
    /// - from/to: 评估窗口 (按预测基准日期, 闭区间)
    ///
    /// # 返回
    /// MAE/MAPE/RMSE; 窗口内无可比对预测时返回 MAPE=100 哨兵
    ///
    /// 边界处理: 实际需求为 0 的月份不参与 MAPE (除零防护),仍计入 MAE/RMSE
    #[instrument(skip(self, forecasts, actuals), fields(algorithm = %algorithm))]
    pub fn evaluate_accuracy(
        &self,
        algorithm: ForecastAlgorithm,
        forecasts: &[DemandForecast],
        actuals: &[DemandObservation],
        from: NaiveDate,
        to: NaiveDate,
    ) -> ForecastAccuracy {
        let mut abs_errors = Vec::new();
        let mut squared_errors = Vec::new();
        let mut pct_errors = Vec::new();

        for forecast in forecasts {
            if forecast.algorithm != algorithm {
                continue;
            }
            if forecast.forecast_date < from || forecast.forecast_date > to {
                continue;
            }

            let month = first_of_month(forecast.forecast_date);
            let Some(actual) = actuals.iter().find(|obs| obs.month == month) else {
                continue;
            };

            let error = forecast.predicted_demand as f64 - actual.quantity as f64;
            abs_errors.push(error.abs());
            squared_errors.push(error * error);
            if actual.quantity > 0 {
                pct_errors.push((error.abs() / actual.quantity as f64) * 100.0);
            }
        }

        if abs_errors.is_empty() {
            return ForecastAccuracy::empty_window(algorithm, from, to);
        }

        let sample_count = abs_errors.len();
        let mae = abs_errors.iter().sum::<f64>() / sample_count as f64;
        let rmse = (squared_errors.iter().sum::<f64>() / sample_count as f64).sqrt();
        let mape = if pct_errors.is_empty() {
            100.0
        } else {
            pct_errors.iter().sum::<f64>() / pct_errors.len() as f64
        };

        ForecastAccuracy {
            algorithm,
            mae,
            mape,
            rmse,
            from_date: from,
            to_date: to,
            sample_count,
        }
    }
}

/// 算法的固定集成权重 (ENSEMBLE 自身不参与)
fn ensemble_weight(algorithm: ForecastAlgorithm) -> Option<f64> {
    ENSEMBLE_WEIGHTS
        .iter()
        .find(|(a, _)| *a == algorithm)
        .map(|(_, w)| *w)
}

/// 观测窗口的需求均值 (空窗口取 0)
fn mean_quantity(window: &[&DemandObservation]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(|obs| obs.quantity as f64).sum::<f64>() / window.len() as f64
}
