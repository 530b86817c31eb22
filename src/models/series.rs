use chrono::NaiveDate;
use serde::Serialize;

/// 日线数据结构
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Price series for one symbol with nested daily points
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub symbol: String,
    pub points: Vec<PricePoint>,
    /// True when the series is derived rather than quoted, e.g. the TOTAL
    /// market-cap index scaled from a reference asset.
    pub is_approximated: bool,
}

impl Series {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
            is_approximated: false,
        }
    }

    pub fn approximated(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
            is_approximated: true,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }
}

/// Direction of the latest move, sign of the percent change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// 衍生指标，每次请求重新计算，不做持久化
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub previous_close: f64,
    pub moving_average_50: f64,
    pub moving_average_200: f64,
    /// 52-week high/low over the trailing 252 trading days (or fewer)
    pub year_high: f64,
    pub year_low: f64,
    pub percent_change: f64,
    pub direction: Direction,
}
