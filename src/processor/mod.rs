use crate::errors::ProcessorError;
use crate::models::series::{Direction, Metrics, PricePoint, Series};

/// 将原始序列归一化为公共模式：按日期升序，重复日期只保留最新一条
///
/// Idempotent: normalizing an already normalized series is a no-op.
pub fn normalize(raw: Series) -> Result<Series, ProcessorError> {
    if raw.points.is_empty() {
        return Err(ProcessorError::EmptySeries);
    }

    let mut points = raw.points;
    // Stable sort keeps input order among equal dates, so the last entry of
    // each run is the latest one delivered
    points.sort_by_key(|p| p.date);

    let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match deduped.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => deduped.push(point),
        }
    }

    Ok(Series {
        symbol: raw.symbol,
        points: deduped,
        is_approximated: raw.is_approximated,
    })
}

/// Compute the dashboard metrics from the tail of a series.
///
/// The input is not mutated; metrics are recomputed on every render.
pub fn compute_metrics(series: &Series) -> Result<Metrics, ProcessorError> {
    let last = series.points.last().ok_or(ProcessorError::EmptySeries)?;
    let len = series.points.len();

    let previous_close = if len > 1 {
        series.points[len - 2].close
    } else {
        last.close
    };

    let trailing_mean = |periods: usize| {
        let window = len.min(periods);
        let tail = &series.points[len - window..];
        tail.iter().map(|p| p.close).sum::<f64>() / window as f64
    };
    let moving_average_50 = trailing_mean(50);
    let moving_average_200 = trailing_mean(200);

    // 52周高低点，按约252个交易日取尾窗
    let year = &series.points[len - len.min(252)..];
    let year_high = year.iter().map(|p| p.high).fold(f64::NEG_INFINITY, f64::max);
    let year_low = year.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);

    let percent_change = if previous_close == 0.0 {
        0.0
    } else {
        (last.close - previous_close) / previous_close * 100.0
    };

    let direction = if percent_change > 0.0 {
        Direction::Up
    } else if percent_change < 0.0 {
        Direction::Down
    } else {
        Direction::Flat
    };

    Ok(Metrics {
        previous_close,
        moving_average_50,
        moving_average_200,
        year_high,
        year_low,
        percent_change,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(day: u32, close: f64) -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
        }
    }

    fn series_of(closes: &[(u32, f64)]) -> Series {
        Series::new(
            "TEST",
            closes.iter().map(|&(d, c)| point(d, c)).collect(),
        )
    }

    #[test]
    fn normalize_rejects_empty_series() {
        let empty = Series::new("TEST", vec![]);
        assert!(matches!(normalize(empty), Err(ProcessorError::EmptySeries)));
    }

    #[test]
    fn normalize_sorts_ascending() {
        let shuffled = series_of(&[(3, 30.0), (1, 10.0), (2, 20.0)]);
        let normalized = normalize(shuffled).unwrap();
        let closes: Vec<f64> = normalized.points.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn normalize_keeps_latest_duplicate() {
        let raw = series_of(&[(1, 10.0), (2, 20.0), (2, 25.0)]);
        let normalized = normalize(raw).unwrap();
        assert_eq!(normalized.points.len(), 2);
        assert_eq!(normalized.points[1].close, 25.0);
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = series_of(&[(3, 30.0), (1, 10.0), (2, 20.0), (2, 25.0)]);
        let once = normalize(raw).unwrap();
        let twice = normalize(once.clone()).unwrap();
        assert_eq!(once.points, twice.points);
    }

    #[test]
    fn normalize_preserves_approximation_flag() {
        let raw = Series::approximated("TOTAL", vec![point(1, 10.0)]);
        assert!(normalize(raw).unwrap().is_approximated);
    }

    #[test]
    fn single_point_series_is_flat() {
        let metrics = compute_metrics(&series_of(&[(1, 100.0)])).unwrap();
        assert_eq!(metrics.previous_close, 100.0);
        assert_eq!(metrics.percent_change, 0.0);
        assert_eq!(metrics.direction, Direction::Flat);
    }

    #[test]
    fn two_point_series_percent_change() {
        let metrics = compute_metrics(&series_of(&[(1, 100.0), (2, 110.0)])).unwrap();
        assert_eq!(metrics.previous_close, 100.0);
        assert!((metrics.percent_change - 10.0).abs() < 1e-9);
        assert_eq!(metrics.direction, Direction::Up);
    }

    #[test]
    fn falling_close_points_down() {
        let metrics = compute_metrics(&series_of(&[(1, 100.0), (2, 90.0)])).unwrap();
        assert!((metrics.percent_change + 10.0).abs() < 1e-9);
        assert_eq!(metrics.direction, Direction::Down);
    }

    #[test]
    fn zero_previous_close_yields_zero_change() {
        let metrics = compute_metrics(&series_of(&[(1, 0.0), (2, 50.0)])).unwrap();
        assert_eq!(metrics.percent_change, 0.0);
        assert_eq!(metrics.direction, Direction::Flat);
    }

    #[test]
    fn short_series_average_uses_all_closes() {
        let metrics = compute_metrics(&series_of(&[(1, 10.0), (2, 20.0), (3, 30.0)])).unwrap();
        assert!((metrics.moving_average_50 - 20.0).abs() < 1e-9);
        assert!((metrics.moving_average_200 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn short_series_year_range_spans_all_points() {
        let metrics = compute_metrics(&series_of(&[(1, 10.0), (2, 30.0), (3, 20.0)])).unwrap();
        assert_eq!(metrics.year_high, 30.0);
        assert_eq!(metrics.year_low, 10.0);
    }

    #[test]
    fn long_series_average_uses_trailing_50() {
        // 60 points: closes 1.0..=60.0; trailing 50 are 11..=60, mean 35.5
        let points: Vec<PricePoint> = (0..60)
            .map(|i| PricePoint {
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: 0.0,
                high: 0.0,
                low: 0.0,
                close: (i + 1) as f64,
                volume: 0.0,
            })
            .collect();
        let series = Series::new("TEST", points);
        let metrics = compute_metrics(&series).unwrap();
        assert!((metrics.moving_average_50 - 35.5).abs() < 1e-9);
    }

    #[test]
    fn long_series_trailing_windows() {
        // 300 points: closes 1.0..=300.0, high = close + 1, low = close - 1
        let points: Vec<PricePoint> = (0..300)
            .map(|i| {
                let close = (i + 1) as f64;
                PricePoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 0.0,
                }
            })
            .collect();
        let metrics = compute_metrics(&Series::new("TEST", points)).unwrap();

        // Trailing 200 closes are 101..=300
        assert!((metrics.moving_average_200 - 200.5).abs() < 1e-9);
        // Trailing 252 points carry closes 49..=300
        assert_eq!(metrics.year_high, 301.0);
        assert_eq!(metrics.year_low, 48.0);
    }

    #[test]
    fn compute_metrics_rejects_empty_series() {
        let empty = Series::new("TEST", vec![]);
        assert!(matches!(
            compute_metrics(&empty),
            Err(ProcessorError::EmptySeries)
        ));
    }
}
