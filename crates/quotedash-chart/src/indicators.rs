//! Indicator series over closing prices, one value per input bar.
//!
//! Values inside an indicator's warm-up are `None` so the charts leave a gap
//! instead of plotting a half-formed average.

use anyhow::anyhow;
use ta::indicators::{
    MovingAverageConvergenceDivergence, RelativeStrengthIndex, SimpleMovingAverage,
};
use ta::Next;

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const SMA_PERIOD: usize = 50;

pub fn rsi(closes: &[f64]) -> anyhow::Result<Vec<Option<f64>>> {
    let mut rsi = RelativeStrengthIndex::new(RSI_PERIOD)
        .map_err(|e| anyhow!("RSI({RSI_PERIOD}) rejected: {e:?}"))?;
    Ok(warm_up(closes.iter().map(|close| rsi.next(*close)), RSI_PERIOD))
}

pub fn sma(closes: &[f64]) -> anyhow::Result<Vec<Option<f64>>> {
    let mut sma = SimpleMovingAverage::new(SMA_PERIOD)
        .map_err(|e| anyhow!("SMA({SMA_PERIOD}) rejected: {e:?}"))?;
    Ok(warm_up(closes.iter().map(|close| sma.next(*close)), SMA_PERIOD - 1))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Macd {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(closes: &[f64]) -> anyhow::Result<Macd> {
    let mut indicator = MovingAverageConvergenceDivergence::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL)
        .map_err(|e| anyhow!("MACD({MACD_FAST}, {MACD_SLOW}, {MACD_SIGNAL}) rejected: {e:?}"))?;

    let mut out = Macd::default();
    for close in closes {
        let point = indicator.next(*close);
        out.macd.push(point.macd);
        out.signal.push(point.signal);
        out.histogram.push(point.histogram);
    }
    Ok(out)
}

fn warm_up(values: impl Iterator<Item = f64>, skip: usize) -> Vec<Option<f64>> {
    values
        .enumerate()
        .map(|(i, v)| (i >= skip && v.is_finite()).then_some(v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn rsi_approaches_100_on_a_steady_rise() {
        let values = rsi(&rising(30)).unwrap();
        assert_eq!(values.len(), 30);
        assert!(values[..RSI_PERIOD].iter().all(Option::is_none));
        let last = values[29].unwrap();
        assert!(last > 99.0 && last <= 100.0, "{last}");
    }

    #[test]
    fn rsi_stays_in_bounds_when_prices_swing() {
        let closes: Vec<f64> = (0..60).map(|i| if i % 3 == 0 { 90.0 } else { 95.0 + i as f64 }).collect();
        for value in rsi(&closes).unwrap().into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value), "{value}");
        }
    }

    #[test]
    fn sma_starts_once_the_window_is_full() {
        let closes = rising(60);
        let values = sma(&closes).unwrap();
        assert!(values[SMA_PERIOD - 2].is_none());
        // mean of 100..=149
        assert_eq!(values[SMA_PERIOD - 1], Some(124.5));
        assert_eq!(values[59], Some(134.5));
    }

    #[test]
    fn macd_histogram_is_macd_minus_signal() {
        let closes: Vec<f64> = (0..80).map(|i| 50.0 + (i as f64 / 5.0).sin() * 4.0).collect();
        let out = macd(&closes).unwrap();
        assert_eq!(out.macd.len(), 80);
        for i in 0..80 {
            assert!((out.histogram[i] - (out.macd[i] - out.signal[i])).abs() < 1e-9);
        }
    }

    #[test]
    fn flat_prices_have_no_momentum() {
        let out = macd(&[10.0; 40]).unwrap();
        assert!(out.macd.iter().all(|v| v.abs() < 1e-12));
    }
}
