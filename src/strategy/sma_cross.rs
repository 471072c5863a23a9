use crate::live::random::RandomSource;
use crate::model::{PricePoint, Signal, SignalKind};

/// Close/SMA crossover between two consecutive points.
///
/// Boundary equality only counts on the previous point, so a flat run of
/// close == sma never fires twice.
pub fn crossover(prev: &PricePoint, current: &PricePoint) -> Option<SignalKind> {
    let (prev_sma, cur_sma) = (prev.sma?, current.sma?);
    if current.close > cur_sma && prev.close <= prev_sma {
        Some(SignalKind::Buy)
    } else if current.close < cur_sma && prev.close >= prev_sma {
        Some(SignalKind::Sell)
    } else {
        None
    }
}

/// Lazily scan a merged series for crossover signals, at most one per index.
pub fn detect(points: &[PricePoint]) -> impl Iterator<Item = Signal> + '_ {
    points.windows(2).filter_map(|pair| {
        let (prev, current) = (&pair[0], &pair[1]);
        crossover(prev, current).map(|kind| Signal {
            timestamp: current.timestamp,
            kind,
            price: current.close,
        })
    })
}

/// Buy signals that also get a confirmation mark.
///
/// Each buy is kept independently when the next sample is below
/// `probability`; sells never consume a sample.
pub fn confirm_buys(
    signals: &[Signal],
    rng: &mut dyn RandomSource,
    probability: f64,
) -> Vec<Signal> {
    signals
        .iter()
        .filter(|s| s.is_buy())
        .filter(|_| rng.next_unit() < probability)
        .cloned()
        .collect()
}
