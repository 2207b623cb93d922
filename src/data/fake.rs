/*!
Generate fake bar data, for testing purposes
*/
use super::Bar;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Generate bars following a geometric random walk with Gaussian log-returns
#[derive(Debug, Clone)]
pub struct RandomWalk<R = StdRng> {
    /// The RNG used by this random walk
    pub rng: R,
    /// The standard deviation of log-returns between consecutive closes
    pub volatility: f64,
    /// The average traded volume per bar
    pub volume: f64,
    /// The timestamp of the next bar
    pub t: NaiveDateTime,
    /// The time between bars
    pub interval: Duration,
    /// The most recent closing price
    pub price: f64,
}

impl RandomWalk {
    /// A reproducible walk of 15-minute bars starting at `t` and `price`, with the given per-bar volatility.
    /// Returns `None` unless the price is positive and the volatility non-negative.
    pub fn seeded(seed: u64, t: NaiveDateTime, price: f64, volatility: f64) -> Option<RandomWalk> {
        if !(price > 0.0 && price.is_finite() && volatility >= 0.0 && volatility.is_finite()) {
            return None;
        }
        Some(RandomWalk {
            rng: StdRng::seed_from_u64(seed),
            volatility,
            volume: 200.0,
            t,
            interval: Duration::minutes(15),
            price,
        })
    }
}

impl<R: Rng> Iterator for RandomWalk<R> {
    type Item = Bar;
    fn next(&mut self) -> Option<Bar> {
        let o = self.price;
        let ret: f64 = self.rng.sample(StandardNormal);
        let c = o * (ret * self.volatility).exp();
        let wick: f64 = self.rng.sample(StandardNormal);
        let wick = (wick * self.volatility).abs().min(0.5);
        let h = o.max(c) * (1.0 + wick);
        let l = o.min(c) * (1.0 - wick);
        let noise: f64 = self.rng.sample(StandardNormal);
        let v = (self.volume * (1.0 + 0.4 * noise)).max(1.0).round();
        let bar = Bar {
            t: self.t,
            o,
            h,
            l,
            c,
            v,
        };
        self.t = self.t + self.interval;
        self.price = c;
        Some(bar)
    }
}

/// A reproducible walk of gold bars from mid-2004, for tests and demos
pub fn gold_walk(seed: u64) -> RandomWalk {
    RandomWalk {
        rng: StdRng::seed_from_u64(seed),
        volatility: 0.002,
        volume: 200.0,
        t: NaiveDate::from_ymd_opt(2004, 6, 11)
            .and_then(|d| d.and_hms_opt(7, 15, 0))
            .unwrap_or_default(),
        interval: Duration::minutes(15),
        price: 384.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_are_consistent() {
        for bar in gold_walk(7).take(2000) {
            assert!(bar.l > 0.0);
            assert!(bar.h >= bar.o.max(bar.c));
            assert!(bar.l <= bar.o.min(bar.c));
            assert!(bar.v >= 1.0);
        }
    }

    #[test]
    fn walks_are_reproducible() {
        let a: Vec<Bar> = gold_walk(11).take(50).collect();
        let b: Vec<Bar> = gold_walk(11).take(50).collect();
        assert_eq!(a, b);
        assert_eq!(a[1].t - a[0].t, Duration::minutes(15));
        assert_eq!(a[1].o, a[0].c);
    }

    #[test]
    fn gold_walk_starts_at_the_first_export_bar() {
        let first = gold_walk(5).next().unwrap();
        assert_eq!(first.t.to_string(), "2004-06-11 07:15:00");
        assert_eq!(first.o, 384.0);
    }

    #[test]
    fn invalid_volatility_is_rejected() {
        assert!(RandomWalk::seeded(1, gold_walk(1).t, 384.0, -1.0).is_none());
    }
}
