use std::time::Duration;
use telemetry_config::BackoffConfig;

/// Exponential retry delay: starts at `initial`, grows by `multiplier` after
/// each consecutive failure, never exceeds `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    multiplier: f64,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration, multiplier: f64) -> Self {
        let initial = initial.min(max);
        let multiplier = if multiplier.is_finite() && multiplier >= 1.0 {
            multiplier
        } else {
            1.0
        };
        Self {
            initial,
            max,
            multiplier,
            current: initial,
        }
    }

    pub fn from_config(config: &BackoffConfig) -> Self {
        Self::new(
            Duration::from_millis(config.initial_ms),
            Duration::from_millis(config.max_ms),
            config.multiplier,
        )
    }

    /// Delay to wait before the next retry. Advances the sequence.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        let grown = self.current.as_secs_f64() * self.multiplier;
        self.current = Duration::from_secs_f64(grown.min(self.max.as_secs_f64()));
        delay
    }

    /// Back to the initial delay after a successful fetch.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::from_config(&BackoffConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn doubles_until_capped() {
        let mut backoff = Backoff::default();
        let delays: Vec<_> = (0..7).map(|_| backoff.next_delay()).collect();
        assert_eq!(
            delays,
            [ms(250), ms(500), ms(1000), ms(2000), ms(4000), ms(5000), ms(5000)]
        );
    }

    #[test]
    fn reset_starts_over() {
        let mut backoff = Backoff::default();
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();
        assert_eq!(backoff.next_delay(), ms(250));
    }

    #[test]
    fn bad_multiplier_keeps_delay_constant() {
        let mut backoff = Backoff::new(ms(100), ms(1000), f64::NAN);
        assert_eq!(backoff.next_delay(), ms(100));
        assert_eq!(backoff.next_delay(), ms(100));

        let mut shrinking = Backoff::new(ms(100), ms(1000), 0.5);
        shrinking.next_delay();
        assert_eq!(shrinking.next_delay(), ms(100));
    }

    #[test]
    fn initial_above_max_is_clamped() {
        let mut backoff = Backoff::new(ms(10_000), ms(5000), 2.0);
        assert_eq!(backoff.next_delay(), ms(5000));
    }
}
