use rand::Rng;

use crate::config::Settings;

#[derive(Clone, Debug)]
pub(crate) struct IdleAutoSwitchTimer {
    idle_timeout_secs: f64,
    interval_range_ms: (u32, u32),
    last_interaction_secs: f64,
    last_switch_secs: f64,
    interval_secs: f64,
}

impl IdleAutoSwitchTimer {
    pub(crate) fn new<R: Rng>(settings: &Settings, now: f64, rng: &mut R) -> Self {
        let mut timer = Self {
            idle_timeout_secs: settings.idle_timeout_secs,
            interval_range_ms: settings.auto_switch_ms,
            last_interaction_secs: now,
            last_switch_secs: now,
            interval_secs: 0.0,
        };
        timer.redraw_interval(rng);
        timer
    }

    fn redraw_interval<R: Rng>(&mut self, rng: &mut R) {
        let (low, high) = self.interval_range_ms;
        let millis = rng.gen_range(low.min(high)..=high.max(low));
        self.interval_secs = f64::from(millis) / 1000.0;
    }

    #[cfg(test)]
    pub(crate) fn interval_secs(&self) -> f64 {
        self.interval_secs
    }

    pub(crate) fn note_interaction(&mut self, now: f64) {
        self.last_interaction_secs = now;
    }

    pub(crate) fn is_idle(&self, now: f64) -> bool {
        now - self.last_interaction_secs > self.idle_timeout_secs
    }

    pub(crate) fn tick<R: Rng>(&mut self, now: f64, rng: &mut R) -> bool {
        if !self.is_idle(now) || now - self.last_switch_secs <= self.interval_secs {
            return false;
        }

        self.last_switch_secs = now;
        self.redraw_interval(rng);
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn timer(rng: &mut StdRng) -> IdleAutoSwitchTimer {
        IdleAutoSwitchTimer::new(&Settings::default(), 0.0, rng)
    }

    #[test]
    fn interval_is_drawn_from_configured_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let interval = timer(&mut rng).interval_secs();
            assert!((0.35..=0.8).contains(&interval), "{interval}");
        }
    }

    #[test]
    fn nothing_fires_before_idle_timeout() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut timer = timer(&mut rng);
        for step in 0..100 {
            assert!(!timer.tick(step as f64 * 0.1, &mut rng));
        }
    }

    #[test]
    fn switches_follow_the_randomized_cadence() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut timer = timer(&mut rng);

        let first = 10.5;
        assert!(timer.tick(first, &mut rng));
        let interval = timer.interval_secs();

        let mut fired = 0;
        for now in [first + 0.1, first + 0.2] {
            assert!(now - first < interval);
            fired += usize::from(timer.tick(now, &mut rng));
        }
        assert_eq!(fired, 0);

        let third = first + 0.9;
        assert!(third - first > interval);
        assert!(timer.tick(third, &mut rng));
        assert!((0.35..=0.8).contains(&timer.interval_secs()));
        assert!(!timer.tick(third + 0.01, &mut rng));
    }

    #[test]
    fn interaction_suppresses_switching_until_idle_again() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut timer = timer(&mut rng);
        assert!(timer.tick(11.0, &mut rng));

        timer.note_interaction(11.2);
        assert!(!timer.is_idle(12.0));
        assert!(!timer.tick(15.0, &mut rng));
        assert!(!timer.tick(21.1, &mut rng));
        assert!(timer.tick(21.3, &mut rng));
    }
}
