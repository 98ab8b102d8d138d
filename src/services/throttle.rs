//! Client-side token bucket keeping request bursts under the service ceiling.

use std::num::NonZeroU32;
use std::thread;

use governor::{
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use log::debug;

type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

pub struct Throttle {
    limiter: Option<Limiter>,
    clock: DefaultClock,
}

impl Throttle {
    /// `per_second == 0` yields a throttle that never waits.
    pub fn per_second(per_second: u32) -> Self {
        Throttle {
            limiter: NonZeroU32::new(per_second)
                .map(|rate| RateLimiter::direct(Quota::per_second(rate))),
            clock: DefaultClock::default(),
        }
    }

    pub fn wait(&self) {
        let Some(limiter) = &self.limiter else {
            return;
        };

        while let Err(not_until) = limiter.check() {
            let wait_time = not_until.wait_time_from(self.clock.now());
            debug!("request rate ceiling reached, waiting {wait_time:?}");
            thread::sleep(wait_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn burst_beyond_quota_is_delayed() {
        let throttle = Throttle::per_second(5);
        let start = Instant::now();
        for _ in 0..7 {
            throttle.wait();
        }
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[test]
    fn burst_within_quota_passes() {
        let throttle = Throttle::per_second(100);
        let start = Instant::now();
        for _ in 0..50 {
            throttle.wait();
        }
        assert!(start.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn disabled_throttle_does_not_wait() {
        let throttle = Throttle::per_second(0);
        assert!(throttle.limiter.is_none());
        let start = Instant::now();
        for _ in 0..1000 {
            throttle.wait();
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
