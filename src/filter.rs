//! Fixed-window moving-average filter.
//!
//! The window is a ring of the last `N` samples plus a running sum, so
//! each insertion costs one subtraction and one addition regardless of
//! `N`. No allocation: the state is `N` samples plus three words.
//!
//! The running sum is an `i32`. `N` samples of a full-scale `i16` fit in
//! it for every `N` up to 65536, so the sum never wraps and always equals
//! the exact sum of the window.

use crate::config::FILTER_WINDOW;

/// Moving-average state, owned by the task sampling one sensor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovingAverageFilter<const N: usize = FILTER_WINDOW> {
    buf: [i16; N],
    index: usize,
    sum: i32,
    value: i16,
}

impl<const N: usize> MovingAverageFilter<N> {
    const WINDOW_FITS: () = assert!(N > 0 && N <= 65536, "window must hold 1..=65536 samples");

    /// All-zero window.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::WINDOW_FITS;
        Self {
            buf: [0; N],
            index: 0,
            sum: 0,
            value: 0,
        }
    }

    /// Push `sample` into the window, evicting the oldest one, and return
    /// the new average (truncated toward zero).
    pub fn insert_sample(&mut self, sample: i16) -> i16 {
        self.sum -= i32::from(self.buf[self.index]);
        self.buf[self.index] = sample;
        self.sum += i32::from(sample);

        self.index = (self.index + 1) % N;

        // |sum / N| <= |i16::MIN|, so the narrowing cannot truncate.
        self.value = (self.sum / N as i32) as i16;
        self.value
    }

    /// Average after the most recent insertion.
    pub fn current_value(&self) -> i16 {
        self.value
    }

    /// Exact sum of the samples in the window.
    pub fn running_sum(&self) -> i32 {
        self.sum
    }

    /// Window contents in storage order (not insertion order).
    pub fn samples(&self) -> &[i16; N] {
        &self.buf
    }

    /// Back to the all-zero window.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl<const N: usize> Default for MovingAverageFilter<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// xorshift32; deterministic so failures reproduce.
    struct Samples(u32);

    impl Samples {
        fn next(&mut self) -> i16 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            x as i16
        }
    }

    fn exact_sum<const N: usize>(f: &MovingAverageFilter<N>) -> i32 {
        f.samples().iter().map(|&s| i32::from(s)).sum()
    }

    #[test]
    fn starts_at_zero() {
        let f: MovingAverageFilter = MovingAverageFilter::new();
        assert_eq!(f.current_value(), 0);
        assert_eq!(f.running_sum(), 0);
        assert!(f.samples().iter().all(|&s| s == 0));
        assert_eq!(f.samples().len(), 32);
    }

    #[test]
    fn running_sum_matches_window_for_random_sequences() {
        for seed in 1..=64u32 {
            let mut rng = Samples(seed.wrapping_mul(0x9E37_79B9));
            let mut f: MovingAverageFilter = MovingAverageFilter::new();
            let len = 1 + (seed as usize * 37) % 500;
            for _ in 0..len {
                let returned = f.insert_sample(rng.next());
                assert_eq!(f.running_sum(), exact_sum(&f), "seed {seed}");
                assert_eq!(i32::from(returned), exact_sum(&f) / 32, "seed {seed}");
                assert_eq!(returned, f.current_value());
            }
        }
    }

    #[test]
    fn full_scale_samples_do_not_overflow() {
        let mut f: MovingAverageFilter = MovingAverageFilter::new();
        for _ in 0..64 {
            f.insert_sample(i16::MAX);
        }
        assert_eq!(f.running_sum(), 32 * i32::from(i16::MAX));
        assert_eq!(f.current_value(), i16::MAX);

        for _ in 0..64 {
            f.insert_sample(i16::MIN);
        }
        assert_eq!(f.running_sum(), 32 * i32::from(i16::MIN));
        assert_eq!(f.current_value(), i16::MIN);
    }

    #[test]
    fn converges_to_constant_input_and_stays_there() {
        let mut f: MovingAverageFilter = MovingAverageFilter::new();
        for _ in 0..32 {
            f.insert_sample(700);
        }
        assert_eq!(f.current_value(), 700);
        for _ in 0..100 {
            assert_eq!(f.insert_sample(700), 700);
        }
    }

    #[test]
    fn division_truncates_toward_zero() {
        let mut f: MovingAverageFilter = MovingAverageFilter::new();
        // 31 / 32 -> 0, -31 / 32 -> 0 (not -1)
        f.insert_sample(31);
        assert_eq!(f.current_value(), 0);

        let mut g: MovingAverageFilter = MovingAverageFilter::new();
        g.insert_sample(-31);
        assert_eq!(g.current_value(), 0);
        g.insert_sample(-1);
        assert_eq!(g.current_value(), -1);
    }

    #[test]
    fn oldest_sample_is_evicted_after_full_window() {
        let mut f = MovingAverageFilter::<4>::new();
        f.insert_sample(400);
        f.insert_sample(0);
        f.insert_sample(0);
        assert_eq!(f.insert_sample(0), 100);
        // Wraps onto the 400.
        assert_eq!(f.insert_sample(0), 0);
        assert_eq!(f.running_sum(), 0);
    }

    #[test]
    fn independent_instances_do_not_share_position() {
        let mut a = MovingAverageFilter::<2>::new();
        let mut b = MovingAverageFilter::<2>::new();
        a.insert_sample(10);
        a.insert_sample(20);
        b.insert_sample(100);
        // a wraps to slot 0, b writes slot 1.
        assert_eq!(a.insert_sample(30), 25);
        assert_eq!(b.insert_sample(100), 100);
    }

    #[test]
    fn reset_clears_window() {
        let mut f: MovingAverageFilter = MovingAverageFilter::new();
        f.insert_sample(1000);
        f.reset();
        assert_eq!(f, MovingAverageFilter::new());
    }
}
