//! Coordinate scales matching d3-scale semantics.
//!
//! The geometry must agree with what the service's own preview renders,
//! so band/point/linear behave exactly like their d3 counterparts
//! (align 0.5, no rounding).

/// Maps ordinal categories to evenly spaced bands with padding.
#[derive(Debug, Clone)]
pub struct BandScale {
    step: f64,
    bandwidth: f64,
    start: f64,
}

impl BandScale {
    /// `padding` applies as both inner and outer padding, like
    /// `scaleBand().padding(p)`.
    pub fn new(len: usize, range: f64, padding: f64) -> Self {
        let n = len as f64;
        let step = range / (n - padding + 2.0 * padding).max(1.0);
        let start = (range - step * (n - padding)) * 0.5;
        Self {
            step,
            bandwidth: step * (1.0 - padding),
            start,
        }
    }

    /// Left edge of band `i`.
    pub fn position(&self, i: usize) -> f64 {
        self.start + self.step * i as f64
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

/// Maps ordinal categories to points spanning the full range.
#[derive(Debug, Clone)]
pub struct PointScale {
    step: f64,
    start: f64,
}

impl PointScale {
    pub fn new(len: usize, range: f64) -> Self {
        let n = len as f64;
        let step = range / (n - 1.0).max(1.0);
        // A single point sits centered in the range.
        let start = (range - step * (n - 1.0)) * 0.5;
        Self { step, start }
    }

    pub fn position(&self, i: usize) -> f64 {
        self.start + self.step * i as f64
    }
}

/// Continuous linear mapping, typically with an inverted (screen-space)
/// range for the y axis.
#[derive(Debug, Clone)]
pub struct LinearScale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            d0: domain.0,
            d1: domain.1,
            r0: range.0,
            r1: range.1,
        }
    }

    /// Y scale for value data: domain `[0, 1.1 * max]` so the tallest
    /// point never touches the top edge. An all-zero or negative max
    /// degenerates to a unit domain instead of dividing by zero.
    pub fn value_axis(max: f64, height: f64) -> Self {
        let top = if max > 0.0 {
            max * crate::constants::Y_AXIS_HEADROOM
        } else {
            1.0
        };
        Self::new((0.0, top), (height, 0.0))
    }

    pub fn scale(&self, v: f64) -> f64 {
        let span = self.d1 - self.d0;
        if span == 0.0 {
            return self.r0;
        }
        self.r0 + (v - self.d0) / span * (self.r1 - self.r0)
    }

    pub fn domain_max(&self) -> f64 {
        self.d1
    }

    /// Evenly spaced tick values over the domain at a "nice" step,
    /// following the d3 ticks increment (1/2/5 times a power of ten).
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let span = (self.d1 - self.d0).abs();
        if span == 0.0 || count == 0 {
            return vec![self.d0];
        }
        let raw_step = span / count as f64;
        let power = raw_step.log10().floor();
        let base = 10f64.powf(power);
        let err = raw_step / base;
        let step = if err >= 7.07 {
            base * 10.0
        } else if err >= 3.16 {
            base * 5.0
        } else if err >= 1.41 {
            base * 2.0
        } else {
            base
        };
        let lo = (self.d0.min(self.d1) / step).ceil() as i64;
        let hi = (self.d0.max(self.d1) / step).floor() as i64;
        (lo..=hi).map(|i| i as f64 * step).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn band_scale_matches_d3_geometry() {
        // n=4, range=100, padding=0.2: step = 100/4.2, bw = step*0.8
        let scale = BandScale::new(4, 100.0, 0.2);
        let step = 100.0 / 4.2;
        close(scale.bandwidth(), step * 0.8);
        close(scale.position(0), (100.0 - step * 3.8) * 0.5);
        close(scale.position(1) - scale.position(0), step);
    }

    #[test]
    fn band_occupancy_stays_inside_range() {
        let scale = BandScale::new(7, 640.0, 0.2);
        let last = scale.position(6) + scale.bandwidth();
        assert!(scale.position(0) > 0.0);
        assert!(last < 640.0);
    }

    #[test]
    fn point_scale_spans_full_range() {
        let scale = PointScale::new(5, 100.0);
        close(scale.position(0), 0.0);
        close(scale.position(4), 100.0);
        close(scale.position(2), 50.0);
    }

    #[test]
    fn single_point_is_centered() {
        let scale = PointScale::new(1, 100.0);
        close(scale.position(0), 50.0);
    }

    #[test]
    fn value_axis_adds_ten_percent_headroom() {
        let scale = LinearScale::value_axis(150.0, 400.0);
        close(scale.domain_max(), 165.0);
        close(scale.scale(0.0), 400.0);
        close(scale.scale(165.0), 0.0);
    }

    #[test]
    fn value_axis_guards_zero_max() {
        let scale = LinearScale::value_axis(0.0, 400.0);
        close(scale.domain_max(), 1.0);
        close(scale.scale(0.0), 400.0);
    }

    #[test]
    fn ticks_use_nice_steps() {
        let scale = LinearScale::value_axis(100.0, 400.0);
        let ticks = scale.ticks(5);
        assert!(ticks.contains(&0.0));
        assert!(ticks.contains(&100.0));
        for pair in ticks.windows(2) {
            close(pair[1] - pair[0], 20.0);
        }
    }
}
