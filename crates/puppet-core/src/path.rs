//! Human-like pointer trajectories.
//!
//! A path is a finite list of integer points ending exactly at the target,
//! each paired with the delay to sleep after moving there. Points follow a
//! smoothstep ease along the straight line, nudged sideways by a bounded
//! random walk. Progress along the start→end axis never decreases.

use crate::geometry::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2};
use std::time::Duration;

/// Tunables for path synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Pixels covered per step at speed 1.
    pub step_pixels: f64,
    /// Movement time per pixel at speed 1.
    pub micros_per_pixel: f64,
    /// Upper bound on steps regardless of distance.
    pub max_steps: usize,
    /// Maximum sideways offset of a point from the straight line.
    pub jitter_radius: f64,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            step_pixels: 4.0,
            micros_per_pixel: 2000.0,
            max_steps: 500,
            jitter_radius: 1.5,
        }
    }
}

impl PathConfig {
    /// Furthest any emitted point may sit from its ideal eased position.
    pub fn max_deviation(&self) -> f64 {
        self.jitter_radius.max(0.0) + 1.5 * SQRT_2
    }
}

/// Strictly positive, finite movement speed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Speed(f64);

impl Speed {
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// One point of a synthesized path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub point: Point,
    pub delay_micros: u64,
}

impl PathStep {
    pub fn delay(&self) -> Duration {
        Duration::from_micros(self.delay_micros)
    }
}

fn ease(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Build the trajectory from `start` to `end`.
///
/// Pure apart from `rng`, which only drives the sideways jitter; the step
/// count, delays and final point depend on the inputs alone.
pub fn synthesize_path<R: Rng + ?Sized>(
    start: Point,
    end: Point,
    speed: Speed,
    config: &PathConfig,
    rng: &mut R,
) -> Vec<PathStep> {
    if start == end {
        return vec![PathStep {
            point: end,
            delay_micros: 0,
        }];
    }

    let distance = start.distance(end);
    let speed = speed.get();
    let stride = (config.step_pixels * speed).max(f64::MIN_POSITIVE);
    let max_steps = config.max_steps.max(1);
    let steps = ((distance / stride).ceil() as usize).clamp(1, max_steps);

    let total_micros = distance * config.micros_per_pixel.max(0.0) / speed;
    let delay_micros = (total_micros / steps as f64).round() as u64;

    let (sx, sy) = (f64::from(start.x), f64::from(start.y));
    let (dx, dy) = (f64::from(end.x) - sx, f64::from(end.y) - sy);
    let (ux, uy) = (dx / distance, dy / distance);
    // Unit normal to the line.
    let (nx, ny) = (-uy, ux);
    let progress = |p: Point| (f64::from(p.x) - sx) * ux + (f64::from(p.y) - sy) * uy;
    let round = |x: f64, y: f64| Point::new(x.round() as i32, y.round() as i32);

    let radius = config.jitter_radius.max(0.0);
    let mut walk = 0.0_f64;
    let mut last = start;
    let mut last_progress = 0.0_f64;
    let mut path = Vec::with_capacity(steps);

    for i in 1..=steps {
        let point = if i == steps {
            end
        } else {
            let t = i as f64 / steps as f64;
            let e = ease(t);
            let (ix, iy) = (sx + e * dx, sy + e * dy);

            if radius > 0.0 {
                walk = (walk + rng.gen_range(-0.5..=0.5) * radius).clamp(-radius, radius);
            }
            let offset = walk * (PI * t).sin();

            let jittered = round(ix + nx * offset, iy + ny * offset);
            let ideal = round(ix, iy);
            let in_order = |p: Point| {
                let s = progress(p);
                s >= last_progress && s <= distance
            };

            if in_order(jittered) {
                jittered
            } else if in_order(ideal) {
                ideal
            } else if progress(ideal) > distance {
                end
            } else {
                last
            }
        };

        last = point;
        last_progress = progress(point);
        path.push(PathStep {
            point,
            delay_micros,
        });
    }

    tracing::trace!(?start, ?end, steps, delay_micros, "synthesized path");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn speed(v: f64) -> Speed {
        Speed::new(v).unwrap()
    }

    fn path(start: Point, end: Point, v: f64, seed: u64) -> Vec<PathStep> {
        let mut rng = StdRng::seed_from_u64(seed);
        synthesize_path(start, end, speed(v), &PathConfig::default(), &mut rng)
    }

    #[test]
    fn test_speed_rejects_non_positive() {
        assert!(Speed::new(0.0).is_none());
        assert!(Speed::new(-1.0).is_none());
        assert!(Speed::new(f64::NAN).is_none());
        assert!(Speed::new(f64::INFINITY).is_none());
        assert_eq!(Speed::new(2.5).map(Speed::get), Some(2.5));
    }

    #[test]
    fn test_last_point_is_exact() {
        let cases = [
            (Point::new(0, 0), Point::new(1, 0)),
            (Point::new(0, 0), Point::new(500, 300)),
            (Point::new(-100, 40), Point::new(-900, -700)),
            (Point::new(10, 10), Point::new(10, 11)),
            (Point::new(3000, 0), Point::new(0, 2000)),
        ];
        for (seed, (start, end)) in cases.into_iter().enumerate() {
            for v in [0.1, 1.0, 3.0, 50.0] {
                let steps = path(start, end, v, seed as u64);
                assert_eq!(steps.last().unwrap().point, end, "{start:?} -> {end:?} at {v}");
            }
        }
    }

    #[test]
    fn test_same_start_and_end() {
        let p = Point::new(5, 5);
        let steps = path(p, p, 3.0, 0);
        assert_eq!(steps, vec![PathStep { point: p, delay_micros: 0 }]);
    }

    #[test]
    fn test_progress_never_decreases() {
        let start = Point::new(100, 100);
        for (seed, end) in [Point::new(900, 450), Point::new(95, 103), Point::new(-400, 800)]
            .into_iter()
            .enumerate()
        {
            let steps = path(start, end, 0.5, seed as u64);
            let d = start.distance(end);
            let (ux, uy) = (f64::from(end.x - start.x) / d, f64::from(end.y - start.y) / d);
            let proj = |p: Point| f64::from(p.x - start.x) * ux + f64::from(p.y - start.y) * uy;
            let mut prev = 0.0;
            for s in &steps {
                let cur = proj(s.point);
                assert!(cur >= prev, "went back from {prev} to {cur}");
                assert!(cur <= d + 1e-9);
                prev = cur;
            }
        }
    }

    #[test]
    fn test_jitter_is_bounded() {
        let config = PathConfig {
            jitter_radius: 4.0,
            ..PathConfig::default()
        };
        let start = Point::new(0, 0);
        let end = Point::new(1200, -500);
        let bound = config.max_deviation();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let steps = synthesize_path(start, end, speed(1.0), &config, &mut rng);
            let n = steps.len() as f64;
            for (i, s) in steps.iter().enumerate() {
                let e = ease((i + 1) as f64 / n);
                let ideal = (e * 1200.0, e * -500.0);
                let dev = ((f64::from(s.point.x) - ideal.0).powi(2)
                    + (f64::from(s.point.y) - ideal.1).powi(2))
                .sqrt();
                assert!(dev <= bound, "step {i} deviates {dev} > {bound}");
            }
        }
    }

    #[test]
    fn test_no_jitter_is_deterministic() {
        let config = PathConfig {
            jitter_radius: 0.0,
            ..PathConfig::default()
        };
        let a = synthesize_path(
            Point::new(0, 0),
            Point::new(300, 200),
            speed(2.0),
            &config,
            &mut StdRng::seed_from_u64(1),
        );
        let b = synthesize_path(
            Point::new(0, 0),
            Point::new(300, 200),
            speed(2.0),
            &config,
            &mut StdRng::seed_from_u64(99),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_seed_same_path() {
        let a = path(Point::new(0, 0), Point::new(640, 480), 3.0, 42);
        let b = path(Point::new(0, 0), Point::new(640, 480), 3.0, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_steps_scale_with_distance_and_speed() {
        let origin = Point::new(0, 0);
        let short = path(origin, Point::new(100, 0), 1.0, 0).len();
        let long = path(origin, Point::new(1000, 0), 1.0, 0).len();
        let fast = path(origin, Point::new(1000, 0), 5.0, 0).len();
        assert_eq!(short, 25);
        assert_eq!(long, 250);
        assert_eq!(fast, 50);
        assert!(short < long);
        assert!(fast < long);
    }

    #[test]
    fn test_step_count_is_capped() {
        let steps = path(Point::new(0, 0), Point::new(100_000, 0), 0.1, 0);
        assert_eq!(steps.len(), PathConfig::default().max_steps);
    }

    #[test]
    fn test_duration_scales_inversely_with_speed() {
        let total = |v: f64| -> u64 {
            path(Point::new(0, 0), Point::new(400, 0), v, 0)
                .iter()
                .map(|s| s.delay_micros)
                .sum()
        };
        // 400 px * 2000 us / speed
        assert_eq!(total(1.0), 800_000);
        assert_eq!(total(4.0), 200_000);
        assert!(total(8.0) < total(4.0));
    }
}
