// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear RGBA color with HSV helpers.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use rand::Rng;

/// An RGBA color with `f32` components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from its components.
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from an `[r, g, b, a]` array.
    #[inline]
    #[must_use]
    pub const fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Returns the components as an `[r, g, b, a]` array.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn max_min(self) -> (f32, f32) {
        (
            self.r.max(self.g).max(self.b),
            self.r.min(self.g).min(self.b),
        )
    }

    /// Hue in `0.0..1.0`.
    #[must_use]
    pub fn hue(self) -> f32 {
        let (max, min) = self.max_min();
        let delta = max - min;
        if delta == 0.0 {
            return 0.0;
        }
        let sector = if self.r == max {
            (self.g - self.b) / delta
        } else if self.g == max {
            2.0 + (self.b - self.r) / delta
        } else {
            4.0 + (self.r - self.g) / delta
        };
        let h = sector / 6.0;
        if h < 0.0 { h + 1.0 } else { h }
    }

    /// Saturation in `0.0..=1.0`.
    #[must_use]
    pub fn saturation(self) -> f32 {
        let (max, min) = self.max_min();
        if max == 0.0 { 0.0 } else { (max - min) / max }
    }

    /// Value (brightness) in `0.0..=1.0`.
    #[must_use]
    pub fn value(self) -> f32 {
        self.max_min().0
    }

    /// Creates a color from hue, saturation, value and alpha.
    ///
    /// The hue wraps around, so `1.05` and `0.05` are the same hue.
    #[must_use]
    pub fn from_hsv(h: f32, s: f32, v: f32, a: f32) -> Self {
        if s == 0.0 {
            return Self::new(v, v, v, a);
        }
        let h = f64::from(h);
        let h6 = (h - h.floor()) * 6.0;
        let sector = h6.floor().min(5.0);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "fractional part of an f32 hue fits in f32"
        )]
        let f = (h6 - sector) as f32;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "sector is in 0..6"
        )]
        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::new(r, g, b, a)
    }

    /// Returns this color with hue and value shifted by a uniform random
    /// amount in `±hue_jitter` and `±value_jitter`.
    ///
    /// Saturation and alpha are kept; the value is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn jittered(self, rng: &mut impl Rng, hue_jitter: f32, value_jitter: f32) -> Self {
        let dh = rng.random_range(-1.0_f32..=1.0) * hue_jitter;
        let dv = rng.random_range(-1.0_f32..=1.0) * value_jitter;
        Self::from_hsv(
            self.hue() + dh,
            self.saturation(),
            (self.value() + dv).clamp(0.0, 1.0),
            self.a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn hsv_of_primaries() {
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        assert!(close(red.hue(), 0.0), "red hue");
        assert!(close(red.saturation(), 1.0), "red saturation");
        assert!(close(red.value(), 1.0), "red value");

        let blue = Color::new(0.0, 0.0, 1.0, 1.0);
        assert!(close(blue.hue(), 4.0 / 6.0), "blue hue");
    }

    #[test]
    fn grey_has_no_hue_or_saturation() {
        let grey = Color::new(0.5, 0.5, 0.5, 1.0);
        assert_eq!(grey.hue(), 0.0);
        assert_eq!(grey.saturation(), 0.0);
        assert!(close(grey.value(), 0.5), "grey value");
    }

    #[test]
    fn hsv_round_trip_of_face_color() {
        let face = Color::new(0.5, 1.0, 1.0, 0.4);
        let back = Color::from_hsv(face.hue(), face.saturation(), face.value(), face.a);
        assert!(close(back.r, face.r), "r");
        assert!(close(back.g, face.g), "g");
        assert!(close(back.b, face.b), "b");
        assert_eq!(back.a, face.a);
    }

    #[test]
    fn hue_wraps_around() {
        let a = Color::from_hsv(1.25, 1.0, 1.0, 1.0);
        let b = Color::from_hsv(0.25, 1.0, 1.0, 1.0);
        let c = Color::from_hsv(-0.75, 1.0, 1.0, 1.0);
        assert!(close(a.r, b.r) && close(a.g, b.g) && close(a.b, b.b), "1.25 == 0.25");
        assert!(close(c.r, b.r) && close(c.g, b.g) && close(c.b, b.b), "-0.75 == 0.25");
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let base = Color::new(0.2, 0.4, 0.8, 0.4);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let c = base.jittered(&mut rng, 0.1, 0.2);
            assert_eq!(c.a, base.a);
            assert!((c.value() - base.value()).abs() <= 0.2 + 1e-4, "value jitter");
            let dh = (c.hue() - base.hue()).abs();
            let dh = dh.min(1.0 - dh);
            assert!(dh <= 0.1 + 1e-4, "hue jitter {dh}");
        }
    }
}
