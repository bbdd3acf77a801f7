use glam::Vec2;

/// Texture coordinate transform: `uv' = uv * repeat + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureMapping {
    pub repeat: Vec2,
    pub offset: Vec2,
}

impl TextureMapping {
    pub const IDENTITY: Self = Self {
        repeat: Vec2::ONE,
        offset: Vec2::ZERO,
    };

    pub fn apply(&self, uv: Vec2) -> Vec2 {
        uv * self.repeat + self.offset
    }
}

impl Default for TextureMapping {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Centered crop of a `source_aspect` image onto a `target_aspect` surface.
///
/// A relatively wider source keeps its full height and loses width, a taller one keeps its full
/// width and loses height. Either way the sampled window has the target's aspect ratio, so nothing
/// is stretched.
pub fn aspect_fit(target_aspect: f32, source_aspect: f32) -> TextureMapping {
    let valid = |a: f32| a.is_finite() && a > 0.0;
    if !valid(target_aspect) || !valid(source_aspect) {
        return TextureMapping::IDENTITY;
    }

    if source_aspect > target_aspect {
        let repeat_x = target_aspect / source_aspect;
        TextureMapping {
            repeat: Vec2::new(repeat_x, 1.0),
            offset: Vec2::new((1.0 - repeat_x) / 2.0, 0.0),
        }
    } else {
        let repeat_y = source_aspect / target_aspect;
        TextureMapping {
            repeat: Vec2::new(1.0, repeat_y),
            offset: Vec2::new(0.0, (1.0 - repeat_y) / 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn narrower_source_crops_height() {
        let m = aspect_fit(16.0 / 9.0, 4.0 / 3.0);
        assert!(approx(m.repeat, Vec2::new(1.0, 0.75)));
        assert!(approx(m.offset, Vec2::new(0.0, 0.125)));
    }

    #[test]
    fn wider_source_crops_width() {
        let m = aspect_fit(4.0 / 3.0, 16.0 / 9.0);
        assert!(approx(m.repeat, Vec2::new(0.75, 1.0)));
        assert!(approx(m.offset, Vec2::new(0.125, 0.0)));
    }

    #[test]
    fn equal_aspects_are_identity() {
        let m = aspect_fit(1.5, 1.5);
        assert!(approx(m.repeat, Vec2::ONE));
        assert!(approx(m.offset, Vec2::ZERO));
    }

    #[test]
    fn crop_window_is_centered() {
        let m = aspect_fit(1.0, 2.0);
        let lo = m.apply(Vec2::ZERO);
        let hi = m.apply(Vec2::ONE);
        assert!(((lo.x + hi.x) / 2.0 - 0.5).abs() < 1e-6);
        assert!(((lo.y + hi.y) / 2.0 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn degenerate_aspects_fall_back_to_identity() {
        assert_eq!(aspect_fit(0.0, 1.0), TextureMapping::IDENTITY);
        assert_eq!(aspect_fit(1.0, f32::NAN), TextureMapping::IDENTITY);
        assert_eq!(aspect_fit(f32::INFINITY, 1.0), TextureMapping::IDENTITY);
    }
}
