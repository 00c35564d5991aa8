use glam::Vec2;

/// Raw pointer position in client pixels, captured on press/move.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Pad bounds in the same space as `PointerSample`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PadRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PadRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Square pad anchored at the origin.
    pub fn square(size: f32) -> Self {
        Self::new(0.0, 0.0, size, size)
    }

    #[inline]
    fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Pointer position relative to the pad, clamped to its bounds (pixels).
    pub fn clamp_px(&self, sample: PointerSample) -> Vec2 {
        if self.is_degenerate() {
            return Vec2::ZERO;
        }
        let x = clamp_finite(sample.x - self.left, self.width);
        let y = clamp_finite(sample.y - self.top, self.height);
        Vec2::new(x, y)
    }

    /// Clamp and divide by the pad size.
    pub fn normalize(&self, sample: PointerSample) -> NormalizedCoordinate {
        if self.is_degenerate() {
            return NormalizedCoordinate::CENTER;
        }
        let px = self.clamp_px(sample);
        NormalizedCoordinate::new(px.x / self.width, px.y / self.height)
    }

    /// Pixel position of a normalized coordinate inside the pad.
    pub fn to_px(&self, coord: NormalizedCoordinate) -> Vec2 {
        Vec2::new(coord.u * self.width.max(0.0), coord.v * self.height.max(0.0))
    }
}

// NaN lands in the middle of the axis; infinities clamp to the edges.
#[inline]
fn clamp_finite(offset: f32, extent: f32) -> f32 {
    if offset.is_nan() {
        extent * 0.5
    } else {
        offset.clamp(0.0, extent)
    }
}

/// Pointer position inside the pad, `u` left→right and `v` top→bottom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedCoordinate {
    pub u: f32,
    pub v: f32,
}

impl NormalizedCoordinate {
    pub const CENTER: Self = Self { u: 0.5, v: 0.5 };

    pub fn new(u: f32, v: f32) -> Self {
        let fix = |c: f32| if c.is_nan() { 0.5 } else { c.clamp(0.0, 1.0) };
        Self { u: fix(u), v: fix(v) }
    }

    /// Vertical position with the top of the pad at 1.
    #[inline]
    pub fn lift(&self) -> f32 {
        1.0 - self.v
    }
}

impl Default for NormalizedCoordinate {
    fn default() -> Self {
        Self::CENTER
    }
}
