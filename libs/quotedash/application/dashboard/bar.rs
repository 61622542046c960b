//! Horizontal bar geometry shared by the depth and ratio bars

/// A filled span `[begin, end)` on a scale of `size`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BarSpan {
    pub size: f64,
    pub begin: f64,
    pub end: f64,
}

impl BarSpan {
    pub fn new(size: f64, begin: f64, end: f64) -> Self {
        Self { size, begin, end }
    }

    /// Filled fraction of the scale, 0 when the scale is empty
    pub fn fraction(&self) -> f64 {
        if self.size <= 0.0 {
            0.0
        } else {
            ((self.end - self.begin) / self.size).clamp(0.0, 1.0)
        }
    }

    /// Split `width` cells into (leading, filled, trailing) counts
    pub fn segments(&self, width: usize) -> (usize, usize, usize) {
        if self.size <= 0.0 || width == 0 {
            return (width, 0, 0);
        }

        let cell = |v: f64| -> usize {
            let scaled = (v / self.size).clamp(0.0, 1.0) * width as f64;
            (scaled.round() as usize).min(width)
        };

        let start = cell(self.begin);
        let stop = cell(self.end).max(start);
        (start, stop - start, width - stop)
    }
}
