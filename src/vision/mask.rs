//! Binary pixel masks and 5×5 morphology.
//!
//! Erosion and dilation with a rectangular element are separable, so both
//! run as a horizontal pass followed by a vertical pass.  Pixels outside
//! the image are ignored (they neither erode nor dilate), so a fully set
//! mask survives an opening intact.

/// Row-major binary mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

/// Side length of the square structuring element.
pub const KERNEL_SIZE: usize = 5;

impl BinaryMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![false; width * height],
        }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        self.data[y * self.width + x] = value;
    }

    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Percentage of set pixels.  An empty mask has zero coverage.
    pub fn coverage_pct(&self) -> f64 {
        let area = self.width * self.height;
        if area == 0 {
            return 0.0;
        }
        100.0 * self.count_set() as f64 / area as f64
    }

    /// Erode then dilate: removes specks smaller than the element.
    pub fn open(&self, size: usize) -> Self {
        self.erode(size).dilate(size)
    }

    /// Dilate then erode: fills gaps smaller than the element.
    pub fn close(&self, size: usize) -> Self {
        self.dilate(size).erode(size)
    }

    pub fn erode(&self, size: usize) -> Self {
        self.rect_filter(size, true)
    }

    pub fn dilate(&self, size: usize) -> Self {
        self.rect_filter(size, false)
    }

    /// `erode == true` takes the window AND (min), otherwise the window OR (max).
    fn rect_filter(&self, size: usize, erode: bool) -> Self {
        if self.data.is_empty() || size <= 1 {
            return self.clone();
        }
        let r = size / 2;
        let (w, h) = (self.width, self.height);

        let mut horiz = vec![false; w * h];
        for y in 0..h {
            let row = &self.data[y * w..(y + 1) * w];
            for x in 0..w {
                let lo = x.saturating_sub(r);
                let hi = (x + r).min(w - 1);
                let window = &row[lo..=hi];
                horiz[y * w + x] = if erode {
                    window.iter().all(|&v| v)
                } else {
                    window.iter().any(|&v| v)
                };
            }
        }

        let mut out = vec![false; w * h];
        for x in 0..w {
            for y in 0..h {
                let lo = y.saturating_sub(r);
                let hi = (y + r).min(h - 1);
                let mut column = (lo..=hi).map(|yy| horiz[yy * w + x]);
                out[y * w + x] = if erode {
                    column.all(|v| v)
                } else {
                    column.any(|v| v)
                };
            }
        }

        Self {
            width: w,
            height: h,
            data: out,
        }
    }
}
