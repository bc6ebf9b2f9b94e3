//! Dense per-band pixel buffers.

use colorscale::Rgb;

/// The four raster bands (R, G, B, alpha), each rows x columns.
///
/// Alpha starts fully transparent; writing a pixel makes it opaque, so
/// never-written cells stay nodata in the output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBands {
    pub rows: usize,
    pub columns: usize,
    pub red: Vec<u8>,
    pub green: Vec<u8>,
    pub blue: Vec<u8>,
    pub alpha: Vec<u8>,
}

impl RasterBands {
    pub fn new(rows: usize, columns: usize) -> Self {
        let size = rows * columns;
        Self {
            rows,
            columns,
            red: vec![0; size],
            green: vec![0; size],
            blue: vec![0; size],
            alpha: vec![0; size],
        }
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.columns + col
    }

    /// Set a pixel's color and make it opaque.
    pub fn set(&mut self, row: usize, col: usize, color: Rgb) {
        let idx = self.index(row, col);
        self.red[idx] = color.r;
        self.green[idx] = color.g;
        self.blue[idx] = color.b;
        self.alpha[idx] = 255;
    }

    /// Read back one pixel as (r, g, b, a).
    pub fn pixel(&self, row: usize, col: usize) -> (u8, u8, u8, u8) {
        let idx = self.index(row, col);
        (
            self.red[idx],
            self.green[idx],
            self.blue[idx],
            self.alpha[idx],
        )
    }

    /// Interleave the bands into RGBA scanline order for encoding.
    pub fn interleaved(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.red.len() * 4);
        for idx in 0..self.red.len() {
            out.push(self.red[idx]);
            out.push(self.green[idx]);
            out.push(self.blue[idx]);
            out.push(self.alpha[idx]);
        }
        out
    }
}
