use std::ops::{Index, IndexMut};

/// 64x32 monochrome framebuffer, row-major, `true` is a lit pixel
pub struct Display([bool; Self::WIDTH * Self::HEIGHT]);

impl Display {
    pub const WIDTH: usize = 64;
    pub const HEIGHT: usize = 32;

    pub const COLOR_WHITE: u32 = 0xFFFFFFFF;
    pub const COLOR_BLACK: u32 = 0xFF000000;

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn clear(&mut self) {
        self.0.fill(false);
    }

    /// Pixel at (x, y), both wrapped onto the grid
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.0[Self::offset(x, y)]
    }

    /// XORs a pixel onto the grid at (x, y), wrapping both coordinates
    ///
    /// Returns true if a lit pixel was turned off.
    pub fn flip(&mut self, x: usize, y: usize) -> bool {
        let offset = Self::offset(x, y);
        let erased = self.0[offset];

        self.0[offset] = !erased;

        erased
    }

    /// Converts the framebuffer into an ARGB pixel buffer (opaque alpha) for the window
    pub fn render_into(&self, buffer: &mut [u32]) {
        for (dst, &lit) in buffer.iter_mut().zip(self.0.iter()) {
            *dst = if lit { Self::COLOR_WHITE } else { Self::COLOR_BLACK };
        }
    }

    fn offset(x: usize, y: usize) -> usize {
        Self::WIDTH * (y % Self::HEIGHT) + (x % Self::WIDTH)
    }
}

impl Default for Display {
    fn default() -> Self {
        Self([false; Self::WIDTH * Self::HEIGHT])
    }
}

impl Index<usize> for Display {
    type Output = bool;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for Display {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}
