//! Addressable LED strip trait

use crate::animation::Color;

/// Fixed-length addressable LED strip
///
/// Writes only touch the frame buffer; nothing reaches the LEDs until
/// [`LedStrip::show`] is called.
pub trait LedStrip {
    /// Number of cells on the strip
    fn cell_count(&self) -> usize;

    /// Set one cell; out-of-range indices are ignored
    fn set_pixel(&mut self, index: usize, color: Color);

    /// Set every cell to the same color
    fn set_all(&mut self, color: Color) {
        for i in 0..self.cell_count() {
            self.set_pixel(i, color);
        }
    }

    /// Push the frame buffer to the LEDs
    fn show(&mut self);
}
