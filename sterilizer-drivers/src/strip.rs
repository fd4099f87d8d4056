//! Buffered addressable LED strip
//!
//! Keeps a frame buffer of `N` cells and pushes it to any
//! [`SmartLedsWrite`] writer on `show()`, with the global brightness
//! applied on the way out.

use smart_leds::{brightness, SmartLedsWrite, RGB8};
use sterilizer_core::animation::Color;
use sterilizer_core::traits::LedStrip;

/// LED strip with a local frame buffer
pub struct BufferedStrip<W, const N: usize> {
    writer: W,
    frame: [Color; N],
    brightness: u8,
    fault: bool,
}

impl<W, const N: usize> BufferedStrip<W, N>
where
    W: SmartLedsWrite<Color = RGB8>,
{
    /// Create a strip with every cell black
    ///
    /// Nothing is written until the first `show()`.
    pub fn new(writer: W, brightness: u8) -> Self {
        Self {
            writer,
            frame: [Color::BLACK; N],
            brightness,
            fault: false,
        }
    }

    /// Current frame buffer, before brightness scaling
    pub fn frame(&self) -> &[Color; N] {
        &self.frame
    }

    /// Check if a write ever failed
    pub fn has_fault(&self) -> bool {
        self.fault
    }
}

impl<W, const N: usize> LedStrip for BufferedStrip<W, N>
where
    W: SmartLedsWrite<Color = RGB8>,
{
    fn cell_count(&self) -> usize {
        N
    }

    fn set_pixel(&mut self, index: usize, color: Color) {
        if let Some(cell) = self.frame.get_mut(index) {
            *cell = color;
        }
    }

    fn set_all(&mut self, color: Color) {
        self.frame = [color; N];
    }

    fn show(&mut self) {
        let pixels = self.frame.iter().map(|c| RGB8::new(c.r, c.g, c.b));
        if self
            .writer
            .write(brightness(pixels, self.brightness))
            .is_err()
        {
            self.fault = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELLS: usize = 4;

    struct MockWriter {
        last: [RGB8; CELLS],
        writes: usize,
        fail: bool,
    }

    impl MockWriter {
        fn new() -> Self {
            Self {
                last: [RGB8::default(); CELLS],
                writes: 0,
                fail: false,
            }
        }
    }

    impl SmartLedsWrite for MockWriter {
        type Error = ();
        type Color = RGB8;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            if self.fail {
                return Err(());
            }
            for (cell, color) in self.last.iter_mut().zip(iterator) {
                *cell = color.into();
            }
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_buffered_until_show() {
        let mut strip: BufferedStrip<_, CELLS> = BufferedStrip::new(MockWriter::new(), 255);
        strip.set_pixel(1, Color::BLUE);
        assert_eq!(strip.writer.writes, 0);

        strip.show();
        assert_eq!(strip.writer.writes, 1);
        assert_eq!(strip.writer.last[1], RGB8::new(0, 0, 0xFF));
        assert_eq!(strip.writer.last[0], RGB8::default());
    }

    #[test]
    fn test_brightness_applied() {
        let mut strip: BufferedStrip<_, CELLS> = BufferedStrip::new(MockWriter::new(), 120);
        strip.set_all(Color::RED);
        strip.show();

        // Buffer keeps full intensity, output is scaled
        assert_eq!(strip.frame()[0], Color::RED);
        assert!(strip.writer.last.iter().all(|c| c.r > 0 && c.r < 0xFF));
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut strip: BufferedStrip<_, CELLS> = BufferedStrip::new(MockWriter::new(), 255);
        strip.set_pixel(CELLS, Color::GREEN);
        assert!(strip.frame().iter().all(|c| c.is_black()));
    }

    #[test]
    fn test_write_error_latched() {
        let mut writer = MockWriter::new();
        writer.fail = true;
        let mut strip: BufferedStrip<_, CELLS> = BufferedStrip::new(writer, 255);
        strip.show();
        assert!(strip.has_fault());
    }
}
