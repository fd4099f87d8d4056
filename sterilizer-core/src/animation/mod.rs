//! LED strip colors and animation effects
//!
//! Effects are pure functions of elapsed time, so the puzzle sequences can
//! render them one frame per tick instead of sleeping between frames.

pub mod color;

pub use color::Color;

use crate::traits::LedStrip;

/// Visual effect shown during a sequence step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Leave the strip as it is
    Hold,
    /// Solid fill, drawn once on step entry
    Fill(Color),
    /// Single cell running forward then back, `passes` times
    Sweep { color: Color, passes: u8 },
}

impl Effect {
    /// Number of frames the effect renders
    pub fn frame_count(&self, cells: usize) -> u32 {
        match *self {
            Effect::Hold => 0,
            Effect::Fill(_) => 1,
            Effect::Sweep { passes, .. } => 2 * cells as u32 * passes as u32,
        }
    }

    /// Render the frame due at `elapsed_ms`
    ///
    /// `last_frame` is the frame drawn previously in this step, if any.
    /// Returns the frame now on the strip; the strip is only written when
    /// the frame changes.
    pub fn render<L: LedStrip>(
        &self,
        strip: &mut L,
        elapsed_ms: u32,
        frame_ms: u32,
        last_frame: Option<u32>,
    ) -> Option<u32> {
        match *self {
            Effect::Hold => last_frame,
            Effect::Fill(color) => {
                if last_frame.is_none() {
                    strip.set_all(color);
                    strip.show();
                }
                Some(0)
            }
            Effect::Sweep { color, .. } => {
                let cells = strip.cell_count();
                let frames = self.frame_count(cells);
                if frames == 0 {
                    return last_frame;
                }

                let frame = (elapsed_ms / frame_ms.max(1)).min(frames - 1);
                if last_frame == Some(frame) {
                    return last_frame;
                }

                strip.set_all(Color::BLACK);
                strip.set_pixel(sweep_cell(frame, cells), color);
                strip.show();
                Some(frame)
            }
        }
    }
}

/// Cell lit by sweep frame `frame`
///
/// Frames `0..cells` run forward, `cells..2*cells` run back.
pub fn sweep_cell(frame: u32, cells: usize) -> usize {
    if cells == 0 {
        return 0;
    }
    let period = 2 * cells as u32;
    let pos = (frame % period) as usize;
    if pos < cells {
        pos
    } else {
        period as usize - 1 - pos
    }
}
