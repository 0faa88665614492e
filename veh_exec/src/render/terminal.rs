//! Renderer drawing the vehicle on a character grid in the terminal

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{Stdout, Write};

// Internal
use super::{screen_position, Pose, RenderError, Renderer};
use util::maths::{lin_map, wrap_deg_360};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Glyphs for the vehicle's on-screen direction, anticlockwise from pointing
/// right in 45 degree steps.
const HEADING_GLYPHS: [char; 8] = ['>', '/', '^', '\\', '<', '/', 'v', '\\'];

/// Rows kept free at the bottom of the terminal for the status line.
const STATUS_ROWS: u16 = 1;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Draws the vehicle in the alternate screen of the terminal.
///
/// The alternate screen is entered on creation and left on drop.
pub struct TerminalRenderer {
    out: Stdout,
    screen_size: (f64, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TerminalRenderer {
    pub fn new(screen_width: f64, screen_height: f64) -> Result<Self, RenderError> {
        let mut out = std::io::stdout();
        execute!(out, EnterAlternateScreen, Hide)?;

        Ok(Self {
            out,
            screen_size: (screen_width, screen_height),
        })
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, pose: &Pose) -> Result<(), RenderError> {
        let (cols, rows) = terminal::size()?;
        let grid = (cols, rows.saturating_sub(STATUS_ROWS));

        let screen = screen_position((pose.x, pose.y), self.screen_size.0, self.screen_size.1);

        queue!(self.out, Clear(ClearType::All))?;

        if let Some((col, row)) = screen_to_cell(screen, self.screen_size, grid) {
            queue!(
                self.out,
                MoveTo(col, row),
                Print(heading_glyph(pose.heading_deg))
            )?;
        }

        queue!(
            self.out,
            MoveTo(0, rows.saturating_sub(1)),
            Print(format!(
                "x {:8.2}  y {:8.2}  heading {:8.2}  steer {:6.1}  [arrows to drive, q to quit]",
                pose.x, pose.y, pose.heading_deg, pose.steering_angle_deg
            ))
        )?;

        self.out.flush()?;

        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show, LeaveAlternateScreen);
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Find the grid cell containing a screen position, or `None` if it is off
/// the screen.
pub fn screen_to_cell(
    screen: (i64, i64),
    screen_size: (f64, f64),
    grid: (u16, u16)
) -> Option<(u16, u16)> {
    let (sx, sy) = (screen.0 as f64, screen.1 as f64);

    if sx < 0.0 || sy < 0.0 || sx >= screen_size.0 || sy >= screen_size.1 {
        return None;
    }

    let col = lin_map((0.0, screen_size.0), (0.0, grid.0 as f64), sx).floor();
    let row = lin_map((0.0, screen_size.1), (0.0, grid.1 as f64), sy).floor();

    if col >= grid.0 as f64 || row >= grid.1 as f64 {
        return None;
    }

    Some((col as u16, row as u16))
}

/// Pick the glyph for the vehicle's heading as seen on the flipped screen.
///
/// Flipping both axes turns the world direction `h` into the on-screen
/// direction `180 - h`.
pub fn heading_glyph(heading_deg: f64) -> char {
    let screen_deg = wrap_deg_360(180.0 - heading_deg);
    let octant = (screen_deg / 45.0).round() as usize % HEADING_GLYPHS.len();

    HEADING_GLYPHS[octant]
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_heading_glyph() {
        // World +x is screen left
        assert_eq!(heading_glyph(0.0), '<');
        assert_eq!(heading_glyph(180.0), '>');
        // World +y is screen up
        assert_eq!(heading_glyph(90.0), '^');
        assert_eq!(heading_glyph(-90.0), 'v');
        assert_eq!(heading_glyph(45.0), '\\');
        assert_eq!(heading_glyph(135.0), '/');
        // Unwrapped headings
        assert_eq!(heading_glyph(720.0), '<');
        assert_eq!(heading_glyph(-540.0), '>');
        assert_eq!(heading_glyph(10.0), '<');
    }

    #[test]
    fn test_screen_to_cell() {
        let size = (800.0, 450.0);
        let grid = (80, 45);

        assert_eq!(screen_to_cell((0, 0), size, grid), Some((0, 0)));
        assert_eq!(screen_to_cell((750, 400), size, grid), Some((75, 40)));
        assert_eq!(screen_to_cell((799, 449), size, grid), Some((79, 44)));
        assert_eq!(screen_to_cell((800, 400), size, grid), None);
        assert_eq!(screen_to_cell((-1, 400), size, grid), None);
        assert_eq!(screen_to_cell((10, 450), size, grid), None);
    }
}
