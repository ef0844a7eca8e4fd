use crate::framebuffer::{Framebuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use log::warn;
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display is used by the host to put the framebuffer on a screen. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work.
pub trait Display {
    /// draw a whole frame
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error>;
}

// store useful metadata about the screen
struct Resolution(usize, usize);

impl Resolution {
    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every pixel equal to `bitplane`; y grows
    /// downwards on the chip-8 and upwards on the canvas
    fn bitplane_from_frame<'a>(
        &self,
        frame: &'a Framebuffer,
        bitplane: u8,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let w = self.0;
        frame
            .pixels()
            .iter()
            .enumerate()
            .filter(move |&(_, &p)| p == bitplane)
            .map(move |(n, _)| ((n % w) as f64, -1.0 * (n / w) as f64))
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
    title: String,
}

impl MonoTermDisplay {
    pub fn new(title: &str) -> Result<MonoTermDisplay, io::Error> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(DISPLAY_WIDTH, DISPLAY_HEIGHT),
            title: title.to_string(),
        })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), Show, LeaveAlternateScreen) {
            warn!("can't restore terminal: {}", e);
        }
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(
                0,
                0,
                2 + self.resolution.0 as u16,
                2 + self.resolution.1 as u16,
            );

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title(self.title.as_str())
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(self.resolution.x_bounds())
                .y_bounds(self.resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    // expand each bitplane into x, y float coords, suitable for
                    // rendering with TUI. this just prints blocky points for now
                    ctx.draw(&Points {
                        coords: &self
                            .resolution
                            .bitplane_from_frame(frame, 0)
                            .collect::<Vec<_>>(),
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &self
                            .resolution
                            .bitplane_from_frame(frame, 1)
                            .collect::<Vec<_>>(),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// headless display; counts frames and keeps the last one
pub struct DummyDisplay {
    pub frames_drawn: usize,
    pub last_frame: Option<Framebuffer>,
}

impl DummyDisplay {
    pub fn new() -> DummyDisplay {
        DummyDisplay {
            frames_drawn: 0,
            last_frame: None,
        }
    }
}

impl Default for DummyDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        self.frames_drawn += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.x_bounds(), [0.0, 63.0]);
    }

    #[test]
    fn test_y_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.y_bounds(), [-31.0, 0.0]);
    }

    #[test]
    fn test_bitplanes_partition_the_frame() {
        let r = Resolution(64, 32);
        let mut fb = Framebuffer::new();
        fb.flip(0, 0);
        fb.flip(63, 31);
        fb.flip(5, 2);
        let lit: Vec<_> = r.bitplane_from_frame(&fb, 1).collect();
        assert_eq!(lit, vec![(0.0, 0.0), (5.0, -2.0), (63.0, -31.0)]);
        assert_eq!(r.bitplane_from_frame(&fb, 0).count(), 2048 - 3);
    }

    #[test]
    fn test_dummy_display_keeps_frame() -> Result<(), io::Error> {
        let mut d = DummyDisplay::new();
        let mut fb = Framebuffer::new();
        fb.flip(1, 2);
        d.draw(&fb)?;
        assert_eq!(d.frames_drawn, 1);
        assert_eq!(d.last_frame, Some(fb));
        Ok(())
    }
}
