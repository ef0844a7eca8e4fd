pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Monochrome 64x32 screen, row-major, one byte per pixel holding 0 or 1
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT],
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            pixels: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// pixel at (x, y); coordinates wrap
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[Self::index(x, y)]
    }

    /// XOR a set pixel in at (x, y), wrapping both coordinates. returns true
    /// if the pixel was lit beforehand, i.e. it got switched off
    pub fn flip(&mut self, x: usize, y: usize) -> bool {
        let px = &mut self.pixels[Self::index(x, y)];
        let collided = *px == 1;
        *px ^= 1;
        collided
    }

    /// the whole screen, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == 1).count()
    }

    fn index(x: usize, y: usize) -> usize {
        (x % DISPLAY_WIDTH) + (y % DISPLAY_HEIGHT) * DISPLAY_WIDTH
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.pixels.chunks(DISPLAY_WIDTH) {
            let line: String = row.iter().map(|&p| if p == 1 { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_blank() {
        let fb = Framebuffer::new();
        assert_eq!(fb.pixels().len(), 2048);
        assert_eq!(fb.lit_count(), 0);
    }

    #[test]
    fn test_flip_and_collide() {
        let mut fb = Framebuffer::new();
        assert!(!fb.flip(3, 4));
        assert_eq!(fb.pixel(3, 4), 1);
        assert!(fb.flip(3, 4));
        assert_eq!(fb.pixel(3, 4), 0);
    }

    #[test]
    fn test_flip_wraps() {
        let mut fb = Framebuffer::new();
        fb.flip(64, 32);
        assert_eq!(fb.pixel(0, 0), 1);
        fb.flip(65, 0);
        assert_eq!(fb.pixels()[1], 1);
    }

    #[test]
    fn test_row_major() {
        let mut fb = Framebuffer::new();
        fb.flip(0, 1);
        assert_eq!(fb.pixels()[64], 1);
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new();
        fb.flip(10, 10);
        fb.flip(63, 31);
        fb.clear();
        assert_eq!(fb.lit_count(), 0);
    }
}
