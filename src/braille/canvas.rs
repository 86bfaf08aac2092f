//! Braille Unicode canvas: each character cell is a 2x4 dot grid
//! (U+2800..U+28FF), giving double horizontal and quadruple vertical
//! resolution over plain character output. One canvas is rasterized per
//! paint operation and blitted with that operation's color, so stroking and
//! filling here stay color-agnostic.

use glam::DVec2;

/// Dot pattern length for dotted strokes: 2 pixels on, 2 off.
const DOT_PERIOD: usize = 4;
const DOT_ON: usize = 2;

pub struct BrailleCanvas {
    width: usize,  // characters
    height: usize, // characters
    cells: Vec<u8>,
}

impl BrailleCanvas {
    /// Canvas with the given character dimensions; pixel resolution is
    /// `width * 2` by `height * 4`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0u8; width * height],
        }
    }

    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }

    /// Braille dot layout per cell:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let cx = x / 2;
        let cy = y / 4;
        if cx >= self.width || cy >= self.height {
            return;
        }
        let bit = match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => 0,
        };
        self.cells[cy * self.width + cx] |= bit;
    }

    /// Signed coordinates; off-canvas pixels are ignored.
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    /// Stroke a path of pixel-space points, optionally closing it and
    /// optionally with a dotted 2-on/2-off pattern.
    pub fn stroke_path(&mut self, points: &[DVec2], closed: bool, dotted: bool) {
        if points.len() < 2 {
            if let Some(p) = points.first() {
                if !dotted {
                    self.set_pixel_signed(p.x.round() as i32, p.y.round() as i32);
                }
            }
            return;
        }
        let mut phase = 0usize;
        let pair_count = if closed { points.len() } else { points.len() - 1 };
        for i in 0..pair_count {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            self.line(
                a.x.round() as i32,
                a.y.round() as i32,
                b.x.round() as i32,
                b.y.round() as i32,
                dotted,
                &mut phase,
            );
        }
    }

    /// Bresenham segment; `phase` carries the dot pattern across segments so
    /// the pattern doesn't restart at every vertex.
    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, dotted: bool, phase: &mut usize) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            if !dotted || *phase % DOT_PERIOD < DOT_ON {
                self.set_pixel_signed(x, y);
            }
            *phase += 1;

            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                if x == x1 {
                    break;
                }
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                if y == y1 {
                    break;
                }
                err += dx;
                y += sy;
            }
        }
    }

    /// Even-odd scanline fill of a closed polygon in pixel space.
    pub fn fill_polygon(&mut self, points: &[DVec2]) {
        if points.len() < 3 {
            return;
        }
        let max_y = self.pixel_height();
        let max_x = self.pixel_width() as f64;

        for y in 0..max_y {
            let scan = y as f64 + 0.5;
            let mut crossings: Vec<f64> = Vec::new();
            for i in 0..points.len() {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                if (a.y <= scan) != (b.y <= scan) {
                    let t = (scan - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(|a, b| a.partial_cmp(b).unwrap());
            for span in crossings.chunks_exact(2) {
                let start = span[0].max(0.0);
                let end = span[1].min(max_x);
                let mut x = start.floor().max(0.0) as usize;
                while (x as f64 + 0.5) < start {
                    x += 1;
                }
                while (x as f64 + 0.5) <= end {
                    self.set_pixel(x, y);
                    x += 1;
                }
            }
        }
    }

    /// One character row rendered as Braille glyphs.
    pub fn row_to_string(&self, row: usize) -> String {
        if row >= self.height {
            return String::new();
        }
        self.cells[row * self.width..(row + 1) * self.width]
            .iter()
            .map(|&b| char::from_u32(0x2800 + b as u32).unwrap_or(' '))
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(|i| self.row_to_string(i))
    }

    #[cfg(test)]
    pub fn render(&self) -> String {
        self.rows().collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pixel() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0, 0);
        assert_eq!(canvas.render(), "⠁"); // U+2801
    }

    #[test]
    fn test_all_dots() {
        let mut canvas = BrailleCanvas::new(1, 1);
        for x in 0..2 {
            for y in 0..4 {
                canvas.set_pixel(x, y);
            }
        }
        assert_eq!(canvas.render(), "⣿"); // U+28FF
    }

    #[test]
    fn test_stroke_horizontal() {
        let mut canvas = BrailleCanvas::new(5, 1);
        canvas.stroke_path(
            &[DVec2::new(0.0, 0.0), DVec2::new(9.0, 0.0)],
            false,
            false,
        );
        let count: u32 = canvas.cells.iter().map(|b| b.count_ones()).sum();
        assert_eq!(count, 10);
    }

    #[test]
    fn test_dotted_stroke_skips_pixels() {
        let mut solid = BrailleCanvas::new(10, 1);
        let mut dotted = BrailleCanvas::new(10, 1);
        let path = [DVec2::new(0.0, 0.0), DVec2::new(19.0, 0.0)];
        solid.stroke_path(&path, false, false);
        dotted.stroke_path(&path, false, true);
        let solid_count: u32 = solid.cells.iter().map(|b| b.count_ones()).sum();
        let dotted_count: u32 = dotted.cells.iter().map(|b| b.count_ones()).sum();
        assert_eq!(solid_count, 20);
        assert_eq!(dotted_count, 10);
    }

    #[test]
    fn test_fill_square() {
        let mut canvas = BrailleCanvas::new(4, 2);
        canvas.fill_polygon(&[
            DVec2::new(0.0, 0.0),
            DVec2::new(8.0, 0.0),
            DVec2::new(8.0, 8.0),
            DVec2::new(0.0, 8.0),
        ]);
        let count: u32 = canvas.cells.iter().map(|b| b.count_ones()).sum();
        assert_eq!(count, 64);
    }

    #[test]
    fn test_fill_clips_to_canvas() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.fill_polygon(&[
            DVec2::new(-100.0, -100.0),
            DVec2::new(100.0, -100.0),
            DVec2::new(100.0, 100.0),
            DVec2::new(-100.0, 100.0),
        ]);
        let count: u32 = canvas.cells.iter().map(|b| b.count_ones()).sum();
        assert_eq!(count, 2 * 2 * 4);
    }
}
