/// Braille canvas for high-resolution terminal rendering
/// Each terminal cell holds a 2×4 grid of Braille dots, so a cell grid of
/// W×H gives 2W×4H pixels. Every cell also remembers the pen color of the
/// last dot drawn into it.
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// 3×5 digit glyphs, one row per entry, most significant bit on the left
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Pixel size of one glyph dot
pub const DIGIT_SCALE: usize = 2;
pub const DIGIT_WIDTH: usize = 3 * DIGIT_SCALE;
pub const DIGIT_HEIGHT: usize = 5 * DIGIT_SCALE;
const DIGIT_GAP: usize = DIGIT_SCALE;

#[derive(Clone, Copy, Debug, PartialEq)]
struct BrailleCell {
    pattern: u8,
    color: Color,
}

pub struct BrailleCanvas {
    width: usize,  // Width in terminal cells
    height: usize, // Height in terminal cells
    cells: Vec<BrailleCell>,
    pen: Color,
}

impl BrailleCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![
                BrailleCell {
                    pattern: 0,
                    color: Color::White,
                };
                width * height
            ],
            pen: Color::White,
        }
    }

    /// Color used by subsequent drawing calls
    pub fn set_pen(&mut self, color: Color) {
        self.pen = color;
    }

    /// Set a dot at pixel coordinates; out-of-range pixels are ignored
    pub fn set_pixel(&mut self, pixel_x: usize, pixel_y: usize) {
        let cell_x = pixel_x / 2;
        let cell_y = pixel_y / 4;

        if cell_x >= self.width || cell_y >= self.height {
            return;
        }

        // Braille dot numbering:
        // 1 4
        // 2 5
        // 3 6
        // 7 8
        let dot_index = match (pixel_x % 2, pixel_y % 4) {
            (0, 3) => 6,
            (1, 3) => 7,
            (0, row) => row,
            (_, row) => row + 3,
        };

        let cell = &mut self.cells[cell_y * self.width + cell_x];
        cell.pattern |= 1 << dot_index;
        cell.color = self.pen;
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize) {
        for py in y..(y + height) {
            for px in x..(x + width) {
                self.set_pixel(px, py);
            }
        }
    }

    /// Fill the ellipse inscribed in the given pixel-space box
    pub fn fill_ellipse(&mut self, center_x: f32, center_y: f32, radius_x: f32, radius_y: f32) {
        let rx = radius_x.max(0.5);
        let ry = radius_y.max(0.5);
        let left = (center_x - rx).floor().max(0.0) as usize;
        let top = (center_y - ry).floor().max(0.0) as usize;
        let right = (center_x + rx).ceil().max(0.0) as usize;
        let bottom = (center_y + ry).ceil().max(0.0) as usize;

        for py in top..=bottom {
            for px in left..=right {
                let nx = (px as f32 + 0.5 - center_x) / rx;
                let ny = (py as f32 + 0.5 - center_y) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    self.set_pixel(px, py);
                }
            }
        }
        // Always leave at least one dot, however small the terminal
        if center_x >= 0.0 && center_y >= 0.0 {
            self.set_pixel(center_x as usize, center_y as usize);
        }
    }

    pub fn draw_horizontal_line(&mut self, pixel_y: usize) {
        for px in 0..self.pixel_width() {
            self.set_pixel(px, pixel_y);
        }
    }

    /// Draw `value` in the block font with its top-left corner at (x, y)
    pub fn draw_number(&mut self, value: u32, x: usize, y: usize) {
        let mut cursor = x;
        for ch in value.to_string().chars() {
            if let Some(digit) = ch.to_digit(10) {
                self.draw_digit(digit as usize, cursor, y);
            }
            cursor += DIGIT_WIDTH + DIGIT_GAP;
        }
    }

    /// Pixel width of `value` in the block font
    pub fn number_width(value: u32) -> usize {
        let digits = value.to_string().len();
        digits * DIGIT_WIDTH + digits.saturating_sub(1) * DIGIT_GAP
    }

    fn draw_digit(&mut self, digit: usize, x: usize, y: usize) {
        let Some(glyph) = DIGITS.get(digit) else {
            return;
        };
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) != 0 {
                    self.fill_rect(
                        x + col * DIGIT_SCALE,
                        y + row * DIGIT_SCALE,
                        DIGIT_SCALE,
                        DIGIT_SCALE,
                    );
                }
            }
        }
    }

    /// Braille Unicode: U+2800 + dot pattern
    pub fn to_char(&self, cell_x: usize, cell_y: usize) -> char {
        if cell_x >= self.width || cell_y >= self.height {
            return ' ';
        }

        let pattern = self.cells[cell_y * self.width + cell_x].pattern;
        char::from_u32(0x2800 + pattern as u32).unwrap_or(' ')
    }

    /// One styled line per cell row, with runs of equal color merged into spans
    pub fn lines(&self) -> Vec<Line<'static>> {
        (0..self.height)
            .map(|y| {
                let mut spans = Vec::new();
                let mut run = String::new();
                let mut run_color = None;

                for x in 0..self.width {
                    let cell = self.cells[y * self.width + x];
                    if run_color != Some(cell.color) && !run.is_empty() {
                        let color = run_color.unwrap_or(Color::White);
                        spans.push(Span::styled(std::mem::take(&mut run), Style::default().fg(color)));
                    }
                    run_color = Some(cell.color);
                    run.push(self.to_char(x, y));
                }
                if !run.is_empty() {
                    let color = run_color.unwrap_or(Color::White);
                    spans.push(Span::styled(run, Style::default().fg(color)));
                }
                Line::from(spans)
            })
            .collect()
    }

    /// Width in pixels (2 per cell)
    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    /// Height in pixels (4 per cell)
    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }
}
