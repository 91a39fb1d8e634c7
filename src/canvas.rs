use egui::Color32;

/// Drawing surface the grid and cell painters write to.
///
/// Line coordinates follow 2D-canvas path conventions: a one pixel stroke
/// at path coordinate `x` covers the pixel column whose right edge is `x`.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn stroke_vertical(&mut self, x: u32, y0: u32, y1: u32, color: Color32);
    fn stroke_horizontal(&mut self, y: u32, x0: u32, x1: u32, color: Color32);
    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color32);
}

/// Backing size of the canvas for a grid drawn at `cell_pixel_size`.
///
/// One pixel of grid line sits before every cell plus one closing line.
pub fn canvas_size(grid_width: u32, grid_height: u32, cell_pixel_size: u32) -> (u32, u32) {
    (
        (cell_pixel_size + 1) * grid_width + 1,
        (cell_pixel_size + 1) * grid_height + 1,
    )
}

/// CPU-side RGBA8 canvas, row-major, uploaded to the GPU as a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 0xff]; width as usize * height as usize],
        }
    }

    /// Reallocates to a new backing size. Existing pixels are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self::new(width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color32 {
        let [r, g, b, a] = self.pixels[self.offset(x, y)];
        Color32::from_rgba_premultiplied(r, g, b, a)
    }

    /// Raw bytes in `Rgba8UnormSrgb` layout.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl Canvas for PixelCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn stroke_vertical(&mut self, x: u32, y0: u32, y1: u32, color: Color32) {
        if x == 0 || x > self.width {
            return;
        }
        let column = x - 1;
        let rgba = color.to_array();
        for y in y0.min(self.height)..y1.min(self.height) {
            let offset = self.offset(column, y);
            self.pixels[offset] = rgba;
        }
    }

    fn stroke_horizontal(&mut self, y: u32, x0: u32, x1: u32, color: Color32) {
        if y == 0 || y > self.height {
            return;
        }
        let (x0, x1) = (x0.min(self.width), x1.min(self.width));
        if x0 >= x1 {
            return;
        }
        let row = y - 1;
        let start = self.offset(x0, row);
        let end = self.offset(x1, row);
        self.pixels[start..end].fill(color.to_array());
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color32) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        if x >= x_end {
            return;
        }
        let rgba = color.to_array();
        for row in y..y_end {
            let start = self.offset(x, row);
            let end = self.offset(x_end, row);
            self.pixels[start..end].fill(rgba);
        }
    }
}
