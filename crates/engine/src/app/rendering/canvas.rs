/// Axis-aligned pixel rectangle. May extend past the canvas; drawing clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

impl PixelRect {
    pub(crate) const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub(crate) fn inset(self, amount: i32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: self.width - amount * 2,
            height: self.height - amount * 2,
        }
    }

    pub(crate) fn center(self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// RGBA8 frame buffer view with clipped drawing primitives.
pub(crate) struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn clear(&mut self, color: [u8; 4]) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    pub(crate) fn put_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let Some(pixel_offset) = (y as usize)
            .checked_mul(self.width as usize)
            .and_then(|row| row.checked_add(x as usize))
        else {
            return;
        };
        let Some(byte_offset) = pixel_offset.checked_mul(4) else {
            return;
        };
        let Some(end) = byte_offset.checked_add(4) else {
            return;
        };
        if end > self.frame.len() {
            return;
        }

        let alpha = color[3] as u16;
        if alpha == 255 {
            self.frame[byte_offset..end].copy_from_slice(&color);
            return;
        }
        let dst = &mut self.frame[byte_offset..end];
        for channel in 0..3 {
            let src = color[channel] as u16;
            let old = dst[channel] as u16;
            dst[channel] = ((src * alpha + old * (255 - alpha)) / 255) as u8;
        }
        dst[3] = 255;
    }

    pub(crate) fn fill_rect(&mut self, rect: PixelRect, color: [u8; 4]) {
        let start_x = rect.x.max(0);
        let start_y = rect.y.max(0);
        let end_x = rect.x.saturating_add(rect.width).min(self.width as i32);
        let end_y = rect.y.saturating_add(rect.height).min(self.height as i32);
        if end_x <= start_x || end_y <= start_y {
            return;
        }
        for py in start_y..end_y {
            for px in start_x..end_x {
                self.put_pixel(px, py, color);
            }
        }
    }

    pub(crate) fn outline_rect(&mut self, rect: PixelRect, thickness: i32, color: [u8; 4]) {
        if rect.width <= 1 || rect.height <= 1 || thickness <= 0 {
            return;
        }
        let t = thickness.min(rect.width / 2).min(rect.height / 2).max(1);
        self.fill_rect(PixelRect::new(rect.x, rect.y, rect.width, t), color);
        self.fill_rect(
            PixelRect::new(rect.x, rect.y + rect.height - t, rect.width, t),
            color,
        );
        self.fill_rect(PixelRect::new(rect.x, rect.y, t, rect.height), color);
        self.fill_rect(
            PixelRect::new(rect.x + rect.width - t, rect.y, t, rect.height),
            color,
        );
    }

    pub(crate) fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: [u8; 4]) {
        if radius <= 0 {
            return;
        }
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r2 {
                    self.put_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }
}
