use super::canvas::PixelRect;

pub(crate) const MIN_CELL_SIZE_PX: i32 = 8;
pub(crate) const MAX_CELL_SIZE_PX: i32 = 96;
pub(crate) const CELL_GAP_PX: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Screen placement of a board: square cells packed with a fixed gap,
/// centered inside the area left after `top_reserved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoardLayout {
    origin_x: i32,
    origin_y: i32,
    cell_size: i32,
    columns: u32,
    rows: u32,
}

impl BoardLayout {
    pub(crate) fn fit(
        viewport: Viewport,
        columns: u32,
        rows: u32,
        margin: i32,
        top_reserved: i32,
    ) -> Option<Self> {
        if columns == 0 || rows == 0 {
            return None;
        }
        let area_width = viewport.width as i32 - margin * 2;
        let area_height = viewport.height as i32 - margin * 2 - top_reserved;
        let pitch_x = (area_width + CELL_GAP_PX) / columns as i32;
        let pitch_y = (area_height + CELL_GAP_PX) / rows as i32;
        let cell_size = (pitch_x.min(pitch_y) - CELL_GAP_PX).min(MAX_CELL_SIZE_PX);
        if cell_size < MIN_CELL_SIZE_PX {
            return None;
        }

        let board_width = span(columns, cell_size);
        let board_height = span(rows, cell_size);
        Some(Self {
            origin_x: margin + (area_width - board_width) / 2,
            origin_y: margin + top_reserved + (area_height - board_height) / 2,
            cell_size,
            columns,
            rows,
        })
    }

    pub(crate) fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub(crate) fn bounds(&self) -> PixelRect {
        PixelRect::new(
            self.origin_x,
            self.origin_y,
            span(self.columns, self.cell_size),
            span(self.rows, self.cell_size),
        )
    }

    pub(crate) fn cell_rect(&self, row: u32, col: u32) -> Option<PixelRect> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        let pitch = self.cell_size + CELL_GAP_PX;
        Some(PixelRect::new(
            self.origin_x + col as i32 * pitch,
            self.origin_y + row as i32 * pitch,
            self.cell_size,
            self.cell_size,
        ))
    }
}

fn span(count: u32, cell_size: i32) -> i32 {
    count as i32 * cell_size + (count as i32 - 1) * CELL_GAP_PX
}
