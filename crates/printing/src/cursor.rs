use crate::job::ContentArea;

const EPSILON: f32 = 0.01;

/// Where a line box lands: zero-based page index and the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page: usize,
    pub x: f32,
    pub y: f32,
}

/// Vertical flow over pages of identical content areas.
/// 在多頁固定內容區間內的垂直排版游標。
///
/// A band is a run of one or two columns starting at `band_top`. A line that
/// would cross the bottom of the content area moves to the right column of the
/// current band, or to the left column of a fresh page. Reading order is
/// therefore page-major, then left-to-right.
#[derive(Debug, Clone)]
pub struct LayoutCursor {
    area: ContentArea,
    gutter: f32,
    page: usize,
    y: f32,
    columns: u8,
    column: u8,
    band_top: f32,
    band_bottom: f32,
}

impl LayoutCursor {
    pub fn new(area: ContentArea, gutter: f32) -> Self {
        Self {
            area,
            gutter,
            page: 0,
            y: area.top,
            columns: 1,
            column: 0,
            band_top: area.top,
            band_bottom: area.top,
        }
    }

    pub fn area(&self) -> ContentArea {
        self.area
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn column(&self) -> u8 {
        self.column
    }

    pub fn column_width(&self) -> f32 {
        if self.columns <= 1 {
            self.area.width
        } else {
            ((self.area.width - self.gutter) / 2.0).max(1.0)
        }
    }

    pub fn column_x(&self) -> f32 {
        self.area.left + f32::from(self.column) * (self.column_width() + self.gutter)
    }

    /// Space left below the cursor in the current column.
    pub fn remaining(&self) -> f32 {
        (self.area.bottom() - self.y).max(0.0)
    }

    pub fn fits(&self, height: f32) -> bool {
        self.y + height <= self.area.bottom() + EPSILON
    }

    fn at_page_top(&self) -> bool {
        self.y <= self.area.top + EPSILON
    }

    /// Moves on until `height` fits in the current column. A box taller than a
    /// whole page stays at the top of the page it reached.
    pub fn ensure(&mut self, height: f32) {
        while !self.fits(height) && !self.at_page_top() {
            self.advance();
        }
    }

    /// Reserves a line box of `height` and returns where it goes.
    pub fn place(&mut self, height: f32) -> Placement {
        self.ensure(height);
        let placement = Placement {
            page: self.page,
            x: self.column_x(),
            y: self.y,
        };
        self.y += height;
        self.band_bottom = self.band_bottom.max(self.y);
        placement
    }

    /// Blank space. Never creates a page on its own.
    pub fn skip(&mut self, gap: f32) {
        if self.at_page_top() {
            return;
        }
        self.y = (self.y + gap).min(self.area.bottom());
        self.band_bottom = self.band_bottom.max(self.y);
    }

    /// Next column of the band, or a fresh page after the last column.
    pub fn advance(&mut self) {
        if self.column + 1 < self.columns {
            self.column += 1;
            self.y = self.band_top;
        } else {
            self.new_page();
        }
    }

    pub fn new_page(&mut self) {
        self.page += 1;
        self.column = 0;
        self.y = self.area.top;
        self.band_top = self.area.top;
        self.band_bottom = self.area.top;
    }

    /// Starts a band of `columns` columns at the current position.
    pub fn begin_columns(&mut self, columns: u8) {
        self.end_columns();
        self.columns = columns.clamp(1, 2);
        self.column = 0;
        self.band_top = self.y;
        self.band_bottom = self.y;
    }

    /// Jumps to the right column for the second half of a band. Stays put when
    /// the left half already spilled into it.
    pub fn start_second_column(&mut self) {
        if self.columns == 2 && self.column == 0 {
            self.column = 1;
            self.y = self.band_top;
        }
    }

    /// Back to a single column below the tallest column of the band.
    pub fn end_columns(&mut self) {
        if self.columns > 1 {
            self.y = self.y.max(self.band_bottom);
        }
        self.columns = 1;
        self.column = 0;
        self.band_top = self.y;
        self.band_bottom = self.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> ContentArea {
        ContentArea {
            left: 10.0,
            top: 20.0,
            width: 110.0,
            height: 100.0,
        }
    }

    #[test]
    fn overflow_starts_a_new_page() {
        let mut cursor = LayoutCursor::new(area(), 10.0);
        let placements: Vec<_> = (0..12).map(|_| cursor.place(10.0)).collect();
        assert_eq!(placements[9].page, 0);
        assert_eq!(placements[9].y, 110.0);
        assert_eq!(placements[10].page, 1);
        assert_eq!(placements[10].y, 20.0);
        assert_eq!(placements[11].y, 30.0);
    }

    #[test]
    fn two_columns_fill_left_then_right_then_next_page() {
        let mut cursor = LayoutCursor::new(area(), 10.0);
        cursor.place(40.0);
        cursor.begin_columns(2);
        assert_eq!(cursor.column_width(), 50.0);

        let left: Vec<_> = (0..6).map(|_| cursor.place(10.0)).collect();
        assert!(left.iter().all(|p| p.x == 10.0 && p.page == 0));
        let spilled = cursor.place(10.0);
        assert_eq!((spilled.page, spilled.x, spilled.y), (0, 70.0, 60.0));

        cursor.start_second_column();
        let right = cursor.place(10.0);
        assert_eq!((right.x, right.y), (70.0, 70.0));

        for _ in 0..4 {
            cursor.place(10.0);
        }
        let next = cursor.place(10.0);
        assert_eq!((next.page, next.x, next.y), (1, 10.0, 20.0));
    }

    #[test]
    fn end_columns_moves_below_tallest_column() {
        let mut cursor = LayoutCursor::new(area(), 10.0);
        cursor.begin_columns(2);
        for _ in 0..3 {
            cursor.place(10.0);
        }
        cursor.start_second_column();
        cursor.place(10.0);
        cursor.end_columns();
        assert_eq!(cursor.y(), 50.0);
        assert_eq!(cursor.column_x(), 10.0);
        assert_eq!(cursor.column_width(), 110.0);
    }

    #[test]
    fn skip_does_not_create_pages() {
        let mut cursor = LayoutCursor::new(area(), 10.0);
        cursor.place(95.0);
        cursor.skip(30.0);
        assert_eq!(cursor.page(), 0);
        assert_eq!(cursor.remaining(), 0.0);
        assert_eq!(cursor.place(10.0).page, 1);
    }
}
