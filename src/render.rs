//! Drives caller-supplied cell builders over a page.
//!
//! The renderer never looks at what the builders produce; it only decides
//! which builder each cell goes to and how tall its row is.

use tracing::trace;

use crate::{
    CalendarPage, CellSlot, ConfigurationError, HeaderSize, PageLayout, PageWindow, Week,
    WindowPage, YearMonth, YearMonthDay,
};

type DayBuilder<T> = Box<dyn Fn(YearMonthDay) -> T>;
type HeaderBuilder<T> = Box<dyn Fn(Week) -> T>;

/// One cell of a rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell<T> {
    pub index: usize,
    pub slot: CellSlot,
    /// Extent of the row holding the cell.
    pub extent: f32,
    /// `None` for banner fillers and for header cells nobody builds.
    pub content: Option<T>,
}

/// Cell builders for day, weekday header and month banner cells.
pub struct PageRenderer<T> {
    day: DayBuilder<T>,
    header: Option<(HeaderSize, HeaderBuilder<T>)>,
    month_header: Option<DayBuilder<T>>,
}

impl<T> PageRenderer<T> {
    /// A renderer drawing day cells only.
    pub fn new(day: impl Fn(YearMonthDay) -> T + 'static) -> Self {
        Self {
            day: Box::new(day),
            header: None,
            month_header: None,
        }
    }

    /// Adds a weekday header row of the given size.
    #[must_use]
    pub fn with_header(mut self, size: HeaderSize, header: impl Fn(Week) -> T + 'static) -> Self {
        self.header = Some((size, Box::new(header)));
        self
    }

    /// Adds a month banner row. The builder receives the 1st of the page's month.
    #[must_use]
    pub fn with_month_header(mut self, month_header: impl Fn(YearMonthDay) -> T + 'static) -> Self {
        self.month_header = Some(Box::new(month_header));
        self
    }

    /// Header rows implied by the builders present.
    pub fn layout(&self) -> PageLayout {
        PageLayout {
            header: self.header.as_ref().map(|(size, _)| *size),
            month_header: self.month_header.is_some(),
        }
    }

    /// Page for `anchor` laid out for this renderer.
    pub fn page(&self, anchor: YearMonth, start_with_monday: bool) -> CalendarPage {
        CalendarPage::new(anchor, start_with_monday, self.layout())
    }

    /// Builds every cell of `page`, which is `total_extent` tall.
    ///
    /// # Errors
    /// Returns `ConfigurationError` if the page cannot be laid out in
    /// `total_extent`; no cell is built in that case.
    pub fn render(
        &self,
        page: &CalendarPage,
        total_extent: f32,
    ) -> Result<Vec<RenderedCell<T>>, ConfigurationError> {
        let rows = page.row_extents(total_extent)?;
        let cells: Vec<RenderedCell<T>> = page
            .cells()
            .map(|(index, slot)| RenderedCell {
                index,
                slot,
                extent: rows[index / page.column_count()],
                content: self.build(slot),
            })
            .collect();
        trace!(anchor = %page.anchor(), cells = cells.len(), total_extent, "page rendered");
        Ok(cells)
    }

    /// Renders each page of `window`, keyed by its recycle key.
    ///
    /// # Errors
    /// As [`Self::render`].
    pub fn render_window(
        &self,
        window: &PageWindow,
        start_with_monday: bool,
        total_extent: f32,
    ) -> Result<Vec<(WindowPage, Vec<RenderedCell<T>>)>, ConfigurationError> {
        window
            .pages()
            .iter()
            .map(|window_page| {
                let page = self.page(window_page.anchor, start_with_monday);
                Ok((*window_page, self.render(&page, total_extent)?))
            })
            .collect()
    }

    fn build(&self, slot: CellSlot) -> Option<T> {
        match slot {
            CellSlot::Day(date) => Some((self.day)(date)),
            CellSlot::Header(week) => self.header.as_ref().map(|(_, header)| header(week)),
            CellSlot::MonthHeader(anchor) => {
                self.month_header.as_ref().map(|banner| banner(anchor.first_day()))
            }
            CellSlot::MonthHeaderFiller => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MONTH_HEADER_EXTENT;

    fn ym(year: i32, month: u8) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn full_renderer() -> PageRenderer<String> {
        PageRenderer::new(|date: YearMonthDay| {
            let dim = if date.is_focus_year_month() == Some(true) { "" } else { "~" };
            format!("{dim}{}", date.day())
        })
        .with_header(HeaderSize::FixHeight(40.0), |week| week.short_str().to_owned())
        .with_month_header(|date| {
            format!("{} {}", date.year_month().month_short_str(), date.year())
        })
    }

    #[test]
    fn test_day_only_page() {
        let renderer = PageRenderer::new(|date: YearMonthDay| date.day());
        let page = renderer.page(ym(2023, 2), false);
        let cells = renderer.render(&page, 500.0).unwrap();
        assert_eq!(cells.len(), 35);
        assert_eq!(cells[0].content, Some(29));
        assert_eq!(cells[3].content, Some(1));
        assert!(cells.iter().all(|c| (c.extent - 100.0).abs() < 1e-3));
    }

    #[test]
    fn test_full_page_builders() {
        let renderer = full_renderer();
        let page = renderer.page(ym(2023, 2), false);
        let cells = renderer.render(&page, 564.0).unwrap();

        assert_eq!(cells.len(), 49);
        assert_eq!(cells[0].content.as_deref(), Some("Feb 2023"));
        assert_eq!(cells[0].extent, MONTH_HEADER_EXTENT);
        assert!(cells[1..7].iter().all(|c| c.content.is_none()));
        assert_eq!(cells[7].content.as_deref(), Some("Sun"));
        assert_eq!(cells[7].extent, 40.0);
        assert_eq!(cells[14].content.as_deref(), Some("~29"));
        assert_eq!(cells[17].content.as_deref(), Some("1"));
        assert!((cells[17].extent - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_monday_start_headers() {
        let renderer = full_renderer();
        let page = renderer.page(ym(2023, 2), true);
        let cells = renderer.render(&page, 564.0).unwrap();
        assert_eq!(cells[7].content.as_deref(), Some("Mon"));
        assert_eq!(cells[13].content.as_deref(), Some("Sun"));
        assert_eq!(cells[16].content.as_deref(), Some("1"));
    }

    #[test]
    fn test_header_slot_without_builder_is_empty() {
        let renderer = PageRenderer::new(|date: YearMonthDay| date.day());
        let layout = PageLayout::with_headers(HeaderSize::Zero);
        let page = CalendarPage::new(ym(2023, 2), false, layout);
        let cells = renderer.render(&page, 500.0).unwrap();
        assert_eq!(cells[7].slot, CellSlot::Header(Week::Sunday));
        assert_eq!(cells[7].content, None);
    }

    #[test]
    fn test_invalid_extent_builds_nothing() {
        let renderer = full_renderer();
        let page = renderer.page(ym(2023, 2), false);
        assert!(matches!(
            renderer.render(&page, 30.0),
            Err(ConfigurationError::HeadersExceedExtent { .. })
        ));
    }

    #[test]
    fn test_render_window() {
        let renderer = full_renderer();
        let window = PageWindow::around(ym(2024, 1));
        let pages = renderer.render_window(&window, false, 600.0).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].1[0].content.as_deref(), Some("Dec 2023"));
        assert_eq!(pages[1].1[0].content.as_deref(), Some("Jan 2024"));
        assert_eq!(pages[2].1[0].content.as_deref(), Some("Feb 2024"));
        for (window_page, cells) in &pages {
            let rows = window_page.anchor.row_count(false);
            assert_eq!(cells.len(), (rows + 2) * 7);
            let total: f32 = cells.iter().step_by(7).map(|c| c.extent).sum();
            assert!((total - 600.0).abs() < 1e-2, "{} sums to {total}", window_page.anchor);
        }
    }
}
