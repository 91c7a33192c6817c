use askama::{Error as AskamaError, Template};
use thiserror::Error;

use crate::domain::sheet::DaySheet;

/// Device pixels of the rendered page, portrait A4 at roughly 300 dpi.
pub const PAGE_WIDTH_PX: u32 = 2480;
pub const PAGE_HEIGHT_PX: u32 = 3508;

/// Root element of the rendered sheet; the capture step waits on it and
/// clips the screenshot to it.
pub const SHEET_SELECTOR: &str = ".calendar-sheet";

/// Blank writable rows in each of the grocery and to-do lists.
const RULED_LIST_ROWS: usize = 12;

/// Render failure tagged with the origin that raised it, so the error
/// chain names the failing template.
#[derive(Debug, Error)]
#[error("{source}: {public_message}")]
pub struct SheetRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl SheetRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

/// Template context for one printable day sheet.
pub struct SheetView {
    pub weekday: String,
    pub new_style: String,
    pub old_style: String,
    pub week_name: String,
    pub description: String,
    pub readings: String,
    pub ruled_rows: usize,
}

impl SheetView {
    pub fn from_sheet(sheet: &DaySheet) -> Self {
        Self {
            weekday: sheet.weekday.clone(),
            new_style: sheet.new_style.clone(),
            old_style: sheet.old_style.clone(),
            week_name: sheet.week_name.clone(),
            description: sheet.description.clone(),
            readings: sheet.readings.clone(),
            ruled_rows: RULED_LIST_ROWS,
        }
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }

    pub fn has_week_name(&self) -> bool {
        !self.week_name.is_empty()
    }
}

#[derive(Template)]
#[template(path = "sheet.html")]
pub struct SheetTemplate {
    pub view: SheetView,
}

/// Renders the printable document for one day.
///
/// Total over all records and deterministic: the same sheet always yields
/// byte-identical markup, and empty fields leave the structural layout
/// intact. Field text is escaped on interpolation.
pub fn render_sheet(sheet: &DaySheet) -> Result<String, SheetRenderError> {
    let template = SheetTemplate {
        view: SheetView::from_sheet(sheet),
    };
    template.render().map_err(|err| {
        SheetRenderError::new(
            "presentation::views::render_sheet",
            "day sheet rendering failed",
            err,
        )
    })
}
