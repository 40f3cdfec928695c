//! Table renderer
//!
//! Builds the MediaWiki table that lists upcoming events. Rendering is pure:
//! the same rows always produce byte-identical markup.

use domain::{CalendarEvent, PageContent, Timezone};

use crate::services::KeywordLinker;

/// Opening line of the events table
pub const TABLE_OPEN: &str = r#"{| class="termine sortable" border="1" cellspacing="0" cellpadding="5" width="100%" style="border-collapse:collapse;""#;

/// Header row of the events table
pub const TABLE_HEADER: &str =
    r#"! data-sort-type="date" | Datum !! Beginn !! Ende !! Ort !! Beschreibung"#;

/// Closing line of the events table
pub const TABLE_CLOSE: &str = "|}";

/// Date format used in the date column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format used in the time columns
pub const TIME_FORMAT: &str = "%H:%M";

/// Make text safe for a table cell
///
/// `|` would end the cell and line breaks would end the row.
#[must_use]
pub fn escape_wiki(text: &str) -> String {
    text.replace('|', "&#124;").replace(['\r', '\n'], "")
}

/// One event, formatted for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Recurrence note shown under the date
    pub note: Option<String>,
    /// `HH:MM`, blank for all-day events
    pub start_time: String,
    /// `HH:MM`, blank when missing or equal to the start
    pub end_time: String,
    /// Escaped and linked location, may be blank
    pub location: String,
    /// Escaped and linked title
    pub title: String,
}

impl RenderedRow {
    /// Format an event in `timezone`
    ///
    /// Returns `None` for events without a start time.
    #[must_use]
    pub fn from_event(
        event: &CalendarEvent,
        linker: &KeywordLinker,
        timezone: Timezone,
    ) -> Option<Self> {
        let start = event.start?;

        let (date, start_time, end_time) = if event.all_day {
            // Dates of all-day events are calendar dates, not instants
            (
                start.date_naive().format(DATE_FORMAT).to_string(),
                String::new(),
                String::new(),
            )
        } else {
            let local_start = start.with_timezone(&timezone.tz());
            let start_time = local_start.format(TIME_FORMAT).to_string();
            let end_time = event
                .end
                .map(|end| {
                    end.with_timezone(&timezone.tz())
                        .format(TIME_FORMAT)
                        .to_string()
                })
                .filter(|end| *end != start_time)
                .unwrap_or_default();
            (
                local_start.format(DATE_FORMAT).to_string(),
                start_time,
                end_time,
            )
        };

        let location = event
            .location
            .as_deref()
            .map(|location| linker.apply_links(&escape_wiki(location)))
            .unwrap_or_default();

        // keyword links never go inside a description link
        let title = escape_wiki(&event.title);
        let title = match event.link() {
            Some(link) => link.wrap(&title),
            None => linker.apply_links(&title),
        };

        Some(Self {
            date,
            note: event.occurrence.note().map(|note| escape_wiki(&note)),
            start_time,
            end_time,
            location,
            title,
        })
    }

    fn date_cell(&self) -> String {
        match &self.note {
            Some(note) => format!("'''{}'''<br><small>({note})</small>", self.date),
            None => format!("'''{}'''", self.date),
        }
    }

    /// The two markup lines of this row
    #[must_use]
    pub fn to_markup(&self) -> String {
        format!(
            "|-\n| {} || {} || {} || {} || {}",
            self.date_cell(),
            self.start_time,
            self.end_time,
            self.location,
            self.title
        )
    }
}

/// Renders rows into the final page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableRenderer {
    timezone: Timezone,
    info_as_comment: bool,
}

impl TableRenderer {
    /// Create a renderer showing times in `timezone`
    #[must_use]
    pub const fn new(timezone: Timezone) -> Self {
        Self {
            timezone,
            info_as_comment: false,
        }
    }

    /// Wrap the info text in an HTML comment instead of showing it
    #[must_use]
    pub const fn with_info_as_comment(mut self, info_as_comment: bool) -> Self {
        self.info_as_comment = info_as_comment;
        self
    }

    /// Display timezone
    #[must_use]
    pub const fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Format a single event with this renderer's timezone
    #[must_use]
    pub fn row(&self, event: &CalendarEvent, linker: &KeywordLinker) -> Option<RenderedRow> {
        RenderedRow::from_event(event, linker, self.timezone)
    }

    /// Render the page: optional info text, then the table
    ///
    /// The table is always emitted, with a header row even when there are
    /// no rows. Blank info text is treated as absent.
    #[must_use]
    pub fn render(&self, rows: &[RenderedRow], info_text: Option<&str>) -> PageContent {
        let mut lines: Vec<String> = Vec::with_capacity(rows.len() + 4);

        if let Some(info) = info_text.map(str::trim).filter(|info| !info.is_empty()) {
            if self.info_as_comment {
                lines.push(format!("<!--\n{info}\n-->\n"));
            } else {
                lines.push(format!("{info}\n"));
            }
        }

        lines.push(TABLE_OPEN.to_string());
        lines.push(TABLE_HEADER.to_string());
        lines.extend(rows.iter().map(RenderedRow::to_markup));
        lines.push(TABLE_CLOSE.to_string());

        PageContent::new(lines.join("\n"), rows.len())
    }
}
