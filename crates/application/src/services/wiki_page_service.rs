//! Wiki page service
//!
//! Runs the whole pipeline once: fetch the feed, select and order events,
//! render the table and (unless dry-running) replace the wiki page.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::PageContent;
use tracing::{debug, info, instrument};

use crate::{
    error::ApplicationError,
    ports::{CalendarSourcePort, WikiPublisherPort},
    services::{EventFilter, KeywordLinker, RenderedRow, TableRenderer},
};

/// Where the events come from and what goes above the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSettings {
    /// URL of the iCalendar feed
    pub calendar_url: String,
    /// Text shown before the table
    pub info_text: Option<String>,
}

impl PageSettings {
    /// Create settings for a feed URL
    #[must_use]
    pub fn new(calendar_url: impl Into<String>) -> Self {
        Self {
            calendar_url: calendar_url.into(),
            info_text: None,
        }
    }

    /// Set the info text
    #[must_use]
    pub fn with_info_text(mut self, info_text: impl Into<String>) -> Self {
        self.info_text = Some(info_text.into());
        self
    }
}

/// The page that gets replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    /// Wiki page title
    pub page_title: String,
    /// Edit summary recorded with the revision
    pub edit_summary: String,
}

/// Whether a run touches the wiki
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Render and replace the page
    #[default]
    Publish,
    /// Render only
    DryRun,
}

/// Result of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// The rendered page
    pub page: PageContent,
    /// Whether the page was sent to the wiki
    pub published: bool,
}

/// Orchestrates one calendar-to-wiki run
pub struct WikiPageService {
    source: Arc<dyn CalendarSourcePort>,
    publisher: Option<(Arc<dyn WikiPublisherPort>, PublishTarget)>,
    settings: PageSettings,
    filter: EventFilter,
    linker: KeywordLinker,
    renderer: TableRenderer,
}

impl fmt::Debug for WikiPageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WikiPageService")
            .field("settings", &self.settings)
            .field("has_publisher", &self.publisher.is_some())
            .field("rules", &self.linker.rules().len())
            .finish_non_exhaustive()
    }
}

impl WikiPageService {
    /// Create a service reading from `source`
    pub fn new(source: Arc<dyn CalendarSourcePort>, settings: PageSettings) -> Self {
        Self {
            source,
            publisher: None,
            settings,
            filter: EventFilter::new(),
            linker: KeywordLinker::default(),
            renderer: TableRenderer::default(),
        }
    }

    /// Set the keyword link rules
    #[must_use]
    pub fn with_linker(mut self, linker: KeywordLinker) -> Self {
        self.linker = linker;
        self
    }

    /// Set the table renderer
    #[must_use]
    pub const fn with_renderer(mut self, renderer: TableRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Enable publishing to `target` through `publisher`
    #[must_use]
    pub fn with_publisher(
        mut self,
        publisher: Arc<dyn WikiPublisherPort>,
        target: PublishTarget,
    ) -> Self {
        self.publisher = Some((publisher, target));
        self
    }

    /// Fetch, filter, link and render the page as of `now`
    #[instrument(skip(self), fields(url = %self.settings.calendar_url))]
    pub async fn build_page(&self, now: DateTime<Utc>) -> Result<PageContent, ApplicationError> {
        let events = self.source.fetch(&self.settings.calendar_url).await?;
        debug!(count = events.len(), "Fetched events");

        let visible = self.filter.filter(&events, now);
        debug!(count = visible.len(), "Selected upcoming events");

        let rows: Vec<RenderedRow> = visible
            .iter()
            .filter_map(|event| self.renderer.row(event, &self.linker))
            .collect();

        Ok(self
            .renderer
            .render(&rows, self.settings.info_text.as_deref()))
    }

    /// Run the pipeline once
    ///
    /// In [`RunMode::Publish`] the page is replaced in full or not at all;
    /// a missing publisher is a configuration error.
    #[instrument(skip(self))]
    pub async fn run(
        &self,
        now: DateTime<Utc>,
        mode: RunMode,
    ) -> Result<RunOutcome, ApplicationError> {
        // Check before fetching so a misconfigured run does no network I/O
        let publisher = match mode {
            RunMode::Publish => Some(self.publisher.as_ref().ok_or_else(|| {
                ApplicationError::Configuration("no wiki publisher configured".to_string())
            })?),
            RunMode::DryRun => None,
        };

        let page = self.build_page(now).await?;

        let Some((publisher, target)) = publisher else {
            info!(rows = page.row_count, "Dry run, page not published");
            return Ok(RunOutcome {
                page,
                published: false,
            });
        };

        publisher
            .publish(&target.page_title, page.as_str(), &target.edit_summary)
            .await?;
        info!(
            page = %target.page_title,
            rows = page.row_count,
            "Published wiki page"
        );

        Ok(RunOutcome {
            page,
            published: true,
        })
    }
}
