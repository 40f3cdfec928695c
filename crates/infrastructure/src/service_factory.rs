//! Wiring of configuration, adapters and the application service

use std::sync::Arc;

use application::{
    ApplicationError, KeywordLinker, PageSettings, PublishTarget, RunMode, TableRenderer,
    WikiPageService,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    adapters::{IcsCalendarAdapter, MediaWikiAdapter},
    config::{AppConfig, ConfigError},
};

/// Build a [`WikiPageService`] for one run in `mode` as of `now`
///
/// The configuration is validated first; in [`RunMode::DryRun`] no wiki
/// settings are needed and no publisher is attached.
pub fn wiki_page_service(
    config: &AppConfig,
    mode: RunMode,
    now: DateTime<Utc>,
) -> Result<WikiPageService, ApplicationError> {
    config.validate(mode)?;

    let timezone = config.calendar.timezone()?;
    let rules = config
        .calendar
        .link_rules()
        .map_err(|errors| ConfigError::Invalid {
            violations: errors.iter().map(ToString::to_string).collect(),
        })?;
    let calendar_url = required(config.calendar.url.as_deref(), "CALENDAR_URL")?;
    debug!(rules = rules.len(), %timezone, "Configuration validated");

    let source = IcsCalendarAdapter::new(config.http.ics_config(), timezone)?
        .with_reference_time(now);

    let mut settings = PageSettings::new(calendar_url);
    if let Some(info) = config.wiki.info.as_deref() {
        settings = settings.with_info_text(info);
    }

    let service = WikiPageService::new(Arc::new(source), settings)
        .with_linker(KeywordLinker::new(rules))
        .with_renderer(
            TableRenderer::new(timezone).with_info_as_comment(config.wiki.info_as_comment),
        );

    if mode == RunMode::DryRun {
        return Ok(service);
    }

    let publisher = MediaWikiAdapter::new(config.mediawiki_config()?)?;
    let target = PublishTarget {
        page_title: required(config.wiki.page_title.as_deref(), "WIKI_PAGE_TITLE")?.to_string(),
        edit_summary: config.wiki.edit_summary.clone(),
    };
    Ok(service.with_publisher(Arc::new(publisher), target))
}

fn required<'a>(value: Option<&'a str>, var: &str) -> Result<&'a str, ConfigError> {
    value.ok_or_else(|| ConfigError::Invalid {
        violations: vec![format!("{var} is not set")],
    })
}
