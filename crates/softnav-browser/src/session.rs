//! Replay session
//!
//! One page at a time: each page gets a navigator and a runtime; a step
//! that falls back to a full load stops the runtime, takes the host back
//! (history included) and loads the new location from scratch.

use crate::Step;
use serde::Serialize;
use smol::channel::{Receiver, Sender, unbounded};
use softnav_engine::dom::{Document, NodeId};
use softnav_engine::html::{HtmlParser, ParseError};
use softnav_engine::net::{Fetcher, NetError, Request};
use softnav_engine::{
    ClickEvent, ConfigError, HeadlessHost, Host, NavConfig, NavigationOutcome, PageEvent, PageReport, PageRuntime,
    SmolTimer, SoftNavigator,
};
use std::fmt;
use std::rc::Rc;
use url::Url;

type Navigator<F> = SoftNavigator<HeadlessHost, Rc<F>, SmolTimer>;
type Runtime<F> = PageRuntime<HeadlessHost, Rc<F>, SmolTimer>;

/// Session error
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: Url,
        #[source]
        source: NetError,
    },

    #[error("{url} answered HTTP {status}")]
    Status { url: Url, status: u16 },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("page state still shared after the runtime stopped")]
    PageInUse,
}

/// Page state after one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    pub step: String,
    /// `loaded`, `swapped`, `full-load`, `superseded`, `not-intercepted`,
    /// `no-history` or `no-such-link`
    pub outcome: String,
    pub url: String,
    pub title: String,
    /// `href`s of the active nav links
    pub active: Vec<String>,
    pub history_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StepSummary {
    fn capture<F>(nav: &Navigator<F>, step: String, outcome: &str, detail: Option<String>) -> Self {
        let active_class = &nav.config().classes.active;
        nav.with_page(|page| {
            let tree = page.document.tree();
            let mut active: Vec<String> = page
                .document
                .query_selector_all(&nav.selectors().nav_links)
                .into_iter()
                .filter(|&link| tree.has_class(link, active_class))
                .filter_map(|link| tree.attribute(link, "href").map(str::to_string))
                .collect();
            active.sort();
            active.dedup();

            Self {
                step,
                outcome: outcome.to_string(),
                url: page.host.history().current().to_string(),
                title: page.document.title(),
                active,
                history_len: page.host.history().len(),
                detail,
            }
        })
    }

    /// Refresh page fields after a re-bootstrap
    fn refresh<F>(&mut self, nav: &Navigator<F>) {
        let now = Self::capture(nav, String::new(), "", None);
        self.url = now.url;
        self.title = now.title;
        self.active = now.active;
        self.history_len = now.history_len;
    }
}

impl fmt::Display for StepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<24} {:<16} {}  \"{}\"  active=[{}]  history={}",
            self.step,
            self.outcome,
            self.url,
            self.title,
            self.active.join(", "),
            self.history_len
        )?;
        if let Some(detail) = &self.detail {
            write!(f, "  ({detail})")?;
        }
        Ok(())
    }
}

/// Replays steps against one site
pub struct Session<F> {
    fetcher: Rc<F>,
    config: NavConfig,
}

impl<F: Fetcher> Session<F> {
    pub fn new(fetcher: F, config: NavConfig) -> Self {
        Self {
            fetcher: Rc::new(fetcher),
            config,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Load `start`, then replay `steps`; one summary for the load plus one
    /// per step.
    pub async fn run(&self, start: &Url, steps: &[Step]) -> Result<Vec<StepSummary>, SessionError> {
        let mut host = HeadlessHost::new(start.clone()).with_visibility_observation(false);
        let mut document = self.load(start).await?;
        let mut summaries: Vec<StepSummary> = Vec::new();
        let mut steps = steps.iter();

        loop {
            let navigator = SoftNavigator::attach(
                document,
                host,
                Rc::clone(&self.fetcher),
                SmolTimer,
                self.config.clone(),
            )?;
            match summaries.last_mut() {
                None => summaries.push(StepSummary::capture(&navigator, "load".into(), "loaded", None)),
                Some(last) => last.refresh(&navigator),
            }

            let (report_tx, reports) = unbounded();
            let runtime = PageRuntime::new(navigator).with_reports(report_tx);
            let (events, rx) = unbounded();

            let driver = async {
                let mut handed_over = false;
                for step in steps.by_ref() {
                    let summary = Self::replay(&runtime, &events, &reports, step).await;
                    handed_over = summary.outcome == "full-load";
                    summaries.push(summary);
                    if handed_over {
                        break;
                    }
                }
                events.close();
                handed_over
            };
            let (_, handed_over) = smol::future::zip(runtime.run(rx), driver).await;

            let (_, next_host) = runtime.into_navigator().into_parts().ok_or(SessionError::PageInUse)?;
            host = next_host;
            if !handed_over {
                return Ok(summaries);
            }

            let url = host.location();
            tracing::info!(url = %url, "full page load");
            document = self.load(&url).await?;
        }
    }

    /// Plain page load, as the browser does on a hard navigation
    async fn load(&self, url: &Url) -> Result<Document, SessionError> {
        let request = Request::get(url.clone()).with_header("Accept", "text/html");
        let response = self
            .fetcher
            .fetch(request)
            .await
            .map_err(|source| SessionError::Fetch {
                url: url.clone(),
                source,
            })?;
        if !response.ok() {
            return Err(SessionError::Status {
                url: url.clone(),
                status: response.status,
            });
        }
        let document = HtmlParser::new().parse_bytes(&response.body, url.as_str())?;
        tracing::debug!(url = %url, title = %document.title(), "page loaded");
        Ok(document)
    }

    async fn replay(
        runtime: &Runtime<F>,
        events: &Sender<PageEvent>,
        reports: &Receiver<PageReport>,
        step: &Step,
    ) -> StepSummary {
        let nav = runtime.navigator();
        let event = match step {
            Step::Click(href) => match find_link(nav, href) {
                Some(link) => PageEvent::Click(ClickEvent::on(link)),
                None => return StepSummary::capture(nav, step.to_string(), "no-such-link", None),
            },
            Step::Back => PageEvent::Back,
            Step::Forward => PageEvent::Forward,
        };
        if events.send(event).await.is_err() {
            return StepSummary::capture(nav, step.to_string(), "closed", None);
        }

        let (outcome, detail) = match reports.recv().await {
            Ok(PageReport::Navigated { outcome, .. }) => {
                let detail = match &outcome {
                    NavigationOutcome::FellBackToFullLoad { reason } => Some(reason.to_string()),
                    _ => None,
                };
                (outcome.label(), detail)
            }
            Ok(PageReport::NotIntercepted { .. }) => ("not-intercepted", None),
            Ok(PageReport::NoHistoryEntry { .. }) => ("no-history", None),
            Err(_) => ("closed", None),
        };
        let summary = StepSummary::capture(nav, step.to_string(), outcome, detail);
        let _ = events.send(PageEvent::AnimationFrame).await;
        summary
    }
}

fn find_link<F>(nav: &Navigator<F>, href: &str) -> Option<NodeId> {
    nav.with_page(|page| {
        page.document
            .query_selector_all(&nav.selectors().link)
            .into_iter()
            .find(|&link| page.document.tree().attribute(link, "href") == Some(href))
    })
}
