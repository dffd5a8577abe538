//! Page runtime
//!
//! Event loop for one page. Page events arrive on a channel; accepted
//! clicks and history pops become navigation tasks on a local executor so
//! a new click can start (and supersede) a navigation while an older one
//! is still waiting on the network.

use crate::{ClickEvent, Host, NavigationOutcome, NavigationTarget, SoftNavigator, Timer};
use smol::channel::{Receiver, Sender};
use smol::{LocalExecutor, Task};
use softnav_net::Fetcher;

/// Input delivered to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    Click(ClickEvent),
    /// The location already changed (traversal done elsewhere)
    PopState,
    /// `history.back()`
    Back,
    /// `history.forward()`
    Forward,
    Scroll,
    Resize,
    Load,
    ToggleClick,
    OverlayClick,
    AnimationFrame,
}

/// What became of a navigation-related event
#[derive(Debug)]
pub enum PageReport {
    /// Click left to the browser
    NotIntercepted { event: ClickEvent },
    /// Traversal past the end of history
    NoHistoryEntry { delta: i32 },
    Navigated {
        target: NavigationTarget,
        outcome: NavigationOutcome,
    },
}

pub struct PageRuntime<H, F, T> {
    navigator: SoftNavigator<H, F, T>,
    reports: Option<Sender<PageReport>>,
}

impl<H: Host, F: Fetcher, T: Timer> PageRuntime<H, F, T> {
    pub fn new(navigator: SoftNavigator<H, F, T>) -> Self {
        Self {
            navigator,
            reports: None,
        }
    }

    /// Send a [`PageReport`] for every navigation-related event
    pub fn with_reports(mut self, reports: Sender<PageReport>) -> Self {
        self.reports = Some(reports);
        self
    }

    pub fn navigator(&self) -> &SoftNavigator<H, F, T> {
        &self.navigator
    }

    pub fn into_navigator(self) -> SoftNavigator<H, F, T> {
        self.navigator
    }

    /// Process events until the channel closes, then wait for in-flight
    /// navigations. Returns the number of navigations started.
    pub async fn run(&self, events: Receiver<PageEvent>) -> usize {
        let ex = LocalExecutor::new();
        ex.run(async {
            let mut tasks: Vec<Task<()>> = Vec::new();
            let mut started = 0;

            while let Ok(event) = events.recv().await {
                let Some(target) = self.dispatch(event).await else {
                    continue;
                };
                started += 1;

                let navigator = self.navigator.clone();
                let reports = self.reports.clone();
                tasks.push(ex.spawn(async move {
                    let outcome = navigator.navigate(target.clone()).await;
                    send(reports.as_ref(), PageReport::Navigated { target, outcome }).await;
                }));
                tasks.retain(|task| !task.is_finished());
            }

            tracing::debug!(in_flight = tasks.len(), "event channel closed, draining navigations");
            for task in tasks {
                task.await;
            }
            started
        })
        .await
    }

    /// Handle one event; returns a target when a navigation should start
    async fn dispatch(&self, event: PageEvent) -> Option<NavigationTarget> {
        let nav = &self.navigator;
        match event {
            PageEvent::Click(click) => {
                let target = nav.on_click(&click);
                if target.is_none() {
                    send(self.reports.as_ref(), PageReport::NotIntercepted { event: click }).await;
                }
                target
            }
            PageEvent::PopState => Some(nav.on_pop()),
            PageEvent::Back => self.traverse(-1).await,
            PageEvent::Forward => self.traverse(1).await,
            PageEvent::Scroll => {
                nav.on_scroll();
                None
            }
            PageEvent::Resize => {
                nav.on_resize();
                None
            }
            PageEvent::Load => {
                nav.on_load();
                None
            }
            PageEvent::ToggleClick => {
                nav.on_toggle_click();
                None
            }
            PageEvent::OverlayClick => {
                nav.on_overlay_click();
                None
            }
            PageEvent::AnimationFrame => {
                nav.animation_frame();
                None
            }
        }
    }

    async fn traverse(&self, delta: i32) -> Option<NavigationTarget> {
        let target = self.navigator.on_traverse(delta);
        if target.is_none() {
            send(self.reports.as_ref(), PageReport::NoHistoryEntry { delta }).await;
        }
        target
    }
}

async fn send(reports: Option<&Sender<PageReport>>, report: PageReport) {
    if let Some(reports) = reports {
        // A dropped receiver only means nobody is listening
        let _ = reports.send(report).await;
    }
}
