//! Soft navigator
//!
//! Owns the navigation context for one live page and runs the pipeline:
//! classify → exit transition → fetch → swap → resync → history. Each
//! navigation is stamped with a generation when it starts; after every
//! suspension point it checks that no newer navigation has begun and
//! abandons itself if one has.

use crate::chrome::{self, ChromeHandles};
use crate::classifier::{self, ClickEvent};
use crate::fetcher::fetch_document;
use crate::history::{self, NavigationTarget};
use crate::reveal::RevealStrategy;
use crate::{
    ConfigError, FrameQueue, Host, NavConfig, NavError, NavigationOutcome, Selectors, Timer, resync, swapper,
};
use softnav_dom::{Document, NodeId};
use softnav_net::Fetcher;
use std::cell::RefCell;
use std::rc::Rc;
use url::Url;

/// Mutable state of the live page
#[derive(Debug)]
pub struct PageState<H> {
    pub document: Document,
    pub host: H,
    pub(crate) region: Option<NodeId>,
    pub(crate) chrome: ChromeHandles,
    pub(crate) reveal: RevealStrategy,
    pub(crate) frames: FrameQueue,
    pub(crate) generation: u64,
}

impl<H> PageState<H> {
    /// The content region, if it is still part of the page
    pub fn live_region(&self) -> Option<NodeId> {
        self.region.filter(|&r| self.document.tree().is_connected(r))
    }

    pub fn chrome(&self) -> &ChromeHandles {
        &self.chrome
    }

    pub fn reveal(&self) -> &RevealStrategy {
        &self.reveal
    }

    /// Tasks waiting for the next animation frame
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Generation of the most recently started navigation
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Soft navigation for one page.
///
/// Cheap to clone; clones share the page, so navigations spawned from a
/// clone see (and supersede) each other.
pub struct SoftNavigator<H, F, T> {
    state: Rc<RefCell<PageState<H>>>,
    fetcher: Rc<F>,
    timer: Rc<T>,
    config: Rc<NavConfig>,
    selectors: Rc<Selectors>,
}

impl<H, F, T> Clone for SoftNavigator<H, F, T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            fetcher: Rc::clone(&self.fetcher),
            timer: Rc::clone(&self.timer),
            config: Rc::clone(&self.config),
            selectors: Rc::clone(&self.selectors),
        }
    }
}

impl<H: Host, F: Fetcher, T: Timer> SoftNavigator<H, F, T> {
    /// Attach to a loaded page.
    ///
    /// Locates the content region and chrome, picks the reveal strategy
    /// from the host, and runs the initial active-link, reveal, pill and
    /// header passes.
    pub fn attach(mut document: Document, host: H, fetcher: F, timer: T, config: NavConfig) -> Result<Self, ConfigError> {
        let selectors = config.compile()?;
        document.set_url(host.location().as_str());

        let region = document.get_element_by_id(&config.content_region_id);
        if region.is_none() {
            tracing::warn!(
                region = %config.content_region_id,
                "page has no content region; links will load normally"
            );
        }
        let chrome = ChromeHandles::locate(&document, &selectors);
        let reveal = RevealStrategy::for_host(
            host.supports_visibility_observation(),
            config.reveal_threshold,
            config.reveal_bottom_margin,
        );

        let mut page = PageState {
            document,
            host,
            region,
            chrome,
            reveal,
            frames: FrameQueue::new(),
            generation: 0,
        };
        resync::initialize(&mut page, &config, &selectors);

        Ok(Self {
            state: Rc::new(RefCell::new(page)),
            fetcher: Rc::new(fetcher),
            timer: Rc::new(timer),
            config: Rc::new(config),
            selectors: Rc::new(selectors),
        })
    }

    // === Input ===

    /// Classify a click. Accepted clicks are claimed (the navigating
    /// marker and pill move to the link) and return the target to navigate.
    pub fn on_click(&self, event: &ClickEvent) -> Option<NavigationTarget> {
        let mut guard = self.state.borrow_mut();
        let page = &mut *guard;

        let link = page.document.tree().closest(event.target, &self.selectors.link)?;
        let location = page.host.location();
        let url = match classifier::classify(page.document.tree(), link, event.modifiers, &location) {
            Ok(url) => url,
            Err(reason) => {
                tracing::trace!(link = %link, %reason, "click left to the browser");
                return None;
            }
        };

        if page.document.tree().matches(link, &self.selectors.pill_links) {
            chrome::mark_navigating(&mut page.document, link, &self.config, &self.selectors);
            chrome::update_nav_indicator(&mut page.document, &page.host, Some(link), &self.config, &self.selectors);
        }
        tracing::debug!(url = %url, "click intercepted");
        Some(NavigationTarget::push(url))
    }

    /// Click through to completion; `None` if the click was not intercepted
    pub async fn click(&self, event: ClickEvent) -> Option<NavigationOutcome> {
        let target = self.on_click(&event)?;
        Some(self.navigate(target).await)
    }

    /// Pop signal: replay whatever the location now is
    pub fn on_pop(&self) -> NavigationTarget {
        history::pop_target(&self.state.borrow().host)
    }

    pub async fn popstate(&self) -> NavigationOutcome {
        let target = self.on_pop();
        self.navigate(target).await
    }

    /// `history.back()` followed by the pop signal
    pub async fn back(&self) -> Option<NavigationOutcome> {
        self.traverse(-1).await
    }

    pub async fn forward(&self) -> Option<NavigationOutcome> {
        self.traverse(1).await
    }

    async fn traverse(&self, delta: i32) -> Option<NavigationOutcome> {
        let target = self.on_traverse(delta)?;
        Some(self.navigate(target).await)
    }

    /// `history.go(delta)`; the pop target if the location moved
    pub fn on_traverse(&self, delta: i32) -> Option<NavigationTarget> {
        history::go(&mut self.state.borrow_mut().host, delta)
    }

    // === Pipeline ===

    /// Run one navigation.
    pub async fn navigate(&self, target: NavigationTarget) -> NavigationOutcome {
        let generation = {
            let mut page = self.state.borrow_mut();
            page.generation += 1;
            page.generation
        };
        tracing::debug!(url = %target.url, push = target.push, generation, "navigation started");

        match self.run(&target, generation).await {
            Ok(outcome) => outcome,
            Err(reason) => {
                let mut page = self.state.borrow_mut();
                if page.generation != generation {
                    return NavigationOutcome::Superseded;
                }
                tracing::warn!(url = %target.url, error = %reason, "soft navigation failed, loading page normally");
                page.host.assign(&target.url);
                NavigationOutcome::FellBackToFullLoad { reason }
            }
        }
    }

    async fn run(&self, target: &NavigationTarget, generation: u64) -> Result<NavigationOutcome, NavError> {
        let config = &*self.config;

        let initiator = {
            let mut page = self.state.borrow_mut();
            let region = page.live_region().ok_or_else(|| NavError::LiveRegionMissing {
                region: config.content_region_id.clone(),
            })?;
            page.document
                .tree_mut()
                .add_class(region, &config.classes.transition_out);
            page.host.location()
        };

        self.timer.sleep(config.transition_delay()).await;
        if self.is_stale(generation) {
            return Ok(self.superseded(target, generation));
        }

        let fetched = fetch_document(&*self.fetcher, &target.url, &initiator, &config.content_region_id).await;
        if self.is_stale(generation) {
            return Ok(self.superseded(target, generation));
        }
        let incoming = fetched?;

        let mut guard = self.state.borrow_mut();
        let page = &mut *guard;
        let missing = || NavError::LiveRegionMissing {
            region: config.content_region_id.clone(),
        };
        let current = page.live_region().ok_or_else(missing)?;
        let region = swapper::swap_content(&mut page.document, current, &incoming).ok_or_else(missing)?;
        page.region = Some(region);

        resync::resynchronize(page, region, &target.url, config, &self.selectors);
        history::record_if_requested(&mut page.host, target);

        tracing::info!(url = %target.url, title = %page.document.title(), generation, "soft navigation complete");
        Ok(NavigationOutcome::Swapped)
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.state.borrow().generation != generation
    }

    fn superseded(&self, target: &NavigationTarget, generation: u64) -> NavigationOutcome {
        tracing::debug!(url = %target.url, generation, "navigation superseded");
        NavigationOutcome::Superseded
    }

    // === Page events ===

    /// Scroll event: header shadow and reveal checks
    pub fn on_scroll(&self) {
        resync::after_scroll(&mut self.state.borrow_mut(), &self.config);
    }

    /// Resize event: pill and reveal checks
    pub fn on_resize(&self) {
        let mut guard = self.state.borrow_mut();
        let page = &mut *guard;
        chrome::update_nav_indicator(&mut page.document, &page.host, None, &self.config, &self.selectors);
        page.reveal
            .check(&mut page.document, &page.host, &self.config.classes.visible);
    }

    /// Load (and fonts-ready): layout settled, reposition the pill
    pub fn on_load(&self) {
        let mut guard = self.state.borrow_mut();
        let page = &mut *guard;
        chrome::update_nav_indicator(&mut page.document, &page.host, None, &self.config, &self.selectors);
    }

    /// Mobile toggle click; returns whether the nav is now open
    pub fn on_toggle_click(&self) -> bool {
        let mut page = self.state.borrow_mut();
        let mobile = page.chrome.mobile;
        match mobile {
            Some(mobile) => chrome::toggle_nav(&mut page.document, &mobile, &self.config),
            None => false,
        }
    }

    /// Overlay click closes the mobile nav
    pub fn on_overlay_click(&self) {
        let mut page = self.state.borrow_mut();
        let mobile = page.chrome.mobile;
        if let Some(mobile) = mobile {
            chrome::close_nav(&mut page.document, &mobile, &self.config);
        }
    }

    /// Run queued animation-frame work; returns the number of tasks run
    pub fn animation_frame(&self) -> usize {
        let mut guard = self.state.borrow_mut();
        let page = &mut *guard;
        page.frames.run(&mut page.document)
    }
}

impl<H, F, T> SoftNavigator<H, F, T> {
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Read the page state
    pub fn with_page<R>(&self, f: impl FnOnce(&PageState<H>) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Mutate the page state (host input such as scrolling or resizing)
    pub fn with_page_mut<R>(&self, f: impl FnOnce(&mut PageState<H>) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }

    /// Current live content region
    pub fn content_region(&self) -> Option<NodeId> {
        self.state.borrow().live_region()
    }

    pub fn title(&self) -> String {
        self.state.borrow().document.title()
    }

    /// Document URL of the live page
    pub fn document_url(&self) -> String {
        self.state.borrow().document.url().to_string()
    }

    /// Take the page back; `None` while clones are still alive
    pub fn into_parts(self) -> Option<(Document, H)> {
        let state = Rc::try_unwrap(self.state).ok()?.into_inner();
        Some((state.document, state.host))
    }
}

impl<H: Host, F, T> SoftNavigator<H, F, T> {
    /// `window.location`
    pub fn location(&self) -> Url {
        self.state.borrow().host.location()
    }
}
