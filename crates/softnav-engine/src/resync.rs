//! Post-swap resynchronization
//!
//! Brings page chrome back in line with a freshly swapped content region,
//! and runs the same entry points once when the navigator is attached.

use crate::chrome::{self, ChromeHandles};
use crate::{FrameTask, Host, NavConfig, PageState, Selectors};
use softnav_dom::NodeId;
use url::Url;

/// Run the post-swap steps for `region`, now live at `url`.
///
/// Order: active link and pill, reveal arming, navigating marker, scroll
/// to top, mobile nav, enter transition.
pub fn resynchronize<H: Host>(
    page: &mut PageState<H>,
    region: NodeId,
    url: &Url,
    config: &NavConfig,
    selectors: &Selectors,
) {
    let PageState {
        document,
        host,
        reveal,
        ..
    } = page;

    // 1
    chrome::set_active_nav(document, url.path(), config, selectors);
    chrome::update_nav_indicator(document, host, None, config, selectors);

    // 2
    let targets = document.tree().query_selector_all(region, &selectors.reveal);
    reveal.arm(document, &targets, &config.classes.visible);

    // 3
    chrome::clear_navigating(document, config, selectors);

    // 4
    host.scroll_to(0.0);
    after_scroll(page, config);

    // 5
    let PageState {
        document,
        chrome: ChromeHandles { mobile, .. },
        frames,
        ..
    } = page;
    if let Some(mobile) = mobile {
        chrome::close_nav(document, mobile, config);
    }

    // 6
    document.tree_mut().add_class(region, &config.classes.transition_in);
    frames.request(FrameTask::RemoveClass {
        node: region,
        class: config.classes.transition_in.clone(),
    });
}

/// Attach-time setup against the initial page
pub fn initialize<H: Host>(page: &mut PageState<H>, config: &NavConfig, selectors: &Selectors) {
    let location = page.host.location();
    let PageState { document, host, reveal, .. } = page;

    chrome::set_active_nav(document, location.path(), config, selectors);
    let targets = document.query_selector_all(&selectors.reveal);
    let revealed = reveal.arm(document, &targets, &config.classes.visible);
    chrome::update_nav_indicator(document, host, None, config, selectors);

    after_scroll(page, config);
    tracing::debug!(
        url = %location,
        reveal_targets = targets.len(),
        revealed,
        observing = page.reveal.is_observing(),
        "page chrome initialized"
    );
}

/// Scroll consequences: header shadow and reveal checks
pub fn after_scroll<H: Host>(page: &mut PageState<H>, config: &NavConfig) {
    let scroll_y = page.host.scroll_y();
    chrome::set_header_shadow(&mut page.document, page.chrome.header, scroll_y, config);
    page.reveal
        .check(&mut page.document, &page.host, &config.classes.visible);
}
