//! Event-loop tests for `PageRuntime`

use smol::channel::{Receiver, unbounded};
use softnav_engine::dom::SelectorList;
use softnav_engine::html::parse;
use softnav_engine::net::MemoryFetcher;
use softnav_engine::*;
use std::rc::Rc;
use url::Url;

const HOME: &str = r#"<title>Home</title>
<nav class="nav-links"><a href="index.html">Home</a><a href="about.html">About</a></nav>
<button class="nav-toggle"></button><nav class="mobile-nav"></nav><div class="nav-overlay"></div>
<main id="page-content"><a id="out" href="https://elsewhere.example/">Out</a></main>"#;

const ABOUT: &str = r#"<title>About</title>
<nav class="nav-links"><a href="index.html">Home</a><a href="about.html">About</a></nav>
<main id="page-content"><p>about</p></main>"#;

fn runtime() -> (PageRuntime<HeadlessHost, Rc<MemoryFetcher>, ImmediateTimer>, Receiver<PageReport>) {
    let fetcher = Rc::new(MemoryFetcher::new());
    fetcher.insert_page("https://ib.example/", HOME);
    fetcher.insert_page("https://ib.example/about.html", ABOUT);

    let host = HeadlessHost::new(Url::parse("https://ib.example/").unwrap());
    let document = parse(HOME, "https://ib.example/");
    let nav = SoftNavigator::attach(document, host, fetcher, ImmediateTimer, NavConfig::default()).unwrap();

    let (tx, rx) = unbounded();
    (PageRuntime::new(nav).with_reports(tx), rx)
}

fn click_event<H, F, T>(nav: &SoftNavigator<H, F, T>, selector: &str) -> PageEvent {
    let selector = SelectorList::parse(selector).unwrap();
    let node = nav.with_page(|p| p.document.query_selector(&selector)).unwrap();
    PageEvent::Click(ClickEvent::on(node))
}

// ============================================================================
// EVENT LOOP
// ============================================================================

#[test]
fn test_runtime_navigates_and_reports() {
    let (runtime, reports) = runtime();
    let (events, rx) = unbounded();

    events.try_send(click_event(runtime.navigator(), "#out")).unwrap();
    events.try_send(click_event(runtime.navigator(), ".nav-links a[href=\"about.html\"]")).unwrap();
    drop(events);

    let started = smol::block_on(runtime.run(rx));
    assert_eq!(started, 1);

    assert!(matches!(reports.try_recv().unwrap(), PageReport::NotIntercepted { .. }));
    match reports.try_recv().unwrap() {
        PageReport::Navigated { target, outcome } => {
            assert_eq!(target.url.as_str(), "https://ib.example/about.html");
            assert!(target.push);
            assert!(outcome.is_swapped());
        }
        other => panic!("unexpected report {other:?}"),
    }
    assert_eq!(runtime.navigator().title(), "About");
}

#[test]
fn test_runtime_history_and_frames() {
    let (runtime, reports) = runtime();
    let nav = runtime.navigator().clone();

    let (events, rx) = unbounded();
    smol::block_on(smol::future::zip(runtime.run(rx), async {
        events.send(click_event(&nav, ".nav-links a[href=\"about.html\"]")).await.unwrap();
        assert!(matches!(reports.recv().await.unwrap(), PageReport::Navigated { .. }));

        let region = nav.content_region().unwrap();
        events.send(PageEvent::AnimationFrame).await.unwrap();
        events.send(PageEvent::Back).await.unwrap();
        match reports.recv().await.unwrap() {
            PageReport::Navigated { target, outcome } => {
                assert!(!target.push);
                assert!(outcome.is_swapped());
            }
            other => panic!("unexpected report {other:?}"),
        }
        assert!(!nav.with_page(|p| p.document.tree().is_connected(region)));

        events.send(PageEvent::Back).await.unwrap();
        assert!(matches!(
            reports.recv().await.unwrap(),
            PageReport::NoHistoryEntry { delta: -1 }
        ));
        events.close();
    }));

    assert_eq!(nav.title(), "Home");
    assert_eq!(nav.with_page(|p| p.host.history().len()), 2);
}

#[test]
fn test_runtime_chrome_events() {
    let (runtime, _reports) = runtime();
    let nav = runtime.navigator().clone();
    let (events, rx) = unbounded();

    for event in [PageEvent::ToggleClick, PageEvent::Scroll, PageEvent::Resize, PageEvent::Load] {
        events.try_send(event).unwrap();
    }
    drop(events);
    assert_eq!(smol::block_on(runtime.run(rx)), 0);

    let overlay = nav.with_page(|p| p.chrome().mobile.unwrap().overlay);
    assert!(nav.with_page(|p| p.document.tree().has_class(overlay, "open")));
}

#[test]
fn test_runtime_drains_in_flight_navigation() {
    let (runtime, reports) = runtime();
    let (events, rx) = unbounded();
    events.try_send(PageEvent::PopState).unwrap();
    drop(events);

    assert_eq!(smol::block_on(runtime.run(rx)), 1);
    assert!(matches!(reports.try_recv().unwrap(), PageReport::Navigated { .. }));
    drop(reports);

    let (document, host) = runtime.into_navigator().into_parts().unwrap();
    assert_eq!(document.title(), "Home");
    assert_eq!(host.history().len(), 1);
}
