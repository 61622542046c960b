//! Integration tests for the dashboard controller against a recording broker

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::fixtures::{bidask, future, history, later_future, stock, tick};
use common::FakeClient;
use quotedash::domain::SessionEvent;
use quotedash::{Dashboard, DashboardConfig, SessionState};
use tokio::runtime::Runtime;

fn setup(client: Arc<FakeClient>, config: DashboardConfig) -> (Runtime, Dashboard) {
    let runtime = Runtime::new().unwrap();
    let dashboard = Dashboard::new(client, runtime.handle().clone(), config);
    (runtime, dashboard)
}

fn client() -> Arc<FakeClient> {
    let client = FakeClient::new(vec![stock(), later_future(), future()]);
    client.set_history("TXFJ1", history(-14, 15, 16411.0));
    client.set_history("TXFK1", history(-2, 3, 16500.0));
    Arc::new(client)
}

#[test]
fn test_start_picks_smallest_future_and_subscribes_both_feeds() {
    let client = client();
    let (_rt, mut dashboard) = setup(client.clone(), DashboardConfig::default());

    dashboard.start().unwrap();
    dashboard.process_pending().unwrap();

    assert_eq!(dashboard.state(), SessionState::Connected);
    assert_eq!(dashboard.contract().unwrap().code, "TXFJ1");
    assert_eq!(dashboard.tape.len(), 15);
    assert_eq!(dashboard.selector.active_code(), Some("TXFJ1"));

    let calls = client.calls();
    verbose_println!("calls: {:?}", calls);
    assert_eq!(calls[0], "login PAPIUSER01");
    assert_eq!(calls[1], "list_contracts");
    assert!(calls[2].starts_with("fetch TXFJ1 "));
    assert!(calls[2].ends_with(" 15"));
    assert_eq!(&calls[3..], ["subscribe TXFJ1 BidAsk", "subscribe TXFJ1 Tick"]);
}

#[test]
fn test_start_shows_loading_before_history_query() {
    let client = client();
    let (_rt, mut dashboard) = setup(client.clone(), DashboardConfig::default());

    dashboard.start().unwrap();

    assert_eq!(dashboard.state(), SessionState::Connected);
    assert!(dashboard.is_loading());
    assert!(dashboard.contract().is_none());
    assert_eq!(
        dashboard.status.notice(),
        Some("Loading ticks for TXF202110...")
    );
    assert_eq!(client.calls(), vec!["login PAPIUSER01", "list_contracts"]);

    dashboard.process_pending().unwrap();
    assert!(!dashboard.is_loading());
    assert_eq!(dashboard.contract().unwrap().code, "TXFJ1");
    assert!(dashboard.status.notice().is_none());
}

#[test]
fn test_start_fails_on_rejected_login() {
    let client = Arc::new(FakeClient::rejecting_login(vec![future()]));
    let (_rt, mut dashboard) = setup(client.clone(), DashboardConfig::default());

    assert!(dashboard.start().is_err());
    assert_eq!(dashboard.state(), SessionState::Unauthenticated);
    assert_eq!(client.calls(), vec!["login PAPIUSER01"]);

    // No session to release
    dashboard.shutdown();
    assert!(!client.calls().contains(&"logout".to_string()));
}

#[test]
fn test_switch_unsubscribes_before_subscribing() {
    let client = client();
    let (_rt, mut dashboard) = setup(client.clone(), DashboardConfig::default());
    dashboard.start().unwrap();
    dashboard.process_pending().unwrap();
    let before = client.calls().len();

    dashboard.switch_contract(later_future()).unwrap();

    let calls = client.calls()[before..].to_vec();
    assert_eq!(calls[0], "unsubscribe TXFJ1 BidAsk");
    assert_eq!(calls[1], "unsubscribe TXFJ1 Tick");
    assert!(calls[2].starts_with("fetch TXFK1 "));
    assert_eq!(&calls[3..], ["subscribe TXFK1 BidAsk", "subscribe TXFK1 Tick"]);

    assert_eq!(dashboard.contract().unwrap().code, "TXFK1");
    assert_eq!(dashboard.order_book.render().title, "TXF202111");
    assert_eq!(dashboard.order_book.render().bid_total, 0);
    assert!(dashboard.tape.render().iter().all(|r| r.price == 16500.0));
}

#[test]
fn test_switch_to_current_contract_is_noop() {
    let client = client();
    let (_rt, mut dashboard) = setup(client.clone(), DashboardConfig::default());
    dashboard.start().unwrap();
    dashboard.process_pending().unwrap();
    let before = client.calls().len();

    dashboard.request_switch(future());
    assert!(!dashboard.is_loading());
    dashboard.switch_contract(future()).unwrap();

    assert_eq!(client.calls().len(), before);
}

#[test]
fn test_request_switch_shows_loading_until_processed() {
    let client = client();
    let (_rt, mut dashboard) = setup(client.clone(), DashboardConfig::default());
    dashboard.start().unwrap();
    dashboard.process_pending().unwrap();

    dashboard.request_switch(later_future());
    assert!(dashboard.is_loading());
    assert!(dashboard.status.notice().unwrap().starts_with("Loading ticks"));
    assert_eq!(dashboard.contract().unwrap().code, "TXFJ1");

    dashboard.process_pending().unwrap();
    assert!(!dashboard.is_loading());
    assert_eq!(dashboard.contract().unwrap().code, "TXFK1");
    assert!(dashboard.status.notice().is_none());
}

#[test]
fn test_queued_events_of_old_contract_are_discarded() {
    let client = client();
    let (_rt, mut dashboard) = setup(client.clone(), DashboardConfig::default());
    dashboard.start().unwrap();
    dashboard.process_pending().unwrap();

    // Arrives before the switch but is drained after it
    client.push_tick(tick("TXFJ1", 5, 16420.0, 9));
    client.push_bidask(bidask("TXFJ1", 16419.0, 16421.0));

    dashboard.switch_contract(later_future()).unwrap();

    // In flight while the unsubscribe was being processed
    client.push_tick(tick("TXFJ1", 6, 16421.0, 9));
    dashboard.drain_events();

    let rows = dashboard.tape.render();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.price == 16500.0));
    assert_eq!(dashboard.order_book.render().bid_total, 0);
    assert!(dashboard.order_book.last_tick().is_none());
}

#[test]
fn test_live_events_reach_both_panels() {
    let client = client();
    let (_rt, mut dashboard) = setup(client.clone(), DashboardConfig::default());
    dashboard.start().unwrap();
    dashboard.process_pending().unwrap();

    client.push_bidask(bidask("TXFJ1", 16411.0, 16413.0));
    client.push_tick(tick("TXFJ1", 1, 16413.0, 4));
    assert_eq!(dashboard.drain_events(), 2);

    let snap = dashboard.order_book.render();
    assert_eq!(snap.bid_total, 46);
    assert_eq!(snap.ask_total, 60);
    assert_eq!(snap.last_trade.as_ref().unwrap().price, 16413.0);

    let newest = &dashboard.tape.render()[0];
    assert_eq!(newest.price, 16413.0);
    assert_eq!(newest.bid, Some(16411.0));
    assert_eq!(newest.ask, Some(16413.0));
    assert_eq!(dashboard.tape.len(), 15);
}

#[test]
fn test_session_events_shown_verbatim() {
    let client = client();
    let (_rt, mut dashboard) = setup(client.clone(), DashboardConfig::default());
    dashboard.start().unwrap();
    dashboard.process_pending().unwrap();

    client.push_session(SessionEvent::new(
        200,
        16,
        "TIC/v1/FOP/*/TFE/TXFJ1",
        "Subscribe or Unsubscribe ok",
    ));
    dashboard.drain_events();

    assert_eq!(
        dashboard.status.message(),
        "Response Code: 200 | Event Code: 16 | Info: TIC/v1/FOP/*/TFE/TXFJ1 | Event: Subscribe or Unsubscribe ok"
    );
}

#[test]
fn test_session_events_survive_switch() {
    let client = client();
    let (_rt, mut dashboard) = setup(client.clone(), DashboardConfig::default());
    dashboard.start().unwrap();
    dashboard.process_pending().unwrap();

    client.push_session(SessionEvent::new(0, 0, "Session up", "Session connect"));
    dashboard.switch_contract(later_future()).unwrap();

    assert!(dashboard.status.message().contains("Session connect"));
}

#[test]
fn test_history_failure_leaves_empty_tape() {
    let client = client();
    client.fail_history("TXFK1", "server busy");
    let (_rt, mut dashboard) = setup(client.clone(), DashboardConfig::default());
    dashboard.start().unwrap();
    dashboard.process_pending().unwrap();

    dashboard.switch_contract(later_future()).unwrap();

    assert!(dashboard.tape.is_empty());
    assert!(dashboard.status.notice().unwrap().contains("server busy"));
    // Feeds still start
    assert!(client.calls().contains(&"subscribe TXFK1 Tick".to_string()));

    client.push_tick(tick("TXFK1", 0, 16501.0, 1));
    dashboard.drain_events();
    assert_eq!(dashboard.tape.len(), 1);
}

#[test]
fn test_history_timeout_leaves_empty_tape() {
    let client = client();
    client.delay_history(Duration::from_millis(1500));
    let config = DashboardConfig {
        history_timeout_secs: 1,
        ..DashboardConfig::default()
    };
    let (_rt, mut dashboard) = setup(client.clone(), config);

    dashboard.start().unwrap();
    dashboard.process_pending().unwrap();

    assert_eq!(dashboard.contract().unwrap().code, "TXFJ1");
    assert!(dashboard.tape.is_empty());
    assert!(dashboard.status.notice().unwrap().contains("timed out"));
    assert!(client.calls().contains(&"subscribe TXFJ1 BidAsk".to_string()));
}

#[test]
fn test_shutdown_unsubscribes_then_logs_out_once() {
    let client = client();
    let (_rt, mut dashboard) = setup(client.clone(), DashboardConfig::default());
    dashboard.start().unwrap();
    dashboard.process_pending().unwrap();
    let before = client.calls().len();

    dashboard.shutdown();
    dashboard.shutdown();

    let calls = client.calls()[before..].to_vec();
    assert_eq!(
        calls,
        vec!["unsubscribe TXFJ1 BidAsk", "unsubscribe TXFJ1 Tick", "logout"]
    );
    assert_eq!(dashboard.state(), SessionState::Shutdown);

    drop(dashboard);
    assert_eq!(client.calls().len(), before + 3);
}
