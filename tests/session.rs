mod support;

use std::time::Duration;

use canvas::input::{Modifiers, PointerEvent};
use canvas::surface::Rgba;
use drawboard::{ConnectionState, DrawingSession, DrawingView};
use frames::{ShapeColor, ShapeEvent, ShapeType};
use support::{AfterScript, Fixture, MISSING_DRAWING, relocation_frame, shape_frame, unreachable_config};

const WAIT: Duration = Duration::from_secs(5);

async fn step_until<F>(session: &mut DrawingSession, mut done: F)
where
    F: FnMut(&DrawingSession) -> bool,
{
    tokio::time::timeout(WAIT, async {
        while !done(session) {
            assert!(session.step().await, "session ended early");
        }
    })
    .await
    .expect("condition reached in time");
}

fn has_snapshot(session: &DrawingSession) -> bool {
    session.view().and_then(DrawingView::snapshot).is_some()
}

#[tokio::test]
async fn inbound_shapes_are_drawn() {
    let fixture = Fixture::spawn(
        |_| vec![shape_frame(100.0, 100.0, "BLUE", "BIG_SQUARE"), shape_frame(20.0, 20.0, "RED", "SMALL_CIRCLE")],
        AfterScript::Listen,
    )
    .await;
    let mut session = DrawingSession::enter(fixture.config(), "7").await;
    assert_eq!(session.state(), ConnectionState::Open);

    step_until(&mut session, |s| s.view().is_some_and(|v| v.stats().rendered == 2)).await;

    let view = session.view().expect("view");
    assert_eq!(view.surface().pixel(100, 100), Some(Rgba::opaque(0, 0, 255)));
    assert_eq!(view.surface().pixel(20, 20), Some(Rgba::opaque(255, 0, 0)));
}

#[tokio::test]
async fn relocation_triggers_exactly_one_snapshot_fetch() {
    let fixture = Fixture::spawn(
        |addr| vec![shape_frame(10.0, 10.0, "BLUE", "SMALL_SQUARE"), relocation_frame(&addr.to_string())],
        AfterScript::Listen,
    )
    .await;
    let mut session = DrawingSession::enter(fixture.config(), "7").await;

    step_until(&mut session, has_snapshot).await;

    assert_eq!(fixture.snapshot_hits(), 1);
    assert_eq!(session.pending_fetches(), 0);
    let view = session.view().expect("view");
    assert_eq!(view.sse_location(), Some(fixture.authority().as_str()));
    assert_eq!(view.snapshot(), Some(&serde_json::json!({ "id": "7", "shapes": [] })));
    assert_eq!(view.stats().rendered, 1);
    assert_eq!(view.stats().relocations, 1);
}

#[tokio::test]
async fn each_relocation_fetches_once() {
    let fixture = Fixture::spawn(
        |addr| vec![relocation_frame(&addr.to_string()), relocation_frame(&addr.to_string())],
        AfterScript::Listen,
    )
    .await;
    let mut session = DrawingSession::enter(fixture.config(), "7").await;

    step_until(&mut session, |s| {
        s.view().is_some_and(|v| v.stats().relocations == 2) && s.pending_fetches() == 0 && has_snapshot(s)
    })
    .await;

    assert_eq!(fixture.snapshot_hits(), 2);
}

#[tokio::test]
async fn failed_snapshot_leaves_view_without_snapshot() {
    let fixture = Fixture::spawn(|addr| vec![relocation_frame(&addr.to_string())], AfterScript::Listen).await;
    let mut session = DrawingSession::enter(fixture.config(), MISSING_DRAWING).await;

    step_until(&mut session, |s| s.view().is_some_and(|v| v.stats().relocations == 1)).await;
    step_until(&mut session, |s| s.pending_fetches() == 0).await;

    assert_eq!(fixture.snapshot_hits(), 1);
    assert!(!has_snapshot(&session));
    assert!(session.connection().is_open());
}

#[tokio::test]
async fn pointer_press_sends_translated_shape() {
    let mut fixture = Fixture::spawn(|_| Vec::new(), AfterScript::Listen).await;
    let mut session = DrawingSession::enter(fixture.config(), "7").await;
    if let Some(view) = session.view_mut() {
        view.set_origin(canvas::geom::Point::new(5.0, 10.0));
    }

    assert!(session.pointer(&PointerEvent::press(35.0, 50.0)).await);
    assert!(!session.pointer(&PointerEvent::moved(35.0, 50.0, Modifiers::default())).await);

    let received = tokio::time::timeout(WAIT, fixture.received.recv())
        .await
        .expect("frame in time")
        .expect("frame");
    let expected = ShapeEvent::new(30.0, 40.0, ShapeColor::Blue, ShapeType::BigCircle);
    assert_eq!(received, frames::encode(&expected));

    let view = session.view().expect("view");
    assert_eq!(view.surface().painted_count(), 0);
}

#[tokio::test]
async fn shift_move_sends_shape() {
    let mut fixture = Fixture::spawn(|_| Vec::new(), AfterScript::Listen).await;
    let mut session = DrawingSession::enter(fixture.config(), "7").await;
    let shift = Modifiers { shift: true, ..Modifiers::default() };

    assert!(session.pointer(&PointerEvent::moved(3.0, 4.0, shift)).await);
    let received = tokio::time::timeout(WAIT, fixture.received.recv())
        .await
        .expect("frame in time")
        .expect("frame");
    assert!(received.contains("\"type\":\"BIG_CIRCLE\""));
}

#[tokio::test]
async fn remote_close_ends_run() {
    let fixture = Fixture::spawn(
        |_| vec![shape_frame(50.0, 50.0, "GREEN", "BIG_CIRCLE")],
        AfterScript::Close,
    )
    .await;
    let mut session = DrawingSession::enter(fixture.config(), "7").await;

    tokio::time::timeout(WAIT, session.run()).await.expect("run ends in time");

    assert_eq!(session.state(), ConnectionState::Closed);
    assert!(!session.step().await);
    assert!(!session.pointer(&PointerEvent::press(1.0, 1.0)).await);
    let view = session.teardown().await.expect("view");
    assert_eq!(view.stats().rendered, 1);
}

#[tokio::test]
async fn unreachable_session_is_closed_and_inert() {
    let mut session = DrawingSession::enter(unreachable_config(), "7").await;

    assert_eq!(session.state(), ConnectionState::Closed);
    assert!(session.connection().error().is_some());
    assert!(!session.step().await);
    assert!(!session.pointer(&PointerEvent::press(1.0, 1.0)).await);

    let view = session.teardown().await.expect("view");
    assert_eq!(view.drawing_id(), "7");
}

#[tokio::test]
async fn teardown_closes_open_session() {
    let fixture = Fixture::spawn(|_| Vec::new(), AfterScript::Listen).await;
    let session = DrawingSession::enter(fixture.config(), "7").await;
    assert_eq!(session.state(), ConnectionState::Open);

    let view = tokio::time::timeout(WAIT, session.teardown()).await.expect("teardown in time");
    assert!(view.is_some());
}
