//! End-to-end readout scenarios driven through the scripted installer.

use std::rc::Rc;

use rectveil_engine::intercept::tracked_operation;
use rectveil_engine::property::{RectProperty, tracked_property};
use rectveil_engine::tracked::TrackedRect;
use rectveil_engine::{ContextId, SpoofEngine};
use rectveil_harness::host::scripted_rects;
use rectveil_harness::{ScriptedHost, SeedFixture};

fn host(ctx: u64) -> ScriptedHost {
    let fixture = SeedFixture::new("e2e_readout", 0xc0ffee);
    let engine = Rc::new(SpoofEngine::with_supply(fixture.supply()));
    ScriptedHost::new(engine, ContextId(ctx))
}

fn shared_host(engine: &Rc<SpoofEngine>, ctx: u64) -> ScriptedHost {
    ScriptedHost::new(Rc::clone(engine), ContextId(ctx))
}

#[test]
fn sub_pixel_x_integer_rest_scenario() {
    // Original rectangle (x=10.3, y=0, width=0, height=0), factor 1:
    // y/width/height are integer-aligned and pass through; x lands in
    // [10.295, 10.305).
    let host = host(1);
    let op = tracked_operation("getBoundingClientRect").unwrap();

    let rect = TrackedRect::read_only(10.3, 0.0, 0.0, 0.0);
    host.invoke(op, scripted_rects(vec![Rc::clone(&rect)]), &[]);

    let x = host.read(&rect, RectProperty::X).unwrap();
    assert_ne!(x, 10.3);
    assert!((10.295..10.305).contains(&x));
    assert_eq!(host.read(&rect, RectProperty::Y).unwrap(), 0.0);
    assert_eq!(host.read(&rect, RectProperty::Width).unwrap(), 0.0);
    assert_eq!(host.read(&rect, RectProperty::Height).unwrap(), 0.0);

    // A second rectangle elsewhere with the same x yields the identical
    // faked x.
    let other = TrackedRect::read_only(10.3, 2.0, 6.0, 6.0);
    host.invoke(op, scripted_rects(vec![Rc::clone(&other)]), &[]);
    assert_eq!(host.read(&other, RectProperty::X).unwrap(), x);
}

#[test]
fn client_rect_list_members_fake_consistently() {
    let host = host(1);
    let op = tracked_operation("getClientRects").unwrap();

    let rects = vec![
        TrackedRect::read_only(10.3, 0.0, 100.0, 20.0),
        TrackedRect::read_only(10.3, 20.0, 100.0, 20.0),
    ];
    let result = host.invoke(op, scripted_rects(rects.clone()), &[]);
    assert_eq!(result.len(), 2);

    // Shared x across list members stays shared after faking.
    let x0 = host.read(&rects[0], RectProperty::X).unwrap();
    let x1 = host.read(&rects[1], RectProperty::X).unwrap();
    assert_eq!(x0, x1);
}

#[test]
fn cross_read_consistency_per_instance() {
    let host = host(1);
    let rect = TrackedRect::mutable(10.3, 4.7, 3.14, 9.81);
    host.register(&rect);

    let x_before = host.read(&rect, RectProperty::X).unwrap();
    let _w = host.read(&rect, RectProperty::Width).unwrap();
    let x_after = host.read(&rect, RectProperty::X).unwrap();
    assert_eq!(x_before, x_after);

    // One notification despite three resolving reads.
    assert_eq!(host.notifications(), ["fakedDOMRectReadout"]);
}

#[test]
fn write_materializes_and_ends_faking() {
    let host = host(1);
    let rect = TrackedRect::mutable(10.3, 4.7, 3.14, 9.81);
    host.register(&rect);

    let fy = host.read(&rect, RectProperty::Y).unwrap();
    let fw = host.read(&rect, RectProperty::Width).unwrap();
    let fh = host.read(&rect, RectProperty::Height).unwrap();

    host.write(&rect, RectProperty::X, 42.0).unwrap();

    assert_eq!(host.read(&rect, RectProperty::X).unwrap(), 42.0);
    assert_eq!(host.read(&rect, RectProperty::Y).unwrap(), fy);
    assert_eq!(host.read(&rect, RectProperty::Width).unwrap(), fw);
    assert_eq!(host.read(&rect, RectProperty::Height).unwrap(), fh);

    // Later writes go straight to the raw store.
    host.write(&rect, RectProperty::Width, 1.25).unwrap();
    assert_eq!(rect.snapshot().width, 1.25);
    assert_eq!(host.read(&rect, RectProperty::Width).unwrap(), 1.25);
}

#[test]
fn contexts_share_scalar_caches_but_not_streams() {
    let fixture = SeedFixture::new("e2e_ctx", 0xc0ffee);
    let engine = Rc::new(SpoofEngine::with_supply(fixture.supply()));
    let host_a = shared_host(&engine, 1);
    let host_b = shared_host(&engine, 2);

    let a = TrackedRect::read_only(10.3, 0.0, 0.0, 0.0);
    let b = TrackedRect::read_only(0.0, 0.0, 10.3, 0.0);
    host_a.register(&a);
    host_b.register(&b);

    let ax = host_a.read(&a, RectProperty::X).unwrap();
    let bw = host_b.read(&b, RectProperty::Width).unwrap();

    // Same raw number: slot-0 cache would make a second x identical, but
    // width lives in slot 2 with its own cache and draw.
    assert_ne!(ax, bw);

    let b2 = TrackedRect::read_only(10.3, 1.0, 1.0, 1.0);
    host_b.register(&b2);
    assert_eq!(host_b.read(&b2, RectProperty::X).unwrap(), ax);
}

#[test]
fn intersection_entry_rects_register_on_access() {
    let host = host(1);
    let entry = tracked_property("intersectionRect").unwrap();
    let wrapped = entry.rect_source_factory(host.engine()).unwrap();

    let rect = TrackedRect::read_only(33.4, 5.0, 10.0, 10.0);
    let original = Rc::clone(&rect);
    let call = host.call_context(Rc::new(move |_args: &[f64]| vec![Rc::clone(&original)]));

    let produced = wrapped(&call, &[]);
    assert!(Rc::ptr_eq(&produced[0], &rect));

    // Subsequent reads fake like any registered rectangle.
    let x = host.read(&rect, RectProperty::X).unwrap();
    assert!((x - 33.4).abs() <= 0.005);
    assert_ne!(x, 33.4);
}

#[test]
fn dropped_rects_leave_no_registration_behind() {
    let host = host(1);
    let rect = TrackedRect::read_only(10.3, 0.0, 0.0, 0.0);
    host.register(&rect);
    drop(rect);

    host.engine().registry().prune();
    assert!(host.engine().registry().is_empty());
}
