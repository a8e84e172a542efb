//! Pause/resume, unlayout, collapse/expand, viewport visibility, size changes
//! and disconnection.

use std::rc::Rc;
use warden_core::{Margins, NodeId, Rect, Resource, ResourceState, SizeChange};
use warden_testing::prelude::*;

const VIEWPORT: Rect = Rect::ltwh(0.0, 0.0, 100.0, 100.0);
const ITEM_BOX: Rect = Rect::ltwh(0.0, 10.0, 50.0, 20.0);

fn laid_out(harness: &TestHost, item: &Rc<FakeItem>) -> Resource {
    let resource = harness.add_item(item, None);
    resource.build(true);
    expect_ready(&mut resource.start_layout().expect("ready")).expect("layout succeeds");
    resource
}

#[test]
fn viewport_notification_only_fires_on_change() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).shared();
    let resource = harness.add_item(&item, None);

    resource.set_in_viewport(true);
    resource.set_in_viewport(true);
    resource.set_in_viewport(true);
    assert_eq!(*item.viewport_events.borrow(), vec![true]);
    assert!(resource.is_in_viewport());

    resource.set_in_viewport(false);
    resource.set_in_viewport(false);
    assert_eq!(*item.viewport_events.borrow(), vec![true, false]);
}

#[test]
fn change_size_always_forwards() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).with_rect(ITEM_BOX).shared();
    let resource = harness.add_item(&item, None);
    let change = SizeChange::new(Some(120.0), None).with_margins(Margins::vertical(4.0, 0.0));

    resource.change_size(change);
    assert_eq!(resource.state(), ResourceState::NotBuilt);
    assert_eq!(*item.size_changes.borrow(), vec![change]);

    resource.build(true);
    assert_eq!(resource.state(), ResourceState::ReadyForLayout);
    resource.change_size(SizeChange::new(None, Some(30.0)));
    assert_eq!(resource.state(), ResourceState::NotLaidOut);
    assert_eq!(item.size_changes.borrow().len(), 2);
}

#[test]
fn change_size_invalidates_completed_layout() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).with_rect(ITEM_BOX).shared();
    let resource = laid_out(&harness, &item);

    resource.change_size(SizeChange::new(Some(10.0), Some(10.0)));
    assert_eq!(resource.state(), ResourceState::NotLaidOut);
}

#[test]
fn pause_requires_built_and_unpaused() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).with_rect(ITEM_BOX).shared();
    let resource = harness.add_item(&item, None);

    resource.pause();
    assert!(!resource.is_paused());
    assert_eq!(item.pause_calls.get(), 0);

    resource.build(true);
    resource.pause();
    resource.pause();
    assert!(resource.is_paused());
    assert_eq!(item.pause_calls.get(), 1);
    assert_eq!(item.unlayout_calls.get(), 0);
}

#[test]
fn pause_unlayouts_when_item_asks() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).with_rect(ITEM_BOX).shared();
    item.set_unlayout_on_pause(true);
    item.set_unlayout_result(true);
    let resource = laid_out(&harness, &item);
    resource.set_in_viewport(true);

    resource.pause();
    assert_eq!(item.unlayout_calls.get(), 1);
    assert_eq!(resource.state(), ResourceState::NotLaidOut);
    assert_eq!(*item.viewport_events.borrow(), vec![true, false]);
}

#[test]
fn pause_on_remove_leaves_viewport() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).with_rect(ITEM_BOX).shared();
    let resource = laid_out(&harness, &item);
    resource.set_in_viewport(true);

    resource.pause_on_remove();
    assert!(resource.is_paused());
    assert!(!resource.is_in_viewport());
    assert_eq!(*item.viewport_events.borrow(), vec![true, false]);
    assert_eq!(item.pause_calls.get(), 1);

    resource.pause_on_remove();
    assert_eq!(item.pause_calls.get(), 1);
}

#[test]
fn resume_only_after_pause() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).with_rect(ITEM_BOX).shared();
    let resource = laid_out(&harness, &item);

    resource.resume();
    assert_eq!(item.resume_calls.get(), 0);

    resource.pause();
    resource.resume();
    resource.resume();
    assert!(!resource.is_paused());
    assert_eq!(item.resume_calls.get(), 1);
}

#[test]
fn unlayout_ignores_unbuilt_items() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).shared();
    let resource = harness.add_item(&item, None);

    resource.unlayout();
    assert_eq!(item.unlayout_calls.get(), 0);
}

#[test]
fn unlayout_released_resets_to_not_laid_out() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).with_rect(ITEM_BOX).shared();
    item.set_unlayout_result(true);
    let resource = laid_out(&harness, &item);
    resource.set_in_viewport(true);

    resource.unlayout();
    assert_eq!(resource.state(), ResourceState::NotLaidOut);
    assert_eq!(resource.layout_count(), 0);
    assert_eq!(*item.placeholder_toggles.borrow(), vec![true]);
    assert_eq!(*item.viewport_events.borrow(), vec![true, false]);

    // The next measurement and layout are forced even without opt-in.
    resource.measure();
    assert_eq!(resource.state(), ResourceState::ReadyForLayout);
    expect_ready(&mut resource.start_layout().expect("ready")).expect("layout succeeds");
    assert_eq!(item.layout_calls.get(), 2);
}

#[test]
fn unlayout_declined_keeps_state() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).with_rect(ITEM_BOX).shared();
    let resource = laid_out(&harness, &item);

    resource.unlayout();
    assert_eq!(item.unlayout_calls.get(), 1);
    assert_eq!(resource.state(), ResourceState::LayoutComplete);
    assert!(item.placeholder_toggles.borrow().is_empty());
}

#[test]
fn collapse_hides_and_notifies_owner() {
    let harness = TestHost::new(VIEWPORT);
    let owner = FakeItem::new(NodeId(1)).shared();
    harness.add_item(&owner, None);
    let child = FakeItem::new(NodeId(2)).with_rect(ITEM_BOX).shared();
    let resource = harness.add_item(&child, Some(NodeId(1)));
    harness
        .host
        .set_owner(NodeId(2), NodeId(1))
        .expect("owner contains child");
    resource.build(true);

    resource.complete_collapse();
    assert_eq!(*child.visibility.borrow(), vec![false]);
    assert_eq!(resource.layout_box(), Rect::ltwh(0.0, 10.0, 0.0, 0.0));
    assert!(!resource.is_fixed());
    assert_eq!(
        child.last_layout_box(),
        Some((Rect::ltwh(0.0, 10.0, 0.0, 0.0), true))
    );
    assert_eq!(*owner.collapsed_children.borrow(), vec![NodeId(2)]);
}

#[test]
fn collapse_without_owner_only_hides() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).with_rect(ITEM_BOX).shared();
    let resource = harness.add_item(&item, None);
    resource.build(true);

    resource.complete_collapse();
    assert_eq!(*item.visibility.borrow(), vec![false]);
    assert!(!resource.is_displayed());
}

#[test]
fn expand_reveals_and_requests_measure() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).with_rect(ITEM_BOX).shared();
    let resource = laid_out(&harness, &item);
    resource.complete_collapse();

    resource.complete_expand();
    assert_eq!(*item.visibility.borrow(), vec![false, true]);
    assert!(resource.is_measure_requested());
    assert_eq!(resource.layout_box(), Rect::ltwh(0.0, 10.0, 0.0, 0.0));
}

#[test]
fn disconnect_is_idempotent_and_untracks() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).shared();
    let resource = harness.add_item(&item, None);
    assert!(harness.host.resource_for(NodeId(1)).is_some());

    resource.disconnect();
    resource.disconnect();
    assert_eq!(item.disconnect_calls.get(), 1);
    assert!(resource.is_disconnected());
    assert!(harness.host.resource_for(NodeId(1)).is_none());
    assert!(harness.host.is_empty());
}

#[test]
fn priority_and_identifiers() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1))
        .with_tag("amp-img")
        .with_priority(2)
        .shared();
    let resource = harness.add_item(&item, None);

    assert_eq!(resource.priority(), 2);
    resource.update_priority(5);
    assert_eq!(resource.priority(), 5);
    assert_eq!(resource.debug_id(), format!("amp-img#{}", resource.id()));
    assert_eq!(
        resource.task_id("layout"),
        format!("amp-img#{}#layout", resource.id())
    );
}

#[test]
fn host_lists_resources_in_registration_order() {
    let harness = TestHost::new(VIEWPORT);
    let ids: Vec<_> = (1..=3)
        .rev()
        .map(|n| harness.add_item(&FakeItem::new(NodeId(n)).shared(), None).id())
        .collect();
    let listed: Vec<_> = harness.host.resources().iter().map(|r| r.id()).collect();
    let mut expected = ids;
    expected.sort();
    assert_eq!(listed, expected);
}

#[test]
fn unlayout_before_layout_does_nothing() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).already_built().shared();
    item.set_unlayout_result(true);
    let resource = harness.add_item(&item, None);
    assert_eq!(resource.state(), ResourceState::NotLaidOut);
    resource.set_in_viewport(true);

    resource.unlayout();
    assert_eq!(item.unlayout_calls.get(), 0);
    assert!(item.placeholder_toggles.borrow().is_empty());
    assert_eq!(*item.viewport_events.borrow(), vec![true]);
    assert!(resource.is_in_viewport());
}

#[test]
fn waiting_for_build_after_disconnect_is_cancelled() {
    let harness = TestHost::new(VIEWPORT);
    let item = FakeItem::new(NodeId(1)).shared();
    let resource = harness.add_item(&item, None);
    let before = resource.when_built();

    resource.disconnect();
    assert!(before.is_cancelled());
    assert!(resource.when_built().is_cancelled());
}
