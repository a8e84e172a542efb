use super::ResourceState;

#[test]
fn readiness_order_matches_lifecycle() {
    assert!(ResourceState::NotBuilt < ResourceState::NotLaidOut);
    assert!(ResourceState::NotLaidOut < ResourceState::ReadyForLayout);
    assert!(ResourceState::ReadyForLayout < ResourceState::LayoutScheduled);
    assert!(ResourceState::LayoutScheduled < ResourceState::LayoutComplete);
    assert!(ResourceState::LayoutComplete < ResourceState::LayoutFailed);
}

#[test]
fn layout_pending_excludes_settled_states() {
    assert!(ResourceState::NotBuilt.is_layout_pending());
    assert!(ResourceState::LayoutScheduled.is_layout_pending());
    assert!(!ResourceState::LayoutComplete.is_layout_pending());
    assert!(!ResourceState::LayoutFailed.is_layout_pending());
}

#[test]
fn started_layout_covers_scheduled_and_settled() {
    assert!(!ResourceState::ReadyForLayout.has_started_layout());
    assert!(ResourceState::LayoutScheduled.has_started_layout());
    assert!(ResourceState::LayoutFailed.has_started_layout());
    assert!(!ResourceState::NotBuilt.is_built());
}
