use super::*;

#[test]
fn derived_edges_follow_dimensions() {
    let rect = Rect::ltwh(10.0, 20.0, 30.0, 40.0);
    assert_eq!(rect.right(), 40.0);
    assert_eq!(rect.bottom(), 60.0);
    assert_eq!(rect.size(), Size::new(30.0, 40.0));
}

#[test]
fn empty_when_either_dimension_is_zero() {
    assert!(Rect::ltwh(0.0, 0.0, 0.0, 10.0).is_empty());
    assert!(Rect::ltwh(0.0, 0.0, 10.0, 0.0).is_empty());
    assert!(!Rect::ltwh(0.0, 0.0, 1.0, 1.0).is_empty());
}

#[test]
fn touching_rects_overlap() {
    let viewport = Rect::ltwh(0.0, 0.0, 100.0, 100.0);
    assert!(viewport.overlaps(&Rect::ltwh(0.0, 100.0, 100.0, 100.0)));
    assert!(!viewport.overlaps(&Rect::ltwh(0.0, 101.0, 100.0, 100.0)));
    assert!(!viewport.overlaps(&Rect::ltwh(101.0, 0.0, 10.0, 10.0)));
}

#[test]
fn collapsed_keeps_position() {
    let rect = Rect::ltwh(5.0, 6.0, 7.0, 8.0).collapsed();
    assert_eq!(rect, Rect::ltwh(5.0, 6.0, 0.0, 0.0));
}

#[test]
fn size_equality_ignores_position() {
    let a = Rect::ltwh(0.0, 0.0, 10.0, 10.0);
    assert!(a.size_equals(&a.translate(5.0, 5.0)));
    assert!(!a.size_equals(&Rect::ltwh(0.0, 0.0, 10.0, 11.0)));
}

#[test]
fn margins_track_unchanged_edges() {
    assert!(Margins::default().is_unchanged());
    let margins = Margins::vertical(4.0, 8.0);
    assert!(!margins.is_unchanged());
    assert_eq!(margins.left, None);
}
