use super::*;

#[test]
fn phases_follow_half_open_window() {
    let w = ItemWindow::new(30, 60);
    assert_eq!(w.phase(FrameIndex(29)), ItemPhase::NotYetActive);
    assert_eq!(w.phase(FrameIndex(30)), ItemPhase::Active);
    assert_eq!(w.phase(FrameIndex(89)), ItemPhase::Active);
    assert_eq!(w.phase(FrameIndex(90)), ItemPhase::Finished);
    assert_eq!(w.local_frame(FrameIndex(30)), Some(0));
    assert_eq!(w.local_frame(FrameIndex(89)), Some(59));
    assert_eq!(w.local_frame(FrameIndex(90)), None);
}

#[test]
fn non_positive_duration_is_never_active() {
    for d in [0, -5] {
        let w = ItemWindow::new(10, d);
        assert_eq!(w.duration_frames, 0);
        assert_eq!(w.phase(FrameIndex(9)), ItemPhase::NotYetActive);
        assert_eq!(w.phase(FrameIndex(10)), ItemPhase::Finished);
    }
}
