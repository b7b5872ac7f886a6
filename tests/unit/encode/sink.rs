use super::*;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 1,
        fps: Fps::new(30, 1).unwrap(),
        audio: None,
    }
}

fn frame(v: u8) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![v; 8],
    }
}

#[test]
fn captures_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(3), &frame(1)).unwrap();
    sink.push_frame(FrameIndex(4), &frame(2)).unwrap();
    sink.end().unwrap();

    assert!(sink.is_finished());
    assert_eq!(sink.config(), Some(&cfg()));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![3, 4]);
    assert_eq!(sink.into_frames()[1].1.data, vec![2; 8]);
}

#[test]
fn rejects_out_of_order_and_duplicate_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(5), &frame(0)).unwrap();
    assert!(sink.push_frame(FrameIndex(5), &frame(0)).is_err());
    assert!(sink.push_frame(FrameIndex(2), &frame(0)).is_err());
}

#[test]
fn rejects_wrong_size_and_push_before_begin() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame(0)).is_err());
    sink.begin(cfg()).unwrap();
    let wrong = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![0; 4],
    };
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &wrong),
        Err(ReelError::Validation(_))
    ));
}

#[test]
fn begin_resets_previous_capture() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(0)).unwrap();
    sink.end().unwrap();
    sink.begin(cfg()).unwrap();
    assert!(sink.frames().is_empty());
    assert!(!sink.is_finished());
}
