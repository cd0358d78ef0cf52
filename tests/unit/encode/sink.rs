use super::*;
use crate::foundation::error::ErrorKind;

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig {
        resolution: Resolution::new(w, h),
        fps: Fps::integer(30).unwrap(),
    }
}

fn frame(w: u32, h: u32) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: vec![7u8; (w * h * 4) as usize],
    }
}

#[test]
fn in_memory_sink_captures_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 2)).unwrap();
    let mut a = frame(2, 2);
    a.data[0] = 1;
    let mut b = frame(2, 2);
    b.data[0] = 2;
    sink.append(&a).unwrap();
    sink.append(&b).unwrap();
    sink.finalize().unwrap();

    assert_eq!(sink.frames_written(), 2);
    assert_eq!(sink.frames()[0].data[0], 1);
    assert_eq!(sink.frames()[1].data[0], 2);
    assert!(sink.is_finalized());
    assert_eq!(sink.config(), Some(cfg(2, 2)));
}

#[test]
fn mismatched_frames_are_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(4, 2)).unwrap();
    let err = sink.append(&frame(2, 4)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoder);
    assert!(err.to_string().contains("got 2x4, expected 4x2"));

    let mut short = frame(4, 2);
    short.data.pop();
    assert!(sink.append(&short).is_err());
    assert_eq!(sink.frames_written(), 0);
}

#[test]
fn lifecycle_is_enforced() {
    let mut sink = InMemorySink::new();
    assert!(sink.append(&frame(2, 2)).is_err());
    assert!(sink.finalize().is_err());

    sink.begin(cfg(2, 2)).unwrap();
    sink.finalize().unwrap();
    assert!(sink.finalize().is_err());
    assert!(sink.append(&frame(2, 2)).is_err());
}
