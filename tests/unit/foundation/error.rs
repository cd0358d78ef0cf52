use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StillreelError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        StillreelError::encoder("x")
            .to_string()
            .contains("encoder error:")
    );
    assert!(
        StillreelError::decode("a.png", "bad header")
            .to_string()
            .contains("decode error: 'a.png': bad header")
    );
    assert!(
        StillreelError::NoImages {
            folder: PathBuf::from("in")
        }
        .to_string()
        .contains("no images:")
    );
    assert!(
        StillreelError::AllFramesFailed {
            output_path: PathBuf::from("out/output_video.mp4"),
            skipped: 3,
        }
        .to_string()
        .contains("no frames written: all 3 image(s)")
    );
}

#[test]
fn folder_errors_classify_as_config() {
    let err = StillreelError::Folder {
        path: PathBuf::from("missing"),
        reason: "not found".to_string(),
    };
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("'missing'"));
}

#[test]
fn only_decode_errors_are_recoverable() {
    assert!(!StillreelError::decode("a.png", "x").is_fatal());
    assert!(StillreelError::config("x").is_fatal());
    assert!(StillreelError::encoder("x").is_fatal());
    assert!(
        StillreelError::AllFramesFailed {
            output_path: PathBuf::from("o.mp4"),
            skipped: 1,
        }
        .is_fatal()
    );
}

#[test]
fn kind_serializes_snake_case() {
    let s = serde_json::to_string(&ErrorKind::AllFramesFailed).unwrap();
    assert_eq!(s, "\"all_frames_failed\"");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StillreelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Other);
}

#[test]
fn finalize_failure_folds_into_encoder_errors_only() {
    let folded = StillreelError::encoder("write failed")
        .with_finalize_failure(StillreelError::encoder("ffmpeg exited with status 1"));
    assert_eq!(
        folded.to_string(),
        "encoder error: write failed; finalize also failed: ffmpeg exited with status 1"
    );

    let kept = StillreelError::config("bad").with_finalize_failure(StillreelError::encoder("x"));
    assert_eq!(kept.kind(), ErrorKind::Config);
    assert_eq!(kept.to_string(), "configuration error: bad");
}
