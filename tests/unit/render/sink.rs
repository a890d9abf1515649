use super::*;

fn frame(value: u8) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: vec![value; 16],
        premultiplied: true,
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::default(),
    }
}

#[test]
fn in_memory_sink_keeps_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(0, &frame(1)).unwrap();
    sink.push_frame(1, &frame(2)).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.config(), Some(cfg()));
    let ticks: Vec<u64> = sink.frames().iter().map(|(t, _)| *t).collect();
    assert_eq!(ticks, vec![0, 1]);
    assert_eq!(sink.frames()[1].1.data[0], 2);
    assert!(sink.ended());
}

#[test]
fn png_sink_writes_latest_frame_on_end() {
    let dir = PathBuf::from("target").join("png_sink_end");
    let path = dir.join("snap.png");
    let _ = std::fs::remove_file(&path);

    let mut sink = PngSnapshotSink::new(&path, 0);
    sink.begin(cfg()).unwrap();
    sink.push_frame(0, &frame(10)).unwrap();
    sink.push_frame(1, &frame(255)).unwrap();
    assert!(!path.exists());
    sink.end().unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 2));
    assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255, 255]);
}

#[test]
fn png_sink_writes_periodically() {
    let dir = PathBuf::from("target").join("png_sink_every");
    let path = dir.join("snap.png");
    let _ = std::fs::remove_file(&path);

    let mut sink = PngSnapshotSink::new(&path, 5);
    sink.begin(cfg()).unwrap();
    sink.push_frame(1, &frame(255)).unwrap();
    assert!(!path.exists());
    sink.push_frame(5, &frame(255)).unwrap();
    assert!(path.exists());
}
