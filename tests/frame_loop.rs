mod common;

use clap::Parser;
use common::synthetic_video::{write_road_video, HEIGHT, WIDTH};
use lane_centerline::capture::{FrameSource, SourceSpec};
use lane_centerline::config::Config;
use lane_centerline::{Pipeline, StopReason};
use opencv::prelude::*;

fn headless(extra: &[&str]) -> Config {
    let mut args = vec!["lane_centerline", "--headless"];
    args.extend_from_slice(extra);
    Config::try_parse_from(args).unwrap()
}

#[test]
fn reads_every_frame_then_reports_end_of_stream() {
    let path = write_road_video("read_all", 4);
    let mut source = FrameSource::open(SourceSpec::File(path.clone())).unwrap();

    let mut frames = 0;
    while let Some(frame) = source.next_frame().unwrap() {
        assert_eq!(frame.cols(), WIDTH);
        assert_eq!(frame.rows(), HEIGHT);
        frames += 1;
    }
    assert_eq!(frames, 4);
    assert!(source.next_frame().unwrap().is_none());

    drop(source);
    let _ = std::fs::remove_file(path);
}

#[test]
fn loop_runs_to_end_of_stream() {
    let path = write_road_video("end_of_stream", 3);
    let mut source = FrameSource::open(SourceSpec::File(path.clone())).unwrap();

    let pipeline = Pipeline::new(&headless(&[]));
    let reason = pipeline.start_detection(&mut source).unwrap();
    assert_eq!(reason, StopReason::EndOfStream);

    source.release().unwrap();
    let _ = std::fs::remove_file(path);
}

#[test]
fn loop_stops_at_frame_limit() {
    let path = write_road_video("frame_limit", 5);
    let mut source = FrameSource::open(SourceSpec::File(path.clone())).unwrap();

    let pipeline = Pipeline::new(&headless(&["--max-frames", "2"]));
    let reason = pipeline.start_detection(&mut source).unwrap();
    assert_eq!(reason, StopReason::FrameLimit);
    // 한도에서 멈췄으므로 남은 프레임은 그대로 읽을 수 있어야 함
    assert!(source.next_frame().unwrap().is_some());

    source.release().unwrap();
    let _ = std::fs::remove_file(path);
}

#[test]
fn release_is_idempotent_and_ends_reads() {
    let path = write_road_video("release", 3);
    let mut source = FrameSource::open(SourceSpec::File(path.clone())).unwrap();
    assert!(source.next_frame().unwrap().is_some());

    source.release().unwrap();
    source.release().unwrap();
    assert!(source.next_frame().unwrap().is_none());

    let pipeline = Pipeline::new(&headless(&[]));
    assert_eq!(pipeline.start_detection(&mut source).unwrap(), StopReason::EndOfStream);

    drop(source);
    let _ = std::fs::remove_file(path);
}
