use std::path::PathBuf;

use opencv::core::{Mat, Point, Scalar, Size, CV_8UC3};
use opencv::prelude::*;
use opencv::{imgproc, videoio};

pub const WIDTH: i32 = 640;
pub const HEIGHT: i32 = 480;

/// Black frame with two bright lane edges converging towards the top.
pub fn road_frame() -> Mat {
    let mut frame = Mat::new_rows_cols_with_default(HEIGHT, WIDTH, CV_8UC3, Scalar::all(0.0))
        .expect("allocate frame");
    for (p1, p2) in [
        (Point::new(180, 350), Point::new(300, 130)),
        (Point::new(460, 350), Point::new(340, 130)),
    ] {
        imgproc::line(&mut frame, p1, p2, Scalar::all(255.0), 6, imgproc::LINE_8, 0)
            .expect("draw lane edge");
    }
    frame
}

/// Writes `count` road frames to an MJPG `.avi` in the temp directory and returns its path.
pub fn write_road_video(name: &str, count: usize) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "lane_centerline_{}_{}.avi",
        name,
        std::process::id()
    ));
    let fourcc = videoio::VideoWriter::fourcc('M', 'J', 'P', 'G').expect("fourcc");
    let mut writer = videoio::VideoWriter::new(
        path.to_str().expect("utf-8 temp path"),
        fourcc,
        10.0,
        Size::new(WIDTH, HEIGHT),
        true,
    )
    .expect("create video writer");
    assert!(writer.is_opened().expect("writer state"), "MJPG writer unavailable");

    let frame = road_frame();
    for _ in 0..count {
        writer.write(&frame).expect("write frame");
    }
    writer.release().expect("close writer");
    path
}
