use opencv::{
    core::{self, Mat, Scalar},
    imgproc,
    prelude::*,
};

use crate::centerline::CenterlinePolicy;
use crate::error::LaneResult;
use crate::roi::RegionOfInterest;
use crate::segment::LineSegment;

/// 오버레이를 그리는 방식
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compositing {
    /// 원본 프레임 위에 바로 그림
    Direct,
    /// 별도 레이어에 그린 뒤 `addWeighted(frame, 0.8, layer, 1.0, 1.0)`로 합성
    Blended,
}

/// 색상/두께 설정 (BGR)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    pub roi_color: Scalar,
    pub roi_thickness: i32,
    pub line_color: Scalar,
    pub centerline_color: Scalar,
    pub thickness: i32,
    pub compositing: Compositing,
}

impl OverlayStyle {
    pub fn for_policy(policy: CenterlinePolicy) -> Self {
        match policy {
            CenterlinePolicy::PairwiseAverage => Self {
                roi_color: Scalar::new(255.0, 0.0, 0.0, 0.0),
                roi_thickness: 5,
                line_color: Scalar::new(0.0, 255.0, 0.0, 0.0),
                centerline_color: Scalar::new(0.0, 0.0, 255.0, 0.0),
                thickness: 10,
                compositing: Compositing::Direct,
            },
            CenterlinePolicy::ExtremeSlopePair => Self {
                roi_color: Scalar::new(0.0, 255.0, 255.0, 0.0),
                roi_thickness: 2,
                line_color: Scalar::new(255.0, 0.0, 0.0, 0.0),
                centerline_color: Scalar::new(0.0, 255.0, 0.0, 0.0),
                thickness: 10,
                compositing: Compositing::Blended,
            },
        }
    }
}

/// ROI 외곽선, 검출된 선분, 중심선을 프레임에 합성합니다.
///
/// # 인자
/// * `frame` - 원본 BGR 프레임 (ROI 외곽선은 항상 이 위에 직접 그려짐)
/// * `roi` - 외곽선을 그릴 관심영역
/// * `lines` - 검출된 선분
/// * `centerlines` - 추정된 중심선 (0개 이상)
///
/// # 반환
/// * 화면에 표시할 최종 영상
pub fn compose(
    style: &OverlayStyle,
    frame: &mut Mat,
    roi: &RegionOfInterest,
    lines: &[LineSegment],
    centerlines: &[LineSegment],
) -> LaneResult<Mat> {
    let (tl, br) = roi.corners(frame.cols(), frame.rows());
    imgproc::rectangle_points(
        frame,
        tl,
        br,
        style.roi_color,
        style.roi_thickness,
        imgproc::LINE_8,
        0,
    )?;

    match style.compositing {
        Compositing::Direct => {
            draw_segments(frame, lines, style.line_color, style.thickness)?;
            draw_segments(frame, centerlines, style.centerline_color, style.thickness)?;
            Ok(frame.clone())
        }
        Compositing::Blended => {
            let mut line_image = blank_like(frame)?;
            draw_segments(&mut line_image, lines, style.line_color, style.thickness)?;
            let mut center_image = blank_like(frame)?;
            draw_segments(&mut center_image, centerlines, style.centerline_color, style.thickness)?;

            let combo = blend(frame, &line_image)?;
            blend(&combo, &center_image)
        }
    }
}

fn draw_segments(
    img: &mut Mat,
    segments: &[LineSegment],
    color: Scalar,
    thickness: i32,
) -> LaneResult<()> {
    for seg in segments {
        imgproc::line(
            img,
            seg.start(),
            seg.end(),
            color,
            thickness,
            imgproc::LINE_8,
            0
        )?;
    }
    Ok(())
}

fn blank_like(img: &Mat) -> LaneResult<Mat> {
    Ok(Mat::zeros(img.rows(), img.cols(), img.typ())?.to_mat()?)
}

fn blend(base: &Mat, layer: &Mat) -> LaneResult<Mat> {
    let mut dst = Mat::default();
    core::add_weighted(base, 0.8, layer, 1.0, 1.0, &mut dst, -1)?;
    Ok(dst)
}
