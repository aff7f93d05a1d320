use opencv::{
    core::{self, Mat, Scalar, Size, Vec4i, Vector, CV_8UC1},
    imgproc,
    prelude::*,
};
use opencv::core::AlgorithmHint::ALGO_HINT_DEFAULT;
use std::f64::consts::PI;

use crate::centerline::CenterlinePolicy;
use crate::error::LaneResult;
use crate::roi::RegionOfInterest;
use crate::segment::{LineSegment, LineSet};

/// 선분 검출 단계의 조정값
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorParams {
    /// 가우시안 블러 커널 크기 (홀수)
    pub blur_kernel: i32,
    /// 가우시안 블러 뒤에 적용할 미디언 블러 커널 크기
    pub median_kernel: Option<i32>,
    pub canny_low: f64,
    pub canny_high: f64,
    pub roi: RegionOfInterest,
    pub hough_rho: f64,
    pub hough_theta: f64,
    pub hough_threshold: i32,
    pub min_line_length: f64,
    pub max_line_gap: f64,
}

impl DetectorParams {
    /// 정책별 기본값.
    ///
    /// - `PairwiseAverage`: 강한 블러(15x15 + 미디언 5), 중앙 350x350 ROI, 짧은 선분 간격(15)
    /// - `ExtremeSlopePair`: 약한 블러(5x5), 화면 가운데 절반 ROI, 긴 선분 간격(100)
    pub fn for_policy(policy: CenterlinePolicy) -> Self {
        match policy {
            CenterlinePolicy::PairwiseAverage => Self {
                blur_kernel: 15,
                median_kernel: Some(5),
                canny_low: 100.0,
                canny_high: 20.0,
                roi: RegionOfInterest::Centered { width: 350, height: 350 },
                hough_rho: 1.0,
                hough_theta: PI / 180.0,
                hough_threshold: 100,
                min_line_length: 10.0,
                max_line_gap: 15.0,
            },
            CenterlinePolicy::ExtremeSlopePair => Self {
                blur_kernel: 5,
                median_kernel: None,
                canny_low: 50.0,
                canny_high: 150.0,
                roi: RegionOfInterest::Fractional { start: 0.25, end: 0.75 },
                hough_rho: 2.0,
                hough_theta: PI / 180.0,
                hough_threshold: 100,
                min_line_length: 10.0,
                max_line_gap: 100.0,
            },
        }
    }
}

/// BGR 프레임에서 직선 선분을 뽑아내는 검출기입니다.
///
/// 그레이 변환 → 가우시안 블러 → (미디언 블러) → 캐니 엣지 → ROI 마스크 → 확률적 허프 변환
pub struct LineDetector {
    params: DetectorParams,
}

impl LineDetector {
    /// 주어진 조정값으로 검출기를 만듭니다.
    ///
    /// # 인자
    /// * `params` - 블러/캐니/ROI/허프 조정값 (`DetectorParams::for_policy` 참고)
    pub fn new(params: DetectorParams) -> Self {
        Self { params }
    }

    /// 검출기가 사용하는 조정값
    ///
    /// # 반환
    /// * ROI 외곽선을 그릴 때도 쓰는 `DetectorParams` 참조
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// 한 프레임에 대한 전체 검출 과정입니다.
    ///
    /// # 인자
    /// * `frame` - BGR 색상 영상
    ///
    /// # 반환
    /// * 검출된 선분 목록 (없으면 빈 벡터)
    pub fn detect(&self, frame: &Mat) -> LaneResult<LineSet> {
        let gray = self.gray_scale(frame)?;
        let blur = self.noise_removal(&gray)?;
        let edges = self.edge_detection(&blur)?;
        let masked = self.roi(&edges)?;
        self.hough_lines(&masked)
    }

    fn gray_scale(&self, img: &Mat) -> LaneResult<Mat> {
        let mut gray = Mat::default();
        imgproc::cvt_color(img, &mut gray, imgproc::COLOR_BGR2GRAY, 0, ALGO_HINT_DEFAULT)?;
        Ok(gray)
    }

    /// 가우시안 블러, 설정된 경우 미디언 블러까지 적용합니다.
    fn noise_removal(&self, img: &Mat) -> LaneResult<Mat> {
        let k = self.params.blur_kernel;
        let mut dst = Mat::default();
        imgproc::gaussian_blur(
            img,
            &mut dst,
            Size::new(k, k),
            0.0,
            0.0,
            core::BORDER_DEFAULT,
            ALGO_HINT_DEFAULT
        )?;

        if let Some(ksize) = self.params.median_kernel {
            let mut median = Mat::default();
            imgproc::median_blur(&dst, &mut median, ksize)?;
            return Ok(median);
        }
        Ok(dst)
    }

    fn edge_detection(&self, img: &Mat) -> LaneResult<Mat> {
        let mut edges = Mat::default();
        imgproc::canny(
            img,
            &mut edges,
            self.params.canny_low,
            self.params.canny_high,
            3,
            false
        )?;
        Ok(edges)
    }

    /// ROI 사각형 안쪽만 남기고 나머지 엣지를 지웁니다.
    fn roi(&self, img: &Mat) -> LaneResult<Mat> {
        let mut mask = Mat::zeros(img.rows(), img.cols(), CV_8UC1)?.to_mat()?;
        let rect = self.params.roi.rect(img.cols(), img.rows());
        imgproc::rectangle(
            &mut mask,
            rect,
            Scalar::all(255.0),
            imgproc::FILLED,
            imgproc::LINE_8,
            0,
        )?;

        let mut masked_img = Mat::default();
        core::bitwise_and(img, img, &mut masked_img, &mask)?;
        Ok(masked_img)
    }

    fn hough_lines(&self, edges: &Mat) -> LaneResult<LineSet> {
        let mut lines: Vector<Vec4i> = Vector::new();
        imgproc::hough_lines_p(
            edges,
            &mut lines,
            self.params.hough_rho,
            self.params.hough_theta,
            self.params.hough_threshold,
            self.params.min_line_length,
            self.params.max_line_gap,
        )?;
        Ok(lines.iter().map(LineSegment::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_by_policy() {
        let sweep = DetectorParams::for_policy(CenterlinePolicy::PairwiseAverage);
        let steer = DetectorParams::for_policy(CenterlinePolicy::ExtremeSlopePair);
        assert_eq!(sweep.hough_rho, 1.0);
        assert_eq!(steer.hough_rho, 2.0);
        assert_eq!(sweep.hough_threshold, steer.hough_threshold);
        assert!((sweep.hough_theta - 0.017453292519943295).abs() < 1e-15);
    }

    #[test]
    fn blank_frame_has_no_lines() {
        let frame = Mat::new_rows_cols_with_default(
            240,
            320,
            core::CV_8UC3,
            Scalar::all(0.0),
        )
        .unwrap();
        let detector =
            LineDetector::new(DetectorParams::for_policy(CenterlinePolicy::ExtremeSlopePair));
        assert!(detector.detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn detects_a_bright_diagonal_inside_roi() {
        let mut frame = Mat::new_rows_cols_with_default(
            480,
            640,
            core::CV_8UC3,
            Scalar::all(0.0),
        )
        .unwrap();
        imgproc::line(
            &mut frame,
            core::Point::new(200, 350),
            core::Point::new(440, 130),
            Scalar::all(255.0),
            6,
            imgproc::LINE_8,
            0,
        )
        .unwrap();

        let detector =
            LineDetector::new(DetectorParams::for_policy(CenterlinePolicy::ExtremeSlopePair));
        let lines = detector.detect(&frame).unwrap();
        assert!(!lines.is_empty());
        let rect = detector.params().roi.rect(640, 480);
        for line in &lines {
            assert!(rect.contains(line.start()) && rect.contains(line.end()));
            let slope = line.slope().unwrap();
            assert!(slope < 0.0);
        }
    }
}
