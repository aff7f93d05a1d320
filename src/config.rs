use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::centerline::{CenterlinePolicy, EstimatorParams};
use crate::detection::DetectorParams;
use crate::overlay::OverlayStyle;

/// 실행 옵션. 튜닝 값은 정책별 프리셋을 기본으로 하고, 지정한 항목만 덮어씁니다.
#[derive(Debug, Clone, Parser)]
#[command(name = "lane_centerline")]
#[command(about = "Detect lane edges in live video and overlay a centerline estimate")]
#[command(version)]
pub struct Config {
    /// Camera device index.
    #[arg(long, default_value_t = 0, conflicts_with = "video")]
    pub camera: i32,

    /// Read frames from a video file instead of a camera.
    #[arg(long)]
    pub video: Option<PathBuf>,

    /// Centerline policy; also selects the detector and overlay preset.
    #[arg(long, value_enum, default_value_t = PolicyArg::ExtremeSlope)]
    pub policy: PolicyArg,

    #[arg(long)]
    pub canny_low: Option<f64>,

    #[arg(long)]
    pub canny_high: Option<f64>,

    /// Accumulator threshold for the probabilistic Hough transform.
    #[arg(long)]
    pub hough_threshold: Option<i32>,

    #[arg(long)]
    pub min_line_length: Option<f64>,

    #[arg(long)]
    pub max_line_gap: Option<f64>,

    /// Segments with |slope| above this are treated as vertical.
    #[arg(long)]
    pub vertical_slope_limit: Option<f64>,

    /// Key that stops the loop.
    #[arg(long, value_enum, default_value_t = QuitKey::Q)]
    pub quit_key: QuitKey,

    /// Run without a display window.
    #[arg(long)]
    pub headless: bool,

    /// Stop after this many frames.
    #[arg(long)]
    pub max_frames: Option<u64>,

    #[arg(long)]
    pub window_title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Midpoint segment for every ordered pair of detected lines.
    Pairwise,
    /// Single centerline from the two steepest lines.
    ExtremeSlope,
}

impl From<PolicyArg> for CenterlinePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Pairwise => CenterlinePolicy::PairwiseAverage,
            PolicyArg::ExtremeSlope => CenterlinePolicy::ExtremeSlopePair,
        }
    }
}

/// 루프 종료 키
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuitKey {
    /// 'q'
    Q,
    /// Any key press.
    Any,
    /// Only end of stream stops the loop.
    Never,
}

impl QuitKey {
    /// `highgui::wait_key` 반환값이 종료 키인지 판정합니다. 입력이 없으면 -1이 들어옵니다.
    pub fn matches(&self, key: i32) -> bool {
        if key < 0 {
            return false;
        }
        match self {
            QuitKey::Q => (key & 0xFF) == 'q' as i32,
            QuitKey::Any => true,
            QuitKey::Never => false,
        }
    }
}

impl Config {
    pub fn policy(&self) -> CenterlinePolicy {
        self.policy.into()
    }

    pub fn detector_params(&self) -> DetectorParams {
        let mut params = DetectorParams::for_policy(self.policy());
        if let Some(low) = self.canny_low {
            params.canny_low = low;
        }
        if let Some(high) = self.canny_high {
            params.canny_high = high;
        }
        if let Some(threshold) = self.hough_threshold {
            params.hough_threshold = threshold;
        }
        if let Some(len) = self.min_line_length {
            params.min_line_length = len;
        }
        if let Some(gap) = self.max_line_gap {
            params.max_line_gap = gap;
        }
        params
    }

    pub fn estimator_params(&self) -> EstimatorParams {
        let mut params = EstimatorParams::default();
        if let Some(limit) = self.vertical_slope_limit {
            params.vertical_slope_limit = limit;
        }
        params
    }

    pub fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle::for_policy(self.policy())
    }

    pub fn window_title(&self) -> String {
        match &self.window_title {
            Some(title) => title.clone(),
            None => match self.policy() {
                CenterlinePolicy::PairwiseAverage => "Detected Lines".to_string(),
                CenterlinePolicy::ExtremeSlopePair => "result".to_string(),
            },
        }
    }

    pub fn visible(&self) -> bool {
        !self.headless
    }
}
