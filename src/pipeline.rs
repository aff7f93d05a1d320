use std::time::{Duration, Instant};

use opencv::{core::Mat, highgui, prelude::*};
use tracing::{debug, info, trace};

use crate::capture::FrameSource;
use crate::centerline::{self, CenterlineEstimate, CenterlinePolicy, EstimatorParams};
use crate::config::{Config, QuitKey};
use crate::detection::LineDetector;
use crate::error::LaneResult;
use crate::overlay::{self, OverlayStyle};

/// 한 프레임 처리 결과
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub line_count: usize,
    pub estimate: CenterlineEstimate,
    pub elapsed: Duration,
}

/// 루프가 끝난 이유
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    QuitKey,
    FrameLimit,
}

/// 중심선 검출 파이프라인.
///
/// 프레임마다 선분 검출 → 중심선 추정 → 오버레이 합성을 수행합니다.
/// 프레임 사이에 유지하는 상태는 없고, 캡처 장치는 호출자가 소유합니다.
pub struct Pipeline {
    detector: LineDetector,
    policy: CenterlinePolicy,
    estimator: EstimatorParams,
    style: OverlayStyle,

    quit_key: QuitKey,
    max_frames: Option<u64>,
    window_title: String,
    visible: bool,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            detector: LineDetector::new(config.detector_params()),
            policy: config.policy(),
            estimator: config.estimator_params(),
            style: config.overlay_style(),
            quit_key: config.quit_key,
            max_frames: config.max_frames,
            window_title: config.window_title(),
            visible: config.visible(),
        }
    }

    /// 단일 프레임에 대한 전체 처리 과정입니다.
    ///
    /// 1) 선분 검출 (그레이, 블러, 캐니, ROI, 허프)
    /// 2) 중심선 추정
    /// 3) ROI/선분/중심선 오버레이
    ///
    /// 중심선을 계산할 수 없는 경우는 `FrameReport::estimate`에 담길 뿐 에러가 아닙니다.
    ///
    /// # 반환
    /// * (표시할 영상, 프레임 보고)
    pub fn processing(&self, frame: &mut Mat) -> LaneResult<(Mat, FrameReport)> {
        let start_time = Instant::now();

        let lines = self.detector.detect(frame)?;
        let estimate = centerline::estimate(self.policy, &lines, frame.rows(), &self.estimator);

        match &estimate {
            CenterlineEstimate::Single(Err(reason)) => trace!(%reason, "no centerline this frame"),
            CenterlineEstimate::Single(Ok(c)) => {
                trace!(slope = c.slope, intercept = c.intercept, "centerline estimated")
            }
            CenterlineEstimate::Pairwise(midlines) => {
                trace!(count = midlines.len(), "pairwise midlines")
            }
        }

        let output = overlay::compose(
            &self.style,
            frame,
            &self.detector.params().roi,
            &lines,
            estimate.segments(),
        )?;

        Ok((
            output,
            FrameReport {
                line_count: lines.len(),
                estimate,
                elapsed: start_time.elapsed(),
            },
        ))
    }

    /// 프레임 소스가 끝나거나 종료 키가 눌릴 때까지 검출 루프를 수행합니다.
    ///
    /// 화면 표시 모드에서는 매 프레임 `wait_key(1)`로 키 입력을 확인하고,
    /// 루프를 빠져나오면 창을 모두 닫습니다.
    pub fn start_detection(&self, source: &mut FrameSource) -> LaneResult<StopReason> {
        if self.visible {
            highgui::named_window(&self.window_title, highgui::WINDOW_AUTOSIZE)?;
        }

        let result = self.run_loop(source);

        if self.visible {
            highgui::destroy_all_windows()?;
        }
        result
    }

    fn run_loop(&self, source: &mut FrameSource) -> LaneResult<StopReason> {
        let mut frames: u64 = 0;
        let mut centerlines: u64 = 0;

        let reason = loop {
            if let Some(limit) = self.max_frames {
                if frames >= limit {
                    break StopReason::FrameLimit;
                }
            }

            let mut frame = match source.next_frame()? {
                Some(frame) => frame,
                None => break StopReason::EndOfStream,
            };

            let (output, report) = self.processing(&mut frame)?;
            frames += 1;
            if report.estimate.has_centerline() {
                centerlines += 1;
            }

            let fps = 1.0 / report.elapsed.as_secs_f32().max(f32::EPSILON);
            debug!(
                frame = frames,
                lines = report.line_count,
                fps = %format_args!("{:.2}", fps),
                "frame processed"
            );

            if self.visible {
                highgui::imshow(&self.window_title, &output)?;

                let key = highgui::wait_key(1)?;
                if self.quit_key.matches(key) {
                    break StopReason::QuitKey;
                }
            }
        };

        info!(
            source = %source.spec(),
            ?reason,
            frames,
            centerlines,
            "detection loop finished"
        );
        Ok(reason)
    }
}
