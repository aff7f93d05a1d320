//! 검출된 선분 묶음으로부터 차로 중심선을 추정합니다.
//!
//! 두 가지 정책이 있습니다.
//! - `PairwiseAverage`: 모든 (i, j) 쌍의 끝점 중점을 이은 선분을 전부 돌려줍니다 (n²개).
//! - `ExtremeSlopePair`: 기울기 절댓값이 가장 큰 두 선분으로 단일 중심선을 계산합니다.
//!
//! 두 정책 모두 프레임 단위로 상태 없이 동작합니다.

use std::fmt;

use tracing::trace;

use crate::segment::LineSegment;

/// 중심선 추정 정책
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CenterlinePolicy {
    PairwiseAverage,
    ExtremeSlopePair,
}

/// `ExtremeSlopePair` 정책의 조정값
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EstimatorParams {
    /// 기울기 절댓값이 이 값을 넘는 선분은 수직에 가깝다고 보고 제외
    pub vertical_slope_limit: f64,
    /// 필터를 통과해야 하는 최소 선분 수
    pub min_segments: usize,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            vertical_slope_limit: 100.0,
            min_segments: 2,
        }
    }
}

/// 단일 중심선과 그것을 유도한 값들
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centerline {
    pub segment: LineSegment,
    pub slope: f64,
    pub intercept: f64,
    pub midpoint: (f64, f64),
}

/// 중심선을 계산할 수 없는 이유. 어느 쪽이든 해당 프레임에 중심선을 그리지 않을 뿐
/// 파이프라인을 멈추지는 않습니다.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CenterlineError {
    InsufficientSegments { found: usize, minimum: usize },
    Overflow { slope: f64, intercept: f64 },
}

impl fmt::Display for CenterlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CenterlineError::InsufficientSegments { found, minimum } => {
                write!(f, "insufficient segments ({found} < {minimum})")
            }
            CenterlineError::Overflow { slope, intercept } => write!(
                f,
                "centerline endpoint out of range (slope {:.3e}, intercept {:.3})",
                slope, intercept
            ),
        }
    }
}

impl std::error::Error for CenterlineError {}

/// 한 프레임의 추정 결과
#[derive(Clone, Debug, PartialEq)]
pub enum CenterlineEstimate {
    Pairwise(Vec<LineSegment>),
    Single(Result<Centerline, CenterlineError>),
}

impl CenterlineEstimate {
    /// 오버레이에 그릴 선분 목록
    pub fn segments(&self) -> &[LineSegment] {
        match self {
            CenterlineEstimate::Pairwise(lines) => lines,
            CenterlineEstimate::Single(Ok(centerline)) => {
                std::slice::from_ref(&centerline.segment)
            }
            CenterlineEstimate::Single(Err(_)) => &[],
        }
    }

    /// 그릴 중심선이 하나라도 있는지 여부
    pub fn has_centerline(&self) -> bool {
        !self.segments().is_empty()
    }
}

/// 정책에 따라 추정 함수를 선택합니다.
pub fn estimate(
    policy: CenterlinePolicy,
    lines: &[LineSegment],
    image_height: i32,
    params: &EstimatorParams,
) -> CenterlineEstimate {
    match policy {
        CenterlinePolicy::PairwiseAverage => {
            CenterlineEstimate::Pairwise(pairwise_midlines(lines))
        }
        CenterlinePolicy::ExtremeSlopePair => {
            CenterlineEstimate::Single(extreme_slope_pair(lines, image_height, params))
        }
    }
}

/// 순서쌍 (i, j) 전부에 대해 두 선분의 중점 선분을 만듭니다. i == j도 포함하므로
/// 입력이 n개면 출력은 정확히 n²개입니다.
pub fn pairwise_midlines(lines: &[LineSegment]) -> Vec<LineSegment> {
    let mut out = Vec::with_capacity(lines.len() * lines.len());
    for a in lines {
        for b in lines {
            out.push(a.midpoint_with(b));
        }
    }
    out
}

/// 기울기 절댓값이 가장 큰 두 선분으로 중심선 하나를 계산합니다.
///
/// 1) 수직이거나 `|slope| > vertical_slope_limit`인 선분 제외
/// 2) 남은 선분이 `min_segments`보다 적으면 `InsufficientSegments`
/// 3) `|slope|` 내림차순(안정 정렬)으로 앞의 두 개 선택
/// 4) 두 선분 시작점의 중점을 지나고 평균 기울기를 갖는 직선을
///    y = `image_height`, y = `image_height / 2`에서 x에 대해 풉니다.
///
/// 끝점이 유한하지 않거나 `i32` 범위를 벗어나면 `Overflow`를 돌려줍니다.
pub fn extreme_slope_pair(
    lines: &[LineSegment],
    image_height: i32,
    params: &EstimatorParams,
) -> Result<Centerline, CenterlineError> {
    let mut candidates: Vec<(LineSegment, f64)> = lines
        .iter()
        .filter_map(|line| line.slope().map(|slope| (*line, slope)))
        .filter(|(_, slope)| slope.is_finite() && slope.abs() <= params.vertical_slope_limit)
        .collect();

    let minimum = params.min_segments.max(2);
    if candidates.len() < minimum {
        return Err(CenterlineError::InsufficientSegments {
            found: candidates.len(),
            minimum,
        });
    }

    candidates.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    let (outer1, slope1) = candidates[0];
    let (outer2, slope2) = candidates[1];
    trace!(?outer1, ?outer2, "selected steepest segment pair");

    let mid_x = (outer1.x1 as f64 + outer2.x1 as f64) / 2.0;
    let mid_y = (outer1.y1 as f64 + outer2.y1 as f64) / 2.0;
    let slope = (slope1 + slope2) / 2.0;
    let intercept = mid_y - slope * mid_x;

    let height = image_height as f64;
    let overflow = CenterlineError::Overflow { slope, intercept };
    let x_bottom = to_pixel((height - intercept) / slope).ok_or(overflow)?;
    let x_middle = to_pixel((height / 2.0 - intercept) / slope).ok_or(overflow)?;

    Ok(Centerline {
        segment: LineSegment::new(x_bottom, image_height, x_middle, image_height / 2),
        slope,
        intercept,
        midpoint: (mid_x, mid_y),
    })
}

/// 0 방향으로 버림한 뒤 `i32`에 들어가는 경우에만 픽셀 좌표로 변환
fn to_pixel(value: f64) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < i32::MIN as f64 || truncated > i32::MAX as f64 {
        return None;
    }
    Some(truncated as i32)
}
