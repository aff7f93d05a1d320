//! 카메라/동영상 프레임에서 직선 선분을 검출하고, 그 선분들로 차로 중심선을 추정해
//! 화면에 겹쳐 보여주는 파이프라인입니다.

pub mod capture;
pub mod centerline;
pub mod config;
pub mod detection;
pub mod error;
pub mod overlay;
pub mod pipeline;
pub mod roi;
pub mod segment;

pub use centerline::{
    Centerline, CenterlineError, CenterlineEstimate, CenterlinePolicy, EstimatorParams,
};
pub use error::{LaneError, LaneResult};
pub use pipeline::{FrameReport, Pipeline, StopReason};
pub use segment::{LineSegment, LineSet};
