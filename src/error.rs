use std::fmt;

/// 파이프라인 전체에서 공통으로 사용하는 에러 타입입니다.
///
/// 중심선 추정 실패(`CenterlineError`)는 여기에 포함되지 않습니다.
/// 그 경우는 "이번 프레임은 중심선 없음"으로 처리되고, 이 타입은
/// 캡처 장치나 OpenCV 호출처럼 루프를 멈춰야 하는 실패만 담습니다.
#[derive(Debug)]
pub enum LaneError {
    /// OpenCV 함수 호출 중 발생한 에러
    OpenCv(opencv::Error),
    /// 카메라/동영상 소스를 열 수 없음
    SourceUnavailable(String),
}

impl fmt::Display for LaneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneError::OpenCv(err) => write!(f, "opencv error: {}", err),
            LaneError::SourceUnavailable(source) => {
                write!(f, "could not open video source: {}", source)
            }
        }
    }
}

impl std::error::Error for LaneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaneError::OpenCv(err) => Some(err),
            LaneError::SourceUnavailable(_) => None,
        }
    }
}

impl From<opencv::Error> for LaneError {
    fn from(err: opencv::Error) -> Self {
        LaneError::OpenCv(err)
    }
}

/// 파이프라인 함수들에서 공통으로 사용할 `Result` 타입 별칭입니다.
pub type LaneResult<T> = Result<T, LaneError>;
