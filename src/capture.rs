use std::path::{Path, PathBuf};

use opencv::{
    core::Mat,
    prelude::*,
    videoio,
};
use tracing::{debug, info, warn};

use crate::error::{LaneError, LaneResult};

/// 프레임을 읽어올 입력 소스
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceSpec {
    Camera(i32),
    File(PathBuf),
}

impl std::fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceSpec::Camera(index) => write!(f, "camera {}", index),
            SourceSpec::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// 캡처 장치를 소유하는 핸들. 한 번 열고, `release` 또는 drop 시점에 한 번 해제합니다.
pub struct FrameSource {
    spec: SourceSpec,
    cap: videoio::VideoCapture,
    released: bool,
}

impl FrameSource {
    /// 소스를 열고, 열리지 않았다면 `SourceUnavailable`을 돌려줍니다.
    pub fn open(spec: SourceSpec) -> LaneResult<Self> {
        let cap = match &spec {
            SourceSpec::Camera(index) => videoio::VideoCapture::new(*index, videoio::CAP_ANY)?,
            SourceSpec::File(path) => {
                videoio::VideoCapture::from_file(&path_str(path)?, videoio::CAP_ANY)?
            }
        };

        if !cap.is_opened()? {
            return Err(LaneError::SourceUnavailable(spec.to_string()));
        }
        info!(source = %spec, "video source opened");

        Ok(Self {
            spec,
            cap,
            released: false,
        })
    }

    /// 이 핸들이 연 입력 소스
    ///
    /// # 반환
    /// * 로그에 남길 `SourceSpec` 참조
    pub fn spec(&self) -> &SourceSpec {
        &self.spec
    }

    /// 다음 프레임을 읽습니다.
    ///
    /// # 반환
    /// * `Ok(None)` - 스트림 끝, 읽기 실패, 빈 프레임. 루프를 끝내라는 뜻이며 에러로 보지 않습니다.
    pub fn next_frame(&mut self) -> LaneResult<Option<Mat>> {
        if self.released {
            return Ok(None);
        }

        let mut frame = Mat::default();
        match self.cap.read(&mut frame) {
            Ok(is_read) => {
                if !is_read || frame.empty() {
                    debug!(source = %self.spec, "end of stream");
                    return Ok(None);
                }
            }
            Err(e) => {
                warn!(source = %self.spec, "Failed to read frame: {}", e);
                return Ok(None);
            }
        }
        Ok(Some(frame))
    }

    /// 장치를 해제합니다. 두 번째 호출부터는 아무것도 하지 않습니다.
    pub fn release(&mut self) -> LaneResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.cap.release()?;
        info!(source = %self.spec, "video source released");
        Ok(())
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(source = %self.spec, "failed to release video source: {}", e);
        }
    }
}

fn path_str(path: &Path) -> LaneResult<String> {
    path.to_str()
        .map(str::to_owned)
        .ok_or_else(|| LaneError::SourceUnavailable(format!("non UTF-8 path {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_unavailable() {
        let spec = SourceSpec::File(PathBuf::from("/nonexistent/drive.mp4"));
        match FrameSource::open(spec) {
            Err(LaneError::SourceUnavailable(msg)) => {
                assert_eq!(msg, "file /nonexistent/drive.mp4");
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("opened a missing file"),
        }
    }

    #[test]
    fn source_spec_display() {
        assert_eq!(SourceSpec::Camera(2).to_string(), "camera 2");
    }
}
