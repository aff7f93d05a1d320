use opencv::core::{Point, Rect};

/// 선 검출을 제한할 관심영역(ROI). 항상 축에 정렬된 사각형입니다.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RegionOfInterest {
    /// 화면 중앙에 고정 크기 사각형
    Centered { width: i32, height: i32 },
    /// 프레임 크기의 비율로 지정한 사각형 (`start`~`end`, 0.0~1.0)
    Fractional { start: f64, end: f64 },
}

impl RegionOfInterest {
    /// 프레임 크기에 맞춘 좌상단/우하단 꼭짓점 (둘 다 포함)
    pub fn corners(&self, frame_width: i32, frame_height: i32) -> (Point, Point) {
        match *self {
            RegionOfInterest::Centered { width, height } => {
                let center_x = frame_width / 2;
                let center_y = frame_height / 2;
                (
                    Point::new(center_x - width / 2, center_y - height / 2),
                    Point::new(center_x + width / 2, center_y + height / 2),
                )
            }
            RegionOfInterest::Fractional { start, end } => {
                let scale = |len: i32, f: f64| (len as f64 * f) as i32;
                (
                    Point::new(scale(frame_width, start), scale(frame_height, start)),
                    Point::new(scale(frame_width, end), scale(frame_height, end)),
                )
            }
        }
    }

    /// `corners`와 같은 영역의 `Rect`. 우하단 꼭짓점을 포함하도록 폭/높이에 1을 더합니다.
    pub fn rect(&self, frame_width: i32, frame_height: i32) -> Rect {
        let (tl, br) = self.corners(frame_width, frame_height);
        Rect::new(tl.x, tl.y, (br.x - tl.x + 1).max(0), (br.y - tl.y + 1).max(0))
    }
}
