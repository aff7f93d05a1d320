use opencv::core::{Point, Vec4i};

/// 허프 변환이 돌려주는 선분 하나. 좌표는 영상 픽셀 단위입니다.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// 한 프레임에서 검출된 선분 묶음. 순서에 의미는 없고 프레임이 끝나면 버려집니다.
pub type LineSet = Vec<LineSegment>;

impl LineSegment {
    /// 두 끝점 `(x1, y1)`, `(x2, y2)`로 선분을 만듭니다.
    ///
    /// # 인자
    /// * `x1`, `y1` - 시작점 픽셀 좌표
    /// * `x2`, `y2` - 끝점 픽셀 좌표
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// 기울기 `(y2 - y1) / (x2 - x1)`.
    ///
    /// # 반환
    /// * `None` - 수직 선분(`x1 == x2`)이라 기울기가 정의되지 않는 경우
    pub fn slope(&self) -> Option<f64> {
        let dx = self.x2 as i64 - self.x1 as i64;
        if dx == 0 {
            return None;
        }
        let dy = self.y2 as i64 - self.y1 as i64;
        Some(dy as f64 / dx as f64)
    }

    /// 두 선분의 같은 쪽 끝점끼리 중점을 이은 선분을 만듭니다.
    ///
    /// 좌표는 정수 나눗셈(내림)으로 계산합니다. 자기 자신과 짝지으면 원래 선분이 됩니다.
    pub fn midpoint_with(&self, other: &LineSegment) -> LineSegment {
        LineSegment {
            x1: floor_mid(self.x1, other.x1),
            y1: floor_mid(self.y1, other.y1),
            x2: floor_mid(self.x2, other.x2),
            y2: floor_mid(self.y2, other.y2),
        }
    }

    /// 시작점 `(x1, y1)`
    ///
    /// # 반환
    /// * OpenCV 그리기 함수에 넘길 `Point`
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    /// 끝점 `(x2, y2)`
    ///
    /// # 반환
    /// * OpenCV 그리기 함수에 넘길 `Point`
    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
}

/// 두 정수의 평균을 내림합니다. 합은 `i64`에서 계산하고, 결과는 항상 `a`와 `b` 사이입니다.
fn floor_mid(a: i32, b: i32) -> i32 {
    let mid = (a as i64 + b as i64).div_euclid(2);
    i32::try_from(mid).unwrap_or(if mid < 0 { i32::MIN } else { i32::MAX })
}

impl From<Vec4i> for LineSegment {
    fn from(line: Vec4i) -> Self {
        LineSegment::new(line[0], line[1], line[2], line[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_of_vertical_segment_is_undefined() {
        let seg = LineSegment::new(4, 0, 4, 50);
        assert_eq!(seg.slope(), None);
    }

    #[test]
    fn slope_uses_float_division() {
        let seg = LineSegment::new(0, 0, 3, 1);
        let slope = seg.slope().unwrap();
        assert!((slope - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn midpoint_with_floors_each_coordinate() {
        let a = LineSegment::new(0, 10, 5, 21);
        let b = LineSegment::new(3, 11, 8, 20);
        assert_eq!(a.midpoint_with(&b), LineSegment::new(1, 10, 6, 20));
    }

    #[test]
    fn pairing_with_itself_returns_same_segment() {
        let a = LineSegment::new(7, 3, 19, 40);
        assert_eq!(a.midpoint_with(&a), a);
    }

    #[test]
    fn converts_from_hough_vec4i() {
        let seg = LineSegment::from(Vec4i::new(1, 2, 3, 4));
        assert_eq!(seg, LineSegment::new(1, 2, 3, 4));
    }

    #[test]
    fn slope_spanning_full_i32_range() {
        let seg = LineSegment::new(-2_000_000_000, 0, 2_000_000_000, 1);
        let slope = seg.slope().unwrap();
        assert!((slope - 0.25e-9).abs() < 1e-20);

        let steep = LineSegment::new(0, i32::MIN, 1, i32::MAX);
        assert_eq!(steep.slope(), Some(u32::MAX as f64));
    }

    #[test]
    fn midpoint_with_large_coordinates() {
        let a = LineSegment::new(2_000_000_000, -2_000_000_000, i32::MAX, i32::MIN);
        let b = LineSegment::new(2_000_000_001, -2_000_000_001, i32::MAX, i32::MIN);
        assert_eq!(
            a.midpoint_with(&b),
            LineSegment::new(2_000_000_000, -2_000_000_001, i32::MAX, i32::MIN)
        );
    }
}
