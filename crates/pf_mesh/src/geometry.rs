// crates/pf_mesh/src/geometry.rs

//! 几何基元
//!
//! - [`Point`]: 不可变三维点
//! - [`Vector`]: 三维向量（`glam::DVec3`）
//! - [`Shape`]: 单元体积 + 形心
//! - [`Surface`]: 面面积 + 形心 + 单位法向量
//!
//! 二维网格的单元"体积"是面积，面"面积"是边长；一维网格的面积取 1。

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 三维向量
pub type Vector = DVec3;

/// 判断长度为零的阈值
const GEOM_EPS: f64 = 1e-300;

// ============================================================
// Point
// ============================================================

/// 三维点
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X坐标
    pub x: f64,
    /// Y坐标
    pub y: f64,
    /// Z坐标
    pub z: f64,
}

impl Point {
    /// 原点
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// 创建新的点
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 欧氏距离
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        self.vector_to(other).length()
    }

    /// 从本点指向 `other` 的向量
    #[inline]
    pub fn vector_to(&self, other: &Point) -> Vector {
        Vector::new(other.x - self.x, other.y - self.y, other.z - self.z)
    }

    /// 位置向量
    #[inline]
    pub fn to_vector(self) -> Vector {
        Vector::new(self.x, self.y, self.z)
    }

    /// 从位置向量构造
    #[inline]
    pub fn from_vector(v: Vector) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// 沿向量平移
    #[inline]
    pub fn translate(&self, v: Vector) -> Self {
        Self::from_vector(self.to_vector() + v)
    }

    /// 点集的算术平均
    pub fn average(points: &[Point]) -> Point {
        if points.is_empty() {
            return Point::ORIGIN;
        }
        let sum: Vector = points.iter().map(|p| p.to_vector()).sum();
        Point::from_vector(sum / points.len() as f64)
    }
}

impl From<Vector> for Point {
    fn from(v: Vector) -> Self {
        Self::from_vector(v)
    }
}

// ============================================================
// Shape
// ============================================================

/// 单元几何：体积（2D 为面积，1D 为长度）与形心
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    /// 体积
    pub volume: f64,
    /// 形心
    pub centroid: Point,
}

impl Shape {
    /// 创建形状
    pub const fn new(volume: f64, centroid: Point) -> Self {
        Self { volume, centroid }
    }

    /// 线段单元：长度 + 中点
    pub fn from_segment(a: Point, b: Point) -> Self {
        Self::new(a.distance(&b), Point::average(&[a, b]))
    }

    /// 平面多边形单元：面积 + 面积加权形心
    pub fn from_polygon(points: &[Point]) -> Self {
        let (area, centroid) = polygon_area_centroid(points);
        Self::new(area, centroid)
    }
}

// ============================================================
// Surface
// ============================================================

/// 面几何：面积、形心、单位法向量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    /// 面积
    pub area: f64,
    /// 形心
    pub centroid: Point,
    /// 法向量
    pub normal: Vector,
}

impl Surface {
    /// 创建面几何，法向量会被单位化
    pub fn new(area: f64, centroid: Point, normal: Vector) -> Self {
        Self {
            area,
            centroid,
            normal: normal.normalize_or_zero(),
        }
    }

    /// 单位法向量
    #[inline]
    pub fn unit_normal(&self) -> Vector {
        self.normal
    }

    /// 反转法向
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            ..*self
        }
    }

    /// 一维网格的点面：面积为 1
    pub fn from_point(p: Point, normal: Vector) -> Self {
        Self::new(1.0, p, normal)
    }

    /// 二维网格的边：面积为边长，法向在 xy 平面内（a→b 方向右手侧）
    pub fn from_edge(a: Point, b: Point) -> Self {
        let d = a.vector_to(&b);
        Self::new(
            d.length(),
            Point::average(&[a, b]),
            Vector::new(d.y, -d.x, 0.0),
        )
    }

    /// 三维网格的多边形面（Newell 法向）
    pub fn from_polygon(points: &[Point]) -> Self {
        let (area, centroid) = polygon_area_centroid(points);
        Self::new(area, centroid, newell_normal(points))
    }
}

/// Newell 法计算多边形法向量（未单位化，长度为两倍面积）
pub fn newell_normal(points: &[Point]) -> Vector {
    let n = points.len();
    let mut normal = Vector::ZERO;
    for i in 0..n {
        let p = points[i].to_vector();
        let q = points[(i + 1) % n].to_vector();
        normal += p.cross(q);
    }
    normal
}

/// 平面多边形面积与形心（以顶点平均为中心的三角扇分解）
fn polygon_area_centroid(points: &[Point]) -> (f64, Point) {
    let n = points.len();
    if n < 3 {
        return (0.0, Point::average(points));
    }

    let center = Point::average(points).to_vector();
    let axis = newell_normal(points);
    let axis_len = axis.length();
    if axis_len < GEOM_EPS {
        return (0.0, Point::from_vector(center));
    }
    let unit = axis / axis_len;

    let mut area = 0.0;
    let mut weighted = Vector::ZERO;
    for i in 0..n {
        let p = points[i].to_vector();
        let q = points[(i + 1) % n].to_vector();
        let tri_area = 0.5 * (p - center).cross(q - center).dot(unit);
        area += tri_area;
        weighted += tri_area * (center + p + q) / 3.0;
    }

    if area.abs() < GEOM_EPS {
        return (0.0, Point::from_vector(center));
    }
    (area.abs(), Point::from_vector(weighted / area))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(3.0, 4.0, 12.0);
        assert!(approx_eq(a.distance(&b), 13.0));
        assert!(approx_eq(b.distance(&a), 13.0));
    }

    #[test]
    fn test_vector_between_points() {
        let a = Point::new(1.0, 2.0, 3.0);
        let b = Point::new(2.0, 4.0, 6.0);
        let v = a.vector_to(&b);
        assert_eq!(v, Vector::new(1.0, 2.0, 3.0));
        assert_eq!(a.translate(v), b);
    }

    #[test]
    fn test_unit_square_shape() {
        let pts = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ];
        let shape = Shape::from_polygon(&pts);
        assert!(approx_eq(shape.volume, 1.0));
        assert!(approx_eq(shape.centroid.x, 0.5));
        assert!(approx_eq(shape.centroid.y, 0.5));
    }

    #[test]
    fn test_triangle_centroid() {
        let pts = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(3.0, 0.0, 0.0),
            Point::new(0.0, 3.0, 0.0),
        ];
        let shape = Shape::from_polygon(&pts);
        assert!(approx_eq(shape.volume, 4.5));
        assert!(approx_eq(shape.centroid.x, 1.0));
        assert!(approx_eq(shape.centroid.y, 1.0));
    }

    #[test]
    fn test_clockwise_polygon_area_positive() {
        let pts = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(0.0, 2.0, 0.0),
            Point::new(2.0, 2.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
        ];
        let shape = Shape::from_polygon(&pts);
        assert!(approx_eq(shape.volume, 4.0));
        assert!(approx_eq(shape.centroid.x, 1.0));
    }

    #[test]
    fn test_edge_surface() {
        let s = Surface::from_edge(Point::new(1.0, 0.0, 0.0), Point::new(1.0, 2.0, 0.0));
        assert!(approx_eq(s.area, 2.0));
        assert!(approx_eq(s.centroid.y, 1.0));
        assert!(approx_eq(s.unit_normal().x, 1.0));
        assert!(approx_eq(s.flipped().unit_normal().x, -1.0));
    }

    #[test]
    fn test_polygon_surface_normal() {
        let pts = [
            Point::new(0.0, 0.0, 1.0),
            Point::new(2.0, 0.0, 1.0),
            Point::new(2.0, 2.0, 1.0),
            Point::new(0.0, 2.0, 1.0),
        ];
        let s = Surface::from_polygon(&pts);
        assert!(approx_eq(s.area, 4.0));
        assert!(approx_eq(s.unit_normal().z, 1.0));
        assert!(approx_eq(s.centroid.z, 1.0));
    }
}
