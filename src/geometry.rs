//! # Geometry
//!
//! Geometric utilities for mesh operations.

pub type Point = glam::Vec3;
pub type Vector = glam::Vec3;
pub type Normal = glam::Vec3;

/// Calculate the centroid of a triangle
#[inline]
pub fn triangle_centroid(p0: Point, p1: Point, p2: Point) -> Point {
    (p0 + p1 + p2) / 3.0
}

/// Calculate the area of a triangle using cross product
#[inline]
pub fn triangle_area(p0: Point, p1: Point, p2: Point) -> f32 {
    (p1 - p0).cross(p2 - p0).length() * 0.5
}

/// Calculate the normal of a triangle (zero for a degenerate triangle)
#[inline]
pub fn triangle_normal(p0: Point, p1: Point, p2: Point) -> Vector {
    (p1 - p0).cross(p2 - p0).normalize_or_zero()
}

/// Newell's vector of a closed polygon: its direction is the polygon normal
/// and its length is twice the polygon area. Robust for non-planar polygons.
pub fn newell_vector(points: &[Point]) -> Vector {
    let mut n = Vector::ZERO;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        n.x += (p.y - q.y) * (p.z + q.z);
        n.y += (p.z - q.z) * (p.x + q.x);
        n.z += (p.x - q.x) * (p.y + q.y);
    }
    n
}

/// Unit normal of a polygon (zero for a degenerate polygon)
#[inline]
pub fn polygon_normal(points: &[Point]) -> Normal {
    newell_vector(points).normalize_or_zero()
}

/// Area of a (possibly non-planar) polygon
#[inline]
pub fn polygon_area(points: &[Point]) -> f32 {
    newell_vector(points).length() * 0.5
}

/// Vertex average of a polygon
#[inline]
pub fn polygon_centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::ZERO;
    }
    points.iter().fold(Point::ZERO, |acc, p| acc + *p) / points.len() as f32
}

/// Remove the component of `v` along the unit vector `n`
#[inline]
pub fn project_to_plane(v: Vector, n: Normal) -> Vector {
    v - n * n.dot(v)
}

/// Calculate the bounding box of a point set
#[inline]
pub fn bounding_box(points: &[Point]) -> (Point, Point) {
    if points.is_empty() {
        return (Point::ZERO, Point::ZERO);
    }

    let mut min = points[0];
    let mut max = points[0];

    for &p in points {
        min = min.min(p);
        max = max.max(p);
    }

    (min, max)
}
