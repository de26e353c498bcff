//! Shape kinds and their geometry.
//!
//! [`ShapeKind`] is the closed set of shapes a block can take. Each kind
//! knows how much room it needs around its label ([`ShapeKind::content_size`]),
//! what its outline looks like ([`ShapeKind::outline`]) and where a line
//! leaving its center crosses that outline ([`ShapeKind::intersect`]).
//!
//! All outline coordinates are relative to the block center.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Point, Size},
    semantic::Direction,
};

/// Extra width of a subroutine's side bars.
const SUBROUTINE_BARS: f32 = 16.0;
/// Gap between the two rings of a double circle.
const DOUBLE_CIRCLE_GAP: f32 = 5.0;

/// The shape of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Declared without a recognized bracket pair, or only referenced by `class`.
    Unknown,
    Square,
    Round,
    Circle,
    DoubleCircle,
    Diamond,
    Hexagon,
    Stadium,
    Subroutine,
    Cylinder,
    LeanLeft,
    LeanRight,
    Trapezoid,
    InvTrapezoid,
    RectLeftInvArrow,
    BlockArrow,
    Composite,
    Space,
}

impl ShapeKind {
    /// Maps a node's opening and closing delimiters to a shape.
    ///
    /// ```
    /// use tessera_core::shape::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_delimiters("((", "))"), ShapeKind::Circle);
    /// assert_eq!(ShapeKind::from_delimiters("[/", "\\]"), ShapeKind::Trapezoid);
    /// assert_eq!(ShapeKind::from_delimiters("(-", "-)"), ShapeKind::Unknown);
    /// ```
    pub fn from_delimiters(start: &str, end: &str) -> Self {
        match (start, end) {
            ("[", "]") => Self::Square,
            ("(", ")") => Self::Round,
            ("((", "))") => Self::Circle,
            ("(((", ")))") => Self::DoubleCircle,
            (">", "]") => Self::RectLeftInvArrow,
            ("{", "}") => Self::Diamond,
            ("{{", "}}") => Self::Hexagon,
            ("([", "])") => Self::Stadium,
            ("[[", "]]") => Self::Subroutine,
            ("[(", ")]") => Self::Cylinder,
            ("[/", "/]") => Self::LeanRight,
            ("[\\", "\\]") => Self::LeanLeft,
            ("[/", "\\]") => Self::Trapezoid,
            ("[\\", "/]") => Self::InvTrapezoid,
            ("<[", "]>") => Self::BlockArrow,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Square => "square",
            Self::Round => "round",
            Self::Circle => "circle",
            Self::DoubleCircle => "double_circle",
            Self::Diamond => "diamond",
            Self::Hexagon => "hexagon",
            Self::Stadium => "stadium",
            Self::Subroutine => "subroutine",
            Self::Cylinder => "cylinder",
            Self::LeanLeft => "lean_left",
            Self::LeanRight => "lean_right",
            Self::Trapezoid => "trapezoid",
            Self::InvTrapezoid => "inv_trapezoid",
            Self::RectLeftInvArrow => "rect_left_inv_arrow",
            Self::BlockArrow => "block_arrow",
            Self::Composite => "composite",
            Self::Space => "space",
        }
    }

    /// Returns the outer size of a shape wrapping a label of size `label`.
    ///
    /// Composites and spacers are sized by the layout engine, so they
    /// report zero here.
    pub fn content_size(self, label: Size, padding: f32, directions: &[Direction]) -> Size {
        let w = label.width();
        let h = label.height();
        let padded_h = h + padding;
        match self {
            Self::Composite | Self::Space => Size::default(),
            Self::Unknown | Self::Square | Self::Round => Size::new(w + padding, padded_h),
            Self::RectLeftInvArrow => Size::new(w + padding + padded_h / 2.0, padded_h),
            Self::Circle => {
                let d = w.max(h) + padding;
                Size::new(d, d)
            }
            Self::DoubleCircle => {
                let d = w.max(h) + padding + DOUBLE_CIRCLE_GAP * 2.0;
                Size::new(d, d)
            }
            Self::Diamond => {
                let s = w + h + padding * 2.0;
                Size::new(s, s)
            }
            Self::Hexagon => Size::new(w + padding + padded_h / 2.0, padded_h),
            Self::Stadium => Size::new(w + padding + padded_h / 4.0, padded_h),
            Self::Subroutine => Size::new(w + padding + SUBROUTINE_BARS, padded_h),
            Self::Cylinder => {
                let rx = (w + padding) / 2.0;
                let ry = cylinder_cap(w + padding);
                Size::new(rx * 2.0, padded_h + ry * 2.0)
            }
            Self::LeanLeft | Self::LeanRight | Self::Trapezoid | Self::InvTrapezoid => {
                Size::new(w + padding + padded_h * 2.0 / 3.0, padded_h)
            }
            Self::BlockArrow => {
                let arrow_h = h + padding * 2.0;
                if directions.iter().any(|d| d.is_horizontal()) || directions.is_empty() {
                    Size::new(w + arrow_h + padding, arrow_h)
                } else {
                    let arrow_w = w + padding * 2.0;
                    Size::new(arrow_w, h + arrow_w + padding)
                }
            }
        }
    }

    /// Returns the polygon outline of shapes that are not rectangles or ellipses.
    pub fn outline(self, size: Size, directions: &[Direction]) -> Option<Vec<Point>> {
        let hw = size.width() / 2.0;
        let hh = size.height() / 2.0;
        let p = Point::new;
        match self {
            Self::Diamond => Some(vec![p(0.0, -hh), p(hw, 0.0), p(0.0, hh), p(-hw, 0.0)]),
            Self::Hexagon => {
                let m = size.height() / 4.0;
                Some(vec![
                    p(-hw + m, -hh),
                    p(hw - m, -hh),
                    p(hw, 0.0),
                    p(hw - m, hh),
                    p(-hw + m, hh),
                    p(-hw, 0.0),
                ])
            }
            Self::LeanRight => {
                let o = size.height() * 2.0 / 3.0;
                Some(vec![p(-hw + o, -hh), p(hw, -hh), p(hw - o, hh), p(-hw, hh)])
            }
            Self::LeanLeft => {
                let o = size.height() * 2.0 / 3.0;
                Some(vec![p(-hw, -hh), p(hw - o, -hh), p(hw, hh), p(-hw + o, hh)])
            }
            Self::Trapezoid => {
                let o = size.height() / 3.0;
                Some(vec![p(-hw + o, -hh), p(hw - o, -hh), p(hw, hh), p(-hw, hh)])
            }
            Self::InvTrapezoid => {
                let o = size.height() / 3.0;
                Some(vec![p(-hw, -hh), p(hw, -hh), p(hw - o, hh), p(-hw + o, hh)])
            }
            Self::RectLeftInvArrow => Some(vec![
                p(-hw, -hh),
                p(hw, -hh),
                p(hw, hh),
                p(-hw, hh),
                p(-hw + hh, 0.0),
            ]),
            Self::BlockArrow => block_arrow_outline(size, directions),
            _ => None,
        }
    }

    /// Finds where the segment from `center` toward `toward` leaves the shape.
    ///
    /// Falls back to `toward` when the two points coincide.
    pub fn intersect(
        self,
        center: Point,
        size: Size,
        directions: &[Direction],
        toward: Point,
    ) -> Point {
        match self {
            Self::Circle | Self::DoubleCircle => find_ellipse_intersection(center, toward, size),
            _ => match self.outline(size, directions) {
                Some(outline) => find_polygon_intersection(center, toward, &outline),
                None => find_rectangle_intersection(center, toward, size),
            },
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vertical radius of a cylinder's elliptical caps.
pub fn cylinder_cap(width: f32) -> f32 {
    let rx = width / 2.0;
    rx / (2.5 + width / 50.0)
}

fn block_arrow_outline(size: Size, directions: &[Direction]) -> Option<Vec<Point>> {
    let has = |d: Direction| directions.contains(&d);
    let horizontal = directions.iter().any(|d| d.is_horizontal());
    let vertical = directions.iter().any(|d| d.is_vertical());
    let p = Point::new;

    if horizontal {
        let (start, end) = (
            has(Direction::Left) || has(Direction::X),
            has(Direction::Right) || has(Direction::X),
        );
        let hw = size.width() / 2.0;
        let hh = size.height() / 2.0;
        let head = hh;
        let body = hh / 2.0;
        let mut points = Vec::with_capacity(10);
        if start {
            points.extend([p(-hw, 0.0), p(-hw + head, -hh), p(-hw + head, -body)]);
        } else {
            points.push(p(-hw, -body));
        }
        if end {
            points.extend([
                p(hw - head, -body),
                p(hw - head, -hh),
                p(hw, 0.0),
                p(hw - head, hh),
                p(hw - head, body),
            ]);
        } else {
            points.extend([p(hw, -body), p(hw, body)]);
        }
        if start {
            points.extend([p(-hw + head, body), p(-hw + head, hh)]);
        } else {
            points.push(p(-hw, body));
        }
        Some(points)
    } else if vertical {
        let (start, end) = (
            has(Direction::Up) || has(Direction::Y),
            has(Direction::Down) || has(Direction::Y),
        );
        let hw = size.width() / 2.0;
        let hh = size.height() / 2.0;
        let head = hw;
        let body = hw / 2.0;
        let mut points = Vec::with_capacity(10);
        if start {
            points.extend([p(0.0, -hh), p(hw, -hh + head), p(body, -hh + head)]);
        } else {
            points.push(p(body, -hh));
        }
        if end {
            points.extend([
                p(body, hh - head),
                p(hw, hh - head),
                p(0.0, hh),
                p(-hw, hh - head),
                p(-body, hh - head),
            ]);
        } else {
            points.extend([p(body, hh), p(-body, hh)]);
        }
        if start {
            points.extend([p(-body, -hh + head), p(-hw, -hh + head)]);
        } else {
            points.push(p(-body, -hh));
        }
        Some(points)
    } else {
        None
    }
}

fn find_rectangle_intersection(a: Point, b: Point, a_size: Size) -> Point {
    let half_width = a_size.width() / 2.0;
    let half_height = a_size.height() / 2.0;

    let dist = b.sub_point(a);
    let length = dist.hypot();
    if length < 0.001 {
        return b;
    }

    let dx_norm = dist.x() / length;
    let dy_norm = dist.y() / length;

    // Distance along the ray to each edge line
    let t_top = -half_height / dy_norm;
    let t_bottom = half_height / dy_norm;
    let t_left = -half_width / dx_norm;
    let t_right = half_width / dx_norm;

    let mut t = f32::MAX;

    for t_edge in [t_top, t_bottom] {
        if t_edge.is_finite() && t_edge > 0.0 && t_edge < t {
            let x = dx_norm.mul_add(t_edge, a.x());
            if x >= a.x() - half_width && x <= a.x() + half_width {
                t = t_edge;
            }
        }
    }

    for t_edge in [t_left, t_right] {
        if t_edge.is_finite() && t_edge > 0.0 && t_edge < t {
            let y = dy_norm.mul_add(t_edge, a.y());
            if y >= a.y() - half_height && y <= a.y() + half_height {
                t = t_edge;
            }
        }
    }

    if t == f32::MAX {
        return b;
    }

    Point::new(dx_norm.mul_add(t, a.x()), dy_norm.mul_add(t, a.y()))
}

fn find_ellipse_intersection(a: Point, b: Point, a_size: Size) -> Point {
    let half_width = a_size.width() / 2.0;
    let half_height = a_size.height() / 2.0;

    let dist = b.sub_point(a);
    let length = dist.hypot();
    if length < 0.001 {
        return b;
    }

    let dx_norm = dist.x() / length;
    let dy_norm = dist.y() / length;

    // r = (a*b) / sqrt((b*cos(θ))² + (a*sin(θ))²)
    let angle = dy_norm.atan2(dx_norm);
    let radius =
        (half_width * half_height) / (half_height * angle.cos()).hypot(half_width * angle.sin());

    Point::new(
        dx_norm.mul_add(radius, a.x()),
        dy_norm.mul_add(radius, a.y()),
    )
}

fn find_polygon_intersection(a: Point, b: Point, outline: &[Point]) -> Point {
    let ray = b.sub_point(a);
    if ray.hypot() < 0.001 {
        return b;
    }

    let cross = |u: Point, v: Point| u.x() * v.y() - u.y() * v.x();

    let mut best: Option<f32> = None;
    for (i, start) in outline.iter().enumerate() {
        let end = outline[(i + 1) % outline.len()];
        let p1 = a.add_point(*start);
        let edge = a.add_point(end).sub_point(p1);

        let denom = cross(ray, edge);
        if denom.abs() < f32::EPSILON {
            continue;
        }
        let offset = p1.sub_point(a);
        let t = cross(offset, edge) / denom;
        let s = cross(offset, ray) / denom;
        if t > 0.0 && (0.0..=1.0).contains(&s) && best.is_none_or(|current| t < current) {
            best = Some(t);
        }
    }

    match best {
        Some(t) => a.add_point(ray.scale(t)),
        None => b,
    }
}
