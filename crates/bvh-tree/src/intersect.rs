//! Exact triangle–triangle intersection.
//!
//! Triangle `A` is parameterized as `A0 + a0·p0 + a1·p1` with `p0 = A1 - A0`
//! and `p1 = A2 - A0`. Each edge of `B` is intersected with the plane of `A`,
//! which yields at most one legal crossing per edge. Two crossings bound the
//! segment `B ∩ plane(A)`, expressed in `(a0, a1)` coordinates, and the
//! triangles meet iff that segment meets the unit triangle
//! `{(0,0), (1,0), (0,1)}`.
//!
//! Coplanar pairs have no crossings, so they are decided by a separate 2D
//! overlap test on the dominant projection plane.
//!
//! Contacts are closed: triangles sharing only an edge or a vertex intersect.

use nalgebra::{Point2, Point3, Vector2, Vector3};

/// Default tolerance for [`triangles_intersect`].
pub const TRIANGLE_EPSILON: f32 = 1e-6;

/// Tests two triangles, already placed in a common space, for intersection.
///
/// `epsilon` gates every "effectively zero" decision: parallel planes,
/// edges parallel to a plane, parametric bounds and 2D orientations.
/// An inconclusive near-zero determinant reports no intersection.
///
/// Both triangles must be non-degenerate. The result does not depend on the
/// order of the two triangles.
#[allow(clippy::too_many_arguments)]
pub fn triangles_intersect(
    a0: &Point3<f32>,
    a1: &Point3<f32>,
    a2: &Point3<f32>,
    b0: &Point3<f32>,
    b1: &Point3<f32>,
    b2: &Point3<f32>,
    epsilon: f32,
) -> bool {
    let a = [a0, a1, a2];
    let b = [b0, b1, b2];

    let na = (a1 - a0).cross(&(a2 - a0));
    let nb = (b1 - b0).cross(&(b2 - b0));
    let na_len = na.norm();
    let nb_len = nb.norm();

    if na.cross(&nb).norm() <= epsilon * (na_len * nb_len) {
        let coplanar = na.dot(&(b0 - a0)).abs() <= epsilon * na_len
            && nb.dot(&(a0 - b0)).abs() <= epsilon * nb_len;
        if !coplanar {
            return false;
        }
        let facing = if na.dot(&nb) >= 0.0 { 1.0 } else { -1.0 };
        return coplanar_overlap(a, b, na + nb * facing, epsilon);
    }

    // Both orders so the answer is exactly symmetric near the boundaries.
    segment_through_plane_meets(a, b, epsilon) || segment_through_plane_meets(b, a, epsilon)
}

/// Intersects the edges of `b` with the plane of `a` and tests the resulting
/// segment against `a` in its own parametric coordinates.
fn segment_through_plane_meets(a: [&Point3<f32>; 3], b: [&Point3<f32>; 3], epsilon: f32) -> bool {
    let origin = a[0];
    let p0 = a[1] - a[0];
    let p1 = a[2] - a[0];
    let normal = p0.cross(&p1);
    let normal_len = normal.norm();

    let edges = [
        (b[0], b[1] - b[0]),
        (b[0], b[2] - b[0]),
        (b[1], b[2] - b[1]),
    ];

    let mut crossings = [Point2::origin(); 3];
    let mut count = 0;
    for (start, direction) in edges {
        let crossing = edge_crossing(
            origin, &p0, &p1, &normal, normal_len, start, &direction, epsilon,
        );
        if let Some(uv) = crossing {
            crossings[count] = uv;
            count += 1;
        }
    }

    let (from, to) = match count {
        0 | 1 => return false,
        2 => (crossings[0], crossings[1]),
        // A vertex of `b` on the plane: two of the crossings coincide.
        _ => widest_pair(&crossings),
    };
    segment_meets_unit_triangle(from, to, epsilon)
}

/// Solves `origin + a0·p0 + a1·p1 = start + t·direction` by Cramer's rule.
///
/// Returns `(a0, a1)` when the edge is not parallel to the plane and
/// `t ∈ [0, 1]`.
#[allow(clippy::too_many_arguments)]
fn edge_crossing(
    origin: &Point3<f32>,
    p0: &Vector3<f32>,
    p1: &Vector3<f32>,
    normal: &Vector3<f32>,
    normal_len: f32,
    start: &Point3<f32>,
    direction: &Vector3<f32>,
    epsilon: f32,
) -> Option<Point2<f32>> {
    let denom = normal.dot(direction);
    if denom.abs() <= epsilon * normal_len * direction.norm() {
        return None;
    }

    let d = start - origin;
    let t = -normal.dot(&d) / denom;
    if t < -epsilon || t > 1.0 + epsilon {
        return None;
    }

    let u = d.cross(p1).dot(direction) / denom;
    let v = p0.cross(&d).dot(direction) / denom;
    Some(Point2::new(u, v))
}

fn widest_pair(points: &[Point2<f32>; 3]) -> (Point2<f32>, Point2<f32>) {
    let pairs = [(0, 1), (0, 2), (1, 2)];
    let mut best = pairs[0];
    let mut best_dist = f32::MIN;
    for (i, j) in pairs {
        let dist = (points[i] - points[j]).norm_squared();
        if dist > best_dist {
            best_dist = dist;
            best = (i, j);
        }
    }
    (points[best.0], points[best.1])
}

fn inside_unit_triangle(p: &Point2<f32>, epsilon: f32) -> bool {
    p.x >= -epsilon && p.y >= -epsilon && p.x + p.y <= 1.0 + epsilon
}

/// Tests the segment `from → to` against the unit triangle.
///
/// Each edge test solves for the segment parameter `s = num / den` and the
/// coordinate along the edge, both kept scaled by `den` to avoid a division.
fn segment_meets_unit_triangle(from: Point2<f32>, to: Point2<f32>, epsilon: f32) -> bool {
    if inside_unit_triangle(&from, epsilon) || inside_unit_triangle(&to, epsilon) {
        return true;
    }

    let delta = to - from;

    // Edge a1 = 0, parameterized by a0.
    let bottom = scaled_edge_hit(delta.y, -from.y, from.x, delta.x, epsilon);
    // Edge a0 = 0, parameterized by a1.
    let left = scaled_edge_hit(delta.x, -from.x, from.y, delta.y, epsilon);
    // Edge a0 + a1 = 1: the sum of the two deltas above, parameterized by a0.
    let diagonal = scaled_edge_hit(
        delta.x + delta.y,
        1.0 - from.x - from.y,
        from.x,
        delta.x,
        epsilon,
    );

    bottom || left || diagonal
}

/// With `s = num / den`, checks `s ∈ [0, 1]` and `coord + s·coord_delta ∈ [0, 1]`.
fn scaled_edge_hit(den: f32, num: f32, coord: f32, coord_delta: f32, epsilon: f32) -> bool {
    if den.abs() <= epsilon {
        return false;
    }
    let (den, num) = if den < 0.0 { (-den, -num) } else { (den, num) };
    let slack = epsilon * den;
    if num < -slack || num > den + slack {
        return false;
    }
    let along = coord * den + coord_delta * num;
    along >= -slack && along <= den + slack
}

/// 2D overlap of two coplanar triangles, projected along the dominant axis of `normal`.
///
/// The projected pair is moved to the origin and scaled so its joint extent is
/// 1, which keeps the orientation tolerance independent of mesh size.
fn coplanar_overlap(
    a: [&Point3<f32>; 3],
    b: [&Point3<f32>; 3],
    normal: Vector3<f32>,
    epsilon: f32,
) -> bool {
    let n = normal.abs();
    let (i, j) = if n.x >= n.y && n.x >= n.z {
        (1, 2)
    } else if n.y >= n.z {
        (0, 2)
    } else {
        (0, 1)
    };
    let project = |p: &Point3<f32>| Point2::new(p[i], p[j]);
    let (a, b) = normalize_pair(a.map(project), b.map(project));

    for ea in 0..3 {
        for eb in 0..3 {
            if segments_intersect(
                &a[ea],
                &a[(ea + 1) % 3],
                &b[eb],
                &b[(eb + 1) % 3],
                epsilon,
            ) {
                return true;
            }
        }
    }

    point_in_triangle(&a[0], &b, epsilon) || point_in_triangle(&b[0], &a, epsilon)
}

/// Shifts both triangles so the joint bounding box starts at the origin and
/// divides by its larger side. Depends on neither argument order nor scale.
fn normalize_pair(
    a: [Point2<f32>; 3],
    b: [Point2<f32>; 3],
) -> ([Point2<f32>; 3], [Point2<f32>; 3]) {
    let (mut min, mut max) = (a[0], a[0]);
    for p in a.iter().chain(&b) {
        min = min.inf(p);
        max = max.sup(p);
    }
    let extent = (max - min).max();
    let scale = if extent > 0.0 { 1.0 / extent } else { 1.0 };
    let to_unit = |p: Point2<f32>| Point2::from((p - min) * scale);
    (a.map(to_unit), b.map(to_unit))
}

fn orient(p: &Point2<f32>, q: &Point2<f32>, r: &Point2<f32>) -> f32 {
    let pq: Vector2<f32> = q - p;
    pq.perp(&(r - p))
}

fn sign(value: f32, epsilon: f32) -> i8 {
    if value > epsilon {
        1
    } else if value < -epsilon {
        -1
    } else {
        0
    }
}

fn on_segment(a: &Point2<f32>, b: &Point2<f32>, p: &Point2<f32>, epsilon: f32) -> bool {
    p.x >= a.x.min(b.x) - epsilon
        && p.x <= a.x.max(b.x) + epsilon
        && p.y >= a.y.min(b.y) - epsilon
        && p.y <= a.y.max(b.y) + epsilon
}

fn segments_intersect(
    p1: &Point2<f32>,
    p2: &Point2<f32>,
    q1: &Point2<f32>,
    q2: &Point2<f32>,
    epsilon: f32,
) -> bool {
    let d1 = sign(orient(q1, q2, p1), epsilon);
    let d2 = sign(orient(q1, q2, p2), epsilon);
    let d3 = sign(orient(p1, p2, q1), epsilon);
    let d4 = sign(orient(p1, p2, q2), epsilon);

    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }

    (d1 == 0 && on_segment(q1, q2, p1, epsilon))
        || (d2 == 0 && on_segment(q1, q2, p2, epsilon))
        || (d3 == 0 && on_segment(p1, p2, q1, epsilon))
        || (d4 == 0 && on_segment(p1, p2, q2, epsilon))
}

fn point_in_triangle(p: &Point2<f32>, tri: &[Point2<f32>; 3], epsilon: f32) -> bool {
    let signs = [
        sign(orient(&tri[0], &tri[1], p), epsilon),
        sign(orient(&tri[1], &tri[2], p), epsilon),
        sign(orient(&tri[2], &tri[0], p), epsilon),
    ];
    let has_neg = signs.iter().any(|&s| s < 0);
    let has_pos = signs.iter().any(|&s| s > 0);
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32, z: f32) -> Point3<f32> {
        Point3::new(x, y, z)
    }

    fn check(a: [Point3<f32>; 3], b: [Point3<f32>; 3]) -> bool {
        let forward =
            triangles_intersect(&a[0], &a[1], &a[2], &b[0], &b[1], &b[2], TRIANGLE_EPSILON);
        let backward =
            triangles_intersect(&b[0], &b[1], &b[2], &a[0], &a[1], &a[2], TRIANGLE_EPSILON);
        assert_eq!(forward, backward, "predicate must be symmetric");
        forward
    }

    #[test]
    fn coplanar_shared_edge_counts_as_contact() {
        let a = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        let b = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, -1.0, 0.0)];
        assert!(check(a, b));
    }

    #[test]
    fn coplanar_crossing() {
        let a = [p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(1.0, 2.0, 0.0)];
        let b = [p(1.0, -1.0, 0.0), p(1.0, 1.0, 0.0), p(-1.0, 1.0, 0.0)];
        assert!(check(a, b));
    }

    #[test]
    fn coplanar_contained() {
        let a = [p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(0.0, 10.0, 0.0)];
        let b = [p(1.0, 1.0, 0.0), p(2.0, 1.0, 0.0), p(1.0, 2.0, 0.0)];
        assert!(check(a, b));
    }

    #[test]
    fn coplanar_disjoint() {
        let a = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        let b = [p(2.0, 2.0, 0.0), p(3.0, 2.0, 0.0), p(2.0, 3.0, 0.0)];
        assert!(!check(a, b));
    }

    #[test]
    fn coplanar_result_does_not_depend_on_scale() {
        let unit = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        // Same shape, ten sizes away diagonally.
        let apart = unit.map(|v| v + Vector3::new(10.0, 10.0, 0.0));
        // Same shape, overlapping the first one's corner.
        let overlapping = unit.map(|v| v + Vector3::new(0.25, 0.25, 0.0));

        for scale in [1e-4, 1e-2, 1.0, 1e2, 1e4] {
            let scaled = |t: [Point3<f32>; 3]| t.map(|v| Point3::from(v.coords * scale));
            assert!(!check(scaled(unit), scaled(apart)), "apart at scale {scale}");
            assert!(check(scaled(unit), scaled(overlapping)), "overlapping at scale {scale}");
        }
    }

    #[test]
    fn parallel_planes_never_meet() {
        let a = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        let b = [p(0.0, 0.0, 0.5), p(1.0, 0.0, 0.5), p(0.0, 1.0, 0.5)];
        assert!(!check(a, b));
    }

    #[test]
    fn piercing_through_interior() {
        // The segment B ∩ plane(A) lies strictly inside A and crosses no edge.
        let a = [p(-5.0, -5.0, 0.0), p(5.0, -5.0, 0.0), p(0.0, 5.0, 0.0)];
        let b = [p(0.0, 0.0, -1.0), p(0.5, 0.0, 1.0), p(-0.5, 0.0, 1.0)];
        assert!(check(a, b));
    }

    #[test]
    fn crossing_an_edge() {
        let a = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        let b = [p(0.5, -1.0, -1.0), p(0.5, -1.0, 1.0), p(0.5, 1.0, 0.0)];
        assert!(check(a, b));
    }

    #[test]
    fn plane_crossed_outside_triangle() {
        let a = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        let b = [p(3.0, 3.0, -1.0), p(4.0, 3.0, 1.0), p(3.0, 4.0, 1.0)];
        assert!(!check(a, b));
    }

    #[test]
    fn separated_in_space() {
        let a = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        let b = [p(0.0, 0.0, 1.0), p(1.0, 0.0, 2.0), p(0.0, 1.0, 3.0)];
        assert!(!check(a, b));
    }

    #[test]
    fn vertex_touching_interior_is_contact() {
        let a = [p(-1.0, -1.0, 0.0), p(2.0, -1.0, 0.0), p(-1.0, 2.0, 0.0)];
        let b = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 1.0), p(0.0, 1.0, 1.0)];
        assert!(check(a, b));
    }

    #[test]
    fn hovering_just_above_is_not_contact() {
        let a = [p(-1.0, -1.0, 0.0), p(2.0, -1.0, 0.0), p(-1.0, 2.0, 0.0)];
        let b = [p(0.0, 0.0, 0.01), p(1.0, 0.0, 1.0), p(0.0, 1.0, 1.0)];
        assert!(!check(a, b));
    }

    #[test]
    fn segment_endpoint_inside() {
        assert!(segment_meets_unit_triangle(
            Point2::new(0.2, 0.2),
            Point2::new(3.0, 3.0),
            TRIANGLE_EPSILON
        ));
    }

    #[test]
    fn segment_crossing_through_triangle() {
        assert!(segment_meets_unit_triangle(
            Point2::new(-1.0, 0.25),
            Point2::new(2.0, 0.25),
            TRIANGLE_EPSILON
        ));
    }

    #[test]
    fn segment_missing_triangle() {
        assert!(!segment_meets_unit_triangle(
            Point2::new(-1.0, 2.0),
            Point2::new(2.0, -1.0 + 2.5),
            TRIANGLE_EPSILON
        ));
        assert!(!segment_meets_unit_triangle(
            Point2::new(-1.0, -0.5),
            Point2::new(2.0, -0.5),
            TRIANGLE_EPSILON
        ));
    }

    #[test]
    fn edge_crossing_solves_parameters() {
        let origin = p(0.0, 0.0, 0.0);
        let p0 = Vector3::new(1.0, 0.0, 0.0);
        let p1 = Vector3::new(0.0, 1.0, 0.0);
        let normal = p0.cross(&p1);
        let start = p(0.25, 0.5, -1.0);

        let cross = |direction: &Vector3<f32>| {
            edge_crossing(&origin, &p0, &p1, &normal, 1.0, &start, direction, TRIANGLE_EPSILON)
        };

        let uv = cross(&Vector3::new(0.0, 0.0, 2.0)).unwrap();
        assert!((uv.x - 0.25).abs() < 1e-6);
        assert!((uv.y - 0.5).abs() < 1e-6);

        // Parallel to the plane.
        assert!(cross(&Vector3::new(1.0, 0.0, 0.0)).is_none());
        // Stops short of the plane.
        assert!(cross(&Vector3::new(0.0, 0.0, 0.5)).is_none());
    }
}
