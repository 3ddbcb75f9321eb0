use kurbo::{BezPath, PathEl, Point};

use crate::error::{ScrollytellError, ScrollytellResult};

/// Interpolates between two SVG paths with identical element structure.
///
/// The hand-off morph grows the substitute logo out of a single point, so the
/// usual source is [`PathMorph::from_point`], which collapses the destination
/// structure onto one origin. Two arbitrary paths morph element-wise when
/// their structures match; otherwise the source is collapsed onto its own
/// centroid and the morph degrades to a grow-from-point.
#[derive(Clone, Debug)]
pub struct PathMorph {
    from: Vec<PathEl>,
    to: Vec<PathEl>,
}

impl PathMorph {
    pub fn new(from_d: &str, to_d: &str) -> ScrollytellResult<Self> {
        let from = parse(from_d)?;
        let to = parse(to_d)?;
        if to.elements().is_empty() {
            return Err(ScrollytellError::configuration(
                "morph destination path is empty",
            ));
        }
        if same_structure(from.elements(), to.elements()) {
            return Ok(Self {
                from: from.elements().to_vec(),
                to: to.elements().to_vec(),
            });
        }
        tracing::debug!("morph paths differ in structure; collapsing source to its centroid");
        let origin = centroid(from.elements()).unwrap_or(Point::ZERO);
        Ok(Self {
            from: collapse(to.elements(), origin),
            to: to.elements().to_vec(),
        })
    }

    /// Morph that grows `to_d` out of `origin`.
    pub fn from_point(origin: Point, to_d: &str) -> ScrollytellResult<Self> {
        let to = parse(to_d)?;
        if to.elements().is_empty() {
            return Err(ScrollytellError::configuration(
                "morph destination path is empty",
            ));
        }
        Ok(Self {
            from: collapse(to.elements(), origin),
            to: to.elements().to_vec(),
        })
    }

    /// Interpolated path at `t` in `[0, 1]`. Exact at both endpoints.
    pub fn sample(&self, t: f64) -> BezPath {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return BezPath::from_vec(self.from.clone());
        }
        if t >= 1.0 {
            return BezPath::from_vec(self.to.clone());
        }
        let els = self
            .from
            .iter()
            .zip(&self.to)
            .map(|(a, b)| lerp_el(*a, *b, t))
            .collect();
        BezPath::from_vec(els)
    }

    pub fn sample_svg(&self, t: f64) -> String {
        self.sample(t).to_svg()
    }
}

fn parse(d: &str) -> ScrollytellResult<BezPath> {
    BezPath::from_svg(d)
        .map_err(|e| ScrollytellError::configuration(format!("invalid svg path: {e}")))
}

fn same_structure(a: &[PathEl], b: &[PathEl]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| std::mem::discriminant(x) == std::mem::discriminant(y))
}

fn collapse(els: &[PathEl], origin: Point) -> Vec<PathEl> {
    els.iter()
        .map(|el| match el {
            PathEl::MoveTo(_) => PathEl::MoveTo(origin),
            PathEl::LineTo(_) => PathEl::LineTo(origin),
            PathEl::QuadTo(_, _) => PathEl::QuadTo(origin, origin),
            PathEl::CurveTo(_, _, _) => PathEl::CurveTo(origin, origin, origin),
            PathEl::ClosePath => PathEl::ClosePath,
        })
        .collect()
}

fn centroid(els: &[PathEl]) -> Option<Point> {
    let mut sum = (0.0, 0.0);
    let mut n = 0usize;
    for el in els {
        for p in el_points(el) {
            sum.0 += p.x;
            sum.1 += p.y;
            n += 1;
        }
    }
    (n > 0).then(|| Point::new(sum.0 / n as f64, sum.1 / n as f64))
}

fn el_points(el: &PathEl) -> Vec<Point> {
    match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => vec![*p],
        PathEl::QuadTo(c, p) => vec![*c, *p],
        PathEl::CurveTo(c1, c2, p) => vec![*c1, *c2, *p],
        PathEl::ClosePath => vec![],
    }
}

fn lerp_el(a: PathEl, b: PathEl, t: f64) -> PathEl {
    match (a, b) {
        (PathEl::MoveTo(pa), PathEl::MoveTo(pb)) => PathEl::MoveTo(pa.lerp(pb, t)),
        (PathEl::LineTo(pa), PathEl::LineTo(pb)) => PathEl::LineTo(pa.lerp(pb, t)),
        (PathEl::QuadTo(ca, pa), PathEl::QuadTo(cb, pb)) => {
            PathEl::QuadTo(ca.lerp(cb, t), pa.lerp(pb, t))
        }
        (PathEl::CurveTo(c1a, c2a, pa), PathEl::CurveTo(c1b, c2b, pb)) => {
            PathEl::CurveTo(c1a.lerp(c1b, t), c2a.lerp(c2b, t), pa.lerp(pb, t))
        }
        // Structures are verified at construction; mismatches cannot reach
        // here, but hold the destination element if they somehow do.
        (_, other) => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "M0,0 L10,0 L10,10 L0,10 Z";

    #[test]
    fn endpoints_are_exact() {
        let morph = PathMorph::from_point(Point::new(5.0, 5.0), SQUARE).unwrap();
        let start = morph.sample(0.0);
        for p in start.elements().iter().flat_map(el_points) {
            assert_eq!(p, Point::new(5.0, 5.0));
        }
        assert_eq!(morph.sample(1.0).to_svg(), parse(SQUARE).unwrap().to_svg());
    }

    #[test]
    fn midpoint_is_halfway() {
        let morph = PathMorph::new("M0,0 L0,0", "M0,0 L10,20").unwrap();
        let mid = morph.sample(0.5);
        match mid.elements()[1] {
            PathEl::LineTo(p) => assert_eq!(p, Point::new(5.0, 10.0)),
            ref el => panic!("unexpected element {el:?}"),
        }
    }

    #[test]
    fn mismatched_structure_collapses_to_centroid() {
        let morph = PathMorph::new("M2,2 L4,4", SQUARE).unwrap();
        // Source collapsed: t=0 must sit entirely at the centroid (3,3).
        for p in morph.sample(0.0).elements().iter().flat_map(el_points) {
            assert_eq!(p, Point::new(3.0, 3.0));
        }
        assert_eq!(morph.sample(1.0).to_svg(), parse(SQUARE).unwrap().to_svg());
    }

    #[test]
    fn invalid_path_is_a_configuration_error() {
        assert!(
            PathMorph::new("not a path", SQUARE)
                .unwrap_err()
                .is_configuration()
        );
        assert!(PathMorph::from_point(Point::ZERO, "").is_err());
    }
}
