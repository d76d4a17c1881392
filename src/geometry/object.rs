use crate::{
    foundation::core::{Point, Rect, Vec2},
    geometry::{path::VectorPath, transform},
};

/// One semantic shape (a character, a noise line) made of paths.
///
/// `Clone` is a deep copy: cached objects are handed out as clones so consumers can
/// transform them in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorObject {
    pub paths: Vec<VectorPath>,
}

impl VectorObject {
    pub fn new(paths: Vec<VectorPath>) -> Self {
        Self { paths }
    }

    pub fn from_path(path: VectorPath) -> Self {
        Self { paths: vec![path] }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.iter().all(VectorPath::is_empty)
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.paths
            .iter()
            .filter_map(VectorPath::bounds)
            .reduce(|a, b| a.union(b))
    }

    pub fn center(&self) -> Option<Point> {
        self.bounds().map(|r| r.center())
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.paths.iter().flat_map(VectorPath::points)
    }

    fn for_each_point_mut(&mut self, mut f: impl FnMut(&mut Point)) {
        for path in &mut self.paths {
            path.for_each_point_mut(&mut f);
        }
    }

    /// Moves every point by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let delta = Vec2::new(dx, dy);
        self.for_each_point_mut(|p| *p = transform::translate(*p, delta));
    }

    pub fn scale(&mut self, base: Point, sx: f64, sy: f64) {
        self.for_each_point_mut(|p| *p = transform::scale(*p, base, sx, sy));
    }

    pub fn scale_uniform(&mut self, base: Point, factor: f64) {
        self.scale(base, factor, factor);
    }

    /// Rotates about `base` by `degrees` (taken mod 360).
    pub fn rotate(&mut self, base: Point, degrees: f64) {
        if !transform::is_quarter_turn(degrees) {
            for path in &mut self.paths {
                path.expand_shapes();
            }
        }
        self.for_each_point_mut(|p| *p = transform::rotate(*p, base, degrees));
    }

    pub fn extend(&mut self, other: VectorObject) {
        self.paths.extend(other.paths);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/object.rs"]
mod tests;
