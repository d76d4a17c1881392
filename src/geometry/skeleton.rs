//! Reduction of filled outlines to approximate one-pixel centerlines.

use std::collections::HashSet;

use crate::{
    foundation::core::{Point, Rect},
    foundation::error::{CaptchaError, CaptchaResult},
    geometry::{
        curve,
        instruction::Instruction,
        object::VectorObject,
        path::VectorPath,
    },
};

/// Grid cells along the longer side of the outline at quality 1.0.
const BASE_CELLS: f64 = 32.0;
const MAX_CELLS: f64 = 1024.0;
const CURVE_STEPS: usize = 16;

/// Skeletonizes `object`; `quality` scales the sampling density.
pub fn skeletonize(object: &VectorObject, quality: f64) -> CaptchaResult<VectorObject> {
    if !quality.is_finite() || quality <= 0.0 {
        return Err(CaptchaError::range(format!(
            "skeleton quality must be > 0, got {quality}"
        )));
    }
    let Some(bounds) = object.bounds() else {
        return Ok(VectorObject::default());
    };
    let longest = bounds.width().max(bounds.height());
    if longest <= 0.0 {
        return Ok(VectorObject::default());
    }

    let cells = (BASE_CELLS * quality).ceil().clamp(4.0, MAX_CELLS);
    let grid = Grid::rasterize(&flatten(object), bounds, longest / cells);
    let thinned = grid.thin();
    Ok(thinned.trace())
}

/// Closed polygons approximating each contour.
fn flatten(object: &VectorObject) -> Vec<Vec<Point>> {
    let mut contours = Vec::new();
    for path in &object.paths {
        let mut path = path.clone();
        path.expand_shapes();
        let mut contour: Vec<Point> = Vec::new();
        let mut current = Point::ZERO;
        for i in &path.instructions {
            match i {
                Instruction::MoveTo([p]) => {
                    if contour.len() > 2 {
                        contours.push(std::mem::take(&mut contour));
                    }
                    contour.clear();
                    contour.push(*p);
                    current = *p;
                }
                Instruction::LineTo([p]) => {
                    if contour.is_empty() {
                        contour.push(current);
                    }
                    contour.push(*p);
                    current = *p;
                }
                Instruction::CubicTo([c1, c2, end]) => {
                    if contour.is_empty() {
                        contour.push(current);
                    }
                    let start = current;
                    contour.extend((1..=CURVE_STEPS).map(|s| {
                        curve::cubic_eval(start, *c1, *c2, *end, s as f64 / CURVE_STEPS as f64)
                    }));
                    current = *end;
                }
                Instruction::RationalTo {
                    points: [ctrl, end],
                    weight,
                } => {
                    if contour.is_empty() {
                        contour.push(current);
                    }
                    let start = current;
                    contour.extend((1..=CURVE_STEPS).map(|s| {
                        curve::conic_eval(start, *ctrl, *end, *weight, s as f64 / CURVE_STEPS as f64)
                    }));
                    current = *end;
                }
                Instruction::Close => {
                    if let Some(first) = contour.first() {
                        current = *first;
                    }
                    if contour.len() > 2 {
                        contours.push(std::mem::take(&mut contour));
                    }
                    contour.clear();
                }
                // Removed by expand_shapes above.
                Instruction::AddRect(_) | Instruction::AddOval(_) => {}
            }
        }
        if contour.len() > 2 {
            contours.push(contour);
        }
    }
    contours
}

/// Binary raster with a one-cell empty margin on every side.
struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    origin: Point,
    cell: f64,
}

impl Grid {
    fn rasterize(contours: &[Vec<Point>], bounds: Rect, cell: f64) -> Self {
        let cols = (bounds.width() / cell).ceil().max(1.0) as usize;
        let rows = (bounds.height() / cell).ceil().max(1.0) as usize;
        let mut grid = Self {
            width: cols + 2,
            height: rows + 2,
            cells: vec![false; (cols + 2) * (rows + 2)],
            origin: Point::new(bounds.x0, bounds.y0),
            cell,
        };

        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for row in 0..rows {
            let y = bounds.y0 + (row as f64 + 0.5) * cell;
            crossings.clear();
            for contour in contours {
                for (a, b) in contour.iter().zip(contour.iter().cycle().skip(1)) {
                    let (dir, lo, hi) = if a.y <= b.y { (1, a, b) } else { (-1, b, a) };
                    if y < lo.y || y >= hi.y || lo.y == hi.y {
                        continue;
                    }
                    let x = lo.x + (y - lo.y) / (hi.y - lo.y) * (hi.x - lo.x);
                    crossings.push((x, dir));
                }
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            // Non-zero winding spans.
            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let (x0, x1) = (pair[0].0, pair[1].0);
                for col in 0..cols {
                    let cx = bounds.x0 + (col as f64 + 0.5) * cell;
                    if cx >= x0 && cx < x1 {
                        let idx = grid.index(col + 1, row + 1);
                        grid.cells[idx] = true;
                    }
                }
            }
        }
        grid
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn get(&self, x: usize, y: usize) -> bool {
        self.cells[self.index(x, y)]
    }

    /// Neighbors P2..P9 clockwise from north.
    fn neighbors(&self, x: usize, y: usize) -> [bool; 8] {
        [
            self.get(x, y - 1),
            self.get(x + 1, y - 1),
            self.get(x + 1, y),
            self.get(x + 1, y + 1),
            self.get(x, y + 1),
            self.get(x - 1, y + 1),
            self.get(x - 1, y),
            self.get(x - 1, y - 1),
        ]
    }

    /// Zhang-Suen thinning.
    fn thin(mut self) -> Self {
        let mut removals = Vec::new();
        loop {
            let mut changed = false;
            for step in 0..2 {
                removals.clear();
                for y in 1..self.height - 1 {
                    for x in 1..self.width - 1 {
                        if !self.get(x, y) {
                            continue;
                        }
                        let n = self.neighbors(x, y);
                        let count = n.iter().filter(|&&v| v).count();
                        if !(2..=6).contains(&count) {
                            continue;
                        }
                        let transitions = (0..8).filter(|&i| !n[i] && n[(i + 1) % 8]).count();
                        if transitions != 1 {
                            continue;
                        }
                        let [p2, _, p4, _, p6, _, p8, _] = n;
                        let keep = if step == 0 {
                            (p2 && p4 && p6) || (p4 && p6 && p8)
                        } else {
                            (p2 && p4 && p8) || (p2 && p6 && p8)
                        };
                        if !keep {
                            removals.push(self.index(x, y));
                        }
                    }
                }
                for &idx in &removals {
                    self.cells[idx] = false;
                }
                changed |= !removals.is_empty();
            }
            if !changed {
                return self;
            }
        }
    }

    /// Skeleton neighbors of a set cell. Diagonals are skipped when an orthogonal
    /// neighbor already links the two cells.
    fn links(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        const ORTHO: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
        const DIAG: [(isize, isize); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];
        let at = |dx: isize, dy: isize| {
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;
            (nx < self.width && ny < self.height && self.get(nx, ny)).then_some((nx, ny))
        };
        let mut out: Vec<(usize, usize)> = ORTHO.iter().filter_map(|&(dx, dy)| at(dx, dy)).collect();
        for &(dx, dy) in &DIAG {
            if at(dx, 0).is_some() || at(0, dy).is_some() {
                continue;
            }
            if let Some(n) = at(dx, dy) {
                out.push(n);
            }
        }
        out
    }

    fn center(&self, (x, y): (usize, usize)) -> Point {
        Point::new(
            self.origin.x + (x as f64 - 0.5) * self.cell,
            self.origin.y + (y as f64 - 0.5) * self.cell,
        )
    }

    /// Walks skeleton cells into polylines, splitting at ends and junctions.
    fn trace(&self) -> VectorObject {
        let set: Vec<(usize, usize)> = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y))
            .collect();
        let mut visited: HashSet<((usize, usize), (usize, usize))> = HashSet::new();
        let edge = |a: (usize, usize), b: (usize, usize)| if a <= b { (a, b) } else { (b, a) };
        let mut paths = Vec::new();

        let walk = |start: (usize, usize), first: (usize, usize), visited: &mut HashSet<_>| {
            let mut path = VectorPath::new()
                .move_to(self.center(start))
                .line_to(self.center(first));
            visited.insert(edge(start, first));
            let (mut prev, mut cur) = (start, first);
            loop {
                let links = self.links(cur.0, cur.1);
                if links.len() != 2 {
                    break;
                }
                let next = if links[0] == prev { links[1] } else { links[0] };
                if !visited.insert(edge(cur, next)) {
                    break;
                }
                path.push(Instruction::line_to(self.center(next)));
                (prev, cur) = (cur, next);
            }
            path
        };

        // Open chains from ends and junctions first.
        for &cell in &set {
            let links = self.links(cell.0, cell.1);
            if links.is_empty() {
                let p = self.center(cell);
                paths.push(VectorPath::new().move_to(p).line_to(p));
                continue;
            }
            if links.len() == 2 {
                continue;
            }
            for n in links {
                if !visited.contains(&edge(cell, n)) {
                    paths.push(walk(cell, n, &mut visited));
                }
            }
        }
        // Whatever remains are closed loops.
        for &cell in &set {
            for n in self.links(cell.0, cell.1) {
                if !visited.contains(&edge(cell, n)) {
                    paths.push(walk(cell, n, &mut visited).close());
                }
            }
        }
        VectorObject::new(paths)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/skeleton.rs"]
mod tests;
