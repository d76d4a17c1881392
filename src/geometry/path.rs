use crate::{
    foundation::core::{Point, Rect},
    geometry::instruction::Instruction,
};

/// Ordered instruction list. May or may not end with `Close`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorPath {
    pub instructions: Vec<Instruction>,
}

impl VectorPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn move_to(mut self, p: Point) -> Self {
        self.push(Instruction::move_to(p));
        self
    }

    pub fn line_to(mut self, p: Point) -> Self {
        self.push(Instruction::line_to(p));
        self
    }

    pub fn cubic_to(mut self, c1: Point, c2: Point, end: Point) -> Self {
        self.push(Instruction::cubic_to(c1, c2, end));
        self
    }

    pub fn rational_to(mut self, ctrl: Point, end: Point, weight: f64) -> Self {
        self.push(Instruction::rational_to(ctrl, end, weight));
        self
    }

    pub fn rect(mut self, a: Point, b: Point) -> Self {
        self.push(Instruction::rect(a, b));
        self
    }

    pub fn oval(mut self, a: Point, b: Point) -> Self {
        self.push(Instruction::oval(a, b));
        self
    }

    pub fn close(mut self) -> Self {
        self.push(Instruction::Close);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.instructions.last(), Some(Instruction::Close))
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.instructions
            .iter()
            .flat_map(|i| i.points().iter().copied())
    }

    pub(crate) fn for_each_point_mut(&mut self, mut f: impl FnMut(&mut Point)) {
        for i in &mut self.instructions {
            for p in i.points_mut() {
                f(p);
            }
        }
    }

    /// Union of every instruction's tight bounds; `None` when nothing is drawn.
    pub fn bounds(&self) -> Option<Rect> {
        let mut current: Option<Point> = None;
        let mut contour_start: Option<Point> = None;
        let mut bounds: Option<Rect> = None;

        for i in &self.instructions {
            if let Some(b) = i.bounds(current) {
                bounds = Some(bounds.map_or(b, |r| r.union(b)));
            }
            match i {
                Instruction::MoveTo([p]) => {
                    contour_start = Some(*p);
                    current = Some(*p);
                }
                Instruction::AddRect(_) | Instruction::AddOval(_) => {
                    contour_start = i.end_point();
                    current = contour_start;
                }
                Instruction::Close => current = contour_start,
                Instruction::LineTo(_)
                | Instruction::CubicTo(_)
                | Instruction::RationalTo { .. } => {
                    if current.is_none() {
                        contour_start = Some(Point::ZERO);
                    }
                    current = i.end_point();
                }
            }
        }
        bounds
    }

    pub(crate) fn expand_shapes(&mut self) {
        if !self
            .instructions
            .iter()
            .any(|i| matches!(i, Instruction::AddRect(_) | Instruction::AddOval(_)))
        {
            return;
        }
        self.instructions = self.instructions.iter().flat_map(Instruction::expand).collect();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/path.rs"]
mod tests;
