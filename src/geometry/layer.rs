use crate::{foundation::core::Rect, geometry::object::VectorObject};

/// Ordered vector objects; insertion order is drawing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorLayer {
    pub objects: Vec<VectorObject>,
}

impl VectorLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: VectorObject) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.objects
            .iter()
            .filter_map(VectorObject::bounds)
            .reduce(|a, b| a.union(b))
    }
}
