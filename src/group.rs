//! Same-kind entity collections with bulk update, draw and collision queries.

use crate::collision::{Rect, Sprite};
use crate::entities::{entities_overlap, Entity, Lifecycle, Visual};

/// Members keep insertion order; collision queries report the earliest match.
#[derive(Clone, Debug)]
pub struct Group<T> {
    members: Vec<T>,
}

impl<T> Default for Group<T> {
    fn default() -> Self {
        Group {
            members: Vec::new(),
        }
    }
}

impl<T: Entity> Group<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, member: T) {
        self.members.push(member);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.members.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.members.iter_mut()
    }

    /// Run `f` on every member in order, dropping the ones that expire.
    pub fn update(&mut self, mut f: impl FnMut(&mut T) -> Lifecycle) {
        self.members.retain_mut(|m| f(m) == Lifecycle::Alive);
    }

    /// Bounding-box query.
    pub fn first_colliding(&self, area: &Rect) -> Option<usize> {
        self.members.iter().position(|m| m.bounds().intersects(area))
    }

    /// Remove and return the first member whose box overlaps `area`.
    pub fn remove_first_colliding(&mut self, area: &Rect) -> Option<T> {
        self.first_colliding(area).map(|i| self.members.remove(i))
    }

    /// Per-pixel query against another entity.
    pub fn first_mask_colliding_mut(&mut self, other: &impl Entity) -> Option<&mut T> {
        self.members.iter_mut().find(|m| entities_overlap(&**m, other))
    }

    /// Everything the renderer needs for one bulk draw.
    pub fn visuals(&self) -> impl Iterator<Item = ((i32, i32), &'static Sprite, Visual)> + '_ {
        self.members
            .iter()
            .map(|m| (m.position(), m.sprite(), m.visual()))
    }
}
