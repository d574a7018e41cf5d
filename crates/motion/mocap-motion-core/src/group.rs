//! Named, ordered set of bindings played together.

use crate::binding::{Binding, BodyRemap, TableMemo};
use crate::ids::{BindingId, GroupId};
use crate::target::{BodyResolver, Renderer};
use crate::Result;

pub const DEFAULT_GROUP_NAME: &str = "Animation Group";

#[derive(Clone, Debug)]
pub struct BindingGroup {
    id: GroupId,
    name: String,
    bindings: Vec<Binding>,
}

impl Default for BindingGroup {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP_NAME)
    }
}

impl BindingGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GroupId::next(),
            name: name.into(),
            bindings: Vec::new(),
        }
    }

    /// Group holding `bindings`; later duplicates of an id are dropped.
    pub fn with_bindings(name: impl Into<String>, bindings: impl IntoIterator<Item = Binding>) -> Self {
        let mut group = Self::new(name);
        for binding in bindings {
            if !group.contains(binding.id()) {
                group.bindings.push(binding);
            }
        }
        group
    }

    #[inline]
    pub fn id(&self) -> GroupId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>, renderer: &dyn Renderer) {
        self.name = name.into();
        renderer.update_ui();
    }

    #[inline]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.id() == id)
    }

    pub fn binding_mut(&mut self, id: BindingId) -> Option<&mut Binding> {
        self.bindings.iter_mut().find(|b| b.id() == id)
    }

    #[inline]
    pub fn contains(&self, id: BindingId) -> bool {
        self.binding(id).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Append `binding` unless a binding with the same id is already a member.
    pub fn add(&mut self, binding: Binding, renderer: &dyn Renderer) -> bool {
        if self.contains(binding.id()) {
            return false;
        }
        self.bindings.push(binding);
        renderer.update_ui();
        true
    }

    /// Remove the member with `id`, if any.
    pub fn remove(&mut self, id: BindingId, renderer: &dyn Renderer) -> Option<Binding> {
        let index = self.bindings.iter().position(|b| b.id() == id)?;
        let removed = self.bindings.remove(index);
        renderer.update_ui();
        Some(removed)
    }

    /// Earliest member start, `0` when empty.
    pub fn start_time(&self) -> f64 {
        self.bindings
            .iter()
            .map(Binding::start_time)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Latest member end, `1` when empty.
    pub fn end_time(&self) -> f64 {
        self.bindings
            .iter()
            .map(Binding::end_time)
            .reduce(f64::max)
            .unwrap_or(1.0)
    }

    /// Drive every member binding to `global_time`.
    pub fn update(&self, global_time: f64, bodies: &mut dyn BodyResolver) {
        for binding in &self.bindings {
            binding.update(global_time, bodies);
        }
    }

    /// Copy with a fresh id, cloning each binding onto the remapped bodies.
    pub fn clone_with(&self, bodies: &BodyRemap, tables: &mut TableMemo) -> Result<Self> {
        let bindings = self
            .bindings
            .iter()
            .map(|b| b.clone_with(bodies, tables))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::with_bindings(self.name.clone(), bindings))
    }
}
