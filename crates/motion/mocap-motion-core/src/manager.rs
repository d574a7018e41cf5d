//! Playback manager: owns binding groups split into an active and a stored
//! partition and drives the active ones from a single playhead.
//!
//! Invariants:
//! - a group id appears in at most one of `active` / `stored`;
//! - every id in either partition names a group in the pool, and the pool
//!   holds nothing else;
//! - after `set_time` the playhead lies within the active extent.

use hashbrown::HashMap;
use indexmap::IndexMap;

use crate::binding::{Binding, BodyRemap, TableMemo};
use crate::group::BindingGroup;
use crate::ids::{BindingId, GroupId};
use crate::target::{BodyResolver, Collaborators};
use crate::Result;

#[derive(Debug, Default)]
pub struct PlaybackManager {
    groups: IndexMap<GroupId, BindingGroup>,
    active: Vec<GroupId>,
    stored: Vec<GroupId>,
    playhead: f64,
    collaborators: Collaborators,
}

impl PlaybackManager {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            groups: IndexMap::new(),
            active: Vec::new(),
            stored: Vec::new(),
            playhead: 0.0,
            collaborators,
        }
    }

    #[inline]
    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Take ownership of `group` (replacing any group with the same id) and
    /// make it active.
    pub fn add_active(&mut self, group: BindingGroup) -> GroupId {
        let id = group.id();
        self.groups.insert(id, group);
        self.activate(id);
        id
    }

    /// Take ownership of `group` and put it in storage.
    pub fn add_stored(&mut self, group: BindingGroup) -> GroupId {
        let id = group.id();
        self.groups.insert(id, group);
        self.store(id);
        id
    }

    /// Move an owned group to the active partition. `false` if unknown.
    pub fn activate(&mut self, id: GroupId) -> bool {
        if !self.groups.contains_key(&id) {
            return false;
        }
        self.detach(id);
        self.active.push(id);
        self.collaborators.renderer.update_ui();
        true
    }

    /// Move an owned group to storage. `false` if unknown.
    pub fn store(&mut self, id: GroupId) -> bool {
        if !self.groups.contains_key(&id) {
            return false;
        }
        self.detach(id);
        self.stored.push(id);
        self.collaborators.renderer.update_ui();
        true
    }

    fn detach(&mut self, id: GroupId) {
        self.active.retain(|g| *g != id);
        self.stored.retain(|g| *g != id);
    }

    /// Drop the group from the active partition and hand it back.
    pub fn remove_active(&mut self, id: GroupId) -> Option<BindingGroup> {
        let index = self.active.iter().position(|g| *g == id)?;
        self.active.remove(index);
        self.collaborators.renderer.update_ui();
        self.groups.shift_remove(&id)
    }

    /// Drop the group from storage and hand it back.
    pub fn remove_stored(&mut self, id: GroupId) -> Option<BindingGroup> {
        let index = self.stored.iter().position(|g| *g == id)?;
        self.stored.remove(index);
        self.collaborators.renderer.update_ui();
        self.groups.shift_remove(&id)
    }

    /// Drop the group from whichever partition holds it.
    pub fn remove_group(&mut self, id: GroupId) -> Option<BindingGroup> {
        self.remove_active(id).or_else(|| self.remove_stored(id))
    }

    /// Move every active group to the end of storage.
    pub fn store_all(&mut self) {
        let active = std::mem::take(&mut self.active);
        self.stored.extend(active);
        self.collaborators.renderer.update_ui();
    }

    /// Make every group active, stored ones first.
    pub fn activate_all(&mut self) {
        let mut active = std::mem::take(&mut self.stored);
        active.append(&mut self.active);
        self.active = active;
        self.collaborators.renderer.update_ui();
    }

    pub fn clear(&mut self) {
        self.groups.clear();
        self.active.clear();
        self.stored.clear();
    }

    pub fn active_ids(&self) -> &[GroupId] {
        &self.active
    }

    pub fn stored_ids(&self) -> &[GroupId] {
        &self.stored
    }

    pub fn is_active(&self, id: GroupId) -> bool {
        self.active.contains(&id)
    }

    pub fn is_stored(&self, id: GroupId) -> bool {
        self.stored.contains(&id)
    }

    pub fn active_groups(&self) -> impl Iterator<Item = &BindingGroup> {
        self.active.iter().filter_map(|id| self.groups.get(id))
    }

    pub fn stored_groups(&self) -> impl Iterator<Item = &BindingGroup> {
        self.stored.iter().filter_map(|id| self.groups.get(id))
    }

    /// All groups, active first.
    pub fn groups(&self) -> impl Iterator<Item = &BindingGroup> {
        self.active_groups().chain(self.stored_groups())
    }

    pub fn group(&self, id: GroupId) -> Option<&BindingGroup> {
        self.groups.get(&id)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut BindingGroup> {
        self.groups.get_mut(&id)
    }

    /// Find a binding in any owned group.
    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        self.groups().find_map(|g| g.binding(id))
    }

    pub fn binding_mut(&mut self, id: BindingId) -> Option<&mut Binding> {
        self.groups.values_mut().find_map(|g| g.binding_mut(id))
    }

    /// Current playhead.
    #[inline]
    pub fn time(&self) -> f64 {
        self.playhead
    }

    /// Earliest active start, `0` without active groups.
    pub fn start_time(&self) -> f64 {
        self.active_groups()
            .map(BindingGroup::start_time)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Latest active end, `1` without active groups.
    pub fn end_time(&self) -> f64 {
        self.active_groups()
            .map(BindingGroup::end_time)
            .reduce(f64::max)
            .unwrap_or(1.0)
    }

    /// Move the playhead, clamp it to the active extent, drive every active
    /// group and ask the host to refresh.
    pub fn set_time(&mut self, time: f64, bodies: &mut dyn BodyResolver) {
        let mut t = time;
        let end = self.end_time();
        if t > end {
            t = end;
        }
        let start = self.start_time();
        if t < start {
            t = start;
        }
        self.playhead = t;

        for group in self.active_groups() {
            group.update(t, bodies);
        }
        self.collaborators.refresh();
    }

    /// Restore a playhead without clamping or driving groups.
    pub(crate) fn restore_time(&mut self, time: f64) {
        self.playhead = time;
    }

    /// Duplicate every group onto remapped bodies. Each distinct group and
    /// each distinct table is copied exactly once.
    pub fn clone_with(&self, bodies: &BodyRemap) -> Result<Self> {
        let mut tables = TableMemo::new();
        let mut cloned: HashMap<GroupId, GroupId> = HashMap::new();
        let mut out = Self::new(self.collaborators.clone());

        for (ids, activate) in [(&self.active, true), (&self.stored, false)] {
            for id in ids {
                let copy_id = match cloned.get(id) {
                    Some(copy_id) => *copy_id,
                    None => {
                        let Some(group) = self.groups.get(id) else {
                            continue;
                        };
                        let copy = group.clone_with(bodies, &mut tables)?;
                        let copy_id = copy.id();
                        out.groups.insert(copy_id, copy);
                        cloned.insert(*id, copy_id);
                        copy_id
                    }
                };
                if activate {
                    out.activate(copy_id);
                } else {
                    out.store(copy_id);
                }
            }
        }
        out.playhead = self.playhead;
        Ok(out)
    }
}
