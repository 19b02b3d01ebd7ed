use crate::api::types::ObjectId;

#[derive(Debug)]
enum Slot<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32 },
}

/// Slot storage with O(1) insert and removal. Freed slots are reused with a
/// bumped generation, so stale [`ObjectId`]s never alias a newer object.
#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// The id the next [`insert`](Self::insert) will hand out.
    pub fn next_id(&self) -> ObjectId {
        match self.free.last() {
            Some(&index) => {
                let generation = match &self.slots[index as usize] {
                    Slot::Vacant { generation } | Slot::Occupied { generation, .. } => *generation,
                };
                ObjectId::new(index, generation)
            }
            None => ObjectId::new(self.slots.len() as u32, 0),
        }
    }

    pub fn insert(&mut self, value: T) -> ObjectId {
        let id = self.next_id();
        if self.free.pop().is_some() {
            self.slots[id.index as usize] = Slot::Occupied {
                generation: id.generation,
                value,
            };
        } else {
            self.slots.push(Slot::Occupied {
                generation: id.generation,
                value,
            });
        }
        self.len += 1;
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        match slot {
            Slot::Occupied { generation, .. } if *generation == id.generation => {}
            _ => return None,
        }
        let vacant = Slot::Vacant {
            generation: id.generation.wrapping_add(1),
        };
        match std::mem::replace(slot, vacant) {
            Slot::Occupied { value, .. } => {
                self.free.push(id.index);
                self.len -= 1;
                Some(value)
            }
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&T> {
        match self.slots.get(id.index as usize)? {
            Slot::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        match self.slots.get_mut(id.index as usize)? {
            Slot::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Live objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            Slot::Occupied { generation, value } => Some((ObjectId::new(i as u32, *generation), value)),
            Slot::Vacant { .. } => None,
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| match slot {
            Slot::Occupied { generation, value } => Some((ObjectId::new(i as u32, *generation), value)),
            Slot::Vacant { .. } => None,
        })
    }

    /// Visit every live object once. Objects for which `keep` returns `false`
    /// are freed in place. Returns how many were freed.
    pub fn sweep(&mut self, mut keep: impl FnMut(ObjectId, &mut T) -> bool) -> usize {
        let mut freed = 0;
        for index in 0..self.slots.len() {
            let id = match &mut self.slots[index] {
                Slot::Occupied { generation, value } => {
                    let id = ObjectId::new(index as u32, *generation);
                    if keep(id, value) {
                        continue;
                    }
                    id
                }
                Slot::Vacant { .. } => continue,
            };
            if self.remove(id).is_some() {
                freed += 1;
            }
        }
        freed
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.remove(a), Some("a"));
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn stale_id_does_not_alias_reused_slot() {
        let mut arena = Arena::new();
        let old = arena.insert(1);
        arena.remove(old);
        let new = arena.insert(2);
        assert_eq!(new.index, old.index);
        assert_ne!(new.generation, old.generation);
        assert_eq!(arena.get(old), None);
        assert_eq!(arena.remove(old), None);
        assert_eq!(arena.get(new), Some(&2));
    }

    #[test]
    fn next_id_predicts_insert() {
        let mut arena = Arena::new();
        let first = arena.insert('x');
        assert_eq!(arena.next_id(), ObjectId::new(1, 0));
        arena.remove(first);
        let predicted = arena.next_id();
        assert_eq!(arena.insert('y'), predicted);
    }

    #[test]
    fn sweep_frees_rejected_and_is_idempotent() {
        let mut arena = Arena::new();
        for i in 0..6 {
            arena.insert(i);
        }
        let freed = arena.sweep(|_, v| *v % 2 == 0);
        assert_eq!(freed, 3);
        assert_eq!(arena.len(), 3);
        let values: Vec<_> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![0, 2, 4]);

        let freed_again = arena.sweep(|_, v| *v % 2 == 0);
        assert_eq!(freed_again, 0);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn sweep_can_mutate_survivors() {
        let mut arena = Arena::new();
        let id = arena.insert(10);
        arena.sweep(|_, v| {
            *v += 1;
            true
        });
        assert_eq!(arena.get(id), Some(&11));
    }
}
