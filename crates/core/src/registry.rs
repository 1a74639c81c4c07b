//! Name to class-slot registry for one import batch.

use crate::error::{ImportError, Result};
use crate::model::ClassId;
use archscope_api::{ClassKind, is_array};
use dashmap::DashMap;
use smol_str::SmolStr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[derive(Debug, Clone)]
pub(crate) struct ClassSlot {
    pub name: SmolStr,
    pub declared: bool,
    pub kind: ClassKind,
}

/// Hands out exactly one [`ClassId`] per fully qualified name.
///
/// Unknown names get a placeholder slot on first request. Declaring the class
/// later flips the same slot to complete, so ids captured earlier stay valid.
#[derive(Debug)]
pub struct ClassRegistry {
    index: DashMap<SmolStr, ClassId>,
    slots: DashMap<ClassId, ClassSlot>,
    next_id: AtomicU32,
    frozen: AtomicBool,
    warn_on_late: bool,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ClassRegistry {
    pub fn new(warn_on_late: bool) -> Self {
        Self {
            index: DashMap::new(),
            slots: DashMap::new(),
            next_id: AtomicU32::new(0),
            frozen: AtomicBool::new(false),
            warn_on_late,
        }
    }

    /// Existing id for `name`, or a fresh placeholder. Never fails.
    pub fn get(&self, name: &str) -> ClassId {
        if let Some(id) = self.index.get(name) {
            return *id;
        }

        let mut created = false;
        let id = *self.index.entry(SmolStr::new(name)).or_insert_with(|| {
            created = true;
            let id = ClassId(self.next_id.fetch_add(1, Ordering::SeqCst));
            self.slots.insert(
                id,
                ClassSlot {
                    name: SmolStr::new(name),
                    declared: false,
                    kind: ClassKind::Class,
                },
            );
            id
        });

        if created {
            self.log_new_placeholder(name, id);
        }
        id
    }

    fn log_new_placeholder(&self, name: &str, id: ClassId) {
        if !self.frozen.load(Ordering::Acquire) {
            tracing::trace!("Registered placeholder {} as {:?}", name, id);
        } else if self.warn_on_late && !is_array(name) {
            tracing::warn!("Late placeholder {} requested after intake closed", name);
        } else {
            tracing::debug!("Late placeholder {} requested after intake closed", name);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.index.get(name).map(|id| *id)
    }

    /// Marks `name` as declared by the batch, promoting its placeholder if one
    /// was already handed out.
    pub fn declare(&self, name: &str, kind: ClassKind) -> Result<ClassId> {
        let id = self.get(name);
        let mut slot = self
            .slots
            .get_mut(&id)
            .ok_or_else(|| ImportError::Internal(format!("missing slot for {name}")))?;
        if slot.declared {
            return Err(ImportError::DuplicateClass(name.to_string()));
        }
        slot.declared = true;
        slot.kind = kind;
        Ok(id)
    }

    pub fn is_complete(&self, id: ClassId) -> bool {
        self.slots.get(&id).map(|s| s.declared).unwrap_or(false)
    }

    /// Declared kind; placeholders report `Class`.
    pub fn kind(&self, id: ClassId) -> ClassKind {
        self.slots.get(&id).map(|s| s.kind).unwrap_or_default()
    }

    pub fn name(&self, id: ClassId) -> Option<SmolStr> {
        self.slots.get(&id).map(|s| s.name.clone())
    }

    pub fn len(&self) -> usize {
        self.next_id.load(Ordering::SeqCst) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Closes intake. Later placeholder requests are still served but logged.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Slots in id order.
    pub(crate) fn into_slots(self) -> Vec<ClassSlot> {
        let mut slots: Vec<(ClassId, ClassSlot)> = self.slots.into_iter().collect();
        slots.sort_by_key(|(id, _)| *id);
        slots.into_iter().map(|(_, slot)| slot).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_same_name_same_slot() {
        let registry = ClassRegistry::default();
        let a = registry.get("p.Foo");
        let b = registry.get("p.Foo");
        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_complete(a));
    }

    #[test]
    fn test_declare_promotes_placeholder_in_place() {
        let registry = ClassRegistry::default();
        let early = registry.get("p.Foo");
        let declared = registry.declare("p.Foo", ClassKind::Interface).unwrap();
        assert_eq!(early, declared);
        assert!(registry.is_complete(early));
        assert_eq!(registry.kind(early), ClassKind::Interface);
    }

    #[test]
    fn test_second_declaration_is_rejected() {
        let registry = ClassRegistry::default();
        registry.declare("p.Foo", ClassKind::Class).unwrap();
        let err = registry.declare("p.Foo", ClassKind::Class).unwrap_err();
        assert!(matches!(err, ImportError::DuplicateClass(name) if name == "p.Foo"));
    }

    #[test]
    fn test_concurrent_gets_agree() {
        let registry = Arc::new(ClassRegistry::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    (0..100)
                        .map(|i| registry.get(&format!("p.C{i}")))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let results: Vec<Vec<ClassId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(registry.len(), 100);
    }

    #[test]
    fn test_into_slots_is_id_ordered() {
        let registry = ClassRegistry::default();
        registry.get("b");
        registry.get("a");
        let names: Vec<_> = registry.into_slots().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
