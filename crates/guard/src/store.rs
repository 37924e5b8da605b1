use shopfloor_core::RoutePath;

/// Where the "last intended path" is kept between a redirect-to-login and
/// the post-login hop back.
///
/// The storage backend is a collaborator concern (browser storage, an app
/// preference file); the guard only needs save-then-take-once semantics.
pub trait IntendedPathStore {
    fn save(&mut self, path: RoutePath);

    /// Remove and return the captured path, if any.
    fn take(&mut self) -> Option<RoutePath>;
}

/// Single-slot in-process store. Last write wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InMemoryIntendedPath {
    slot: Option<RoutePath>,
}

impl InMemoryIntendedPath {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IntendedPathStore for InMemoryIntendedPath {
    fn save(&mut self, path: RoutePath) {
        self.slot = Some(path);
    }

    fn take(&mut self) -> Option<RoutePath> {
        self.slot.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_empties_the_slot() {
        let mut store = InMemoryIntendedPath::new();
        store.save(RoutePath::new("/inventory/items"));

        assert_eq!(store.take(), Some(RoutePath::new("/inventory/items")));
        assert_eq!(store.take(), None);
    }

    #[test]
    fn last_write_wins() {
        let mut store = InMemoryIntendedPath::new();
        store.save(RoutePath::new("/pos"));
        store.save(RoutePath::new("/workshop"));

        assert_eq!(store.take(), Some(RoutePath::new("/workshop")));
    }
}
