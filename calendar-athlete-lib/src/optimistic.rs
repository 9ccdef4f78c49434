//src/optimistic.rs
//! Optimistic local updates with a single-step rollback.

/// Lifecycle of one optimistic mutation.
///
/// `begin` swaps the new value into place and keeps the previous one as the
/// snapshot. The transaction then settles exactly once: `commit` installs the
/// value confirmed by the store, `roll_back` restores the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction<T> {
    Pending(T),
    Committed,
    RolledBack(T),
}

impl<T: Clone> Transaction<T> {
    pub fn begin(state: &mut T, next: T) -> Self {
        Self::Pending(std::mem::replace(state, next))
    }

    pub fn commit(self, state: &mut T, confirmed: T) -> Self {
        match self {
            Self::Pending(_) => {
                *state = confirmed;
                Self::Committed
            }
            settled => settled,
        }
    }

    pub fn roll_back(self, state: &mut T) -> Self {
        match self {
            Self::Pending(snapshot) => {
                *state = snapshot.clone();
                Self::RolledBack(snapshot)
            }
            settled => settled,
        }
    }

    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Applies `next` to `state` before persisting it.
///
/// `persist` sees the optimistic value and returns the canonical value to
/// keep (it may differ, e.g. an emptied workout that was deleted instead of
/// saved). When `persist` fails the previous value is restored and the error
/// is returned.
pub fn apply<T, E, F>(state: &mut T, next: T, persist: F) -> Result<Transaction<T>, E>
where
    T: Clone,
    F: FnOnce(&T) -> Result<T, E>,
{
    let tx = Transaction::begin(state, next);
    match persist(&*state) {
        Ok(confirmed) => Ok(tx.commit(state, confirmed)),
        Err(e) => {
            tx.roll_back(state);
            Err(e)
        }
    }
}
