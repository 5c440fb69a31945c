use std::sync::Arc;

use shared::domain::LegalDongSelection;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Slot {
    selection: LegalDongSelection,
    revision: u64,
}

/// The one shared "selected legal-dong" value. Clones share the same slot.
///
/// Only validated [`LegalDongSelection`]s (or the empty one) are ever stored. Every write
/// bumps a revision so readers holding their own copy can tell when to resync.
#[derive(Debug, Clone, Default)]
pub struct SelectionSlot {
    inner: Arc<RwLock<Slot>>,
}

impl SelectionSlot {
    pub async fn current(&self) -> LegalDongSelection {
        self.inner.read().await.selection.clone()
    }

    pub async fn revision(&self) -> u64 {
        self.inner.read().await.revision
    }

    pub(crate) async fn snapshot(&self) -> (u64, LegalDongSelection) {
        let slot = self.inner.read().await;
        (slot.revision, slot.selection.clone())
    }

    /// Replaces code and name together and returns the new revision.
    pub async fn replace(&self, selection: LegalDongSelection) -> u64 {
        let mut slot = self.inner.write().await;
        slot.selection = selection;
        slot.revision += 1;
        slot.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_one_value() {
        let slot = SelectionSlot::default();
        let other = slot.clone();

        let selection = LegalDongSelection::new("4122010600", "세교동").expect("valid");
        other.replace(selection.clone()).await;
        assert_eq!(slot.current().await, selection);
    }

    #[tokio::test]
    async fn every_write_bumps_the_revision() {
        let slot = SelectionSlot::default();
        assert_eq!(slot.revision().await, 0);

        let selection = LegalDongSelection::new("4122010600", "세교동").expect("valid");
        assert_eq!(slot.replace(selection.clone()).await, 1);
        assert_eq!(slot.replace(selection.clone()).await, 2);
        assert_eq!(slot.snapshot().await, (2, selection));
    }
}
