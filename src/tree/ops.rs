//! Merge tree operations
//!
//! Every operation validates its references and protection rules before
//! touching anything, so a refused operation leaves the tree unchanged.
//! Afterwards empty slots and columns are removed and a sidebar whose slot no
//! longer shows duplicates is closed.

use super::model::{MergeTree, MergeTreeReference, MergeTreeWord, SidebarRef, Slot, new_slot_id};
use crate::error::{Error, Result};
use crate::types::{Flag, Guid};
use tracing::{debug, warn};

impl MergeTree {
    /// Fold the sense(s) at `src` into the slot at `dest`, appended at the end.
    ///
    /// `src` may be a whole slot or one sidebar item; `dest` must be a whole
    /// slot. Dropping a slot onto itself does nothing.
    pub fn combine_sense(
        &mut self,
        src: &MergeTreeReference,
        dest: &MergeTreeReference,
    ) -> Result<()> {
        if dest.order.is_some() {
            return Err(Error::InvalidReference(
                "merge destination must be a whole slot".to_string(),
            ));
        }
        let (src_ci, src_si) = self.resolve(src)?;
        self.resolve(dest)?;
        if src.column == dest.column && src.slot == dest.slot {
            debug!(slot = %src.slot, "ignoring combine of a slot into itself");
            return Ok(());
        }

        let (guids, whole) = self.extraction(src_ci, src_si, src.order);
        if !self.override_protection {
            if let Some(guid) = guids.iter().find(|g| self.is_protected_sense(g)) {
                return Err(Error::Protected(format!(
                    "protected sense {guid} cannot become a duplicate"
                )));
            }
        }
        self.check_last_slot(src_ci, whole, "merge away")?;

        debug!(from = %src.slot, into = %dest.slot, count = guids.len(), "combining senses");
        self.take(src_ci, src_si, src.order, whole);
        let (dest_ci, dest_si) = self.resolve(dest)?;
        self.columns[dest_ci].slots[dest_si].guids.extend(guids);

        self.drop_column_if_empty(&src.column, Some(&dest.column));
        self.normalize_sidebar();
        Ok(())
    }

    /// Move a slot, or promote one sidebar item to a new slot, into
    /// `dest_column` at position `dest_order`.
    ///
    /// The destination column is created if it does not exist. A promoted
    /// item always gets a freshly minted slot id. Moving a whole slot within
    /// its own column is a reorder.
    pub fn move_sense(
        &mut self,
        src: &MergeTreeReference,
        dest_column: &str,
        dest_order: usize,
    ) -> Result<()> {
        let (src_ci, src_si) = self.resolve(src)?;
        if src.order.is_none() && src.column == dest_column {
            return self.order_sense(src, dest_order);
        }

        let creating = self.find_column(dest_column).is_none();
        if creating && self.is_audio_source(dest_column) {
            return Err(Error::InvalidReference(format!(
                "column {dest_column} was merged into another word"
            )));
        }
        let slot_goes = src.order.is_none() || self.columns[src_ci].slots[src_si].guids.len() == 1;
        if src.column != dest_column {
            self.check_last_slot(src_ci, slot_goes, "move away")?;
        }

        let moved = match src.order {
            None => self.columns[src_ci].slots.remove(src_si),
            Some(i) => {
                let guid = self.columns[src_ci].slots[src_si].guids.remove(i);
                if self.columns[src_ci].slots[src_si].guids.is_empty() {
                    self.columns[src_ci].slots.remove(src_si);
                }
                Slot {
                    id: new_slot_id(),
                    guids: vec![guid],
                }
            }
        };
        debug!(slot = %moved.id, to = dest_column, at = dest_order, "moving slot");

        let dest_ci = match self.find_column(dest_column) {
            Some(ci) => ci,
            None => {
                let vern = self.columns[src_ci].vern.clone();
                let column = self.new_column(dest_column, &vern);
                self.columns.push(column);
                self.columns.len() - 1
            }
        };
        let slots = &mut self.columns[dest_ci].slots;
        let at = dest_order.min(slots.len());
        slots.insert(at, moved);

        self.drop_column_if_empty(&src.column, Some(dest_column));
        self.normalize_sidebar();
        Ok(())
    }

    /// Reorder a slot within its column, or an item within its slot
    pub fn order_sense(&mut self, src: &MergeTreeReference, dest_order: usize) -> Result<()> {
        let (ci, si) = self.resolve(src)?;
        match src.order {
            None => {
                let slots = &mut self.columns[ci].slots;
                let to = dest_order.min(slots.len() - 1);
                if to == si {
                    return Ok(());
                }
                let slot = slots.remove(si);
                slots.insert(to, slot);
            }
            Some(from) => {
                let guids = &mut self.columns[ci].slots[si].guids;
                let to = dest_order.min(guids.len() - 1);
                if to == from {
                    return Ok(());
                }
                let guid = guids.remove(from);
                guids.insert(to, guid);
            }
        }
        debug!(slot = %src.slot, item = ?src.order, to = dest_order, "reordered");
        Ok(())
    }

    /// Delete the sense(s) at `src`.
    ///
    /// Refused without override when it would delete a protected sense or the
    /// last slot of a protected word.
    pub fn delete_sense(&mut self, src: &MergeTreeReference) -> Result<()> {
        let (ci, si) = self.resolve(src)?;
        let (guids, whole) = self.extraction(ci, si, src.order);
        if !self.override_protection {
            if let Some(guid) = guids.iter().find(|g| self.is_protected_sense(g)) {
                return Err(Error::Protected(format!(
                    "protected sense {guid} cannot be deleted"
                )));
            }
        }
        self.check_last_slot(ci, whole, "delete")?;

        debug!(slot = %src.slot, count = guids.len(), "deleting senses");
        self.take(ci, si, src.order, whole);
        self.deleted_sense_guids.extend(guids);

        self.drop_column_if_empty(&src.column, None);
        self.normalize_sidebar();
        Ok(())
    }

    /// Set or clear the flag of a column's output word
    pub fn flag_word(&mut self, column: &str, flag: Flag) -> Result<()> {
        let ci = self.column_index(column)?;
        self.columns[ci].flag = flag;
        Ok(())
    }

    /// Override the vernacular form of a column's output word
    pub fn set_vernacular(&mut self, column: &str, vern: &str) -> Result<()> {
        let ci = self.column_index(column)?;
        self.columns[ci].vern = vern.to_string();
        Ok(())
    }

    /// Show a slot's duplicates in the sidebar.
    ///
    /// A slot holding a single guid has nothing to show, so the sidebar stays
    /// closed.
    pub fn open_sidebar(&mut self, column: &str, slot: &str) -> Result<()> {
        self.resolve(&MergeTreeReference::slot(column, slot))?;
        self.sidebar = Some(SidebarRef {
            column: column.to_string(),
            slot: slot.to_string(),
        });
        self.normalize_sidebar();
        Ok(())
    }

    /// Close the sidebar
    pub fn close_sidebar(&mut self) {
        self.sidebar = None;
    }

    fn find_column(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column)
    }

    fn column_index(&self, column: &str) -> Result<usize> {
        self.find_column(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))
    }

    /// Column and slot indices of a reference, checking the item index
    fn resolve(&self, r: &MergeTreeReference) -> Result<(usize, usize)> {
        let ci = self.column_index(&r.column)?;
        let slots = &self.columns[ci].slots;
        let si = slots
            .iter()
            .position(|s| s.id == r.slot)
            .ok_or_else(|| Error::SlotNotFound {
                column: r.column.clone(),
                slot: r.slot.clone(),
            })?;
        if let Some(order) = r.order {
            if order >= slots[si].guids.len() {
                return Err(Error::InvalidReference(format!(
                    "item {order} out of range in slot {}",
                    r.slot
                )));
            }
        }
        Ok((ci, si))
    }

    /// Guids a reference takes out of its slot, and whether the slot goes with them.
    ///
    /// An item of a single-guid slot is the whole slot.
    fn extraction(&self, ci: usize, si: usize, order: Option<usize>) -> (Vec<Guid>, bool) {
        let guids = &self.columns[ci].slots[si].guids;
        match order {
            Some(i) if guids.len() > 1 => (vec![guids[i].clone()], false),
            _ => (guids.clone(), true),
        }
    }

    fn take(&mut self, ci: usize, si: usize, order: Option<usize>, whole: bool) {
        let slots = &mut self.columns[ci].slots;
        match order {
            Some(i) if !whole => {
                slots[si].guids.remove(i);
            }
            _ => {
                slots.remove(si);
            }
        }
    }

    fn is_protected_sense(&self, guid: &str) -> bool {
        self.data.sense(guid).is_some_and(|s| s.protected)
    }

    fn is_audio_source(&self, column: &str) -> bool {
        self.audio_moves
            .values()
            .any(|sources| sources.iter().any(|s| s == column))
    }

    fn check_last_slot(&self, ci: usize, slot_goes: bool, action: &str) -> Result<()> {
        let column = &self.columns[ci];
        if slot_goes && column.slots.len() == 1 && column.protected && !self.override_protection
        {
            return Err(Error::Protected(format!(
                "cannot {action} the last sense of protected word {}",
                column.id
            )));
        }
        Ok(())
    }

    fn new_column(&self, id: &str, fallback_vern: &str) -> MergeTreeWord {
        match self.data.word(id) {
            Some(word) => MergeTreeWord {
                id: id.to_string(),
                slots: Vec::new(),
                vern: word.vernacular.clone(),
                flag: word.flag.clone(),
                protected: word.is_protected(),
            },
            None => MergeTreeWord {
                id: id.to_string(),
                slots: Vec::new(),
                vern: fallback_vern.to_string(),
                flag: Flag::default(),
                protected: false,
            },
        }
    }

    /// Remove an emptied column and hand its pending audio transfers on.
    ///
    /// With a destination, the column itself and everything already queued
    /// for it are appended to the destination's transfers. Without one
    /// (deletion), the queue is dropped.
    fn drop_column_if_empty(&mut self, column: &str, audio_dest: Option<&str>) {
        let Some(ci) = self.find_column(column) else {
            return;
        };
        if !self.columns[ci].slots.is_empty() {
            return;
        }
        self.columns.remove(ci);
        let chain = self.audio_moves.remove(column).unwrap_or_default();

        match audio_dest {
            Some(dest) if dest != column => {
                debug!(from = column, to = dest, "column merged away, audio follows");
                let queue = self.audio_moves.entry(dest.to_string()).or_default();
                for id in std::iter::once(column.to_string()).chain(chain) {
                    if !queue.contains(&id) {
                        queue.push(id);
                    }
                }
            }
            _ => {
                if !chain.is_empty() {
                    warn!(column, dropped = ?chain, "deleted column had pending audio transfers");
                }
            }
        }
    }
}
