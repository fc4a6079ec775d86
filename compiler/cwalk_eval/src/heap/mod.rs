//! Word-addressed heap backing pointers and arrays.
//!
//! Addresses stay plain integers so pointer arithmetic works on them, but
//! every block lives in a generational slot. Address ranges are handed out
//! by a bump cursor and never reused, and freed ranges are kept as
//! tombstones, so stale accesses are told apart from wild ones:
//!
//! | access                           | error           |
//! |----------------------------------|-----------------|
//! | never-allocated or guard address | `Unmapped`      |
//! | inside a freed block             | `UseAfterFree`  |
//! | free of a freed base             | `DoubleFree`    |
//! | free of an interior/unknown addr | `InvalidFree`   |
//!
//! Reads and writes round the address down to a word boundary first; there
//! is no sub-word storage.

use std::collections::BTreeMap;

use cwalk_ir::WORD_SIZE;

use crate::{HeapError, Value};

/// First address handed out. Keeps `0` (NULL) and small integers unmapped.
pub const HEAP_BASE: i64 = 0x1000_0000;

/// Largest single block, in bytes.
pub const MAX_ALLOCATION: i64 = 1 << 30;

/// Handle to one allocation: a slot index plus the generation the slot had
/// when the block was allocated.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Allocation {
    slot: u32,
    generation: u32,
}

impl Allocation {
    pub fn slot(self) -> u32 {
        self.slot
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

struct Block {
    size: i64,
    words: Vec<Value>,
}

struct Slot {
    generation: u32,
    block: Option<Block>,
}

/// Address range claimed by one allocation, live or freed.
#[derive(Copy, Clone)]
struct Region {
    handle: Allocation,
    /// One past the last addressable byte.
    end: i64,
}

/// The heap of one evaluator instance.
///
/// Slots are recycled on `free`, but address space and region entries are
/// not: every allocation advances the bump cursor and leaves a tombstone
/// behind once freed, so a long `MALLOC`/`FREE` loop grows `regions` by one
/// entry per iteration and eventually ends in `Exhausted` once the cursor
/// passes `i64::MAX`. Dropping tombstones would turn stale accesses into
/// `Unmapped` instead of `UseAfterFree`.
pub struct Heap {
    slots: Vec<Slot>,
    free_slots: Vec<u32>,
    regions: BTreeMap<i64, Region>,
    next_base: i64,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    pub fn new() -> Self {
        Heap {
            slots: Vec::new(),
            free_slots: Vec::new(),
            regions: BTreeMap::new(),
            next_base: HEAP_BASE,
        }
    }

    /// Reserve a zero-filled block of `size` bytes and return its base.
    pub fn allocate(&mut self, size: i64) -> Result<i64, HeapError> {
        if size < 0 {
            return Err(HeapError::InvalidSize { size });
        }
        if size > MAX_ALLOCATION {
            return Err(HeapError::Exhausted { size });
        }
        let base = self.next_base;
        let (words, end) = Self::layout(base, size).ok_or(HeapError::Exhausted { size })?;
        // One guard word between blocks so running off the end is Unmapped.
        self.next_base = end
            .checked_add(WORD_SIZE)
            .ok_or(HeapError::Exhausted { size })?;

        let block = Block {
            size,
            words: vec![0; words],
        };
        let handle = if let Some(slot) = self.free_slots.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.block = Some(block);
            Allocation {
                slot,
                generation: entry.generation,
            }
        } else {
            let slot = u32::try_from(self.slots.len()).map_err(|_| HeapError::Exhausted { size })?;
            self.slots.push(Slot {
                generation: 0,
                block: Some(block),
            });
            Allocation {
                slot,
                generation: 0,
            }
        };
        self.regions.insert(base, Region { handle, end });

        tracing::debug!(base = format_args!("{base:#x}"), size, ?handle, "heap allocate");
        Ok(base)
    }

    /// Release the block whose base is exactly `address`.
    pub fn free(&mut self, address: i64) -> Result<(), HeapError> {
        let Some(region) = self.regions.get(&address) else {
            return Err(HeapError::InvalidFree { address });
        };
        let handle = region.handle;
        let slot = &mut self.slots[handle.slot as usize];
        if slot.generation != handle.generation || slot.block.is_none() {
            return Err(HeapError::DoubleFree { address });
        }
        slot.block = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(handle.slot);

        tracing::debug!(base = format_args!("{address:#x}"), ?handle, "heap free");
        Ok(())
    }

    /// Read the word containing `address`.
    pub fn read(&self, address: i64) -> Result<Value, HeapError> {
        let (handle, index) = self.locate(address)?;
        self.slots[handle.slot as usize]
            .block
            .as_ref()
            .and_then(|block| block.words.get(index).copied())
            .ok_or(HeapError::Unmapped { address })
    }

    /// Overwrite the word containing `address`.
    pub fn write(&mut self, address: i64, value: Value) -> Result<(), HeapError> {
        let (handle, index) = self.locate(address)?;
        let word = self.slots[handle.slot as usize]
            .block
            .as_mut()
            .and_then(|block| block.words.get_mut(index))
            .ok_or(HeapError::Unmapped { address })?;
        *word = value;
        Ok(())
    }

    /// Number of blocks allocated and not yet freed.
    pub fn live_allocations(&self) -> usize {
        self.slots.iter().filter(|slot| slot.block.is_some()).count()
    }

    /// Number of freed blocks whose address ranges are still reserved.
    pub fn tombstones(&self) -> usize {
        self.regions.len().saturating_sub(self.live_allocations())
    }

    /// Handle and byte size of the live block based at `base`.
    pub fn allocation_at(&self, base: i64) -> Option<(Allocation, i64)> {
        let region = self.regions.get(&base)?;
        let slot = &self.slots[region.handle.slot as usize];
        if slot.generation != region.handle.generation {
            return None;
        }
        slot.block.as_ref().map(|block| (region.handle, block.size))
    }

    /// Word count and end address of a `size`-byte block placed at `base`.
    fn layout(base: i64, size: i64) -> Option<(usize, i64)> {
        let word_count = size
            .checked_add(WORD_SIZE.wrapping_sub(1))?
            .wrapping_div(WORD_SIZE);
        let end = base.checked_add(word_count.checked_mul(WORD_SIZE)?)?;
        Some((usize::try_from(word_count).ok()?, end))
    }

    /// Resolve an address to a live block and a word index inside it.
    fn locate(&self, address: i64) -> Result<(Allocation, usize), HeapError> {
        let aligned = address.wrapping_sub(address.rem_euclid(WORD_SIZE));
        let Some((&base, region)) = self.regions.range(..=aligned).next_back() else {
            return Err(HeapError::Unmapped { address });
        };
        if aligned >= region.end {
            return Err(HeapError::Unmapped { address });
        }
        let slot = &self.slots[region.handle.slot as usize];
        if slot.generation != region.handle.generation || slot.block.is_none() {
            return Err(HeapError::UseAfterFree { address });
        }
        // aligned is in [base, end), so the offset is non-negative and small.
        let index = usize::try_from(aligned.wrapping_sub(base).wrapping_div(WORD_SIZE))
            .map_err(|_| HeapError::Unmapped { address })?;
        Ok((region.handle, index))
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    reason = "tests use unwrap and address arithmetic for brevity"
)]
mod tests;
