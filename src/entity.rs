// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Entity identifiers and per-entity bookkeeping.

use slotmap::new_key_type;

use crate::bitset::BitSet;

new_key_type! {
    /// Unique entity identifier backed by slotmap's generational keys.
    ///
    /// A removed identifier is never handed out again: the slot may be reused,
    /// but with a bumped generation, so stale ids stay detectably stale.
    pub struct EntityId;
}

/// What the store knows about a live entity besides its component values.
#[derive(Debug, Clone, Default)]
pub struct EntityRecord {
    /// Component kinds currently attached (tags included).
    pub mask: BitSet,
    /// Creation sequence number, used to order late-registered queries.
    pub sequence: u64,
}

impl EntityRecord {
    pub fn new(sequence: u64) -> Self {
        Self {
            mask: BitSet::default(),
            sequence,
        }
    }
}
