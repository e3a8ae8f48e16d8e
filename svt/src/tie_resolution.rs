// Copyright 2024-2025 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Random tie-breaking primitives. Both record their use of randomness in the
//! audit log; a run in which no ties arise draws nothing and is deterministic
//! even without a seed.

use crate::audit::{Action, AuditLog};
use crate::random_util::RandomSource;

/// Select the first item of a sequence sorted by `key`, breaking ties randomly.
///
/// The maximal prefix of items whose key equals the first item's key is collected.
/// A prefix of one is returned with no side effect; otherwise the winner is drawn
/// uniformly from the prefix and a RANDOM record naming the winner, the tied set
/// and the context (`action`) is written.
///
/// The sequence must be non-empty and sorted by `key`; the direction does not matter.
pub fn select_first_with_ties<T:Copy>(sequence:&[T],key:impl Fn(&T)->f64,action:Action,describe:impl Fn(&T)->String,rand:&mut RandomSource,log:&mut AuditLog) -> T {
    let first_key = key(&sequence[0]);
    let collected : Vec<T> = sequence.iter().take_while(|item|key(item)==first_key).copied().collect();
    let mut selected = collected[0];
    if collected.len()>1 {
        selected = collected[rand.index_below(collected.len())];
        let tied = collected.iter().map(|item|describe(item)).collect::<Vec<_>>().join(", ");
        log.log(Action::Random,format!("{} from [{}] to {}",describe(&selected),tied,action));
    }
    selected
}

/// Sort the sequence by `key`, breaking ties uniformly at random.
///
/// The sequence is first shuffled (Fisher-Yates via the randomness service) and
/// then stably sorted, ascending or descending per `reverse`. Stability of the
/// sort means items with equal keys keep their shuffled order, which is uniform.
/// A SHUFFLE record with the pre and post shuffle sequences and a SORT record
/// with the final order are written.
pub fn stable_shuffle_sort<T:Copy>(sequence:&mut [T],key:impl Fn(&T)->f64,reverse:bool,describe:impl Fn(&T)->String,rand:&mut RandomSource,log:&mut AuditLog) {
    let listed = |s:&[T]| s.iter().map(|item|describe(item)).collect::<Vec<_>>().join(", ");
    let before = listed(sequence);
    rand.shuffle(sequence);
    let shuffled = listed(sequence);
    log.log(Action::Shuffle,format!("from [{}] to [{}]",before,shuffled));
    if reverse { sequence.sort_by(|a,b|key(b).total_cmp(&key(a))); }
    else { sequence.sort_by(|a,b|key(a).total_cmp(&key(b))); }
    log.log(Action::Sort,format!("from [{}] to [{}]",shuffled,listed(sequence)));
}
