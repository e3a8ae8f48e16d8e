// Copyright 2024 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


//! The seeded source of randomness consumed for tie-breaking and shuffling.


use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// All randomness used during a count flows through one of these. Given a seed the
/// sequence of draws is fully reproducible; without one the generator is seeded
/// from the operating system. The driver records the seed (or its absence) in the
/// audit log before the first draw; no other component constructs randomness.
///
/// ```
/// use svt::random_util::RandomSource;
/// let mut a = RandomSource::new(Some(42));
/// let mut b = RandomSource::new(Some(42));
/// assert_eq!(a.next_f64(),b.next_f64());
/// ```
pub struct RandomSource {
    rng : ChaCha20Rng,
    seed : Option<u64>,
}

impl RandomSource {
    pub fn new(seed:Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha20Rng::seed_from_u64(s),
            None => ChaCha20Rng::from_entropy(),
        };
        RandomSource{rng,seed}
    }

    /// the seed this source was built from, if one was supplied.
    pub fn seed(&self) -> Option<u64> { self.seed }

    /// a uniform real in [0,1).
    pub fn next_f64(&mut self) -> f64 { self.rng.gen::<f64>() }

    /// a uniform index below len, as floor(rand*len).
    pub fn index_below(&mut self,len:usize) -> usize { (self.next_f64()*len as f64) as usize }

    /// Fisher-Yates shuffle, drawing each swap index from this source so the
    /// permutation is a pure function of the seed and the sequence length.
    pub fn shuffle<T>(&mut self,sequence:&mut [T]) {
        for i in (1..sequence.len()).rev() {
            let j = (self.next_f64()*((i+1) as f64)) as usize;
            sequence.swap(i,j);
        }
    }
}
