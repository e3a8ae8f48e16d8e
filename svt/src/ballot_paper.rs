// Copyright 2024 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Ballot papers and the bookkeeping for their journey between candidates.

use serde::{Serialize,Deserialize};
use std::collections::HashSet;
use std::fmt;
use crate::ballot_metadata::CandidateIndex;

/// a ballot paper, referred to by position in the ballot arena, 0 being first
#[derive(Clone, Copy, PartialEq, Eq, Hash,Serialize,Deserialize)]
pub struct BallotIndex(pub usize);
// type alias really, don't want long display
impl fmt::Display for BallotIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
// type alias really, don't want long display
impl fmt::Debug for BallotIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// A voter's ranked preference list plus the state of its fractional transfers.
///
/// `prefs[0]` is the most preferred candidate. The paper currently sits with the
/// candidate at `prefs[current_holder]`. Each transfer it takes part in multiplies
/// its worth by that transfer's weight; `value` is the running product, in (0,1].
#[derive(Debug,Serialize,Deserialize,Clone)]
pub struct BallotPaper {
    pub prefs : Vec<CandidateIndex>,
    pub current_holder : usize,
    /// the weight applied on each transfer, in order. Kept for auditability.
    #[serde(skip_serializing_if = "Vec::is_empty",default)]
    pub weights : Vec<f64>,
    pub value : f64,
}

impl BallotPaper {
    pub fn new(prefs:Vec<CandidateIndex>) -> Self {
        BallotPaper{ prefs, current_holder: 0, weights: vec![], value: 1.0 }
    }

    pub fn first_preference(&self) -> CandidateIndex { self.prefs[0] }

    /// The index of the next preference that is still continuing, scanning forward
    /// from just past the current holder. None means the paper is exhausted.
    pub fn next_eligible(&self,continuing:&HashSet<CandidateIndex>) -> Option<usize> {
        (self.current_holder+1..self.prefs.len()).find(|&i|continuing.contains(&self.prefs[i]))
    }

    /// Move the paper to the preference at `to_index`, scaling its worth by `weight`.
    pub fn transfer(&mut self,to_index:usize,weight:f64) {
        self.current_holder=to_index;
        self.weights.push(weight);
        self.value*=weight;
    }
}
