// Copyright 2024 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Information about the contest, such as candidates and constituencies.

use serde::{Serialize,Deserialize};
use std::fmt;
use std::collections::HashMap;
use std::ops::Sub;

/// a candidate, referred to by position in the candidate roster, 0 being first registered
#[derive(Clone, Copy, PartialEq, Eq, Hash,Serialize,Deserialize)]
pub struct CandidateIndex(pub usize);
// type alias really, don't want long display
impl fmt::Display for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
// type alias really, don't want long display
impl fmt::Debug for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// a constituency, referred to by position in the constituencies table, 0 being first
#[derive(Clone, Copy, PartialEq, Eq, Hash,Serialize,Deserialize)]
pub struct ConstituencyIndex(pub usize);
// type alias really, don't want long display
impl fmt::Display for ConstituencyIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
// type alias really, don't want long display
impl fmt::Debug for ConstituencyIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// Represent a number of seats to be filled.
#[derive(Clone, Copy, PartialEq, Eq, Hash,Serialize,Deserialize,Ord, PartialOrd)]
pub struct NumberOfSeats(pub usize);

// type alias really, don't want long display
impl fmt::Display for NumberOfSeats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
// type alias really, don't want long display
impl fmt::Debug for NumberOfSeats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}

impl Sub for NumberOfSeats {
    type Output = NumberOfSeats;
    fn sub(self, rhs: Self) -> Self::Output { NumberOfSeats(self.0-rhs.0) }
}

/// information about a candidate in the contest.
#[derive(Debug,Serialize,Deserialize,Clone)]
pub struct Candidate {
    pub name : String,
    /// the constituency the candidate stands in, if any. A candidate without one is unconstrained by quotas.
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub constituency : Option<ConstituencyIndex>,
}

/// a constituency and the number of voters in it.
#[derive(Debug,Serialize,Deserialize,Clone)]
pub struct Constituency {
    pub name : String,
    /// the number of voters in the constituency. Used to order the round robin filler.
    pub size : usize,
}

/// Information about the election
#[derive(Debug,Serialize,Deserialize,Clone,Default)]
pub struct ElectionMetadata {
    pub candidates : Vec<Candidate>,
    #[serde(skip_serializing_if = "Vec::is_empty",default)]
    pub constituencies : Vec<Constituency>,
}

impl ElectionMetadata {
    pub fn candidate(&self,index:CandidateIndex) -> &Candidate { &self.candidates[index.0] }
    pub fn constituency(&self,index:ConstituencyIndex) -> &Constituency { &self.constituencies[index.0] }
    pub fn num_candidates(&self) -> usize { self.candidates.len() }
    /// Get a hashmap going from candidate name to index
    pub fn get_candidate_name_lookup(&self) -> HashMap<String,CandidateIndex> {
        let mut res = HashMap::default();
        for i in 0..self.candidates.len() {
            res.insert(self.candidates[i].name.clone(),CandidateIndex(i));
        }
        res
    }
    /// Get a hashmap going from constituency name to index
    pub fn get_constituency_name_lookup(&self) -> HashMap<String,ConstituencyIndex> {
        let mut res = HashMap::default();
        for i in 0..self.constituencies.len() {
            res.insert(self.constituencies[i].name.clone(),ConstituencyIndex(i));
        }
        res
    }
    /// An iterator over all the candidate indices starting at 0.
    pub fn candidate_indices(&self) -> impl Iterator<Item=CandidateIndex> { (0..self.candidates.len()).map(|i|CandidateIndex(i)) }

    /// The candidates standing in the given constituency, in roster order.
    pub fn candidates_in_constituency(&self,constituency:ConstituencyIndex) -> Vec<CandidateIndex> {
        self.candidate_indices().filter(|&c|self.candidate(c).constituency==Some(constituency)).collect()
    }
}
