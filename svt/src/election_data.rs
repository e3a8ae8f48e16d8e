// Copyright 2024 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Formal votes for the election, with names resolved to indices.

use std::collections::HashMap;
use serde::{Serialize,Deserialize};
use crate::ballot_metadata::{Candidate, CandidateIndex, Constituency, ElectionMetadata};
use crate::errors::CountError;

/// The fully resolved input to a count: the candidate/constituency roster and
/// every ballot as a preference list of candidate indices, most preferred first.
#[derive(Debug,Serialize,Deserialize,Clone)]
pub struct ElectionData {
    pub metadata : ElectionMetadata,
    pub ballots : Vec<Vec<CandidateIndex>>,
}

impl ElectionData {
    pub fn num_ballots(&self) -> usize { self.ballots.len() }

    /// Resolve names into an ElectionData.
    ///
    /// Candidates standing in constituencies are registered first, in map order;
    /// candidates met on ballots are registered in first-appearance order, every
    /// preference of every ballot being scanned in sequence. This registration
    /// order is the initial hopeful order of the count, so it is part of the
    /// deterministic behavior of a seeded run.
    ///
    /// Fails on a ballot with no preferences, and on a constituency map entry
    /// naming a constituency that is not in the table.
    pub fn from_names(ballots:&[Vec<String>],constituencies:&[(String,usize)],constituency_map:&[(String,String)]) -> Result<ElectionData,CountError> {
        let mut metadata = ElectionMetadata{
            candidates: vec![],
            constituencies: constituencies.iter().map(|(name,size)|Constituency{name:name.clone(),size:*size}).collect(),
        };
        let constituency_lookup = metadata.get_constituency_name_lookup();
        let mut candidate_lookup : HashMap<String,CandidateIndex> = HashMap::new();
        for (candidate,constituency) in constituency_map {
            let constituency = *constituency_lookup.get(constituency.as_str()).ok_or_else(||CountError::UnknownConstituencyReference{candidate:candidate.clone(),constituency:constituency.clone()})?;
            match candidate_lookup.get(candidate.as_str()) {
                Some(&existing) => { metadata.candidates[existing.0].constituency=Some(constituency); }
                None => {
                    candidate_lookup.insert(candidate.clone(),CandidateIndex(metadata.candidates.len()));
                    metadata.candidates.push(Candidate{name:candidate.clone(),constituency:Some(constituency)});
                }
            }
        }
        let mut resolved_ballots : Vec<Vec<CandidateIndex>> = vec![];
        for (index,ballot) in ballots.iter().enumerate() {
            if ballot.is_empty() { return Err(CountError::MalformedBallot{index}); }
            let mut prefs : Vec<CandidateIndex> = vec![];
            for name in ballot {
                let candidate = match candidate_lookup.get(name.as_str()) {
                    Some(&existing) => existing,
                    None => {
                        let new_index = CandidateIndex(metadata.candidates.len());
                        candidate_lookup.insert(name.clone(),new_index);
                        metadata.candidates.push(Candidate{name:name.clone(),constituency:None});
                        new_index
                    }
                };
                prefs.push(candidate);
            }
            resolved_ballots.push(prefs);
        }
        Ok(ElectionData{ metadata, ballots: resolved_ballots })
    }
}
