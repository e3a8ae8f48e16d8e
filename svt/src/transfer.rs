// Copyright 2024-2025 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


//! The ballot transfer engine. Moves a candidate's papers on to their next
//! continuing preference at a given fractional weight, keeping the allocation
//! map, the tallies and the audit log in agreement with each other.

use std::collections::HashSet;
use indexmap::IndexMap;
use crate::audit::{Action, AuditLog};
use crate::ballot_metadata::{CandidateIndex, ElectionMetadata};
use crate::ballot_paper::{BallotIndex, BallotPaper};
use crate::util::round_to_significant_decimals;

/// The number of significant decimal digits a batched transfer total is clamped
/// to before it is applied to the tallies. This contains IEEE-754 drift so that
/// identical seeded runs produce identical tallies on any platform.
pub const TALLY_SIGNIFICANT_DECIMALS : usize = 15;

#[derive(Clone,Copy)]
struct MoveBatch {
    value : f64,
    times : usize,
}

/// Redistribute the papers currently held by `selected` to their next continuing
/// preference, each paper's worth multiplied by `weight`.
///
/// Papers are scanned forward from just past their current holder; the first
/// preference in `continuing` receives the paper. Papers with no continuing
/// preference are exhausted and stay, inert, with `selected` (which is never a
/// continuing candidate when this is called).
///
/// Tally updates are batched by (recipient, post-multiplication value). Each
/// batch total is rounded to [TALLY_SIGNIFICANT_DECIMALS] significant digits and
/// then applied as a paired credit/debit, so the TRANSFER record and the tally
/// delta agree bit for bit. Batches are recorded in first-encounter order.
pub fn redistribute_ballots(selected:CandidateIndex,weight:f64,continuing:&HashSet<CandidateIndex>,ballots:&mut [BallotPaper],allocation:&mut [Vec<BallotIndex>],tally:&mut [f64],metadata:&ElectionMetadata,log:&mut AuditLog) {
    let held = std::mem::take(&mut allocation[selected.0]);
    let mut kept : Vec<BallotIndex> = vec![];
    let mut moves : IndexMap<(CandidateIndex,u64),MoveBatch> = IndexMap::new();
    for &ballot_index in &held {
        let ballot = &mut ballots[ballot_index.0];
        match ballot.next_eligible(continuing) {
            Some(preference) => {
                let recipient = ballot.prefs[preference];
                ballot.transfer(preference,weight);
                allocation[recipient.0].push(ballot_index);
                let batch = moves.entry((recipient,ballot.value.to_bits())).or_insert(MoveBatch{value:ballot.value,times:0});
                batch.times+=1;
            }
            None => { kept.push(ballot_index); }
        }
    }
    allocation[selected.0]=kept;
    for (&(recipient,_),&MoveBatch{value,times}) in moves.iter() {
        let total = round_to_significant_decimals(times as f64*value,TALLY_SIGNIFICANT_DECIMALS);
        tally[recipient.0]+=total;
        tally[selected.0]-=total;
        log.log(Action::Transfer,format!("from {} to {} {}*{}={}",metadata.candidate(selected).name,metadata.candidate(recipient).name,times,value,total));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use crate::audit::{Action, AuditLog};
    use crate::ballot_metadata::{Candidate, CandidateIndex, ElectionMetadata};
    use crate::ballot_paper::{BallotIndex, BallotPaper};
    use crate::transfer::redistribute_ballots;

    fn metadata(names:&[&str]) -> ElectionMetadata {
        ElectionMetadata{ candidates: names.iter().map(|n|Candidate{name:n.to_string(),constituency:None}).collect(), constituencies: vec![] }
    }

    /// Six papers on candidate 0: four continue to candidate 1, two to candidate 2,
    /// transferred at weight 0.5.
    #[test]
    fn surplus_transfer_batches_and_rounds() {
        let metadata = metadata(&["A","B","C"]);
        let mut ballots : Vec<BallotPaper> = vec![];
        for _ in 0..4 { ballots.push(BallotPaper::new(vec![CandidateIndex(0),CandidateIndex(1)])); }
        for _ in 0..2 { ballots.push(BallotPaper::new(vec![CandidateIndex(0),CandidateIndex(2)])); }
        let mut allocation : Vec<Vec<BallotIndex>> = vec![(0..6).map(BallotIndex).collect(),vec![],vec![]];
        let mut tally = vec![6.0,0.0,0.0];
        let continuing : HashSet<CandidateIndex> = [CandidateIndex(1),CandidateIndex(2)].into_iter().collect();
        let mut log = AuditLog::default();
        redistribute_ballots(CandidateIndex(0),0.5,&continuing,&mut ballots,&mut allocation,&mut tally,&metadata,&mut log);
        // A keeps 6-2-1
        assert_eq!(vec![3.0,2.0,1.0],tally);
        assert!(allocation[0].is_empty());
        assert_eq!(4,allocation[1].len());
        assert_eq!(2,allocation[2].len());
        for &b in &allocation[1] {
            assert_eq!(0.5,ballots[b.0].value);
            assert_eq!(1,ballots[b.0].current_holder);
        }
        // one TRANSFER record per (recipient,value) batch, in first-encounter order
        let entries = log.entries();
        assert_eq!(2,entries.len());
        assert!(entries.iter().all(|e|e.action==Action::Transfer));
        assert_eq!("from A to B 4*0.5=2",entries[0].detail);
        assert_eq!("from A to C 2*0.5=1",entries[1].detail);
    }

    /// An eliminated candidate's papers move at full weight; papers with no
    /// continuing preference are exhausted and stay put.
    #[test]
    fn elimination_transfer_keeps_exhausted_papers() {
        let metadata = metadata(&["A","B","C"]);
        let mut ballots = vec![
            BallotPaper::new(vec![CandidateIndex(0),CandidateIndex(1)]),
            BallotPaper::new(vec![CandidateIndex(0),CandidateIndex(1)]),
            BallotPaper::new(vec![CandidateIndex(0)]),
            BallotPaper::new(vec![CandidateIndex(0),CandidateIndex(2)]),
        ];
        let mut allocation : Vec<Vec<BallotIndex>> = vec![(0..4).map(BallotIndex).collect(),vec![],vec![]];
        let mut tally = vec![4.0,0.0,0.0];
        // only candidate 1 is still continuing
        let continuing : HashSet<CandidateIndex> = [CandidateIndex(1)].into_iter().collect();
        let mut log = AuditLog::default();
        redistribute_ballots(CandidateIndex(0),1.0,&continuing,&mut ballots,&mut allocation,&mut tally,&metadata,&mut log);
        assert_eq!(vec![2.0,2.0,0.0],tally);
        assert_eq!(vec![BallotIndex(2),BallotIndex(3)],allocation[0]);
        assert_eq!(vec![BallotIndex(0),BallotIndex(1)],allocation[1]);
        assert_eq!(1.0,ballots[0].value);
        assert_eq!(1.0,ballots[2].value); // untouched
        assert_eq!(1,log.entries().len());
        assert_eq!("from A to B 2*1=2",log.entries()[0].detail);
    }

    /// A duplicated preference for the departing candidate is just another index
    /// that fails the continuing test; the scan carries on past it.
    #[test]
    fn duplicate_preferences_are_scanned_past() {
        let metadata = metadata(&["A","B"]);
        let mut ballots = vec![BallotPaper::new(vec![CandidateIndex(0),CandidateIndex(0),CandidateIndex(1)])];
        let mut allocation : Vec<Vec<BallotIndex>> = vec![vec![BallotIndex(0)],vec![]];
        let mut tally = vec![1.0,0.0];
        let continuing : HashSet<CandidateIndex> = [CandidateIndex(1)].into_iter().collect();
        let mut log = AuditLog::default();
        redistribute_ballots(CandidateIndex(0),1.0,&continuing,&mut ballots,&mut allocation,&mut tally,&metadata,&mut log);
        assert_eq!(vec![0.0,1.0],tally);
        assert_eq!(2,ballots[0].current_holder);
    }

    /// Papers arriving with different values form separate batches even for the
    /// same recipient, and fractional totals are clamped to 15 significant digits.
    #[test]
    fn distinct_values_are_separate_batches() {
        let metadata = metadata(&["A","B"]);
        let mut ballots = vec![
            BallotPaper::new(vec![CandidateIndex(0),CandidateIndex(1)]),
            BallotPaper::new(vec![CandidateIndex(0),CandidateIndex(1)]),
        ];
        ballots[1].value=0.5; // arrived earlier at half worth
        let mut allocation : Vec<Vec<BallotIndex>> = vec![vec![BallotIndex(0),BallotIndex(1)],vec![]];
        let mut tally = vec![1.5,0.0];
        let continuing : HashSet<CandidateIndex> = [CandidateIndex(1)].into_iter().collect();
        let mut log = AuditLog::default();
        redistribute_ballots(CandidateIndex(0),1.0/3.0,&continuing,&mut ballots,&mut allocation,&mut tally,&metadata,&mut log);
        assert_eq!(2,log.entries().len());
        // 1/3 + 1/6, each clamped separately and applied in batch order
        assert_eq!(0.333333333333333+0.166666666666667,tally[1]);
        assert_eq!((1.5-0.333333333333333)-0.166666666666667,tally[0]);
    }
}
