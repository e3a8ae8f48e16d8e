// Copyright 2024-2025 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


//! The main count. Repeated rounds either distribute the leader's surplus or
//! eliminate the trailing candidate, until the seats are filled or the hopefuls
//! run out; a round robin over unrepresented constituencies and then a pass over
//! the eliminated candidates fill whatever seats remain.

use std::collections::HashSet;
use std::fmt;
use serde::{Serialize,Deserialize};
use crate::audit::{Action, AuditLog, AuditSink, LogEntry};
use crate::ballot_metadata::{CandidateIndex, ConstituencyIndex, ElectionMetadata, NumberOfSeats};
use crate::ballot_paper::{BallotIndex, BallotPaper};
use crate::election_data::ElectionData;
use crate::errors::CountError;
use crate::quota::QuotaPolicy;
use crate::random_util::RandomSource;
use crate::tie_resolution::{select_first_with_ties, stable_shuffle_sort};
use crate::transfer::redistribute_ballots;

/// the 1 based number of a pass through the main loop
#[derive(Copy,Clone,Ord, PartialOrd, Eq, PartialEq,Hash,Serialize,Deserialize)]
pub struct RoundNumber(pub usize);

// type alias really, don't want long display
impl fmt::Display for RoundNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
// type alias really, don't want long display
impl fmt::Debug for RoundNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// The election threshold: floor(ballots/(seats+1))+1, one more than the largest
/// tally that could still be matched by seats+1 candidates at once.
pub fn droop_threshold(num_ballots:usize,seats:NumberOfSeats) -> usize {
    num_ballots/(seats.0+1)+1
}

/// What happened to a candidate: the round it happened in and their tally at that
/// moment. Appended to `elected` on election, to `rejected` on a quota veto.
#[derive(Clone,Debug,Serialize,Deserialize,PartialEq)]
pub struct CandidateDecision {
    pub who : CandidateIndex,
    pub round : RoundNumber,
    pub votes : f64,
}

/// Everything a count produces: who got a seat (in election order), who a quota
/// turned away, the final tallies, and the complete audit log.
#[derive(Clone,Debug,Serialize,Deserialize)]
pub struct CountOutcome {
    pub elected : Vec<CandidateDecision>,
    pub rejected : Vec<CandidateDecision>,
    pub tally : Vec<f64>,
    pub log : Vec<LogEntry>,
}

/// An outcome together with the roster it indexes into, suitable for a transcript file.
#[derive(Clone,Debug,Serialize,Deserialize)]
pub struct OutcomeWithMetadata {
    pub metadata : ElectionMetadata,
    pub outcome : CountOutcome,
}

/// Run a count. All input validation happens before the first audit record is
/// written; afterwards the only failure mode is the quota policy itself failing.
pub fn count_votes(data:&ElectionData,seats:NumberOfSeats,quota_limit:usize,policy:Box<dyn QuotaPolicy>,seed:Option<u64>,sink:Box<dyn AuditSink>) -> Result<CountOutcome,CountError> {
    if data.ballots.is_empty() { return Err(CountError::EmptyBallots); }
    for (index,ballot) in data.ballots.iter().enumerate() {
        if ballot.is_empty() { return Err(CountError::MalformedBallot{index}); }
    }
    if seats.0==0 || seats.0>data.metadata.num_candidates() {
        return Err(CountError::InvalidSeats{seats:seats.0,candidates:data.metadata.num_candidates()});
    }
    let mut work = VoteCounter::new(data,seats,quota_limit,policy,seed,sink);
    work.go()?;
    Ok(work.into_outcome())
}

/// The main workhorse class that runs the rounds. All mutable state of a count
/// lives here; nothing is global.
struct VoteCounter<'a> {
    data : &'a ElectionData,
    seats : NumberOfSeats,
    quota_limit : usize,
    policy : Box<dyn QuotaPolicy>,
    threshold : usize,
    /// the ballot arena. Allocation entries are indices into this.
    ballots : Vec<BallotPaper>,
    /// the papers a candidate currently holds, in arrival order.
    allocation : Vec<Vec<BallotIndex>>,
    /// current votes by candidate.
    tally : Vec<f64>,
    /// candidates still in contention, in registration order.
    hopefuls : Vec<CandidateIndex>,
    /// same set as hopefuls, for membership tests during transfers.
    continuing : HashSet<CandidateIndex>,
    elected : Vec<CandidateDecision>,
    rejected : Vec<CandidateDecision>,
    /// candidates eliminated for low tallies, earliest first.
    eliminated : Vec<CandidateIndex>,
    elected_per_constituency : Vec<usize>,
    current_round : RoundNumber,
    rand : RandomSource,
    log : AuditLog,
}

impl <'a> VoteCounter<'a> {
    fn new(data:&'a ElectionData,seats:NumberOfSeats,quota_limit:usize,policy:Box<dyn QuotaPolicy>,seed:Option<u64>,sink:Box<dyn AuditSink>) -> Self {
        let num_candidates = data.metadata.num_candidates();
        VoteCounter{
            data,
            seats,
            quota_limit,
            policy,
            threshold : droop_threshold(data.num_ballots(),seats),
            ballots : data.ballots.iter().map(|prefs|BallotPaper::new(prefs.clone())).collect(),
            allocation : vec![vec![];num_candidates],
            tally : vec![0.0;num_candidates],
            hopefuls : vec![],
            continuing : HashSet::default(),
            elected : vec![],
            rejected : vec![],
            eliminated : vec![],
            elected_per_constituency : vec![0;data.metadata.constituencies.len()],
            current_round : RoundNumber(1),
            rand : RandomSource::new(seed),
            log : AuditLog::new(sink),
        }
    }

    fn go(&mut self) -> Result<(),CountError> {
        let seed_desc = match self.rand.seed() { Some(seed)=>seed.to_string(), None=>"none".to_string() };
        self.log.log(Action::Seed,seed_desc);
        self.log.log(Action::Threshold,self.threshold.to_string());
        self.initial_count();
        self.main_rounds()?;
        self.round_robin()?;
        self.zombies()?;
        Ok(())
    }

    /// Attribute every paper to its first preference. Every candidate in the
    /// roster gets an allocation and a zero tally even if no paper names them.
    fn initial_count(&mut self) {
        for i in 0..self.ballots.len() {
            let first = self.ballots[i].first_preference();
            self.allocation[first.0].push(BallotIndex(i));
            self.tally[first.0]+=1.0;
        }
        self.hopefuls = self.data.metadata.candidate_indices().collect();
        self.continuing = self.hopefuls.iter().cloned().collect();
    }

    fn seats_remaining(&self) -> usize { self.seats.0-self.elected.len() }

    fn candidate_name(&self,candidate:CandidateIndex) -> &str { self.data.metadata.candidate(candidate).name.as_str() }

    /// "C = v" pairs joined by ';', ordered by votes descending then name
    /// ascending. Only ever used for audit records.
    fn count_description(&self,candidates:&[CandidateIndex]) -> String {
        let tally = &self.tally;
        let metadata = &self.data.metadata;
        let mut sorted = candidates.to_vec();
        sorted.sort_by(|a,b|tally[b.0].total_cmp(&tally[a.0]).then_with(||metadata.candidate(*a).name.cmp(&metadata.candidate(*b).name)));
        sorted.iter().map(|&c|format!("{} = {}",metadata.candidate(c).name,tally[c.0])).collect::<Vec<_>>().join(";")
    }

    fn no_longer_hopeful(&mut self,candidate:CandidateIndex) {
        self.hopefuls.retain(|&c|c!=candidate);
        self.continuing.remove(&candidate);
    }

    fn redistribute(&mut self,candidate:CandidateIndex,weight:f64) {
        redistribute_ballots(candidate,weight,&self.continuing,&mut self.ballots,&mut self.allocation,&mut self.tally,&self.data.metadata,&mut self.log);
    }

    /// Elect the candidate, unless a quota is in effect and the policy vetoes it,
    /// in which case they are recorded as rejected instead. Returns true on election.
    fn elect_or_reject(&mut self,candidate:CandidateIndex) -> Result<bool,CountError> {
        let constituency = self.data.metadata.candidate(candidate).constituency;
        let quota_exceeded = match constituency {
            Some(_) if self.quota_limit>0 => self.policy.quota_exceeded(candidate,&self.data.metadata,&self.elected_per_constituency,&mut self.log).map_err(CountError::QuotaCallbackFailure)?,
            _ => false,
        };
        let votes = self.tally[candidate.0];
        let decision = CandidateDecision{who:candidate,round:self.current_round,votes};
        if quota_exceeded {
            self.rejected.push(decision);
            if let Some(constituency) = constituency {
                let detail = format!("{} {} {} >= {}",self.candidate_name(candidate),self.data.metadata.constituency(constituency).name,self.elected_per_constituency[constituency.0],self.quota_limit);
                self.log.log(Action::Quota,detail);
            }
            Ok(false)
        } else {
            self.elected.push(decision);
            if let Some(constituency) = constituency { self.elected_per_constituency[constituency.0]+=1; }
            let detail = format!("{} = {}",self.candidate_name(candidate),votes);
            self.log.log(Action::Elect,detail);
            Ok(true)
        }
    }

    /// One round per pass: if the leader has reached the threshold, elect them and
    /// pass on any surplus at the fractional weight surplus/tally; otherwise
    /// eliminate the trailer and pass their papers on at full weight.
    fn main_rounds(&mut self) -> Result<(),CountError> {
        while self.elected.len()<self.seats.0 && !self.hopefuls.is_empty() {
            self.log.log(Action::CountRound,self.current_round.to_string());
            let description = self.count_description(&self.hopefuls);
            self.log.log(Action::Count,description);
            let mut hopefuls_sorted = self.hopefuls.clone();
            {
                let tally = &self.tally;
                hopefuls_sorted.sort_by(|a,b|tally[b.0].total_cmp(&tally[a.0]));
            }
            let surplus = self.tally[hopefuls_sorted[0].0]-self.threshold as f64;
            if surplus>=0.0 {
                let best = {
                    let tally = &self.tally;
                    let metadata = &self.data.metadata;
                    select_first_with_ties(&hopefuls_sorted,|c|tally[c.0],Action::Elect,|c|metadata.candidate(*c).name.clone(),&mut self.rand,&mut self.log)
                };
                self.no_longer_hopeful(best);
                let was_elected = self.elect_or_reject(best)?;
                if !was_elected {
                    // a rejected candidate's papers flow onward at their full worth
                    self.redistribute(best,1.0);
                } else if surplus>0.0 {
                    let weight = surplus/self.tally[best.0];
                    self.redistribute(best,weight);
                }
                // exactly at the threshold: nothing to pass on
            } else {
                hopefuls_sorted.reverse();
                let worst = {
                    let tally = &self.tally;
                    let metadata = &self.data.metadata;
                    select_first_with_ties(&hopefuls_sorted,|c|tally[c.0],Action::Eliminate,|c|metadata.candidate(*c).name.clone(),&mut self.rand,&mut self.log)
                };
                self.no_longer_hopeful(worst);
                self.eliminated.push(worst);
                let detail = format!("{} = {}",self.candidate_name(worst),self.tally[worst.0]);
                self.log.log(Action::Eliminate,detail);
                self.redistribute(worst,1.0);
            }
            self.current_round=RoundNumber(self.current_round.0+1);
        }
        Ok(())
    }

    /// Fill remaining seats by cycling over the constituencies with no elected
    /// member, largest first (equal sizes in random order), taking each visited
    /// constituency's best remaining candidate by tally.
    fn round_robin(&mut self) -> Result<(),CountError> {
        if self.seats_remaining()==0 { return Ok(()); }
        let mut orphans : Vec<(ConstituencyIndex,usize)> = (0..self.data.metadata.constituencies.len())
            .filter(|&i|self.elected_per_constituency[i]==0)
            .map(|i|(ConstituencyIndex(i),self.data.metadata.constituencies[i].size))
            .collect();
        if orphans.is_empty() { return Ok(()); }
        {
            let metadata = &self.data.metadata;
            stable_shuffle_sort(&mut orphans,|&(_,size)|size as f64,true,|&(c,size)|format!("({}, {})",metadata.constituency(c).name,size),&mut self.rand,&mut self.log);
        }
        let mut candidates_by_orphan : Vec<Vec<(CandidateIndex,f64)>> = orphans.iter().map(|&(constituency,_)|{
            let mut list : Vec<(CandidateIndex,f64)> = self.data.metadata.candidates_in_constituency(constituency).into_iter().map(|c|(c,self.tally[c.0])).collect();
            list.sort_by(|a,b|b.1.total_cmp(&a.1));
            list
        }).collect();
        let mut remaining : usize = candidates_by_orphan.iter().map(|l|l.len()).sum();
        {
            let metadata = &self.data.metadata;
            let listed = orphans.iter().map(|&(c,size)|format!("({}, {})",metadata.constituency(c).name,size)).collect::<Vec<_>>().join(", ");
            self.log.log(Action::RoundRobin,format!("[{}]",listed));
        }
        let mut turn : usize = 0;
        while self.seats_remaining()>0 && remaining>0 {
            let pick = loop {
                let (constituency,_) = orphans[turn];
                let list = &mut candidates_by_orphan[turn];
                {
                    let metadata = &self.data.metadata;
                    let listed = list.iter().map(|&(c,votes)|format!("({}, {})",metadata.candidate(c).name,votes)).collect::<Vec<_>>().join(", ");
                    self.log.log(Action::ConstituencyTurn,format!("{} [{}]",metadata.constituency(constituency).name,listed));
                }
                turn=(turn+1)%orphans.len();
                if !list.is_empty() {
                    let selected = {
                        let metadata = &self.data.metadata;
                        select_first_with_ties(list,|&(_,votes)|votes,Action::Elect,|&(c,votes)|format!("({}, {})",metadata.candidate(c).name,votes),&mut self.rand,&mut self.log)
                    };
                    if let Some(position) = list.iter().position(|&(c,_)|c==selected.0) { list.remove(position); }
                    remaining-=1;
                    break selected.0;
                }
            };
            self.elect_or_reject(pick)?;
        }
        Ok(())
    }

    /// If seats are still unfilled, bring back the eliminated in reverse order of
    /// elimination; the last to go had the most support. A zombie who already won
    /// a seat through the round robin is skipped, not elected twice.
    fn zombies(&mut self) -> Result<(),CountError> {
        while self.seats_remaining()>0 && !self.eliminated.is_empty() {
            let candidate = self.eliminated[self.eliminated.len()-1];
            if self.elected.iter().any(|e|e.who==candidate) {
                self.eliminated.pop();
                continue;
            }
            self.log.log(Action::CountRound,self.current_round.to_string());
            let description = self.count_description(&self.eliminated);
            self.log.log(Action::Zombies,description);
            self.eliminated.pop();
            self.elect_or_reject(candidate)?;
            self.current_round=RoundNumber(self.current_round.0+1);
        }
        Ok(())
    }

    fn into_outcome(self) -> CountOutcome {
        CountOutcome{
            elected: self.elected,
            rejected: self.rejected,
            tally: self.tally,
            log: self.log.into_entries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ballot_metadata::NumberOfSeats;
    use crate::vote_count::droop_threshold;

    #[test]
    fn threshold_is_floor_of_ballots_over_seats_plus_one_plus_one() {
        assert_eq!(6,droop_threshold(20,NumberOfSeats(3)));
        assert_eq!(6,droop_threshold(10,NumberOfSeats(1)));
        assert_eq!(4,droop_threshold(6,NumberOfSeats(1)));
        assert_eq!(1,droop_threshold(3,NumberOfSeats(3)));
        assert_eq!(26,droop_threshold(100,NumberOfSeats(3)));
        assert_eq!(101,droop_threshold(100,NumberOfSeats(0)));
    }
}
