// Copyright 2024 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


//! The pluggable policy that can veto the election of a candidate whose
//! constituency has already taken its share of seats.

use crate::audit::{Action, AuditLog};
use crate::ballot_metadata::{CandidateIndex, ElectionMetadata, NumberOfSeats};

/// Decides whether electing the given candidate would exceed a constituency quota.
/// Returning true blocks the election; the driver records the candidate as rejected
/// and lets their ballots flow onward at full weight.
///
/// The driver consults the policy only when a quota limit is in effect and the
/// candidate stands in a known constituency. A policy may write COMMENT records
/// explaining unusual decisions; a policy that fails aborts the count.
pub trait QuotaPolicy {
    fn quota_exceeded(&mut self,candidate:CandidateIndex,metadata:&ElectionMetadata,elected_per_constituency:&[usize],log:&mut AuditLog) -> anyhow::Result<bool>;
}

/// The standard policy: a constituency that already has `quota_limit` elected
/// members takes no more.
pub struct PerConstituencyLimit {
    pub quota_limit : usize,
}

impl QuotaPolicy for PerConstituencyLimit {
    fn quota_exceeded(&mut self,candidate:CandidateIndex,metadata:&ElectionMetadata,elected_per_constituency:&[usize],_log:&mut AuditLog) -> anyhow::Result<bool> {
        match metadata.candidate(candidate).constituency {
            Some(constituency) => Ok(elected_per_constituency[constituency.0]>=self.quota_limit),
            None => Ok(false),
        }
    }
}

/// Like [PerConstituencyLimit], except that when there are fewer constituencies
/// than seats the limit cannot hold for everyone, so it may be overruled up to
/// `seats - constituency_count` times. Each overrule writes a COMMENT record.
/// The consumed-budget counter lasts for the lifetime of the policy value,
/// i.e. one count.
pub struct OverruleWhenConstituenciesFewerThanSeats {
    seats : NumberOfSeats,
    limit : PerConstituencyLimit,
    overruled : usize,
}

impl OverruleWhenConstituenciesFewerThanSeats {
    pub fn new(seats:NumberOfSeats,quota_limit:usize) -> Self {
        OverruleWhenConstituenciesFewerThanSeats{ seats, limit: PerConstituencyLimit{quota_limit}, overruled: 0 }
    }
}

impl QuotaPolicy for OverruleWhenConstituenciesFewerThanSeats {
    fn quota_exceeded(&mut self,candidate:CandidateIndex,metadata:&ElectionMetadata,elected_per_constituency:&[usize],log:&mut AuditLog) -> anyhow::Result<bool> {
        if !self.limit.quota_exceeded(candidate,metadata,elected_per_constituency,log)? { return Ok(false); }
        let budget = self.seats.0.saturating_sub(metadata.constituencies.len());
        if self.overruled<budget {
            self.overruled+=1;
            log.log(Action::Comment,"Quota overruled. Constituencies fewer than seats.".to_string());
            Ok(false)
        } else {
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::audit::{Action, AuditLog};
    use crate::ballot_metadata::{Candidate, CandidateIndex, Constituency, ConstituencyIndex, ElectionMetadata, NumberOfSeats};
    use crate::quota::{OverruleWhenConstituenciesFewerThanSeats, PerConstituencyLimit, QuotaPolicy};

    fn two_constituency_metadata() -> ElectionMetadata {
        ElectionMetadata{
            candidates: vec![
                Candidate{name:"a1".to_string(),constituency:Some(ConstituencyIndex(0))},
                Candidate{name:"a2".to_string(),constituency:Some(ConstituencyIndex(0))},
                Candidate{name:"b".to_string(),constituency:Some(ConstituencyIndex(1))},
                Candidate{name:"free".to_string(),constituency:None},
            ],
            constituencies: vec![
                Constituency{name:"X".to_string(),size:100},
                Constituency{name:"Y".to_string(),size:50},
            ],
        }
    }

    #[test]
    fn default_policy_blocks_at_the_limit() {
        let metadata = two_constituency_metadata();
        let mut log = AuditLog::default();
        let mut policy = PerConstituencyLimit{quota_limit:1};
        assert!(!policy.quota_exceeded(CandidateIndex(0),&metadata,&[0,0],&mut log).unwrap());
        assert!(policy.quota_exceeded(CandidateIndex(1),&metadata,&[1,0],&mut log).unwrap());
        assert!(!policy.quota_exceeded(CandidateIndex(2),&metadata,&[1,0],&mut log).unwrap());
        // a candidate outside any constituency is never capped
        assert!(!policy.quota_exceeded(CandidateIndex(3),&metadata,&[5,5],&mut log).unwrap());
        assert!(log.entries().is_empty());
    }

    #[test]
    fn overrule_consumes_its_budget_then_blocks() {
        let metadata = two_constituency_metadata();
        let mut log = AuditLog::default();
        // 3 seats, 2 constituencies: exactly one overrule available
        let mut policy = OverruleWhenConstituenciesFewerThanSeats::new(NumberOfSeats(3),1);
        assert!(!policy.quota_exceeded(CandidateIndex(1),&metadata,&[1,0],&mut log).unwrap());
        assert_eq!(1,log.entries().len());
        assert_eq!(Action::Comment,log.entries()[0].action);
        assert!(policy.quota_exceeded(CandidateIndex(1),&metadata,&[2,0],&mut log).unwrap());
        assert_eq!(1,log.entries().len());
    }

    #[test]
    fn overrule_with_no_shortfall_behaves_like_the_default() {
        let metadata = two_constituency_metadata();
        let mut log = AuditLog::default();
        let mut policy = OverruleWhenConstituenciesFewerThanSeats::new(NumberOfSeats(2),1);
        assert!(policy.quota_exceeded(CandidateIndex(1),&metadata,&[1,0],&mut log).unwrap());
        assert!(log.entries().is_empty());
    }
}
