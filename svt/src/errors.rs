// Copyright 2024 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Everything that can go wrong before or during a count. All input problems are
//! surfaced before any counting starts; once the rounds are under way the only
//! recoverable failure is a quota callback refusing to answer.

#[derive(thiserror::Error, Debug)]
pub enum CountError {
    #[error("no ballots to count")]
    EmptyBallots,
    #[error("number of seats {seats} must be at least 1 and at most the number of candidates {candidates}")]
    InvalidSeats{seats:usize,candidates:usize},
    #[error("ballot {index} has an empty preference list")]
    MalformedBallot{index:usize},
    #[error("candidate {candidate} is assigned to constituency {constituency} which is not in the constituencies table")]
    UnknownConstituencyReference{candidate:String,constituency:String},
    #[error("quota callback failed: {0}")]
    QuotaCallbackFailure(#[source] anyhow::Error),
}
