// Copyright 2024-2025 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


//! The append-only audit log. Every component that does something consequential
//! during a count writes a record here; the full sequence of records is part of
//! the count's output and must be reproducible bit for bit given a seed.

use serde::{Serialize,Deserialize};
use std::fmt;
use std::str::FromStr;

/// The kind of event a log record describes. The serialized tokens are stable;
/// downstream log consumers match on them, so they must never change.
#[derive(Copy,Clone,Debug,Eq,PartialEq,Serialize,Deserialize)]
pub enum Action {
    #[serde(rename="@ROUND")] CountRound,
    #[serde(rename=">TRANSFER")] Transfer,
    #[serde(rename="-ELIMINATE")] Eliminate,
    #[serde(rename="!QUOTA")] Quota,
    #[serde(rename="+ELECT")] Elect,
    #[serde(rename=".COUNT")] Count,
    #[serde(rename="~ZOMBIES")] Zombies,
    #[serde(rename="%SEED")] Seed,
    #[serde(rename="*RANDOM")] Random,
    #[serde(rename="^THRESHOLD")] Threshold,
    #[serde(rename="oROUND_ROBIN")] RoundRobin,
    #[serde(rename="#CONSTITUENCY_TURN")] ConstituencyTurn,
    #[serde(rename="xSHUFFLE")] Shuffle,
    #[serde(rename="/SORT")] Sort,
    #[serde(rename="?COMMENT")] Comment,
}

impl Action {
    pub fn token(self) -> &'static str {
        match self {
            Action::CountRound => "@ROUND",
            Action::Transfer => ">TRANSFER",
            Action::Eliminate => "-ELIMINATE",
            Action::Quota => "!QUOTA",
            Action::Elect => "+ELECT",
            Action::Count => ".COUNT",
            Action::Zombies => "~ZOMBIES",
            Action::Seed => "%SEED",
            Action::Random => "*RANDOM",
            Action::Threshold => "^THRESHOLD",
            Action::RoundRobin => "oROUND_ROBIN",
            Action::ConstituencyTurn => "#CONSTITUENCY_TURN",
            Action::Shuffle => "xSHUFFLE",
            Action::Sort => "/SORT",
            Action::Comment => "?COMMENT",
        }
    }
    /// Ballot-by-ballot transfer batches are verbose; everything else is headline information.
    pub fn severity(self) -> Severity {
        match self {
            Action::Transfer => Severity::Debug,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f,"{}",self.token()) }
}

/// How much a log consumer probably cares about a record.
#[derive(Copy,Clone,Debug,Eq,PartialEq,Ord,PartialOrd,Serialize,Deserialize)]
pub enum Severity {
    Debug,
    Info,
}

impl FromStr for Severity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown log level {}, expected info or debug",s)),
        }
    }
}

/// One record in the audit log.
#[derive(Clone,Debug,Serialize,Deserialize,PartialEq)]
pub struct LogEntry {
    pub action : Action,
    pub detail : String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f,"{} {}",self.action.token(),self.detail) }
}

/// Somewhere for records to go as they are produced, e.g. a terminal printer.
/// The AuditLog retains every record regardless of what the sink does with it.
pub trait AuditSink {
    fn accept(&mut self,entry:&LogEntry);
}

/// A sink that ignores everything.
pub struct DiscardAudit;

impl AuditSink for DiscardAudit {
    fn accept(&mut self,_entry:&LogEntry) {}
}

/// The append-only audit log for a single count.
pub struct AuditLog {
    entries : Vec<LogEntry>,
    sink : Box<dyn AuditSink>,
}

impl Default for AuditLog {
    fn default() -> Self { AuditLog::new(Box::new(DiscardAudit)) }
}

impl AuditLog {
    pub fn new(sink:Box<dyn AuditSink>) -> Self { AuditLog{ entries: vec![], sink } }

    pub fn log(&mut self,action:Action,detail:String) {
        let entry = LogEntry{action,detail};
        self.sink.accept(&entry);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] { &self.entries }

    /// Whether any record with the given action has been written. Mostly useful in tests.
    pub fn contains(&self,action:Action) -> bool { self.entries.iter().any(|e|e.action==action) }

    pub fn into_entries(self) -> Vec<LogEntry> { self.entries }
}
