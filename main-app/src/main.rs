// Copyright 2024-2025 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


use std::fs::File;
use std::path::PathBuf;
use clap::{Parser, ValueEnum};
use svt::audit::{AuditSink, LogEntry, Severity};
use svt::ballot_metadata::NumberOfSeats;
use svt::election_data::ElectionData;
use svt::parse_util::{read_ballots, read_ballots_file, read_constituencies_file};
use svt::quota::{OverruleWhenConstituenciesFewerThanSeats, PerConstituencyLimit, QuotaPolicy};
use svt::vote_count::{count_votes, OutcomeWithMetadata};

#[derive(Parser)]
#[command(version, author)]
/// Count a Single Transferable Vote election with fractional surplus transfers,
/// optional per-constituency quotas, and a full audit log on stdout.
struct Opts {
    /// The CSV file of ballots, one ballot per row, cells being candidate names
    /// in decreasing order of preference. Read from stdin if not given.
    #[arg(short, long)]
    ballots : Option<PathBuf>,

    /// The number of seats to fill.
    #[arg(short, long)]
    seats : usize,

    /// An optional CSV file of constituencies, one per row as name,size,candidate1,candidate2,...
    #[arg(short, long)]
    constituencies : Option<PathBuf>,

    /// The maximum number of candidates a constituency may have elected. 0 disables the cap.
    #[arg(short, long, default_value_t = 0)]
    quota : usize,

    /// Which quota policy decides whether a capped candidate is rejected.
    #[arg(long, value_enum, default_value = "default")]
    policy : PolicyChoice,

    /// A seed for the tie-breaking randomness, decimal or 0x-prefixed hex.
    /// Runs with the same inputs and seed are bit-identical.
    #[arg(short = 'r', long = "random", value_parser = parse_seed)]
    random : Option<u64>,

    /// How much of the audit log to print: info, or debug to include every ballot transfer batch.
    #[arg(short = 'l', long = "loglevel", default_value = "info")]
    loglevel : Severity,

    /// An optional file to store the full outcome (metadata, results, tallies, log) as JSON.
    #[arg(short, long)]
    transcript : Option<PathBuf>,
}

#[derive(Copy,Clone,ValueEnum)]
enum PolicyChoice {
    /// reject a candidate whose constituency already has quota-limit members elected.
    Default,
    /// as default, but overrule the quota up to seats-constituencies times when
    /// there are fewer constituencies than seats.
    OverruleFewerConstituencies,
}

fn parse_seed(s:&str) -> Result<u64,String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(||s.strip_prefix("0X")) { u64::from_str_radix(hex,16) } else { s.parse() };
    parsed.map_err(|e|format!("{} is not a valid seed: {}",s,e))
}

/// Prints each audit record as it is produced, `<tag> <description>` per line.
struct StdoutAudit {
    min_severity : Severity,
}

impl AuditSink for StdoutAudit {
    fn accept(&mut self,entry:&LogEntry) {
        if entry.action.severity()>=self.min_severity { println!("{}",entry); }
    }
}

fn main() -> anyhow::Result<()> {
    let opt : Opts = Opts::parse();

    let ballots = match &opt.ballots {
        Some(path) => read_ballots_file(path)?,
        None => read_ballots(std::io::stdin())?,
    };
    let (constituencies,constituency_map) = match &opt.constituencies {
        Some(path) => read_constituencies_file(path)?,
        None => (vec![],vec![]),
    };
    let data = ElectionData::from_names(&ballots,&constituencies,&constituency_map)?;

    let seats = NumberOfSeats(opt.seats);
    let policy : Box<dyn QuotaPolicy> = match opt.policy {
        PolicyChoice::Default => Box::new(PerConstituencyLimit{quota_limit:opt.quota}),
        PolicyChoice::OverruleFewerConstituencies => Box::new(OverruleWhenConstituenciesFewerThanSeats::new(seats,opt.quota)),
    };
    let sink = Box::new(StdoutAudit{min_severity:opt.loglevel});

    let outcome = count_votes(&data,seats,opt.quota,policy,opt.random,sink)?;

    if let Some(transcript_file) = &opt.transcript {
        if let Some(parent) = transcript_file.parent() { std::fs::create_dir_all(parent)? }
        let with_metadata = OutcomeWithMetadata{ metadata: data.metadata.clone(), outcome: outcome.clone() };
        serde_json::to_writer(File::create(transcript_file)?,&with_metadata)?;
    }

    println!("Results:");
    for decision in &outcome.elected {
        println!("({}, {}, {})",data.metadata.candidate(decision.who).name,decision.round,decision.votes);
    }

    Ok(())
}
