// Copyright 2025 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


//! The whole ingestion pipeline: CSV text in, seated candidates out.


#[cfg(test)]
mod tests {
    use svt::audit::DiscardAudit;
    use svt::ballot_metadata::NumberOfSeats;
    use svt::election_data::ElectionData;
    use svt::parse_util::{read_ballots, read_constituencies};
    use svt::quota::PerConstituencyLimit;
    use svt::vote_count::count_votes;

    #[test]
    fn csv_in_winners_out() {
        let ballots_csv = "\
Chocolate,Strawberry
Chocolate,Strawberry
Chocolate,Strawberry
Chocolate,Sweets
Orange
Orange
Pear,Orange
";
        let constituencies_csv = "Fruit,120,Orange,Pear,Strawberry\nConfectionery,80,Chocolate,Sweets\n";
        let ballots = read_ballots(ballots_csv.as_bytes()).unwrap();
        let (constituencies,map) = read_constituencies(constituencies_csv.as_bytes()).unwrap();
        let data = ElectionData::from_names(&ballots,&constituencies,&map).unwrap();
        assert_eq!(5,data.metadata.num_candidates());
        assert_eq!(7,data.num_ballots());

        // threshold floor(7/3)+1 = 3: Chocolate in with a surplus; Orange reaches
        // the threshold once Pear's elimination sends its ballot along
        let outcome = count_votes(&data,NumberOfSeats(2),0,Box::new(PerConstituencyLimit{quota_limit:0}),None,Box::new(DiscardAudit)).unwrap();
        let names : Vec<&str> = outcome.elected.iter().map(|d|data.metadata.candidate(d.who).name.as_str()).collect();
        assert_eq!(vec!["Chocolate","Orange"],names);
        assert_eq!(4.0,outcome.elected[0].votes);
        assert_eq!(3.0,outcome.elected[1].votes);
    }

    #[test]
    fn a_transcript_round_trips_through_json() {
        let ballots = read_ballots("A,B\nA,B\nB\n".as_bytes()).unwrap();
        let data = ElectionData::from_names(&ballots,&[],&[]).unwrap();
        let outcome = count_votes(&data,NumberOfSeats(1),0,Box::new(PerConstituencyLimit{quota_limit:0}),None,Box::new(DiscardAudit)).unwrap();
        let with_metadata = svt::vote_count::OutcomeWithMetadata{ metadata: data.metadata.clone(), outcome };
        let serialized = serde_json::to_string(&with_metadata).unwrap();
        let read_back : svt::vote_count::OutcomeWithMetadata = serde_json::from_str(&serialized).unwrap();
        assert_eq!(with_metadata.outcome.elected,read_back.outcome.elected);
        assert_eq!(with_metadata.outcome.log,read_back.outcome.log);
    }
}
