// Copyright 2024 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Reading ballots and constituencies from their CSV file formats.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use anyhow::anyhow;

fn csv_reader<R:Read>(source:R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().has_headers(false).flexible(true).trim(csv::Trim::All).from_reader(source)
}

/// Read ballots, one per row, cells being candidate names in decreasing order of
/// preference. Rows may have differing lengths.
pub fn read_ballots<R:Read>(source:R) -> anyhow::Result<Vec<Vec<String>>> {
    let mut ballots = vec![];
    for record in csv_reader(source).records() {
        let record = record?;
        ballots.push(record.iter().map(|s|s.to_string()).collect());
    }
    Ok(ballots)
}

pub fn read_ballots_file(path:&Path) -> anyhow::Result<Vec<Vec<String>>> {
    read_ballots(File::open(path)?)
}

/// Read constituencies, one per row as `name,size,candidate1,candidate2,...`.
/// Returns the constituencies table and the candidate to constituency map.
pub fn read_constituencies<R:Read>(source:R) -> anyhow::Result<(Vec<(String,usize)>,Vec<(String,String)>)> {
    let mut constituencies = vec![];
    let mut constituency_map = vec![];
    for record in csv_reader(source).records() {
        let record = record?;
        let name = record.get(0).ok_or_else(||anyhow!("constituency row with no name"))?.to_string();
        let size : usize = record.get(1).ok_or_else(||anyhow!("constituency {} has no size",name))?.parse()?;
        constituencies.push((name.clone(),size));
        for candidate in record.iter().skip(2) {
            constituency_map.push((candidate.to_string(),name.clone()));
        }
    }
    Ok((constituencies,constituency_map))
}

pub fn read_constituencies_file(path:&Path) -> anyhow::Result<(Vec<(String,usize)>,Vec<(String,String)>)> {
    read_constituencies(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use crate::parse_util::{read_ballots, read_constituencies};

    #[test]
    fn ballots_parse_with_ragged_rows_and_whitespace() {
        let ballots = read_ballots("Chocolate,Strawberry\nOrange\nPear, Orange\n".as_bytes()).unwrap();
        assert_eq!(vec![
            vec!["Chocolate".to_string(),"Strawberry".to_string()],
            vec!["Orange".to_string()],
            vec!["Pear".to_string(),"Orange".to_string()],
        ],ballots);
    }

    #[test]
    fn constituencies_parse_into_table_and_map() {
        let (constituencies,map) = read_constituencies("North,100,a1,a2\nSouth,50,b\n".as_bytes()).unwrap();
        assert_eq!(vec![("North".to_string(),100),("South".to_string(),50)],constituencies);
        assert_eq!(vec![
            ("a1".to_string(),"North".to_string()),
            ("a2".to_string(),"North".to_string()),
            ("b".to_string(),"South".to_string()),
        ],map);
    }

    #[test]
    fn a_bad_size_is_an_error() {
        assert!(read_constituencies("North,lots,a1\n".as_bytes()).is_err());
    }
}
