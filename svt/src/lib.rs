// Copyright 2024 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.


pub mod ballot_metadata;
pub mod ballot_paper;
pub mod election_data;
pub mod audit;
pub mod errors;
pub mod random_util;
pub mod tie_resolution;
pub mod transfer;
pub mod quota;
pub mod vote_count;
pub mod parse_util;
pub mod util;
