// Copyright 2024 FractionalSTV contributors.
// This file is part of FractionalSTV.
// FractionalSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// FractionalSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with FractionalSTV.  If not, see <https://www.gnu.org/licenses/>.

//! Small numeric utilities.

/// Round a value to the given number of significant decimal digits.
///
/// The rounding goes through the decimal scientific representation rather than
/// log10/powi arithmetic, whose rounding at digit boundaries can vary between
/// platforms. Two runs that compute the same value get the same clamped value
/// everywhere.
/// ```
/// use svt::util::round_to_significant_decimals;
/// assert_eq!(0.666666666666667,round_to_significant_decimals(2.0/3.0,15));
/// assert_eq!(0.0,round_to_significant_decimals(0.0,15));
/// assert_eq!(3.0,round_to_significant_decimals(3.0,15));
/// ```
pub fn round_to_significant_decimals(value:f64,digits:usize) -> f64 {
    if value==0.0 || !value.is_finite() { return value; }
    format!("{:.*e}",digits-1,value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use crate::util::round_to_significant_decimals;

    #[test]
    fn integers_and_exact_fractions_are_unchanged() {
        assert_eq!(12.0,round_to_significant_decimals(12.0,15));
        assert_eq!(0.5,round_to_significant_decimals(0.5,15));
        assert_eq!(2.25,round_to_significant_decimals(4.5*0.5,15));
        assert_eq!(-7.0,round_to_significant_decimals(-7.0,15));
    }

    #[test]
    fn long_fractions_are_clamped() {
        assert_eq!(0.333333333333333,round_to_significant_decimals(1.0/3.0,15));
        assert_eq!(0.142857142857143,round_to_significant_decimals(1.0/7.0,15));
        // clamping is idempotent
        let clamped = round_to_significant_decimals(1.0/3.0,15);
        assert_eq!(clamped,round_to_significant_decimals(clamped,15));
    }

    #[test]
    fn very_small_and_large_magnitudes_keep_their_exponent() {
        assert_eq!(1.23456789012346e-9,round_to_significant_decimals(1.234567890123456789e-9,15));
        assert_eq!(1.23456789012346e9,round_to_significant_decimals(1.234567890123456789e9,15));
    }
}
