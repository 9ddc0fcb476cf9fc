//
// numeric.rs
// Copyright (C) 2022 matthew <matthew@matthew-VirtualBox>
// Distributed under terms of the MIT license.
//

//! Shared digit-reading for numeric character references (spec §4.C
//! `\%d` `\%o` `\%x` `\%u` `\%U`, and the unprefixed `\d` `\o` `\x` `\u`
//! `\U` collection variants, "the same digit-width rules").

/// Reads up to `max_digits` characters of the given radix starting at
/// `pos` in `chars`, returning the parsed value and how many characters
/// (not counting the leading type letter) were consumed. `letter` picks
/// the radix and width; unrecognised letters read nothing.
///
/// `pos` points at the first digit, i.e. just past the `d`/`o`/`x`/`u`/`U`
/// letter itself.
pub fn parse_numeric_ref(chars: &[char], pos: usize, letter: char) -> (u32, usize) {
    let (radix, max_digits) = match letter {
        'd' => (10, 3),
        'o' => (8, 3),
        'x' => (16, 2),
        'u' => (16, 4),
        'U' => (16, 8),
        _ => return (0, 0),
    };
    let mut value: u32 = 0;
    let mut consumed = 0;
    while consumed < max_digits {
        match chars.get(pos + consumed).and_then(|c| c.to_digit(radix)) {
            Some(d) => {
                value = value * radix + d;
                consumed += 1;
            }
            None => break,
        }
    }
    (value, consumed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(s: &str, letter: char) -> (u32, usize) {
        let chars: Vec<char> = s.chars().collect();
        parse_numeric_ref(&chars, 0, letter)
    }

    #[test]
    fn decimal_reads_up_to_three_digits() {
        assert_eq!(run("123abc", 'd'), (123, 3));
        assert_eq!(run("9x", 'd'), (9, 1));
    }

    #[test]
    fn octal_caps_at_377() {
        assert_eq!(run("377", 'o'), (0o377, 3));
    }

    #[test]
    fn hex_two_digits() {
        assert_eq!(run("4a1", 'x'), (0x4a, 2));
    }

    #[test]
    fn hex_four_digits_for_u() {
        assert_eq!(run("20ACz", 'u'), (0x20ac, 4));
    }

    #[test]
    fn hex_eight_digits_for_upper_u() {
        assert_eq!(run("0010ffff", 'U'), (0x0010ffff, 8));
    }

    #[test]
    fn stops_at_first_non_digit() {
        assert_eq!(run("4g", 'x'), (4, 1));
    }
}
