use anyhow::Result;
use dense_linear_assignment::SquareMatrix;

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// Counts of vowels, consonants and other characters (digits, hyphens, ...)
/// in a name. Only alphabetic characters count towards the first two.
pub fn count_chars(name: &str) -> (usize, usize, usize) {
    let mut vowels = 0;
    let mut consonants = 0;
    let mut other = 0;
    for ch in name.chars() {
        if ch.is_ascii_alphabetic() {
            if VOWELS.contains(&ch.to_ascii_lowercase()) {
                vowels += 1;
            } else {
                consonants += 1;
            }
        } else {
            other += 1;
        }
    }
    (vowels, consonants, other)
}

fn gcd(a: usize, b: usize) -> usize {
    let (mut a, mut b) = (a, b);
    while b > 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Toy binding-affinity weights between two name lists.
///
/// The rules carry no scientific meaning, they just produce a deterministic
/// weight matrix: an even-length left name binds by twice the right name's
/// vowel count, an odd-length one by 2.5 times its consonant count, and a
/// common factor in the name lengths raises the affinity by 25%.
///
/// Unequal list sizes are padded with zero-weight rows or columns so the
/// result is always square, which is what the solvers assume.
pub fn affinity_matrix(left: &[String], right: &[String]) -> Result<SquareMatrix, anyhow::Error> {
    let order = left.len().max(right.len());
    let mut rows = vec![vec![0.; order]; order];
    for (i, left_name) in left.iter().enumerate() {
        let left_len = left_name.chars().count();
        for (j, right_name) in right.iter().enumerate() {
            let right_len = right_name.chars().count();
            let (vowels, consonants, _) = count_chars(right_name);
            let mut affinity = if left_len % 2 == 0 {
                vowels as f64 * 2.0
            } else {
                consonants as f64 * 2.5
            };
            if gcd(left_len, right_len) > 1 {
                affinity *= 1.25;
            }
            rows[i][j] = affinity;
        }
    }
    SquareMatrix::from_rows(rows.as_slice())
}
