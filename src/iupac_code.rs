const BASE_A: u8 = 1;
const BASE_C: u8 = 2;
const BASE_G: u8 = 4;
const BASE_T: u8 = 8;
const BASE_N: u8 = BASE_A | BASE_C | BASE_G | BASE_T;

/// A bitmasked IUPAC nucleotide class, eg BASE_A|BASE_G for `R`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct IupacCode(u8);

impl IupacCode {
    #[inline(always)]
    pub fn from_letter(letter: u8) -> Self {
        match letter.to_ascii_uppercase() {
            b'A' => Self(BASE_A),
            b'C' => Self(BASE_C),
            b'G' => Self(BASE_G),
            b'T' | b'U' => Self(BASE_T),
            b'W' => Self(BASE_A | BASE_T),
            b'S' => Self(BASE_C | BASE_G),
            b'M' => Self(BASE_A | BASE_C),
            b'K' => Self(BASE_G | BASE_T),
            b'R' => Self(BASE_A | BASE_G),
            b'Y' => Self(BASE_C | BASE_T),
            b'B' => Self(BASE_C | BASE_G | BASE_T),
            b'D' => Self(BASE_A | BASE_G | BASE_T),
            b'H' => Self(BASE_A | BASE_C | BASE_T),
            b'V' => Self(BASE_A | BASE_C | BASE_G),
            b'N' => Self(BASE_N),
            _ => Self(0),
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Exactly one base, ie not an ambiguity code.
    #[inline(always)]
    pub fn is_single_base(&self) -> bool {
        self.0.count_ones() == 1
    }

    /// True when every letter names exactly one base.
    pub fn is_literal(sequence: &str) -> bool {
        !sequence.is_empty()
            && sequence
                .bytes()
                .all(|b| Self::from_letter(b).is_single_base())
    }

    #[inline(always)]
    pub fn is_nucleotide(letter: u8) -> bool {
        matches!(
            letter.to_ascii_uppercase(),
            b'A' | b'C' | b'G' | b'T' | b'U'
        )
    }

    #[inline(always)]
    pub fn is_gc(letter: u8) -> bool {
        matches!(letter.to_ascii_uppercase(), b'G' | b'C')
    }

    #[inline(always)]
    pub fn letter_complement(letter: u8) -> u8 {
        match letter.to_ascii_uppercase() {
            b'A' => b'T',
            b'C' => b'G',
            b'G' => b'C',
            b'T' | b'U' => b'A',
            _ => b'N',
        }
    }

    pub fn reverse_complement(sequence: &str) -> String {
        sequence
            .bytes()
            .rev()
            .map(|b| Self::letter_complement(b) as char)
            .collect()
    }
}
