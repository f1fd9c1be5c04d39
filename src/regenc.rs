// regenc.rs - Encoding helper for UTF-8 subject text.
//
// All positions are byte offsets into a UTF-8 buffer. Code points are
// decoded on demand for class membership, case folding and line tests.

pub type CodePoint = u32;

pub const MAX_ENC_LEN: usize = 4;

// === EncLen_UTF8 Table ===
// Maps the first byte to the character length. Stray continuation and
// invalid lead bytes count as one byte.

static ENC_LEN_UTF8: [u8; 256] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
];

#[inline]
fn utf8_islead(c: u8) -> bool {
    (c & 0xc0) != 0x80
}

#[inline]
pub fn mbc_enc_len(lead: u8) -> usize {
    ENC_LEN_UTF8[lead as usize] as usize
}

/// Decode the character starting at `s`. A sequence cut short by the end
/// of `data` decodes the bytes that are present.
pub fn mbc_to_code(data: &[u8], s: usize) -> CodePoint {
    let c = data[s] as u32;
    let len = mbc_enc_len(data[s]).min(data.len() - s);
    if len == 1 {
        return c;
    }
    let mut n = c & ((1u32 << (7 - len)) - 1);
    for &b in &data[s + 1..s + len] {
        n = (n << 6) | (b as u32 & 0x3f);
    }
    n
}

pub fn code_to_mbclen(code: CodePoint) -> usize {
    if code < 0x80 {
        1
    } else if code < 0x800 {
        2
    } else if code < 0x10000 {
        3
    } else {
        4
    }
}

/// Encode `code` into `buf`, returning the byte count.
pub fn code_to_mbc(code: CodePoint, buf: &mut [u8; MAX_ENC_LEN]) -> usize {
    match code_to_mbclen(code) {
        1 => {
            buf[0] = code as u8;
            1
        }
        2 => {
            buf[0] = ((code >> 6) & 0x1f) as u8 | 0xc0;
            buf[1] = (code & 0x3f) as u8 | 0x80;
            2
        }
        3 => {
            buf[0] = ((code >> 12) & 0x0f) as u8 | 0xe0;
            buf[1] = ((code >> 6) & 0x3f) as u8 | 0x80;
            buf[2] = (code & 0x3f) as u8 | 0x80;
            3
        }
        _ => {
            buf[0] = ((code >> 18) & 0x07) as u8 | 0xf0;
            buf[1] = ((code >> 12) & 0x3f) as u8 | 0x80;
            buf[2] = ((code >> 6) & 0x3f) as u8 | 0x80;
            buf[3] = (code & 0x3f) as u8 | 0x80;
            4
        }
    }
}

/// First byte of the UTF-8 form of `code`. Monotonic in `code`.
#[inline]
pub fn code_to_lead_byte(code: CodePoint) -> u8 {
    let mut buf = [0u8; MAX_ENC_LEN];
    code_to_mbc(code, &mut buf);
    buf[0]
}

// === Char head adjustment ===

pub fn left_adjust_char_head(data: &[u8], start: usize, s: usize) -> usize {
    if s <= start || s >= data.len() {
        return s;
    }
    let mut p = s;
    while p > start && !utf8_islead(data[p]) {
        p -= 1;
    }
    p
}

pub fn right_adjust_char_head(data: &[u8], start: usize, s: usize) -> usize {
    if s >= data.len() {
        return s;
    }
    let p = left_adjust_char_head(data, start, s);
    if p < s {
        p + mbc_enc_len(data[p])
    } else {
        p
    }
}

pub fn get_prev_char_head(data: &[u8], start: usize, s: usize) -> Option<usize> {
    if s <= start {
        None
    } else {
        Some(left_adjust_char_head(data, start, s - 1))
    }
}

/// Step back `n` characters from `s`, never crossing `start`.
pub fn step_back(data: &[u8], start: usize, s: usize, n: usize) -> Option<usize> {
    let mut s = s;
    for _ in 0..n {
        s = get_prev_char_head(data, start, s)?;
    }
    Some(s)
}

/// Count characters in `data[p..end]`.
pub fn strlen(data: &[u8], p: usize, end: usize) -> usize {
    let mut n = 0;
    let mut q = p;
    while q < end {
        q += mbc_enc_len(data[q]);
        n += 1;
    }
    n
}

// === Character predicates ===

#[inline]
pub fn is_code_newline(code: CodePoint) -> bool {
    code == 0x0a || code == 0x0d || code == 0x2028 || code == 0x2029
}

#[inline]
pub fn is_code_word(code: CodePoint) -> bool {
    code < 128 && (code as u8 == b'_' || (code as u8).is_ascii_alphanumeric())
}

/// True when a line terminator starts at `s`.
#[inline]
pub fn is_newline_at(data: &[u8], s: usize, end: usize) -> bool {
    if s >= end {
        return false;
    }
    match data[s] {
        0x0a | 0x0d => true,
        0xe2 => s + 2 < end && data[s + 1] == 0x80 && (data[s + 2] == 0xa8 || data[s + 2] == 0xa9),
        _ => false,
    }
}

/// True when the character ending right before `s` is a line terminator.
#[inline]
pub fn is_newline_before(data: &[u8], start: usize, s: usize) -> bool {
    match get_prev_char_head(data, start, s) {
        Some(p) => is_newline_at(data, p, s),
        None => false,
    }
}

#[inline]
pub fn is_word_at(data: &[u8], s: usize, end: usize) -> bool {
    s < end && is_code_word(data[s] as u32)
}

#[inline]
pub fn is_word_before(data: &[u8], start: usize, s: usize) -> bool {
    s > start && is_code_word(data[s - 1] as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_encode() {
        let s = "aé€😀".as_bytes();
        assert_eq!(mbc_to_code(s, 0), 'a' as u32);
        assert_eq!(mbc_to_code(s, 1), 'é' as u32);
        assert_eq!(mbc_to_code(s, 3), '€' as u32);
        assert_eq!(mbc_to_code(s, 6), '😀' as u32);
        let mut buf = [0u8; MAX_ENC_LEN];
        let n = code_to_mbc('€' as u32, &mut buf);
        assert_eq!(&buf[..n], "€".as_bytes());
        assert_eq!(code_to_mbclen(0x10ffff), 4);
    }

    #[test]
    fn lead_bytes_are_monotonic() {
        assert_eq!(code_to_lead_byte(0x7f), 0x7f);
        assert_eq!(code_to_lead_byte(0x80), 0xc2);
        assert_eq!(code_to_lead_byte(0xff), 0xc3);
        assert!(code_to_lead_byte(0x800) <= code_to_lead_byte(0xffff));
    }

    #[test]
    fn adjust_and_step_back() {
        let s = "aé€b".as_bytes();
        assert_eq!(left_adjust_char_head(s, 0, 2), 1);
        assert_eq!(right_adjust_char_head(s, 0, 2), 3);
        assert_eq!(right_adjust_char_head(s, 0, 3), 3);
        assert_eq!(step_back(s, 0, s.len(), 2), Some(3));
        assert_eq!(step_back(s, 0, s.len(), 4), Some(0));
        assert_eq!(step_back(s, 0, s.len(), 5), None);
        assert_eq!(strlen(s, 0, s.len()), 4);
    }

    #[test]
    fn newline_and_word() {
        let s = "a\u{2028}b\r".as_bytes();
        assert!(!is_newline_at(s, 0, s.len()));
        assert!(is_newline_at(s, 1, s.len()));
        assert!(is_newline_before(s, 0, 4));
        assert!(is_newline_at(s, 5, s.len()));
        assert!(is_word_at(s, 0, s.len()));
        assert!(!is_word_at(s, 1, s.len()));
        assert!(is_word_before(s, 0, 1));
        assert!(!is_word_before(s, 0, 0));
    }
}
