//! Content classification
//!
//! Decides whether bytes that failed UTF-8 decoding look like binary data or
//! like text in some other encoding.

/// Verdict for content that is not valid UTF-8
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undecodable {
    Binary,
    ForeignEncoding,
}

/// Heuristic classifier over a leading window of the content.
///
/// A NUL byte anywhere in the window means binary. Otherwise the share of
/// non-text bytes (invalid UTF-8 bytes and control characters other than
/// tab, LF, CR, FF and ESC) is compared against `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentClassifier {
    sniff_bytes: usize,
    threshold: f64,
}

impl ContentClassifier {
    pub fn new(sniff_bytes: usize, threshold: f64) -> Self {
        Self {
            sniff_bytes: sniff_bytes.max(1),
            threshold,
        }
    }

    pub fn classify(&self, bytes: &[u8]) -> Undecodable {
        let window = &bytes[..bytes.len().min(self.sniff_bytes)];
        if window.is_empty() {
            return Undecodable::ForeignEncoding;
        }
        if window.contains(&0) {
            return Undecodable::Binary;
        }

        if non_text_ratio(window) >= self.threshold {
            Undecodable::Binary
        } else {
            Undecodable::ForeignEncoding
        }
    }
}

/// Share of bytes in `window` that do not belong in a text file.
pub fn non_text_ratio(window: &[u8]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }

    let mut suspicious = 0usize;
    for chunk in window.utf8_chunks() {
        suspicious += chunk.invalid().len();
        suspicious += chunk
            .valid()
            .bytes()
            .filter(|b| is_control_byte(*b))
            .count();
    }
    suspicious as f64 / window.len() as f64
}

fn is_control_byte(byte: u8) -> bool {
    match byte {
        b'\t' | b'\n' | b'\r' | 0x0c | 0x1b => false,
        b if b < 0x20 => true,
        0x7f => true,
        _ => false,
    }
}
