//! Output file naming for windows.
//!
//! Pad counts are encoded in the file name so the duration pass can tell
//! padded windows apart without opening them:
//!
//! ```text
//! <basename>-win<N>-<keysuffix>-padded(l#<4 digits>-r#<4 digits>)<ext>
//! ```

use crate::core::windowing::PadCounts;
use std::fmt;
use std::path::Path;

const PAD_OPEN: &str = "(l#";
const PAD_MID: &str = "-r#";

/// Components of a window's output file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowFileName {
    pub stem: String,
    pub win_size: usize,
    pub key_suffix: String,
    pub pad: PadCounts,
    /// Extension including its leading dot, or empty.
    pub ext: String,
}

impl WindowFileName {
    /// Name the window cut from `source` for `group_key`, keeping the last
    /// `key_suffix_len` characters of the key.
    pub fn new(
        source: &Path,
        win_size: usize,
        group_key: &str,
        key_suffix_len: usize,
        pad: PadCounts,
    ) -> Self {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        Self {
            stem,
            win_size,
            key_suffix: key_suffix(group_key, key_suffix_len),
            pad,
            ext,
        }
    }
}

impl fmt::Display for WindowFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-win{}-{}-padded(l#{:04}-r#{:04}){}",
            self.stem, self.win_size, self.key_suffix, self.pad.left, self.pad.right, self.ext
        )
    }
}

/// The last `len` characters of `key`. A zero length, or a key shorter than
/// `len`, keeps the whole key.
pub fn key_suffix(key: &str, len: usize) -> String {
    if len == 0 {
        return key.to_string();
    }
    let count = key.chars().count();
    key.chars().skip(count.saturating_sub(len)).collect()
}

/// Recover the pad counts from a file name, if it carries a pad marker.
pub fn parse_pad_counts(file_name: &str) -> Option<PadCounts> {
    let start = file_name.rfind(PAD_OPEN)? + PAD_OPEN.len();
    let rest = &file_name[start..];

    let (left, rest) = rest.split_once(PAD_MID)?;
    let (right, _) = rest.split_once(')')?;

    if !is_digits(left) || !is_digits(right) {
        return None;
    }
    Some(PadCounts::new(left.parse().ok()?, right.parse().ok()?))
}

/// True when the file name marks a window with no padding on either side.
pub fn is_unpadded(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(parse_pad_counts)
        .map(|pad| pad.is_unpadded())
        .unwrap_or(false)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
