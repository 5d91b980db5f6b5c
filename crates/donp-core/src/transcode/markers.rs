/// Literal prefix/suffix bytes bounding a frame.
///
/// Markers are stored upper-cased, exactly as they are written to the wire.
///
/// # Examples
/// ```
/// use donp_core::FrameMarkers;
///
/// let markers = FrameMarkers::new(":", "\r\n");
/// assert!(markers.is_allowed(b':', 0, 10));
/// assert!(markers.is_allowed(b'\n', 9, 10));
/// assert!(!markers.is_allowed(b':', 5, 10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameMarkers {
    prefix: String,
    suffix: String,
}

impl FrameMarkers {
    pub fn new(prefix: &str, suffix: &str) -> Self {
        Self {
            prefix: prefix.to_ascii_uppercase(),
            suffix: suffix.to_ascii_uppercase(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn prefix_len(&self) -> usize {
        self.prefix.len()
    }

    pub fn suffix_len(&self) -> usize {
        self.suffix.len()
    }

    /// Whether `byte` at `index` of a `len`-byte buffer may bypass transcoding.
    ///
    /// This is a character-set test, not a positional match: any prefix
    /// character is accepted anywhere inside the prefix window, and likewise
    /// for the suffix. A data byte equal to a marker character inside a window
    /// is therefore misclassified; frames built by the engine never place data
    /// there.
    pub fn is_allowed(&self, byte: u8, index: usize, len: usize) -> bool {
        if !byte.is_ascii() {
            return false;
        }
        let ch = char::from(byte);
        if index < self.prefix.len() && self.prefix.contains(ch) {
            return true;
        }
        index + self.suffix.len() >= len && index < len && self.suffix.contains(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::FrameMarkers;

    #[test]
    fn markers_are_upper_cased() {
        let markers = FrameMarkers::new("stx", "etx");
        assert_eq!(markers.prefix(), "STX");
        assert_eq!(markers.suffix(), "ETX");
        assert_eq!(markers.prefix_len(), 3);
    }

    #[test]
    fn prefix_window_only() {
        let markers = FrameMarkers::new(":", "");
        assert!(markers.is_allowed(b':', 0, 4));
        assert!(!markers.is_allowed(b':', 1, 4));
        assert!(!markers.is_allowed(b'0', 0, 4));
    }

    #[test]
    fn suffix_window_only() {
        let markers = FrameMarkers::new("", "\r\n");
        assert!(markers.is_allowed(b'\r', 4, 6));
        assert!(markers.is_allowed(b'\n', 5, 6));
        assert!(!markers.is_allowed(b'\r', 3, 6));
    }

    #[test]
    fn character_set_membership_is_approximate() {
        // Order inside the window is not checked.
        let markers = FrameMarkers::new("", "\r\n");
        assert!(markers.is_allowed(b'\n', 4, 6));
    }

    #[test]
    fn non_ascii_never_allowed() {
        let markers = FrameMarkers::new(":", ":");
        assert!(!markers.is_allowed(0xBA, 0, 3));
    }
}
