//! Opcode length rules.
//!
//! A status byte has its high bit set (0x80-0xFF). Data bytes are 0x00-0x7F.
//! Channel messages carry their channel in the low nibble; the length of a
//! message depends only on the opcode, except for system exclusive blocks,
//! which run until the 0xF7 terminator.

/// Start of a system exclusive block.
pub const SYSEX_START: u8 = 0xF0;

/// End of a system exclusive block.
pub const SYSEX_END: u8 = 0xF7;

/// MIDI time code quarter frame.
pub const TIME_CODE: u8 = 0xF1;

/// Song position pointer.
pub const SONG_POSITION: u8 = 0xF2;

/// Song select.
pub const SONG_SELECT: u8 = 0xF3;

/// Lowest opcode of the single-byte range (tune request and real-time).
pub const SINGLE_BYTE_START: u8 = 0xF4;

/// Length reported by [`MessageLength::as_sentinel`] for unknown lengths.
/// Larger than any fixed-length MIDI message.
pub const UNKNOWN_LENGTH_SENTINEL: usize = 100;

/// Expected total length of a message, judged from what has arrived so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLength {
    /// The message is this many bytes long, status byte included.
    Known(usize),
    /// More bytes are needed before a length can be given.
    Unknown,
}

impl MessageLength {
    /// Numeric form, with [`UNKNOWN_LENGTH_SENTINEL`] standing in for `Unknown`.
    pub fn as_sentinel(self) -> usize {
        match self {
            MessageLength::Known(len) => len,
            MessageLength::Unknown => UNKNOWN_LENGTH_SENTINEL,
        }
    }

    /// True once `available` bytes are enough to hold the whole message.
    pub fn is_satisfied_by(self, available: usize) -> bool {
        match self {
            MessageLength::Known(len) => len <= available,
            MessageLength::Unknown => false,
        }
    }
}

/// Classify a partially accumulated message by its first byte.
pub fn classify(buffer: &[u8]) -> MessageLength {
    let Some(&opcode) = buffer.first() else {
        return MessageLength::Unknown;
    };

    if opcode >= SINGLE_BYTE_START {
        return MessageLength::Known(1);
    }
    if opcode == TIME_CODE || opcode == SONG_SELECT {
        return MessageLength::Known(2);
    }
    if opcode == SONG_POSITION {
        return MessageLength::Known(3);
    }
    if opcode == SYSEX_START && buffer.last() == Some(&SYSEX_END) {
        return MessageLength::Known(buffer.len());
    }

    match opcode & 0xF0 {
        0x80 | 0x90 | 0xA0 | 0xB0 | 0xE0 => MessageLength::Known(3),
        0xC0 | 0xD0 => MessageLength::Known(2),
        _ => MessageLength::Unknown,
    }
}

/// True if the buffer holds a whole message.
pub fn is_complete(buffer: &[u8]) -> bool {
    classify(buffer).is_satisfied_by(buffer.len())
}

/// Returns true for status bytes (high bit set).
pub fn is_status(byte: u8) -> bool {
    byte & 0x80 != 0
}

/// Returns true for status bytes that establish running status.
///
/// Single-byte messages (tune request and real-time) pass through without
/// disturbing the running status of the surrounding stream.
pub fn sets_running_status(byte: u8) -> bool {
    is_status(byte) && byte < SINGLE_BYTE_START
}

/// Returns a human-readable name for an opcode.
pub fn opcode_name(opcode: u8) -> &'static str {
    match opcode {
        SYSEX_START => "SYSEX",
        TIME_CODE => "TIME_CODE",
        SONG_POSITION => "SONG_POSITION",
        SONG_SELECT => "SONG_SELECT",
        0xF6 => "TUNE_REQUEST",
        SYSEX_END => "SYSEX_END",
        0xF8 => "CLOCK",
        0xFA => "START",
        0xFB => "CONTINUE",
        0xFC => "STOP",
        0xFE => "ACTIVE_SENSING",
        0xFF => "RESET",
        0xF4 | 0xF5 | 0xF9 | 0xFD => "UNDEFINED",
        _ => match opcode & 0xF0 {
            0x80 => "NOTE_OFF",
            0x90 => "NOTE_ON",
            0xA0 => "POLY_PRESSURE",
            0xB0 => "CONTROL_CHANGE",
            0xC0 => "PROGRAM_CHANGE",
            0xD0 => "CHANNEL_PRESSURE",
            0xE0 => "PITCH_BEND",
            _ => "DATA",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_is_unknown() {
        assert_eq!(classify(&[]), MessageLength::Unknown);
        assert_eq!(classify(&[]).as_sentinel(), UNKNOWN_LENGTH_SENTINEL);
    }

    #[test]
    fn single_byte_opcodes() {
        for opcode in 0xF4..=0xFFu8 {
            assert_eq!(classify(&[opcode]), MessageLength::Known(1), "{opcode:#04x}");
        }
    }

    #[test]
    fn system_common_lengths() {
        assert_eq!(classify(&[0xF1]), MessageLength::Known(2));
        assert_eq!(classify(&[0xF3]), MessageLength::Known(2));
        assert_eq!(classify(&[0xF2]), MessageLength::Known(3));
    }

    #[test]
    fn channel_voice_lengths_ignore_channel() {
        for high in [0x80u8, 0x90, 0xA0, 0xB0, 0xE0] {
            for channel in 0..16u8 {
                assert_eq!(classify(&[high | channel]), MessageLength::Known(3));
            }
        }
        for high in [0xC0u8, 0xD0] {
            for channel in 0..16u8 {
                assert_eq!(classify(&[high | channel]), MessageLength::Known(2));
            }
        }
    }

    #[test]
    fn sysex_is_complete_only_with_terminator() {
        let block = [0xF0, 0x7E, 0x7F, 0x06, 0x01, 0xF7];
        assert_eq!(classify(&block), MessageLength::Known(block.len()));
        assert_eq!(classify(&block[..5]), MessageLength::Unknown);
        assert_eq!(classify(&[0xF0]), MessageLength::Unknown);
    }

    #[test]
    fn data_and_undefined_first_bytes_are_unknown() {
        assert_eq!(classify(&[0x00, 0x40]), MessageLength::Unknown);
        assert_eq!(classify(&[0x7F]), MessageLength::Unknown);
    }

    #[test]
    fn completeness_compares_against_available_bytes() {
        assert!(!is_complete(&[0x90, 0x40]));
        assert!(is_complete(&[0x90, 0x40, 0x7F]));
        assert!(is_complete(&[0xF8]));
        assert!(!is_complete(&[0xF0, 0x01]));
    }

    #[test]
    fn running_status_excludes_single_byte_messages() {
        assert!(sets_running_status(0x90));
        assert!(sets_running_status(0xF0));
        assert!(!sets_running_status(0xF8));
        assert!(!sets_running_status(0xF6));
        assert!(!sets_running_status(0x40));
    }

    #[test]
    fn opcode_names() {
        assert_eq!(opcode_name(0x93), "NOTE_ON");
        assert_eq!(opcode_name(0xF8), "CLOCK");
        assert_eq!(opcode_name(0x12), "DATA");
    }
}
