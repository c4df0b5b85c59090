#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Decode one channel voice message from raw bytes.
    ///
    /// Returns `None` for system messages, truncated input, or status bytes
    /// this crate doesn't act on.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        let channel = status & 0x0F;
        let data1 = |i: usize| data.get(i).map(|b| b & 0x7F);

        match status >> 4 {
            0x8 => Some(Self::NoteOff {
                channel,
                key: data1(0)?,
                velocity: data1(1)?,
            }),
            0x9 => Some(Self::NoteOn {
                channel,
                key: data1(0)?,
                velocity: data1(1)?,
            }),
            0xB => Some(Self::ControlChange {
                channel,
                controller: data1(0)?,
                value: data1(1)?,
            }),
            0xC => Some(Self::ProgramChange {
                channel,
                program: data1(0)?,
            }),
            0xE => {
                let lsb = data1(0)? as i16;
                let msb = data1(1)? as i16;
                Some(Self::PitchBend {
                    channel,
                    value: ((msb << 7) | lsb) - 8192,
                })
            }
            _ => None,
        }
    }
}
