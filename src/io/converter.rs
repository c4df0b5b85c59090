use crate::{io::midi::MidiEvent, synth::message::BankMessage};

const ALL_SOUND_OFF: u8 = 120;
const ALL_NOTES_OFF: u8 = 123;

/// Translate a MIDI event on `channel_filter` into a bank command.
///
/// A note-on with velocity 0 is a note-off. Events on other channels, and
/// messages the bank has no use for, map to `None`.
pub fn midi_to_message<S>(midi: MidiEvent, channel_filter: u8) -> Option<BankMessage<S>> {
    match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity: 0,
        } if channel == channel_filter => Some(BankMessage::NoteOff { note: key.into() }),
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } if channel == channel_filter => Some(BankMessage::NoteOn {
            note: key.into(),
            velocity,
            frequency: None,
        }),
        MidiEvent::NoteOff { channel, key, .. } if channel == channel_filter => {
            Some(BankMessage::NoteOff { note: key.into() })
        }
        MidiEvent::ControlChange {
            channel,
            controller,
            ..
        } if channel == channel_filter => match controller {
            ALL_SOUND_OFF => Some(BankMessage::ResetAll),
            ALL_NOTES_OFF => Some(BankMessage::AllNotesOff),
            _ => None,
        },
        _ => None,
    }
}
