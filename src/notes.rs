/*
Steelpan Note Range
===================

The instrument covers twenty chromatic notes, C#3 up to G#4. Hosts address
them by a plain integer id (0-19) rather than by MIDI number, so the id is
simply the position in the table below:

   id  name   Hz        id  name   Hz
   --  ----   ------    --  ----   ------
    0  C#3    138.59    10  B3     246.94
    1  D3     146.83    11  C4     261.63
    2  D#3    155.56    12  C#4    277.18
    3  E3     164.81    13  D4     293.66
    4  F3     174.61    14  D#4    311.13
    5  F#3    185.00    15  E4     329.63
    6  G3     196.00    16  F4     349.23
    7  G#3    207.65    17  F#4    369.99
    8  A3     220.00    18  G4     392.00
    9  A#3    233.08    19  G#4    415.30

Frequencies are the rounded equal-tempered values (A4 = 440 Hz). They are
stored, not computed, so every build plays exactly the same pitches.

Flat spellings (Eb3, Ab3, Bb3, Eb4, Ab4) resolve to the same ids as their
sharp equivalents.
*/

/// Number of playable notes.
pub const NOTE_COUNT: usize = 20;

/// Fundamental frequency in Hz for each note id.
pub const NOTE_FREQUENCIES: [f64; NOTE_COUNT] = [
    138.59, // C#3
    146.83, // D3
    155.56, // D#3
    164.81, // E3
    174.61, // F3
    185.00, // F#3
    196.00, // G3
    207.65, // G#3
    220.00, // A3
    233.08, // A#3
    246.94, // B3
    261.63, // C4
    277.18, // C#4
    293.66, // D4
    311.13, // D#4
    329.63, // E4
    349.23, // F4
    369.99, // F#4
    392.00, // G4
    415.30, // G#4
];

const NOTE_NAMES: [&str; NOTE_COUNT] = [
    "C#3", "D3", "D#3", "E3", "F3", "F#3", "G3", "G#3", "A3", "A#3", "B3", "C4", "C#4", "D4",
    "D#4", "E4", "F4", "F#4", "G4", "G#4",
];

const FLAT_NAMES: [(&str, u8); 5] = [("Eb3", 2), ("Ab3", 7), ("Bb3", 9), ("Eb4", 14), ("Ab4", 19)];

/// A validated note identifier in `0..NOTE_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(u8);

impl NoteId {
    /// Range-check a host-supplied id. Returns `None` outside `0..NOTE_COUNT`.
    pub fn new(id: i32) -> Option<Self> {
        if (0..NOTE_COUNT as i32).contains(&id) {
            Some(Self(id as u8))
        } else {
            None
        }
    }

    /// Resolve a note by its canonical ("D#3") or flat ("Eb3") name.
    pub fn by_name(name: &str) -> Option<Self> {
        if let Some(idx) = NOTE_NAMES.iter().position(|&n| n == name) {
            return Some(Self(idx as u8));
        }
        FLAT_NAMES
            .iter()
            .find(|(flat, _)| *flat == name)
            .map(|&(_, id)| Self(id))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Canonical (sharp) name, e.g. `"C#3"`.
    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.index()]
    }

    /// Iterate all ids in ascending pitch order.
    pub fn all() -> impl Iterator<Item = NoteId> {
        (0..NOTE_COUNT as u8).map(NoteId)
    }
}

impl TryFrom<i32> for NoteId {
    type Error = i32;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        NoteId::new(id).ok_or(id)
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable mapping from note id to fundamental frequency.
#[derive(Debug, Clone)]
pub struct NoteFrequencyTable {
    frequencies: [f64; NOTE_COUNT],
}

impl NoteFrequencyTable {
    pub fn new() -> Self {
        Self {
            frequencies: NOTE_FREQUENCIES,
        }
    }

    /// Frequency in Hz for a validated note.
    #[inline]
    pub fn frequency(&self, note: NoteId) -> f64 {
        self.frequencies[note.index()]
    }

    /// Frequency for a raw host id, or `None` when out of range.
    pub fn lookup(&self, id: i32) -> Option<f64> {
        NoteId::new(id).map(|note| self.frequency(note))
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

impl Default for NoteFrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
