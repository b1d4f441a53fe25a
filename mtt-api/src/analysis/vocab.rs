//! Fixed musical vocabularies
//!
//! Order matters: the UI indexes chart axes by position, so these
//! sequences must stay byte-for-byte stable across every section of
//! the analysis bundle.

/// The 12 pitch classes, chromatic ascending from C
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// The 25 signed intervals, descending octave to ascending octave,
/// symmetric around unison (P1 at index 12)
pub const INTERVALS: [&str; 25] = [
    "-P8", "-M7", "-m7", "-M6", "-m6", "-P5", "-d5", "-P4", "-M3", "-m3", "-M2", "-m2", "P1",
    "+m2", "+M2", "+m3", "+M3", "+P4", "+d5", "+P5", "+m6", "+M6", "+m7", "+M7", "+P8",
];

/// The 13 unsigned interval sizes, unison to octave
pub const INTERVAL_SIZES: [&str; 13] = [
    "P1", "MI2", "MA2", "MI3", "MA3", "P4", "D5", "P5", "MI6", "MA6", "MI7", "MA7", "P8",
];

/// The 12 directed interval sizes. Unison has no direction, so P1 is
/// dropped.
pub fn interval_directions() -> &'static [&'static str] {
    &INTERVAL_SIZES[1..]
}
