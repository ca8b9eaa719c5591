//! Named Interval
//!
//! A chord quality or scale is a name plus semitone offsets from a root.

use crate::note::{NoteName, PitchClassSet};

/// Largest semitone offset accepted in a catalog entry.
pub const MAX_INTERVAL: u8 = 127;

/// Something described by a name and an ordered list of semitone offsets.
pub trait NamedInterval {
    /// Display name, e.g. `"Major 7th"`.
    fn name(&self) -> &str;

    /// Semitone offsets from the root, conventionally starting at 0.
    fn intervals(&self) -> &[u8];

    /// Short symbol used in chord names, if the shape has one.
    fn short_name(&self) -> Option<&str> {
        None
    }

    /// Pitch classes sounded when the offsets are built on `root`.
    ///
    /// Offsets an octave apart land on the same pitch class and collapse.
    fn pitch_classes(&self, root: NoteName) -> PitchClassSet {
        self.intervals()
            .iter()
            .map(|&off| root.shift(i32::from(off)))
            .collect()
    }

    /// Notes in interval order with octave doublings removed.
    fn notes(&self, root: NoteName) -> Vec<NoteName> {
        let mut seen = PitchClassSet::new();
        let mut notes = Vec::with_capacity(self.intervals().len());
        for &off in self.intervals() {
            let note = root.shift(i32::from(off));
            if !seen.contains(note) {
                seen.insert(note);
                notes.push(note);
            }
        }
        notes
    }

    /// Whether `note` belongs to this shape built on `root`.
    fn contains(&self, root: NoteName, note: NoteName) -> bool {
        self.pitch_classes(root).contains(note)
    }
}
