use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

bitflags! {
    /// Visual state of a single exercise option.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct OptionMarks: u8 {
        const SELECTED = 1;
        const CORRECT = 2;
        const INCORRECT = 4;
    }
}

impl OptionMarks {
    /// Space separated CSS classes, e.g. `"option selected incorrect"`.
    pub fn css_classes(self) -> alloc::string::String {
        let mut classes = alloc::string::String::from("option");
        for (name, flag) in [
            (" selected", OptionMarks::SELECTED),
            (" correct", OptionMarks::CORRECT),
            (" incorrect", OptionMarks::INCORRECT),
        ] {
            if self.contains(flag) {
                classes.push_str(name);
            }
        }
        classes
    }
}
