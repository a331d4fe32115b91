//! Human-readable summary of one class of groups.

use std::fmt;

use itertools::Itertools;

use crate::domain::grouping::GroupMapping;

/// The two output classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassLabel {
    Typical,
    Special,
}

impl ClassLabel {
    /// Direction of the cutoff for this class, as used in the header.
    pub fn qualifier(self) -> &'static str {
        match self {
            ClassLabel::Typical => "more",
            ClassLabel::Special => "fewer",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassLabel::Typical => "Typical",
            ClassLabel::Special => "Special",
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render the summary block for one class.
///
/// A header line naming the label, cutoff and percentage, followed by one
/// `name: count` line per group in mapping order.
pub fn summarise(groups: &GroupMapping, label: ClassLabel, cutoff: i64, percentage: f64) -> String {
    let header = format!(
        "\n{label} Types ({cutoff} occurrences or {}, {percentage:.0}% of the mean):\n",
        label.qualifier()
    );
    let lines = groups
        .iter()
        .map(|group| format!("{}: {}", group.name, group.len()))
        .join("\n");
    header + &lines
}
