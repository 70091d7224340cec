use pipenet_core::Operation;

/// Boundary cases of an unconditioned `_count` comparison that can be
/// answered without grouping the related table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountShortcut {
    /// No related records.
    NoneRelated,
    /// At least one related record.
    AnyRelated,
    Always,
    /// A count can never be negative.
    Never,
}

pub fn count_shortcut(operation: Operation, threshold: i64) -> Option<CountShortcut> {
    match (operation, threshold) {
        (Operation::Equals | Operation::Lte, 0) => Some(CountShortcut::NoneRelated),
        (Operation::Gte, 0) => Some(CountShortcut::Always),
        (Operation::Lt, 0) => Some(CountShortcut::Never),
        (Operation::Gt, 0) | (Operation::Gte, 1) => Some(CountShortcut::AnyRelated),
        _ => None,
    }
}

/// Whether a segment with zero related records satisfies `0 op threshold`.
pub fn zero_count_matches(operation: Operation, threshold: i64) -> bool {
    match operation {
        Operation::Equals => threshold == 0,
        Operation::Not => threshold != 0,
        Operation::Lt => 0 < threshold,
        Operation::Lte => 0 <= threshold,
        Operation::Gt => 0 > threshold,
        Operation::Gte => 0 >= threshold,
        Operation::Contains | Operation::StartsWith | Operation::EndsWith => false,
    }
}
