use serde::{Deserialize, Serialize};

/// Semantic color tokens for chrome that does not come from the event color map.
///
/// Event markers, arrows and critical sections carry literal colors taken
/// from the supplied color map; everything else is resolved by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,

    Lifeline,
    LaneLabel,

    AxisText,

    SelectionFill,
    SelectionBorder,

    TooltipBackground,
    TooltipText,
}
