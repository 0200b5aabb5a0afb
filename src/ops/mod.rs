// ============================================================================
// OPS — the rotation core, leaf to root
// ============================================================================

pub mod segments;
pub mod quadrants;
pub mod stepper;
pub mod rotation;
pub mod animation;
