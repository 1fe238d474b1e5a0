#[derive(Debug, PartialEq, Clone, Copy)]
pub enum PlayerState {
    Loading,   // Frames still settling, indicator shown
    Ready,     // Every frame settled, scroll not yet bound
    Animating, // Scroll bound and smoothing loop running
}
