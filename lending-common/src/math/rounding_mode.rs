/// Defines the rounding strategy used when an unsigned fixed-point value loses precision.
///
/// Following the same naming convention as https://docs.rs/rust_decimal/latest/rust_decimal/enum.RoundingStrategy.html.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    /// The number is always rounded toward zero, e.g. `3.1 -> 3`, `3.9 -> 3`.
    ToZero,
    /// The number is rounded to the nearest, and when it is halfway between two others, it's rounded away from zero, e.g. `3.5 -> 4`.
    MidpointAwayFromZero,
}
