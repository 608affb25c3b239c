/// Behaviors that differ between Chip-8 interpreter lineages
///
/// The default is the modern convention most programs written after the
/// original COSMAC VIP expect; [`Quirks::cosmac_vip`] restores the original behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Quirks {
    /// 8xy6/8xyE copy Vy into Vx before shifting instead of shifting Vx in place
    pub shift_uses_vy: bool,

    /// Fx55/Fx65 leave I pointing one past the last register transferred
    pub load_store_increments_index: bool,
}

impl Quirks {
    pub fn modern() -> Self {
        Self::default()
    }

    pub fn cosmac_vip() -> Self {
        Self {
            shift_uses_vy: true,
            load_store_increments_index: true,
        }
    }
}
