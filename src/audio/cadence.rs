/// Phase accumulator pacing the bip-bip cadence
///
/// Every cycle the accumulator advances by `frequency * scale + offset`, with
/// the 16-bit two's-complement wrap of the microcontroller `int` it was
/// designed around. While the accumulator is positive the climb tone is
/// gapped, so the bip rate rises with the climb rate. Strong sink
/// (`frequency * scale < -offset`) turns the phase backwards.
///
/// The accumulator is never reset during a run.
#[derive(Debug, Clone)]
pub struct BipCadence {
    acc: i16,
    scale: f32,
    offset: f32,
}

impl BipCadence {
    /// Create a cadence with the accumulator at zero
    ///
    /// # Arguments
    /// * `scale` - Accumulator units per unit of tone frequency
    /// * `offset` - Constant step added every cycle; sets the bip rate at zero climb
    pub fn new(scale: f32, offset: f32) -> Self {
        Self {
            acc: 0,
            scale,
            offset,
        }
    }

    /// Advance by one cycle and return the new accumulator value
    pub fn advance(&mut self, tone_frequency: f32) -> i16 {
        let sum = self.acc as f32 + tone_frequency * self.scale + self.offset;
        // Truncate toward zero, then keep the low 16 bits
        self.acc = (sum as i32) as i16;
        self.acc
    }

    /// Current accumulator value
    pub fn value(&self) -> i16 {
        self.acc
    }

    /// Whether the current cycle is a gap in the bip pattern
    pub fn in_gap(&self) -> bool {
        self.acc > 0
    }
}
