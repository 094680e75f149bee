/// Single-pole exponential low-pass filter
///
/// Each sample moves the output a fixed fraction of the way towards the
/// input: `y += (x - y) * coef`. A larger coefficient tracks faster and
/// smooths less. With `coef` in (0, 1] the output never leaves the range of
/// the inputs and the starting value.
#[derive(Debug, Clone)]
pub struct LowPass {
    coef: f32,
    value: f32,
}

impl LowPass {
    /// Create a filter starting at zero
    ///
    /// # Arguments
    /// * `coef` - Fraction of the error removed per sample, in (0, 1]
    pub fn new(coef: f32) -> Self {
        Self::with_initial(coef, 0.0)
    }

    /// Create a filter starting at `initial`
    ///
    /// # Arguments
    /// * `coef` - Fraction of the error removed per sample, in (0, 1]
    /// * `initial` - Output before the first sample
    pub fn with_initial(coef: f32, initial: f32) -> Self {
        Self {
            coef,
            value: initial,
        }
    }

    /// Feed one sample and return the updated output
    ///
    /// # Returns
    /// The filter output after moving `coef` of the way towards `sample`
    pub fn update(&mut self, sample: f32) -> f32 {
        self.value += (sample - self.value) * self.coef;
        self.value
    }

    /// Current output
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Jump the output to `value`
    pub fn reset(&mut self, value: f32) {
        self.value = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowpass_step_response() {
        let mut lpf = LowPass::new(0.5);

        assert!((lpf.update(1.0) - 0.5).abs() < 1e-6);
        assert!((lpf.update(1.0) - 0.75).abs() < 1e-6);
        assert!((lpf.update(1.0) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_lowpass_converges_monotonically() {
        let mut lpf = LowPass::with_initial(0.1, 3.335);

        let v0 = lpf.update(3.295);
        let v1 = lpf.update(3.295);
        let v2 = lpf.update(3.295);

        assert!(3.295 < v2 && v2 < v1 && v1 < v0 && v0 < 3.335);
    }

    #[test]
    fn test_unit_coefficient_follows_input() {
        let mut lpf = LowPass::new(1.0);
        assert_eq!(lpf.update(42.0), 42.0);
        assert_eq!(lpf.update(-7.0), -7.0);
    }

    #[test]
    fn test_reset() {
        let mut lpf = LowPass::new(0.1);
        lpf.update(10.0);
        lpf.reset(5.0);
        assert_eq!(lpf.value(), 5.0);
    }
}
