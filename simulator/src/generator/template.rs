/// Linearly decaying pulse used for recoil bursts, `length` samples long.
pub fn decay_envelope(length: usize, peak: f32) -> Vec<f32> {
    (0..length)
        .map(|i| peak * (1.0 - i as f32 / length as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_starts_at_peak_and_decays() {
        let pulse = decay_envelope(4, 4.0);
        assert_eq!(pulse, vec![4.0, 3.0, 2.0, 1.0]);
        assert!(decay_envelope(0, 1.0).is_empty());
    }
}
