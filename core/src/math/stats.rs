pub struct StatsHelper;

impl StatsHelper {
    pub fn mean<I>(values: I) -> f32
    where
        I: IntoIterator<Item = f32>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0.0f32, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            return 0.0;
        }
        sum / count as f32
    }

    pub fn magnitude(x: f32, y: f32, z: f32) -> f32 {
        (x * x + y * y + z * z).sqrt()
    }

    /// Clamps to `[0, 1]`, mapping non-finite input to `None`.
    pub fn unit(value: f32) -> Option<f32> {
        value.is_finite().then(|| value.clamp(0.0, 1.0))
    }
}
