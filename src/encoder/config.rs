/// Encoder-Konfiguration.
#[derive(Debug, Clone, Default)]
pub struct EncoderConfig {
    /// Bytes reserved before the first field is written. 0 defers allocation
    /// until the first `add_*` call.
    pub initial_capacity: usize,
}

impl EncoderConfig {
    /// Konfiguration mit vorab reservierter Kapazität.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self { initial_capacity }
    }
}
