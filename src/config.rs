use crate::format::ByteOrder;

/// Construction options for a [`BufferTransformer`](crate::BufferTransformer).
///
/// # Example
///
/// ```
/// use baked_buffer::{BufferConfig, ByteOrder};
///
/// let config = BufferConfig::new()
///     .label("water wheel")
///     .byte_order(ByteOrder::Little);
/// assert_eq!(config.label, "water wheel");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferConfig {
    /// Name used in log output.
    pub label: String,
    /// Byte order the source buffer was written in.
    pub byte_order: ByteOrder,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            label: "Baked Buffer".to_string(),
            byte_order: ByteOrder::Native,
        }
    }
}

impl BufferConfig {
    /// Same as [`Default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name used in log events.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the byte order of the wrapped buffer.
    pub fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }
}
