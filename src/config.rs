//! Stream accessor configuration.
//!
//! A [`StreamConfig`] is supplied when a reader or writer is constructed and
//! is immutable for the accessor's lifetime. It selects the byte order for
//! multi-byte primitives, the wire scheme signed varints use, and the width
//! cap for varint decoding. A single accessor never mixes varint modes;
//! streams that interleave encodings need one accessor per encoding.

/// Byte order applied to multi-byte primitive reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Least-significant byte first.
    #[default]
    LittleEndian,
    /// Most-significant byte first.
    BigEndian,
}

/// Wire scheme used for signed variable-length integers.
///
/// Both modes share the same unsigned layout: 7 value bits per byte,
/// least-significant group first, high bit set on every byte except the
/// last. The mode only decides how signed values map onto that layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarintMode {
    /// Fold the sign into bit 0 before grouping, so small negative values
    /// stay short (-1 encodes as one byte).
    #[default]
    Zigzag,
    /// Transport the two's-complement bit pattern unchanged, so negative
    /// values always occupy the maximum byte count.
    SevenBit,
}

/// Width cap for variable-length integer decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarintWidth {
    /// Accumulate into 32 bits: at most 5 encoded bytes.
    Bits32,
    /// Accumulate into 64 bits: at most 10 encoded bytes.
    #[default]
    Bits64,
}

impl VarintWidth {
    /// Width cap in bits.
    pub fn bits(&self) -> u32 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    /// Maximum number of encoded bytes for this width.
    pub fn max_bytes(&self) -> usize {
        match self {
            Self::Bits32 => 5,
            Self::Bits64 => 10,
        }
    }
}

/// Configuration for a stream reader or writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamConfig {
    /// Byte order for multi-byte primitives.
    pub byte_order: ByteOrder,
    /// Wire scheme for signed varints.
    pub varint_mode: VarintMode,
    /// Width cap for varint decoding.
    pub varint_width: VarintWidth,
}

impl StreamConfig {
    /// Little-endian stream with zigzag varints capped at 64 bits.
    pub const LITTLE_ENDIAN: Self = Self {
        byte_order: ByteOrder::LittleEndian,
        varint_mode: VarintMode::Zigzag,
        varint_width: VarintWidth::Bits64,
    };

    /// Big-endian stream with zigzag varints capped at 64 bits.
    pub const BIG_ENDIAN: Self = Self {
        byte_order: ByteOrder::BigEndian,
        varint_mode: VarintMode::Zigzag,
        varint_width: VarintWidth::Bits64,
    };

    /// Little-endian stream with two's-complement 7-bit varints capped at
    /// 32 bits, matching serializers built on the 7-bit encoded scheme.
    pub const SEVEN_BIT: Self = Self {
        byte_order: ByteOrder::LittleEndian,
        varint_mode: VarintMode::SevenBit,
        varint_width: VarintWidth::Bits32,
    };

    /// Create a configuration with the default varint width.
    pub fn new(byte_order: ByteOrder, varint_mode: VarintMode) -> Self {
        Self {
            byte_order,
            varint_mode,
            varint_width: VarintWidth::default(),
        }
    }

    /// Set the byte order.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Set the signed varint scheme.
    pub fn with_varint_mode(mut self, varint_mode: VarintMode) -> Self {
        self.varint_mode = varint_mode;
        self
    }

    /// Set the varint width cap.
    pub fn with_varint_width(mut self, varint_width: VarintWidth) -> Self {
        self.varint_width = varint_width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StreamConfig::default();
        assert_eq!(config.byte_order, ByteOrder::LittleEndian);
        assert_eq!(config.varint_mode, VarintMode::Zigzag);
        assert_eq!(config.varint_width, VarintWidth::Bits64);
        assert_eq!(config, StreamConfig::LITTLE_ENDIAN);
    }

    #[test]
    fn test_seven_bit_preset() {
        let config = StreamConfig::SEVEN_BIT;
        assert_eq!(config.byte_order, ByteOrder::LittleEndian);
        assert_eq!(config.varint_mode, VarintMode::SevenBit);
        assert_eq!(config.varint_width, VarintWidth::Bits32);
    }

    #[test]
    fn test_width_caps() {
        assert_eq!(VarintWidth::Bits32.bits(), 32);
        assert_eq!(VarintWidth::Bits32.max_bytes(), 5);
        assert_eq!(VarintWidth::Bits64.bits(), 64);
        assert_eq!(VarintWidth::Bits64.max_bytes(), 10);
    }

    #[test]
    fn test_builders() {
        let config = StreamConfig::default()
            .with_byte_order(ByteOrder::BigEndian)
            .with_varint_mode(VarintMode::SevenBit)
            .with_varint_width(VarintWidth::Bits32);
        assert_eq!(config.byte_order, ByteOrder::BigEndian);
        assert_eq!(config.varint_mode, VarintMode::SevenBit);
        assert_eq!(config.varint_width, VarintWidth::Bits32);
    }
}
