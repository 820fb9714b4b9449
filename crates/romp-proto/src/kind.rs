//! The message kind carried in every frame header.

/// Direction and payload shape of a frame, tagged by the 16-bit `kind` field.
///
/// These values are wire-stable; do not renumber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Kind {
    /// C→S. Encoded call; server replies with exactly one `Retval`/`Exception`.
    Request = 0x1001,
    /// C→S. Encoded call; server may interleave any number of `Yield`
    /// frames before the terminating `Retval`/`Exception`.
    RequestBlock = 0x1002,
    /// C→S. Encoded call, no reply of any kind.
    Oneway = 0x1003,
    /// C→S. Encoded call; server acks with `NullMsg` before invoking.
    OnewaySync = 0x1004,
    /// S→C. Encoded return value.
    Retval = 0x2001,
    /// S→C. Encoded exception object.
    Exception = 0x2002,
    /// S→C. Encoded value to yield into the caller's block.
    Yield = 0x2003,
    /// Both directions. Liveness/ordering barrier; `object_id` carries the tag.
    Sync = 0x4001,
    /// Both directions. Empty payload; decodes to the "no value" sentinel.
    NullMsg = 0x4002,
}

impl Kind {
    /// Numeric value of this kind as it appears on the wire.
    #[must_use]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Parses a kind from its wire value, or `None` if it is not a known kind.
    #[must_use]
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x1001 => Some(Self::Request),
            0x1002 => Some(Self::RequestBlock),
            0x1003 => Some(Self::Oneway),
            0x1004 => Some(Self::OnewaySync),
            0x2001 => Some(Self::Retval),
            0x2002 => Some(Self::Exception),
            0x2003 => Some(Self::Yield),
            0x4001 => Some(Self::Sync),
            0x4002 => Some(Self::NullMsg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_variant() {
        let all = [
            Kind::Request,
            Kind::RequestBlock,
            Kind::Oneway,
            Kind::OnewaySync,
            Kind::Retval,
            Kind::Exception,
            Kind::Yield,
            Kind::Sync,
            Kind::NullMsg,
        ];
        for kind in all {
            assert_eq!(Kind::from_u16(kind.to_u16()), Some(kind));
        }
    }

    #[test]
    fn rejects_unknown_values() {
        assert_eq!(Kind::from_u16(0x0000), None);
        assert_eq!(Kind::from_u16(0xffff), None);
    }
}
