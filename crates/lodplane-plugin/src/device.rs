//! Graphics device identifiers and lifecycle events reported by the host.

/// Graphics API the host renders with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    OpenGl,
    Direct3D9,
    Direct3D11,
    Null,
    OpenGlEs20,
    OpenGlEs30,
    /// The host drives a wgpu device directly.
    Wgpu,
    /// Any identifier this crate does not know.
    Unknown(i32),
}

impl DeviceKind {
    /// Decode the host's numeric renderer identifier.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => DeviceKind::OpenGl,
            1 => DeviceKind::Direct3D9,
            2 => DeviceKind::Direct3D11,
            4 => DeviceKind::Null,
            8 => DeviceKind::OpenGlEs20,
            11 => DeviceKind::OpenGlEs30,
            100 => DeviceKind::Wgpu,
            other => DeviceKind::Unknown(other),
        }
    }

    /// Whether the plane can be drawn on this device.
    pub fn is_supported(self) -> bool {
        matches!(self, DeviceKind::OpenGl | DeviceKind::Wgpu)
    }
}

/// Device lifecycle notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceEvent {
    Initialize,
    Shutdown,
    BeforeReset,
    AfterReset,
}

impl DeviceEvent {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(DeviceEvent::Initialize),
            1 => Some(DeviceEvent::Shutdown),
            2 => Some(DeviceEvent::BeforeReset),
            3 => Some(DeviceEvent::AfterReset),
            _ => None,
        }
    }

    /// Whether the device can be drawn on after this event.
    pub fn leaves_device_usable(self) -> bool {
        matches!(self, DeviceEvent::Initialize | DeviceEvent::AfterReset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_device_ids() {
        assert_eq!(DeviceKind::from_raw(0), DeviceKind::OpenGl);
        assert_eq!(DeviceKind::from_raw(2), DeviceKind::Direct3D11);
        assert_eq!(DeviceKind::from_raw(100), DeviceKind::Wgpu);
        assert_eq!(DeviceKind::from_raw(-1), DeviceKind::Unknown(-1));
    }

    #[test]
    fn test_supported_kinds() {
        assert!(DeviceKind::OpenGl.is_supported());
        assert!(DeviceKind::Wgpu.is_supported());
        assert!(!DeviceKind::Direct3D11.is_supported());
        assert!(!DeviceKind::Null.is_supported());
        assert!(!DeviceKind::Unknown(42).is_supported());
    }

    #[test]
    fn test_raw_events() {
        assert_eq!(DeviceEvent::from_raw(0), Some(DeviceEvent::Initialize));
        assert_eq!(DeviceEvent::from_raw(3), Some(DeviceEvent::AfterReset));
        assert_eq!(DeviceEvent::from_raw(4), None);
    }

    #[test]
    fn test_event_usability() {
        assert!(DeviceEvent::Initialize.leaves_device_usable());
        assert!(DeviceEvent::AfterReset.leaves_device_usable());
        assert!(!DeviceEvent::BeforeReset.leaves_device_usable());
        assert!(!DeviceEvent::Shutdown.leaves_device_usable());
    }
}
