//! Firmware status codes.

/// Status code written by the MC firmware into the header status byte.
///
/// [`McStatus::Ready`] is the value every request carries; the firmware
/// overwrites it with one of the other codes when the command completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum McStatus {
    /// Completed successfully.
    Ok = 0x0,
    /// Ready to be processed (command still pending).
    Ready = 0x1,
    /// Authentication error (bad or foreign token).
    AuthError = 0x3,
    /// No privilege.
    NoPrivilege = 0x4,
    /// DMA or I/O error.
    DmaError = 0x5,
    /// Configuration error.
    ConfigError = 0x6,
    /// Operation timed out inside the firmware.
    Timeout = 0x7,
    /// No resources.
    NoResource = 0x8,
    /// No memory available.
    NoMemory = 0x9,
    /// Device is busy.
    Busy = 0xA,
    /// Unsupported operation.
    UnsupportedOp = 0xB,
    /// Invalid state.
    InvalidState = 0xC,
}

// Linux errno values used by the reference driver's status mapping.
const EPERM: i32 = 1;
const EIO: i32 = 5;
const ENXIO: i32 = 6;
const ENOMEM: i32 = 12;
const EACCES: i32 = 13;
const EBUSY: i32 = 16;
const ENODEV: i32 = 19;
const EINVAL: i32 = 22;
const ETIMEDOUT: i32 = 110;
const ENAVAIL: i32 = 119;
const ENOTSUPP: i32 = 524;

impl McStatus {
    /// Converts a raw status byte.
    ///
    /// Returns `None` for codes the firmware does not define.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            0x0 => Self::Ok,
            0x1 => Self::Ready,
            0x3 => Self::AuthError,
            0x4 => Self::NoPrivilege,
            0x5 => Self::DmaError,
            0x6 => Self::ConfigError,
            0x7 => Self::Timeout,
            0x8 => Self::NoResource,
            0x9 => Self::NoMemory,
            0xA => Self::Busy,
            0xB => Self::UnsupportedOp,
            0xC => Self::InvalidState,
            _ => return None,
        })
    }

    /// Returns the raw status byte.
    #[inline]
    pub const fn to_raw(self) -> u8 {
        self as u8
    }

    /// Returns `true` for [`McStatus::Ok`].
    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Maps the status to a negative errno value (`0` for success).
    ///
    /// [`McStatus::Ready`] never describes a completed command and maps to
    /// `-EINVAL`.
    pub const fn to_errno(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Ready => -EINVAL,
            Self::AuthError => -EACCES,
            Self::NoPrivilege => -EPERM,
            Self::DmaError => -EIO,
            Self::ConfigError => -ENXIO,
            Self::Timeout => -ETIMEDOUT,
            Self::NoResource => -ENAVAIL,
            Self::NoMemory => -ENOMEM,
            Self::Busy => -EBUSY,
            Self::UnsupportedOp => -ENOTSUPP,
            Self::InvalidState => -ENODEV,
        }
    }

    /// Maps a raw status byte to a negative errno value.
    ///
    /// Unknown codes map to `-EINVAL`.
    pub const fn raw_to_errno(raw: u8) -> i32 {
        match Self::from_raw(raw) {
            Some(status) => status.to_errno(),
            None => -EINVAL,
        }
    }

    /// Returns a human-readable description.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "Command completed successfully",
            Self::Ready => "Command ready to be processed",
            Self::AuthError => "Authentication error",
            Self::NoPrivilege => "No privilege",
            Self::DmaError => "DMA or I/O error",
            Self::ConfigError => "Configuration error",
            Self::Timeout => "Operation timed out",
            Self::NoResource => "No resources",
            Self::NoMemory => "No memory available",
            Self::Busy => "Device is busy",
            Self::UnsupportedOp => "Unsupported operation",
            Self::InvalidState => "Invalid state",
        }
    }
}

impl core::fmt::Display for McStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({:#x})", self.as_str(), self.to_raw())
    }
}
