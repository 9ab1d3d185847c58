//! Mode to program associations.

use super::ToolMode;
use bitfield::bitfield;
use std::borrow::Cow;

/// How a tool's program is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LaunchType {
    /// Run the program line through the shell
    Shell = 1,
    /// Start the program directly, as a desktop application
    DesktopLaunch = 2,
    /// Hand the program to the script host
    ScriptLaunch = 3,
}

impl LaunchType {
    /// Decode the 4 bit launch type field.
    ///
    /// Returns [`None`] for values with no known meaning.
    pub const fn from_raw(value: u8) -> Option<Self> {
        match value & 0x0F {
            1 => Some(Self::Shell),
            2 => Some(Self::DesktopLaunch),
            3 => Some(Self::ScriptLaunch),
            _ => None,
        }
    }

    /// The raw 4 bit field value.
    pub const fn to_raw(self) -> u8 {
        self as u8
    }
}

bitfield! {
    /// The flags word of a tool binding.
    ///
    /// - Bits 0-3: Launch type
    /// - Bits 4-15: Reserved, ignored
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ToolFlags(u16);
    impl Debug;
    u16;

    /// Launch type (4 bits)
    pub launch_type_raw, set_launch_type_raw: 3, 0;
}

impl ToolFlags {
    /// Wrap a stored flags word, reserved bits included.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Flags selecting `launch_type`, with all reserved bits clear.
    pub fn with_launch_type(launch_type: LaunchType) -> Self {
        let mut flags = Self::default();
        flags.set_launch_type_raw(launch_type.to_raw() as u16);
        flags
    }

    /// The stored flags word.
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// The launch type, or [`None`] if the field holds an unknown value.
    pub fn launch_type(&self) -> Option<LaunchType> {
        LaunchType::from_raw(self.launch_type_raw() as u8)
    }
}

/// One mode to program association.
///
/// Bindings either come from a datatype's in-memory tool list or are decoded
/// from a descriptor file on demand. Both are plain owned values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolBinding {
    pub mode: ToolMode,
    pub flags: ToolFlags,
    /// Program path or command line, as stored. May be absent in stale registry entries.
    pub program: Option<Vec<u8>>,
}

impl ToolBinding {
    pub fn new(mode: ToolMode, flags: ToolFlags, program: impl Into<Vec<u8>>) -> Self {
        Self {
            mode,
            flags,
            program: Some(program.into()),
        }
    }

    /// The program, if present and non-empty.
    pub fn usable_program(&self) -> Option<&[u8]> {
        self.program.as_deref().filter(|program| !program.is_empty())
    }

    /// The usable program for messages and logs; invalid UTF-8 is replaced.
    ///
    /// Empty when there is no usable program.
    pub fn program_display(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.usable_program().unwrap_or_default())
    }

    /// Whether this binding names a program that could be launched.
    pub fn is_usable(&self) -> bool {
        self.usable_program().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(0x0001, Some(LaunchType::Shell))]
    #[case(0x0002, Some(LaunchType::DesktopLaunch))]
    #[case(0xFFF3, Some(LaunchType::ScriptLaunch))]
    #[case(0x0000, None)]
    #[case(0x000F, None)]
    fn launch_type_reads_low_four_bits(#[case] bits: u16, #[case] expected: Option<LaunchType>) {
        assert_eq!(ToolFlags::from_bits(bits).launch_type(), expected);
    }

    #[test]
    fn with_launch_type_sets_only_the_field() {
        let flags = ToolFlags::with_launch_type(LaunchType::ScriptLaunch);
        assert_eq!(flags.bits(), 0x0003);
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some(""), false)]
    #[case(Some("SYS:Utilities/MultiView"), true)]
    fn usable_requires_non_empty_program(#[case] program: Option<&str>, #[case] usable: bool) {
        let binding = ToolBinding {
            mode: ToolMode::Browse,
            flags: ToolFlags::default(),
            program: program.map(|program| program.as_bytes().to_vec()),
        };
        assert_eq!(binding.is_usable(), usable);
    }

    #[test]
    fn display_replaces_invalid_utf8_only() {
        let binding = ToolBinding::new(ToolMode::Edit, ToolFlags::default(), &b"Gr\xe4fik"[..]);
        assert_eq!(binding.usable_program(), Some(&b"Gr\xe4fik"[..]));
        assert_eq!(binding.program_display(), "Gr\u{FFFD}fik");

        let binding = ToolBinding::new(ToolMode::Edit, ToolFlags::default(), "Gräfik");
        assert_eq!(binding.program_display(), "Gräfik");
    }
}
