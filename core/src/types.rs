//! Command catalogue for the supported PIM show commands.
//!
//! Each [`CommandKind`] knows the literal command text the device expects,
//! with and without a VRF scope, and a stable label used on the command line
//! and in reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// VRF name used when a command is issued without an explicit VRF scope.
pub const DEFAULT_VRF: &str = "default";

/// Supported show-command variants.
///
/// # Examples
///
/// ```
/// use pim_show_core::CommandKind;
///
/// let kind: CommandKind = "rp-mapping".parse().unwrap();
/// assert_eq!(kind.command(None), "show ip pim rp mapping");
/// assert_eq!(kind.command(Some("VRF1")), "show ip pim vrf VRF1 rp mapping");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    /// `show ipv6 pim [vrf <vrf>] interface`
    Ipv6Interface,
    /// `show ip pim [vrf <vrf>] interface`
    Interface,
    /// `show ip pim [vrf <vrf>] interface detail`
    InterfaceDetail,
    /// `show ipv6 pim [vrf <vrf>] bsr election`
    Ipv6BsrElection,
    /// `show ipv6 pim [vrf <vrf>] bsr candidate-rp`
    Ipv6BsrCandidateRp,
    /// `show ip pim [vrf <vrf>] bsr-router`
    BsrRouter,
    /// `show ip pim [vrf <vrf>] rp mapping`
    RpMapping,
}

impl CommandKind {
    /// Every supported command kind, in catalogue order.
    pub const ALL: [CommandKind; 7] = [
        CommandKind::Ipv6Interface,
        CommandKind::Interface,
        CommandKind::InterfaceDetail,
        CommandKind::Ipv6BsrElection,
        CommandKind::Ipv6BsrCandidateRp,
        CommandKind::BsrRouter,
        CommandKind::RpMapping,
    ];

    /// Stable kebab-case label (`"ipv6-interface"`, `"rp-mapping"`, ...).
    pub fn label(self) -> &'static str {
        match self {
            Self::Ipv6Interface => "ipv6-interface",
            Self::Interface => "interface",
            Self::InterfaceDetail => "interface-detail",
            Self::Ipv6BsrElection => "ipv6-bsr-election",
            Self::Ipv6BsrCandidateRp => "ipv6-bsr-candidate-rp",
            Self::BsrRouter => "bsr-router",
            Self::RpMapping => "rp-mapping",
        }
    }

    fn family_and_tail(self) -> (&'static str, &'static str) {
        match self {
            Self::Ipv6Interface => ("ipv6", "interface"),
            Self::Interface => ("ip", "interface"),
            Self::InterfaceDetail => ("ip", "interface detail"),
            Self::Ipv6BsrElection => ("ipv6", "bsr election"),
            Self::Ipv6BsrCandidateRp => ("ipv6", "bsr candidate-rp"),
            Self::BsrRouter => ("ip", "bsr-router"),
            Self::RpMapping => ("ip", "rp mapping"),
        }
    }

    /// Builds the literal command text, embedding the VRF when one is given.
    ///
    /// # Examples
    ///
    /// ```
    /// use pim_show_core::CommandKind;
    ///
    /// assert_eq!(
    ///     CommandKind::Ipv6BsrCandidateRp.command(Some("VRF1")),
    ///     "show ipv6 pim vrf VRF1 bsr candidate-rp"
    /// );
    /// assert_eq!(CommandKind::InterfaceDetail.command(None), "show ip pim interface detail");
    /// ```
    pub fn command(self, vrf: Option<&str>) -> String {
        let (family, tail) = self.family_and_tail();
        match vrf {
            Some(vrf) => format!("show {family} pim vrf {vrf} {tail}"),
            None => format!("show {family} pim {tail}"),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a label does not name a supported command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported command kind: {0}")]
pub struct UnknownCommandKind(pub String);

impl FromStr for CommandKind {
    type Err = UnknownCommandKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCommandKind(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for kind in CommandKind::ALL {
            assert_eq!(kind.label().parse::<CommandKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        assert_eq!(
            "show-version".parse::<CommandKind>(),
            Err(UnknownCommandKind("show-version".to_string()))
        );
    }

    #[test]
    fn test_command_text_with_and_without_vrf() {
        assert_eq!(
            CommandKind::Ipv6Interface.command(None),
            "show ipv6 pim interface"
        );
        assert_eq!(
            CommandKind::Ipv6Interface.command(Some("VRF1")),
            "show ipv6 pim vrf VRF1 interface"
        );
        assert_eq!(
            CommandKind::BsrRouter.command(Some("blue")),
            "show ip pim vrf blue bsr-router"
        );
    }
}
