//! Static catalog of the mappings namespaces the bot knows about.
//!
//! Every namespace is a `'static` value: its channel list and command names
//! are fixed for the lifetime of the process.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::error::MappingsError;

/// Release track within a namespace.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Official,
    Snapshot,
    Patchwork,
}

impl Channel {
    /// Every channel, in display order.
    pub const ALL: [Channel; 3] = [Channel::Official, Channel::Snapshot, Channel::Patchwork];

    /// Name used on the command line and in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Official => "official",
            Self::Snapshot => "snapshot",
            Self::Patchwork => "patchwork",
        }
    }

    /// Capitalised name used in user-facing text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Official => "Official",
            Self::Snapshot => "Snapshot",
            Self::Patchwork => "Patchwork",
        }
    }

    /// Whether the channel must be switched on in configuration before use.
    pub fn is_optional(self) -> bool {
        matches!(self, Self::Patchwork)
    }

    /// Parse a channel name, ignoring ASCII case.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of identifier a lookup command searches for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum QueryKind {
    Class,
    Field,
    Method,
}

impl QueryKind {
    pub const ALL: [QueryKind; 3] = [QueryKind::Class, QueryKind::Field, QueryKind::Method];

    /// Letter appended to a namespace's command base (`yc`, `yf`, `ym`).
    pub fn suffix(self) -> char {
        match self {
            Self::Class => 'c',
            Self::Field => 'f',
            Self::Method => 'm',
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Field => "field",
            Self::Method => "method",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Self::Class => "classes",
            Self::Field => "fields",
            Self::Method => "methods",
        }
    }
}

/// Rule picking the channel used when a caller names neither version nor channel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DefaultChannel {
    /// The namespace has no channels.
    None,
    /// Always the given channel.
    Fixed(Channel),
    /// The configured channel when it is supported, otherwise the given one.
    Configurable(Channel),
}

/// Identifier of a known namespace.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NamespaceId {
    LegacyYarn,
    Mcp,
    Mojang,
    Plasma,
    Yarn,
    Yarrn,
}

impl NamespaceId {
    pub const ALL: [NamespaceId; 6] = [
        NamespaceId::LegacyYarn,
        NamespaceId::Mcp,
        NamespaceId::Mojang,
        NamespaceId::Plasma,
        NamespaceId::Yarn,
        NamespaceId::Yarrn,
    ];

    pub fn as_str(self) -> &'static str {
        self.namespace().id
    }

    /// The static catalog entry for this namespace.
    pub fn namespace(self) -> &'static Namespace {
        match self {
            Self::LegacyYarn => &LEGACY_YARN,
            Self::Mcp => &MCP,
            Self::Mojang => &MOJANG,
            Self::Plasma => &PLASMA,
            Self::Yarn => &YARN,
            Self::Yarrn => &YARRN,
        }
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamespaceId {
    type Err = MappingsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MappingsError::UnsupportedNamespace(wanted.to_owned()))
    }
}

/// A namespace: its channels, default-channel rule and command names.
#[derive(Debug)]
pub struct Namespace {
    pub key: NamespaceId,
    /// Identifier used in configuration and error messages (`yarn`).
    pub id: &'static str,
    /// Human readable name (`Legacy Yarn`).
    pub display_name: &'static str,
    /// Supported channels in display order; empty for single-track namespaces.
    pub channels: &'static [Channel],
    pub default_channel: DefaultChannel,
    /// Lookup command bases; the first is the primary name.
    pub lookup_bases: &'static [&'static str],
    /// Info command name followed by its aliases.
    pub info_names: &'static [&'static str],
}

impl Namespace {
    pub fn supports(&self, channel: Channel) -> bool {
        self.channels.contains(&channel)
    }

    /// Channels usable under the current configuration.
    pub fn enabled_channels(&self, enabled: impl Fn(Channel) -> bool) -> Vec<Channel> {
        self.channels
            .iter()
            .copied()
            .filter(|channel| !channel.is_optional() || enabled(*channel))
            .collect()
    }

    /// Apply the namespace's default-channel rule to a configured preference.
    pub fn default_channel(&self, configured: Option<Channel>) -> Option<Channel> {
        match self.default_channel {
            DefaultChannel::None => None,
            DefaultChannel::Fixed(channel) => Some(channel),
            DefaultChannel::Configurable(fallback) => Some(
                configured
                    .filter(|channel| self.supports(*channel))
                    .unwrap_or(fallback),
            ),
        }
    }

    /// Primary lookup command name for a query kind (`yc`).
    pub fn lookup_command(&self, kind: QueryKind) -> String {
        format!("{}{}", self.lookup_bases[0], kind.suffix())
    }

    /// Every name (primary first) a lookup command answers to.
    pub fn lookup_names(&self, kind: QueryKind) -> Vec<String> {
        self.lookup_bases
            .iter()
            .map(|base| format!("{base}{}", kind.suffix()))
            .collect()
    }

    pub fn info_command(&self) -> &'static str {
        self.info_names[0]
    }
}

static LEGACY_YARN: Namespace = Namespace {
    key: NamespaceId::LegacyYarn,
    id: "legacy-yarn",
    display_name: "Legacy Yarn",
    channels: &[],
    default_channel: DefaultChannel::None,
    lookup_bases: &["ly", "lyarn", "legacy-yarn", "legacyyarn", "legacyarn"],
    info_names: &["lyarn", "legacy-yarn", "legacyyarn", "legacyarn"],
};

static MCP: Namespace = Namespace {
    key: NamespaceId::Mcp,
    id: "mcp",
    display_name: "MCP",
    channels: &[],
    default_channel: DefaultChannel::None,
    lookup_bases: &["mcp"],
    info_names: &["mcp"],
};

static MOJANG: Namespace = Namespace {
    key: NamespaceId::Mojang,
    id: "mojang",
    display_name: "Mojang",
    channels: &[Channel::Official, Channel::Snapshot],
    default_channel: DefaultChannel::Fixed(Channel::Official),
    lookup_bases: &["mm", "moj", "mojmap"],
    info_names: &["mojang", "mojmap"],
};

static PLASMA: Namespace = Namespace {
    key: NamespaceId::Plasma,
    id: "plasma",
    display_name: "Plasma",
    channels: &[],
    default_channel: DefaultChannel::None,
    lookup_bases: &["p"],
    info_names: &["plasma"],
};

static YARN: Namespace = Namespace {
    key: NamespaceId::Yarn,
    id: "yarn",
    display_name: "Yarn",
    channels: &[Channel::Official, Channel::Snapshot, Channel::Patchwork],
    default_channel: DefaultChannel::Configurable(Channel::Official),
    lookup_bases: &["y", "yarn"],
    info_names: &["yarn"],
};

static YARRN: Namespace = Namespace {
    key: NamespaceId::Yarrn,
    id: "yarrn",
    display_name: "Yarrn",
    channels: &[],
    default_channel: DefaultChannel::None,
    lookup_bases: &["yr"],
    info_names: &["yarrn"],
};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("yarn", NamespaceId::Yarn)]
    #[case("Legacy-Yarn", NamespaceId::LegacyYarn)]
    #[case(" mojang ", NamespaceId::Mojang)]
    fn namespace_ids_parse_case_insensitively(#[case] raw: &str, #[case] expected: NamespaceId) {
        assert_eq!(raw.parse::<NamespaceId>().ok(), Some(expected));
    }

    #[test]
    fn unknown_namespace_is_unsupported() {
        let err = "intermediary".parse::<NamespaceId>().unwrap_err();
        assert!(matches!(err, MappingsError::UnsupportedNamespace(name) if name == "intermediary"));
    }

    #[test]
    fn lookup_names_expand_every_base() {
        let names = NamespaceId::Mojang.namespace().lookup_names(QueryKind::Class);
        assert_eq!(names, vec!["mmc", "mojc", "mojmapc"]);
        assert_eq!(NamespaceId::Plasma.namespace().lookup_command(QueryKind::Method), "pm");
    }

    #[test]
    fn command_names_are_unique_across_namespaces() {
        let mut seen = HashSet::new();
        for id in NamespaceId::ALL {
            let namespace = id.namespace();
            for kind in QueryKind::ALL {
                for name in namespace.lookup_names(kind) {
                    assert!(seen.insert(name.clone()), "duplicate command name {name}");
                }
            }
            for name in namespace.info_names {
                assert!(seen.insert((*name).to_owned()), "duplicate command name {name}");
            }
        }
    }

    #[test]
    fn optional_channels_need_configuration() {
        let yarn = NamespaceId::Yarn.namespace();
        assert_eq!(
            yarn.enabled_channels(|_| false),
            vec![Channel::Official, Channel::Snapshot]
        );
        assert_eq!(yarn.enabled_channels(|_| true), Channel::ALL.to_vec());
    }

    #[rstest]
    #[case(NamespaceId::Yarn, None, Some(Channel::Official))]
    #[case(NamespaceId::Yarn, Some(Channel::Snapshot), Some(Channel::Snapshot))]
    #[case(NamespaceId::Mojang, Some(Channel::Snapshot), Some(Channel::Official))]
    #[case(NamespaceId::Mojang, Some(Channel::Patchwork), Some(Channel::Official))]
    #[case(NamespaceId::Mcp, Some(Channel::Snapshot), None)]
    fn default_channel_rules(
        #[case] id: NamespaceId,
        #[case] configured: Option<Channel>,
        #[case] expected: Option<Channel>,
    ) {
        assert_eq!(id.namespace().default_channel(configured), expected);
    }

    #[test]
    fn channels_parse_by_name() {
        assert_eq!(Channel::parse("SNAPSHOT"), Some(Channel::Snapshot));
        assert_eq!(Channel::parse("1.16.5"), None);
    }
}
