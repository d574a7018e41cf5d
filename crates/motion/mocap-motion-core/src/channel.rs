//! Canonical structural channel keys and the header alias table.
//!
//! A header names a structural channel when its upper-cased form ends with one
//! of the historical spellings below. Whatever precedes the matched suffix is
//! kept verbatim as a body-name prefix, so `armRPOSX` becomes `armX_POS`.

use serde::{Deserialize, Serialize};

/// Canonical suffix of a position, rotation or scale channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKey {
    #[serde(rename = "X_POS")]
    XPos,
    #[serde(rename = "Y_POS")]
    YPos,
    #[serde(rename = "Z_POS")]
    ZPos,
    #[serde(rename = "X_ROT")]
    XRot,
    #[serde(rename = "Y_ROT")]
    YRot,
    #[serde(rename = "Z_ROT")]
    ZRot,
    #[serde(rename = "W_ROT")]
    WRot,
    #[serde(rename = "X_SCL")]
    XScl,
    #[serde(rename = "Y_SCL")]
    YScl,
    #[serde(rename = "Z_SCL")]
    ZScl,
}

impl ChannelKey {
    pub const ALL: [ChannelKey; 10] = [
        ChannelKey::XPos,
        ChannelKey::YPos,
        ChannelKey::ZPos,
        ChannelKey::XRot,
        ChannelKey::YRot,
        ChannelKey::ZRot,
        ChannelKey::WRot,
        ChannelKey::XScl,
        ChannelKey::YScl,
        ChannelKey::ZScl,
    ];

    pub const POSITION: [ChannelKey; 3] = [ChannelKey::XPos, ChannelKey::YPos, ChannelKey::ZPos];

    /// Quaternion components in (x, y, z, w) order.
    pub const ROTATION: [ChannelKey; 4] = [
        ChannelKey::XRot,
        ChannelKey::YRot,
        ChannelKey::ZRot,
        ChannelKey::WRot,
    ];

    pub const SCALE: [ChannelKey; 3] = [ChannelKey::XScl, ChannelKey::YScl, ChannelKey::ZScl];

    /// Key as stored in a table's structural map.
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelKey::XPos => "X_POS",
            ChannelKey::YPos => "Y_POS",
            ChannelKey::ZPos => "Z_POS",
            ChannelKey::XRot => "X_ROT",
            ChannelKey::YRot => "Y_ROT",
            ChannelKey::ZRot => "Z_ROT",
            ChannelKey::WRot => "W_ROT",
            ChannelKey::XScl => "X_SCL",
            ChannelKey::YScl => "Y_SCL",
            ChannelKey::ZScl => "Z_SCL",
        }
    }

    /// Upper-case header suffixes that resolve to this key.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ChannelKey::XPos => &["RPOSX", "POS_X", "X_POS"],
            ChannelKey::YPos => &["RPOSY", "POS_Y", "Y_POS"],
            ChannelKey::ZPos => &["RPOSZ", "POS_Z", "Z_POS"],
            ChannelKey::XRot => &["RROTX", "ROT_X", "RX", "QX", "X_ROT"],
            ChannelKey::YRot => &["RROTY", "ROT_Y", "RY", "QY", "Y_ROT"],
            ChannelKey::ZRot => &["RROTZ", "ROT_Z", "RZ", "QZ", "Z_ROT"],
            ChannelKey::WRot => &["RROTW", "ROT_W", "RW", "QW", "W_ROT"],
            ChannelKey::XScl => &["RSCLX", "SCALE_X", "X_SCALE", "X_SCL"],
            ChannelKey::YScl => &["RSCLY", "SCALE_Y", "Y_SCALE", "Y_SCL"],
            ChannelKey::ZScl => &["RSCLZ", "SCALE_Z", "Z_SCALE", "Z_SCL"],
        }
    }
}

impl std::fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of matching a header against the alias table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classified<'a> {
    /// Part of the header in front of the matched alias (body prefix, may be empty).
    pub prefix: &'a str,
    pub key: ChannelKey,
}

impl Classified<'_> {
    /// Re-keyed name stored in the structural map, e.g. `armX_POS`.
    pub fn canonical_name(&self) -> String {
        format!("{}{}", self.prefix, self.key.as_str())
    }
}

/// Match `header` case-insensitively against the alias table, first match wins.
pub fn classify(header: &str) -> Option<Classified<'_>> {
    let upper = header.to_ascii_uppercase();
    for key in ChannelKey::ALL {
        for alias in key.aliases() {
            if upper.ends_with(alias) {
                let prefix = &header[..header.len() - alias.len()];
                return Some(Classified { prefix, key });
            }
        }
    }
    None
}

/// `<prefix><key>` lookup name used during evaluation.
#[inline]
pub fn prefixed(prefix: &str, key: &str) -> String {
    let mut name = String::with_capacity(prefix.len() + key.len());
    name.push_str(prefix);
    name.push_str(key);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_and_canonical_spellings_agree() {
        let a = classify("armX_POS").unwrap();
        let b = classify("armRPOSX").unwrap();
        assert_eq!(a.canonical_name(), "armX_POS");
        assert_eq!(b.canonical_name(), "armX_POS");
    }

    #[test]
    fn matching_ignores_case_but_keeps_prefix() {
        let c = classify("Base_qw").unwrap();
        assert_eq!(c.key, ChannelKey::WRot);
        assert_eq!(c.prefix, "Base_");
        let s = classify("scale_z").unwrap();
        assert_eq!(s.canonical_name(), "Z_SCL");
    }

    #[test]
    fn plain_joints_are_not_structural() {
        assert!(classify("elbow_flex").is_none());
        assert!(classify("time").is_none());
    }

    #[test]
    fn all_aliases_are_upper_case() {
        for key in ChannelKey::ALL {
            for alias in key.aliases() {
                assert_eq!(*alias, alias.to_ascii_uppercase());
            }
        }
    }
}
