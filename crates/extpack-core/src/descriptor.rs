//! Plugin and theme descriptors.
//!
//! Both descriptor files are JSON objects with PascalCase keys. Only
//! `SupportedVersions` drives installer decisions; the remaining fields are
//! carried through to the caller.

use serde::{Deserialize, Serialize};

/// The closed set of installable extension kinds.
///
/// Serialized as `"Plugin"` / `"Theme"` (case-sensitive), the form used by
/// the manifest `Type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtensionKind {
    Plugin,
    Theme,
}

impl ExtensionKind {
    pub const ALL: [ExtensionKind; 2] = [ExtensionKind::Plugin, ExtensionKind::Theme];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plugin => "plugin",
            Self::Theme => "theme",
        }
    }
}

impl std::fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed `plugin.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PluginDescriptor {
    pub group: String,
    pub friendly_name: String,
    pub system_name: String,
    pub version: String,
    /// Application versions this plugin can run on.
    pub supported_versions: Vec<String>,
    pub author: String,
    pub display_order: i32,
    /// Main assembly or library file of the plugin.
    pub file_name: String,
    pub description: String,
}

/// Parsed `theme.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ThemeDescriptor {
    pub system_name: String,
    pub friendly_name: String,
    #[serde(rename = "SupportRTL")]
    pub support_rtl: bool,
    pub preview_image_url: String,
    pub preview_text: String,
}

/// Descriptor of an installed item, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum ExtensionDescriptor {
    Plugin(PluginDescriptor),
    Theme(ThemeDescriptor),
}

impl ExtensionDescriptor {
    pub fn kind(&self) -> ExtensionKind {
        match self {
            Self::Plugin(_) => ExtensionKind::Plugin,
            Self::Theme(_) => ExtensionKind::Theme,
        }
    }

    pub fn system_name(&self) -> &str {
        match self {
            Self::Plugin(plugin) => &plugin.system_name,
            Self::Theme(theme) => &theme.system_name,
        }
    }

    pub fn as_plugin(&self) -> Option<&PluginDescriptor> {
        match self {
            Self::Plugin(plugin) => Some(plugin),
            Self::Theme(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plugin_descriptor_reads_pascal_case_keys() {
        let json = r#"{
            "Group": "Payment methods",
            "FriendlyName": "Check / Money Order",
            "SystemName": "Payments.CheckMoneyOrder",
            "Version": "1.54",
            "SupportedVersions": [ "4.60" ],
            "Author": "Demo team",
            "DisplayOrder": 1,
            "FileName": "Payments.CheckMoneyOrder.dll",
            "Description": "Offline payments",
            "LimitedToStores": []
        }"#;

        let plugin: PluginDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(plugin.system_name, "Payments.CheckMoneyOrder");
        assert_eq!(plugin.supported_versions, vec!["4.60"]);
        assert_eq!(plugin.display_order, 1);
    }

    #[test]
    fn plugin_descriptor_missing_fields_default() {
        let plugin: PluginDescriptor = serde_json::from_str(r#"{"SystemName":"X"}"#).unwrap();
        assert!(plugin.supported_versions.is_empty());
        assert_eq!(plugin.group, "");
    }

    #[test]
    fn theme_descriptor_reads_rtl_flag() {
        let json = r#"{"SystemName":"DefaultClean","FriendlyName":"Default clean","SupportRTL":true}"#;
        let theme: ThemeDescriptor = serde_json::from_str(json).unwrap();
        assert!(theme.support_rtl);
        assert_eq!(theme.friendly_name, "Default clean");
    }

    #[test]
    fn extension_descriptor_is_tagged_by_type() {
        let descriptor = ExtensionDescriptor::Theme(ThemeDescriptor {
            system_name: "DefaultClean".to_string(),
            ..ThemeDescriptor::default()
        });

        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["Type"], "Theme");
        assert_eq!(value["SystemName"], "DefaultClean");
        assert_eq!(descriptor.kind(), ExtensionKind::Theme);
        assert!(descriptor.as_plugin().is_none());
    }

    #[test]
    fn kind_serializes_case_sensitively() {
        assert_eq!(serde_json::to_string(&ExtensionKind::Plugin).unwrap(), "\"Plugin\"");
        assert!(serde_json::from_str::<ExtensionKind>("\"plugin\"").is_err());
    }
}
