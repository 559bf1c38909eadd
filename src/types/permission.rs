use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of object the selected `ids` refer to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PermissionScope {
    Profile,
    Group,
}

impl fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionScope::Profile => write!(f, "profile"),
            PermissionScope::Group => write!(f, "group"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    View,
    Download,
    Edit,
    Manage,
}

impl PermissionType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "view" => Some(Self::View),
            "download" => Some(Self::Download),
            "edit" => Some(Self::Edit),
            "manage" => Some(Self::Manage),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Download => "download",
            Self::Edit => "edit",
            Self::Manage => "manage",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PermissionMode {
    Set,
    Unset,
}

impl PermissionMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "set" => Some(Self::Set),
            "unset" => Some(Self::Unset),
            _ => None,
        }
    }
}

/// Raw form as posted by the bulk-permission page. Both GET query and POST body use it.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct PermissionForm {
    #[serde(default)]
    pub ids: String,
    #[serde(default)]
    pub resources: String,
    #[serde(default)]
    pub permission_type: String,
    #[serde(default)]
    pub mode: String,
    pub cancel: Option<String>,
}

/// A permission request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionChange {
    pub targets: Vec<String>,
    pub resources: Vec<String>,
    pub permission: PermissionType,
    pub mode: PermissionMode,
}

/// Splits a comma separated list, dropping blanks and duplicates while keeping order.
pub fn split_list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !out.iter().any(|o| o == item) {
            out.push(item.to_string());
        }
    }
    out
}
