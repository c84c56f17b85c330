//! Tool defaults.
//!
//! Values come from environment variables once at startup and may be
//! overridden by CLI flags. A request field always wins over both.

use std::path::PathBuf;

pub const ENV_INIT_SCRIPT_VAR: &str = "DELPHI_RSVARS_PATH";
pub const MSBUILD_PATH_VAR: &str = "DELPHI_MSBUILD_PATH";
pub const CONFIGURATION_VAR: &str = "DELPHI_CONFIG";
pub const PLATFORM_VAR: &str = "DELPHI_PLATFORM";
pub const FPC_PATH_VAR: &str = "FPC_PATH";
pub const LAZBUILD_PATH_VAR: &str = "LAZBUILD_PATH";

pub const DEFAULT_MSBUILD: &str = "msbuild";
pub const DEFAULT_FPC: &str = "fpc";
pub const DEFAULT_LAZBUILD: &str = "lazbuild";
pub const DEFAULT_CONFIGURATION: &str = "Release";
pub const DEFAULT_PLATFORM: &str = "Win32";

/// Fallback values used when a request leaves a field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolDefaults {
    pub env_init_script: Option<PathBuf>,
    pub msbuild_path: Option<String>,
    pub configuration: Option<String>,
    pub platform: Option<String>,
    pub fpc_path: Option<String>,
    pub lazbuild_path: Option<String>,
}

impl ToolDefaults {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| non_blank(lookup(key));
        Self {
            env_init_script: get(ENV_INIT_SCRIPT_VAR).map(PathBuf::from),
            msbuild_path: get(MSBUILD_PATH_VAR),
            configuration: get(CONFIGURATION_VAR),
            platform: get(PLATFORM_VAR),
            fpc_path: get(FPC_PATH_VAR),
            lazbuild_path: get(LAZBUILD_PATH_VAR),
        }
    }

    /// Layer `overrides` on top; any value it sets replaces ours.
    pub fn merge(self, overrides: ToolDefaults) -> Self {
        Self {
            env_init_script: overrides.env_init_script.or(self.env_init_script),
            msbuild_path: overrides.msbuild_path.or(self.msbuild_path),
            configuration: overrides.configuration.or(self.configuration),
            platform: overrides.platform.or(self.platform),
            fpc_path: overrides.fpc_path.or(self.fpc_path),
            lazbuild_path: overrides.lazbuild_path.or(self.lazbuild_path),
        }
    }

    pub fn msbuild(&self) -> &str {
        self.msbuild_path.as_deref().unwrap_or(DEFAULT_MSBUILD)
    }

    pub fn fpc(&self) -> &str {
        self.fpc_path.as_deref().unwrap_or(DEFAULT_FPC)
    }

    pub fn lazbuild(&self) -> &str {
        self.lazbuild_path.as_deref().unwrap_or(DEFAULT_LAZBUILD)
    }

    /// Configuration for a build. Clean requests do not use this.
    pub fn build_configuration(&self) -> &str {
        self.configuration.as_deref().unwrap_or(DEFAULT_CONFIGURATION)
    }

    pub fn platform(&self) -> &str {
        self.platform.as_deref().unwrap_or(DEFAULT_PLATFORM)
    }
}

/// `Some` only for values with non-whitespace content.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn builtin_defaults_when_nothing_set() {
        let d = ToolDefaults::from_lookup(|_| None);
        assert_eq!(d.msbuild(), "msbuild");
        assert_eq!(d.fpc(), "fpc");
        assert_eq!(d.lazbuild(), "lazbuild");
        assert_eq!(d.build_configuration(), "Release");
        assert_eq!(d.platform(), "Win32");
        assert!(d.env_init_script.is_none());
    }

    #[test]
    fn reads_variables_and_ignores_blank() {
        let d = ToolDefaults::from_lookup(lookup(&[
            (ENV_INIT_SCRIPT_VAR, r"C:\Studio\bin\rsvars.bat"),
            (CONFIGURATION_VAR, "Debug"),
            (PLATFORM_VAR, "   "),
        ]));
        assert_eq!(
            d.env_init_script,
            Some(PathBuf::from(r"C:\Studio\bin\rsvars.bat"))
        );
        assert_eq!(d.build_configuration(), "Debug");
        assert_eq!(d.platform(), "Win32");
    }

    #[test]
    fn overrides_win_over_environment() {
        let env = ToolDefaults::from_lookup(lookup(&[
            (PLATFORM_VAR, "Win64"),
            (FPC_PATH_VAR, "/usr/bin/fpc"),
        ]));
        let cli = ToolDefaults {
            platform: Some("Linux64".into()),
            ..Default::default()
        };
        let merged = env.merge(cli);
        assert_eq!(merged.platform(), "Linux64");
        assert_eq!(merged.fpc(), "/usr/bin/fpc");
    }
}
