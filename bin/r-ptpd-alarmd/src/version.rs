//! ---
//! ptpd_section: "04-daemon"
//! ptpd_subsection: "binary"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Binary entrypoint for the R-PTPD alarm daemon."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---

/// Build metadata captured by the build script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub semver: String,
    pub git_sha: String,
    pub build_timestamp: String,
    pub target: String,
    pub profile: String,
}

impl VersionInfo {
    #[must_use]
    pub fn current() -> Self {
        Self {
            semver: env!("CARGO_PKG_VERSION").to_owned(),
            git_sha: option_env!("VERGEN_GIT_SHA").unwrap_or("unknown").to_owned(),
            build_timestamp: option_env!("VERGEN_BUILD_TIMESTAMP")
                .unwrap_or("unknown")
                .to_owned(),
            target: option_env!("VERGEN_CARGO_TARGET_TRIPLE")
                .unwrap_or("unknown")
                .to_owned(),
            profile: match option_env!("VERGEN_CARGO_DEBUG") {
                Some("true") => "debug",
                Some(_) => "release",
                None => "unknown",
            }
            .to_owned(),
        }
    }

    pub fn banner(&self) -> String {
        format!("r-ptpd-alarmd v{} (git {})", self.semver, self.git_sha)
    }

    /// Multi-line form printed by `--version`.
    pub fn extended(&self) -> String {
        format!(
            "{}\nBuilt: {}\nTarget: {}\nProfile: {}",
            self.banner(),
            self.build_timestamp,
            self.target,
            self.profile
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_starts_with_banner() {
        let info = VersionInfo::current();
        assert!(info.extended().starts_with(&info.banner()));
        assert!(info.banner().contains(&info.semver));
    }
}
