//! Version command

use crate::cli::VersionArgs;
use crate::version::VersionInfo;
use anyhow::Result;

pub fn run(args: VersionArgs) -> Result<()> {
    let info = VersionInfo::current();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", info.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info_current_is_valid_semver() {
        let info = VersionInfo::current();
        let parsed = semver::Version::parse(&info.version);
        assert!(
            parsed.is_ok(),
            "version should be valid semver, got: {}",
            info.version
        );
    }

    #[test]
    fn test_version_display_is_single_line() {
        let info = VersionInfo::current();
        let display = info.display();
        assert!(display.starts_with("OpenFire CLI"));
        assert!(display.contains(&info.version));
        assert_eq!(display.lines().count(), 1);
    }

    #[test]
    fn test_version_display_ignores_build_fields() {
        let info = VersionInfo {
            version: "1.2.3".to_string(),
            commit: Some("abc1234".to_string()),
            target: Some("x86_64-unknown-linux-gnu".to_string()),
        };
        assert_eq!(info.display(), "OpenFire CLI v1.2.3");
        assert_eq!(format!("{}", info), info.display());
    }

    #[test]
    fn test_version_unknown() {
        let info = VersionInfo {
            version: String::new(),
            commit: None,
            target: None,
        };
        assert_eq!(info.display(), "OpenFire CLI (version unknown)");
    }

    #[test]
    fn test_version_info_json_serialization() {
        let info = VersionInfo::current();
        let json = serde_json::to_string(&info).expect("should serialize to JSON");
        let deserialized: VersionInfo =
            serde_json::from_str(&json).expect("should deserialize from JSON");
        assert_eq!(deserialized.version, info.version);
    }

    #[test]
    fn test_run_succeeds() {
        assert!(run(VersionArgs { json: false }).is_ok());
        assert!(run(VersionArgs { json: true }).is_ok());
    }
}
