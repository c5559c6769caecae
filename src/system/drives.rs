//! Sharable volume enumeration
//!
//! Queries `Win32_LogicalDisk` through PowerShell CIM for removable (2) and
//! fixed (3) drives.

use std::fmt;

use serde::Deserialize;

use super::runner::CommandRunner;
use crate::error::{NasError, Result};

const LOGICAL_DISK_QUERY: &str = "Get-CimInstance -ClassName Win32_LogicalDisk \
     -Filter 'DriveType=2 OR DriveType=3' \
     | Select-Object DeviceID,VolumeName,DriveType \
     | ConvertTo-Json -Compress";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeKind {
    Removable,
    Fixed,
    Unknown,
}

impl VolumeKind {
    pub fn from_drive_type(drive_type: u32) -> Self {
        match drive_type {
            2 => VolumeKind::Removable,
            3 => VolumeKind::Fixed,
            _ => VolumeKind::Unknown,
        }
    }
}

impl fmt::Display for VolumeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VolumeKind::Removable => "Removable (USB/SD)",
            VolumeKind::Fixed => "Local Disk",
            VolumeKind::Unknown => "Unknown",
        })
    }
}

/// A drive that can be shared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    /// Drive identifier as reported by the OS, e.g. `E:`
    pub identifier: String,
    pub label: String,
    pub kind: VolumeKind,
}

impl Volume {
    pub fn new(identifier: impl Into<String>, label: impl Into<String>, kind: VolumeKind) -> Self {
        Self {
            identifier: identifier.into(),
            label: label.into(),
            kind,
        }
    }

    /// Share name: the identifier uppercased with separators stripped (`e:\` -> `E`)
    pub fn share_name(&self) -> String {
        self.identifier
            .trim_matches(|c| c == ':' || c == '\\' || c == '/')
            .to_uppercase()
    }

    /// Filesystem root of the volume (`e:` -> `E:\`)
    pub fn root_path(&self) -> String {
        let mut root = self.identifier.trim_end_matches(['\\', '/']).to_uppercase();
        root.push('\\');
        root
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.label.is_empty() {
            "no label"
        } else {
            self.label.as_str()
        };
        write!(f, "{} ({}) - {}", self.identifier, label, self.kind)
    }
}

/// Source of volumes the operator can choose from
pub trait DriveCatalog {
    fn list_sharable_volumes(&self) -> Result<Vec<Volume>>;
}

#[derive(Debug, Deserialize)]
struct LogicalDisk {
    #[serde(rename = "DeviceID")]
    device_id: String,
    #[serde(rename = "VolumeName", default)]
    volume_name: Option<String>,
    #[serde(rename = "DriveType")]
    drive_type: u32,
}

// ConvertTo-Json emits a bare object for a single result.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(LogicalDisk),
    Many(Vec<LogicalDisk>),
}

/// Parse `ConvertTo-Json` output of the logical disk query
pub fn parse_logical_disks(json: &str) -> Result<Vec<Volume>> {
    let json = json.trim();
    if json.is_empty() {
        return Ok(Vec::new());
    }

    let disks = match serde_json::from_str::<OneOrMany>(json)? {
        OneOrMany::One(disk) => vec![disk],
        OneOrMany::Many(disks) => disks,
    };

    Ok(disks
        .into_iter()
        .map(|d| Volume {
            identifier: d.device_id,
            label: d.volume_name.unwrap_or_default(),
            kind: VolumeKind::from_drive_type(d.drive_type),
        })
        .collect())
}

/// Drive catalog backed by a CIM query
pub struct CimDriveCatalog<R> {
    runner: R,
}

impl<R: CommandRunner> CimDriveCatalog<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> DriveCatalog for CimDriveCatalog<R> {
    fn list_sharable_volumes(&self) -> Result<Vec<Volume>> {
        let output = self.runner.powershell(LOGICAL_DISK_QUERY)?;
        if !output.success {
            return Err(NasError::Command {
                program: "powershell".to_string(),
                reason: format!("drive query failed ({})", output.describe()),
            });
        }
        parse_logical_disks(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::runner::CommandOutput;
    use crate::system::testing::ScriptedRunner;

    #[test]
    fn test_share_name_and_root() {
        let volume = Volume::new("e:", "USB", VolumeKind::Removable);
        assert_eq!(volume.share_name(), "E");
        assert_eq!(volume.root_path(), "E:\\");

        let volume = Volume::new("D:\\", "", VolumeKind::Fixed);
        assert_eq!(volume.share_name(), "D");
        assert_eq!(volume.root_path(), "D:\\");
    }

    #[test]
    fn test_display() {
        let volume = Volume::new("E:", "BACKUP", VolumeKind::Removable);
        assert_eq!(volume.to_string(), "E: (BACKUP) - Removable (USB/SD)");
        let volume = Volume::new("C:", "", VolumeKind::Fixed);
        assert_eq!(volume.to_string(), "C: (no label) - Local Disk");
    }

    #[test]
    fn test_parse_array() {
        let json = r#"[{"DeviceID":"C:","VolumeName":"System","DriveType":3},
                      {"DeviceID":"E:","VolumeName":null,"DriveType":2}]"#;
        let volumes = parse_logical_disks(json).unwrap();
        assert_eq!(
            volumes,
            vec![
                Volume::new("C:", "System", VolumeKind::Fixed),
                Volume::new("E:", "", VolumeKind::Removable),
            ]
        );
    }

    #[test]
    fn test_parse_single_object() {
        let json = r#"{"DeviceID":"F:","VolumeName":"SD","DriveType":2}"#;
        let volumes = parse_logical_disks(json).unwrap();
        assert_eq!(volumes, vec![Volume::new("F:", "SD", VolumeKind::Removable)]);
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_logical_disks("\r\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_logical_disks("Get-CimInstance : Access denied").is_err());
    }

    #[test]
    fn test_catalog_runs_cim_query() {
        let runner = ScriptedRunner::new().on(
            "Win32_LogicalDisk",
            CommandOutput::ok(r#"{"DeviceID":"E:","VolumeName":"USB","DriveType":2}"#),
        );
        let catalog = CimDriveCatalog::new(runner);
        let volumes = catalog.list_sharable_volumes().unwrap();
        assert_eq!(volumes.len(), 1);
        assert_eq!(catalog.runner.calls_matching("powershell").len(), 1);
    }

    #[test]
    fn test_catalog_query_failure() {
        let runner = ScriptedRunner::new()
            .on("Win32_LogicalDisk", CommandOutput::failed(1, "access denied"));
        let catalog = CimDriveCatalog::new(runner);
        assert!(matches!(
            catalog.list_sharable_volumes(),
            Err(NasError::Command { .. })
        ));
    }
}
