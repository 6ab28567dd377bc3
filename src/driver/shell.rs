use tokio::process::Command;

use super::error::{DriverError, DriverResult};
use super::types::{Device, DeviceDriver};

/// Device driver backed by the `adb` binary on PATH.
///
/// All commands are addressed by transport id so that multiple attached
/// devices do not race each other.
pub struct AdbShell {
    device: Device,
    transport_id: u32,
    screen_x: u32,
    screen_y: u32,
}

impl AdbShell {
    fn ensure_adb_available() -> DriverResult<()> {
        match std::process::Command::new("adb").arg("version").output() {
            Ok(out) if out.status.success() => Ok(()),
            Ok(out) => Err(DriverError::AdbUnavailable {
                reason: format!("'adb version' returned non-zero ({})", out.status),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DriverError::AdbUnavailable {
                    reason: "'adb' binary not found in PATH. Install Android Platform Tools \
                             (https://developer.android.com/tools/adb)"
                        .to_string(),
                })
            }
            Err(e) => Err(DriverError::AdbUnavailable {
                reason: format!("failed to invoke 'adb': {e}"),
            }),
        }
    }

    /// Connect to the device with the given transport id, or to the first
    /// attached device when none is given.
    pub async fn new(transport_id: Option<&str>) -> DriverResult<Self> {
        Self::ensure_adb_available()?;
        let devices = Self::list_devices().await?;
        if devices.is_empty() {
            return Err(DriverError::NoDevices);
        }
        let device = match transport_id {
            Some(tid) => devices
                .into_iter()
                .find(|d| d.transport_id.as_deref() == Some(tid))
                .ok_or_else(|| DriverError::TransportNotFound {
                    transport_id: tid.to_string(),
                })?,
            None => devices.into_iter().next().ok_or(DriverError::NoDevices)?,
        };
        let transport_id = device
            .transport_id
            .as_ref()
            .ok_or(DriverError::InvalidTransportId)?
            .parse::<u32>()
            .map_err(|_| DriverError::InvalidTransportId)?;
        let (screen_x, screen_y) = Self::get_screen_size(transport_id).await?;
        Ok(Self {
            device,
            transport_id,
            screen_x,
            screen_y,
        })
    }

    /// Connect by device name, falling back to `adb connect` for TCP devices.
    pub async fn new_with_device(device_name: &str) -> DriverResult<Self> {
        let devices = Self::list_devices().await?;
        if let Some(device) = devices.iter().find(|d| d.name == device_name) {
            return Self::new(device.transport_id.as_deref()).await;
        }
        let output = Command::new("adb")
            .arg("connect")
            .arg(device_name)
            .output()
            .await
            .map_err(|source| DriverError::Spawn {
                command: format!("adb connect {device_name}"),
                source,
            })?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success()
            || stdout.contains("Connection refused")
            || stderr.contains("Connection refused")
        {
            return Err(DriverError::CommandFailed {
                command: format!("adb connect {device_name}"),
                detail: format!(
                    "{}{}. Try 'adb tcpip 5555' on a USB-attached device first",
                    stdout.trim(),
                    stderr.trim()
                ),
            });
        }
        let devices = Self::list_devices().await?;
        match devices.iter().find(|d| d.name == device_name) {
            Some(device) => Self::new(device.transport_id.as_deref()).await,
            None => Err(DriverError::DeviceNotFound {
                name: device_name.to_string(),
            }),
        }
    }

    pub async fn list_devices() -> DriverResult<Vec<Device>> {
        Self::ensure_adb_available()?;
        let output = Command::new("adb")
            .arg("devices")
            .arg("-l")
            .output()
            .await
            .map_err(|source| DriverError::Spawn {
                command: "adb devices -l".to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(DriverError::CommandFailed {
                command: "adb devices -l".to_string(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(Self::parse_devices(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    pub fn parse_devices(output: &str) -> Vec<Device> {
        output
            .lines()
            .skip(1)
            .filter_map(|line| {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() >= 2 && parts[1] == "device" {
                    let name = parts[0].to_string();
                    let transport_id = parts.iter().find_map(|part| {
                        part.strip_prefix("transport_id:").map(str::to_string)
                    });
                    Some(Device { name, transport_id })
                } else {
                    None
                }
            })
            .collect()
    }

    async fn get_screen_size(transport_id: u32) -> DriverResult<(u32, u32)> {
        let stdout = Self::transport_command(transport_id, &["shell", "wm", "size"]).await?;
        Self::parse_screen_size(&String::from_utf8_lossy(&stdout))
    }

    fn parse_screen_size(stdout: &str) -> DriverResult<(u32, u32)> {
        for line in stdout.lines() {
            if let Some(size_str) = line.strip_prefix("Physical size: ") {
                let parts: Vec<&str> = size_str.trim().split('x').collect();
                if parts.len() == 2
                    && let (Ok(x), Ok(y)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>())
                {
                    return Ok((x, y));
                }
            }
        }
        Err(DriverError::ScreenSizeParseFailed)
    }

    /// Run one adb command against this transport and return its stdout.
    async fn transport_command(transport_id: u32, args: &[&str]) -> DriverResult<Vec<u8>> {
        Self::ensure_adb_available()?;
        let command = format!("adb -t {} {}", transport_id, args.join(" "));
        let mut cmd = Command::new("adb");
        cmd.arg("-t").arg(transport_id.to_string()).args(args);
        let output = cmd.output().await.map_err(|source| DriverError::Spawn {
            command: command.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(DriverError::CommandFailed {
                command,
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    async fn capture_screen_bytes_internal(&self) -> DriverResult<Vec<u8>> {
        Self::transport_command(self.transport_id, &["exec-out", "screencap", "-p"]).await
    }
}

impl DeviceDriver for AdbShell {
    async fn screen_capture_bytes(&self) -> DriverResult<Vec<u8>> {
        self.capture_screen_bytes_internal().await
    }

    async fn tap(&self, x: u32, y: u32) -> DriverResult<()> {
        if x > self.screen_x || y > self.screen_y {
            return Err(DriverError::OutOfBounds { x, y });
        }
        let (xs, ys) = (x.to_string(), y.to_string());
        Self::transport_command(self.transport_id, &["shell", "input", "tap", &xs, &ys]).await?;
        Ok(())
    }

    async fn swipe(
        &self,
        x1: u32,
        y1: u32,
        x2: u32,
        y2: u32,
        duration_ms: Option<u32>,
    ) -> DriverResult<()> {
        for &(x, y) in &[(x1, y1), (x2, y2)] {
            if x > self.screen_x || y > self.screen_y {
                return Err(DriverError::OutOfBounds { x, y });
            }
        }
        let coords = [
            x1.to_string(),
            y1.to_string(),
            x2.to_string(),
            y2.to_string(),
        ];
        let mut args = vec!["shell", "input", "swipe"];
        args.extend(coords.iter().map(String::as_str));
        let duration;
        if let Some(d) = duration_ms {
            duration = d.to_string();
            args.push(&duration);
        }
        Self::transport_command(self.transport_id, &args).await?;
        Ok(())
    }

    fn screen_dimensions(&self) -> (u32, u32) {
        (self.screen_x, self.screen_y)
    }

    fn device_name(&self) -> &str {
        &self.device.name
    }
}
