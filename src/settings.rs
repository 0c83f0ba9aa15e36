use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default)]
    pub present_mode: PresentModeSetting,
    #[serde(default = "RenderSettings::default_mouse_speed")]
    pub mouse_speed: f32,
    #[serde(default = "RenderSettings::default_movement_speed")]
    pub movement_speed: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            present_mode: PresentModeSetting::default(),
            mouse_speed: Self::default_mouse_speed(),
            movement_speed: Self::default_movement_speed(),
        }
    }
}

impl RenderSettings {
    pub fn load() -> Self {
        Self::load_from_path("settings.json")
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        use std::fs;

        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<RenderSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded render settings from {:?}", path);
                    settings.validate()
                }
                Err(err) => {
                    warn!(
                        "Failed to parse {:?} ({}). Falling back to default render settings.",
                        path, err
                    );
                    RenderSettings::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Render settings file {:?} not found. Using default settings.",
                    path
                );
                RenderSettings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default render settings.",
                    path, err
                );
                RenderSettings::default()
            }
        }
    }

    fn validate(mut self) -> Self {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            warn!("Resolution must be greater than zero. Using default resolution.");
            self.resolution = Resolution::default();
        }

        if self.mouse_speed <= 0.0 {
            warn!("Mouse speed must be positive. Using default value.");
            self.mouse_speed = Self::default_mouse_speed();
        }

        if self.movement_speed <= 0.0 {
            warn!("Movement speed must be positive. Using default value.");
            self.movement_speed = Self::default_movement_speed();
        }

        self
    }

    pub fn present_mode(&self, available: &[wgpu::PresentMode]) -> wgpu::PresentMode {
        let desired = self.present_mode.to_wgpu();
        if available.contains(&desired) {
            return desired;
        }

        warn!(
            "Requested present mode {:?} is not supported. Falling back to FIFO.",
            desired
        );

        if available.contains(&wgpu::PresentMode::Fifo) {
            wgpu::PresentMode::Fifo
        } else {
            available
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo)
        }
    }

    const fn default_mouse_speed() -> f32 {
        4.0
    }

    const fn default_movement_speed() -> f32 {
        12.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentModeSetting {
    Fifo,
    FifoRelaxed,
    Immediate,
    Mailbox,
    AutoVsync,
    AutoNoVsync,
}

impl PresentModeSetting {
    fn to_wgpu(&self) -> wgpu::PresentMode {
        match self {
            PresentModeSetting::Fifo => wgpu::PresentMode::Fifo,
            PresentModeSetting::FifoRelaxed => wgpu::PresentMode::FifoRelaxed,
            PresentModeSetting::Immediate => wgpu::PresentMode::Immediate,
            PresentModeSetting::Mailbox => wgpu::PresentMode::Mailbox,
            PresentModeSetting::AutoVsync => wgpu::PresentMode::AutoVsync,
            PresentModeSetting::AutoNoVsync => wgpu::PresentMode::AutoNoVsync,
        }
    }
}

impl Default for PresentModeSetting {
    fn default() -> Self {
        PresentModeSetting::Fifo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_replaces_invalid_values_with_defaults() {
        let validated = RenderSettings {
            resolution: Resolution {
                width: 0,
                height: 0,
            },
            present_mode: PresentModeSetting::Immediate,
            mouse_speed: -1.0,
            movement_speed: 0.0,
        }
        .validate();

        assert_eq!(validated.resolution.width, Resolution::default().width);
        assert_eq!(validated.resolution.height, Resolution::default().height);
        assert_eq!(validated.mouse_speed, RenderSettings::default().mouse_speed);
        assert_eq!(
            validated.movement_speed,
            RenderSettings::default().movement_speed
        );
    }

    #[test]
    fn validate_preserves_valid_values() {
        let valid = RenderSettings {
            resolution: Resolution {
                width: 1920,
                height: 1080,
            },
            present_mode: PresentModeSetting::Mailbox,
            mouse_speed: 2.5,
            movement_speed: 30.0,
        };

        let validated = valid.clone().validate();

        assert_eq!(validated.resolution.width, valid.resolution.width);
        assert_eq!(validated.resolution.height, valid.resolution.height);
        assert_eq!(validated.mouse_speed, valid.mouse_speed);
        assert_eq!(validated.movement_speed, valid.movement_speed);
    }

    #[test]
    fn present_mode_returns_desired_when_available() {
        let settings = RenderSettings {
            present_mode: PresentModeSetting::Mailbox,
            ..RenderSettings::default()
        };

        let available = [
            wgpu::PresentMode::Fifo,
            wgpu::PresentMode::Mailbox,
            wgpu::PresentMode::Immediate,
        ];

        assert_eq!(
            settings.present_mode(&available),
            wgpu::PresentMode::Mailbox
        );
    }

    #[test]
    fn present_mode_falls_back_to_fifo_when_desired_missing() {
        let settings = RenderSettings {
            present_mode: PresentModeSetting::Mailbox,
            ..RenderSettings::default()
        };

        let available = [wgpu::PresentMode::Fifo, wgpu::PresentMode::Immediate];

        assert_eq!(settings.present_mode(&available), wgpu::PresentMode::Fifo);
    }

    #[test]
    fn settings_parse_from_partial_json() {
        let parsed: RenderSettings =
            serde_json::from_str(r#"{ "present_mode": "mailbox" }"#).unwrap();
        assert!(matches!(parsed.present_mode, PresentModeSetting::Mailbox));
        assert_eq!(parsed.resolution.width, 1280);
        assert_eq!(parsed.mouse_speed, 4.0);
    }
}
