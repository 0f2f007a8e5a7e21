use windowsill_core::{
    geometry::SketchFit,
    sim::{SelectionPolicy, Timing},
};

const DOCUMENTATION: &str = r#"# Windowsill settings. You may edit this file, but be aware that formatting and comments will not
# be preserved. Missing fields take their default value.

# `store` is the JSON-lines file sketches are read from, and watched for new ones every `poll_ms`.
# `selection` is "uniform", or "spotlight" to show newly submitted sketches before anything else.
# Set `seed` for a repeatable show, and `snapshot_dir` to save an SVG each time a caption comes up.
# Durations under [timing] are in milliseconds. The caption is shown `caption_show_ms` into the hold,
# and hidden at `caption_hide_ms`, which may be no later than `wait_ms`.
# [canvas] is the size of the capture canvas, fit into each window pane.

"#;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

/// Size of the rendering surface, in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}
impl Default for SurfaceSize {
    fn default() -> Self {
        // Matches the aspect of a settled view.
        Self {
            width: 600,
            height: 800,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: std::path::PathBuf,
    pub poll_ms: u64,
    pub frames_per_second: f32,
    pub selection: SelectionPolicy,
    pub seed: Option<u64>,
    pub snapshot_dir: Option<std::path::PathBuf>,
    pub timing: Timing,
    pub canvas: SketchFit,
    pub surface: SurfaceSize,
}
impl Default for Settings {
    fn default() -> Self {
        let store = dirs::data_dir()
            .map(|mut dir| {
                dir.push(env!("CARGO_PKG_NAME"));
                dir
            })
            .unwrap_or_default()
            .join("sketches.jsonl");
        Self {
            store,
            poll_ms: 500,
            frames_per_second: 60.0,
            selection: SelectionPolicy::default(),
            seed: None,
            snapshot_dir: None,
            timing: Timing::default(),
            canvas: SketchFit::default(),
            surface: SurfaceSize::default(),
        }
    }
}

/// Settings as loaded from the user's preferences.
pub struct Loaded {
    pub settings: Settings,
    /// The file was there, but unreadable.
    failed_to_load: bool,
    found: bool,
}
impl Settings {
    const FILENAME: &'static str = "settings.toml";
    /// Shared global settings, loaded from user preferences.
    /// (Or defaulted, if unavailable for some reason)
    #[must_use]
    pub fn get() -> &'static Loaded {
        static GLOBAL_SETTINGS: std::sync::OnceLock<Loaded> = std::sync::OnceLock::new();

        GLOBAL_SETTINGS.get_or_init(|| {
            let mut dir = preferences_dir();
            match dir.as_mut() {
                None => {
                    log::warn!("No preferences dir, defaulting settings.");
                    Loaded {
                        settings: Self::default(),
                        failed_to_load: true,
                        found: false,
                    }
                }
                Some(dir) => {
                    dir.push(Self::FILENAME);
                    Self::load_or_default(dir)
                }
            }
        })
    }
    fn load_or_default(path: &std::path::Path) -> Loaded {
        if !path.exists() {
            return Loaded {
                settings: Self::default(),
                failed_to_load: false,
                found: false,
            };
        }
        let settings: anyhow::Result<Settings> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let settings : Settings = toml::from_str(&string)?;
            Ok(settings.sanitized())
        };

        match settings {
            Ok(settings) => Loaded {
                settings,
                failed_to_load: false,
                found: true,
            },
            Err(e) => {
                log::warn!("Failed to load settings from {path:?}, defaulting: {e:#}");
                Loaded {
                    settings: Self::default(),
                    failed_to_load: true,
                    found: true,
                }
            }
        }
    }
    /// Replace unusable values with their defaults.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let default = Self::default();
        if let Err(e) = self.timing.validate() {
            log::warn!("Invalid timing, defaulting: {e}");
            self.timing = default.timing;
        }
        if !(self.frames_per_second.is_finite() && self.frames_per_second > 0.0) {
            log::warn!(
                "Invalid frames_per_second {}, defaulting",
                self.frames_per_second
            );
            self.frames_per_second = default.frames_per_second;
        }
        self.poll_ms = self.poll_ms.max(1);
        self
    }
    /// Time between frames.
    #[must_use]
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f32(1.0 / self.frames_per_second)
    }
}
impl Loaded {
    /// Return true if the user's settings file exists but couldn't be used.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    /// Write the settings out with documentation, if there isn't a settings file already.
    /// Returns whether a file was written.
    pub fn save_if_absent(&self) -> anyhow::Result<bool> {
        if self.found {
            return Ok(false);
        }
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicity do *not* create recursively. If not found, the user probably has a good reason.
        // Ignore errors (could already exist). Any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Settings::FILENAME);
        let string = DOCUMENTATION.to_owned() + &toml::ser::to_string_pretty(&self.settings)?;
        std::fs::write(preferences, string)?;
        Ok(true)
    }
}

#[cfg(test)]
mod test {
    use super::Settings;
    use windowsill_core::sim::SelectionPolicy;

    #[test]
    fn round_trips_through_toml() {
        let settings = Settings {
            seed: Some(7),
            selection: SelectionPolicy::Spotlight,
            ..Settings::default()
        };
        let string = toml::ser::to_string_pretty(&settings).unwrap();
        assert!(string.contains(r#"selection = "spotlight""#));
        let parsed: Settings = toml::from_str(&string).unwrap();
        assert_eq!(parsed, settings);
    }
    #[test]
    fn partial_file_defaults_the_rest() {
        let parsed: Settings = toml::from_str(
            r#"
            poll_ms = 250
            [timing]
            draw_ms = 3000.0
            "#,
        )
        .unwrap();
        assert_eq!(parsed.poll_ms, 250);
        assert_eq!(parsed.timing.draw_ms, 3000.0);
        assert_eq!(parsed.timing.wait_ms, Settings::default().timing.wait_ms);
        assert_eq!(parsed.selection, SelectionPolicy::Uniform);
    }
    #[test]
    fn bad_values_are_defaulted() {
        let mut settings = Settings::default();
        settings.timing.caption_hide_ms = settings.timing.wait_ms * 2.0;
        settings.frames_per_second = 0.0;
        settings.poll_ms = 0;
        let sanitized = settings.sanitized();
        assert_eq!(sanitized.timing, Settings::default().timing);
        assert_eq!(sanitized.frames_per_second, 60.0);
        assert_eq!(sanitized.poll_ms, 1);
    }
}
