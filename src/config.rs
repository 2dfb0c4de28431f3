//! Run configuration: built-in defaults, `defaults.ini`, then CLI overrides.

use std::path::{Path, PathBuf};

use configparser::ini::Ini;

use crate::error::Error;
use crate::tracker::TrackerConfig;

const INI_SECTION: &str = "tracker";

/// Values supplied on the command line; `None` falls through to the INI
/// file and then to the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub vis_dir: Option<PathBuf>,
    pub max_dist: Option<f64>,
    pub max_age: Option<u32>,
    pub alpha: Option<f64>,
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub vis_dir: PathBuf,
    pub tracker: TrackerConfig,
}

impl RunConfig {
    /// Merge CLI overrides with the `[tracker]` section of `ini_path`.
    ///
    /// The INI file is optional; when present its keys are `input`, `output`,
    /// `vis-dir`, `max-dist`, `max-age` and `alpha`. Command-line values win
    /// over INI values, which win over the built-in tracker defaults. The
    /// three paths have no built-in fallback and must come from one of the
    /// two sources.
    pub fn resolve(overrides: Overrides, ini_path: &Path) -> Result<Self, Error> {
        let ini = load_ini(ini_path)?;

        let input = resolve_path(overrides.input, &ini, "input")?;
        let output = resolve_path(overrides.output, &ini, "output")?;
        let vis_dir = resolve_path(overrides.vis_dir, &ini, "vis-dir")?;

        let defaults = TrackerConfig::default();
        let max_dist = match overrides.max_dist {
            Some(v) => v,
            None => ini_float(&ini, "max-dist")?.unwrap_or(defaults.max_dist),
        };
        let max_age = match overrides.max_age {
            Some(v) => v,
            None => ini_age(&ini)?.unwrap_or(defaults.max_age),
        };
        let alpha = match overrides.alpha {
            Some(v) => v,
            None => ini_float(&ini, "alpha")?.unwrap_or(defaults.alpha),
        };

        if !(0.0..=1.0).contains(&alpha) {
            return Err(Error::Config(format!(
                "alpha must lie in [0, 1], got {alpha}"
            )));
        }
        if max_dist <= 0.0 {
            return Err(Error::Config(format!(
                "max-dist must be positive, got {max_dist}"
            )));
        }

        Ok(Self {
            input,
            output,
            vis_dir,
            tracker: TrackerConfig {
                max_dist,
                max_age,
                alpha,
            },
        })
    }
}

fn load_ini(path: &Path) -> Result<Option<Ini>, Error> {
    if !path.is_file() {
        return Ok(None);
    }
    let mut ini = Ini::new();
    ini.load(path)
        .map_err(|err| Error::Config(format!("{}: {err}", path.display())))?;
    Ok(Some(ini))
}

fn resolve_path(
    override_value: Option<PathBuf>,
    ini: &Option<Ini>,
    key: &str,
) -> Result<PathBuf, Error> {
    if let Some(path) = override_value {
        return Ok(path);
    }
    if let Some(value) = ini.as_ref().and_then(|ini| ini.get(INI_SECTION, key)) {
        return Ok(PathBuf::from(value));
    }
    Err(Error::Config(format!(
        "missing required path: pass --{key} or set [{INI_SECTION}] {key} in defaults.ini"
    )))
}

fn ini_float(ini: &Option<Ini>, key: &str) -> Result<Option<f64>, Error> {
    match ini {
        Some(ini) => ini
            .getfloat(INI_SECTION, key)
            .map_err(|err| Error::Config(format!("invalid {key}: {err}"))),
        None => Ok(None),
    }
}

fn ini_age(ini: &Option<Ini>) -> Result<Option<u32>, Error> {
    let value = match ini {
        Some(ini) => ini
            .getint(INI_SECTION, "max-age")
            .map_err(|err| Error::Config(format!("invalid max-age: {err}")))?,
        None => None,
    };
    value
        .map(|v| {
            u32::try_from(v)
                .map_err(|_| Error::Config(format!("max-age must be a non-negative frame count, got {v}")))
        })
        .transpose()
}
