use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLS: usize = 10;
pub const DEFAULT_WALL_PERCENT: u32 = 30;
pub const DEFAULT_TORCH_PERCENT: u32 = 10;
pub const DEFAULT_FPS: u64 = 30;

pub const SIZE_RANGE: RangeInclusive<usize> = 5..=20;
pub const WALL_PERCENT_RANGE: RangeInclusive<u32> = 0..=60;
pub const TORCH_PERCENT_RANGE: RangeInclusive<u32> = 0..=30;

/// Parameters for each new game plus frontend knobs, read from `FOGMAZE_*`
/// environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub rows: usize,
    pub cols: usize,
    pub wall_percent: u32,
    pub torch_percent: u32,
    pub seed: Option<u64>,
    pub fps: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            wall_percent: DEFAULT_WALL_PERCENT,
            torch_percent: DEFAULT_TORCH_PERCENT,
            seed: None,
            fps: DEFAULT_FPS,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparsable values fall back to the default; numbers outside the
    /// allowed range are clamped into it.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        Settings {
            rows: clamped(&lookup, "FOGMAZE_ROWS", defaults.rows, SIZE_RANGE),
            cols: clamped(&lookup, "FOGMAZE_COLS", defaults.cols, SIZE_RANGE),
            wall_percent: clamped(
                &lookup,
                "FOGMAZE_WALLS",
                defaults.wall_percent,
                WALL_PERCENT_RANGE,
            ),
            torch_percent: clamped(
                &lookup,
                "FOGMAZE_TORCHES",
                defaults.torch_percent,
                TORCH_PERCENT_RANGE,
            ),
            seed: parsed(&lookup, "FOGMAZE_SEED"),
            fps: parsed(&lookup, "FOGMAZE_FPS")
                .filter(|v| *v > 0)
                .unwrap_or(defaults.fps),
            log_file: lookup("FOGMAZE_LOG")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn wall_ratio(&self) -> f64 {
        f64::from(self.wall_percent) / 100.0
    }

    pub fn torch_ratio(&self) -> f64 {
        f64::from(self.torch_percent) / 100.0
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key).and_then(|v| v.trim().parse::<T>().ok())
}

fn clamped<F, T>(lookup: &F, key: &str, default: T, range: RangeInclusive<T>) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Ord + Copy,
{
    parsed(lookup, key)
        .unwrap_or(default)
        .clamp(*range.start(), *range.end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(settings(&[]), Settings::default());
    }

    #[test]
    fn values_are_read() {
        let s = settings(&[
            ("FOGMAZE_ROWS", "12"),
            ("FOGMAZE_COLS", " 7 "),
            ("FOGMAZE_WALLS", "45"),
            ("FOGMAZE_TORCHES", "5"),
            ("FOGMAZE_SEED", "99"),
            ("FOGMAZE_FPS", "60"),
            ("FOGMAZE_LOG", "/tmp/fogmaze.log"),
        ]);
        assert_eq!(s.rows, 12);
        assert_eq!(s.cols, 7);
        assert_eq!(s.wall_percent, 45);
        assert_eq!(s.torch_percent, 5);
        assert_eq!(s.seed, Some(99));
        assert_eq!(s.fps, 60);
        assert_eq!(s.log_file, Some(PathBuf::from("/tmp/fogmaze.log")));
        assert!((s.wall_ratio() - 0.45).abs() < 1e-12);
        assert!((s.torch_ratio() - 0.05).abs() < 1e-12);
    }

    #[rstest]
    #[case("FOGMAZE_ROWS", "2", 5)]
    #[case("FOGMAZE_ROWS", "200", 20)]
    #[case("FOGMAZE_ROWS", "-3", DEFAULT_ROWS)]
    #[case("FOGMAZE_ROWS", "many", DEFAULT_ROWS)]
    fn rows_are_clamped_or_defaulted(#[case] key: &str, #[case] value: &str, #[case] rows: usize) {
        assert_eq!(settings(&[(key, value)]).rows, rows);
    }

    #[rstest]
    #[case("90", 60)]
    #[case("0", 0)]
    #[case("x", DEFAULT_WALL_PERCENT)]
    fn walls_are_clamped_or_defaulted(#[case] value: &str, #[case] percent: u32) {
        assert_eq!(settings(&[("FOGMAZE_WALLS", value)]).wall_percent, percent);
    }

    #[test]
    fn torches_are_clamped() {
        assert_eq!(settings(&[("FOGMAZE_TORCHES", "31")]).torch_percent, 30);
    }

    #[test]
    fn zero_fps_and_blank_log_fall_back() {
        let s = settings(&[("FOGMAZE_FPS", "0"), ("FOGMAZE_LOG", "  ")]);
        assert_eq!(s.fps, DEFAULT_FPS);
        assert_eq!(s.log_file, None);
    }
}
