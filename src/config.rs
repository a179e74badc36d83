use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub charts: ChartsConfig,
    #[serde(default)]
    pub histogram: HistogramConfig,
    pub source: SourceConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartsConfig {
    /// Number of named timer series on the stacked chart; the rest go to "other".
    #[serde(default = "default_top_timer_count")]
    pub top_timer_count: usize,
    /// A gap is drawn when consecutive samples are more than `interval * (1 + slack)` apart.
    #[serde(default = "default_gap_slack_factor")]
    pub gap_slack_factor: f64,
    #[serde(default = "default_micros_per_millisecond")]
    pub micros_per_millisecond: f64,
}

fn default_top_timer_count() -> usize {
    5
}

fn default_gap_slack_factor() -> f64 {
    0.5
}

fn default_micros_per_millisecond() -> f64 {
    1000.0
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            top_timer_count: default_top_timer_count(),
            gap_slack_factor: default_gap_slack_factor(),
            micros_per_millisecond: default_micros_per_millisecond(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HistogramConfig {
    /// HDR precision once a histogram outgrows its raw values.
    #[serde(default = "default_significant_digits")]
    pub significant_digits: u8,
    /// Raw values kept exactly before switching to HDR buckets.
    #[serde(default = "default_raw_value_limit")]
    pub raw_value_limit: usize,
}

fn default_significant_digits() -> u8 {
    3
}

fn default_raw_value_limit() -> usize {
    1024
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            significant_digits: default_significant_digits(),
            raw_value_limit: default_raw_value_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// JSON aggregate document read by the file source.
    pub path: String,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.charts.top_timer_count > 0,
            "charts.top_timer_count must be > 0, got {}",
            self.charts.top_timer_count
        );
        anyhow::ensure!(
            self.charts.gap_slack_factor.is_finite() && self.charts.gap_slack_factor >= 0.0,
            "charts.gap_slack_factor must be a finite value >= 0, got {}",
            self.charts.gap_slack_factor
        );
        anyhow::ensure!(
            self.charts.micros_per_millisecond.is_finite()
                && self.charts.micros_per_millisecond > 0.0,
            "charts.micros_per_millisecond must be > 0, got {}",
            self.charts.micros_per_millisecond
        );
        anyhow::ensure!(
            (1..=5).contains(&self.histogram.significant_digits),
            "histogram.significant_digits must be between 1 and 5, got {}",
            self.histogram.significant_digits
        );
        anyhow::ensure!(
            self.histogram.raw_value_limit > 0,
            "histogram.raw_value_limit must be > 0, got {}",
            self.histogram.raw_value_limit
        );
        anyhow::ensure!(!self.source.path.is_empty(), "source.path must be non-empty");
        Ok(())
    }
}
