// Duration histogram that keeps exact raw values while small and switches to HDR
// buckets once it outgrows `raw_value_limit`. The representation depends only on
// the total count, so merging is order independent.

use std::fmt;
use std::io::Cursor;

use hdrhistogram::Histogram;
use hdrhistogram::serialization::{Deserializer as HdrDeserializer, Serializer as _, V2Serializer};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::HistogramConfig;
use crate::error::{ViewError, ViewResult};

#[derive(Clone)]
enum Buckets {
    Raw(Vec<u64>),
    Hdr(Histogram<u64>),
}

#[derive(Clone)]
pub struct DurationHistogram {
    config: HistogramConfig,
    buckets: Buckets,
}

impl Default for DurationHistogram {
    fn default() -> Self {
        Self::new(HistogramConfig::default())
    }
}

impl fmt::Debug for DurationHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.buckets {
            Buckets::Raw(_) => "raw",
            Buckets::Hdr(_) => "hdr",
        };
        f.debug_struct("DurationHistogram")
            .field("kind", &kind)
            .field("len", &self.len())
            .finish()
    }
}

impl DurationHistogram {
    pub fn new(config: HistogramConfig) -> Self {
        Self {
            config,
            buckets: Buckets::Raw(Vec::new()),
        }
    }

    pub fn from_values(values: &[u64], config: HistogramConfig) -> ViewResult<Self> {
        let mut histogram = Self::new(config);
        for &value in values {
            histogram.record(value)?;
        }
        Ok(histogram)
    }

    /// Merges every histogram into a fresh one. Empty input gives an empty histogram.
    pub fn merge_all<'a, I>(histograms: I, config: HistogramConfig) -> ViewResult<Self>
    where
        I: IntoIterator<Item = &'a DurationHistogram>,
    {
        let mut merged = Self::new(config);
        for histogram in histograms {
            merged.merge(histogram)?;
        }
        Ok(merged)
    }

    pub fn len(&self) -> u64 {
        match &self.buckets {
            Buckets::Raw(values) => values.len() as u64,
            Buckets::Hdr(h) => h.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_exact(&self) -> bool {
        matches!(self.buckets, Buckets::Raw(_))
    }

    pub fn record(&mut self, value: u64) -> ViewResult<()> {
        match &mut self.buckets {
            Buckets::Raw(values) => {
                values.push(value);
                if values.len() > self.config.raw_value_limit {
                    self.convert_to_hdr()?;
                }
                Ok(())
            }
            Buckets::Hdr(h) => h
                .record(value)
                .map_err(|e| ViewError::Histogram(e.to_string())),
        }
    }

    /// Adds every recorded value of `other` to this histogram.
    pub fn merge(&mut self, other: &DurationHistogram) -> ViewResult<()> {
        match &other.buckets {
            Buckets::Raw(values) => {
                for &value in values {
                    self.record(value)?;
                }
                Ok(())
            }
            Buckets::Hdr(other_hdr) => {
                self.convert_to_hdr()?;
                match &mut self.buckets {
                    Buckets::Hdr(h) => h
                        .add(other_hdr)
                        .map_err(|e| ViewError::Histogram(e.to_string())),
                    Buckets::Raw(_) => Err(ViewError::Histogram(
                        "histogram did not convert to hdr form".into(),
                    )),
                }
            }
        }
    }

    /// Smallest recorded value such that at least `percentile * len` values are <= it.
    /// `percentile` is a fraction in [0, 1]. An empty histogram returns 0.
    pub fn value_at_percentile(&self, percentile: f64) -> ViewResult<u64> {
        if !(0.0..=1.0).contains(&percentile) {
            return Err(ViewError::InvalidPercentile(percentile));
        }
        match &self.buckets {
            Buckets::Raw(values) if values.is_empty() => Ok(0),
            Buckets::Raw(values) => {
                let mut sorted = values.clone();
                sorted.sort_unstable();
                let rank = (percentile * sorted.len() as f64).ceil() as usize;
                let index = rank.saturating_sub(1).min(sorted.len() - 1);
                Ok(sorted[index])
            }
            Buckets::Hdr(h) if h.is_empty() => Ok(0),
            Buckets::Hdr(h) => Ok(h.lowest_equivalent(h.value_at_quantile(percentile))),
        }
    }

    fn convert_to_hdr(&mut self) -> ViewResult<()> {
        let Buckets::Raw(values) = &self.buckets else {
            return Ok(());
        };
        let mut h = Histogram::<u64>::new(self.config.significant_digits)
            .map_err(|e| ViewError::Histogram(e.to_string()))?;
        for &value in values {
            h.record(value)
                .map_err(|e| ViewError::Histogram(e.to_string()))?;
        }
        self.buckets = Buckets::Hdr(h);
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum HistogramRepr {
    Raw { values: Vec<u64> },
    /// HDR V2 encoding.
    Encoded { bytes: Vec<u8> },
}

impl TryFrom<HistogramRepr> for DurationHistogram {
    type Error = ViewError;

    fn try_from(repr: HistogramRepr) -> ViewResult<Self> {
        let config = HistogramConfig::default();
        match repr {
            HistogramRepr::Raw { values } => Self::from_values(&values, config),
            HistogramRepr::Encoded { bytes } => {
                let mut h: Histogram<u64> = HdrDeserializer::new()
                    .deserialize(&mut Cursor::new(bytes))
                    .map_err(|e| ViewError::Histogram(format!("decode: {:?}", e)))?;
                // decoded bounds are fixed; later merges may bring larger values
                h.auto(true);
                if h.len() > config.raw_value_limit as u64 {
                    return Ok(Self {
                        config,
                        buckets: Buckets::Hdr(h),
                    });
                }
                // small encoded histograms go back to raw values at their bucket floor
                let mut values = Vec::with_capacity(h.len() as usize);
                for v in h.iter_recorded() {
                    let value = h.lowest_equivalent(v.value_iterated_to());
                    for _ in 0..v.count_at_value() {
                        values.push(value);
                    }
                }
                Ok(Self {
                    config,
                    buckets: Buckets::Raw(values),
                })
            }
        }
    }
}

impl Serialize for DurationHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match &self.buckets {
            Buckets::Raw(values) => HistogramRepr::Raw {
                values: values.clone(),
            },
            Buckets::Hdr(h) => {
                let mut bytes = Vec::new();
                V2Serializer::new()
                    .serialize(h, &mut bytes)
                    .map_err(|e| serde::ser::Error::custom(format!("encode: {:?}", e)))?;
                HistogramRepr::Encoded { bytes }
            }
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DurationHistogram {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = HistogramRepr::deserialize(deserializer)?;
        DurationHistogram::try_from(repr).map_err(serde::de::Error::custom)
    }
}
