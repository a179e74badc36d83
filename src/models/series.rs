// Chart data series: (capture time, value) points where a value may be an explicit gap.

use serde::{Serialize, Serializer};

/// A recorded value, or the "no data" marker that breaks the line on a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesValue {
    Present(f64),
    Absent,
}

impl SeriesValue {
    pub fn value(self) -> Option<f64> {
        match self {
            SeriesValue::Present(v) => Some(v),
            SeriesValue::Absent => None,
        }
    }

    pub fn is_absent(self) -> bool {
        matches!(self, SeriesValue::Absent)
    }
}

/// Serializes to a JSON number, or `null` for a gap.
impl Serialize for SeriesValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SeriesValue::Present(v) => serializer.serialize_f64(*v),
            SeriesValue::Absent => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSeries {
    /// `None` for the "other" series.
    name: Option<String>,
    data: Vec<(i64, SeriesValue)>,
}

impl DataSeries {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            data: Vec::new(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(Some(name.into()))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn points(&self) -> &[(i64, SeriesValue)] {
        &self.data
    }

    pub fn value_at(&self, capture_time: i64) -> Option<SeriesValue> {
        self.data
            .iter()
            .find(|(t, _)| *t == capture_time)
            .map(|(_, v)| *v)
    }

    pub fn add(&mut self, capture_time: i64, value: f64) {
        self.push(capture_time, SeriesValue::Present(value));
    }

    pub fn add_absent(&mut self, capture_time: i64) {
        self.push(capture_time, SeriesValue::Absent);
    }

    fn push(&mut self, capture_time: i64, value: SeriesValue) {
        debug_assert!(
            self.data.last().is_none_or(|(t, _)| *t < capture_time),
            "data series points must be appended in increasing time order"
        );
        self.data.push((capture_time, value));
    }
}
