//! Wait-time statistics collected during a run
//!
//! Every aggregate returns 0.0 for an empty sample so that callers never
//! see NaN from an idle or very short run.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::SimTime;

/// Vehicle counter plus the wait of every departed vehicle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStatistics {
    total_vehicles: u64,
    waiting_times: Vec<SimTime>,
}

/// Flat record of the headline metrics, used for export
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub total_vehicles: u64,
    pub average_waiting_time: f64,
    pub max_waiting_time: f64,
    pub min_waiting_time: f64,
    pub median_waiting_time: f64,
    pub std_waiting_time: f64,
    pub variance_waiting_time: f64,
    pub total_waiting_time: f64,
}

/// One equal-width bucket of the wait-time histogram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl SummaryStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a vehicle entering a lane
    pub fn record_arrival(&mut self) {
        self.total_vehicles += 1;
    }

    /// Record the wait of a departing vehicle
    pub fn record_departure(&mut self, wait: SimTime) {
        debug_assert!(wait >= 0.0, "negative wait time {wait}");
        debug_assert!(
            (self.waiting_times.len() as u64) < self.total_vehicles,
            "departure recorded without a matching arrival"
        );
        self.waiting_times.push(wait);
    }

    /// Vehicles counted so far, including ones still queued
    pub fn total_vehicles(&self) -> u64 {
        self.total_vehicles
    }

    pub fn waiting_times(&self) -> &[SimTime] {
        &self.waiting_times
    }

    /// Number of departed vehicles
    pub fn count(&self) -> usize {
        self.waiting_times.len()
    }

    pub fn total_waiting_time(&self) -> f64 {
        self.waiting_times.iter().sum()
    }

    pub fn average_waiting_time(&self) -> f64 {
        if self.waiting_times.is_empty() {
            return 0.0;
        }
        self.total_waiting_time() / self.waiting_times.len() as f64
    }

    pub fn max_waiting_time(&self) -> f64 {
        if self.waiting_times.is_empty() {
            return 0.0;
        }
        self.waiting_times.iter().copied().fold(f64::MIN, f64::max)
    }

    pub fn min_waiting_time(&self) -> f64 {
        if self.waiting_times.is_empty() {
            return 0.0;
        }
        self.waiting_times.iter().copied().fold(f64::MAX, f64::min)
    }

    pub fn median_waiting_time(&self) -> f64 {
        if self.waiting_times.is_empty() {
            return 0.0;
        }
        let mut sorted = self.waiting_times.clone();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }

    /// Population variance
    pub fn variance_waiting_time(&self) -> f64 {
        if self.waiting_times.is_empty() {
            return 0.0;
        }
        let mean = self.average_waiting_time();
        self.waiting_times
            .iter()
            .map(|w| (w - mean).powi(2))
            .sum::<f64>()
            / self.waiting_times.len() as f64
    }

    /// Population standard deviation
    pub fn standard_deviation_waiting_time(&self) -> f64 {
        self.variance_waiting_time().sqrt()
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            total_vehicles: self.total_vehicles,
            average_waiting_time: self.average_waiting_time(),
            max_waiting_time: self.max_waiting_time(),
            min_waiting_time: self.min_waiting_time(),
            median_waiting_time: self.median_waiting_time(),
            std_waiting_time: self.standard_deviation_waiting_time(),
            variance_waiting_time: self.variance_waiting_time(),
            total_waiting_time: self.total_waiting_time(),
        }
    }

    /// Split `[min, max]` into `bins` equal-width buckets and count waits per bucket
    pub fn histogram(&self, bins: usize) -> Vec<HistogramBin> {
        if bins == 0 || self.waiting_times.is_empty() {
            return Vec::new();
        }
        let min = self.min_waiting_time();
        let span = self.max_waiting_time() - min;
        let width = if span > 0.0 { span / bins as f64 } else { 1.0 };

        let mut histogram: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: min + width * i as f64,
                upper: min + width * (i + 1) as f64,
                count: 0,
            })
            .collect();

        for wait in &self.waiting_times {
            let index = (((wait - min) / width).floor() as usize).min(bins - 1);
            histogram[index].count += 1;
        }
        histogram
    }
}

impl fmt::Display for SummaryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total vehicles:           {}", self.total_vehicles)?;
        writeln!(f, "Average waiting time:     {:.2}", self.average_waiting_time())?;
        writeln!(f, "Max waiting time:         {:.2}", self.max_waiting_time())?;
        writeln!(f, "Min waiting time:         {:.2}", self.min_waiting_time())?;
        writeln!(f, "Median waiting time:      {:.2}", self.median_waiting_time())?;
        writeln!(
            f,
            "Std waiting time:         {:.2}",
            self.standard_deviation_waiting_time()
        )?;
        writeln!(f, "Variance waiting time:    {:.2}", self.variance_waiting_time())?;
        write!(f, "Total waiting time:       {:.2}", self.total_waiting_time())
    }
}
