//! Cross-product enumeration over named dimensions.
//!
//! The repetition index is the outermost axis, followed by the declared
//! dimensions in order; the last dimension varies fastest. A run's flat index
//! decodes to its tuple with mixed-radix arithmetic, so adding an axis needs
//! no structural change.

use serde::Serialize;

use crate::contract::{Dimension, NormalizedSweep};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DimensionValue {
    pub name: String,
    pub value: String,
}

/// One concrete tuple selected from the cross-product.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunDescriptor {
    pub index: usize,
    /// 1-based.
    pub repetition: usize,
    pub values: Vec<DimensionValue>,
}

impl RunDescriptor {
    /// Positional arguments for the executable, in dimension order.
    pub fn args(&self) -> Vec<&str> {
        self.values.iter().map(|v| v.value.as_str()).collect()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.as_str())
    }

    /// `repetition=1 category=correct mode=undef flag=jump`
    pub fn label(&self) -> String {
        let mut label = format!("repetition={}", self.repetition);
        for value in &self.values {
            label.push(' ');
            label.push_str(&value.name);
            label.push('=');
            label.push_str(&value.value);
        }
        label
    }
}

#[derive(Debug, Clone)]
pub struct SweepPlan {
    dimensions: Vec<Dimension>,
    total_runs: usize,
}

impl SweepPlan {
    pub fn new(sweep: &NormalizedSweep) -> Self {
        let total_runs = sweep
            .dimensions
            .iter()
            .fold(sweep.repetitions, |acc, d| acc.saturating_mul(d.values.len()));
        Self {
            dimensions: sweep.dimensions.clone(),
            total_runs,
        }
    }

    pub fn len(&self) -> usize {
        self.total_runs
    }

    pub fn is_empty(&self) -> bool {
        self.total_runs == 0
    }

    pub fn descriptor(&self, index: usize) -> Option<RunDescriptor> {
        if index >= self.total_runs {
            return None;
        }

        let mut remainder = index;
        let mut values = Vec::with_capacity(self.dimensions.len());
        for dimension in self.dimensions.iter().rev() {
            let radix = dimension.values.len();
            let value_idx = remainder % radix;
            remainder /= radix;
            values.push(DimensionValue {
                name: dimension.name.clone(),
                value: dimension.values[value_idx].clone(),
            });
        }
        values.reverse();

        Some(RunDescriptor {
            index,
            repetition: remainder + 1,
            values,
        })
    }

    pub fn descriptors(&self) -> impl Iterator<Item = RunDescriptor> + '_ {
        (0..self.total_runs).filter_map(move |index| self.descriptor(index))
    }
}
