//! Column-oriented trajectory storage.

/// One sampled trajectory point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    pub time_s: f64,
    pub altitude_km: f64,
    pub velocity_m_s: f64,
    pub mass_kg: f64,
    pub thrust_n: f64,
    pub stage: usize,
}

/// Stage separation marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationEvent {
    pub stage: usize,
    pub time_s: f64,
    pub altitude_km: f64,
    pub velocity_m_s: f64,
}

/// The full mission trajectory, one entry per column per sample, with times
/// strictly increasing across stage boundaries.
#[derive(Debug, Clone, Default)]
pub struct FlightProfile {
    pub times_s: Vec<f64>,
    pub altitudes_km: Vec<f64>,
    pub velocities_m_s: Vec<f64>,
    pub masses_kg: Vec<f64>,
    pub thrusts_n: Vec<f64>,
    pub stages: Vec<usize>,
    pub separations: Vec<SeparationEvent>,
}

impl FlightProfile {
    pub fn len(&self) -> usize {
        self.times_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times_s.is_empty()
    }

    pub fn push(&mut self, sample: TrajectorySample) {
        self.times_s.push(sample.time_s);
        self.altitudes_km.push(sample.altitude_km);
        self.velocities_m_s.push(sample.velocity_m_s);
        self.masses_kg.push(sample.mass_kg);
        self.thrusts_n.push(sample.thrust_n);
        self.stages.push(sample.stage);
    }

    /// Reassemble the sample at `index`, if present.
    pub fn sample(&self, index: usize) -> Option<TrajectorySample> {
        if index >= self.len() {
            return None;
        }
        Some(TrajectorySample {
            time_s: self.times_s[index],
            altitude_km: self.altitudes_km[index],
            velocity_m_s: self.velocities_m_s[index],
            mass_kg: self.masses_kg[index],
            thrust_n: self.thrusts_n[index],
            stage: self.stages[index],
        })
    }

    /// Iterate over the samples in flight order.
    pub fn samples(&self) -> impl Iterator<Item = TrajectorySample> + '_ {
        (0..self.len()).filter_map(|index| self.sample(index))
    }

    pub fn last(&self) -> Option<TrajectorySample> {
        self.len().checked_sub(1).and_then(|index| self.sample(index))
    }

    /// Highest sampled altitude, `None` for an empty profile.
    pub fn max_altitude_km(&self) -> Option<f64> {
        self.altitudes_km.iter().copied().reduce(f64::max)
    }

    /// Highest sampled velocity, `None` for an empty profile.
    pub fn max_velocity_m_s(&self) -> Option<f64> {
        self.velocities_m_s.iter().copied().reduce(f64::max)
    }
}
