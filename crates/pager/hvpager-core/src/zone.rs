//! Hysteresis gate deciding whether paged input interception is armed.
//!
//! Interception disarms when the body's top edge rises to the disarm line and
//! re-arms only after it falls back below the (lower) re-arm line. Positions
//! inside the band keep the previous state.

use serde::{Deserialize, Serialize};

use crate::config::ZoneConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneState {
    pub armed: bool,
}

impl Default for ZoneState {
    fn default() -> Self {
        Self { armed: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneChange {
    Unchanged,
    Armed,
    Disarmed,
}

impl ZoneState {
    /// Observe the body's top edge (viewport-relative). Without a body section
    /// there is no boundary to cross and the state is kept.
    pub fn observe(
        &mut self,
        body_top: Option<f64>,
        viewport_height: f64,
        cfg: &ZoneConfig,
    ) -> ZoneChange {
        let Some(top) = body_top else {
            return ZoneChange::Unchanged;
        };
        let vh = viewport_height.max(0.0);
        if self.armed {
            if top <= vh * cfg.disarm_fraction {
                return self.set(false);
            }
        } else if top >= vh * cfg.rearm_fraction {
            return self.set(true);
        }
        ZoneChange::Unchanged
    }

    fn set(&mut self, armed: bool) -> ZoneChange {
        if self.armed == armed {
            return ZoneChange::Unchanged;
        }
        self.armed = armed;
        if armed {
            ZoneChange::Armed
        } else {
            ZoneChange::Disarmed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VH: f64 = 1000.0;

    #[test]
    fn flips_only_at_the_asymmetric_thresholds() {
        let cfg = ZoneConfig::default();
        let mut z = ZoneState::default();
        assert_eq!(z.observe(Some(900.0), VH, &cfg), ZoneChange::Unchanged);
        assert_eq!(z.observe(Some(201.0), VH, &cfg), ZoneChange::Unchanged);
        assert_eq!(z.observe(Some(200.0), VH, &cfg), ZoneChange::Disarmed);
        // Inside the band: stays disarmed.
        assert_eq!(z.observe(Some(400.0), VH, &cfg), ZoneChange::Unchanged);
        assert_eq!(z.observe(Some(549.0), VH, &cfg), ZoneChange::Unchanged);
        assert!(!z.armed);
        assert_eq!(z.observe(Some(550.0), VH, &cfg), ZoneChange::Armed);
    }

    #[test]
    fn hovering_near_one_boundary_does_not_oscillate() {
        let cfg = ZoneConfig::default();
        let mut z = ZoneState::default();
        z.observe(Some(199.0), VH, &cfg);
        let flips = [201.0, 199.0, 202.0, 198.0, 200.0]
            .into_iter()
            .map(|top| z.observe(Some(top), VH, &cfg))
            .filter(|c| *c != ZoneChange::Unchanged)
            .count();
        assert_eq!(flips, 0);
        assert!(!z.armed);
    }

    #[test]
    fn missing_body_section_keeps_state() {
        let cfg = ZoneConfig::default();
        let mut z = ZoneState::default();
        assert_eq!(z.observe(None, VH, &cfg), ZoneChange::Unchanged);
        assert!(z.armed);
    }
}
