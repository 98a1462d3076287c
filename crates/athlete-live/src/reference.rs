//! Reference stickman playback.

use serde::Serialize;

use athlete_core::{JointMap, JointName, Result, Sport, BONES};
use athlete_motion::{AnimationClip, AnimationClock, AnimationFrame, KeyframeTrack};
use athlete_technique::{BiomechanicalScorer, JointScore};

use crate::config::LiveConfig;

/// Score shown before the first refresh
const INITIAL_SCORE: u8 = 75;

/// Latest readouts for the reference panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceReadout {
    pub phase_label: String,
    pub scores: Vec<JointScore>,
    pub overall: u8,
}

/// Plays a sport's reference clip and keeps its synthetic scores current
#[derive(Debug, Clone)]
pub struct ReferencePlayer {
    clip: AnimationClip,
    clock: AnimationClock<KeyframeTrack>,
    scorer: BiomechanicalScorer,
    score_interval: u64,
    trail_max_alpha: f64,
    readout: ReferenceReadout,
}

impl ReferencePlayer {
    pub fn new(sport: Sport, config: &LiveConfig) -> Result<Self> {
        config.validate()?;
        let clip = AnimationClip::for_sport(sport)?;
        let clock = AnimationClock::from_clip(&clip).with_trail_capacity(config.trail_capacity);
        let scorer = BiomechanicalScorer::for_sport(sport);

        let scores = scorer
            .joints()
            .iter()
            .map(|j| JointScore {
                joint: j.joint,
                label: j.label.to_string(),
                weight: j.weight,
                score: INITIAL_SCORE,
            })
            .collect();

        Ok(Self {
            clip,
            clock,
            scorer,
            score_interval: config.score_interval,
            trail_max_alpha: config.trail_max_alpha,
            readout: ReferenceReadout {
                phase_label: String::new(),
                scores,
                overall: INITIAL_SCORE,
            },
        })
    }

    /// Advance one frame; scores and the phase readout refresh every
    /// `score_interval` frames, starting with the first
    pub fn tick(&mut self) -> AnimationFrame {
        let refresh = self.clock.ticks() % self.score_interval == 0;
        let frame = self.clock.tick();

        if refresh {
            let scores = self.scorer.scores(frame.phase);
            self.readout = ReferenceReadout {
                phase_label: frame.label.clone().unwrap_or_default(),
                overall: BiomechanicalScorer::overall_of(&scores),
                scores,
            };
        }

        frame
    }

    /// Ghost frames behind the current pose, oldest first, with opacity
    pub fn ghosts(&self) -> impl Iterator<Item = (f64, &JointMap)> + '_ {
        self.clock.trail().faded(self.trail_max_alpha)
    }

    /// Bones to draw between joints
    pub fn bones(&self) -> &'static [(JointName, JointName)] {
        &BONES
    }

    pub fn readout(&self) -> &ReferenceReadout {
        &self.readout
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    pub fn clock(&self) -> &AnimationClock<KeyframeTrack> {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_refresh_every_interval() {
        let mut player = ReferencePlayer::new(Sport::Cricket, &LiveConfig::default()).unwrap();
        assert_eq!(player.readout().overall, INITIAL_SCORE);

        let first = player.tick();
        let readout = player.readout().clone();
        assert_eq!(readout.phase_label, "Run-up");
        assert_eq!(readout.scores.len(), 5);
        assert_eq!(
            readout.scores[0].score,
            BiomechanicalScorer::joint_score(JointName::RShoulder, first.phase)
        );

        for _ in 1..12 {
            player.tick();
        }
        assert_eq!(player.readout(), &readout);

        let thirteenth = player.tick();
        assert_eq!(
            player.readout().scores[0].score,
            BiomechanicalScorer::joint_score(JointName::RShoulder, thirteenth.phase)
        );
    }

    #[test]
    fn test_ghosts_fade_in() {
        let mut player = ReferencePlayer::new(Sport::Football, &LiveConfig::default()).unwrap();
        for _ in 0..10 {
            player.tick();
        }

        let alphas: Vec<f64> = player.ghosts().map(|(a, _)| a).collect();
        assert_eq!(alphas.len(), 4);
        assert_eq!(alphas[0], 0.0);
        assert!(alphas.windows(2).all(|w| w[0] < w[1]));
        assert!(alphas.iter().all(|&a| a < 0.22));
        assert_eq!(player.bones().len(), 15);
    }

    #[test]
    fn test_custom_trail_capacity() {
        let config = LiveConfig {
            trail_capacity: 8,
            ..LiveConfig::default()
        };
        let mut player = ReferencePlayer::new(Sport::Badminton, &config).unwrap();
        for _ in 0..20 {
            player.tick();
        }
        assert_eq!(player.clock().trail().len(), 8);
        assert_eq!(player.clip().name, "Overhead Smash");
    }
}
